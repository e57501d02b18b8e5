//! Column names of the storefront export and of the marketplace template.

/// Storefront catalog export columns.
pub mod source {
    pub const HANDLE: &str = "Handle";
    pub const TITLE: &str = "Title";
    pub const BODY_HTML: &str = "Body (HTML)";
    pub const VENDOR: &str = "Vendor";
    pub const TYPE: &str = "Type";
    pub const TAGS: &str = "Tags";
    pub const OPTION1_VALUE: &str = "Option1 Value";
    pub const VARIANT_SKU: &str = "Variant SKU";
    pub const VARIANT_PRICE: &str = "Variant Price";
    pub const VARIANT_INVENTORY_QTY: &str = "Variant Inventory Qty";
    pub const VARIANT_IMAGE: &str = "Variant Image";
    pub const IMAGE_SRC: &str = "Image Src";
    pub const UPC: &str = "UPC (product.metafields.facts.upc)";
    pub const COLOR_PATTERN: &str = "Color (product.metafields.shopify.color-pattern)";
    pub const PAINT_FINISH: &str = "Paint finish (product.metafields.shopify.paint-finish)";
    pub const VEHICLE_PAINT_TYPE: &str =
        "Vehicle paint type (product.metafields.shopify.vehicle-paint-type)";
    pub const COLOR_CODE: &str = "color code (product.metafields.custom.color_code)";
    pub const MAKE: &str = "make (product.metafields.custom.make)";
}

/// Marketplace upload template columns.
pub mod target {
    pub const SKU: &str = "SKU";
    pub const ITEM_NAME: &str = "Item Name";
    pub const BRAND_NAME: &str = "Brand Name";
    pub const MANUFACTURER: &str = "Manufacturer";
    pub const PRODUCT_ID_TYPE: &str = "Product Id Type";
    pub const PRODUCT_ID: &str = "Product Id";
    pub const ITEM_TYPE_KEYWORD: &str = "Item Type Keyword";
    pub const PARENTAGE_LEVEL: &str = "Parentage Level";
    pub const PARENT_SKU: &str = "Parent SKU";
    pub const VARIATION_THEME: &str = "Variation Theme Name";
    pub const LIST_PRICE: &str = "List Price";
    pub const YOUR_PRICE: &str = "Your Price USD (Sell on Amazon, US)";
    pub const QUANTITY: &str = "Quantity (US)";
    pub const HANDLING_TIME: &str = "Handling Time (US)";
    pub const PRODUCT_DESCRIPTION: &str = "Product Description";
    pub const COLOR: &str = "Color";
    pub const COLOR_CODE: &str = "Color Code";
    pub const SIZE: &str = "Size";
    pub const PART_NUMBER: &str = "Part Number";
    pub const PAINT_TYPE: &str = "Paint Type";
    pub const FINISH_TYPE: &str = "Finish Type";
    pub const UNIT_COUNT: &str = "Unit Count";
    pub const UNIT_COUNT_TYPE: &str = "Unit Count Type";
    pub const ITEM_VOLUME: &str = "Item Volume";
    pub const ITEM_VOLUME_UNIT: &str = "Item Volume Unit";
    pub const COUNTRY_OF_ORIGIN: &str = "Country of Origin";
    pub const BATTERIES_REQUIRED: &str = "Are batteries required?";
    pub const BATTERIES_INCLUDED: &str = "Are batteries included?";
    pub const SDS_URL: &str = "Safety Data Sheet (SDS or MSDS) URL";
    pub const MAIN_IMAGE_URL: &str = "Main Image URL";
    pub const BULLET_POINT: &str = "Bullet Point";
    pub const DANGEROUS_GOODS: &str = "Dangerous Goods Regulations";
    pub const GHS_CLASS: &str = "GHS Class";
}
