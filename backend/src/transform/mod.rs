//! Transformation module.
//!
//! - Hierarchy: rebuild parent context and group families
//! - Mapper: one record to one target record
//! - Bullets: five bullet points per row
//! - Emitter: target record to schema-ordered values
//! - Policy: product-line rule tables and presets
//! - Pipeline: the whole run, in memory or file to file

pub mod bullets;
pub mod emitter;
pub mod hierarchy;
pub mod mapper;
pub mod pipeline;
pub mod policy;

pub use emitter::emit;
pub use hierarchy::{group_families, reconstruct, Reconstruction};
pub use mapper::FieldMapper;
pub use pipeline::*;
pub use policy::{MappingPolicy, Mode, Preset};
