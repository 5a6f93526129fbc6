//! Compile-time schema descriptors.
//!
//! Every codec-backed entity publishes one static [`EntitySchema`]: the
//! table of its own fields plus the schemas it embeds. The codec never
//! inspects types at runtime; it walks these tables.
//!
//! In general:
//! - `model` defines *what exists* on the wire
//! - `codec` defines *how it moves*
pub mod entity;
pub mod field;


pub use entity::{EntitySchema, Layout, SchemaError};
pub use field::FieldSpec;
