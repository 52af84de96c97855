//! # Field Descriptors, Source Containers, and Byte Layout
//!
//! This module holds everything the mapping allocator needs to turn one
//! column of a sealed segment into raw bytes:
//!
//! - `FieldMeta`: immutable descriptor of a column's on-the-wire layout
//! - `FieldData`: the typed, read-only source container handed in by the
//!   caller
//! - `layout`: the dispatch over `DataType` that computes byte sizes, fills
//!   destination buffers, and writes to open files
//!
//! The layout operations are pure apart from the file writes: no internal
//! state, no allocation beyond small scratch buffers for narrowing
//! conversions.

mod data;
mod layout;
mod meta;

pub use data::FieldData;
pub use layout::{data_size, fill_field, write_field};
pub use meta::FieldMeta;
