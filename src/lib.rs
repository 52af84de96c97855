//! # segmap - Memory-Mapped Field Loading for Sealed Segments
//!
//! segmap loads a single column ("field") of a sealed storage segment into
//! process-addressable memory, either as an anonymous mapping or as a memory
//! mapping over a transient on-disk file. Large columnar data can then be
//! served without committing it permanently to the process heap: the OS pages
//! it in and out, and releasing the mapping gives the memory back without
//! touching the allocator.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      Segment layer (caller)          │
//! ├─────────────────────────────────────┤
//! │   MappingAllocator (policy + file    │
//! │   lifecycle: create/write/fsync/     │
//! │   map/warm/unlink/close)             │
//! ├─────────────────────────────────────┤
//! │   Field layout dispatch (size,       │
//! │   fill, write per data type)         │
//! ├─────────────────────────────────────┤
//! │   Memory-mapped I/O (memmap2)        │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Two Mapping Policies
//!
//! - **Anonymous**: no mapping directory configured. The field bytes are
//!   copied into a private anonymous read-write mapping. Freed only by
//!   unmapping, never by heap deallocation.
//! - **File-backed**: a mapping directory is configured. The field bytes are
//!   written to `<dir>/<segment_id>/<field_id>`, fsynced, mapped read-only,
//!   and the file is unlinked before the call returns. The mapping stays
//!   valid through the unlinked inode; disk space is reclaimed when the
//!   mapping is released.
//!
//! ## Quick Start
//!
//! ```ignore
//! use segmap::{FieldData, FieldMeta, LoadRequest, MappingAllocator};
//!
//! let allocator = MappingAllocator::with_platform_defaults();
//! let meta = FieldMeta::scalar(segmap::DataType::Int64)?;
//! let data = FieldData::Long(vec![1, 2, 3]);
//!
//! let request = LoadRequest {
//!     field_id: 101,
//!     row_count: 3,
//!     data: &data,
//!     mmap_dir: Some("/var/lib/segments/mmap".into()),
//! };
//!
//! let mapping = allocator.create_mapping(7, &meta, &request)?;
//! ```
//!
//! ## Module Overview
//!
//! - [`types`]: the closed `DataType` enumeration of supported field types
//! - [`fields`]: field descriptors, typed source containers, and the
//!   byte-layout dispatch (size / fill / write)
//! - [`storage`]: the mapping allocator and the owning mapping handle
//! - [`search`]: k-NN result containers and metric-type helpers
//! - [`utils`]: alignment arithmetic

pub mod fields;
pub mod search;
pub mod storage;
pub mod types;
pub mod utils;

pub use fields::{FieldData, FieldMeta};
pub use storage::{Backing, FieldMapping, LoadRequest, MappingAllocator, PopulateMode};
pub use types::DataType;
