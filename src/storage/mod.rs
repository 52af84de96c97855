//! # Storage Module
//!
//! This module provides the mapping layer of segmap: the allocator that
//! turns one column of field data into a live memory mapping, and the
//! owning handle the caller holds afterwards.
//!
//! ## Architecture Overview
//!
//! Two mutually exclusive policies, selected per load call by whether a
//! mapping directory is configured:
//!
//! - **Anonymous**: a private, read-write mapping backed by no file. The
//!   field bytes are copied straight in. Freed only by unmapping, never by
//!   heap deallocation.
//! - **File-backed**: the field bytes are written to a transient file under
//!   `<dir>/<segment_id>/<field_id>`, fsynced, mapped read-only, and the
//!   file is unlinked before the call returns. The mapping stays valid
//!   through the unlinked inode and the disk space comes back once the
//!   mapping is released.
//!
//! ## Page Warm-Up
//!
//! File-backed mappings are demand-paged: the first access to each page
//! takes a fault and possibly a disk read. To keep that latency out of the
//! serving path, the allocator asks the kernel to pre-fault every page at
//! mapping time (MAP_POPULATE) where the platform supports it, and
//! otherwise walks the mapping in [`PAGE_STRIDE`] strides touching one byte
//! per stride before the handle is handed out. See [`PopulateMode`].
//!
//! ## Safety Model
//!
//! The allocator never hands out raw pointers. [`FieldMapping`] owns the
//! mapping; slices borrow from it under the usual borrow rules, and the one
//! release operation unmaps regardless of the backing mode, so callers
//! cannot mistakenly free heap memory that was never heap-allocated.
//!
//! ## Thread Safety
//!
//! A single load call is one synchronous path with no shared mutable state.
//! Loads for different `(segment_id, field_id)` pairs may run concurrently;
//! directory creation is idempotent and safe to race. Loads for the same
//! pair must not run concurrently - the transient file path is not locked,
//! and that uniqueness is the caller's invariant to enforce.
//!
//! ## Platform Support
//!
//! Mappings go through `memmap2`. The file-backed policy relies on
//! unlink-while-mapped keeping the inode alive, which is Unix semantics;
//! the anonymous policy is portable.

mod allocator;
mod mapping;

pub use allocator::{LoadRequest, MappingAllocator, PopulateMode};
pub use mapping::{Backing, FieldMapping};

/// Stride of the manual page warm-up walk.
pub const PAGE_STRIDE: usize = 4096;
