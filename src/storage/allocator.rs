//! # Mapping Allocator
//!
//! [`MappingAllocator::create_mapping`] is the single entry point of the
//! crate: given a field descriptor and a load request, it establishes a
//! memory mapping holding the field's bytes and returns the owning handle.
//!
//! ## File-Backed Lifecycle
//!
//! The file-backed policy runs the full disk-file lifecycle inside the one
//! call, in order:
//!
//! ```text
//! create dirs -> open(0600) -> write -> fsync -> mmap(read-only)
//!     -> warm pages -> unlink -> close
//! ```
//!
//! Every step's failure is fatal and reported with the file path and the
//! OS error. After the call returns the file no longer exists in the
//! directory namespace; the mapping is the only live reference to the
//! inode, and the disk space is reclaimed when the mapping is released.
//!
//! ## Failure Policy
//!
//! No retry, no backoff, no partial success. Any syscall error aborts the
//! load with diagnostic context; recovering (skipping the field, failing
//! the segment load gracefully) is the caller's concern.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use eyre::{ensure, Result, WrapErr};
use memmap2::MmapOptions;
use tracing::{debug, trace};

use crate::fields::{data_size, fill_field, write_field, FieldData, FieldMeta};
use crate::utils::upper_div;

use super::mapping::FieldMapping;
use super::PAGE_STRIDE;

/// Whether the platform can pre-fault pages at mapping time (MAP_POPULATE).
const EAGER_POPULATE_SUPPORTED: bool = cfg!(target_os = "linux");

/// How mapped pages are made resident before the handle is handed out.
///
/// Computed once from the platform capability and passed into the
/// allocator; never read from shared process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulateMode {
    /// Ask the kernel to pre-fault every page when the mapping is created.
    /// On platforms without MAP_POPULATE the allocator falls back to the
    /// manual walk.
    Eager,
    /// Touch one byte per [`PAGE_STRIDE`] after mapping to force residency.
    Touch,
}

impl PopulateMode {
    /// Eager where MAP_POPULATE exists (Linux), Touch elsewhere.
    pub fn platform_default() -> Self {
        if EAGER_POPULATE_SUPPORTED {
            PopulateMode::Eager
        } else {
            PopulateMode::Touch
        }
    }
}

/// One field-load call: the source data, its row count, and where (if
/// anywhere) the transient mapping file may live.
///
/// A request is consumed by one `create_mapping` call and discarded. The
/// caller owns `data`; the allocator only reads from it.
#[derive(Debug)]
pub struct LoadRequest<'a> {
    pub field_id: i64,
    pub row_count: usize,
    pub data: &'a FieldData,
    /// `Some` selects the file-backed policy; `None` the anonymous one.
    pub mmap_dir: Option<PathBuf>,
}

/// Chooses and runs the mapping policy for a field load.
#[derive(Debug, Clone, Copy)]
pub struct MappingAllocator {
    populate: PopulateMode,
}

impl MappingAllocator {
    pub fn new(populate: PopulateMode) -> Self {
        Self { populate }
    }

    pub fn with_platform_defaults() -> Self {
        Self::new(PopulateMode::platform_default())
    }

    /// Establishes a mapping holding the field's bytes.
    ///
    /// Returns `Ok(None)` iff the computed byte size is zero. Loads for the
    /// same `(segment_id, field_id)` pair must not run concurrently; the
    /// transient file path is not locked.
    pub fn create_mapping(
        &self,
        segment_id: i64,
        meta: &FieldMeta,
        request: &LoadRequest<'_>,
    ) -> Result<Option<FieldMapping>> {
        match request.mmap_dir.as_deref() {
            None => self.map_anonymous(meta, request),
            Some(dir) => self.map_file_backed(dir, segment_id, meta, request),
        }
    }

    fn map_anonymous(
        &self,
        meta: &FieldMeta,
        request: &LoadRequest<'_>,
    ) -> Result<Option<FieldMapping>> {
        let size = data_size(meta, request.row_count, request.data)?;
        if size == 0 {
            return Ok(None);
        }

        let mut options = MmapOptions::new();
        options.len(size);
        #[cfg(target_os = "linux")]
        if self.populate == PopulateMode::Eager {
            options.populate();
        }

        let mut map = options
            .map_anon()
            .wrap_err_with(|| format!("failed to allocate anonymous mapping of {} bytes", size))?;

        fill_field(meta.data_type(), size, request.data, &mut map)?;

        Ok(Some(FieldMapping::anonymous(map)))
    }

    fn map_file_backed(
        &self,
        dir: &Path,
        segment_id: i64,
        meta: &FieldMeta,
        request: &LoadRequest<'_>,
    ) -> Result<Option<FieldMapping>> {
        let parent = dir.join(segment_id.to_string());
        fs::create_dir_all(&parent)
            .wrap_err_with(|| format!("failed to create mapping directory '{}'", parent.display()))?;
        let path = parent.join(request.field_id.to_string());

        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&path)
            .wrap_err_with(|| format!("failed to create mapping file '{}'", path.display()))?;

        let size = data_size(meta, request.row_count, request.data)?;
        let written = write_field(&mut file, meta.data_type(), request.data, size)
            .wrap_err_with(|| format!("failed to write mapping file '{}'", path.display()))?;
        ensure!(
            written == size,
            "short write to mapping file '{}': wrote {} of {} bytes",
            path.display(),
            written,
            size
        );

        file.sync_all()
            .wrap_err_with(|| format!("failed to fsync mapping file '{}'", path.display()))?;

        if written == 0 {
            // Empty field: nothing to map, and the file must not outlive
            // the call.
            fs::remove_file(&path)
                .wrap_err_with(|| format!("failed to unlink mapping file '{}'", path.display()))?;
            close_checked(file, &path)?;
            return Ok(None);
        }

        debug!(path = %path.display(), bytes = written, "wrote field data");

        let mut options = MmapOptions::new();
        options.len(written);
        #[cfg(target_os = "linux")]
        if self.populate == PopulateMode::Eager {
            options.populate();
        }

        // SAFETY: Mmap::map is unsafe because a mapped file modified
        // externally leads to undefined behavior. This is safe because:
        // 1. The file was created with owner-only permissions and truncated
        //    by this call; no other writer holds it (caller-enforced
        //    uniqueness of the (segment_id, field_id) path)
        // 2. The file is unlinked below, removing it from the namespace
        //    before the handle escapes this function
        // 3. The mapping is read-only and its lifetime is tied to
        //    FieldMapping, preventing use-after-unmap
        let map = unsafe { options.map(&file) }
            .wrap_err_with(|| format!("failed to map mapping file '{}'", path.display()))?;

        if !EAGER_POPULATE_SUPPORTED || self.populate == PopulateMode::Touch {
            touch_pages(&map);
        }

        // The mapping keeps the unlinked inode alive; the disk space comes
        // back once the mapping is released.
        fs::remove_file(&path)
            .wrap_err_with(|| format!("failed to unlink mapping file '{}'", path.display()))?;
        close_checked(file, &path)?;

        debug!(path = %path.display(), bytes = written, "field mapped, backing file unlinked");

        Ok(Some(FieldMapping::file_backed(map)))
    }
}

/// Walks the mapping touching one byte per page stride so every page is
/// resident before the mapping is handed to the caller.
fn touch_pages(map: &[u8]) {
    let strides = upper_div(map.len(), PAGE_STRIDE);
    trace!(bytes = map.len(), strides, "warming mapping");

    for stride in 0..strides {
        // SAFETY: read_volatile requires a valid, aligned pointer. This is
        // safe because:
        // 1. strides is the rounded-up quotient of map.len() by
        //    PAGE_STRIDE, so stride * PAGE_STRIDE < map.len() for every
        //    iteration and the pointer stays inside the mapping
        // 2. u8 reads are always aligned
        // 3. The volatile read keeps the load from being optimized away
        unsafe { std::ptr::read_volatile(map.as_ptr().add(stride * PAGE_STRIDE)) };
    }
}

/// Closes the descriptor and surfaces the close result.
///
/// `File`'s drop swallows close errors, so the descriptor is released
/// through `libc::close` and checked.
#[cfg(unix)]
fn close_checked(file: File, path: &Path) -> Result<()> {
    use std::os::unix::io::IntoRawFd;

    let fd = file.into_raw_fd();
    // SAFETY: into_raw_fd transfers ownership of the descriptor, so File's
    // drop no longer runs and the descriptor is closed exactly once here.
    let rc = unsafe { libc::close(fd) };
    ensure!(
        rc == 0,
        "failed to close mapping file '{}': {}",
        path.display(),
        std::io::Error::last_os_error()
    );
    Ok(())
}

#[cfg(not(unix))]
fn close_checked(file: File, _path: &Path) -> Result<()> {
    drop(file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;
    use tempfile::tempdir;

    fn request(data: &FieldData, row_count: usize, mmap_dir: Option<PathBuf>) -> LoadRequest<'_> {
        LoadRequest {
            field_id: 101,
            row_count,
            data,
            mmap_dir,
        }
    }

    #[test]
    fn anonymous_mapping_holds_field_bytes() {
        let allocator = MappingAllocator::with_platform_defaults();
        let meta = FieldMeta::scalar(DataType::Int32).unwrap();
        let data = FieldData::Int(vec![1, 2, 3]);

        let mapping = allocator
            .create_mapping(7, &meta, &request(&data, 3, None))
            .unwrap()
            .unwrap();

        assert_eq!(mapping.backing(), crate::storage::Backing::Anonymous);
        assert_eq!(mapping.len(), 12);

        let mut expected = vec![0u8; 12];
        fill_field(DataType::Int32, 12, &data, &mut expected).unwrap();
        assert_eq!(mapping.as_slice(), &expected[..]);
    }

    #[test]
    fn anonymous_mapping_returns_none_for_zero_rows() {
        let allocator = MappingAllocator::with_platform_defaults();
        let meta = FieldMeta::scalar(DataType::Int64).unwrap();
        let data = FieldData::Long(vec![]);

        let mapping = allocator
            .create_mapping(7, &meta, &request(&data, 0, None))
            .unwrap();

        assert!(mapping.is_none());
    }

    #[test]
    fn file_backed_mapping_holds_bytes_and_unlinks_file() {
        let dir = tempdir().unwrap();
        let allocator = MappingAllocator::with_platform_defaults();
        let meta = FieldMeta::varchar();
        let data = FieldData::String(vec!["a".into(), "bb".into(), "ccc".into()]);

        let mapping = allocator
            .create_mapping(7, &meta, &request(&data, 3, Some(dir.path().to_path_buf())))
            .unwrap()
            .unwrap();

        assert_eq!(mapping.backing(), crate::storage::Backing::FileBacked);
        assert_eq!(mapping.as_slice(), b"abbccc");

        // The file is gone; only the live mapping remains.
        assert!(!dir.path().join("7").join("101").exists());
    }

    #[test]
    fn file_backed_mapping_is_read_only() {
        let dir = tempdir().unwrap();
        let allocator = MappingAllocator::with_platform_defaults();
        let meta = FieldMeta::scalar(DataType::Bool).unwrap();
        let data = FieldData::Bool(vec![true, false]);

        let mut mapping = allocator
            .create_mapping(7, &meta, &request(&data, 2, Some(dir.path().to_path_buf())))
            .unwrap()
            .unwrap();

        assert!(mapping.as_mut_slice().is_none());
    }

    #[test]
    fn file_backed_empty_field_returns_none_and_leaves_no_file() {
        let dir = tempdir().unwrap();
        let allocator = MappingAllocator::with_platform_defaults();
        let meta = FieldMeta::varchar();
        let data = FieldData::String(vec![]);

        let mapping = allocator
            .create_mapping(7, &meta, &request(&data, 0, Some(dir.path().to_path_buf())))
            .unwrap();

        assert!(mapping.is_none());
        assert!(!dir.path().join("7").join("101").exists());
    }

    #[test]
    fn touch_mode_still_maps_correctly() {
        let dir = tempdir().unwrap();
        let allocator = MappingAllocator::new(PopulateMode::Touch);
        let meta = FieldMeta::float_vector(2).unwrap();
        let data = FieldData::FloatVector(vec![1.0, 2.0, 3.0, 4.0]);

        let mapping = allocator
            .create_mapping(9, &meta, &request(&data, 2, Some(dir.path().to_path_buf())))
            .unwrap()
            .unwrap();

        assert_eq!(mapping.len(), 16);

        let decoded: Vec<f32> = mapping
            .as_slice()
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes(c.try_into().unwrap()))
            .collect();
        assert_eq!(decoded, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn directory_creation_is_idempotent() {
        let dir = tempdir().unwrap();
        let allocator = MappingAllocator::with_platform_defaults();
        let meta = FieldMeta::scalar(DataType::Int32).unwrap();
        let data = FieldData::Int(vec![5]);

        for _ in 0..2 {
            let mapping = allocator
                .create_mapping(7, &meta, &request(&data, 1, Some(dir.path().to_path_buf())))
                .unwrap()
                .unwrap();
            assert_eq!(mapping.len(), 4);
        }
    }
}
