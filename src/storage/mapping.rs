//! The owning handle over an established field mapping.

use memmap2::{Mmap, MmapMut};

/// How a [`FieldMapping`] is backed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing {
    /// Private anonymous memory, read-write.
    Anonymous,
    /// A read-only mapping over an unlinked file's inode.
    FileBacked,
}

#[derive(Debug)]
enum MapInner {
    Anonymous(MmapMut),
    FileBacked(Mmap),
}

/// Owning handle over one field's established memory mapping.
///
/// The handle is the mapping: dropping it (or calling [`release`]) unmaps,
/// which is the only way to free the memory under either backing mode. For
/// file-backed mappings the backing file is already unlinked when the
/// handle is created, so unmapping also releases the disk space.
///
/// [`release`]: FieldMapping::release
#[derive(Debug)]
pub struct FieldMapping {
    inner: MapInner,
}

impl FieldMapping {
    pub(crate) fn anonymous(map: MmapMut) -> Self {
        Self {
            inner: MapInner::Anonymous(map),
        }
    }

    pub(crate) fn file_backed(map: Mmap) -> Self {
        Self {
            inner: MapInner::FileBacked(map),
        }
    }

    pub fn backing(&self) -> Backing {
        match &self.inner {
            MapInner::Anonymous(_) => Backing::Anonymous,
            MapInner::FileBacked(_) => Backing::FileBacked,
        }
    }

    /// Length of the mapped region in bytes.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        match &self.inner {
            MapInner::Anonymous(map) => &map[..],
            MapInner::FileBacked(map) => &map[..],
        }
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.as_slice().as_ptr()
    }

    /// Mutable view of the mapped bytes; `None` for file-backed mappings,
    /// which are established read-only.
    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        match &mut self.inner {
            MapInner::Anonymous(map) => Some(&mut map[..]),
            MapInner::FileBacked(_) => None,
        }
    }

    /// Unmaps the region, regardless of backing mode.
    ///
    /// Dropping the handle does the same; this exists so releasing a
    /// mapping reads as an explicit operation at the call site.
    pub fn release(self) {
        drop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memmap2::MmapOptions;

    #[test]
    fn anonymous_mapping_is_writable() {
        let map = MmapOptions::new().len(16).map_anon().unwrap();
        let mut mapping = FieldMapping::anonymous(map);

        assert_eq!(mapping.backing(), Backing::Anonymous);
        assert_eq!(mapping.len(), 16);

        let slice = mapping.as_mut_slice().unwrap();
        slice[0] = 0xAB;
        assert_eq!(mapping.as_slice()[0], 0xAB);
    }

    #[test]
    fn release_consumes_the_handle() {
        let map = MmapOptions::new().len(8).map_anon().unwrap();
        let mapping = FieldMapping::anonymous(map);

        mapping.release();
    }
}
