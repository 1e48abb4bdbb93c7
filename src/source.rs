//! Read-only access to a BFB file on disk.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::reader::BfbError;

/// A container file mapped into memory for the duration of one unpack.
#[derive(Debug)]
pub struct BfbSource {
    map: Option<Mmap>,
}

impl BfbSource {
    /// Map `path` read-only. Empty files are not mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BfbError> {
        let path = path.as_ref();
        let file_err = |source| BfbError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(file_err)?;
        let len = file.metadata().map_err(file_err)?.len();
        if len == 0 {
            return Ok(BfbSource { map: None });
        }

        // SAFETY: the mapping is read-only and private to this process; the
        // file must not be truncated by another process while it is mapped.
        let map = unsafe { Mmap::map(&file) }.map_err(file_err)?;
        Ok(BfbSource { map: Some(map) })
    }

    /// The container bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }
}
