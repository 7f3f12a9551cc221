//! Loading OpenCL C program text from disk.

use std::fs;
use std::path::Path;
use std::str;

/// The bytes of a program source file, exactly as read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramSource {
    bytes: Vec<u8>,
}

impl ProgramSource {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The source as text, or `None` if the file is not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        str::from_utf8(&self.bytes).ok()
    }

    /// Length of the file in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for ProgramSource {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Reads the whole of `path`.
///
/// Returns `None` if the file cannot be opened or read. An empty file is an
/// empty, present source.
pub fn load_program_source<P: AsRef<Path>>(path: P) -> Option<ProgramSource> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => {
            debug!("Read {} bytes of program source from {}", bytes.len(), path.display());
            Some(ProgramSource { bytes })
        }
        Err(e) => {
            warn!("Unable to open {} for reading: {}", path.display(), e);
            None
        }
    }
}
