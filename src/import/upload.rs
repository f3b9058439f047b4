//! Scoped temporary copy of an uploaded BOM.

use crate::error::{ImportError, Result};
use crate::parsers::SpdxFileType;
use sha2::{Digest, Sha256};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const CHUNK_SIZE: usize = 64 * 1024;

/// The uploaded stream persisted to a temporary file.
///
/// The file carries the extension of its detected type so the parsers can
/// pick it up by name. It is removed when the value is dropped, whichever
/// way the import ends.
#[derive(Debug)]
pub struct ScopedUpload {
    file: NamedTempFile,
    file_type: SpdxFileType,
    sha256: String,
    len: u64,
}

impl ScopedUpload {
    /// Copy `reader` into a fresh temporary file named after `content_id`.
    ///
    /// # Errors
    /// Returns [`ImportError::Io`] if the file cannot be created or written,
    /// or the reader fails
    pub fn persist<R: Read>(mut reader: R, content_id: &str, file_type: SpdxFileType) -> Result<Self> {
        let prefix = format!("{}-", sanitize(content_id));
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(file_type.extension())
            .tempfile()?;

        let mut hasher = Sha256::new();
        let mut len = 0u64;
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ImportError::io(file.path(), e)),
            };
            hasher.update(&buf[..n]);
            file.write_all(&buf[..n])
                .map_err(|e| ImportError::io(file.path(), e))?;
            len += n as u64;
        }
        file.flush().map_err(|e| ImportError::io(file.path(), e))?;

        let sha256 = format!("{:x}", hasher.finalize());
        tracing::debug!(
            path = %file.path().display(),
            bytes = len,
            sha256 = %sha256,
            "Saved upload to temporary file"
        );
        Ok(Self {
            file,
            file_type,
            sha256,
            len,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    #[must_use]
    pub const fn file_type(&self) -> SpdxFileType {
        self.file_type
    }

    /// Hex SHA-256 of the uploaded bytes.
    #[must_use]
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Keep ids usable as file name prefixes.
fn sanitize(id: &str) -> String {
    let cleaned: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
