pub mod chunks;
pub mod driver;
pub mod inline;
pub mod session;

pub use chunks::{Chunk, ChunkReader, CHUNK_SIZE};
pub use driver::{ChunkFailurePolicy, ChunkedUploadDriver};
pub use session::UploadSession;

use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use thiserror::Error;

pub const MIB: u64 = 1024 * 1024;

/// Largest size (exclusive) that is embedded directly in one request
pub const INLINE_LIMIT: u64 = 3 * MIB;

/// Largest size (inclusive) accepted through an upload session
pub const CHUNKED_LIMIT: u64 = 36 * MIB;

/// Attachment upload errors
#[derive(Error, Debug)]
pub enum AttachmentError {
    #[error("{} is not found", path.display())]
    NotFound { path: PathBuf },

    #[error("{name} is too large to upload ({size} bytes)")]
    TooLarge { name: String, size: u64 },

    #[error("Inline upload of {name} failed: server returned {status}")]
    InlineUploadFailed { name: String, status: StatusCode },

    #[error("Failed to create upload session for {name}: server returned {status}")]
    SessionCreationFailed { name: String, status: StatusCode },

    #[error("Chunk {index} ({range}) was rejected: server returned {status}")]
    ChunkRejected {
        index: usize,
        range: String,
        status: StatusCode,
    },

    #[error("Upload session URL is invalid: {0}")]
    InvalidSessionUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AttachmentResult<T> = Result<T, AttachmentError>;

/// A file queued for upload, sized once at creation
#[derive(Debug, Clone)]
pub struct Attachment {
    path: PathBuf,
    name: String,
    size: u64,
}

impl Attachment {
    pub fn from_path(path: impl AsRef<Path>) -> AttachmentResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AttachmentError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let size = std::fs::metadata(path)?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn policy(&self) -> UploadPolicy {
        UploadPolicy::for_size(self.size)
    }
}

/// Upload path for an attachment, resolved once from its byte size.
///
/// The three ranges partition `[0, u64::MAX]`: below 3 MiB is inline,
/// 3 MiB through 36 MiB inclusive goes through an upload session, and
/// anything larger is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPolicy {
    Inline,
    Chunked,
    Rejected,
}

impl UploadPolicy {
    pub fn for_size(size: u64) -> Self {
        if size < INLINE_LIMIT {
            UploadPolicy::Inline
        } else if size <= CHUNKED_LIMIT {
            UploadPolicy::Chunked
        } else {
            UploadPolicy::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_sizes_are_inline() {
        assert_eq!(UploadPolicy::for_size(0), UploadPolicy::Inline);
        assert_eq!(UploadPolicy::for_size(1), UploadPolicy::Inline);
        let two_point_nine_mib = (2.9 * MIB as f64) as u64;
        assert_eq!(UploadPolicy::for_size(two_point_nine_mib), UploadPolicy::Inline);
        assert_eq!(UploadPolicy::for_size(INLINE_LIMIT - 1), UploadPolicy::Inline);
    }

    #[test]
    fn three_mib_boundary_goes_to_chunked() {
        assert_eq!(UploadPolicy::for_size(3 * MIB), UploadPolicy::Chunked);
    }

    #[test]
    fn thirty_six_mib_boundary_stays_chunked() {
        assert_eq!(UploadPolicy::for_size(36 * MIB), UploadPolicy::Chunked);
    }

    #[test]
    fn oversized_files_are_rejected() {
        assert_eq!(UploadPolicy::for_size(36 * MIB + 1), UploadPolicy::Rejected);
        let thirty_six_point_one_mib = (36.1 * MIB as f64) as u64;
        assert_eq!(
            UploadPolicy::for_size(thirty_six_point_one_mib),
            UploadPolicy::Rejected
        );
        assert_eq!(UploadPolicy::for_size(u64::MAX), UploadPolicy::Rejected);
    }

    #[test]
    fn missing_file_is_a_typed_error() {
        let result = Attachment::from_path("/definitely/not/here.bin");
        assert!(matches!(result, Err(AttachmentError::NotFound { .. })));
    }
}
