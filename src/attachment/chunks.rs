use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

/// Fixed upload buffer size (2 MiB)
pub const CHUNK_SIZE: usize = 2 * 1024 * 1024;

/// One bounded byte range of a file, tagged with its offset within the whole
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Offset of the first payload byte within the file
    pub start: u64,
    /// Offset of the last payload byte, inclusive
    pub end: u64,
    /// Total size of the parent file in bytes
    pub total_size: u64,
    pub payload: Vec<u8>,
}

impl Chunk {
    /// Render the `Content-Range` header value for this chunk
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total_size)
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Lazy chunk iterator over a file, front to back.
///
/// Yields chunks of at most the buffer size in strictly increasing offset
/// order. Termination is end-of-file driven: a short chunk ends the
/// sequence, and when the file length is an exact multiple of the buffer
/// size the final full-sized chunk is followed by an EOF probe instead of a
/// phantom empty chunk. Not restartable mid-iteration; open a fresh reader
/// to start over.
pub struct ChunkReader {
    file: File,
    buffer_size: usize,
    total_size: u64,
    offset: u64,
    done: bool,
}

impl ChunkReader {
    /// Open a file for chunked reading with the standard 2 MiB buffer
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::with_buffer_size(path, CHUNK_SIZE)
    }

    pub fn with_buffer_size(path: impl AsRef<Path>, buffer_size: usize) -> io::Result<Self> {
        assert!(buffer_size > 0, "buffer size must be non-zero");

        let file = File::open(path.as_ref())?;
        let total_size = file.metadata()?.len();

        Ok(Self {
            file,
            buffer_size,
            total_size,
            offset: 0,
            done: false,
        })
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Read until the buffer is full or EOF, absorbing short reads
    fn fill(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buffer.len() {
            match self.file.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl Iterator for ChunkReader {
    type Item = io::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut payload = vec![0u8; self.buffer_size];
        let filled = match self.fill(&mut payload) {
            Ok(filled) => filled,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        if filled < self.buffer_size {
            self.done = true;
        }
        if filled == 0 {
            return None;
        }
        payload.truncate(filled);

        let start = self.offset;
        let end = start + filled as u64 - 1;
        self.offset = end + 1;

        Some(Ok(Chunk {
            start,
            end,
            total_size: self.total_size,
            payload,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_range_renders_inclusive_bounds() {
        let chunk = Chunk {
            start: 2_097_152,
            end: 4_194_303,
            total_size: 5_242_880,
            payload: vec![0; 2_097_152],
        };
        assert_eq!(chunk.content_range(), "bytes 2097152-4194303/5242880");
    }

    #[test]
    fn open_missing_file_fails() {
        assert!(ChunkReader::open("/no/such/file.bin").is_err());
    }
}
