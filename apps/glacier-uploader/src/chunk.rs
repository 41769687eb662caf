//! Chunk Reader
//!
//! Splits a source into fixed-size parts. Every chunk except the last is
//! exactly `part_size` bytes; the last holds whatever remains.

use std::path::Path;

use bytes::{Bytes, BytesMut};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Result, UploadError};

/// Default part size: 50MiB
pub const DEFAULT_PART_SIZE: usize = 50 * 1024 * 1024;

/// One part's worth of the source file
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 1-based part number, assigned in read order
    pub part_number: i32,

    /// Byte offset of this chunk in the source
    pub offset: u64,

    /// Chunk contents, independent of the reader's buffer
    pub data: Bytes,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Sequential, non-restartable reader producing [`Chunk`]s
pub struct ChunkReader<R = File> {
    reader: R,
    buffer: BytesMut,
    part_size: usize,
    total_size: u64,
    offset: u64,
    next_part: i32,
    done: bool,
}

impl ChunkReader<File> {
    /// Open `path` for chunked reading
    pub async fn open(path: &Path, part_size: usize) -> Result<Self> {
        let file = File::open(path).await.map_err(|source| UploadError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;

        let metadata = file.metadata().await.map_err(|source| UploadError::StatFile {
            path: path.to_path_buf(),
            source,
        })?;

        Self::new(file, part_size, metadata.len())
    }
}

impl<R: AsyncRead + Unpin> ChunkReader<R> {
    /// Wrap an arbitrary reader whose length is known up front
    pub fn new(reader: R, part_size: usize, total_size: u64) -> Result<Self> {
        if part_size == 0 {
            return Err(UploadError::InvalidPartSize(part_size));
        }

        Ok(Self {
            reader,
            buffer: BytesMut::with_capacity(part_size),
            part_size,
            total_size,
            offset: 0,
            next_part: 1,
            done: false,
        })
    }

    /// Read the next chunk. Returns `None` once the source is exhausted.
    pub async fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.done {
            return Ok(None);
        }

        let part_number = self.next_part;
        self.buffer.clear();
        self.buffer.reserve(self.part_size);

        // Keep reading until the part is full; a short read is not EOF.
        while self.buffer.len() < self.part_size {
            let want = self.part_size - self.buffer.len();
            let n = (&mut self.reader)
                .take(want as u64)
                .read_buf(&mut self.buffer)
                .await
                .map_err(|source| UploadError::ChunkRead {
                    part_number,
                    source,
                })?;

            if n == 0 {
                self.done = true;
                break;
            }
        }

        if self.buffer.is_empty() {
            return Ok(None);
        }

        let data = self.buffer.split().freeze();
        let chunk = Chunk {
            part_number,
            offset: self.offset,
            data,
        };

        self.offset += chunk.len() as u64;
        self.next_part += 1;

        Ok(Some(chunk))
    }

    /// Number of parts the source will produce, `ceil(total / part_size)`
    pub fn expected_parts(&self) -> u64 {
        self.total_size.div_ceil(self.part_size as u64)
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn part_size(&self) -> usize {
        self.part_size
    }

    /// Bytes handed out so far
    pub fn offset(&self) -> u64 {
        self.offset
    }
}
