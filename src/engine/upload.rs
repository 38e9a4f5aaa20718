//! In-memory upload source handed to the engine.

use bytes::{Bytes, BytesMut};

/// Supplies a request body to the engine in chunks.
///
/// Holds the whole body in memory, so it can always be rewound (the engine
/// rewinds when a redirect or retry resends the body).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadDataProvider {
    data: Bytes,
    position: usize,
}

impl UploadDataProvider {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            position: 0,
        }
    }

    /// Total body length.
    pub fn length(&self) -> u64 {
        self.data.len() as u64
    }

    /// Copy the next chunk into `buffer`, up to its spare capacity.
    /// Returns the number of bytes copied; 0 once everything has been read.
    pub fn read(&mut self, buffer: &mut BytesMut) -> usize {
        let spare = buffer.capacity() - buffer.len();
        let n = spare.min(self.data.len() - self.position);
        buffer.extend_from_slice(&self.data[self.position..self.position + n]);
        self.position += n;
        n
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// The complete body.
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}
