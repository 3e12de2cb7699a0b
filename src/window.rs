use bytes::{Buf, BytesMut};

/// Connection-owned buffer of received bytes with a rewindable read cursor.
///
/// The transport appends, the decoder advances the cursor and rewinds it when an attempt is
/// replayed. The cursor never passes the end of the written bytes.
#[derive(Debug, Default, Clone)]
pub struct ByteWindow {
    inner: BytesMut,
    reader: usize,
}

impl ByteWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: BytesMut::with_capacity(capacity),
            reader: 0,
        }
    }

    /// Append freshly received bytes.
    pub fn append(&mut self, data: &[u8]) {
        self.inner.extend_from_slice(data);
    }

    /// Number of bytes between the cursor and the end of the written bytes.
    pub fn readable_bytes(&self) -> usize {
        self.inner.len() - self.reader
    }

    pub fn is_readable(&self) -> bool {
        self.readable_bytes() > 0
    }

    pub fn reader_index(&self) -> usize {
        self.reader
    }

    pub fn writer_index(&self) -> usize {
        self.inner.len()
    }

    /// Move the cursor, typically back to a position saved at the start of an attempt.
    ///
    /// Panics if `index` is past the writer index.
    pub fn set_reader_index(&mut self, index: usize) {
        assert!(
            index <= self.inner.len(),
            "reader index {index} out of bounds (writer index {})",
            self.inner.len()
        );
        self.reader = index;
    }

    /// The unread region.
    pub fn unread(&self) -> &[u8] {
        &self.inner[self.reader..]
    }

    pub fn peek_u8(&self) -> Option<u8> {
        self.unread().first().copied()
    }

    /// Advance the cursor by up to `count` bytes, returning how many were skipped.
    pub fn skip_bytes(&mut self, count: usize) -> usize {
        let skipped = count.min(self.readable_bytes());
        self.reader += skipped;
        skipped
    }

    /// Drop everything before the cursor. Positions saved earlier become invalid.
    pub fn discard_read_bytes(&mut self) {
        if self.reader == 0 {
            return;
        }
        if self.reader == self.inner.len() {
            self.inner.clear();
        } else {
            self.inner.advance(self.reader);
        }
        self.reader = 0;
    }

    /// Copy the next `buf.len()` bytes out and advance past them.
    ///
    /// Leaves the cursor untouched when fewer bytes are readable.
    pub(crate) fn take_into(&mut self, buf: &mut [u8]) -> bool {
        let end = self.reader + buf.len();
        if end > self.inner.len() {
            return false;
        }
        buf.copy_from_slice(&self.inner[self.reader..end]);
        self.reader = end;
        true
    }
}

impl From<&[u8]> for ByteWindow {
    fn from(data: &[u8]) -> Self {
        Self {
            inner: BytesMut::from(data),
            reader: 0,
        }
    }
}

impl AsRef<[u8]> for ByteWindow {
    fn as_ref(&self) -> &[u8] {
        self.unread()
    }
}
