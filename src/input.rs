use crate::error::InputError;
use crate::window::ByteWindow;

/// Source of bytes for one decode attempt.
///
/// Reads either complete in full or fail without consuming anything, so an attempt can always
/// be replayed from its saved position.
pub trait ByteInput {
    /// Fill `buf` completely.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), InputError>;

    /// Number of bytes that can be read right now.
    fn available(&self) -> usize;

    /// Fail unless `len` more bytes could be read right now. Nothing is consumed.
    fn require(&mut self, len: usize) -> Result<(), InputError> {
        let available = self.available();
        if len > available {
            return Err(InputError::Incomplete {
                needed: len,
                available,
            });
        }
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8, InputError> {
        let mut buf = [0u8];
        self.read_exact(&mut buf[..])?;
        Ok(buf[0])
    }

    /// Read `len` bytes into a fresh buffer.
    ///
    /// The buffer is only allocated once the bytes are known to be there, so an untrusted length
    /// prefix cannot force a large allocation.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, InputError> {
        let available = self.available();
        if len > available {
            return Err(InputError::Incomplete {
                needed: len,
                available,
            });
        }
        let mut raw = vec![0u8; len];
        self.read_exact(&mut raw[..])?;
        Ok(raw)
    }
}

impl<I> ByteInput for &mut I
where
    I: ByteInput + ?Sized,
{
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), InputError> {
        (**self).read_exact(buf)
    }

    fn available(&self) -> usize {
        (**self).available()
    }

    fn require(&mut self, len: usize) -> Result<(), InputError> {
        (**self).require(len)
    }

    fn read_u8(&mut self) -> Result<u8, InputError> {
        (**self).read_u8()
    }

    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, InputError> {
        (**self).read_vec(len)
    }
}

impl ByteInput for &[u8] {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), InputError> {
        if buf.len() > self.len() {
            return Err(InputError::Incomplete {
                needed: buf.len(),
                available: self.len(),
            });
        }
        let (head, tail) = self.split_at(buf.len());
        buf.copy_from_slice(head);
        *self = tail;
        Ok(())
    }

    fn available(&self) -> usize {
        self.len()
    }
}

/// Reads from the unread region of a [`ByteWindow`], advancing its cursor.
pub struct WindowInput<'w> {
    window: &'w mut ByteWindow,
}

impl<'w> WindowInput<'w> {
    pub fn new(window: &'w mut ByteWindow) -> Self {
        Self { window }
    }
}

impl ByteInput for WindowInput<'_> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), InputError> {
        if self.window.take_into(buf) {
            Ok(())
        } else {
            Err(InputError::Incomplete {
                needed: buf.len(),
                available: self.window.readable_bytes(),
            })
        }
    }

    fn available(&self) -> usize {
        self.window.readable_bytes()
    }
}

/// Byte allowance for a single object.
///
/// A budget belongs to exactly one decode attempt and starts at zero. Reading exactly `limit`
/// bytes is allowed; the first read that would go past it exhausts the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBudget {
    limit: usize,
    consumed: usize,
    exhausted: bool,
}

impl SizeBudget {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            consumed: 0,
            exhausted: false,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Bytes that may still be read.
    pub fn remaining(&self) -> usize {
        if self.exhausted {
            0
        } else {
            self.limit - self.consumed
        }
    }

    /// Fail if reading `len` more bytes would exceed the limit. Once failed, always fails.
    pub fn check(&mut self, len: usize) -> Result<(), InputError> {
        if self.exhausted || len > self.limit - self.consumed {
            self.exhausted = true;
            return Err(InputError::TooLarge { limit: self.limit });
        }
        Ok(())
    }

    fn record(&mut self, len: usize) {
        self.consumed += len;
    }
}

/// Decorator that enforces a [`SizeBudget`] over another [`ByteInput`].
///
/// The budget is checked before delegating, so an oversized read never touches the inner input.
pub struct BoundedInput<I> {
    inner: I,
    budget: SizeBudget,
}

impl<I> BoundedInput<I> {
    pub fn new(inner: I, limit: usize) -> Self {
        Self {
            inner,
            budget: SizeBudget::new(limit),
        }
    }

    pub fn budget(&self) -> &SizeBudget {
        &self.budget
    }

    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I> ByteInput for BoundedInput<I>
where
    I: ByteInput,
{
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), InputError> {
        self.budget.check(buf.len())?;
        self.inner.read_exact(buf)?;
        self.budget.record(buf.len());
        Ok(())
    }

    fn available(&self) -> usize {
        self.inner.available()
    }

    fn require(&mut self, len: usize) -> Result<(), InputError> {
        self.budget.check(len)?;
        self.inner.require(len)
    }

    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, InputError> {
        self.budget.check(len)?;
        let raw = self.inner.read_vec(len)?;
        self.budget.record(len);
        Ok(raw)
    }
}
