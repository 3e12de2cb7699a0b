use crate::error::Result;
use crate::input::ByteInput;

/// An object deserialization engine driven through a start/read/finish/close lifecycle.
///
/// The engine decides how many bytes make up one object. It must not keep anything it read
/// between attempts: a fresh instance is used for every attempt and an abandoned attempt is
/// replayed from scratch.
pub trait ObjectReader {
    type Item;

    /// Prepare to read from `input`.
    fn start(&mut self, input: &mut dyn ByteInput) -> Result<()>;

    /// Read exactly one object.
    fn read_object(&mut self, input: &mut dyn ByteInput) -> Result<Self::Item>;

    /// Complete the read started by [`ObjectReader::start`].
    fn finish(&mut self, input: &mut dyn ByteInput) -> Result<()>;

    /// Release whatever the engine holds. Called exactly once per attempt.
    fn close(&mut self) -> Result<()>;
}

/// Supplies an [`ObjectReader`] for a connection, once per decode attempt.
pub trait ReaderProvider<C: ?Sized> {
    type Reader: ObjectReader;

    fn reader(&self, ctx: &C) -> Result<Self::Reader>;
}

impl<C, R, F> ReaderProvider<C> for F
where
    C: ?Sized,
    R: ObjectReader,
    F: Fn(&C) -> Result<R>,
{
    type Reader = R;

    fn reader(&self, ctx: &C) -> Result<R> {
        self(ctx)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Started,
    Finished,
    Closed,
}

/// One decode attempt's hold on an [`ObjectReader`].
///
/// The reader is closed exactly once: explicitly through [`Session::close`], or when the
/// session is dropped on any other exit path (early return, `?`, panic).
pub struct Session<R>
where
    R: ObjectReader,
{
    reader: R,
    state: SessionState,
}

impl<R> Session<R>
where
    R: ObjectReader,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn start(&mut self, input: &mut dyn ByteInput) -> Result<()> {
        debug_assert_eq!(self.state, SessionState::Idle);
        self.reader.start(input)?;
        self.state = SessionState::Started;
        Ok(())
    }

    pub fn read_object(&mut self, input: &mut dyn ByteInput) -> Result<R::Item> {
        debug_assert_eq!(self.state, SessionState::Started);
        self.reader.read_object(input)
    }

    pub fn finish(&mut self, input: &mut dyn ByteInput) -> Result<()> {
        debug_assert_eq!(self.state, SessionState::Started);
        self.reader.finish(input)?;
        self.state = SessionState::Finished;
        Ok(())
    }

    /// Close now and report the outcome. A second close is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;
        self.reader.close()
    }
}

impl<R> Drop for Session<R>
where
    R: ObjectReader,
{
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            ::tracing::error!(error = %err, "failed to close object reader");
        }
    }
}
