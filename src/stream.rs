use crate::config::DecoderConfig;
use crate::decoder::{DecodeOutcome, ObjectDecoder};
use crate::error::{Error, Result};
use crate::router::{route_error, Connection};
use crate::session::{ObjectReader, ReaderProvider};
use crate::window::ByteWindow;

type Item<P, C> = <<P as ReaderProvider<C>>::Reader as ObjectReader>::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Open,
    Failed,
    Finished,
}

/// Drives an [`ObjectDecoder`] over one connection's byte stream.
///
/// Chunks are appended as they arrive and every complete object is handed out in stream order.
/// A fatal error ends the stream: the window is dropped and later calls fail with
/// [`Error::Closed`].
#[derive(Debug)]
pub struct StreamDecoder<P> {
    decoder: ObjectDecoder<P>,
    window: ByteWindow,
    state: StreamState,
}

impl<P> StreamDecoder<P> {
    pub fn new(provider: P, config: DecoderConfig) -> Self {
        Self::from_decoder(ObjectDecoder::new(provider, config))
    }

    pub fn from_decoder(decoder: ObjectDecoder<P>) -> Self {
        Self {
            decoder,
            window: ByteWindow::new(),
            state: StreamState::Open,
        }
    }

    pub fn decoder(&self) -> &ObjectDecoder<P> {
        &self.decoder
    }

    pub fn window(&self) -> &ByteWindow {
        &self.window
    }

    /// Bytes received but not yet part of a produced object.
    pub fn buffered(&self) -> usize {
        self.window.readable_bytes()
    }

    pub fn is_closed(&self) -> bool {
        self.state != StreamState::Open
    }

    /// Append `chunk` and push every object it completes onto `out`.
    ///
    /// Objects completed before a failure are still pushed.
    pub fn feed<C>(&mut self, conn: &mut C, chunk: &[u8], out: &mut Vec<Item<P, C>>) -> Result<()>
    where
        C: Connection,
        P: ReaderProvider<C>,
    {
        self.ensure_open()?;
        self.window.append(chunk);
        self.drain(conn, out)
    }

    /// End of stream: push the remaining objects onto `out` and close the decoder.
    ///
    /// Bytes left over that do not form an object, other than a lone reset marker, fail with
    /// [`Error::TruncatedStream`].
    pub fn finish<C>(&mut self, conn: &mut C, out: &mut Vec<Item<P, C>>) -> Result<()>
    where
        C: Connection,
        P: ReaderProvider<C>,
    {
        self.ensure_open()?;
        self.drain(conn, out)?;

        let remaining = self.window.readable_bytes();
        match self.decoder.decode_last(&*conn, &mut self.window) {
            DecodeOutcome::Produced(item) => out.push(item),
            DecodeOutcome::Empty => {}
            DecodeOutcome::InsufficientData => {
                return Err(self.fail(Error::TruncatedStream { remaining }, conn));
            }
            DecodeOutcome::TooLarge { limit } => {
                return Err(self.fail(Error::FrameTooLong { limit }, conn));
            }
            DecodeOutcome::Failed(err) => return Err(self.fail(err, conn)),
        }

        self.state = StreamState::Finished;
        self.window = ByteWindow::new();
        Ok(())
    }

    fn drain<C>(&mut self, conn: &mut C, out: &mut Vec<Item<P, C>>) -> Result<()>
    where
        C: Connection,
        P: ReaderProvider<C>,
    {
        while self.window.is_readable() {
            let marker = self.decoder.config().reset_marker;
            let lone_marker = self.window.readable_bytes() == 1 && self.window.peek_u8() == marker;
            if marker.is_some() && lone_marker {
                // a lone marker is either the end-of-stream reset or the start of the next
                // object; only `finish` or the next chunk can tell
                break;
            }
            let before = self.window.reader_index();
            match self.decoder.decode(&*conn, &mut self.window) {
                DecodeOutcome::Produced(item) => {
                    if self.window.reader_index() == before {
                        return Err(self.fail(
                            Error::Generic("decoded an object without consuming input".into()),
                            conn,
                        ));
                    }
                    out.push(item);
                    self.window.discard_read_bytes();
                }
                DecodeOutcome::InsufficientData | DecodeOutcome::Empty => break,
                DecodeOutcome::TooLarge { limit } => {
                    return Err(self.fail(Error::FrameTooLong { limit }, conn));
                }
                DecodeOutcome::Failed(err) => return Err(self.fail(err, conn)),
            }
        }
        Ok(())
    }

    fn fail<C>(&mut self, err: Error, conn: &mut C) -> Error
    where
        C: Connection,
    {
        self.state = StreamState::Failed;
        self.window = ByteWindow::new();
        route_error(err, conn)
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            StreamState::Open => Ok(()),
            StreamState::Failed | StreamState::Finished => Err(Error::Closed),
        }
    }
}
