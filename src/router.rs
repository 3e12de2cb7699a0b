use crate::decoder::DecodeOutcome;
use crate::error::{Error, Result};

/// The connection a decoder serves, as far as the decoder is concerned.
pub trait Connection {
    /// Tear the connection down.
    fn close(&mut self);
}

/// Handle a decode failure.
///
/// A frame-too-long error closes `conn` and is returned so the pipeline can report it. Every
/// other error is returned untouched for the pipeline's default handling.
pub fn route_error<C>(err: Error, conn: &mut C) -> Error
where
    C: Connection + ?Sized,
{
    if err.is_frame_too_long() {
        ::tracing::warn!(error = %err, "closing connection");
        conn.close();
    }
    err
}

/// Turn a [`DecodeOutcome`] into the pipeline's view: an object, nothing (yet), or an error.
///
/// `TooLarge` becomes [`Error::FrameTooLong`] and closes `conn`.
pub fn route_outcome<T, C>(outcome: DecodeOutcome<T>, conn: &mut C) -> Result<Option<T>>
where
    C: Connection + ?Sized,
{
    match outcome {
        DecodeOutcome::Produced(item) => Ok(Some(item)),
        DecodeOutcome::Empty | DecodeOutcome::InsufficientData => Ok(None),
        DecodeOutcome::TooLarge { limit } => {
            Err(route_error(Error::FrameTooLong { limit }, conn))
        }
        DecodeOutcome::Failed(err) => Err(route_error(err, conn)),
    }
}
