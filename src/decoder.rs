use crate::config::{DecoderConfig, ObjectSizeLimit};
use crate::error::{Error, InputError, Result};
use crate::input::{BoundedInput, ByteInput, WindowInput};
use crate::session::{ObjectReader, ReaderProvider, Session};
use crate::window::ByteWindow;

/// Result of one decode attempt, as seen by the pipeline.
#[derive(Debug)]
pub enum DecodeOutcome<T> {
    /// One object was read and the cursor moved past it.
    Produced(T),
    /// Nothing to produce and nothing wrong. Only returned at end of stream.
    Empty,
    /// The window ends inside an object. The cursor is back where the attempt started.
    InsufficientData,
    /// The object exceeds the size budget.
    TooLarge { limit: usize },
    /// The object reader failed for any other reason.
    Failed(Error),
}

impl<T> DecodeOutcome<T> {
    pub fn is_produced(&self) -> bool {
        matches!(self, Self::Produced(_))
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, Self::InsufficientData)
    }

    /// The produced object, if any.
    pub fn produced(self) -> Option<T> {
        match self {
            Self::Produced(item) => Some(item),
            _ => None,
        }
    }
}

/// Decodes one object at a time from a [`ByteWindow`] that may not hold a whole object yet.
///
/// Every call is a self-contained attempt: a fresh reader is taken from the provider, the
/// window is read through a size budget, and the reader is closed before returning. When the
/// window runs dry the attempt is abandoned and the cursor rewound, so the next call after more
/// bytes arrive replays it from the start.
#[derive(Debug, Clone)]
pub struct ObjectDecoder<P> {
    provider: P,
    config: DecoderConfig,
}

impl<P> ObjectDecoder<P> {
    pub fn new(provider: P, config: DecoderConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Decode the next object from `window`.
    ///
    /// The cursor only moves when an object is produced.
    pub fn decode<C>(
        &self,
        ctx: &C,
        window: &mut ByteWindow,
    ) -> DecodeOutcome<<P::Reader as ObjectReader>::Item>
    where
        C: ?Sized,
        P: ReaderProvider<C>,
    {
        let checkpoint = window.reader_index();
        ::tracing::trace!(
            readable = window.readable_bytes(),
            limit = ?self.config.max_object_size,
            "decode attempt"
        );

        let err = match self.attempt(ctx, window) {
            Ok(item) => return DecodeOutcome::Produced(item),
            Err(err) => err,
        };
        window.set_reader_index(checkpoint);

        match err {
            Error::Input(InputError::Incomplete { needed, available }) => {
                ::tracing::debug!(needed, available, "not enough data, replaying later");
                DecodeOutcome::InsufficientData
            }
            Error::Input(InputError::TooLarge { limit }) => {
                ::tracing::warn!(limit, "object exceeds size limit");
                DecodeOutcome::TooLarge { limit }
            }
            other => DecodeOutcome::Failed(other),
        }
    }

    /// Decode what is left once the stream is closing and nothing more will arrive.
    ///
    /// An empty remainder, or a lone reset marker, yields [`DecodeOutcome::Empty`]. Anything
    /// else goes through [`ObjectDecoder::decode`]; the caller must treat
    /// [`DecodeOutcome::InsufficientData`] as final here.
    pub fn decode_last<C>(
        &self,
        ctx: &C,
        window: &mut ByteWindow,
    ) -> DecodeOutcome<<P::Reader as ObjectReader>::Item>
    where
        C: ?Sized,
        P: ReaderProvider<C>,
    {
        match window.readable_bytes() {
            0 => return DecodeOutcome::Empty,
            1 if self.config.reset_marker.is_some()
                && window.peek_u8() == self.config.reset_marker =>
            {
                window.skip_bytes(1);
                ::tracing::debug!("consumed trailing stream reset marker");
                return DecodeOutcome::Empty;
            }
            _ => {}
        }
        self.decode(ctx, window)
    }

    fn attempt<C>(
        &self,
        ctx: &C,
        window: &mut ByteWindow,
    ) -> Result<<P::Reader as ObjectReader>::Item>
    where
        C: ?Sized,
        P: ReaderProvider<C>,
    {
        let mut session = Session::new(self.provider.reader(ctx)?);

        let mut window_input = WindowInput::new(window);
        let mut bounded;
        let input: &mut dyn ByteInput = match self.config.max_object_size {
            ObjectSizeLimit::Bounded(limit) => {
                bounded = BoundedInput::new(window_input, limit);
                &mut bounded
            }
            ObjectSizeLimit::Unlimited => &mut window_input,
        };

        session.start(input)?;
        let item = session.read_object(input)?;
        session.finish(input)?;
        Ok(item)
    }
}
