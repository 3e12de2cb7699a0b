/// Byte value a peer may send alone at end of stream to signal a reset with no object attached.
pub const STREAM_RESET_MARKER: u8 = 0x79;

/// Default upper bound on the serialized size of one object (1 MiB).
pub const DEFAULT_MAX_OBJECT_SIZE: usize = 1024 * 1024;

/// Upper bound on the bytes one object may occupy on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
pub enum ObjectSizeLimit {
    /// Objects larger than this many bytes fail with a frame-too-long error.
    Bounded(usize),
    /// No budget at all.
    ///
    /// Only use this when the peer is trusted and its objects are known to stay small: an
    /// unlimited decoder lets any sender exhaust memory.
    Unlimited,
}

impl ObjectSizeLimit {
    pub fn as_bytes(&self) -> Option<usize> {
        match self {
            Self::Bounded(limit) => Some(*limit),
            Self::Unlimited => None,
        }
    }
}

impl Default for ObjectSizeLimit {
    fn default() -> Self {
        Self::Bounded(DEFAULT_MAX_OBJECT_SIZE)
    }
}

/// Decoder configuration.
/// Build with `DecoderConfig::builder().foo(...).build()`, or deserialize it.
#[derive(Debug, Clone, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum serialized size of a single object.
    pub max_object_size: ObjectSizeLimit,

    /// Byte silently consumed when it is the only thing left at end of stream.
    /// `None` disables the special case.
    pub reset_marker: Option<u8>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_object_size: ObjectSizeLimit::default(),
            reset_marker: Some(STREAM_RESET_MARKER),
        }
    }
}

impl DecoderConfig {
    /// Start building a config with the defaults:
    /// - max_object_size = 1 MiB
    /// - reset_marker    = 0x79
    pub fn builder() -> DecoderConfigBuilder {
        DecoderConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Fluent builder for `DecoderConfig`.
#[derive(Debug, Clone)]
pub struct DecoderConfigBuilder {
    config: DecoderConfig,
}

impl DecoderConfigBuilder {
    pub fn max_object_size(mut self, bytes: usize) -> Self {
        self.config.max_object_size = ObjectSizeLimit::Bounded(bytes);
        self
    }

    pub fn unlimited(mut self) -> Self {
        self.config.max_object_size = ObjectSizeLimit::Unlimited;
        self
    }

    pub fn reset_marker(mut self, marker: Option<u8>) -> Self {
        self.config.reset_marker = marker;
        self
    }

    pub fn build(self) -> DecoderConfig {
        self.config
    }
}
