#![forbid(unsafe_code)]
//! # Replay-safe decoding of SIBOR objects from a byte stream.
//!
//! Bytes arrive on a connection in arbitrary chunks. This crate turns them back into discrete
//! objects while protecting the receiver against oversized input:
//!
//! - A [`ByteWindow`] holds what has been received so far.
//! - An [`ObjectDecoder`] makes one decode attempt at a time. When the window ends inside an
//!   object the attempt is abandoned, the cursor rewound, and [`DecodeOutcome::InsufficientData`]
//!   returned; the next call replays the attempt from scratch. Nothing read by an abandoned
//!   attempt is kept.
//! - Every attempt reads through a [`BoundedInput`], which fails with
//!   [`DecodeOutcome::TooLarge`] as soon as one object needs more than the configured number of
//!   bytes, before that memory is allocated.
//! - The object reader is obtained from a [`ReaderProvider`] and wrapped in a [`Session`] that
//!   closes it exactly once per attempt, on every exit path.
//! - [`router`] maps a size overflow to [`Error::FrameTooLong`] and closes the connection; other
//!   failures are passed through untouched.
//!
//! The default object format is SIBOR, a compact binary serde format that is not
//! self-describing: varint integers, length-prefixed strings and sequences, positional structs,
//! no options and no maps. [`StreamDecoder`] wires all of it together for callers that do not
//! have a pipeline of their own.
//!
//! ```
//! use sibor_stream::{Connection, DecoderConfig, SiborProvider, StreamDecoder};
//!
//! struct Peer;
//! impl Connection for Peer {
//!     fn close(&mut self) {}
//! }
//!
//! let frame = sibor_stream::to_bytes(&(7u32, String::from("hello"))).unwrap();
//! let mut decoder = StreamDecoder::new(SiborProvider::<(u32, String)>::new(), DecoderConfig::default());
//! let mut out = Vec::new();
//!
//! decoder.feed(&mut Peer, &frame[..3], &mut out).unwrap();
//! assert!(out.is_empty());
//! decoder.feed(&mut Peer, &frame[3..], &mut out).unwrap();
//! decoder.finish(&mut Peer, &mut out).unwrap();
//! assert_eq!(out, vec![(7, "hello".to_string())]);
//! ```

/// Decoder configuration.
pub mod config;
/// SIBOR deserialization and the default object reader.
pub mod de;
/// Single-object decode attempts over a byte window.
pub mod decoder;
/// Error types and functions.
pub mod error;
/// Byte inputs and the size budget.
pub mod input;
/// Failure routing towards the connection.
pub mod router;
/// SIBOR serialization.
pub mod ser;
/// Object reader lifecycle.
pub mod session;
/// Connection-level driver.
pub mod stream;
/// Received-bytes buffer.
pub mod window;

/// Tests for the crate.
#[cfg(test)]
mod tests;

pub use crate::config::{DecoderConfig, ObjectSizeLimit, STREAM_RESET_MARKER};
pub use crate::de::{Deserializer, SiborProvider, SiborReader};
pub use crate::decoder::{DecodeOutcome, ObjectDecoder};
pub use crate::error::{Error, InputError, Result};
pub use crate::input::{BoundedInput, ByteInput, SizeBudget, WindowInput};
pub use crate::router::{route_error, route_outcome, Connection};
pub use crate::ser::Serializer;
pub use crate::session::{ObjectReader, ReaderProvider, Session, SessionState};
pub use crate::stream::StreamDecoder;
pub use crate::window::ByteWindow;

/// Get the number of bytes required to encode a value.
pub fn encoded_size<V>(v: V) -> Result<usize>
where
    V: ::serde::Serialize,
{
    let mut ser = Serializer::new(ser::SizeCounter::default());
    v.serialize(&mut ser)?;
    Ok(ser.into_inner().written)
}

/// Append the encoding of a value to a buffer.
pub fn encode_into<V>(v: V, buf: &mut ::bytes::BytesMut) -> Result<()>
where
    V: ::serde::Serialize,
{
    v.serialize(&mut Serializer::new(buf))
}

/// Encode a value into a byte vector.
pub fn to_bytes<V>(v: V) -> Result<Vec<u8>>
where
    V: ::serde::Serialize,
{
    let mut ser = Serializer::new(Vec::<u8>::new());
    v.serialize(&mut ser)?;
    Ok(ser.into_inner())
}

/// Decode a value from any byte input.
pub fn from_input<V, R>(input: R) -> Result<V>
where
    V: ::serde::de::DeserializeOwned,
    R: ByteInput,
{
    V::deserialize(&mut Deserializer::new(input))
}

/// Decode a value from a byte slice.
pub fn from_bytes<V>(buf: &[u8]) -> Result<V>
where
    V: ::serde::de::DeserializeOwned,
{
    from_input(buf)
}
