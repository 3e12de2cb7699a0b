use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::input::ByteInput;
use crate::session::{ObjectReader, ReaderProvider};

/// Longest valid varint encoding of a `u64`.
const MAX_VARINT_BYTES: u64 = 10;

/// SIBOR deserializer reading from any [`ByteInput`].
///
/// Running out of input surfaces as [`Error::Input`], which the decoder turns into a replay.
pub struct Deserializer<R> {
    input: R,
}

impl<R> Deserializer<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    pub fn into_inner(self) -> R {
        self.input
    }
}

impl<R> Deserializer<R>
where
    R: ByteInput,
{
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.input.read_u8()?)
    }

    pub fn read_uvarint(&mut self) -> Result<u64> {
        let mut v = 0u64;
        for i in 0..MAX_VARINT_BYTES {
            let b = self.read_u8()? as u64;
            v |= (b & 0x7f) << (i * 7);
            if b < 0x80 {
                return Ok(v);
            }
        }

        Err(Error::Invalid("variable integer encoding".into()))
    }

    pub fn read_ivarint(&mut self) -> Result<i64> {
        let unsigned = self.read_uvarint()?;
        let signed = (unsigned >> 1) as i64;
        Ok(if unsigned & 0x1 > 0 { !signed } else { signed })
    }

    pub fn read_float(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_uvarint()?))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            1 => Ok(true),
            0 => Ok(false),
            _ => Err(Error::Invalid("boolean encoding".into())),
        }
    }

    fn read_len(&mut self) -> Result<usize> {
        let len64 = self.read_uvarint()?;
        usize::try_from(len64).map_err(|e| Error::Generic(e.to_string()))
    }

    /// Read a length-prefixed byte string. The length is validated before any allocation.
    pub fn read_bytes(&mut self, min: usize, max: usize) -> Result<Vec<u8>> {
        let len = self.read_len()?;
        if len < min || len > max {
            return Err(Error::Invalid(format!("length: {len}")));
        }
        Ok(self.input.read_vec(len)?)
    }

    pub fn read_string(&mut self, min: usize, max: usize) -> Result<String> {
        let raw = self.read_bytes(min, max)?;
        String::from_utf8(raw).map_err(|e| Error::Generic(e.to_string()))
    }
}

/// Fields of a struct, tuple or variant: a fixed count known to the visitor.
struct Positional<'a, R> {
    de: &'a mut Deserializer<R>,
}

impl<'de, 'a, R> ::serde::de::SeqAccess<'de> for Positional<'a, R>
where
    R: ByteInput,
{
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: ::serde::de::DeserializeSeed<'de>,
    {
        seed.deserialize(&mut *self.de).map(Some)
    }
}

/// Elements of a sequence with a length prefix.
struct Counted<'a, R> {
    remaining: usize,
    de: &'a mut Deserializer<R>,
}

impl<'de, 'a, R> ::serde::de::SeqAccess<'de> for Counted<'a, R>
where
    R: ByteInput,
{
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: ::serde::de::DeserializeSeed<'de>,
    {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        seed.deserialize(&mut *self.de).map(Some)
    }
}

impl<'de, 'a, R> ::serde::de::EnumAccess<'de> for Positional<'a, R>
where
    R: ByteInput,
{
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: ::serde::de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(&mut *self.de)?;
        Ok((variant, self))
    }
}

impl<'de, 'a, R> ::serde::de::VariantAccess<'de> for Positional<'a, R>
where
    R: ByteInput,
{
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: ::serde::de::DeserializeSeed<'de>,
    {
        seed.deserialize(self.de)
    }

    fn tuple_variant<V>(self, _: usize, v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_seq(self)
    }

    fn struct_variant<V>(self, _: &'static [&'static str], v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_seq(self)
    }
}

macro_rules! forward_to {
    ($($method:ident => $target:ident),* $(,)?) => {
        $(
            fn $method<V>(self, v: V) -> Result<V::Value>
            where
                V: ::serde::de::Visitor<'de>,
            {
                self.$target(v)
            }
        )*
    };
}

macro_rules! unsupported {
    ($($method:ident => $what:literal),* $(,)?) => {
        $(
            fn $method<V>(self, _: V) -> Result<V::Value>
            where
                V: ::serde::de::Visitor<'de>,
            {
                Err(Error::Unsupported(concat!("deserialize ", $what).into()))
            }
        )*
    };
}

impl<'de, 'a, R> ::serde::Deserializer<'de> for &'a mut Deserializer<R>
where
    R: ByteInput,
{
    type Error = Error;

    forward_to! {
        deserialize_i8 => deserialize_i64,
        deserialize_i16 => deserialize_i64,
        deserialize_i32 => deserialize_i64,
        deserialize_u8 => deserialize_u64,
        deserialize_u16 => deserialize_u64,
        deserialize_u32 => deserialize_u64,
        deserialize_f32 => deserialize_f64,
        deserialize_identifier => deserialize_u64,
    }

    unsupported! {
        deserialize_any => "any",
        deserialize_char => "char",
        deserialize_str => "&str",
        deserialize_bytes => "&[u8]",
        deserialize_option => "option",
        deserialize_map => "map",
        deserialize_ignored_any => "any (ignored)",
    }

    fn deserialize_bool<V>(self, v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_bool(self.read_bool()?)
    }

    fn deserialize_i64<V>(self, v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_i64(self.read_ivarint()?)
    }

    fn deserialize_u64<V>(self, v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_u64(self.read_uvarint()?)
    }

    fn deserialize_f64<V>(self, v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_f64(self.read_float()?)
    }

    fn deserialize_string<V>(self, v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_string(self.read_string(0, usize::MAX)?)
    }

    fn deserialize_byte_buf<V>(self, v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_byte_buf(self.read_bytes(0, usize::MAX)?)
    }

    fn deserialize_unit<V>(self, v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _: &'static str, v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _: &'static str, v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_seq(Positional { de: self })
    }

    fn deserialize_seq<V>(self, v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        // every element is charged at least one byte, so a hostile count over zero-width
        // elements stays within the budget and the buffered input
        let remaining = self.read_len()?;
        self.input.require(remaining)?;
        v.visit_seq(Counted {
            remaining,
            de: self,
        })
    }

    fn deserialize_tuple<V>(self, _: usize, v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_seq(Positional { de: self })
    }

    fn deserialize_tuple_struct<V>(self, _: &'static str, _: usize, v: V) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_seq(Positional { de: self })
    }

    fn deserialize_struct<V>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        v: V,
    ) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_seq(Positional { de: self })
    }

    fn deserialize_enum<V>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        v: V,
    ) -> Result<V::Value>
    where
        V: ::serde::de::Visitor<'de>,
    {
        v.visit_enum(Positional { de: self })
    }
}

/// [`ObjectReader`] that reads one SIBOR-encoded `T` per attempt.
pub struct SiborReader<T> {
    closed: bool,
    _item: PhantomData<fn() -> T>,
}

impl<T> SiborReader<T> {
    pub fn new() -> Self {
        Self {
            closed: false,
            _item: PhantomData,
        }
    }
}

impl<T> Default for SiborReader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObjectReader for SiborReader<T>
where
    T: ::serde::de::DeserializeOwned,
{
    type Item = T;

    fn start(&mut self, _: &mut dyn ByteInput) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        Ok(())
    }

    fn read_object(&mut self, input: &mut dyn ByteInput) -> Result<T> {
        T::deserialize(&mut Deserializer::new(input))
    }

    fn finish(&mut self, _: &mut dyn ByteInput) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Hands out a fresh [`SiborReader`] for every attempt, whatever the connection.
pub struct SiborProvider<T> {
    _item: PhantomData<fn() -> T>,
}

impl<T> SiborProvider<T> {
    pub fn new() -> Self {
        Self { _item: PhantomData }
    }
}

impl<T> Default for SiborProvider<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SiborProvider<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> ::std::fmt::Debug for SiborProvider<T> {
    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        f.debug_struct("SiborProvider")
            .field("item", &::std::any::type_name::<T>())
            .finish()
    }
}

impl<C, T> ReaderProvider<C> for SiborProvider<T>
where
    C: ?Sized,
    T: ::serde::de::DeserializeOwned,
{
    type Reader = SiborReader<T>;

    fn reader(&self, _: &C) -> Result<SiborReader<T>> {
        Ok(SiborReader::new())
    }
}
