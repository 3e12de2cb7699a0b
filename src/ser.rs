use bytes::{BufMut, BytesMut};

use crate::error::{Error, Result};

/// Destination for encoded bytes.
pub trait Sink {
    fn put(&mut self, bytes: &[u8]);
}

impl Sink for BytesMut {
    fn put(&mut self, bytes: &[u8]) {
        self.put_slice(bytes);
    }
}

impl Sink for Vec<u8> {
    fn put(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl<S> Sink for &mut S
where
    S: Sink + ?Sized,
{
    fn put(&mut self, bytes: &[u8]) {
        (**self).put(bytes)
    }
}

/// Counts bytes instead of storing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct SizeCounter {
    pub written: usize,
}

impl Sink for SizeCounter {
    fn put(&mut self, bytes: &[u8]) {
        self.written += bytes.len();
    }
}

/// SIBOR serializer, used by peers to produce the frames this crate decodes.
pub struct Serializer<S> {
    sink: S,
}

impl<S> Serializer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

fn zigzag(v: i64) -> u64 {
    let unsigned = (v as u64) << 1;
    if v < 0 {
        !unsigned
    } else {
        unsigned
    }
}

fn len_u64(len: usize) -> Result<u64> {
    u64::try_from(len).map_err(|e| Error::Generic(e.to_string()))
}

impl<S> Serializer<S>
where
    S: Sink,
{
    pub fn write_u8(&mut self, v: u8) {
        self.sink.put(&[v]);
    }

    pub fn write_uvarint(&mut self, mut v: u64) {
        let mut buf = [0u8; 10];
        let mut n = 0;
        while v >= 0x80 {
            buf[n] = (v & 0x7f) as u8 | 0x80;
            v >>= 7;
            n += 1;
        }
        buf[n] = v as u8;
        self.sink.put(&buf[..=n]);
    }

    pub fn write_ivarint(&mut self, v: i64) {
        self.write_uvarint(zigzag(v))
    }

    pub fn write_float(&mut self, v: f64) {
        self.write_uvarint(v.to_bits())
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(v as u8)
    }

    pub fn write_bytes(&mut self, v: &[u8]) -> Result<()> {
        self.write_uvarint(len_u64(v.len())?);
        self.sink.put(v);
        Ok(())
    }
}

pub struct CollectionSerializer<'a, S> {
    remaining: usize,
    ser: &'a mut Serializer<S>,
}

impl<'a, S> ::serde::ser::SerializeSeq for CollectionSerializer<'a, S>
where
    S: Sink,
{
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized>(&mut self, value: &T) -> Result<()>
    where
        T: ::serde::Serialize,
    {
        if self.remaining == 0 {
            return Err(Error::Generic(
                "tried to serialize too many elements in collection".into(),
            ));
        }
        self.remaining -= 1;
        value.serialize(&mut *self.ser)
    }

    fn end(self) -> Result<()> {
        if self.remaining > 0 {
            return Err(Error::Generic(
                "serialized fewer elements than announced".into(),
            ));
        }
        Ok(())
    }
}

/// Writes fields back to back with no framing; the schema supplies the count.
pub struct FieldSerializer<'a, S> {
    ser: &'a mut Serializer<S>,
}

macro_rules! impl_field_serializer {
    ($($trait:ident :: $method:ident ($($skip:ty),*)),* $(,)?) => {
        $(
            impl<'a, S> ::serde::ser::$trait for FieldSerializer<'a, S>
            where
                S: Sink,
            {
                type Ok = ();
                type Error = Error;

                fn $method<T: ?Sized>(&mut self, $(_: $skip,)* value: &T) -> Result<()>
                where
                    T: ::serde::Serialize,
                {
                    value.serialize(&mut *self.ser)
                }

                fn end(self) -> Result<()> {
                    Ok(())
                }
            }
        )*
    };
}

impl_field_serializer! {
    SerializeTuple::serialize_element(),
    SerializeTupleStruct::serialize_field(),
    SerializeTupleVariant::serialize_field(),
    SerializeStruct::serialize_field(&'static str),
    SerializeStructVariant::serialize_field(&'static str),
}

impl<'a, S> ::serde::ser::Serializer for &'a mut Serializer<S>
where
    S: Sink,
{
    type Ok = ();
    type Error = Error;

    type SerializeSeq = CollectionSerializer<'a, S>;
    type SerializeTuple = FieldSerializer<'a, S>;
    type SerializeTupleStruct = FieldSerializer<'a, S>;
    type SerializeTupleVariant = FieldSerializer<'a, S>;
    type SerializeMap = ::serde::ser::Impossible<(), Error>;
    type SerializeStruct = FieldSerializer<'a, S>;
    type SerializeStructVariant = FieldSerializer<'a, S>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.write_bool(v);
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.write_ivarint(v);
        Ok(())
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.write_uvarint(v);
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.write_float(v);
        Ok(())
    }

    fn serialize_char(self, _: char) -> Result<()> {
        Err(Error::Unsupported("serialize char".into()))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.write_bytes(v.as_bytes())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        self.write_bytes(v)
    }

    fn serialize_none(self) -> Result<()> {
        Err(Error::Unsupported("serialize option".into()))
    }

    fn serialize_some<T: ?Sized>(self, _: &T) -> Result<()>
    where
        T: ::serde::Serialize,
    {
        Err(Error::Unsupported("serialize option".into()))
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(self, _: &'static str, index: u32, _: &'static str) -> Result<()> {
        self.serialize_u64(index as u64)
    }

    fn serialize_newtype_struct<T: ?Sized>(self, _: &'static str, value: &T) -> Result<()>
    where
        T: ::serde::Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized>(
        self,
        _: &'static str,
        index: u32,
        _: &'static str,
        value: &T,
    ) -> Result<()>
    where
        T: ::serde::Serialize,
    {
        self.write_uvarint(index as u64);
        value.serialize(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        let remaining = len.ok_or_else(|| Error::Unsupported("serialize seq (unsized)".into()))?;
        self.write_uvarint(len_u64(remaining)?);
        Ok(CollectionSerializer {
            remaining,
            ser: self,
        })
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple> {
        Ok(FieldSerializer { ser: self })
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(FieldSerializer { ser: self })
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        index: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.write_uvarint(index as u64);
        Ok(FieldSerializer { ser: self })
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Error::Unsupported("serialize map".into()))
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self::SerializeStruct> {
        Ok(FieldSerializer { ser: self })
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        index: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant> {
        self.write_uvarint(index as u64);
        Ok(FieldSerializer { ser: self })
    }
}
