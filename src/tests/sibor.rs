use super::support::{arbitrary_value, Event};
use crate::error::{Error, InputError};

macro_rules! assert_round_trip {
    ($t:ty) => {
        for _ in 0..200 {
            let original: $t = arbitrary_value::<$t>();
            assert_round_trip!(@DO_ASSERT $t, original);
        }
    };

    ($t:ty, $($val:expr),*) => {
        $({
            let specific: $t = $val;
            assert_round_trip!(@DO_ASSERT $t, specific);
        })*
    };

    (@DO_ASSERT $t:ty, $given:ident) => {{
        let expected_size = crate::encoded_size(&$given).unwrap();
        let encoded_bytes = crate::to_bytes(&$given).unwrap();
        assert_eq!(expected_size, encoded_bytes.len());
        let decoded = crate::from_bytes::<$t>(&encoded_bytes).unwrap();
        assert_eq!($given, decoded);
    }};
}

#[test]
fn test_primitive_round_trips() {
    assert_round_trip!(u64, u64::MIN, u64::MAX);
    assert_round_trip!(i64, i64::MIN, 0, i64::MAX);
    assert_round_trip!(i8, i8::MIN, -1, i8::MAX);
    assert_round_trip!(f64, f64::MIN, 0.0, f64::MAX);
    assert_round_trip!(bool, true, false);
    assert_round_trip!(String, "".into());
    assert_round_trip!(Vec<i32>, vec![], vec![i32::MIN, 0, i32::MAX]);
}

#[test]
fn test_event_round_trips() {
    assert_round_trip!(
        Event,
        Event::Ping,
        Event::Text("".into()),
        Event::Move { x: -1, y: 1 },
        Event::Blob(vec![1, 2, 3]),
        Event::Batch(vec![], true)
    );
    assert_round_trip!(Event);
    assert_round_trip!(Vec<Event>);
}

#[test]
fn test_struct_variant_fields_are_positional() {
    let encoded = crate::to_bytes(&Event::Move { x: -1, y: 1 }).unwrap();
    assert_eq!(encoded, vec![0x02, 0x01, 0x02]);
    assert_eq!(
        crate::from_bytes::<Event>(&encoded).unwrap(),
        Event::Move { x: -1, y: 1 }
    );
}

#[test]
fn test_encode_into_appends() {
    let mut buf = ::bytes::BytesMut::new();
    crate::encode_into(&Event::Ping, &mut buf).unwrap();
    crate::encode_into(&Event::Text("x".into()), &mut buf).unwrap();
    assert_eq!(&buf[..], &[0x00, 0x01, 0x01, b'x']);
}

#[test]
fn test_varint_layout() {
    assert_eq!(crate::to_bytes(&300u64).unwrap(), vec![0xac, 0x02]);
    assert_eq!(crate::to_bytes(&-1i64).unwrap(), vec![0x01]);
    assert_eq!(crate::to_bytes(&1i64).unwrap(), vec![0x02]);
}

#[test]
fn test_unsupported_types() {
    assert!(matches!(
        crate::to_bytes(&Some(1u8)),
        Err(Error::Unsupported(_))
    ));
    assert!(matches!(crate::to_bytes(&'c'), Err(Error::Unsupported(_))));
    assert!(matches!(
        crate::from_bytes::<Option<u8>>(&[0x00]),
        Err(Error::Unsupported(_))
    ));
}

#[test]
fn test_invalid_encodings() {
    assert!(matches!(
        crate::from_bytes::<bool>(&[0x02]),
        Err(Error::Invalid(_))
    ));
    assert!(matches!(
        crate::from_bytes::<u64>(&[0xff; 11]),
        Err(Error::Invalid(_))
    ));
    assert!(matches!(
        crate::from_bytes::<String>(&[0x02, 0xc3, 0x28]),
        Err(Error::Generic(_))
    ));
}

#[test]
fn test_short_input_reports_incomplete() {
    let err = crate::from_bytes::<String>(&[0x04, b'a', b'b']).unwrap_err();
    assert!(err.is_incomplete());
    assert!(matches!(
        err,
        Error::Input(InputError::Incomplete {
            needed: 4,
            available: 2
        })
    ));
}
