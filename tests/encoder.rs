//! Encoder behaviour, including decode/encode round trips.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use rowbind::{row, Decoder, Encoder, Error, Header, Record, Row};
use std::collections::{HashMap, VecDeque};

fn encoder() -> Encoder<Vec<Row>> {
    Encoder::new(Vec::new())
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Simple {
    #[rowbind(column = "str")]
    string_val: String,
    #[rowbind(column = "n")]
    int_val: i64,
}

#[derive(Debug, Default, PartialEq, Record)]
struct SimplePointer {
    #[rowbind(column = "str,omitempty")]
    string_val: Option<String>,
    #[rowbind(column = "n")]
    int_val: i64,
}

fn simple() -> Simple {
    Simple {
        string_val: "this is a string".to_string(),
        int_val: 12345,
    }
}

#[test]
fn test_encode_derives_header() {
    let mut encoder = encoder();
    encoder.encode(&simple()).unwrap();
    assert_eq!(encoder.header().unwrap().names(), &["str", "n"]);
    assert_eq!(encoder.into_inner(), vec![row(["this is a string", "12345"])]);
}

#[test]
fn test_mutable_and_shared_handles_both_encode() {
    let mut value = simple();
    let mut encoder = encoder();
    encoder.encode(&value).unwrap();
    encoder.encode(&mut value).unwrap();
    assert_eq!(encoder.into_inner().len(), 2);
}

#[test]
fn test_explicit_header_order() {
    let mut encoder = encoder().with_header(Header::new(["n", "str"]).unwrap());
    encoder.write_header().unwrap();
    encoder.encode(&simple()).unwrap();
    assert_eq!(
        encoder.into_inner(),
        vec![row(["n", "str"]), row(["12345", "this is a string"])]
    );
}

#[test]
fn test_header_subset() {
    let mut encoder = encoder()
        .with_header(Header::new(["n"]).unwrap())
        .with_allow_missing_columns(true);
    encoder.encode(&simple()).unwrap();
    assert_eq!(encoder.into_inner(), vec![row(["12345"])]);
}

#[test]
fn test_header_unexpected_subset() {
    let mut encoder = encoder().with_header(Header::new(["n"]).unwrap());
    let err = encoder.encode(&simple()).unwrap_err();
    assert!(matches!(err, Error::MissingColumn { ref column } if column == "str"));
    assert!(encoder.into_inner().is_empty());
}

#[test]
fn test_optional_values_and_nil() {
    let mut encoder = encoder();
    encoder
        .encode(&SimplePointer {
            string_val: Some("I'm a string".to_string()),
            int_val: 12345,
        })
        .unwrap();
    encoder
        .encode(&SimplePointer {
            string_val: None,
            int_val: 1,
        })
        .unwrap();
    assert_eq!(
        encoder.into_inner(),
        vec![row(["I'm a string", "12345"]), row(["", "1"])]
    );

    let mut encoder = Encoder::new(Vec::new()).with_nil_value(" --");
    encoder.encode(&SimplePointer::default()).unwrap();
    assert_eq!(encoder.into_inner(), vec![row([" --", "0"])]);
}

#[test]
fn test_string_map_follows_header() {
    let map = HashMap::from([
        ("str".to_string(), "I'm a string!".to_string()),
        ("n".to_string(), "12345".to_string()),
    ]);

    let mut encoder = encoder();
    assert!(matches!(encoder.encode(&map), Err(Error::MissingHeader)));

    let mut encoder = encoder.with_header(Header::new(["str", "n", "extra"]).unwrap());
    encoder.encode(&map).unwrap();
    assert_eq!(encoder.into_inner(), vec![row(["I'm a string!", "12345", ""])]);
}

#[derive(Debug, Default, Record)]
struct Floats {
    #[rowbind(column = "a")]
    a: f64,
    #[rowbind(column = "b", format = "%9.2f")]
    b: f64,
    #[rowbind(column = "c", precision = "5")]
    c: f64,
}

#[test]
fn test_float_rendering() {
    let mut encoder = encoder();
    let row = encoder
        .to_row(&Floats {
            a: 0.0000005,
            b: 1234567890.1234567,
            c: 1234567890.1234567,
        })
        .unwrap();
    assert_eq!(row.join(","), "0.0000005,1234567890.12,1234567890.12346");
}

#[derive(Debug, Default, Record)]
struct BadPrecision {
    #[rowbind(column = "c", precision = "Z")]
    a: f64,
}

#[derive(Debug, Default, Record)]
struct BadPattern {
    #[rowbind(column = "a", format = "%d")]
    a: f64,
}

#[derive(Debug, Default, Record)]
struct BadBase {
    #[rowbind(column = "a", base = "z")]
    a: i32,
}

#[test]
fn test_malformed_metadata() {
    let err = encoder().encode(&BadPrecision::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidFloatPrecision { ref precision, .. } if precision == "Z"));

    let err = encoder().encode(&BadPattern::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidFloatFormat { ref format, .. } if format == "%d"));

    let err = encoder().encode(&BadBase::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidIntBase { .. }));
}

#[derive(Debug, Default, PartialEq, Record)]
struct Times {
    #[rowbind(column = "a")]
    a: DateTime<Utc>,
    #[rowbind(column = "b", format = "%Y-%m-%d")]
    b: DateTime<Utc>,
}

#[test]
fn test_time_rendering() {
    let at = Utc.with_ymd_and_hms(2019, 3, 9, 0, 0, 0).unwrap();
    let row = encoder().to_row(&Times { a: at, b: at }).unwrap();
    assert_eq!(row.join(","), "2019-03-09T00:00:00Z,2019-03-09");
}

#[derive(Debug, Default, Record)]
struct Offset {
    #[rowbind(column = "at")]
    at: DateTime<FixedOffset>,
}

#[test]
fn test_time_keeps_offset() {
    let at = FixedOffset::east_opt(-6 * 3600)
        .unwrap()
        .with_ymd_and_hms(2019, 3, 9, 0, 0, 0)
        .unwrap();
    let row = encoder().to_row(&Offset { at }).unwrap();
    assert_eq!(row, vec!["2019-03-09T00:00:00-06:00"]);
}

#[derive(Debug, Default, Record)]
struct InvalidSlice {
    #[rowbind(column = "a")]
    a: Vec<String>,
}

#[test]
fn test_unsupported_field_type() {
    let err = encoder().encode(&InvalidSlice::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidDestinationType { ref field, .. } if field == "a"));
}

#[derive(Debug, Default, PartialEq, Record)]
struct AllKinds {
    #[rowbind(column = "s")]
    s: String,
    #[rowbind(column = "flag")]
    flag: bool,
    #[rowbind(column = "i8")]
    i8: i8,
    #[rowbind(column = "i16")]
    i16: i16,
    #[rowbind(column = "i32")]
    i32: i32,
    #[rowbind(column = "i64")]
    i64: i64,
    #[rowbind(column = "isize")]
    isize: isize,
    #[rowbind(column = "u8")]
    u8: u8,
    #[rowbind(column = "u16")]
    u16: u16,
    #[rowbind(column = "u32")]
    u32: u32,
    #[rowbind(column = "u64")]
    u64: u64,
    #[rowbind(column = "usize")]
    usize: usize,
    #[rowbind(column = "f32")]
    f32: f32,
    #[rowbind(column = "f64")]
    f64: f64,
    #[rowbind(column = "at")]
    at: DateTime<Utc>,
    #[rowbind(column = "maybe,omitempty")]
    maybe: Option<i32>,
}

fn round_trip<R: Record + Default>(value: &R) -> R {
    let mut encoder = Encoder::new(Vec::new());
    let row = encoder.to_row(value).unwrap();
    let header = encoder.header().cloned().unwrap();

    let mut decoder = Decoder::new(VecDeque::from(vec![row])).with_header(header);
    let mut decoded = R::default();
    decoder.decode(&mut decoded).unwrap();
    decoded
}

#[test]
fn test_round_trip_every_scalar_kind() {
    let value = AllKinds {
        s: "text, with comma".to_string(),
        flag: true,
        i8: -8,
        i16: -16,
        i32: -32,
        i64: -64,
        isize: -1,
        u8: 8,
        u16: 16,
        u32: 32,
        u64: u64::MAX,
        usize: 7,
        f32: 0.1,
        f64: -2.5e-7,
        at: Utc.with_ymd_and_hms(2021, 12, 31, 23, 59, 59).unwrap(),
        maybe: Some(-4),
    };
    assert_eq!(round_trip(&value), value);

    let empty = AllKinds {
        maybe: None,
        ..Default::default()
    };
    assert_eq!(round_trip(&empty), empty);
}

#[derive(Debug, Default, PartialEq, Record)]
struct Hex {
    #[rowbind(column = "i8", base = "16")]
    i8: i8,
    #[rowbind(column = "i16", base = "16")]
    i16: i16,
    #[rowbind(column = "i32", base = "16")]
    i32: i32,
    #[rowbind(column = "i64", base = "16")]
    i64: i64,
    #[rowbind(column = "u8", base = "16")]
    u8: u8,
    #[rowbind(column = "u16", base = "16")]
    u16: u16,
    #[rowbind(column = "u32", base = "16")]
    u32: u32,
    #[rowbind(column = "u64", base = "16")]
    u64: u64,
}

#[test]
fn test_base16_round_trip_across_ranges() {
    let cases = [
        Hex {
            i8: i8::MIN,
            i16: i16::MIN,
            i32: i32::MIN,
            i64: i64::MIN,
            ..Default::default()
        },
        Hex {
            i8: i8::MAX,
            i16: i16::MAX,
            i32: i32::MAX,
            i64: i64::MAX,
            u8: u8::MAX,
            u16: u16::MAX,
            u32: u32::MAX,
            u64: u64::MAX,
        },
        Hex {
            i8: -1,
            i16: -1,
            i32: -1,
            i64: -1,
            u8: 1,
            u16: 1,
            u32: 1,
            u64: 1,
        },
    ];
    for case in &cases {
        assert_eq!(&round_trip(case), case);
    }

    let row = encoder().to_row(&cases[0]).unwrap();
    assert_eq!(row[0], "-80");
    assert_eq!(row[3], "-8000000000000000");
}

#[test]
fn test_precision_round_trip_rounds() {
    let decoded = round_trip(&Floats {
        a: 1.0,
        b: 1234567890.1234567,
        c: 1234567890.1234567,
    });
    assert_eq!(decoded.b, 1234567890.12);
    assert_eq!(decoded.c, 1234567890.12346);
}

#[test]
fn test_derived_header_persists_until_replaced() {
    let mut encoder = encoder();
    encoder.encode(&simple()).unwrap();
    encoder.encode(&SimplePointer::default()).unwrap();

    encoder.set_header(Header::new(["n"]).unwrap());
    let err = encoder.encode(&simple()).unwrap_err();
    assert!(matches!(err, Error::MissingColumn { .. }));

    assert_eq!(
        encoder.into_inner(),
        vec![row(["this is a string", "12345"]), row(["", "0"])]
    );
}
