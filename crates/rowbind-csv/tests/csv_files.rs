//! CSV source/sink tests against in-memory buffers and temp files.

use chrono::{DateTime, TimeZone, Utc};
use rowbind_core::{Error, Header, MarshalValue};
use rowbind_csv::{read_all, reader, write_all, writer, CsvSink, CsvSource};
use rowbind_derive::Record;
use std::io::Write;

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();
}

#[derive(Debug, Default, PartialEq, Record)]
#[rowbind(crate = "rowbind_core")]
struct Abc {
    #[rowbind(column = "a")]
    a: String,
    #[rowbind(column = "b")]
    b: i32,
    #[rowbind(column = "c")]
    c: f64,
}

#[derive(Debug, Default, PartialEq, Record)]
#[rowbind(crate = "rowbind_core")]
struct Simple {
    #[rowbind(column = "str")]
    string_val: String,
    #[rowbind(column = "n")]
    int_val: i64,
}

#[test]
fn test_decode_until_end_of_input() {
    init_logging();
    let mut decoder = reader("a,b,c\n1,2,3\n4,5,6".as_bytes());
    decoder.read_header().unwrap();

    let mut seen = Vec::new();
    loop {
        let mut value = Abc::default();
        match decoder.decode(&mut value) {
            Ok(()) => seen.push(value),
            Err(err) => {
                assert!(err.is_end_of_input(), "unexpected error: {err}");
                break;
            }
        }
    }

    assert_eq!(
        seen,
        vec![
            Abc {
                a: "1".to_string(),
                b: 2,
                c: 3.0
            },
            Abc {
                a: "4".to_string(),
                b: 5,
                c: 6.0
            },
        ]
    );
}

#[test]
fn test_read_all() {
    let rows: Vec<Simple> = read_all("n,str\n7,\"hello, world\"\n".as_bytes()).unwrap();
    assert_eq!(
        rows,
        vec![Simple {
            string_val: "hello, world".to_string(),
            int_val: 7
        }]
    );
}

#[test]
fn test_read_all_empty_input_is_end_of_input() {
    let err = read_all::<Simple, _>("".as_bytes()).unwrap_err();
    assert!(err.is_end_of_input());
}

#[test]
fn test_ragged_rows_surface_as_source_errors() {
    let mut decoder = reader("str,n\nonly-one\n".as_bytes());
    decoder.read_header().unwrap();
    let err = decoder.decode(&mut Simple::default()).unwrap_err();
    match err {
        Error::Source(inner) => assert!(inner.downcast_ref::<csv::Error>().is_some()),
        other => panic!("Expected Source error, got {other:?}"),
    }
}

#[test]
fn test_header_subset_with_allow_missing() {
    let mut encoder = writer(Vec::new())
        .with_header(Header::new(["n"]).unwrap())
        .with_allow_missing_columns(true);
    encoder
        .encode(&Simple {
            string_val: "this is a string".to_string(),
            int_val: 12345,
        })
        .unwrap();
    let bytes = encoder.into_inner().into_inner().unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "12345\n");
}

struct Prefixed(String);

impl MarshalValue for Prefixed {
    fn marshal_value(&self) -> String {
        format!("prefix: {}", self.0)
    }
}

impl rowbind_core::Field for Prefixed {
    fn slot(&mut self) -> rowbind_core::Slot<'_> {
        rowbind_core::Slot::Shared("Prefixed")
    }

    fn view(&self) -> rowbind_core::View<'_> {
        rowbind_core::View::Custom(self)
    }
}

#[derive(Record)]
#[rowbind(crate = "rowbind_core")]
struct WithMarshaller {
    #[rowbind(column = "str")]
    string_val: String,
    #[rowbind(column = "prefixed")]
    test: Prefixed,
}

#[test]
fn test_value_marshaller_output_is_quoted() {
    let value = WithMarshaller {
        string_val: "this is a string value".to_string(),
        test: Prefixed("i'm also a string, but with a prefix".to_string()),
    };
    let bytes = write_all(Vec::new(), [&value]).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "str,prefixed\nthis is a string value,\"prefix: i'm also a string, but with a prefix\"\n"
    );
}

#[derive(Debug, Default, PartialEq, Record)]
#[rowbind(crate = "rowbind_core")]
struct Event {
    #[rowbind(column = "id", base = "16")]
    id: u32,
    #[rowbind(column = "at")]
    at: DateTime<Utc>,
    #[rowbind(column = "day", format = "%Y-%m-%d")]
    day: DateTime<Utc>,
    #[rowbind(column = "note,omitempty")]
    note: Option<String>,
    #[rowbind(column = "ratio", precision = "3")]
    ratio: f64,
}

#[test]
fn test_file_round_trip() -> anyhow::Result<()> {
    init_logging();
    let events = vec![
        Event {
            id: 0xbeef,
            at: Utc.with_ymd_and_hms(2019, 3, 9, 12, 30, 0).unwrap(),
            day: Utc.with_ymd_and_hms(2019, 3, 9, 0, 0, 0).unwrap(),
            note: Some("first, with comma".to_string()),
            ratio: 0.125,
        },
        Event {
            id: 1,
            at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            day: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            note: None,
            ratio: 2.0,
        },
    ];

    let file = tempfile::NamedTempFile::new()?;
    let mut encoder = rowbind_core::Encoder::new(CsvSink::from_path(file.path())?)
        .with_header_from::<Event>();
    encoder.write_header()?;
    for event in &events {
        encoder.encode(event)?;
    }
    encoder.into_inner().flush()?;

    let written = std::fs::read_to_string(file.path())?;
    assert_eq!(
        written,
        "id,at,day,note,ratio\n\
         beef,2019-03-09T12:30:00Z,2019-03-09,\"first, with comma\",0.125\n\
         1,2020-01-01T00:00:00Z,2020-01-01,,2.000\n"
    );

    let mut decoder = rowbind_core::Decoder::new(CsvSource::from_path(file.path())?);
    decoder.read_header()?;
    let decoded: Vec<Event> = decoder.records().collect::<Result<_, _>>()?;
    assert_eq!(decoded, events);
    Ok(())
}

#[test]
fn test_decode_from_configured_reader() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "str;n\nsemi;42\n")?;

    let csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b';')
        .from_path(file.path())?;
    let mut decoder = rowbind_core::Decoder::new(CsvSource::new(csv_reader));
    decoder.read_header()?;

    let mut value = Simple::default();
    decoder.decode(&mut value)?;
    assert_eq!(value.string_val, "semi");
    assert_eq!(value.int_val, 42);
    Ok(())
}
