use wirepack::ubjson::{self, UbjsonDecoder, UbjsonEncoder};
use wirepack::{read_document, CodecError, DecodeConfig, Token, TokenReader, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn tokens(input: &[u8]) -> Vec<Token> {
    let mut decoder = UbjsonDecoder::new(input);
    let mut out = vec![decoder.token()];
    while !decoder.token().is_terminal() {
        out.push(decoder.next());
    }
    out
}

#[test]
fn ubjson_marker_matrix() {
    assert_eq!(
        tokens(b"[ZTFi\x01U\x02I\x00\x03l\x00\x00\x00\x04L\x00\x00\x00\x00\x00\x00\x00\x05]"),
        [
            Token::ArrayBegin,
            Token::Null,
            Token::Boolean,
            Token::Boolean,
            Token::SignedInt8,
            Token::UnsignedInt8,
            Token::SignedInt16,
            Token::SignedInt32,
            Token::SignedInt64,
            Token::ArrayEnd,
            Token::Eof,
        ]
    );
    assert_eq!(
        ubjson::decode(b"[d\x3f\x80\x00\x00D\x40\x00\x00\x00\x00\x00\x00\x00]").unwrap(),
        Value::Array(vec![Value::Float(1.0), Value::Float(2.0)])
    );
}

#[test]
fn ubjson_keys_and_nesting() {
    let input = b"{i\x01a[i\x01]i\x02bc{}}";
    let mut decoder = UbjsonDecoder::new(input);
    let mut keys = Vec::new();
    while !decoder.token().is_terminal() {
        if decoder.is_key() {
            keys.push(decoder.get_string().unwrap());
        }
        decoder.next();
    }
    assert_eq!(keys, ["a", "bc"]);
    assert_eq!(decoder.token(), Token::Eof);
    assert_eq!(
        ubjson::decode(input).unwrap(),
        Value::Map(vec![
            (Value::from("a"), Value::Array(vec![Value::Int(1)])),
            (Value::from("bc"), Value::Map(vec![])),
        ])
    );
}

#[test]
fn ubjson_depth_via_token_reader() {
    let mut decoder = UbjsonDecoder::new(b"[[]]");
    assert_eq!(TokenReader::depth(&decoder), 1);
    assert!(decoder.advance());
    assert_eq!(TokenReader::depth(&decoder), 2);
    assert!(decoder.advance());
    assert_eq!((decoder.token(), TokenReader::depth(&decoder)), (Token::ArrayEnd, 2));
    assert!(decoder.advance());
    assert_eq!((decoder.token(), TokenReader::depth(&decoder)), (Token::ArrayEnd, 1));
    assert!(!decoder.advance());
    assert_eq!(TokenReader::depth(&decoder), 0);
}

#[test]
fn ubjson_non_finite_floats_become_null() {
    for float in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let mut encoder = UbjsonEncoder::new(Vec::new());
        assert_eq!(encoder.put_f64(float), 1);
        let bytes = encoder.into_inner();
        assert_eq!(bytes, b"Z");
        assert_eq!(ubjson::decode(&bytes).unwrap(), Value::Null);
    }
}

#[test]
fn ubjson_binary_typed_array() {
    let bytes = ubjson::encode(&Value::Bin(vec![0xde, 0xad])).unwrap();
    assert_eq!(bytes, b"[$U#i\x02\xde\xad");
    let decoder = UbjsonDecoder::new(&bytes);
    assert_eq!(decoder.token(), Token::Binary);
    assert_eq!(decoder.get_bytes().unwrap(), [0xde, 0xad]);
    assert_eq!(decoder.depth(), 0);
}

#[test]
fn ubjson_malformed_matrix() {
    init_tracing();
    let cases: &[(&[u8], CodecError)] = &[
        (b"X", CodecError::InvalidTag { tag: b'X', offset: 0 }),
        (b"SZ", CodecError::InvalidTag { tag: b'Z', offset: 1 }),
        (b"Si\xfe", CodecError::NegativeLength(1)),
        (b"[$i#i\x01\x00", CodecError::InvalidTag { tag: b'$', offset: 1 }),
        (b"{#i\x01", CodecError::InvalidTag { tag: b'#', offset: 1 }),
        (b"]", CodecError::UnbalancedEnd(Token::ArrayEnd)),
        (b"{i\x01a}", CodecError::TooFewElements(1)),
        (b"{Z}", CodecError::InvalidTag { tag: b'Z', offset: 1 }),
        (b"ZZ", CodecError::TrailingData(1)),
    ];
    for (input, expected) in cases {
        assert_eq!(ubjson::decode(input).as_ref(), Err(expected), "{input:02x?}");
    }
}

#[test]
fn ubjson_truncated_is_eof() {
    for input in [&b"I\x00"[..], b"S", b"Si", b"Si\x03ab", b"[$U", b"[i\x01"] {
        let mut decoder = UbjsonDecoder::new(input);
        assert_eq!(read_document(&mut decoder), Err(CodecError::UnexpectedEof), "{input:02x?}");
    }
}

#[test]
fn ubjson_depth_limit() {
    let config = DecodeConfig::default().with_max_depth(2);
    assert_eq!(
        ubjson::decode_with(b"[[[]]]", config),
        Err(CodecError::DepthExceeded(2))
    );
}

#[test]
fn ubjson_value_roundtrip_matrix() {
    let values = vec![
        Value::Int(i64::MIN),
        Value::Int(-200),
        Value::Str(String::new()),
        Value::Str("ü".repeat(100)),
        Value::Map(vec![(Value::from(""), Value::Float(0.25))]),
        Value::Array(vec![Value::Bin(vec![]), Value::Map(vec![])]),
    ];
    for value in values {
        let bytes = ubjson::encode(&value).unwrap();
        assert_eq!(ubjson::decode(&bytes).unwrap(), value);
    }
    assert_eq!(
        ubjson::encode(&Value::Extension(0, vec![])),
        Err(CodecError::Unsupported("ubjson"))
    );
}
