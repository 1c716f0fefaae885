use wirepack::buffers::FixedWriter;
use wirepack::transenc::{self, TransEncDecoder, TransEncEncoder, TransEncReader, TransEncWriter};
use wirepack::{read_value, CodecError, Token, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn decoder_tokens(input: &[u8]) -> Vec<Token> {
    let mut decoder = TransEncDecoder::new(input);
    let mut tokens = vec![decoder.token()];
    while !decoder.token().is_terminal() {
        tokens.push(decoder.next());
    }
    tokens
}

#[test]
fn transenc_integer_wire_matrix() {
    let cases: &[(i64, &[u8])] = &[
        (0, &[0x00]),
        (127, &[0x7f]),
        (-1, &[0xff]),
        (-32, &[0xe0]),
        (-33, &[0x83, 0xdf]),
        (-128, &[0x83, 0x80]),
        (128, &[0x84, 0x00, 0x80]),
        (-129, &[0x84, 0xff, 0x7f]),
        (1 << 16, &[0x85, 0x00, 0x01, 0x00, 0x00]),
        (1 << 40, &[0x86, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00]),
    ];
    for &(int, wire) in cases {
        let mut encoder = TransEncEncoder::new(Vec::new());
        assert_eq!(encoder.put_i64(int), wire.len());
        assert_eq!(encoder.into_inner(), wire, "{int}");
        let decoder = TransEncDecoder::new(wire);
        assert_eq!(decoder.get_i64().unwrap(), int);
    }
}

#[test]
fn transenc_decoder_token_matrix() {
    assert_eq!(
        decoder_tokens(&[0xa0, 0x80, 0x81, 0x82, 0x87, 0, 0, 0, 0, 0xa1]),
        [
            Token::RecordBegin,
            Token::Null,
            Token::Boolean,
            Token::Boolean,
            Token::Float32,
            Token::RecordEnd,
            Token::Eof,
        ]
    );
    // the decoder alone does not balance ends
    assert_eq!(decoder_tokens(&[0xa3]), [Token::ArrayEnd, Token::Eof]);
    let decoder = TransEncDecoder::new(&[0x82]);
    assert!(decoder.get_bool().unwrap());
    let decoder = TransEncDecoder::new(&[0x81]);
    assert!(!decoder.get_bool().unwrap());
}

#[test]
fn transenc_strings_and_binary() {
    let mut decoder = TransEncDecoder::new(&[0x90, 0x02, b'h', b'i', 0x95, 0x00, 0x01, 0xee]);
    assert_eq!(decoder.get_str().unwrap(), "hi");
    assert_eq!(decoder.next(), Token::Binary);
    assert_eq!(decoder.get_binary().unwrap(), [0xee]);
    assert_eq!(decoder.next(), Token::Eof);
}

#[test]
fn transenc_negative_length_is_error() {
    init_tracing();
    let mut decoder = TransEncDecoder::new(&[0x90, 0xff, b'x']);
    assert_eq!(decoder.token(), Token::Error);
    assert_eq!(decoder.next(), Token::Error);
    assert_eq!(decoder.last_error(), Some(&CodecError::NegativeLength(0)));
    assert_eq!(transenc::decode(&[0x96, 0x80, 0, 0, 0]), Err(CodecError::NegativeLength(0)));
}

#[test]
fn transenc_truncation_is_eof() {
    for input in [&[0x84, 0x01][..], &[0x91, 0x00], &[0x90, 0x03, b'a'], &[0x88]] {
        let decoder = TransEncDecoder::new(input);
        assert_eq!(decoder.token(), Token::Eof, "{input:02x?}");
    }
}

#[test]
fn transenc_unknown_tags() {
    init_tracing();
    for tag in [0x89, 0x8f, 0x98, 0xa6, 0xdf] {
        let buf = [tag];
        let decoder = TransEncDecoder::new(&buf);
        assert_eq!(decoder.token(), Token::Error, "{tag:02x}");
        assert_eq!(
            decoder.last_error(),
            Some(&CodecError::InvalidTag { tag, offset: 0 })
        );
    }
}

#[test]
fn transenc_reader_rejects_mismatched_end() {
    init_tracing();
    let mut reader = TransEncReader::new(&[0xa2, 0xa0, 0xa3]);
    assert!(reader.next());
    assert_eq!(reader.token(), Token::RecordBegin);
    assert!(!reader.next());
    assert_eq!(
        reader.last_error(),
        Some(&CodecError::UnbalancedEnd(Token::ArrayEnd))
    );
    assert!(!reader.next());
    assert_eq!(reader.token(), Token::Error);
}

#[test]
fn transenc_reader_builds_values() {
    let bytes = [0xa4, 0x90, 0x01, b'k', 0xa2, 0x80, 0x82, 0xa3, 0xa5];
    let mut reader = TransEncReader::new(&bytes);
    let value = read_value(&mut reader).unwrap();
    assert_eq!(
        value,
        Value::Map(vec![(
            Value::from("k"),
            Value::Array(vec![Value::Null, Value::Bool(true)])
        )])
    );
    assert_eq!(reader.token(), Token::Eof);
}

#[test]
fn transenc_writer_arity_matrix() {
    init_tracing();
    let mut writer = TransEncWriter::new(Vec::new());
    writer.map_begin(Some(2)).unwrap();
    writer.write_str("a").unwrap();
    writer.write_i64(1).unwrap();
    writer.write_str("b").unwrap();
    assert_eq!(writer.map_end(), Err(CodecError::TooFewElements(1)));
    writer.array_begin(None).unwrap();
    writer.write_f64(0.5).unwrap();
    writer.array_end().unwrap();
    assert_eq!(writer.write_null(), Err(CodecError::TooManyElements));
    assert_eq!(writer.map_end(), Ok(1));
    assert_eq!(writer.depth(), 0);
    assert_eq!(
        transenc::decode(&writer.into_inner()).unwrap(),
        Value::Map(vec![
            (Value::from("a"), Value::Int(1)),
            (Value::from("b"), Value::Array(vec![Value::Float(0.5)])),
        ])
    );
}

#[test]
fn transenc_writer_declined_end_keeps_frame() {
    let mut storage = [0u8; 1];
    let mut writer = TransEncWriter::new(FixedWriter::new(&mut storage));
    assert_eq!(writer.record_begin(), Ok(1));
    assert_eq!(writer.record_end(), Ok(0));
    assert_eq!(writer.depth(), 1);
}

#[test]
fn transenc_value_roundtrip_matrix() {
    let values = vec![
        Value::Record(vec![]),
        Value::Record(vec![Value::Int(i64::MAX), Value::Record(vec![Value::Null])]),
        Value::Str("x".repeat(40_000)),
        Value::Bin(vec![9; 200]),
        Value::Float(-0.0),
        Value::Map(vec![(Value::Int(1), Value::Map(vec![]))]),
    ];
    for value in values {
        let bytes = transenc::encode(&value).unwrap();
        assert_eq!(transenc::decode(&bytes).unwrap(), value);
    }
    // unsigned values that fit i64 come back signed
    assert_eq!(
        transenc::decode(&transenc::encode(&Value::UInt(300)).unwrap()).unwrap(),
        Value::Int(300)
    );
}
