#![allow(clippy::float_cmp)]

use alloc::{borrow::Cow, vec::Vec};

use rstest::rstest;

use super::*;

/// Drains `src` into token kinds, descending into every container.
fn tokens(src: &str, lenient: bool) -> Result<Vec<Token>, Error> {
    let mut reader = JsonReader::new(src);
    reader.set_lenient(lenient);
    let mut out = Vec::new();
    loop {
        let token = reader.peek()?;
        out.push(token);
        match token {
            Token::BeginArray => reader.begin_array()?,
            Token::EndArray => reader.end_array()?,
            Token::BeginObject => reader.begin_object()?,
            Token::EndObject => reader.end_object()?,
            Token::Name => {
                reader.next_name()?;
            }
            Token::String => {
                reader.next_string()?;
            }
            Token::Number => {
                reader.next_number_literal()?;
            }
            Token::Boolean => {
                reader.next_bool()?;
            }
            Token::Null => reader.next_null()?,
            Token::EndDocument => break,
        }
    }
    reader.close()?;
    Ok(out)
}

fn syntax_of(err: &Error) -> &SyntaxError {
    match err {
        Error::MalformedInput(read) => read.syntax(),
        other => panic!("expected malformed input, got {other:?}"),
    }
}

#[test]
fn reads_every_token_kind() {
    use Token::*;
    let seen = tokens(
        r#" { "a" : [ 1 , -2.5e3 , "s" , true , false , null ] , "b" : { } } "#,
        false,
    )
    .unwrap();
    assert_eq!(
        seen,
        [
            BeginObject,
            Name,
            BeginArray,
            Number,
            Number,
            String,
            Boolean,
            Boolean,
            Null,
            EndArray,
            Name,
            BeginObject,
            EndObject,
            EndObject,
            EndDocument,
        ]
    );
}

#[test]
fn unescaped_strings_are_borrowed() {
    let mut reader = JsonReader::new(r#"["plain", "esc\"aped"]"#);
    reader.begin_array().unwrap();
    assert!(matches!(reader.next_string().unwrap(), Cow::Borrowed("plain")));
    let escaped = reader.next_string().unwrap();
    assert!(matches!(escaped, Cow::Owned(_)));
    assert_eq!(escaped, "esc\"aped");
}

#[rstest]
#[case(r#"["a\nb"]"#, "a\nb")]
#[case(r#"["\u0041\u00e9"]"#, "Aé")]
#[case(r#"["\ud83d\ude00"]"#, "😀")]
#[case(r#"["\/\\\b\f\r\t"]"#, "/\\\u{8}\u{c}\r\t")]
fn decodes_escapes(#[case] src: &str, #[case] expected: &str) {
    let mut reader = JsonReader::new(src);
    reader.begin_array().unwrap();
    assert_eq!(reader.next_string().unwrap(), expected);
}

#[rstest]
#[case::truncated_object(r#"{"a":1"#)]
#[case::truncated_string(r#"["abc"#)]
#[case::truncated_literal("[tru")]
#[case::missing_colon(r#"{"a" 1}"#)]
#[case::missing_comma("[1 2]")]
#[case::trailing_comma("[1,]")]
#[case::unquoted_name("{a:1}")]
#[case::leading_zero("[01]")]
#[case::bare_minus("[-]")]
#[case::mismatched_close("[1}")]
#[case::lone_surrogate(r#"["\ud800x"]"#)]
#[case::bad_hex(r#"["\u12g4"]"#)]
#[case::raw_control("[\"a\u{1}\"]")]
#[case::empty_input("")]
#[case::trailing_data("[] []")]
#[case::scalar_root_when_strict("1")]
fn rejects_malformed_input(#[case] src: &str) {
    let err = tokens(src, false).unwrap_err();
    assert!(matches!(err, Error::MalformedInput(_)), "{src}: {err:?}");
}

#[test]
fn truncated_object_reports_end_of_input() {
    let mut reader = JsonReader::new(r#"{"a":1"#);
    reader.begin_object().unwrap();
    assert_eq!(reader.next_name().unwrap(), "a");
    assert_eq!(reader.next_i64().unwrap(), 1);
    let err = reader.has_next().unwrap_err();
    assert_eq!(syntax_of(&err), &SyntaxError::UnexpectedEndOfInput);
}

#[test]
fn type_mismatch_keeps_the_token() {
    let mut reader = JsonReader::new(r#"["text"]"#);
    reader.begin_array().unwrap();
    let err = reader.next_bool().unwrap_err();
    assert_eq!(
        syntax_of(&err),
        &SyntaxError::UnexpectedToken {
            expected: Token::Boolean,
            found: Token::String,
        }
    );
    assert_eq!(reader.next_string().unwrap(), "text");
    reader.end_array().unwrap();
    reader.close().unwrap();
}

#[test]
fn errors_carry_positions() {
    let err = tokens("[\n  1,\n  x]", false).unwrap_err();
    let Error::MalformedInput(read) = err else {
        panic!("unexpected error");
    };
    assert_eq!(read.syntax(), &SyntaxError::InvalidCharacter('x'));
    assert_eq!(read.line, 3);
    assert_eq!(read.column, 3);
}

#[test]
fn non_finite_literals_require_lenient_mode() {
    let err = tokens("[NaN]", false).unwrap_err();
    assert_eq!(err, Error::NumericFormat("NaN".into()));

    let mut reader = JsonReader::new("[NaN, Infinity, -Infinity, 1]");
    reader.set_lenient(true);
    reader.begin_array().unwrap();
    assert!(reader.next_f64().unwrap().is_nan());
    assert_eq!(reader.next_f64().unwrap(), f64::INFINITY);
    assert_eq!(reader.next_f64().unwrap(), f64::NEG_INFINITY);
    assert_eq!(reader.next_f64().unwrap(), 1.0);
    reader.end_array().unwrap();
}

#[test]
fn lenient_reader_accepts_scalar_roots() {
    let mut reader = JsonReader::new(r#" "root" "#);
    reader.set_lenient(true);
    assert_eq!(reader.next_string().unwrap(), "root");
    reader.close().unwrap();
}

#[rstest]
#[case::keywords("nullnull")]
#[case::number_then_keyword("1true")]
#[case::keyword_then_number("false0")]
fn lenient_roots_need_a_delimiter(#[case] src: &str) {
    let err = tokens(src, true).unwrap_err();
    assert!(
        matches!(syntax_of(&err), SyntaxError::InvalidCharacter(_)),
        "{src}: {err:?}"
    );
}

#[test]
fn lenient_roots_separated_by_whitespace_or_brackets() {
    use Token::*;
    assert_eq!(
        tokens("null null\n1 true[2]", true).unwrap(),
        [Null, Null, Number, Boolean, BeginArray, Number, EndArray, EndDocument]
    );
}

#[rstest]
#[case("[42]", 42)]
#[case("[-7]", -7)]
#[case("[1e3]", 1000)]
#[case("[2.0]", 2)]
#[case("[1500e-2]", 15)]
#[case("[9007199254740993.0]", 9_007_199_254_740_993)]
#[case("[-9223372036854775808.0]", i64::MIN)]
fn integers_accept_whole_literals(#[case] src: &str, #[case] expected: i64) {
    let mut reader = JsonReader::new(src);
    reader.begin_array().unwrap();
    assert_eq!(reader.next_i64().unwrap(), expected);
}

#[rstest]
#[case("[1.5]")]
#[case("[1e40]")]
#[case("[1.0000000000000000001]")]
#[case("[0.99999999999999999999]")]
#[case("[9223372036854775808.0]")]
fn integers_reject_fractions_and_overflow(#[case] src: &str) {
    let mut reader = JsonReader::new(src);
    reader.begin_array().unwrap();
    let err = reader.next_i64().unwrap_err();
    assert!(matches!(
        syntax_of(&err),
        SyntaxError::NumberOutOfRange(_)
    ));
}

#[test]
fn whole_literals_are_read_exactly_as_unsigned() {
    let mut reader = JsonReader::new("[1.8446744073709551615e19, -0.0, -1.0]");
    reader.begin_array().unwrap();
    assert_eq!(reader.next_u64().unwrap(), u64::MAX);
    assert_eq!(reader.next_u64().unwrap(), 0);
    let err = reader.next_u64().unwrap_err();
    assert_eq!(syntax_of(&err), &SyntaxError::NumberOutOfRange("-1.0".into()));
}

#[test]
fn unsigned_rejects_negative_numbers() {
    let mut reader = JsonReader::new("[-1, 18446744073709551615]");
    reader.begin_array().unwrap();
    assert!(reader.next_u64().is_err());
    assert_eq!(reader.next_u64().unwrap(), u64::MAX);
}

#[test]
fn skip_value_skips_nested_structures() {
    let mut reader = JsonReader::new(r#"{"skip": {"a": [1, {"b": null}]}, "keep": true}"#);
    reader.begin_object().unwrap();
    assert_eq!(reader.next_name().unwrap(), "skip");
    reader.skip_value().unwrap();
    assert_eq!(reader.next_name().unwrap(), "keep");
    assert!(reader.next_bool().unwrap());
    assert!(!reader.has_next().unwrap());
    reader.end_object().unwrap();
    reader.close().unwrap();
}

#[test]
fn skip_value_skips_a_pending_member() {
    let mut reader = JsonReader::new(r#"{"a": [1, 2], "b": 3}"#);
    reader.begin_object().unwrap();
    reader.skip_value().unwrap();
    assert_eq!(reader.next_name().unwrap(), "b");
}

#[test]
fn skip_value_at_container_end_fails() {
    let mut reader = JsonReader::new("[]");
    reader.begin_array().unwrap();
    assert!(reader.skip_value().is_err());
    reader.end_array().unwrap();
}

#[test]
fn close_with_open_containers_is_incomplete() {
    let mut reader = JsonReader::new("[[1]]");
    reader.begin_array().unwrap();
    assert_eq!(reader.close(), Err(Error::IncompleteDocument { open: 1 }));
}

#[test]
fn reads_serde_json_output() {
    let value = serde_json::json!({
        "text": "quote \" backslash \\ tab \t",
        "nums": [0, -1, 1.25, 1e-7],
        "nested": {"deep": [[], {}]}
    });
    let src = serde_json::to_string_pretty(&value).unwrap();
    let seen = tokens(&src, false).unwrap();
    assert_eq!(seen.last(), Some(&Token::EndDocument));
    assert_eq!(seen.iter().filter(|t| **t == Token::Number).count(), 4);
}
