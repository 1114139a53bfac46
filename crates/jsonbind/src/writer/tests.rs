use alloc::{string::String, vec, vec::Vec};

use rstest::rstest;

use super::*;

fn writer() -> JsonWriter<String> {
    JsonWriter::new(String::new())
}

#[test]
fn writes_nested_document_compactly() {
    let mut w = writer();
    w.begin_object().unwrap();
    w.name("a").unwrap().begin_array().unwrap();
    w.i64_value(1).unwrap();
    w.string_value("two").unwrap();
    w.bool_value(false).unwrap();
    w.null_value().unwrap();
    w.begin_object().unwrap().end_object().unwrap();
    w.end_array().unwrap();
    w.name("b").unwrap().f64_value(2.5).unwrap();
    w.end_object().unwrap();
    w.close().unwrap();
    assert_eq!(w.output(), r#"{"a":[1,"two",false,null,{}],"b":2.5}"#);
}

#[test]
fn tracks_states_through_an_object() {
    let mut w = writer();
    assert_eq!(w.state(), WriterState::EmptyDocument);
    w.begin_object().unwrap();
    assert_eq!(w.state(), WriterState::EmptyObject);
    w.name("k").unwrap();
    assert_eq!(w.state(), WriterState::DanglingName);
    assert!(w.has_pending_name());
    w.begin_array().unwrap();
    assert_eq!(w.state(), WriterState::EmptyArray);
    w.u64_value(7).unwrap();
    assert_eq!(w.state(), WriterState::NonemptyArray);
    w.end_array().unwrap();
    assert_eq!(w.state(), WriterState::NonemptyObject);
    w.end_object().unwrap();
    assert_eq!(w.state(), WriterState::NonemptyDocument);
    w.close().unwrap();
    assert_eq!(w.state(), WriterState::Closed);
}

#[derive(Debug, Clone, Copy)]
enum Op {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    Name,
    Value,
    Null,
    CancelName,
}

fn apply(w: &mut JsonWriter<String>, op: Op) -> Result<(), Error> {
    match op {
        Op::BeginArray => w.begin_array().map(|_| ()),
        Op::EndArray => w.end_array().map(|_| ()),
        Op::BeginObject => w.begin_object().map(|_| ()),
        Op::EndObject => w.end_object().map(|_| ()),
        Op::Name => w.name("n").map(|_| ()),
        Op::Value => w.i64_value(1).map(|_| ()),
        Op::Null => w.null_value().map(|_| ()),
        Op::CancelName => w.cancel_name().map(|_| ()),
    }
}

#[rstest]
#[case::value_without_name(vec![Op::BeginObject, Op::Value])]
#[case::array_inside_object_without_name(vec![Op::BeginObject, Op::BeginArray])]
#[case::name_in_array(vec![Op::BeginArray, Op::Name])]
#[case::name_at_root(vec![Op::Name])]
#[case::two_names(vec![Op::BeginObject, Op::Name, Op::Name])]
#[case::end_object_in_array(vec![Op::BeginArray, Op::EndObject])]
#[case::end_array_in_object(vec![Op::BeginObject, Op::EndArray])]
#[case::end_with_nothing_open(vec![Op::EndArray])]
#[case::dangling_name_at_end(vec![Op::BeginObject, Op::Name, Op::EndObject])]
#[case::cancel_without_name(vec![Op::BeginObject, Op::CancelName])]
#[case::scalar_root_when_strict(vec![Op::Value])]
#[case::second_root(vec![Op::BeginArray, Op::EndArray, Op::BeginArray])]
fn rejects_out_of_order_calls(#[case] ops: Vec<Op>) {
    let mut w = writer();
    let (last, prefix) = ops.split_last().unwrap();
    for op in prefix {
        apply(&mut w, *op).unwrap();
    }
    assert!(matches!(apply(&mut w, *last), Err(Error::Structural(_))));
}

#[rstest]
#[case::nothing_written(vec![], 0)]
#[case::open_array(vec![Op::BeginArray], 1)]
#[case::open_nested(vec![Op::BeginObject, Op::Name, Op::BeginArray], 2)]
fn close_rejects_incomplete_documents(#[case] ops: Vec<Op>, #[case] open: usize) {
    let mut w = writer();
    for op in ops {
        apply(&mut w, op).unwrap();
    }
    assert_eq!(w.close(), Err(Error::IncompleteDocument { open }));
}

#[test]
fn calls_after_close_fail() {
    let mut w = writer();
    w.begin_array().unwrap().end_array().unwrap();
    w.close().unwrap();
    w.close().unwrap();
    assert!(matches!(w.begin_array(), Err(Error::Structural(_))));
    assert!(matches!(w.flush(), Err(Error::Structural(_))));
    assert_eq!(w.output(), "[]");
}

#[test]
fn null_members_are_dropped_when_nulls_are_off() {
    let mut w = writer();
    w.set_serialize_nulls(false);
    w.begin_object().unwrap();
    w.name("gone").unwrap().null_value().unwrap();
    w.name("kept").unwrap().i64_value(1).unwrap();
    w.name("also_gone").unwrap().null_value().unwrap();
    w.name("list").unwrap().begin_array().unwrap();
    w.null_value().unwrap().null_value().unwrap();
    w.end_array().unwrap();
    w.end_object().unwrap();
    w.close().unwrap();
    assert_eq!(w.output(), r#"{"kept":1,"list":[null,null]}"#);
}

#[test]
fn null_members_are_written_when_nulls_are_on() {
    let mut w = writer();
    w.begin_object().unwrap();
    w.name("a").unwrap().null_value().unwrap();
    w.end_object().unwrap();
    assert_eq!(w.output(), r#"{"a":null}"#);
}

#[test]
fn object_level_null_policy_overrides_writer_policy() {
    let mut w = writer();
    w.set_serialize_nulls(false);
    w.begin_object().unwrap();
    w.name("map").unwrap().begin_object_with(true).unwrap();
    w.name("k").unwrap().null_value().unwrap();
    w.end_object().unwrap();
    w.name("dropped").unwrap().null_value().unwrap();
    w.end_object().unwrap();
    assert_eq!(w.output(), r#"{"map":{"k":null}}"#);
}

#[test]
fn cancelled_first_member_leaves_no_separator() {
    let mut w = writer();
    w.begin_object().unwrap();
    w.name("a").unwrap().cancel_name().unwrap();
    w.name("b").unwrap().bool_value(true).unwrap();
    w.end_object().unwrap();
    assert_eq!(w.output(), r#"{"b":true}"#);
}

#[test]
fn non_finite_numbers_need_lenient_mode() {
    let mut w = writer();
    w.begin_array().unwrap();
    assert_eq!(
        w.f64_value(f64::NAN).unwrap_err(),
        Error::NumericFormat("NaN".into())
    );
    assert_eq!(
        w.number_value("-Infinity").unwrap_err(),
        Error::NumericFormat("-Infinity".into())
    );

    let mut w = writer();
    w.set_lenient(true);
    w.begin_array().unwrap();
    w.f64_value(f64::NAN).unwrap();
    w.f64_value(f64::INFINITY).unwrap();
    w.f64_value(f64::NEG_INFINITY).unwrap();
    w.end_array().unwrap();
    assert_eq!(w.output(), "[NaN,Infinity,-Infinity]");
}

#[rstest]
#[case(1.0, true, "1.0")]
#[case(1.0, false, "1")]
#[case(-0.5, false, "-0.5")]
#[case(1e300, true, "1e300")]
fn float_formatting(#[case] value: f64, #[case] fraction: bool, #[case] expected: &str) {
    let ctx = SerializationContext::builder()
        .whole_floats_with_fraction(fraction)
        .lenient(true)
        .build();
    let mut w = JsonWriter::from_context(String::new(), &ctx);
    w.f64_value(value).unwrap();
    assert_eq!(w.output(), expected);
}

#[rstest]
#[case(0.1, true, "0.1")]
#[case(1.0, false, "1")]
#[case(3.402_823_5e38, true, "3.4028235e38")]
#[case(f32::NEG_INFINITY, true, "-Infinity")]
fn f32_formatting(#[case] value: f32, #[case] fraction: bool, #[case] expected: &str) {
    let ctx = SerializationContext::builder()
        .whole_floats_with_fraction(fraction)
        .lenient(true)
        .build();
    let mut w = JsonWriter::from_context(String::new(), &ctx);
    w.f32_value(value).unwrap();
    assert_eq!(w.output(), expected);
}

#[test]
fn lenient_writer_accepts_scalar_roots() {
    let mut w = writer();
    w.set_lenient(true);
    w.string_value("root").unwrap();
    w.i64_value(2).unwrap();
    w.close().unwrap();
    assert_eq!(w.output(), "\"root\"\n2");
}

#[test]
fn raw_values_are_written_verbatim() {
    let mut w = writer();
    w.begin_object().unwrap();
    w.name("raw").unwrap().raw_value(r#"{"x":[1,2]}"#).unwrap();
    w.end_object().unwrap();
    assert_eq!(w.output(), r#"{"raw":{"x":[1,2]}}"#);
}

#[test]
fn pretty_prints_with_indent() {
    let ctx = SerializationContext::builder().indent("  ").build();
    let mut w = JsonWriter::from_context(String::new(), &ctx);
    w.begin_object().unwrap();
    w.name("a").unwrap().begin_array().unwrap();
    w.i64_value(1).unwrap().i64_value(2).unwrap();
    w.end_array().unwrap();
    w.name("empty").unwrap().begin_array().unwrap().end_array().unwrap();
    w.name("b").unwrap().begin_object().unwrap();
    w.name("c").unwrap().bool_value(true).unwrap();
    w.end_object().unwrap();
    w.end_object().unwrap();
    w.close().unwrap();

    insta::assert_snapshot!(w.output(), @r#"
    {
      "a": [
        1,
        2
      ],
      "empty": [],
      "b": {
        "c": true
      }
    }
    "#);
}

#[test]
fn output_is_valid_json() {
    let mut w = writer();
    w.begin_array().unwrap();
    w.string_value("quote \" and \\ and \u{1}").unwrap();
    w.f64_value(0.1).unwrap();
    w.i64_value(i64::MIN).unwrap();
    w.u64_value(u64::MAX).unwrap();
    w.end_array().unwrap();
    w.close().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(w.output()).unwrap();
    assert_eq!(parsed[0], "quote \" and \\ and \u{1}");
    assert_eq!(parsed[1], 0.1);
}

#[cfg(feature = "std")]
#[test]
fn io_sink_receives_the_document() {
    let mut w = JsonWriter::new(IoSink::new(Vec::<u8>::new()));
    w.begin_array().unwrap().bool_value(true).unwrap().end_array().unwrap();
    w.close().unwrap();
    assert_eq!(w.into_inner().into_inner(), b"[true]");
}
