#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonbind::{DeserializationContext, JsonMapper, SerializationContext, Value, ValueCodec};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};
use serde_json::Map;

const HEADER: usize = 1; // flag byte

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r"];

/// Helper: borrow the thread-local RNG and run a closure with it.
fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x07);

        let mut prefix = HEADER;
        while prefix < size.max(HEADER + 1) && prefix < max_size {
            let limit = max_size - prefix;

            prefix += append_whitespace(&mut data[prefix..], limit);
            let limit = max_size - prefix;
            prefix += append_value(&mut data[prefix..], size, limit);
        }

        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Append 1‒N whitespace characters to `buf`, never exceeding `limit`.
/// Returns the number of bytes written.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }

        let n = rng.random_range(1..=limit.min(4));
        for slot in &mut buf[..n] {
            *slot = WS_TABLE[rng.random_range(0..WS_TABLE.len())][0];
        }
        n
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2 + 1).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");

    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);

    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(serde_json::Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        use serde_json::Value;

        let node_type = u.choose_index(21)?;
        let value = match node_type {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

/// Reads the input as an untyped document; whatever is accepted must write
/// back out and read again to the same text.
fn roundtrip(data: &[u8]) {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    let Ok(src) = std::str::from_utf8(rest) else {
        return;
    };

    let lenient = flags & 1 != 0;
    let de = DeserializationContext::builder().lenient(lenient).build();
    let ser = SerializationContext::builder()
        .lenient(lenient)
        .indent(if flags & 2 != 0 { "  " } else { "" })
        .serialize_nulls(flags & 4 == 0)
        .build();

    let mapper = JsonMapper::new(ValueCodec);
    let Ok(value) = mapper.read_with::<Value>(src, &de) else {
        return;
    };
    let first = mapper
        .write_with(&value, &ser)
        .expect("accepted value must serialize");
    let again: Value = mapper
        .read_with(&first, &de)
        .expect("serialized value must parse");
    let second = mapper
        .write_with(&again, &ser)
        .expect("reparsed value must serialize");
    assert_eq!(first, second);

    if !lenient {
        serde_json::from_str::<serde_json::Value>(&first).expect("strict output is valid JSON");
    }
}

fuzz_target!(|data: &[u8]| roundtrip(data));
