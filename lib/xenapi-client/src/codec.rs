// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schema-driven mapping between wire [`Value`]s and the typed data model.
//!
//! The codec is defined per type through the [`Codec`] trait. Every
//! encode/decode takes a context label naming where the value sits in the
//! call (`VM.start(force)`, `VM.get_record -> VMRecord.domid`, ...) so that
//! a [`CodecError`] can say exactly which value was wrong. Method
//! marshalling composes these per-type implementations and never adds
//! logic of its own.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{CodecError, CodecErrorKind};
use crate::value::Value;

/// Timestamps in the data model.
pub type Timestamp = DateTime<Utc>;

/// A type with a wire representation.
pub trait Codec: Sized {
    fn encode(&self, label: &str) -> Result<Value, CodecError>;

    fn decode(label: &str, value: &Value) -> Result<Self, CodecError>;

    /// The value a record field takes when the server omits it.
    fn zero() -> Self;
}

/// A type usable as the key of a mapping. XML-RPC struct member names are
/// strings, so keys always travel as text.
pub trait MapKey: Sized + Ord {
    fn to_key(&self, label: &str) -> Result<String, CodecError>;

    fn from_key(label: &str, key: &str) -> Result<Self, CodecError>;
}

/// Encoding side of [`Codec`], also implemented for borrowed forms such as
/// `str` so that facade parameters need not be owned.
pub trait ToWire {
    fn to_wire(&self, label: &str) -> Result<Value, CodecError>;
}

impl<T: Codec> ToWire for T {
    fn to_wire(&self, label: &str) -> Result<Value, CodecError> {
        self.encode(label)
    }
}

impl ToWire for str {
    fn to_wire(&self, _label: &str) -> Result<Value, CodecError> {
        Ok(Value::String(self.to_string()))
    }
}

impl<T: Codec> ToWire for [T] {
    fn to_wire(&self, label: &str) -> Result<Value, CodecError> {
        encode_items(self.iter(), label)
    }
}

fn encode_items<'a, T: Codec + 'a>(
    items: impl Iterator<Item = &'a T>,
    label: &str,
) -> Result<Value, CodecError> {
    items
        .enumerate()
        .map(|(i, item)| item.encode(&child_label(label, &format!("[{i}]"))))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Extends a context label with a nested segment.
///
/// Labels that end in whitespace (the `"X.o -> "` form used for results)
/// are joined directly; anything else gets a `.` separator.
pub fn child_label(label: &str, segment: &str) -> String {
    if label.is_empty() || label.ends_with(' ') || segment.starts_with('[') {
        format!("{label}{segment}")
    } else {
        format!("{label}.{segment}")
    }
}

/// The zero timestamp, `0001-01-01T00:00:00Z`. The server uses it to mean
/// "never".
pub fn zero_timestamp() -> Timestamp {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl Codec for String {
    fn encode(&self, _label: &str) -> Result<Value, CodecError> {
        Ok(Value::String(self.clone()))
    }

    fn decode(label: &str, value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(CodecError::mismatch(label, "string", other)),
        }
    }

    fn zero() -> Self {
        String::new()
    }
}

impl MapKey for String {
    fn to_key(&self, _label: &str) -> Result<String, CodecError> {
        Ok(self.clone())
    }

    fn from_key(_label: &str, key: &str) -> Result<Self, CodecError> {
        Ok(key.to_string())
    }
}

fn parse_int(label: &str, text: &str) -> Result<i64, CodecError> {
    let trimmed = text.trim();
    trimmed.parse::<i64>().map_err(|_| {
        let digits = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
        let kind = if !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
        {
            CodecErrorKind::IntegerOutOfRange(trimmed.to_string())
        } else {
            CodecErrorKind::InvalidInteger(text.to_string())
        };
        CodecError::new(label, kind)
    })
}

// 64-bit integers exceed XML-RPC's native 32-bit <int>, so they travel as
// decimal strings; native integers are accepted on decode as well.
impl Codec for i64 {
    fn encode(&self, _label: &str) -> Result<Value, CodecError> {
        Ok(Value::String(self.to_string()))
    }

    fn decode(label: &str, value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::Int(i) => Ok(*i),
            Value::String(s) => parse_int(label, s),
            other => Err(CodecError::mismatch(label, "integer", other)),
        }
    }

    fn zero() -> Self {
        0
    }
}

impl MapKey for i64 {
    fn to_key(&self, _label: &str) -> Result<String, CodecError> {
        Ok(self.to_string())
    }

    fn from_key(label: &str, key: &str) -> Result<Self, CodecError> {
        parse_int(label, key)
    }
}

impl Codec for f64 {
    fn encode(&self, label: &str) -> Result<Value, CodecError> {
        if self.is_finite() {
            Ok(Value::Double(*self))
        } else {
            Err(CodecError::new(label, CodecErrorKind::NonFiniteFloat(*self)))
        }
    }

    fn decode(label: &str, value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::Double(d) => Ok(*d),
            Value::Int(i) => Ok(*i as f64),
            Value::String(s) => s.trim().parse().map_err(|_| {
                CodecError::new(label, CodecErrorKind::InvalidFloat(s.clone()))
            }),
            other => Err(CodecError::mismatch(label, "double", other)),
        }
    }

    fn zero() -> Self {
        0.0
    }
}

impl Codec for bool {
    fn encode(&self, _label: &str) -> Result<Value, CodecError> {
        Ok(Value::Boolean(*self))
    }

    fn decode(label: &str, value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::Boolean(b) => Ok(*b),
            other => Err(CodecError::mismatch(label, "boolean", other)),
        }
    }

    fn zero() -> Self {
        false
    }
}

/// Accepts the compact XML-RPC form (`20240102T03:04:05Z`) as well as
/// RFC 3339. A missing zone designator means UTC.
fn parse_timestamp(label: &str, text: &str) -> Result<Timestamp, CodecError> {
    let text = text.trim();
    let bytes = text.as_bytes();
    let extended = if bytes.len() > 8
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[8] == b'T'
    {
        format!("{}-{}-{}{}", &text[..4], &text[4..6], &text[6..8], &text[8..])
    } else {
        text.to_string()
    };

    if let Ok(t) = DateTime::parse_from_rfc3339(&extended) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(
        extended.trim_end_matches('Z'),
        "%Y-%m-%dT%H:%M:%S%.f",
    )
    .map(|naive| naive.and_utc())
    .map_err(|_| {
        CodecError::new(label, CodecErrorKind::InvalidTimestamp(text.into()))
    })
}

impl Codec for Timestamp {
    fn encode(&self, _label: &str) -> Result<Value, CodecError> {
        Ok(Value::DateTime(self.format("%Y%m%dT%H:%M:%SZ").to_string()))
    }

    fn decode(label: &str, value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::DateTime(s) | Value::String(s) => parse_timestamp(label, s),
            other => {
                Err(CodecError::mismatch(label, "dateTime.iso8601", other))
            }
        }
    }

    fn zero() -> Self {
        zero_timestamp()
    }
}

/// Void results. Servers answer void calls with nil or, following the
/// XML-RPC rule that an untyped `<value/>` is a string, with "".
impl Codec for () {
    fn encode(&self, _label: &str) -> Result<Value, CodecError> {
        Ok(Value::Nil)
    }

    fn decode(label: &str, value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::Nil => Ok(()),
            Value::String(s) if s.is_empty() => Ok(()),
            other => Err(CodecError::new(
                label,
                CodecErrorKind::UnexpectedResult(other.to_string()),
            )),
        }
    }

    fn zero() -> Self {}
}

/// Values whose shape depends on data, such as event snapshots, stay
/// untyped until the caller knows what to decode them as.
impl Codec for Value {
    fn encode(&self, _label: &str) -> Result<Value, CodecError> {
        Ok(self.clone())
    }

    fn decode(_label: &str, value: &Value) -> Result<Self, CodecError> {
        Ok(value.clone())
    }

    fn zero() -> Self {
        Value::Nil
    }
}

impl<T: Codec> Codec for Vec<T> {
    fn encode(&self, label: &str) -> Result<Value, CodecError> {
        encode_items(self.iter(), label)
    }

    fn decode(label: &str, value: &Value) -> Result<Self, CodecError> {
        let Value::Array(items) = value else {
            return Err(CodecError::mismatch(label, "array", value));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                T::decode(&child_label(label, &format!("[{i}]")), item)
            })
            .collect()
    }

    fn zero() -> Self {
        Vec::new()
    }
}

impl<T: Codec + Ord> Codec for BTreeSet<T> {
    fn encode(&self, label: &str) -> Result<Value, CodecError> {
        encode_items(self.iter(), label)
    }

    fn decode(label: &str, value: &Value) -> Result<Self, CodecError> {
        let Value::Array(items) = value else {
            return Err(CodecError::mismatch(label, "array", value));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                T::decode(&child_label(label, &format!("[{i}]")), item)
            })
            .collect()
    }

    fn zero() -> Self {
        BTreeSet::new()
    }
}

impl<K: MapKey, V: Codec> Codec for BTreeMap<K, V> {
    fn encode(&self, label: &str) -> Result<Value, CodecError> {
        let mut members = BTreeMap::new();
        for (key, value) in self {
            let name = key.to_key(label)?;
            let encoded =
                value.encode(&child_label(label, &format!("[{name}]")))?;
            members.insert(name, encoded);
        }
        Ok(Value::Struct(members))
    }

    fn decode(label: &str, value: &Value) -> Result<Self, CodecError> {
        let Value::Struct(members) = value else {
            return Err(CodecError::mismatch(label, "struct", value));
        };
        members
            .iter()
            .map(|(name, member)| {
                let entry_label = child_label(label, &format!("[{name}]"));
                let key = K::from_key(&entry_label, name)?;
                let value = V::decode(&entry_label, member)?;
                Ok((key, value))
            })
            .collect()
    }

    fn zero() -> Self {
        BTreeMap::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn round_trip<T: Codec + PartialEq + std::fmt::Debug>(v: T) {
        let encoded = v.encode("test").unwrap();
        assert_eq!(T::decode("test", &encoded).unwrap(), v);
    }

    #[test]
    fn integers_accept_both_wire_forms() {
        assert_eq!(i64::decode("l", &Value::Int(-7)).unwrap(), -7);
        assert_eq!(i64::decode("l", &Value::from(" 42 ")).unwrap(), 42);
        assert_eq!(
            i64::decode("l", &Value::from("9223372036854775807")).unwrap(),
            i64::MAX
        );
        assert_eq!(42i64.encode("l").unwrap(), Value::from("42"));
    }

    #[test]
    fn integer_out_of_range_names_the_label() {
        let err = i64::decode(
            "VM.get_memory_static_max -> ",
            &Value::from("18446744073709551615"),
        )
        .unwrap_err();
        assert_eq!(err.label, "VM.get_memory_static_max -> ");
        assert_eq!(
            err.kind,
            CodecErrorKind::IntegerOutOfRange("18446744073709551615".into())
        );
        assert!(err.to_string().contains("outside the signed 64-bit range"));

        let err =
            i64::decode("l", &Value::from("-9223372036854775809")).unwrap_err();
        assert!(matches!(err.kind, CodecErrorKind::IntegerOutOfRange(_)));

        let err = i64::decode("l", &Value::from("12abc")).unwrap_err();
        assert!(matches!(err.kind, CodecErrorKind::InvalidInteger(_)));
    }

    #[test]
    fn booleans_are_not_coerced() {
        assert!(bool::decode("b", &Value::Boolean(true)).unwrap());
        let err = bool::decode("b", &Value::from("true")).unwrap_err();
        assert_eq!(
            err.kind,
            CodecErrorKind::TypeMismatch {
                expected: "boolean",
                found: "string"
            }
        );
    }

    #[test]
    fn floats_accept_strings_and_reject_non_finite() {
        assert_eq!(f64::decode("f", &Value::from("0.5")).unwrap(), 0.5);
        assert_eq!(f64::decode("f", &Value::Double(1.25)).unwrap(), 1.25);
        assert!(f64::decode("f", &Value::from("half")).is_err());
        assert!(matches!(
            f64::NAN.encode("f").unwrap_err().kind,
            CodecErrorKind::NonFiniteFloat(_)
        ));
    }

    #[test]
    fn timestamps() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        for text in [
            "20240102T03:04:05Z",
            "20240102T03:04:05",
            "2024-01-02T03:04:05Z",
            "2024-01-02T05:04:05+02:00",
        ] {
            assert_eq!(
                Timestamp::decode("t", &Value::DateTime(text.into())).unwrap(),
                expected,
                "{text}"
            );
        }
        assert_eq!(
            expected.encode("t").unwrap(),
            Value::DateTime("20240102T03:04:05Z".into())
        );

        let zero = Timestamp::decode(
            "t",
            &Value::DateTime("0001-01-01T00:00:00Z".into()),
        )
        .unwrap();
        assert_eq!(zero, zero_timestamp());
        assert_eq!(
            Timestamp::decode(
                "t",
                &Value::DateTime("00010101T00:00:00Z".into())
            )
            .unwrap(),
            zero_timestamp()
        );
        assert!(Timestamp::decode("t", &Value::from("yesterday")).is_err());
    }

    #[test]
    fn unit_accepts_nil_and_empty_string_only() {
        <()>::decode("v", &Value::Nil).unwrap();
        <()>::decode("v", &Value::from("")).unwrap();
        let err = <()>::decode("VM.start -> ", &Value::from("x")).unwrap_err();
        assert_eq!(err.label, "VM.start -> ");
    }

    #[test]
    fn element_errors_carry_their_position() {
        let wire = Value::Array(vec![Value::from("1"), Value::Boolean(true)]);
        let err = Vec::<i64>::decode("VM.get_x -> ", &wire).unwrap_err();
        assert_eq!(err.label, "VM.get_x -> [1]");

        let wire: Value =
            [("a".to_string(), Value::from("oops"))].into_iter().collect();
        let err = BTreeMap::<String, i64>::decode("Host.get_y -> ", &wire)
            .unwrap_err();
        assert_eq!(err.label, "Host.get_y -> [a]");
    }

    #[test]
    fn maps_with_integer_keys() {
        let mut utilisation = BTreeMap::new();
        utilisation.insert(0i64, 0.5f64);
        utilisation.insert(3i64, 1.0f64);
        let wire = utilisation.encode("m").unwrap();
        assert_eq!(wire.as_struct().unwrap()["3"], Value::Double(1.0));
        round_trip(utilisation);

        let wire: Value =
            [("x".to_string(), Value::Double(1.0))].into_iter().collect();
        assert!(BTreeMap::<i64, f64>::decode("m", &wire).is_err());
    }

    #[test]
    fn child_labels() {
        assert_eq!(child_label("VM.get_record -> ", "VMRecord.uuid"),
            "VM.get_record -> VMRecord.uuid");
        assert_eq!(child_label("a", "b"), "a.b");
        assert_eq!(child_label("a", "[0]"), "a[0]");
        assert_eq!(child_label("", "b"), "b");
    }

    proptest! {
        #[test]
        fn integers_round_trip_across_full_range(i in any::<i64>()) {
            let encoded = i.encode("i").unwrap();
            prop_assert_eq!(i64::decode("i", &encoded).unwrap(), i);
            prop_assert_eq!(i64::decode("i", &Value::Int(i)).unwrap(), i);
        }

        #[test]
        fn integers_beyond_range_are_rejected(hi in 1u64..=u64::MAX) {
            let text = (i64::MAX as i128 + hi as i128).to_string();
            let err = i64::decode("i", &Value::String(text)).unwrap_err();
            let out_of_range =
                matches!(err.kind, CodecErrorKind::IntegerOutOfRange(_));
            prop_assert!(out_of_range);
        }

        #[test]
        fn finite_floats_round_trip(f in any::<f64>().prop_filter(
            "finite",
            |f| f.is_finite(),
        )) {
            let encoded = f.encode("f").unwrap();
            prop_assert_eq!(f64::decode("f", &encoded).unwrap(), f);
        }

        #[test]
        fn timestamps_round_trip(secs in -62135596800i64..253402300799i64) {
            let t = DateTime::from_timestamp(secs, 0).unwrap();
            let encoded = t.encode("t").unwrap();
            prop_assert_eq!(Timestamp::decode("t", &encoded).unwrap(), t);
        }

        #[test]
        fn collections_round_trip(
            list in proptest::collection::vec(any::<String>(), 0..8),
            set in proptest::collection::btree_set(any::<i64>(), 0..8),
            map in proptest::collection::btree_map(
                any::<String>(),
                any::<bool>(),
                0..8,
            ),
        ) {
            let encoded = list.encode("l").unwrap();
            let decoded = Vec::<String>::decode("l", &encoded).unwrap();
            prop_assert_eq!(decoded, list);
            let encoded = set.encode("s").unwrap();
            let decoded = BTreeSet::<i64>::decode("s", &encoded).unwrap();
            prop_assert_eq!(decoded, set);
            let encoded = map.encode("m").unwrap();
            prop_assert_eq!(
                BTreeMap::<String, bool>::decode("m", &encoded).unwrap(),
                map
            );
        }
    }
}
