//! Primitive encoders, total by construction: there is no JSON shape a
//! known Rust value can fail to become.
#![allow(non_snake_case)]

use super::Encoder;
use jcodec_value::JsonBuilder;
use uuid::Uuid;

macro_rules! narrow_integer_encoder {
    ($name:ident, $in:ty) => {
        #[doc = concat!("Encode `", stringify!($in), "` as a JSON integer.")]
        pub fn $name<J: JsonBuilder + 'static>() -> Encoder<J, $in> {
            Encoder::new(|v: &$in| J::i64(*v as i64))
        }
    };
}

macro_rules! wide_integer_encoder {
    ($name:ident, $in:ty) => {
        #[doc = concat!("Encode `", stringify!($in), "` as a JSON string: JSON numbers lose precision above 2^53.")]
        pub fn $name<J: JsonBuilder + 'static>() -> Encoder<J, $in> {
            Encoder::new(|v: &$in| J::string(v.to_string()))
        }
    };
}

narrow_integer_encoder!(i8, i8);
narrow_integer_encoder!(u8, u8);
narrow_integer_encoder!(i16, i16);
narrow_integer_encoder!(u16, u16);
narrow_integer_encoder!(i32, i32);
narrow_integer_encoder!(u32, u32);
wide_integer_encoder!(i64, i64);
wide_integer_encoder!(u64, u64);
wide_integer_encoder!(i128, i128);
wide_integer_encoder!(bigint, num_bigint::BigInt);
wide_integer_encoder!(decimal, bigdecimal::BigDecimal);

/// Encode a UTF-8 string.
pub fn string<J: JsonBuilder + 'static>() -> Encoder<J, String> {
    Encoder::new(|v: &String| J::string(v.clone()))
}

/// Encode a single character as a one-character JSON string.
pub fn char<J: JsonBuilder + 'static>() -> Encoder<J, char> {
    Encoder::new(|v: &char| J::string(v.to_string()))
}

/// Encode a boolean.
pub fn bool<J: JsonBuilder + 'static>() -> Encoder<J, bool> {
    Encoder::new(|v: &bool| J::bool(*v))
}

/// Encode `()` as `null`.
pub fn unit<J: JsonBuilder + 'static>() -> Encoder<J, ()> {
    Encoder::new(|_: &()| J::null())
}

/// Encode a float. `NaN`/`±Infinity` become `null` (the Elm-ecosystem
/// tradition this library follows, since JSON numbers have no
/// representation for either).
pub fn float<J: JsonBuilder + 'static>() -> Encoder<J, f64> {
    Encoder::new(|v: &f64| if v.is_finite() { J::f64(*v) } else { J::null() })
}

/// Encode a 32-bit float, widened to `f64` before the same non-finite
/// substitution [`float`] performs.
pub fn float32<J: JsonBuilder + 'static>() -> Encoder<J, f32> {
    Encoder::new(|v: &f32| {
        let v = *v as f64;
        if v.is_finite() {
            J::f64(v)
        } else {
            J::null()
        }
    })
}

/// Encode a GUID as its hyphenated string form.
pub fn guid<J: JsonBuilder + 'static>() -> Encoder<J, Uuid> {
    Encoder::new(|v: &Uuid| J::string(v.to_string()))
}

/// Encode a UTC timestamp in RFC-3339 form.
pub fn datetime_utc<J: JsonBuilder + 'static>() -> Encoder<J, time::OffsetDateTime> {
    Encoder::new(|v: &time::OffsetDateTime| {
        let text = v
            .format(&time::format_description::well_known::Rfc3339)
            .expect("OffsetDateTime always formats as RFC-3339");
        J::string(text)
    })
}

/// Encode an `OffsetDateTime`, preserving its offset, in RFC-3339 form.
pub fn datetime_offset<J: JsonBuilder + 'static>() -> Encoder<J, time::OffsetDateTime> {
    datetime_utc()
}

/// Encode a `PrimitiveDateTime` as UTC RFC-3339 text.
pub fn datetime_local<J: JsonBuilder + 'static>() -> Encoder<J, time::PrimitiveDateTime> {
    Encoder::new(|v: &time::PrimitiveDateTime| {
        let text = v
            .assume_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .expect("PrimitiveDateTime always formats as RFC-3339");
        J::string(text)
    })
}

/// Encode a duration as an ISO-8601 `PTnHnMnS` string.
pub fn timespan<J: JsonBuilder + 'static>() -> Encoder<J, time::Duration> {
    Encoder::new(|v: &time::Duration| {
        let total_seconds = v.whole_seconds();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        let nanos = v.subsec_nanoseconds().unsigned_abs();
        let text = if nanos == 0 {
            format!("PT{hours}H{minutes}M{seconds}S")
        } else {
            format!("PT{hours}H{minutes}M{seconds}.{nanos:09}S")
        };
        J::string(text)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_narrow_integer_is_json_number() {
        let enc: Encoder<Value, i32> = i32();
        assert_eq!(enc.encode(&-5), json!(-5));
    }

    #[test]
    fn test_wide_integer_is_json_string() {
        let enc: Encoder<Value, i64> = i64();
        assert_eq!(enc.encode(&9007199254740993), json!("9007199254740993"));
    }

    #[test]
    fn test_float_non_finite_is_null() {
        let enc: Encoder<Value, f64> = float();
        assert_eq!(enc.encode(&f64::NAN), Value::Null);
        assert_eq!(enc.encode(&f64::INFINITY), Value::Null);
        assert_eq!(enc.encode(&1.5), json!(1.5));
    }

    #[test]
    fn test_guid_roundtrips_as_string() {
        let id = Uuid::new_v4();
        let enc: Encoder<Value, Uuid> = guid();
        assert_eq!(enc.encode(&id), json!(id.to_string()));
    }

    #[test]
    fn test_timespan_formats_as_iso8601() {
        let enc: Encoder<Value, time::Duration> = timespan();
        assert_eq!(enc.encode(&time::Duration::seconds(5400)), json!("PT1H30M0S"));
    }
}
