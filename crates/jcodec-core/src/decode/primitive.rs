//! Primitive decoders: the leaves of the combinator algebra, each
//! responsible for exactly one JSON shape.
#![allow(non_snake_case)]

use super::Decoder;
use crate::error::{generic_msg, DecodeError, ErrorReason};
use bigdecimal::BigDecimal;
use jcodec_value::{JsonKind, JsonValue};
use num_bigint::BigInt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! primitive_decoder {
    ($name:ident, $out:ty, $expected:literal, $get:expr) => {
        #[doc = concat!("Decode a JSON ", $expected, ".")]
        pub fn $name<J: JsonValue + 'static>() -> Decoder<J, $out> {
            Decoder::new(|path, json| {
                let get: fn(&J) -> Option<$out> = $get;
                get(json).ok_or_else(|| {
                    DecodeError::new(
                        path,
                        ErrorReason::BadPrimitive {
                            expected: $expected.to_string(),
                            value: generic_msg($expected, json, false),
                        },
                    )
                })
            })
        }
    };
}

primitive_decoder!(string, String, "a string", |j| j.as_str().map(|s| s.to_string()));
primitive_decoder!(bool, bool, "a boolean", |j| j.as_bool());
primitive_decoder!(float, f64, "a float", |j| j.as_f64());
primitive_decoder!(float32, f32, "a float", |j| j.as_f32());

/// Decode a JSON string of exactly one character.
pub fn char<J: JsonValue + 'static>() -> Decoder<J, char> {
    Decoder::new(|path, json| {
        let s = json.as_str().ok_or_else(|| {
            DecodeError::new(
                path,
                ErrorReason::BadPrimitive {
                    expected: "a single character".to_string(),
                    value: generic_msg("a single character", json, false),
                },
            )
        })?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(DecodeError::new(
                path,
                ErrorReason::BadPrimitiveExtra {
                    expected: "a single character".to_string(),
                    value: generic_msg_str_for(s),
                    detail: "expected exactly one character".to_string(),
                },
            )),
        }
    })
}

fn generic_msg_str_for(s: &str) -> String {
    format!("\"{s}\"")
}

/// Decode a JSON `null` into `()`.
pub fn unit<J: JsonValue + 'static>() -> Decoder<J, ()> {
    Decoder::new(|path, json| {
        if json.kind() == JsonKind::Null {
            Ok(())
        } else {
            Err(DecodeError::new(
                path,
                ErrorReason::BadPrimitive {
                    expected: "null".to_string(),
                    value: generic_msg("null", json, false),
                },
            ))
        }
    })
}

macro_rules! integer_decoder {
    ($name:ident, $out:ty) => {
        #[doc = concat!("Decode a JSON number, or leniently a numeric string, into `", stringify!($out), "`.")]
        pub fn $name<J: JsonValue + 'static>() -> Decoder<J, $out> {
            Decoder::new(|path, json| {
                json.try_parse_integer::<$out>().ok_or_else(|| {
                    let expected = concat!("a ", stringify!($out)).to_string();
                    if json.looks_like_integer() {
                        DecodeError::new(
                            path,
                            ErrorReason::BadPrimitiveExtra {
                                value: generic_msg(&expected, json, false),
                                expected,
                                detail: "Value was either too large or too small".to_string(),
                            },
                        )
                    } else {
                        DecodeError::new(
                            path,
                            ErrorReason::BadPrimitive { value: generic_msg(&expected, json, false), expected },
                        )
                    }
                })
            })
        }
    };
}

integer_decoder!(i8, i8);
integer_decoder!(u8, u8);
integer_decoder!(i16, i16);
integer_decoder!(u16, u16);
integer_decoder!(i32, i32);
integer_decoder!(u32, u32);
integer_decoder!(i64, i64);
integer_decoder!(u64, u64);

/// Decode an RFC-4122 GUID, accepting either hyphenated or bare-hex form.
pub fn guid<J: JsonValue + 'static>() -> Decoder<J, Uuid> {
    Decoder::new(|path, json| {
        let s = json.as_str().ok_or_else(|| {
            DecodeError::new(
                path,
                ErrorReason::BadPrimitive {
                    expected: "a guid".to_string(),
                    value: generic_msg("a guid", json, false),
                },
            )
        })?;
        Uuid::parse_str(s).map_err(|e| {
            DecodeError::new(
                path,
                ErrorReason::BadPrimitiveExtra {
                    expected: "a guid".to_string(),
                    value: format!("\"{s}\""),
                    detail: e.to_string(),
                },
            )
        })
    })
}

/// Decode an arbitrary-precision decimal from a JSON string or number.
pub fn decimal<J: JsonValue + 'static>() -> Decoder<J, BigDecimal> {
    Decoder::new(|path, json| {
        let text = match (json.as_str(), json.as_f64()) {
            (Some(s), _) => s.to_string(),
            (None, Some(f)) => f.to_string(),
            (None, None) => {
                return Err(DecodeError::new(
                    path,
                    ErrorReason::BadPrimitive {
                        expected: "a decimal".to_string(),
                        value: generic_msg("a decimal", json, false),
                    },
                ))
            }
        };
        BigDecimal::from_str(&text).map_err(|e| {
            DecodeError::new(
                path,
                ErrorReason::BadPrimitiveExtra {
                    expected: "a decimal".to_string(),
                    value: text.clone(),
                    detail: e.to_string(),
                },
            )
        })
    })
}

/// Decode an arbitrary-precision integer from a JSON string or number.
pub fn bigint<J: JsonValue + 'static>() -> Decoder<J, BigInt> {
    Decoder::new(|path, json| {
        let text = match (json.as_str(), json.as_i64(), json.as_u64()) {
            (Some(s), _, _) => s.to_string(),
            (None, Some(n), _) => n.to_string(),
            (None, None, Some(n)) => n.to_string(),
            (None, None, None) => {
                return Err(DecodeError::new(
                    path,
                    ErrorReason::BadPrimitive {
                        expected: "a bigint".to_string(),
                        value: generic_msg("a bigint", json, false),
                    },
                ))
            }
        };
        BigInt::from_str(&text).map_err(|e| {
            DecodeError::new(
                path,
                ErrorReason::BadPrimitiveExtra {
                    expected: "a bigint".to_string(),
                    value: text.clone(),
                    detail: e.to_string(),
                },
            )
        })
    })
}

/// Decode an RFC-3339 timestamp into a UTC `OffsetDateTime`, normalizing any
/// other offset the input carried.
pub fn datetime_utc<J: JsonValue + 'static>() -> Decoder<J, time::OffsetDateTime> {
    Decoder::new(|path, json| {
        let s = require_string(path, json, "an RFC-3339 datetime")?;
        let parsed = time::OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339)
            .map_err(|e| {
                DecodeError::new(
                    path,
                    ErrorReason::BadPrimitiveExtra {
                        expected: "an RFC-3339 datetime".to_string(),
                        value: format!("\"{s}\""),
                        detail: e.to_string(),
                    },
                )
            })?;
        Ok(parsed.to_offset(time::UtcOffset::UTC))
    })
}

/// Decode an RFC-3339 timestamp into a `PrimitiveDateTime`, discarding the
/// offset -- a "local" (offset-naive) datetime.
pub fn datetime_local<J: JsonValue + 'static>() -> Decoder<J, time::PrimitiveDateTime> {
    Decoder::new(|path, json| {
        let s = require_string(path, json, "an RFC-3339 datetime")?;
        let parsed =
            time::OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339).map_err(|e| {
                DecodeError::new(
                    path,
                    ErrorReason::BadPrimitiveExtra {
                        expected: "an RFC-3339 datetime".to_string(),
                        value: format!("\"{s}\""),
                        detail: e.to_string(),
                    },
                )
            })?;
        Ok(time::PrimitiveDateTime::new(parsed.date(), parsed.time()))
    })
}

/// Decode an RFC-3339 timestamp into an `OffsetDateTime`, preserving its
/// original offset verbatim (unlike [`datetime_utc`], which normalizes).
pub fn datetime_offset<J: JsonValue + 'static>() -> Decoder<J, time::OffsetDateTime> {
    Decoder::new(|path, json| {
        let s = require_string(path, json, "an RFC-3339 datetime")?;
        time::OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339).map_err(|e| {
            DecodeError::new(
                path,
                ErrorReason::BadPrimitiveExtra {
                    expected: "an RFC-3339 datetime".to_string(),
                    value: format!("\"{s}\""),
                    detail: e.to_string(),
                },
            )
        })
    })
}

/// Decode an ISO-8601 duration string into `time::Duration`.
pub fn timespan<J: JsonValue + 'static>() -> Decoder<J, time::Duration> {
    Decoder::new(|path, json| {
        let s = require_string(path, json, "an ISO-8601 duration")?;
        parse_iso8601_duration(s).ok_or_else(|| {
            DecodeError::new(
                path,
                ErrorReason::BadPrimitiveExtra {
                    expected: "an ISO-8601 duration".to_string(),
                    value: format!("\"{s}\""),
                    detail: "expected a form like `PT1H30M`".to_string(),
                },
            )
        })
    })
}

fn require_string<'v, J: JsonValue>(path: &crate::path::Path, json: &'v J, expected: &str) -> Result<&'v str, DecodeError> {
    json.as_str().ok_or_else(|| {
        DecodeError::new(
            path,
            ErrorReason::BadPrimitive { expected: expected.to_string(), value: generic_msg(expected, json, false) },
        )
    })
}

/// A minimal `PnWdTnHnMnS` parser covering hours/minutes/seconds (the
/// subset this library's callers actually need for round-tripping
/// timespans; calendar-length `P`-prefixed years/months are rejected since
/// they aren't a fixed duration).
fn parse_iso8601_duration(s: &str) -> Option<time::Duration> {
    let rest = s.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (rest, None),
    };
    if !date_part.is_empty() {
        return None;
    }
    let time_part = time_part?;
    let mut seconds: f64 = 0.0;
    let mut number = String::new();
    for c in time_part.chars() {
        if c.is_ascii_digit() || c == '.' {
            number.push(c);
            continue;
        }
        let n: f64 = number.parse().ok()?;
        number.clear();
        match c {
            'H' => seconds += n * 3600.0,
            'M' => seconds += n * 60.0,
            'S' => seconds += n,
            _ => return None,
        }
    }
    if !number.is_empty() {
        return None;
    }
    Some(time::Duration::seconds_f64(seconds))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::from_value;
    use serde_json::json;

    #[test]
    fn test_string() {
        assert_eq!(from_value(&string(), &json!("hi")).unwrap(), "hi");
        assert!(from_value(&string(), &json!(1)).is_err());
    }

    #[test]
    fn test_char_requires_single_character() {
        assert_eq!(from_value(&char(), &json!("a")).unwrap(), 'a');
        assert!(from_value(&char(), &json!("ab")).is_err());
    }

    #[test]
    fn test_unit_requires_null() {
        assert!(from_value(&unit(), &json!(null)).is_ok());
        assert!(from_value(&unit(), &json!(1)).is_err());
    }

    #[test]
    fn test_i32_accepts_numeric_string() {
        assert_eq!(from_value(&i32(), &json!("42")).unwrap(), 42);
        assert_eq!(from_value(&i32(), &json!(42)).unwrap(), 42);
    }

    #[test]
    fn test_i32_out_of_range_is_bad_primitive_extra() {
        let err = from_value(&i32(), &json!(99999999999_i64)).unwrap_err();
        assert!(err.render().contains("Value was either too large or too small"));
    }

    #[test]
    fn test_i32_non_integral_is_bad_primitive_extra() {
        let err = from_value(&i32(), &json!(1.5)).unwrap_err();
        assert!(err.render().contains("Value was either too large or too small"));
    }

    #[test]
    fn test_i32_wrong_kind_is_bad_primitive_without_extra_detail() {
        let err = from_value(&i32(), &json!(true)).unwrap_err();
        assert!(!err.render().contains("too large or too small"));
    }

    #[test]
    fn test_guid_parses_hyphenated_form() {
        let id = Uuid::new_v4();
        let value = json!(id.to_string());
        assert_eq!(from_value(&guid(), &value).unwrap(), id);
    }

    #[test]
    fn test_decimal_from_string_and_number() {
        assert_eq!(from_value(&decimal(), &json!("1.50")).unwrap(), BigDecimal::from_str("1.50").unwrap());
        assert!(from_value(&decimal(), &json!(1.5)).is_ok());
    }

    #[test]
    fn test_bigint_from_large_numeric_string() {
        let value = json!("123456789012345678901234567890");
        let expected = BigInt::from_str("123456789012345678901234567890").unwrap();
        assert_eq!(from_value(&bigint(), &value).unwrap(), expected);
    }

    #[test]
    fn test_datetime_utc_parses_rfc3339() {
        let value = json!("2024-01-02T03:04:05Z");
        let parsed = from_value(&datetime_utc(), &value).unwrap();
        assert_eq!(parsed.year(), 2024);
    }

    #[test]
    fn test_datetime_utc_normalizes_other_offsets() {
        let value = json!("2024-01-02T05:04:05+02:00");
        let parsed = from_value(&datetime_utc(), &value).unwrap();
        assert_eq!(parsed.offset(), time::UtcOffset::UTC);
        assert_eq!(parsed.hour(), 3);
    }

    #[test]
    fn test_datetime_offset_preserves_original_offset() {
        let value = json!("2024-01-02T05:04:05+02:00");
        let parsed = from_value(&datetime_offset(), &value).unwrap();
        assert_eq!(parsed.offset(), time::UtcOffset::from_hms(2, 0, 0).unwrap());
        assert_eq!(parsed.hour(), 5);
    }

    #[test]
    fn test_timespan_parses_hours_minutes_seconds() {
        let value = json!("PT1H30M");
        let parsed = from_value(&timespan(), &value).unwrap();
        assert_eq!(parsed, time::Duration::seconds(5400));
    }

    #[test]
    fn test_timespan_rejects_calendar_duration() {
        assert!(from_value(&timespan(), &json!("P1Y")).is_err());
    }
}
