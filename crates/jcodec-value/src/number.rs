//! Coercion of a JSON-visible number (a JSON integer or a numeric string)
//! into each of the fixed-width integer types the decoder primitives accept,
//! range-checked against Rust's explicit integer widths.

use std::str::FromStr;

/// A fixed-width integer type that [`crate::JsonValue::try_parse_integer`]
/// can target. Implemented for every integer width the decoder primitives
/// expose (`i8`..`u64`).
pub trait TryFromJsonNumber: Sized + Copy {
    fn from_i64(v: i64) -> Option<Self>;
    fn from_u64(v: u64) -> Option<Self>;
    fn from_decimal_str(s: &str) -> Option<Self>;
}

macro_rules! impl_try_from_json_number {
    ($($t:ty),+ $(,)?) => {
        $(
            impl TryFromJsonNumber for $t {
                fn from_i64(v: i64) -> Option<Self> {
                    <$t>::try_from(v).ok()
                }
                fn from_u64(v: u64) -> Option<Self> {
                    <$t>::try_from(v).ok()
                }
                fn from_decimal_str(s: &str) -> Option<Self> {
                    <$t>::from_str(s.trim()).ok()
                }
            }
        )+
    };
}

impl_try_from_json_number!(i8, u8, i16, u16, i32, u32, i64, u64);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_i32_range() {
        assert_eq!(i32::from_i64(42), Some(42));
        assert_eq!(i32::from_i64(i64::from(i32::MAX) + 1), None);
        assert_eq!(i32::from_u64(u64::MAX), None);
    }

    #[test]
    fn test_numeric_string_coercion() {
        assert_eq!(u64::from_decimal_str("18446744073709551615"), Some(u64::MAX));
        assert_eq!(i8::from_decimal_str("-129"), None);
        assert_eq!(i8::from_decimal_str("12.5"), None);
        assert_eq!(i8::from_decimal_str("12"), Some(12));
    }
}
