//! `TypeDescriptor`: the compile-time substitute for runtime reflection.
//! Rust gives us no way to ask an arbitrary `T` "what are your fields" at
//! runtime, so `#[derive(JsonCoder)]` emits an `impl Described for T` that
//! answers the question once, at compile time, and `auto::codable` walks
//! the answer the same shape a reflection-based generator would walk a
//! live type handle.

/// Deferred construction of a nested descriptor. A plain `fn() -> T` rather
/// than a boxed closure: every thunk the derive macro emits is a
/// zero-capture function pointer (`<Field as Described>::describe`), so
/// there is nothing to capture and no allocation to pay for one.
pub type Thunk = fn() -> TypeDescriptor;

/// A type's shape, as seen by `auto`: record fields, union cases,
/// option/list/map/set/tuple/enum, minus the parts Rust's static type
/// system already gives for free (there is no
/// need to describe *which* concrete type a field holds beyond its own
/// nested descriptor, since the generator that actually builds coders is
/// driven by `JsonCodable`, not by interpreting this tree generically --
/// see `auto::codable`'s module doc for why).
#[derive(Clone)]
pub enum TypeDescriptor {
    /// A primitive with no further structure, named for diagnostics only
    /// (e.g. `"i32"`, `"String"`, `"Guid"`).
    Leaf(&'static str),
    Option(Thunk),
    List(Thunk),
    Set(Thunk),
    Map { key: Thunk, value: Thunk },
    Tuple(Vec<Thunk>),
    /// A C-like enum: every variant is a unit carrying a `#[repr(iNN)]`
    /// discriminant, extracted the same way the encoder does at runtime.
    Enum { repr: &'static str, members: Vec<(&'static str, i64)> },
    /// A record: `(json_key, field_thunk)` pairs in declaration order. The
    /// JSON key here is the bare Rust field name; `CaseStrategy::convert`
    /// is applied by the generator, not baked in here, since the same
    /// descriptor is reused across every case strategy a caller picks.
    Record { fields: Vec<(&'static str, Thunk)> },
    /// A discriminated union: one `(variant_name, field_thunks)` entry per
    /// variant. An empty `Vec` of thunks marks a unit variant.
    Union { cases: Vec<(&'static str, Vec<Thunk>)> },
}

/// A type that can describe its own shape, either by hand (for types from
/// other crates, written once in `auto::codable`) or via
/// `#[derive(JsonCoder)]` (for user records/enums).
pub trait Described {
    fn describe() -> TypeDescriptor;
}

/// Field-name casing strategy `auto` applies when deriving a record's JSON
/// keys from its Rust field names. Default is `PascalCase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseStrategy {
    #[default]
    PascalCase,
    CamelCase,
    SnakeCase,
}

impl CaseStrategy {
    /// `PascalCase` is the identity transform: Rust field names reaching
    /// this function are expected to already be written the way the wire
    /// format wants them when that's the chosen strategy (typically
    /// because the struct's author named fields to match an existing JSON
    /// contract). `CamelCase` lower-cases the first letter; `SnakeCase`
    /// additionally splits on every uppercase letter it finds after that.
    pub fn convert(self, field_name: &str) -> String {
        match self {
            CaseStrategy::PascalCase => field_name.to_string(),
            CaseStrategy::CamelCase => lower_first(field_name),
            CaseStrategy::SnakeCase => {
                let camel = lower_first(field_name);
                let mut out = String::with_capacity(camel.len() + 4);
                for c in camel.chars() {
                    if c.is_ascii_uppercase() {
                        out.push('_');
                        out.extend(c.to_lowercase());
                    } else {
                        out.push(c);
                    }
                }
                out
            }
        }
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pascal_case_is_identity() {
        assert_eq!(CaseStrategy::PascalCase.convert("FirstName"), "FirstName");
    }

    #[test]
    fn test_camel_case_lowers_first_letter_only() {
        assert_eq!(CaseStrategy::CamelCase.convert("FirstName"), "firstName");
    }

    #[test]
    fn test_snake_case_splits_on_uppercase() {
        assert_eq!(CaseStrategy::SnakeCase.convert("FirstName"), "first_name");
        assert_eq!(CaseStrategy::SnakeCase.convert("Id"), "id");
    }
}
