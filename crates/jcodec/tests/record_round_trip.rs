//! Derived records round-tripping through `auto`, exercising each case
//! strategy the way its author would actually choose it.

use jcodec::auto::{unsafe_from_string, CaseStrategy, ExtraCoders};
use jcodec::JsonCoder;

#[derive(Debug, Clone, PartialEq, JsonCoder)]
struct Point {
    x: f64,
    y: f64,
}

#[test]
fn test_snake_case_round_trips_already_snake_case_fields() {
    let p = Point { x: 1.5, y: -2.0 };
    let text =
        jcodec::auto::to_string(0, &p, CaseStrategy::SnakeCase, ExtraCoders::new(), true).unwrap();
    assert_eq!(text, r#"{"x":1.5,"y":-2.0}"#);
    let back: Point =
        unsafe_from_string(&text, CaseStrategy::SnakeCase, ExtraCoders::new(), true);
    assert_eq!(back, p);
}

/// Fields named to match a foreign PascalCase wire contract, the case
/// `CaseStrategy::CamelCase`/`PascalCase` are meant for (see
/// `CaseStrategy::convert`'s doc comment).
#[derive(Debug, Clone, PartialEq, JsonCoder)]
#[allow(non_snake_case)]
struct Account {
    AccountId: String,
    Balance: i64,
}

#[test]
fn test_pascal_case_keeps_field_names_as_written() {
    let a = Account { AccountId: "a1".to_string(), Balance: 500 };
    let text =
        jcodec::auto::to_string(0, &a, CaseStrategy::PascalCase, ExtraCoders::new(), true).unwrap();
    assert_eq!(text, r#"{"AccountId":"a1","Balance":500}"#);
}

#[test]
fn test_camel_case_lowers_only_the_first_letter() {
    let a = Account { AccountId: "a1".to_string(), Balance: 500 };
    let text =
        jcodec::auto::to_string(0, &a, CaseStrategy::CamelCase, ExtraCoders::new(), true).unwrap();
    assert_eq!(text, r#"{"accountId":"a1","balance":500}"#);
    let back: Account =
        unsafe_from_string(&text, CaseStrategy::CamelCase, ExtraCoders::new(), true);
    assert_eq!(back, a);
}

#[derive(Debug, Clone, PartialEq, JsonCoder)]
struct Profile {
    name: String,
    nickname: Option<String>,
}

#[test]
fn test_skip_null_field_omits_none_and_present_value_round_trips() {
    let p = Profile { name: "ana".to_string(), nickname: None };
    let text =
        jcodec::auto::to_string(0, &p, CaseStrategy::SnakeCase, ExtraCoders::new(), true).unwrap();
    assert_eq!(text, r#"{"name":"ana"}"#);
    let back: Profile =
        unsafe_from_string(&text, CaseStrategy::SnakeCase, ExtraCoders::new(), true);
    assert_eq!(back, p);

    let p2 = Profile { name: "ana".to_string(), nickname: Some("ani".to_string()) };
    let text2 =
        jcodec::auto::to_string(0, &p2, CaseStrategy::SnakeCase, ExtraCoders::new(), true).unwrap();
    assert_eq!(text2, r#"{"name":"ana","nickname":"ani"}"#);
}

#[test]
fn test_skip_null_field_false_writes_an_explicit_null() {
    let p = Profile { name: "ana".to_string(), nickname: None };
    let text =
        jcodec::auto::to_string(0, &p, CaseStrategy::SnakeCase, ExtraCoders::new(), false).unwrap();
    assert_eq!(text, r#"{"name":"ana","nickname":null}"#);
}
