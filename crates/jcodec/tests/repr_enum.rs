//! C-like enums: a `#[repr(iNN)]`, all-unit enum encodes/decodes via its
//! discriminant rather than its variant name.

use jcodec::auto::{generate_decoder, generate_encoder, CaseStrategy, ExtraCoders};
use jcodec::JsonCoder;

#[derive(Debug, Clone, Copy, PartialEq, JsonCoder)]
#[repr(u8)]
enum Priority {
    Low = 0,
    Medium = 5,
    High = 10,
}

#[test]
fn test_discriminant_round_trips() {
    let enc = generate_encoder::<Priority>(CaseStrategy::PascalCase, ExtraCoders::new(), true).unwrap();
    let dec = generate_decoder::<Priority>(CaseStrategy::PascalCase, ExtraCoders::new(), true).unwrap();

    for p in [Priority::Low, Priority::Medium, Priority::High] {
        let encoded = enc.encode(&p);
        assert_eq!(jcodec_core::decode::from_value(&dec, &encoded).unwrap(), p);
    }
    assert_eq!(enc.encode(&Priority::Medium), serde_json::json!(5));
}

#[test]
fn test_unknown_discriminant_fails_to_decode() {
    let dec = generate_decoder::<Priority>(CaseStrategy::PascalCase, ExtraCoders::new(), true).unwrap();
    assert!(jcodec_core::decode::from_value(&dec, &serde_json::json!(7)).is_err());
}
