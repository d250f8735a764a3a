//! A self-referential type exercises the in-progress recursion cell
//! (Invariant 7): generation must terminate instead of recursing forever
//! the first time `Tree` is generated for itself.

use jcodec::auto::{generate_decoder, generate_encoder, CaseStrategy, ExtraCoders};
use jcodec::JsonCoder;

#[derive(Debug, Clone, PartialEq, JsonCoder)]
enum Tree {
    Leaf,
    Node(Box<Tree>, Box<Tree>),
}

#[test]
fn test_leaf_round_trips() {
    let enc = generate_encoder::<Tree>(CaseStrategy::PascalCase, ExtraCoders::new(), true).unwrap();
    let dec = generate_decoder::<Tree>(CaseStrategy::PascalCase, ExtraCoders::new(), true).unwrap();
    let encoded = enc.encode(&Tree::Leaf);
    assert_eq!(jcodec_core::decode::from_value(&dec, &encoded).unwrap(), Tree::Leaf);
}

#[test]
fn test_nested_tree_round_trips() {
    let enc = generate_encoder::<Tree>(CaseStrategy::PascalCase, ExtraCoders::new(), true).unwrap();
    let dec = generate_decoder::<Tree>(CaseStrategy::PascalCase, ExtraCoders::new(), true).unwrap();

    let tree = Tree::Node(
        Box::new(Tree::Node(Box::new(Tree::Leaf), Box::new(Tree::Leaf))),
        Box::new(Tree::Leaf),
    );
    let encoded = enc.encode(&tree);
    assert_eq!(jcodec_core::decode::from_value(&dec, &encoded).unwrap(), tree);
}

#[test]
fn test_malformed_node_fails_to_decode() {
    let dec = generate_decoder::<Tree>(CaseStrategy::PascalCase, ExtraCoders::new(), true).unwrap();
    assert!(jcodec_core::decode::from_value(&dec, &serde_json::json!(["Node", "Leaf"])).is_err());
}
