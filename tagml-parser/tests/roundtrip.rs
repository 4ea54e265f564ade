//! Round-trip property: serializing a tree back to source and reparsing it
//! reproduces the tree, modulo the text normalization serialization implies
//! (adjacent text chunks merge, every text line ends with a newline).

use proptest::prelude::*;
use tagml_parser::tagml::{Child, NodeId, Parser, TagTree, ROOT_NAME};

const NAMES: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

#[derive(Debug, Clone)]
enum NodeSpec {
    Text(String),
    Tag(String, Vec<NodeSpec>),
}

/// Merge adjacent text specs, the shape a parse can actually produce.
fn normalize(children: Vec<NodeSpec>) -> Vec<NodeSpec> {
    let mut out: Vec<NodeSpec> = Vec::new();
    for child in children {
        match (out.last_mut(), child) {
            (Some(NodeSpec::Text(prev)), NodeSpec::Text(next)) => prev.push_str(&next),
            (_, other) => out.push(other),
        }
    }
    out
}

fn build(tree: &mut TagTree, parent: NodeId, spec: &NodeSpec) {
    match spec {
        NodeSpec::Text(text) => tree.append_text(parent, text.clone()),
        NodeSpec::Tag(name, children) => {
            let id = tree.new_node(name);
            tree.append_child(parent, Child::Tag(id));
            for child in children {
                build(tree, id, child);
            }
        }
    }
}

fn tree_from_specs(specs: &[NodeSpec]) -> TagTree {
    let mut tree = TagTree::new(ROOT_NAME);
    let root = tree.root();
    for spec in specs {
        build(&mut tree, root, spec);
    }
    tree
}

fn text_strategy() -> impl Strategy<Value = String> {
    // up to three newline-terminated lines; lines may carry metacharacters
    // and leading spaces but are never blank
    prop::collection::vec(
        proptest::string::string_regex("[ a-z{}\\[\\]\\\\]{1,10}")
            .unwrap()
            .prop_filter("line must not be blank", |line| !line.trim().is_empty()),
        1..4,
    )
    .prop_map(|lines| {
        lines
            .into_iter()
            .map(|line| format!("{}\n", line))
            .collect()
    })
}

fn spec_strategy() -> impl Strategy<Value = NodeSpec> {
    let leaf = text_strategy().prop_map(NodeSpec::Text);
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            prop::sample::select(NAMES.to_vec()),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, children)| NodeSpec::Tag(name.to_string(), normalize(children)))
    })
}

fn assert_roundtrip(tree: &TagTree) {
    let source = tree.to_source(tree.root());
    let parser = Parser::new(NAMES);
    let reparsed = parser.parse(&source).unwrap_or_else(|err| {
        panic!("reparse failed: {}\nsource:\n{}", err, source);
    });
    assert_eq!(
        reparsed.snapshot(reparsed.root()),
        tree.snapshot(tree.root()),
        "round trip diverged for source:\n{}",
        source
    );
}

#[test]
fn roundtrip_basic_block() {
    let parser = Parser::new(["tag"]);
    let doc = "Hello\n\\tag\n    World\n";
    let tree = parser.parse(doc).unwrap();
    assert_eq!(tree.to_source(tree.root()), doc);
    let again = parser.parse(&tree.to_source(tree.root())).unwrap();
    assert_eq!(again, tree);
}

#[test]
fn roundtrip_escaped_metacharacters() {
    let parser = Parser::new(["tag"]);
    let doc = "a \\{ b \\\\ c \\] d\n\\tag\n    \\ leading space\n";
    let tree = parser.parse(doc).unwrap();
    let again = parser.parse(&tree.to_source(tree.root())).unwrap();
    assert_eq!(again, tree);
}

#[test]
fn roundtrip_nested_blocks_and_blank_lines() {
    let parser = Parser::new(["alpha", "beta"]);
    let doc = "par one\n\npar two\n\\alpha\n    x\n    \\beta\n        y\n";
    let tree = parser.parse(doc).unwrap();
    assert_eq!(tree.to_source(tree.root()), doc);
    let again = parser.parse(&tree.to_source(tree.root())).unwrap();
    assert_eq!(again, tree);
}

#[test]
fn roundtrip_inline_tags_reserialize_in_block_form() {
    // inline constructs have no inline serialization; they come back as
    // block tags with the same children
    let parser = Parser::new(["alpha"]);
    let doc = "x \\alpha{inner}\n";
    let tree = parser.parse(doc).unwrap();
    let reparsed = parser.parse(&tree.to_source(tree.root())).unwrap();
    let root = reparsed.root();
    let alpha = reparsed.find(root, "alpha").unwrap();
    assert_eq!(reparsed.value(alpha).unwrap(), "inner");
}

#[test]
fn roundtrip_empty_tag() {
    let mut tree = TagTree::new(ROOT_NAME);
    let root = tree.root();
    let empty = tree.new_node("alpha");
    tree.append_child(root, Child::Tag(empty));
    tree.append_text(root, "after\n");
    assert_roundtrip(&tree);
}

proptest! {
    #[test]
    fn roundtrip_generated_trees(specs in prop::collection::vec(spec_strategy(), 0..5)) {
        let tree = tree_from_specs(&normalize(specs));
        assert_roundtrip(&tree);
    }
}
