//! End-to-end tests: source text through parser, builder, and
//! post-processing.

use crate::{parse_str, Position, Tree, TreeError, Value};
use hocon_parse::{ErrorKind, TokenKind};

fn parse(source: &str) -> Tree {
    parse_str(source).unwrap_or_else(|e| panic!("parse failed for {:?}: {}", source, e))
}

fn parse_err(source: &str) -> TreeError {
    parse_str(source).expect_err("expected parse failure")
}

fn text_at(tree: &Tree, path: &str) -> String {
    tree.get(path)
        .unwrap_or_else(|| panic!("no value at {:?}", path))
        .scalar_text()
        .unwrap_or_else(|| panic!("value at {:?} is not scalar", path))
}

/// Rewrite all token positions so trees from differently laid out sources
/// compare equal.
fn normalized(tree: Tree) -> Tree {
    fn norm_value(value: &mut Value) {
        match value {
            Value::Unresolved(toks) => {
                for tok in toks {
                    tok.pos = Position::START;
                }
            }
            Value::Object(obj) => {
                for entry in &mut obj.entries {
                    norm_value(&mut entry.value);
                }
            }
            Value::Array(arr) => {
                for item in &mut arr.items {
                    norm_value(item);
                }
            }
        }
    }
    let mut tree = tree;
    match &mut tree {
        Tree::Object(obj) => {
            for entry in &mut obj.entries {
                norm_value(&mut entry.value);
            }
        }
        Tree::Array(arr) => {
            for item in &mut arr.items {
                norm_value(item);
            }
        }
    }
    tree
}

#[test]
fn test_json_object() {
    let tree = parse(r#"{"a":1,"b":2}"#);
    let obj = tree.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    assert_eq!(text_at(&tree, "a"), "1");
    assert_eq!(text_at(&tree, "b"), "2");
}

#[test]
fn test_implicit_root_and_newline_separation() {
    let tree = parse("a = 1\nb = 2\n");
    let obj = tree.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    assert_eq!(text_at(&tree, "a"), "1");
    assert_eq!(text_at(&tree, "b"), "2");
}

#[test]
fn test_newline_equals_comma() {
    assert_eq!(
        normalized(parse("{a=1\nb=2}")),
        normalized(parse("{a=1, b=2}"))
    );
}

#[test]
fn test_dotted_key_expands() {
    let tree = parse(r#"a.b.c = "x""#);
    assert_eq!(text_at(&tree, "a.b.c"), "x");
    // The intermediate levels are objects
    assert!(tree.get("a").unwrap().as_object().is_some());
    assert!(tree.get("a.b").unwrap().as_object().is_some());
}

#[test]
fn test_dotted_key_round_trips_with_braces() {
    assert_eq!(
        normalized(parse("a.b = 1")),
        normalized(parse("a { b = 1 }"))
    );
}

#[test]
fn test_dotted_siblings_merge() {
    let tree = parse("a.x = 1\na.y = 2");
    assert_eq!(text_at(&tree, "a.x"), "1");
    assert_eq!(text_at(&tree, "a.y"), "2");
    assert_eq!(tree.get("a").unwrap().as_object().unwrap().len(), 2);
}

#[test]
fn test_duplicate_assign_last_wins() {
    let tree = parse("a = 1\na = 2\n");
    let obj = tree.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    assert_eq!(text_at(&tree, "a"), "2");
}

#[test]
fn test_duplicate_objects_deep_merge() {
    let tree = parse("a { x = 1 }\na { y = 2 }\n");
    let obj = tree.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    assert_eq!(text_at(&tree, "a.x"), "1");
    assert_eq!(text_at(&tree, "a.y"), "2");
}

#[test]
fn test_deep_merge_leaf_override() {
    let tree = parse("a { x = 1, y = 1 }\na { x = 2 }");
    assert_eq!(text_at(&tree, "a.x"), "2");
    assert_eq!(text_at(&tree, "a.y"), "1");
}

#[test]
fn test_assign_replaces_non_object() {
    // Overwrite only deep-merges when both values are objects
    let tree = parse("a { x = 1 }\na = 2");
    assert_eq!(text_at(&tree, "a"), "2");

    let tree = parse("a = 2\na { x = 1 }");
    assert_eq!(text_at(&tree, "a.x"), "1");
}

#[test]
fn test_append_arrays_concatenate() {
    let tree = parse("a = [1, 2]\na += [3]");
    let arr = tree.get("a").unwrap().as_array().unwrap();
    let texts: Vec<_> = arr
        .iter()
        .map(|v| v.scalar_text().unwrap())
        .collect();
    assert_eq!(texts, vec!["1", "2", "3"]);
}

#[test]
fn test_append_objects_merge() {
    let tree = parse("a { x = 1 }\na += { y = 2 }");
    assert_eq!(text_at(&tree, "a.x"), "1");
    assert_eq!(text_at(&tree, "a.y"), "2");
}

#[test]
fn test_append_scalars_sequence_tokens() {
    let tree = parse("a = 1\na += 2");
    let toks = tree.get("a").unwrap().as_unresolved().unwrap();
    assert_eq!(toks.len(), 2);
    assert_eq!((toks[0].kind, toks[0].text.as_str()), (TokenKind::Number, "1"));
    assert_eq!((toks[1].kind, toks[1].text.as_str()), (TokenKind::Number, "2"));
}

#[test]
fn test_keys_sorted_bytewise() {
    let tree = parse("c = 1\nb = 2\nz = 3\na = 4");
    let keys: Vec<_> = tree
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, _)| k.to_string())
        .collect();
    assert_eq!(keys, vec!["a", "b", "c", "z"]);
}

#[test]
fn test_merge_with_self_is_idempotent() {
    let doc = "a { x = 1 }\nb = 2\n";
    let doubled = format!("{}{}", doc, doc);
    assert_eq!(normalized(parse(doc)), normalized(parse(&doubled)));
}

#[test]
fn test_root_array() {
    let tree = parse("[1, { a = 2 }]");
    let arr = tree.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr.get(0).unwrap().scalar_text().unwrap(), "1");
    let obj = arr.get(1).unwrap().as_object().unwrap();
    assert_eq!(obj.get("a").unwrap().scalar_text().unwrap(), "2");
}

#[test]
fn test_objects_inside_arrays_are_processed() {
    let tree = parse("items = [ { b = 1, a = 2, a = 3 } ]");
    let arr = tree.get("items").unwrap().as_array().unwrap();
    let obj = arr.get(0).unwrap().as_object().unwrap();
    let keys: Vec<_> = obj.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(obj.get("a").unwrap().scalar_text().unwrap(), "3");
}

#[test]
fn test_value_concatenation_preserves_whitespace() {
    let tree = parse("greeting = hello  big world");
    let toks = tree.get("greeting").unwrap().as_unresolved().unwrap();
    let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Unquoted,
            TokenKind::Ws,
            TokenKind::Unquoted,
            TokenKind::Ws,
            TokenKind::Unquoted,
        ]
    );
    assert_eq!(
        tree.get("greeting").unwrap().scalar_text().unwrap(),
        "hello  big world"
    );
}

#[test]
fn test_substitution_markers() {
    let tree = parse("a = ${x.y}\nb = ${?missing}");
    let toks = tree.get("a").unwrap().as_unresolved().unwrap();
    assert_eq!(toks.len(), 1);
    assert_eq!(toks[0].kind, TokenKind::Var);
    assert_eq!(toks[0].text, "x.y");

    let toks = tree.get("b").unwrap().as_unresolved().unwrap();
    assert_eq!(toks[0].kind, TokenKind::OptVar);
    assert_eq!(toks[0].text, "missing");
    assert_eq!(
        tree.get("b").unwrap().scalar_text().unwrap(),
        "${?missing}"
    );
}

#[test]
fn test_substitution_in_concatenation() {
    let tree = parse("path = ${base}/etc");
    let toks = tree.get("path").unwrap().as_unresolved().unwrap();
    let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Var, TokenKind::Unquoted]);
    assert_eq!(
        tree.get("path").unwrap().scalar_text().unwrap(),
        "${base}/etc"
    );
}

#[test]
fn test_inline_object_concatenation_merges() {
    let tree = parse("a = { x = 1 } { y = 2, x = 3 }");
    assert_eq!(text_at(&tree, "a.x"), "3");
    assert_eq!(text_at(&tree, "a.y"), "2");
}

#[test]
fn test_mixed_concatenation_is_an_error() {
    let err = parse_err("a = { x = 1 } oops");
    match err {
        TreeError::Build(build_err) => {
            assert!(build_err.to_string().contains("cannot concatenate"));
        }
        other => panic!("expected build error, got {}", other),
    }
}

#[test]
fn test_empty_document() {
    let tree = parse("");
    assert!(tree.as_object().unwrap().is_empty());
}

#[test]
fn test_quoted_keys() {
    let tree = parse(r#""a.b" = 1"#);
    // The dot is literal, not a path separator
    let obj = tree.as_object().unwrap();
    assert!(obj.contains_key("a.b"));
    assert!(obj.get("a").is_none());
}

#[test]
fn test_parse_errors_surface() {
    let err = parse_err("a = /* unterminated");
    match err {
        TreeError::Parse(parse_err) => {
            assert!(matches!(parse_err.kind(), ErrorKind::Syntax(_)));
        }
        other => panic!("expected parse error, got {}", other),
    }

    let err = parse_err("include \"f\"");
    match err {
        TreeError::Parse(parse_err) => {
            assert!(matches!(parse_err.kind(), ErrorKind::Unimplemented(_)));
        }
        other => panic!("expected parse error, got {}", other),
    }
}
