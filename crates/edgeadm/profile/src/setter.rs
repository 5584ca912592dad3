//! Path setter for `--set` style assignments
//!
//! Path syntax:
//! - `.` separates mapping keys, `\.` is a literal dot
//! - `name[i]` addresses element `i` of a sequence, `[i][j]` nests
//!
//! Value syntax:
//! - `true`, `false` and `null` become booleans and null
//! - integers become numbers, except those with a leading zero
//! - `{a,b}` becomes a sequence
//! - an unescaped `,` outside braces starts another `path=value` assignment

use crate::error::{ProfileError, Result};
use edgeadm_types::{OverrideExpression, ValueTree};
use serde_json::{Map, Number, Value};

/// Largest sequence index a path may address
pub const MAX_INDEX: usize = 65_536;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Apply one override expression to `tree`
pub fn apply(tree: &mut ValueTree, expression: &OverrideExpression) -> Result<()> {
    set(tree, &expression.to_string())
}

/// Apply a raw `path=value[,path=value...]` string to `tree`
pub fn set(tree: &mut ValueTree, input: &str) -> Result<()> {
    let fail = |reason: String| ProfileError::OverrideParse {
        expression: input.to_string(),
        reason,
    };

    let mut remaining = input;
    while !remaining.is_empty() {
        let (path, after) = remaining
            .split_once('=')
            .ok_or_else(|| fail(format!("key {:?} has no value", remaining)))?;
        if path.contains(',') {
            return Err(fail(format!("key {:?} has no value", path)));
        }

        let segments = parse_path(path).map_err(fail)?;
        let (raw, rest) = take_value(after);
        let value = typed_value(&raw);

        let mut root = Value::Object(std::mem::take(tree.as_map_mut()));
        assign(&mut root, &segments, value);
        if let Value::Object(map) = root {
            *tree.as_map_mut() = map;
        }

        remaining = rest.unwrap_or("");
    }
    Ok(())
}

fn parse_path(path: &str) -> std::result::Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut key = String::new();
    let mut chars = path.chars().peekable();
    // true right after `]`, where only `.`, `[` or the end may follow
    let mut after_index = false;

    while let Some(c) = chars.next() {
        if after_index && c != '.' && c != '[' {
            return Err(format!("unexpected {:?} after list index", c));
        }
        match c {
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| "path ends with an escape".to_string())?;
                key.push(escaped);
            }
            '.' => {
                if after_index {
                    after_index = false;
                    if chars.peek().is_none() {
                        return Err("path ends with '.'".to_string());
                    }
                    continue;
                }
                if key.is_empty() {
                    return Err("empty path segment".to_string());
                }
                segments.push(Segment::Key(std::mem::take(&mut key)));
                if chars.peek().is_none() {
                    return Err("path ends with '.'".to_string());
                }
            }
            '[' => {
                if !key.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut key)));
                } else if segments.is_empty() {
                    return Err("list index without a name".to_string());
                } else if !after_index {
                    return Err("empty path segment".to_string());
                }
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some(d) => digits.push(d),
                        None => return Err("unbalanced '['".to_string()),
                    }
                }
                let index: usize = digits
                    .parse()
                    .map_err(|_| format!("invalid list index {:?}", digits))?;
                if index > MAX_INDEX {
                    return Err(format!("list index {} exceeds {}", index, MAX_INDEX));
                }
                segments.push(Segment::Index(index));
                after_index = true;
            }
            ']' => return Err("unbalanced ']'".to_string()),
            other => key.push(other),
        }
    }

    if !key.is_empty() {
        segments.push(Segment::Key(key));
    } else if !after_index {
        return Err("empty path".to_string());
    }
    Ok(segments)
}

/// Split off one value, returning it unescaped plus whatever follows the
/// separating comma
fn take_value(input: &str) -> (String, Option<&str>) {
    let mut value = String::new();
    let mut depth = 0usize;
    let mut chars = input.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                if let Some((_, escaped)) = chars.next() {
                    value.push(escaped);
                }
            }
            '{' => {
                depth += 1;
                value.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                value.push(c);
            }
            ',' if depth == 0 => return (value, Some(&input[i + 1..])),
            other => value.push(other),
        }
    }
    (value, None)
}

fn typed_value(raw: &str) -> Value {
    if raw.len() >= 2 && raw.starts_with('{') && raw.ends_with('}') {
        let inner = &raw[1..raw.len() - 1];
        if inner.is_empty() {
            return Value::Array(Vec::new());
        }
        return Value::Array(inner.split(',').map(typed_scalar).collect());
    }
    typed_scalar(raw)
}

fn typed_scalar(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }
    let leading_zero = raw.len() > 1 && raw.starts_with('0');
    if !leading_zero {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Number(Number::from(n));
        }
    }
    Value::String(raw.to_string())
}

fn assign(node: &mut Value, segments: &[Segment], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    match head {
        Segment::Key(key) => {
            let mut map = match std::mem::take(node) {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            assign(map.entry(key.clone()).or_insert(Value::Null), rest, value);
            *node = Value::Object(map);
        }
        Segment::Index(index) => {
            let mut list = match std::mem::take(node) {
                Value::Array(list) => list,
                _ => Vec::new(),
            };
            if list.len() <= *index {
                list.resize(*index + 1, Value::Null);
            }
            assign(&mut list[*index], rest, value);
            *node = Value::Array(list);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree_after(inputs: &[&str]) -> Value {
        let mut tree = ValueTree::new();
        for input in inputs {
            set(&mut tree, input).unwrap();
        }
        Value::Object(tree.into_inner())
    }

    #[test]
    fn test_nested_keys_are_created() {
        assert_eq!(
            tree_after(&["cloudCore.image.tag=v1.12.0"]),
            json!({"cloudCore": {"image": {"tag": "v1.12.0"}}})
        );
    }

    #[test]
    fn test_typed_values() {
        assert_eq!(
            tree_after(&["a=true", "b=42", "c=007", "d=null", "e=text"]),
            json!({"a": true, "b": 42, "c": "007", "d": null, "e": "text"})
        );
    }

    #[test]
    fn test_indexed_paths_pad_sequences() {
        assert_eq!(
            tree_after(&["hub.addresses[1]=10.0.0.2"]),
            json!({"hub": {"addresses": [null, "10.0.0.2"]}})
        );
        assert_eq!(
            tree_after(&["list[0].name=a", "list[0].port=80", "grid[1][0]=x"]),
            json!({"list": [{"name": "a", "port": 80}], "grid": [null, ["x"]]})
        );
    }

    #[test]
    fn test_comma_starts_another_assignment() {
        assert_eq!(
            tree_after(&["a=1,b.c=two"]),
            json!({"a": 1, "b": {"c": "two"}})
        );
        assert_eq!(tree_after(&["a=x\\,y"]), json!({"a": "x,y"}));
    }

    #[test]
    fn test_brace_list() {
        assert_eq!(
            tree_after(&["names={a,b,3}"]),
            json!({"names": ["a", "b", 3]})
        );
    }

    #[test]
    fn test_escaped_dot_is_literal() {
        assert_eq!(
            tree_after(&["labels.kubeedge\\.io/edge=true"]),
            json!({"labels": {"kubeedge.io/edge": true}})
        );
    }

    #[test]
    fn test_overwrites_scalar_with_mapping() {
        assert_eq!(tree_after(&["a=1", "a.b=2"]), json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_container_kind_is_replaced_in_place() {
        assert_eq!(tree_after(&["a=1", "a[1]=x"]), json!({"a": [null, "x"]}));
        assert_eq!(tree_after(&["a.b=1", "a[0]=x"]), json!({"a": ["x"]}));
        assert_eq!(
            tree_after(&["a[0]=x", "a.b=1", "a.c[0]=y"]),
            json!({"a": {"b": 1, "c": ["y"]}})
        );
    }

    #[test]
    fn test_malformed_paths_rejected() {
        for input in [
            "a..b=1",
            ".a=1",
            "a.=1",
            "a[x]=1",
            "a[-1]=1",
            "a[1=1",
            "a]=1",
            "[0]=1",
            "a[0]b=1",
            "a[99999999]=1",
            "=1",
            "a,b=1",
        ] {
            let mut tree = ValueTree::new();
            let err = set(&mut tree, input).unwrap_err();
            assert!(
                matches!(err, ProfileError::OverrideParse { .. }),
                "{} should be rejected",
                input
            );
        }
    }
}
