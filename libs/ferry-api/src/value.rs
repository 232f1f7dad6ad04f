use std::fmt;

use serde::{Deserialize, Serialize};

/// Untyped value as it arrives from the transport.
///
/// Exactly one variant is active, so the tag always agrees with the payload.
///
/// - Scalars (Bool, Int, String): converted by the scalar converters
/// - Float: only a marker for kind inference, no converter accepts it
/// - List, Map: recursive, need an explicit element/key/value descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<WireValue>),
    /// Entries in wire order. Keys are not required to be unique.
    Map(Vec<(WireValue, WireValue)>),
}

/// Tag of the active `WireValue` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireTag {
    Bool,
    Int,
    Float,
    String,
    List,
    Map,
}

impl WireValue {
    pub fn tag(&self) -> WireTag {
        match self {
            WireValue::Bool(_) => WireTag::Bool,
            WireValue::Int(_) => WireTag::Int,
            WireValue::Float(_) => WireTag::Float,
            WireValue::String(_) => WireTag::String,
            WireValue::List(_) => WireTag::List,
            WireValue::Map(_) => WireTag::Map,
        }
    }
}

impl fmt::Display for WireTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireTag::Bool => f.write_str("bool"),
            WireTag::Int => f.write_str("int"),
            WireTag::Float => f.write_str("float"),
            WireTag::String => f.write_str("string"),
            WireTag::List => f.write_str("list"),
            WireTag::Map => f.write_str("map"),
        }
    }
}

/// Collections nested deeper than this render as `[...]` or `{...}`.
const DISPLAY_DEPTH: usize = 8;

/// Compact representation, used to name map keys in error messages.
///
/// Strings are quoted: `key "x": ...`. Nesting is cut off at
/// `DISPLAY_DEPTH`, so rendering never recurses further than that.
impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_compact(f, DISPLAY_DEPTH)
    }
}

impl WireValue {
    fn write_compact(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self {
            WireValue::Bool(b) => write!(f, "{b}"),
            WireValue::Int(i) => write!(f, "{i}"),
            WireValue::Float(x) => write!(f, "{x:?}"),
            WireValue::String(s) => write!(f, "{s:?}"),
            WireValue::List(items) if items.is_empty() => f.write_str("[]"),
            WireValue::List(_) if depth == 0 => f.write_str("[...]"),
            WireValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.write_compact(f, depth - 1)?;
                }
                f.write_str("]")
            }
            WireValue::Map(entries) if entries.is_empty() => f.write_str("{}"),
            WireValue::Map(_) if depth == 0 => f.write_str("{...}"),
            WireValue::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    k.write_compact(f, depth - 1)?;
                    f.write_str(": ")?;
                    v.write_compact(f, depth - 1)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for WireValue {
    fn from(b: bool) -> Self {
        WireValue::Bool(b)
    }
}

impl From<i64> for WireValue {
    fn from(i: i64) -> Self {
        WireValue::Int(i)
    }
}

impl From<&str> for WireValue {
    fn from(s: &str) -> Self {
        WireValue::String(s.to_string())
    }
}

impl From<String> for WireValue {
    fn from(s: String) -> Self {
        WireValue::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_matches_variant() {
        assert_eq!(WireValue::Bool(true).tag(), WireTag::Bool);
        assert_eq!(WireValue::Int(1).tag(), WireTag::Int);
        assert_eq!(WireValue::Float(1.5).tag(), WireTag::Float);
        assert_eq!(WireValue::from("a").tag(), WireTag::String);
        assert_eq!(WireValue::List(vec![]).tag(), WireTag::List);
        assert_eq!(WireValue::Map(vec![]).tag(), WireTag::Map);
    }

    #[test]
    fn display_quotes_strings() {
        assert_eq!(WireValue::from("x").to_string(), "\"x\"");
        assert_eq!(WireValue::from("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(WireValue::Int(-3).to_string(), "-3");
        assert_eq!(WireValue::Float(2.0).to_string(), "2.0");
    }

    #[test]
    fn display_nested() {
        let v = WireValue::Map(vec![(
            WireValue::Int(1),
            WireValue::List(vec![WireValue::from("a"), WireValue::Bool(false)]),
        )]);
        assert_eq!(v.to_string(), "{1: [\"a\", false]}");
    }

    #[test]
    fn display_cuts_off_deep_nesting() {
        let mut v = WireValue::Int(1);
        for _ in 0..10_000 {
            v = WireValue::List(vec![v]);
        }
        let expected = format!("{}[...]{}", "[".repeat(DISPLAY_DEPTH), "]".repeat(DISPLAY_DEPTH));
        assert_eq!(v.to_string(), expected);

        let map = WireValue::Map(vec![(WireValue::Int(1), WireValue::List(vec![]))]);
        let mut nested = map.clone();
        for _ in 0..DISPLAY_DEPTH {
            nested = WireValue::List(vec![nested]);
        }
        assert!(nested.to_string().contains("{...}"));
        assert_eq!(map.to_string(), "{1: []}");
    }

    #[test]
    fn json_encoding_is_externally_tagged() {
        let v: WireValue =
            serde_json::from_str(r#"{"map": [[{"int": 1}, {"string": "a"}]]}"#).unwrap();
        assert_eq!(
            v,
            WireValue::Map(vec![(WireValue::Int(1), WireValue::from("a"))])
        );
        assert_eq!(
            serde_json::to_string(&WireValue::List(vec![WireValue::Bool(true)])).unwrap(),
            r#"{"list":[{"bool":true}]}"#
        );
    }
}
