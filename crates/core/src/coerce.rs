//! String-to-value coercion.
//!
//! A closed set of coercer variants, chosen once when a schema is
//! constructed rather than re-derived per decode call. Every coercer is
//! total or fails explicitly with [`DecodeError::Coercion`]; nothing
//! silently defaults to zero.

use crate::error::DecodeError;
use crate::schema::Schema;
use crate::tokenize::split_seq;
use serde_json::{json, Map, Value};

/// Character the legacy encoder uses in place of a newline inside
/// formatted text fields.
pub const NEWLINE_SURROGATE: char = '|';

/// Modifier names by bit position of a keystroke mask.
const KEY_MODS: [&str; 14] = [
    "SHIFT",
    "CTRL",
    "META",
    "ALT",
    "BUTTON1",
    "ALT_GRAPH",
    "SHIFT_DOWN",
    "CTRL_DOWN",
    "META_DOWN",
    "ALT_DOWN",
    "BUTTON1_DOWN",
    "BUTTON2_DOWN",
    "BUTTON3_DOWN",
    "ALT_GRAPH_DOWN",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Coerce {
    Str,
    Int,
    Float,
    /// Loose legacy truthiness: empty is false, a leading `n`, `f`, or
    /// `0` (case-insensitive) is false, everything else is true.
    Bool,
    /// Formatted text: restore real newlines from the surrogate.
    Formatted,
    /// `"r,g,b"` triple rendered as a `rgb(...)` string; empty is null.
    Color,
    /// Keystroke `"code,mask"` pair expanded to code, key character,
    /// mask, and decoded modifier names.
    Key,
    /// Single-letter horizontal position code (`l`/`r`/`c`).
    HAlign,
    /// Single-letter vertical position code (`t`/`b`/`c`).
    VAlign,
    /// A list encoded on a secondary delimiter, each piece coerced with
    /// the element coercer.
    List { elem: Box<Coerce>, delim: char },
    /// A nested record encoded on a secondary delimiter.
    Fields { schema: Box<Schema>, delim: char },
    /// A key/value map: pairs on the outer delimiter, key from value on
    /// the inner one. Duplicate keys overwrite in iteration order.
    Pairs { list_delim: char, pair_delim: char },
}

impl Coerce {
    pub fn list(elem: Coerce, delim: char) -> Coerce {
        Coerce::List {
            elem: Box::new(elem),
            delim,
        }
    }

    pub fn fields(schema: Schema, delim: char) -> Coerce {
        Coerce::Fields {
            schema: Box::new(schema),
            delim,
        }
    }

    pub fn pairs(list_delim: char, pair_delim: char) -> Coerce {
        Coerce::Pairs {
            list_delim,
            pair_delim,
        }
    }

    fn target(&self) -> &'static str {
        match self {
            Coerce::Str => "str",
            Coerce::Int => "int",
            Coerce::Float => "float",
            Coerce::Bool => "bool",
            Coerce::Formatted => "formatted text",
            Coerce::Color => "color",
            Coerce::Key => "keystroke",
            Coerce::HAlign => "horizontal alignment",
            Coerce::VAlign => "vertical alignment",
            Coerce::List { .. } => "list",
            Coerce::Fields { .. } => "fields",
            Coerce::Pairs { .. } => "pairs",
        }
    }

    fn fail(&self, text: &str) -> DecodeError {
        DecodeError::Coercion {
            target: self.target(),
            text: text.to_owned(),
        }
    }

    /// Coerce one token.
    pub fn apply(&self, text: &str) -> Result<Value, DecodeError> {
        match self {
            Coerce::Str => Ok(Value::String(text.to_owned())),
            Coerce::Int => {
                let n: i64 = text.parse().map_err(|_| self.fail(text))?;
                Ok(Value::from(n))
            }
            Coerce::Float => {
                let f: f64 = text.parse().map_err(|_| self.fail(text))?;
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| self.fail(text))
            }
            Coerce::Bool => Ok(Value::Bool(boolish(text))),
            Coerce::Formatted => Ok(Value::String(text.replace(NEWLINE_SURROGATE, "\n"))),
            Coerce::Color => {
                if text.is_empty() {
                    Ok(Value::Null)
                } else {
                    Ok(Value::String(format!("rgb({})", text)))
                }
            }
            Coerce::Key => keystroke(text).ok_or_else(|| self.fail(text)),
            Coerce::HAlign => Ok(match text {
                "l" => json!("left"),
                "r" => json!("right"),
                "c" => json!("center"),
                _ => Value::Null,
            }),
            Coerce::VAlign => Ok(match text {
                "t" => json!("top"),
                "b" => json!("bottom"),
                "c" => json!("center"),
                _ => Value::Null,
            }),
            Coerce::List { elem, delim } => {
                let pieces = split_seq(Some(text), *delim, None)?;
                let items = pieces
                    .iter()
                    .map(|piece| elem.apply(piece))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(items))
            }
            Coerce::Fields { schema, delim } => {
                let tokens = split_seq(Some(text), *delim, None)?;
                Ok(Value::Object(schema.apply(&tokens)?))
            }
            Coerce::Pairs {
                list_delim,
                pair_delim,
            } => {
                let mut map = Map::new();
                for pair in split_seq(Some(text), *list_delim, None)? {
                    let kv = split_seq(Some(&pair), *pair_delim, None)?;
                    if kv.len() != 2 {
                        return Err(self.fail(&pair));
                    }
                    map.insert(kv[0].clone(), Value::String(kv[1].clone()));
                }
                Ok(Value::Object(map))
            }
        }
    }

    /// Coerce an optional token with absence defaults: a missing token is
    /// null; for string fields the literal text `"null"` is null; for
    /// every other type an empty token is null.
    pub fn apply_opt(&self, text: Option<&str>) -> Result<Value, DecodeError> {
        let s = match text {
            None => return Ok(Value::Null),
            Some(s) => s,
        };
        match self {
            Coerce::Str if s == "null" => Ok(Value::Null),
            Coerce::Str => Ok(Value::String(s.to_owned())),
            _ if s.is_empty() => Ok(Value::Null),
            _ => self.apply(s),
        }
    }
}

fn boolish(text: &str) -> bool {
    match text.chars().next() {
        None => false,
        Some(c) => !matches!(c.to_ascii_lowercase(), 'n' | 'f' | '0'),
    }
}

fn keystroke(text: &str) -> Option<Value> {
    if text.is_empty() {
        return Some(Value::Null);
    }
    let mut parts = text.split(',');
    let code: i64 = parts.next()?.parse().ok()?;
    let mask: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let key = char::from_u32(u32::try_from(code).ok()?)?;
    let mods: Vec<&str> = KEY_MODS
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, name)| *name)
        .collect();
    Some(json!({
        "code": code,
        "key": key.to_string(),
        "mask": mask,
        "mods": mods,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_parses_or_fails() {
        assert_eq!(Coerce::Int.apply("42").unwrap(), json!(42));
        assert_eq!(Coerce::Int.apply("-7").unwrap(), json!(-7));
        let err = Coerce::Int.apply("4x").unwrap_err();
        assert!(matches!(err, DecodeError::Coercion { target: "int", .. }));
        // no silent zero-default for empty input either
        assert!(Coerce::Int.apply("").is_err());
    }

    #[test]
    fn float_parses_or_fails() {
        assert_eq!(Coerce::Float.apply("0.5").unwrap(), json!(0.5));
        assert!(Coerce::Float.apply("half").is_err());
    }

    #[test]
    fn boolish_truth_table() {
        for falsy in ["", "n", "no", "N", "false", "F", "0"] {
            assert_eq!(Coerce::Bool.apply(falsy).unwrap(), json!(false), "{:?}", falsy);
        }
        for truthy in ["true", "t", "yes", "1", "anything"] {
            assert_eq!(Coerce::Bool.apply(truthy).unwrap(), json!(true), "{:?}", truthy);
        }
    }

    #[test]
    fn formatted_restores_newlines() {
        assert_eq!(
            Coerce::Formatted.apply("line one|line two").unwrap(),
            json!("line one\nline two")
        );
    }

    #[test]
    fn color_wraps_triple_and_nulls_empty() {
        assert_eq!(Coerce::Color.apply("0,0,0").unwrap(), json!("rgb(0,0,0)"));
        assert_eq!(Coerce::Color.apply("").unwrap(), Value::Null);
    }

    #[test]
    fn keystroke_decodes_code_and_mods() {
        let v = Coerce::Key.apply("67,130").unwrap();
        assert_eq!(v["code"], json!(67));
        assert_eq!(v["key"], json!("C"));
        assert_eq!(v["mask"], json!(130));
        assert_eq!(v["mods"], json!(["CTRL", "CTRL_DOWN"]));
    }

    #[test]
    fn keystroke_empty_is_null_and_garbage_fails() {
        assert_eq!(Coerce::Key.apply("").unwrap(), Value::Null);
        assert!(Coerce::Key.apply("67").is_err());
        assert!(Coerce::Key.apply("67,130,1").is_err());
        assert!(Coerce::Key.apply("-1,0").is_err());
    }

    #[test]
    fn alignment_codes_map_to_words() {
        assert_eq!(Coerce::HAlign.apply("l").unwrap(), json!("left"));
        assert_eq!(Coerce::VAlign.apply("b").unwrap(), json!("bottom"));
        assert_eq!(Coerce::HAlign.apply("x").unwrap(), Value::Null);
    }

    #[test]
    fn list_coerces_each_piece() {
        let v = Coerce::list(Coerce::Int, ',').apply("1,2,3").unwrap();
        assert_eq!(v, json!([1, 2, 3]));
        assert!(Coerce::list(Coerce::Int, ',').apply("1,x").is_err());
    }

    #[test]
    fn pairs_build_a_map_with_last_duplicate_winning() {
        let v = Coerce::pairs(',', '=').apply("a=1,b=2,a=3").unwrap();
        assert_eq!(v, json!({"a": "3", "b": "2"}));
        assert!(Coerce::pairs(',', '=').apply("a=1,b").is_err());
    }

    #[test]
    fn apply_opt_defaults() {
        assert_eq!(Coerce::Str.apply_opt(None).unwrap(), Value::Null);
        assert_eq!(Coerce::Str.apply_opt(Some("null")).unwrap(), Value::Null);
        assert_eq!(Coerce::Str.apply_opt(Some("")).unwrap(), json!(""));
        assert_eq!(Coerce::Int.apply_opt(Some("")).unwrap(), Value::Null);
        assert_eq!(Coerce::Int.apply_opt(Some("5")).unwrap(), json!(5));
    }
}
