//! Piece layout and image item tables.
//!
//! The build definition describes how generated piece images are drawn:
//! a layout string lists the items on a counter (`derivation|base` pairs,
//! comma-separated), and an image string lists concrete values for one
//! rendered instance of that layout. Both reuse the sequence encoding
//! with `;` fields and one bounded split after the kind tag.

use decant_core::chain::SPEC_DELIM;
use decant_core::{split_seq, Coerce, DecodeError, Diagnostics, Record, Registry, Schema};
use serde_json::Value;

/// Delimiter between items in a layout or image string.
pub const ITEM_DELIM: char = ',';
/// Delimiter between an item's derivation and its base placement.
pub const DERIVATION_DELIM: char = '|';

/// Placement fields shared by every layout item kind.
fn base_item_schema() -> Schema {
    Schema::of([
        ("name", Coerce::Str),
        ("location", Coerce::Str),
        ("xoffset", Coerce::Int),
        ("yoffset", Coerce::Int),
        ("rotation", Coerce::Int),
        ("antialias", Coerce::Bool),
    ])
}

/// Per-kind layout schemas. `TextBox` is registered before `Box` and
/// `Text`, which are both substrings of it.
fn layout_item_schemas() -> Registry<Schema> {
    Registry::new()
        .with(
            "TextBox",
            Schema::of([
                ("width", Coerce::Int),
                ("height", Coerce::Int),
                ("isHTML", Coerce::Bool),
            ]),
        )
        .with(
            "Box",
            Schema::of([
                ("width", Coerce::Int),
                ("height", Coerce::Int),
                ("shape", Coerce::Str),
                ("bevel", Coerce::Int),
            ]),
        )
        .with(
            "Text",
            Schema::of([
                ("fontStyleName", Coerce::Str),
                ("textSource", Coerce::Str),
                ("text", Coerce::Str),
                ("changeCmd", Coerce::Str),
                ("changeKey", Coerce::Key),
                ("lockCmd", Coerce::Str),
                ("lockKey", Coerce::Key),
                ("lockable", Coerce::Bool),
            ]),
        )
        .with(
            "Image",
            Schema::of([
                ("imageName", Coerce::Str),
                ("imageSource", Coerce::Str),
            ]),
        )
        .with(
            "Symbol",
            Schema::of([
                ("width", Coerce::Int),
                ("height", Coerce::Int),
                ("lineWidth", Coerce::Float),
            ]),
        )
}

fn image_item_schemas() -> Registry<Schema> {
    Registry::new()
        .with(
            "TextBox",
            Schema::of([
                ("name", Coerce::Str),
                ("location", Coerce::Str),
                ("fgColor", Coerce::Color),
                ("bgColor", Coerce::Color),
                ("value", Coerce::Str),
            ]),
        )
        .with(
            "Box",
            Schema::of([
                ("name", Coerce::Str),
                ("location", Coerce::Str),
                ("fgColor", Coerce::Color),
                ("borderColor", Coerce::Color),
            ]),
        )
        .with(
            "Text",
            Schema::of([
                ("name", Coerce::Str),
                ("location", Coerce::Str),
                ("fgColor", Coerce::Color),
                ("bgColor", Coerce::Color),
                ("value", Coerce::Str),
                ("outlineColor", Coerce::Color),
            ]),
        )
        .with(
            "Image",
            Schema::of([
                ("name", Coerce::Str),
                ("location", Coerce::Str),
                ("imageName", Coerce::Str),
            ]),
        )
        .with(
            "Symbol",
            Schema::of([
                ("name", Coerce::Str),
                ("location", Coerce::Str),
                ("fgColor", Coerce::Color),
                ("bgColor", Coerce::Color),
                ("size", Coerce::Str),
                ("symbol1", Coerce::Str),
                ("symbol2", Coerce::Str),
                ("sizeColor", Coerce::Color),
            ]),
        )
}

/// Decode a layout string into its items.
///
/// Each item is a `derivation|base` pair (anything else is structural);
/// the derivation's kind tag selects a per-kind schema merged after the
/// shared placement fields. Unknown kinds fall back to `{kind, spec}`.
pub fn decode_layout_items(
    layout: &str,
    diag: &mut Diagnostics,
) -> Result<Vec<Record>, DecodeError> {
    let registry = layout_item_schemas();
    let base = base_item_schema();
    let mut items = Vec::new();
    for spec in split_seq(Some(layout), ITEM_DELIM, None)? {
        let halves = split_seq(Some(&spec), DERIVATION_DELIM, None)?;
        if halves.len() != 2 {
            return Err(DecodeError::ItemShape { raw: spec });
        }
        let parts = split_seq(Some(&halves[0]), SPEC_DELIM, Some(1))?;
        let tag = parts[0].as_str();
        let payload = parts.get(1).map(String::as_str);
        let (key, schema) = match registry.resolve(tag) {
            Some(hit) => hit,
            None => {
                diag.unknown_tag(tag);
                items.push(item_fallback(tag, &spec, None));
                continue;
            }
        };
        let decoded = apply_item(key, schema, payload, Some((&base, halves[1].as_str())));
        items.push(settle(decoded, key, &spec, diag)?);
    }
    Ok(items)
}

/// Decode an image string into its items. Image items carry no base
/// placement half; the kind schema covers the whole payload.
pub fn decode_image_items(
    image: &str,
    diag: &mut Diagnostics,
) -> Result<Vec<Record>, DecodeError> {
    let registry = image_item_schemas();
    let mut items = Vec::new();
    for spec in split_seq(Some(image), ITEM_DELIM, None)? {
        let parts = split_seq(Some(&spec), SPEC_DELIM, Some(1))?;
        let tag = parts[0].as_str();
        let payload = parts.get(1).map(String::as_str);
        let (key, schema) = match registry.resolve(tag) {
            Some(hit) => hit,
            None => {
                diag.unknown_tag(tag);
                items.push(item_fallback(tag, &spec, None));
                continue;
            }
        };
        let decoded = apply_item(key, schema, payload, None);
        items.push(settle(decoded, key, &spec, diag)?);
    }
    Ok(items)
}

fn apply_item(
    key: &str,
    schema: &Schema,
    payload: Option<&str>,
    base: Option<(&Schema, &str)>,
) -> Result<Record, DecodeError> {
    let mut record = Record::new();
    record.insert("kind".to_owned(), Value::String(key.to_owned()));
    if let Some((base_schema, base_text)) = base {
        let tokens = split_seq(Some(base_text), SPEC_DELIM, None)?;
        for (name, value) in base_schema.apply(&tokens)? {
            record.insert(name, value);
        }
    }
    let tokens = split_seq(payload, SPEC_DELIM, None)?;
    for (name, value) in schema.apply(&tokens)? {
        record.insert(name, value);
    }
    Ok(record)
}

fn settle(
    decoded: Result<Record, DecodeError>,
    key: &str,
    spec: &str,
    diag: &mut Diagnostics,
) -> Result<Record, DecodeError> {
    match decoded {
        Ok(record) => Ok(record),
        Err(err) if err.is_coercion() => {
            log::warn!("item {:?} degraded: {} (spec={:?})", key, err, spec);
            diag.failed_record(key);
            Ok(item_fallback(key, spec, Some(&err)))
        }
        Err(err) => Err(err),
    }
}

fn item_fallback(kind: &str, spec: &str, err: Option<&DecodeError>) -> Record {
    let mut record = Record::new();
    record.insert("kind".to_owned(), Value::String(kind.to_owned()));
    record.insert("spec".to_owned(), Value::String(spec.to_owned()));
    if let Some(err) = err {
        record.insert("error".to_owned(), Value::String(err.to_string()));
    }
    record
}
