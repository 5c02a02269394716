//! Game-component state decoding.
//!
//! Components restore themselves from one opaque state string each. The
//! string's identity token -- the first tab field of its first
//! command-separated entry -- carries a registered kind name somewhere
//! inside it, so resolution goes through the substring registry.

use crate::diagnostics::Diagnostics;
use crate::error::DecodeError;
use crate::registry::Registry;
use crate::schema::{Record, Schema};
use crate::tokenize::split_seq;
use crate::COMMAND_SEPARATOR;
use serde_json::Value;

/// Field delimiter inside a component state entry.
pub const ENTRY_DELIM: char = '\t';

#[derive(Debug, Clone)]
pub enum ComponentDecoder {
    /// A tab-delimited schema over the whole state string.
    Fields(Schema),
    /// Notebook state: command-separated entries of `TAG\tfields...`,
    /// each tag drawn from a closed per-component table.
    Notes(Vec<NoteKind>),
}

#[derive(Debug, Clone)]
pub struct NoteKind {
    pub tag: String,
    pub category: String,
    pub schema: Schema,
}

impl NoteKind {
    pub fn new(tag: &str, category: &str, schema: Schema) -> NoteKind {
        NoteKind {
            tag: tag.to_owned(),
            category: category.to_owned(),
            schema,
        }
    }
}

pub type ComponentRegistry = Registry<ComponentDecoder>;

/// Decode one component state string.
///
/// Unmatched identity tokens fall back to a record retaining the raw
/// state (and tally as unknown tags); coercion failures degrade the same
/// way with an error marker. Structural failures propagate so the batch
/// layer can isolate them per component.
pub fn decode_component(
    registry: &ComponentRegistry,
    state: &str,
    diag: &mut Diagnostics,
) -> Result<Record, DecodeError> {
    let entries = split_seq(Some(state), COMMAND_SEPARATOR, None)?;
    let head = split_seq(Some(&entries[0]), ENTRY_DELIM, None)?;
    let id = head[0].as_str();

    let (key, decoder) = match registry.resolve(id) {
        Some(hit) => hit,
        None => {
            diag.unknown_tag(id);
            return Ok(fallback(id, state, None));
        }
    };
    let decoded = match decoder {
        ComponentDecoder::Fields(schema) => {
            let tokens = split_seq(Some(state), ENTRY_DELIM, None)?;
            schema.apply(&tokens)
        }
        ComponentDecoder::Notes(kinds) => decode_notes(kinds, state),
    };
    match decoded {
        Ok(fields) => {
            let mut record = Record::new();
            record.insert("kind".to_owned(), Value::String(key.to_owned()));
            for (name, value) in fields {
                record.insert(name, value);
            }
            Ok(record)
        }
        Err(err) if err.is_coercion() => {
            log::warn!("component {:?} degraded: {} (state={:?})", key, err, state);
            diag.failed_record(key);
            Ok(fallback(key, state, Some(&err)))
        }
        Err(err) => Err(err),
    }
}

fn decode_notes(kinds: &[NoteKind], state: &str) -> Result<Record, DecodeError> {
    let mut notes = Record::new();
    for entry in split_seq(Some(state), COMMAND_SEPARATOR, None)? {
        let fields = split_seq(Some(&entry), ENTRY_DELIM, None)?;
        let tag = fields[0].as_str();
        let kind = kinds
            .iter()
            .find(|k| k.tag == tag)
            .ok_or_else(|| DecodeError::UnknownNoteType {
                tag: tag.to_owned(),
                raw: state.to_owned(),
            })?;
        let mut note = Record::new();
        note.insert("type".to_owned(), Value::String(kind.category.clone()));
        let values = &fields[1..];
        if values.first().map_or(false, |v| !v.is_empty()) {
            for (name, value) in kind.schema.apply(values)? {
                note.insert(name, value);
            }
        }
        notes.insert(tag.to_owned(), Value::Object(note));
    }
    Ok(notes)
}

fn fallback(kind: &str, state: &str, err: Option<&DecodeError>) -> Record {
    let mut record = Record::new();
    record.insert("kind".to_owned(), Value::String(kind.to_owned()));
    record.insert("rawState".to_owned(), Value::String(state.to_owned()));
    if let Some(err) = err {
        record.insert("error".to_owned(), Value::String(err.to_string()));
    }
    record
}
