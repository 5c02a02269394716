//! Recursive decoding of nested decorator chains.
//!
//! A decorated record serializes as paired type and state fields, each a
//! sequence of links joined on an inner delimiter. The type tag of each
//! link selects the schema for its slice of both fields; the innermost
//! link is the base record, every outer link one decorator wrapped
//! around it. Escaping makes deeper layers visible one level at a time,
//! so the decoder re-tokenizes and peels one pair per recursion step.

use crate::diagnostics::Diagnostics;
use crate::error::DecodeError;
use crate::registry::Registry;
use crate::schema::{Record, Schema};
use crate::tokenize::split_seq;
use serde_json::Value;

/// Inner delimiter separating chain links within one type/state field.
pub const CHAIN_DELIM: char = '\t';
/// Delimiter between a link's variant tag and its schema payload, and
/// between fields within a payload or state token.
pub const SPEC_DELIM: char = ';';
/// Number of link pairs visible at one nesting level; the format never
/// produces more.
pub const MAX_CHAIN_LINKS: usize = 2;

/// How one chain link turns its tag payload and state token into fields.
#[derive(Debug, Clone)]
pub enum LinkDecoder {
    /// A spec schema over the tag payload plus a state schema over the
    /// paired state token; either may be absent.
    Layered {
        spec: Option<Schema>,
        state: Option<Schema>,
    },
    /// Zip a delimited label list (payload) with a delimited value list
    /// (state) into a single map-valued field.
    LabelValues { field: String, delim: char },
}

pub type LinkRegistry = Registry<LinkDecoder>;

/// Decode a decorator chain from its paired type and state fields.
///
/// The returned list is ordered outermost-first. The type and state
/// fields must tokenize to the same number of links (the pairing is
/// otherwise lost -- a hard error), and no level may carry more than
/// [`MAX_CHAIN_LINKS`] links.
///
/// A coercion failure inside one link degrades that link to a fallback
/// record retaining its raw type and state text; the rest of the chain
/// still decodes. Structural failures propagate.
pub fn decode_chain(
    registry: &LinkRegistry,
    type_field: &str,
    state_field: &str,
    diag: &mut Diagnostics,
) -> Result<Vec<Record>, DecodeError> {
    let types = split_seq(Some(type_field), CHAIN_DELIM, None)?;
    let states = split_seq(Some(state_field), CHAIN_DELIM, None)?;
    if types.len() != states.len() {
        return Err(DecodeError::ChainMismatch {
            type_count: types.len(),
            state_count: states.len(),
            raw_type: type_field.to_owned(),
            raw_state: state_field.to_owned(),
        });
    }
    if types.len() > MAX_CHAIN_LINKS {
        return Err(DecodeError::ChainTooDeep {
            links: types.len(),
            raw_type: type_field.to_owned(),
        });
    }

    let mut links = vec![decode_link(registry, &types[0], &states[0], diag)?];
    if let Some((inner_type, inner_state)) = types.get(1).zip(states.get(1)) {
        links.extend(decode_chain(registry, inner_type, inner_state, diag)?);
    }
    Ok(links)
}

fn decode_link(
    registry: &LinkRegistry,
    raw_type: &str,
    raw_state: &str,
    diag: &mut Diagnostics,
) -> Result<Record, DecodeError> {
    let parts = split_seq(Some(raw_type), SPEC_DELIM, Some(1))?;
    let tag = parts[0].as_str();
    let payload = parts.get(1).map(String::as_str);

    let (key, decoder) = match registry.resolve(tag) {
        Some(hit) => hit,
        None => {
            diag.unknown_tag(tag);
            return Ok(fallback(tag, raw_type, raw_state, None));
        }
    };
    match apply_link(decoder, key, payload, raw_state) {
        Ok(record) => Ok(record),
        Err(err) if err.is_coercion() => {
            log::warn!(
                "link {:?} degraded: {} (type={:?}, state={:?})",
                key,
                err,
                raw_type,
                raw_state
            );
            diag.failed_record(key);
            Ok(fallback(tag, raw_type, raw_state, Some(&err)))
        }
        Err(err) => Err(err),
    }
}

fn apply_link(
    decoder: &LinkDecoder,
    key: &str,
    payload: Option<&str>,
    raw_state: &str,
) -> Result<Record, DecodeError> {
    let mut record = Record::new();
    record.insert("kind".to_owned(), Value::String(key.to_owned()));
    match decoder {
        LinkDecoder::Layered { spec, state } => {
            if let Some(schema) = spec {
                let tokens = split_seq(payload, SPEC_DELIM, None)?;
                for (name, value) in schema.apply(&tokens)? {
                    record.insert(name, value);
                }
            }
            if let Some(schema) = state {
                let tokens = split_seq(Some(raw_state), SPEC_DELIM, None)?;
                for (name, value) in schema.apply(&tokens)? {
                    record.insert(name, value);
                }
            }
        }
        LinkDecoder::LabelValues { field, delim } => {
            let labels = split_seq(payload, *delim, None)?;
            let values = split_seq(Some(raw_state), *delim, None)?;
            let mut map = Record::new();
            for (label, value) in labels.into_iter().zip(values) {
                map.insert(label, Value::String(value));
            }
            record.insert(field.clone(), Value::Object(map));
        }
    }
    Ok(record)
}

fn fallback(tag: &str, raw_type: &str, raw_state: &str, err: Option<&DecodeError>) -> Record {
    let mut record = Record::new();
    record.insert("kind".to_owned(), Value::String(tag.to_owned()));
    record.insert("rawType".to_owned(), Value::String(raw_type.to_owned()));
    record.insert("rawState".to_owned(), Value::String(raw_state.to_owned()));
    if let Some(err) = err {
        record.insert("error".to_owned(), Value::String(err.to_string()));
    }
    record
}
