//! Batch decoding of a whole save stream.
//!
//! The de-obfuscated save text is one command-separated stream framed by
//! begin/end markers: any number of leading empty commands, then the
//! piece block (itself a nested command stream), then one state string
//! per game component. Batch policy: N inputs yield N outputs; a record
//! whose decode fails structurally degrades to a raw-text fallback with
//! an error marker instead of aborting its siblings.

use crate::chain::LinkRegistry;
use crate::command::decode_command;
use crate::component::{decode_component, ComponentRegistry};
use crate::diagnostics::Diagnostics;
use crate::error::DecodeError;
use crate::schema::Record;
use crate::tokenize::split_seq;
use crate::{COMMAND_SEPARATOR, SAVE_BEGIN, SAVE_END};
use serde_json::{json, Value};

/// Everything recovered from one save stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveBody {
    /// One entry per piece command, in stream order. Failed commands
    /// appear as `{raw, error}` fallbacks.
    pub pieces: Vec<Value>,
    /// One record per game component, in stream order.
    pub components: Vec<Record>,
}

impl SaveBody {
    /// Legacy output shape.
    pub fn to_value(&self) -> Value {
        json!({
            "restorePieces": self.pieces,
            "components": self.components,
        })
    }
}

/// Decode an already-de-obfuscated save stream.
pub fn decode_save(
    links: &LinkRegistry,
    components: &ComponentRegistry,
    text: &str,
    diag: &mut Diagnostics,
) -> Result<SaveBody, DecodeError> {
    let commands = split_seq(Some(text), COMMAND_SEPARATOR, None)?;
    if commands.len() < 2 || commands[0] != SAVE_BEGIN {
        return Err(DecodeError::MissingMarker { marker: SAVE_BEGIN });
    }
    if commands[commands.len() - 1] != SAVE_END {
        return Err(DecodeError::MissingMarker { marker: SAVE_END });
    }

    // leading empty commands carry no state (version checks and the like)
    let mut body = &commands[1..commands.len() - 1];
    while let Some((first, rest)) = body.split_first() {
        if !first.is_empty() {
            break;
        }
        body = rest;
    }
    let (piece_block, component_states) =
        body.split_first().ok_or(DecodeError::EmptyStream)?;
    if !piece_block.starts_with(COMMAND_SEPARATOR) {
        return Err(DecodeError::MalformedPieceBlock {
            raw: piece_block.clone(),
        });
    }

    let piece_commands = split_seq(Some(piece_block), COMMAND_SEPARATOR, None)?;
    let mut pieces = Vec::new();
    for raw in &piece_commands[1..] {
        match decode_command(links, raw, diag) {
            Ok(command) => pieces.push(command.to_value()),
            Err(err) => {
                log::warn!("piece command degraded: {} (raw={:?})", err, raw);
                diag.failed_record("command");
                pieces.push(json!({"raw": raw, "error": err.to_string()}));
            }
        }
    }

    let mut decoded_components = Vec::new();
    for state in component_states {
        match decode_component(components, state, diag) {
            Ok(record) => decoded_components.push(record),
            Err(err) => {
                log::warn!("component degraded: {} (state={:?})", err, state);
                diag.failed_record("component");
                let mut record = Record::new();
                record.insert("rawState".to_owned(), Value::String(state.clone()));
                record.insert("error".to_owned(), Value::String(err.to_string()));
                decoded_components.push(record);
            }
        }
    }

    Ok(SaveBody {
        pieces,
        components: decoded_components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::LinkDecoder;
    use crate::coerce::Coerce;
    use crate::component::ComponentDecoder;
    use crate::schema::Schema;
    use crate::tokenize::join_seq;
    use serde_json::json;

    fn links() -> LinkRegistry {
        LinkRegistry::new().with(
            "piece",
            LinkDecoder::Layered {
                spec: None,
                state: Some(Schema::of([
                    ("mapId", Coerce::Str),
                    ("x", Coerce::Int),
                    ("y", Coerce::Int),
                    ("gpId", Coerce::Str),
                ])),
            },
        )
    }

    fn components() -> ComponentRegistry {
        ComponentRegistry::new().with(
            "BoardPicker",
            ComponentDecoder::Fields(Schema::of([
                ("id", Coerce::Str),
                ("name", Coerce::Str),
                ("x", Coerce::Int),
                ("y", Coerce::Int),
            ])),
        )
    }

    fn frame(piece_cmds: &[&str], component_states: &[&str]) -> String {
        // the piece block is a nested command stream with a leading separator
        let mut block = String::new();
        for cmd in piece_cmds {
            block.push(COMMAND_SEPARATOR);
            block.push_str(cmd);
        }
        let mut parts = vec![SAVE_BEGIN.to_owned(), String::new(), block];
        parts.extend(component_states.iter().map(|s| (*s).to_owned()));
        parts.push(SAVE_END.to_owned());
        join_seq(&parts, COMMAND_SEPARATOR)
    }

    #[test]
    fn well_formed_save_decodes_in_order() {
        let mut diag = Diagnostics::new();
        let text = frame(
            &["+/1/piece/m1;10;20;g1", "-/2"],
            &["MainBoardPicker\tMain\t0\t0"],
        );
        let body = decode_save(&links(), &components(), &text, &mut diag).unwrap();
        assert_eq!(body.pieces.len(), 2);
        assert_eq!(body.pieces[0]["add"]["piece"][0]["x"], json!(10));
        assert_eq!(body.pieces[1]["remove"]["id"], json!("2"));
        assert_eq!(body.components.len(), 1);
        assert_eq!(body.components[0]["kind"], json!("BoardPicker"));
        assert!(diag.is_clean());
    }

    #[test]
    fn one_bad_command_does_not_abort_the_batch() {
        let mut diag = Diagnostics::new();
        let text = frame(
            &["+/1/piece/m1;10;20;g1", "X/9", "-/2"],
            &[],
        );
        let body = decode_save(&links(), &components(), &text, &mut diag).unwrap();
        assert_eq!(body.pieces.len(), 3);
        assert_eq!(body.pieces[1]["raw"], json!("X/9"));
        assert!(body.pieces[1].get("error").is_some());
        assert_eq!(body.pieces[2]["remove"]["id"], json!("2"));
        assert_eq!(diag.failed_records.get("command"), Some(&1));
    }

    #[test]
    fn missing_markers_are_structural() {
        let mut diag = Diagnostics::new();
        let err = decode_save(&links(), &components(), "no markers here", &mut diag).unwrap_err();
        assert!(matches!(err, DecodeError::MissingMarker { marker } if marker == SAVE_BEGIN));

        let text = format!("{}{}oops", SAVE_BEGIN, COMMAND_SEPARATOR);
        let err = decode_save(&links(), &components(), &text, &mut diag).unwrap_err();
        assert!(matches!(err, DecodeError::MissingMarker { marker } if marker == SAVE_END));
    }

    #[test]
    fn all_empty_body_is_an_error() {
        let mut diag = Diagnostics::new();
        let text = format!(
            "{b}{s}{s}{s}{e}",
            b = SAVE_BEGIN,
            e = SAVE_END,
            s = COMMAND_SEPARATOR
        );
        let err = decode_save(&links(), &components(), &text, &mut diag).unwrap_err();
        assert!(matches!(err, DecodeError::EmptyStream));
    }

    #[test]
    fn piece_block_must_lead_with_a_separator() {
        let mut diag = Diagnostics::new();
        let text = join_seq(
            [SAVE_BEGIN, "not a piece block", SAVE_END],
            COMMAND_SEPARATOR,
        );
        let err = decode_save(&links(), &components(), &text, &mut diag).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPieceBlock { .. }));
    }
}
