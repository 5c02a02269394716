//! Envelope decoding for the top-level command grammar.
//!
//! Every command token is `prefix/id/...` with kind-specific fields after
//! the id. The prefix table is closed; unlike record tags, an unlisted
//! prefix is a hard error rather than a soft fallback.

use crate::chain::{decode_chain, LinkRegistry};
use crate::coerce::Coerce;
use crate::diagnostics::Diagnostics;
use crate::error::DecodeError;
use crate::schema::{Record, Schema};
use crate::tokenize::split_seq;
use serde_json::Value;

/// Field delimiter inside one command token.
pub const FIELD_DELIM: char = '/';

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Introduce a record; the type/state pair decodes to a decorator chain.
    Add {
        id: Option<String>,
        chain: Vec<Record>,
    },
    /// Retire a record by id.
    Remove { id: Option<String> },
    /// Replace a record's state, optionally remembering the previous one.
    /// Both states stay raw here; which schema applies depends on the
    /// record the id resolves to, which only the caller knows.
    Change {
        id: Option<String>,
        state: String,
        old_state: Option<String>,
    },
    /// Relocate a record; fixed nine-field layout.
    Move {
        id: Option<String>,
        fields: Record,
    },
}

fn move_schema() -> Schema {
    Schema::of([
        ("newMapId", Coerce::Str),
        ("newX", Coerce::Int),
        ("newY", Coerce::Int),
        ("newUnderId", Coerce::Str),
        ("oldMapId", Coerce::Str),
        ("oldX", Coerce::Int),
        ("oldY", Coerce::Int),
        ("oldUnderId", Coerce::Str),
        ("playerId", Coerce::Str),
    ])
}

/// Decode one envelope token into a [`Command`].
pub fn decode_command(
    registry: &LinkRegistry,
    token: &str,
    diag: &mut Diagnostics,
) -> Result<Command, DecodeError> {
    let fields = split_seq(Some(token), FIELD_DELIM, None)?;
    let prefix = fields[0].as_str();
    if !matches!(prefix, "+" | "-" | "D" | "M") {
        return Err(DecodeError::UnknownCommand {
            prefix: prefix.to_owned(),
            raw: token.to_owned(),
        });
    }
    if fields.len() < 2 {
        return Err(DecodeError::CommandArity {
            kind: "command",
            expected: "an id field",
            got: 0,
            raw: token.to_owned(),
        });
    }
    let id = match fields[1].as_str() {
        "null" => None,
        other => Some(other.to_owned()),
    };
    let rest = &fields[2..];

    match prefix {
        "+" => {
            if rest.len() != 2 {
                return Err(DecodeError::CommandArity {
                    kind: "add",
                    expected: "2 fields (type, state)",
                    got: rest.len(),
                    raw: token.to_owned(),
                });
            }
            let chain = decode_chain(registry, &rest[0], &rest[1], diag)?;
            Ok(Command::Add { id, chain })
        }
        "-" => {
            if !rest.is_empty() {
                return Err(DecodeError::CommandArity {
                    kind: "remove",
                    expected: "0 fields",
                    got: rest.len(),
                    raw: token.to_owned(),
                });
            }
            Ok(Command::Remove { id })
        }
        "D" => {
            if rest.is_empty() || rest.len() > 2 {
                return Err(DecodeError::CommandArity {
                    kind: "change",
                    expected: "1-2 fields (state, optional old state)",
                    got: rest.len(),
                    raw: token.to_owned(),
                });
            }
            Ok(Command::Change {
                id,
                state: rest[0].clone(),
                old_state: rest.get(1).cloned(),
            })
        }
        _ => {
            let fields = move_schema().apply(rest)?;
            Ok(Command::Move { id, fields })
        }
    }
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Remove { .. } => "remove",
            Command::Change { .. } => "change",
            Command::Move { .. } => "move",
        }
    }

    /// Legacy output shape: a one-key object tagged by the command kind.
    pub fn to_value(&self) -> Value {
        let mut data = Record::new();
        data.insert("id".to_owned(), id_value(self.id()));
        match self {
            Command::Add { chain, .. } => {
                data.insert(
                    "piece".to_owned(),
                    Value::Array(chain.iter().cloned().map(Value::Object).collect()),
                );
            }
            Command::Remove { .. } => {}
            Command::Change {
                state, old_state, ..
            } => {
                data.insert("state".to_owned(), Value::String(state.clone()));
                if let Some(old) = old_state {
                    data.insert("oldstate".to_owned(), Value::String(old.clone()));
                }
            }
            Command::Move { fields, .. } => {
                for (name, value) in fields {
                    data.insert(name.clone(), value.clone());
                }
            }
        }
        let mut outer = Record::new();
        outer.insert(self.kind().to_owned(), Value::Object(data));
        Value::Object(outer)
    }

    fn id(&self) -> Option<&str> {
        match self {
            Command::Add { id, .. }
            | Command::Remove { id }
            | Command::Change { id, .. }
            | Command::Move { id, .. } => id.as_deref(),
        }
    }
}

fn id_value(id: Option<&str>) -> Value {
    match id {
        Some(id) => Value::String(id.to_owned()),
        None => Value::Null,
    }
}
