#![allow(clippy::result_large_err)]
//! decant-core: schema-driven decoding of legacy sequence-encoded saves.
//!
//! The legacy application serializes its whole state as delimiter-joined,
//! backslash-escaped strings, and reuses that one encoding at several
//! nesting levels: the top-level command stream, per-record field lists,
//! per-field sub-lists, and recursively nested decorator records. None of
//! it is self-describing; the field layout for each record kind comes from
//! hand-maintained tables (see the decant-tables crate).
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`split_seq`] / [`join_seq`] -- escape-aware tokenizing
//! - [`Schema`] / [`Coerce`] -- field layouts and string-to-value coercion
//! - [`Registry`] -- ordered variant dispatch with substring matching
//! - [`decode_chain`] -- nested decorator chains
//! - [`decode_command`] -- the add/remove/change/move command envelope
//! - [`decode_component`] -- game-component states
//! - [`decode_save`] -- whole-save batch decoding
//! - [`Diagnostics`] -- mergeable unknown-tag and failure tallies

/// Separator between top-level commands in a save stream.
pub const COMMAND_SEPARATOR: char = '\u{001b}';
/// Framing marker opening the command stream of a save.
pub const SAVE_BEGIN: &str = "begin_save";
/// Framing marker closing the command stream of a save.
pub const SAVE_END: &str = "end_save";

pub mod chain;
pub mod coerce;
pub mod command;
pub mod component;
pub mod diagnostics;
pub mod error;
pub mod registry;
pub mod schema;
pub mod stream;
pub mod tokenize;

// ── Convenience re-exports ───────────────────────────────────────────

pub use chain::{decode_chain, LinkDecoder, LinkRegistry};
pub use coerce::Coerce;
pub use command::{decode_command, Command};
pub use component::{decode_component, ComponentDecoder, ComponentRegistry, NoteKind};
pub use diagnostics::Diagnostics;
pub use error::DecodeError;
pub use registry::Registry;
pub use schema::{ApplyOpts, Record, Schema};
pub use stream::{decode_save, SaveBody};
pub use tokenize::{dequote, join_seq, split_seq};
