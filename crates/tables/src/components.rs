//! Game-component field tables.

use decant_core::{Coerce, ComponentDecoder, ComponentRegistry, NoteKind, Schema};

/// Registry of the game components we have a layout for. Identity tokens
/// carry the kind name with arbitrary surrounding text (board names,
/// instance counters), hence the substring registry.
pub fn component_registry() -> ComponentRegistry {
    ComponentRegistry::new()
        .with(
            "BoardPicker",
            ComponentDecoder::Fields(Schema::of([
                ("id", Coerce::Str),
                ("name", Coerce::Str),
                ("x", Coerce::Int),
                ("y", Coerce::Int),
            ])),
        )
        .with(
            "TurnTracker",
            ComponentDecoder::Fields(
                Schema::of([("id", Coerce::Str)]).with_trailing(
                    "levels",
                    Coerce::fields(
                        Schema::of([("turn", Coerce::Int), ("state", Coerce::Str)]),
                        '|',
                    ),
                ),
            ),
        )
        .with("NOTE", ComponentDecoder::Notes(note_kinds()))
}

fn note_kinds() -> Vec<NoteKind> {
    vec![
        NoteKind::new(
            "NOTES",
            "scenario",
            Schema::of([("text", Coerce::Formatted)]),
        ),
        NoteKind::new(
            "PNOTES",
            "public",
            Schema::of([("text", Coerce::Formatted)]),
        ),
        NoteKind::new(
            "PNOTE",
            "private",
            Schema::of([("owner", Coerce::Str), ("text", Coerce::Formatted)]),
        ),
        NoteKind::new(
            "SNOTE",
            "secret",
            Schema::of([
                ("name", Coerce::Str),
                ("owner", Coerce::Str),
                ("hidden", Coerce::Bool),
                ("text", Coerce::Formatted),
            ]),
        ),
    ]
}
