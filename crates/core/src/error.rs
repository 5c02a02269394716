//! Decode error taxonomy.
//!
//! Structural errors abort the record they belong to and carry its raw
//! text; the batch layer isolates them per record so siblings keep
//! decoding. Coercion errors are recoverable at record granularity: the
//! enclosing layer degrades the record to a raw-text fallback instead of
//! propagating.

/// All errors the decoding engine can produce.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The escape-parking sentinel already occurs in the input, so the
    /// encoding assumption the tokenizer relies on does not hold.
    #[error("sentinel {sentinel:?} already present in input {input:?}")]
    SentinelCollision { sentinel: char, input: String },

    /// Token count cannot be reconciled with the field count under the
    /// active defaulting/truncation policy.
    #[error("arity mismatch: fields {fields:?} vs values {values:?}")]
    ArityMismatch {
        fields: Vec<String>,
        values: Vec<String>,
    },

    /// A single field's text cannot be converted to its declared type.
    #[error("cannot coerce {text:?} to {target}")]
    Coercion { target: &'static str, text: String },

    /// Type and state streams of a decorator chain no longer pair up;
    /// the association between links is lost.
    #[error(
        "mismatched chain: {type_count} type tokens vs {state_count} state tokens \
         (type={raw_type:?}, state={raw_state:?})"
    )]
    ChainMismatch {
        type_count: usize,
        state_count: usize,
        raw_type: String,
        raw_state: String,
    },

    /// More links at one nesting level than the format ever produces.
    #[error("chain has {links} links at one level, at most 2 supported (type={raw_type:?})")]
    ChainTooDeep { links: usize, raw_type: String },

    /// The command envelope grammar is closed; an unlisted prefix is
    /// unrecoverable.
    #[error("unknown command prefix {prefix:?} in {raw:?}")]
    UnknownCommand { prefix: String, raw: String },

    #[error("command {kind} expects {expected}, got {got} fields in {raw:?}")]
    CommandArity {
        kind: &'static str,
        expected: &'static str,
        got: usize,
        raw: String,
    },

    /// The note grammar is closed like the envelope grammar.
    #[error("unrecognized note type {tag:?} in {raw:?}")]
    UnknownNoteType { tag: String, raw: String },

    /// A layout item did not split into a derivation/base pair.
    #[error("layout item {raw:?} is not a derivation|base pair")]
    ItemShape { raw: String },

    #[error("save stream missing {marker:?} marker")]
    MissingMarker { marker: &'static str },

    #[error("save stream contains no commands between its markers")]
    EmptyStream,

    #[error("piece block does not start with an escaped command separator: {raw:?}")]
    MalformedPieceBlock { raw: String },
}

impl DecodeError {
    /// Recoverable at record granularity: the enclosing layer degrades
    /// the affected record or chain link to a raw-text fallback. All
    /// other variants are structural and abort the record.
    pub fn is_coercion(&self) -> bool {
        matches!(self, DecodeError::Coercion { .. })
    }
}
