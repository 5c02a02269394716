//! Escape-aware splitting of sequence-encoded strings.
//!
//! The legacy encoder concatenates fields with a single delimiter
//! character, backslash-escaping embedded delimiters and single-quoting
//! values that end in a backslash (or are already quote-wrapped) so the
//! trailing backslash cannot escape the joining delimiter. Only one level
//! of escaping is interpreted per split; nested encodings become visible
//! one layer at a time as outer layers are peeled off.

use crate::error::DecodeError;

/// Private character used to park escaped delimiters during a split.
/// Legitimate input never contains it; finding it is a structural error.
pub const SENTINEL: char = '\u{0001}';

/// Split a sequence-encoded string on `delim`, honoring backslash escapes
/// and stripping one pair of surrounding single quotes per piece.
///
/// `None` input yields an empty sequence -- distinct from `Some("")`,
/// which yields a single empty token. When `max_splits` is given, the
/// final piece retains all remaining content unsplit.
pub fn split_seq(
    input: Option<&str>,
    delim: char,
    max_splits: Option<usize>,
) -> Result<Vec<String>, DecodeError> {
    let s = match input {
        None => return Ok(Vec::new()),
        Some(s) => s,
    };
    if s.contains(SENTINEL) {
        return Err(DecodeError::SentinelCollision {
            sentinel: SENTINEL,
            input: s.to_owned(),
        });
    }

    let delim_str = delim.to_string();
    let escaped = format!("\\{}", delim);
    let parked = s.replace(&escaped, &SENTINEL.to_string());

    let pieces: Vec<&str> = match max_splits {
        Some(n) => parked.splitn(n + 1, delim).collect(),
        None => parked.split(delim).collect(),
    };

    Ok(pieces
        .into_iter()
        .map(|piece| {
            let restored = piece.replace(SENTINEL, &delim_str);
            dequote(&restored).to_owned()
        })
        .collect())
}

/// Strip one pair of surrounding single quotes.
///
/// The check is purely on the first/last-character pattern; a value that
/// merely happens to begin and end with a literal quote is stripped too.
/// The legacy encoder produced exactly this behavior, so it is preserved
/// rather than fixed.
pub fn dequote(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Inverse of [`split_seq`] for a single nesting level: escape embedded
/// delimiters and quote pieces the legacy encoder would have quoted.
pub fn join_seq<I, S>(parts: I, delim: char) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let delim_str = delim.to_string();
    let escaped_delim = format!("\\{}", delim);
    let mut out = String::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            out.push(delim);
        }
        let part = part.as_ref();
        let quote = part.ends_with('\\')
            || (part.len() >= 2 && part.starts_with('\'') && part.ends_with('\''));
        if quote {
            out.push('\'');
        }
        out.push_str(&part.replace(&delim_str, &escaped_delim));
        if quote {
            out.push('\'');
        }
    }
    out
}
