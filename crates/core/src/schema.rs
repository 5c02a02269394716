//! Schema application: binding a flat token sequence to named, typed fields.

use crate::coerce::Coerce;
use crate::error::DecodeError;
use serde_json::{Map, Value};

/// A decoded record: field name to coerced value, insertion-ordered.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub coerce: Coerce,
}

/// An ordered field layout for one record kind.
///
/// At most one variable-arity field is allowed and it must come last;
/// both invariants hold by construction -- the trailing field is a
/// separate slot, not a list entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
    trailing: Option<Field>,
}

/// Arity-reconciliation policy for [`Schema::apply_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOpts {
    /// Pad missing trailing tokens with absent values (the variable-arity
    /// slot is never padded; it becomes an empty list instead).
    pub use_defaults: bool,
    /// Truncate excess tokens instead of failing.
    pub ignore_excess: bool,
}

impl Default for ApplyOpts {
    fn default() -> ApplyOpts {
        ApplyOpts {
            use_defaults: true,
            ignore_excess: true,
        }
    }
}

impl Schema {
    pub fn of<'a, I>(fields: I) -> Schema
    where
        I: IntoIterator<Item = (&'a str, Coerce)>,
    {
        Schema {
            fields: fields
                .into_iter()
                .map(|(name, coerce)| Field {
                    name: name.to_owned(),
                    coerce,
                })
                .collect(),
            trailing: None,
        }
    }

    /// Add the variable-arity trailing field. `elem` coerces each of the
    /// remaining tokens individually; together they form one list value.
    pub fn with_trailing(mut self, name: &str, elem: Coerce) -> Schema {
        self.trailing = Some(Field {
            name: name.to_owned(),
            coerce: elem,
        });
        self
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields
            .iter()
            .chain(&self.trailing)
            .map(|f| f.name.clone())
            .collect()
    }

    /// [`Schema::apply_with`] under the default policy: defaulting and
    /// excess-truncation both enabled, matching the legacy decoder.
    pub fn apply(&self, tokens: &[String]) -> Result<Record, DecodeError> {
        self.apply_with(tokens, ApplyOpts::default())
    }

    /// Bind `tokens` to this schema's fields positionally.
    ///
    /// Arity is reconciled first: missing trailing tokens are padded with
    /// absent values when defaulting is on, excess tokens are truncated
    /// when that policy is on, and a trailing variable-arity field
    /// captures every token from its position onward. Anything else is an
    /// [`DecodeError::ArityMismatch`].
    pub fn apply_with(&self, tokens: &[String], opts: ApplyOpts) -> Result<Record, DecodeError> {
        let fixed = self.fields.len();
        let total = fixed + usize::from(self.trailing.is_some());

        let mut vals: Vec<Option<&str>> = tokens.iter().map(|t| Some(t.as_str())).collect();
        if total > vals.len() && opts.use_defaults {
            // pad only the fixed slots; the variable-arity slot stays empty
            while vals.len() < fixed {
                vals.push(None);
            }
        }
        if vals.len() > fixed && self.trailing.is_none() && opts.ignore_excess {
            vals.truncate(fixed);
        }

        let reconciled = match self.trailing {
            Some(_) => vals.len() >= fixed,
            None => vals.len() == fixed,
        };
        if !reconciled {
            return Err(DecodeError::ArityMismatch {
                fields: self.field_names(),
                values: tokens.to_vec(),
            });
        }

        let mut record = Record::new();
        for (field, val) in self.fields.iter().zip(&vals) {
            let value = if opts.use_defaults {
                field.coerce.apply_opt(*val)?
            } else {
                field.coerce.apply(val.unwrap_or(""))?
            };
            record.insert(field.name.clone(), value);
        }
        if let Some(trailing) = &self.trailing {
            let tail = vals[fixed..]
                .iter()
                .map(|val| trailing.coerce.apply(val.unwrap_or("")))
                .collect::<Result<Vec<_>, _>>()?;
            record.insert(trailing.name.clone(), Value::Array(tail));
        }
        Ok(record)
    }
}
