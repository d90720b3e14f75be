//! Action id encoding
//!
//! An action id carries everything needed to activate a menu item later
//! without walking the tree again.
//!
//! Format: `{service}|{object_path}|{ancestor ids, comma separated}|{leaf id}`
//!
//! `%`, `|` and `,` inside the service or path are percent-escaped so the
//! separators stay unambiguous.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::types::MenuSource;

const FIELD_SEPARATOR: char = '|';
const ID_SEPARATOR: char = ',';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionIdError {
    #[error("expected 4 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid menu item id '{0}'")]
    InvalidId(String),

    #[error("invalid escape sequence in '{0}'")]
    InvalidEscape(String),
}

/// Decoded form of an action id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionId {
    pub source: MenuSource,
    /// Root-to-parent order
    pub ancestors: Vec<i32>,
    pub leaf: i32,
}

impl ActionId {
    pub fn new(source: MenuSource, ancestors: Vec<i32>, leaf: i32) -> Self {
        Self {
            source,
            ancestors,
            leaf,
        }
    }

    pub fn encode(&self) -> String {
        let ancestors = self
            .ancestors
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            escape(&self.source.service),
            escape(&self.source.object_path),
            ancestors,
            self.leaf,
            sep = FIELD_SEPARATOR
        )
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for ActionId {
    type Err = ActionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(FIELD_SEPARATOR).collect();
        let [service, object_path, ancestors, leaf] = fields.as_slice() else {
            return Err(ActionIdError::FieldCount(fields.len()));
        };

        let ancestors = if ancestors.is_empty() {
            Vec::new()
        } else {
            ancestors
                .split(ID_SEPARATOR)
                .map(parse_id)
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            source: MenuSource::new(unescape(service)?, unescape(object_path)?),
            ancestors,
            leaf: parse_id(leaf)?,
        })
    }
}

fn parse_id(raw: &str) -> Result<i32, ActionIdError> {
    raw.parse()
        .map_err(|_| ActionIdError::InvalidId(raw.to_string()))
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '%' => out.push_str("%25"),
            '|' => out.push_str("%7C"),
            ',' => out.push_str("%2C"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(raw: &str) -> Result<String, ActionIdError> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let code = rest
            .get(pos + 1..pos + 3)
            .ok_or_else(|| ActionIdError::InvalidEscape(raw.to_string()))?;
        let decoded = match code.to_ascii_uppercase().as_str() {
            "25" => '%',
            "7C" => '|',
            "2C" => ',',
            _ => return Err(ActionIdError::InvalidEscape(raw.to_string())),
        };
        out.push(decoded);
        rest = &rest[pos + 3..];
    }
    out.push_str(rest);
    Ok(out)
}
