use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SsrError};

/// Node identifier -> load text as shown on the status page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadTable(pub HashMap<String, String>);

impl LoadTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, load: impl Into<String>) {
        self.0.insert(id.into(), load.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn lookup(&self, id: &str) -> Result<&str> {
        self.get(id).ok_or_else(|| SsrError::LoadLookup { id: id.to_string() })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build from the text of each status-page row; unparsable rows are
    /// skipped and later rows win.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for row in rows {
            match parse_status_row(row.as_ref()) {
                Some((id, load)) => table.insert(id, load),
                None => tracing::debug!(row = row.as_ref(), "skipping status row"),
            }
        }
        table
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| SsrError::Config(format!("load table: {e}")))
    }
}

impl FromIterator<(String, String)> for LoadTable {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Split one status row, `hk1-2x | 负载：35%`, into `("hk1", "35%")`.
///
/// The identifier is everything before the first `-` of the first cell; the
/// load is the second cell minus its two-character label.
pub fn parse_status_row(text: &str) -> Option<(String, String)> {
    let mut cells = text.trim().split('|').map(str::trim);
    let name = cells.next()?;
    let load_cell = cells.next()?;
    let id = name.split('-').next().unwrap_or(name);
    if id.is_empty() {
        return None;
    }
    let load: String = load_cell.chars().skip(2).collect();
    Some((id.to_string(), load.trim().to_string()))
}
