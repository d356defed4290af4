//! Delta log loading.
//!
//! A delta log is a JSON array of change records, each with an `inserts`
//! and a `deletes` list (the notifier's own `insert`/`delete` spelling is
//! accepted too). Each entry holds `subject`, `predicate` and `object`
//! terms in SPARQL JSON results form. Only `value` and `datatype` are
//! read; term `type`, `xml:lang` and an entry's `graph` are ignored:
//!
//! ```json
//! [{
//!   "inserts": [{
//!     "subject":   { "type": "uri", "value": "http://ex/a" },
//!     "predicate": { "type": "uri", "value": "http://ex/p" },
//!     "object":    { "type": "literal", "value": "b" }
//!   }],
//!   "deletes": []
//! }]
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::error::{ReconcileError, Result};
use crate::model::{Triple, TripleSet};
use crate::normalize::Normalizer;

/// One term of a delta entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeltaTerm {
    /// String value; the only field used for matching.
    pub value: String,
    /// Literal datatype IRI, consulted by normalization.
    #[serde(default)]
    pub datatype: Option<String>,
}

/// One inserted or deleted statement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeltaTriple {
    /// Subject term.
    pub subject: DeltaTerm,
    /// Predicate term.
    pub predicate: DeltaTerm,
    /// Object term.
    pub object: DeltaTerm,
}

impl DeltaTriple {
    fn key(&self, normalizer: &Normalizer) -> Triple {
        Triple::new(
            self.subject.value.as_str(),
            self.predicate.value.as_str(),
            normalizer.apply(&self.object.value, self.object.datatype.as_deref()),
        )
    }
}

/// One change record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeltaMessage {
    /// Statements inserted by this change.
    #[serde(alias = "insert")]
    pub inserts: Vec<DeltaTriple>,
    /// Statements deleted by this change.
    #[serde(alias = "delete")]
    pub deletes: Vec<DeltaTriple>,
}

/// Insert and delete keys declared across the whole delta log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaSets {
    /// Every inserted triple.
    pub inserts: TripleSet,
    /// Every deleted triple.
    pub deletes: TripleSet,
}

impl DeltaSets {
    /// Flattens change records into insert and delete sets.
    #[must_use]
    pub fn from_messages(messages: &[DeltaMessage], normalizer: &Normalizer) -> Self {
        let mut sets = DeltaSets::default();
        for message in messages {
            sets.inserts
                .extend(message.inserts.iter().map(|t| t.key(normalizer)));
            sets.deletes
                .extend(message.deletes.iter().map(|t| t.key(normalizer)));
        }
        sets
    }
}

/// Parses a delta log from any reader. `path` is used for diagnostics.
///
/// # Errors
///
/// Returns [`ReconcileError::Delta`] if the document is not valid JSON or
/// does not have the expected shape.
pub fn parse_delta<R: Read>(reader: R, path: &Path) -> Result<Vec<DeltaMessage>> {
    serde_json::from_reader(reader).map_err(|source| ReconcileError::Delta {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the delta log at `path` into insert and delete sets.
///
/// # Errors
///
/// Returns [`ReconcileError::Io`] if the file cannot be opened and
/// [`ReconcileError::Delta`] if it is malformed.
pub fn load_delta(path: &Path, normalizer: &Normalizer) -> Result<DeltaSets> {
    let file = File::open(path).map_err(|e| ReconcileError::io(path, e))?;
    let messages = parse_delta(BufReader::new(file), path)?;
    let sets = DeltaSets::from_messages(&messages, normalizer);
    tracing::debug!(
        path = %path.display(),
        records = messages.len(),
        inserts = sets.inserts.len(),
        deletes = sets.deletes.len(),
        "loaded delta log"
    );
    Ok(sets)
}
