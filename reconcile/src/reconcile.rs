//! Set-membership reconciliation of declared changes against observed diffs.
//!
//! Each declared triple removes at most one observed triple, and both sides
//! are sets: a triple declared twice in the delta log still accounts for a
//! single observed triple. Whatever remains observed after the pass is
//! missing from the delta log.

use std::fmt;

use crate::model::{Triple, TripleSet};

/// Result of reconciling one side (inserts or deletes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideOutcome {
    /// Declared triples that matched an observed triple.
    pub found: usize,
    /// Observed triples no declared change accounted for.
    pub remaining: TripleSet,
}

impl SideOutcome {
    /// Number of observed triples left unmatched.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.remaining.len()
    }

    /// Returns true if `triple` was left unmatched.
    #[must_use]
    pub fn is_missing(&self, triple: &Triple) -> bool {
        self.remaining.contains(triple)
    }
}

/// Removes every `declared` triple from `observed`, counting the hits.
///
/// `found + missing` always equals the size of `observed`.
#[must_use]
pub fn reconcile(mut observed: TripleSet, declared: &TripleSet) -> SideOutcome {
    let mut found = 0;
    for triple in declared {
        if observed.remove(triple) {
            found += 1;
        }
    }
    SideOutcome {
        found,
        remaining: observed,
    }
}

/// Outcome of a full run: inserts checked against the left (before) diff,
/// deletes against the right (after) diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationReport {
    /// Insert side.
    pub inserts: SideOutcome,
    /// Delete side.
    pub deletes: SideOutcome,
}

impl ReconciliationReport {
    /// Total unmatched triples on both sides.
    #[must_use]
    pub fn missing_total(&self) -> usize {
        self.inserts.missing() + self.deletes.missing()
    }

    /// Returns true if every observed triple was accounted for.
    #[must_use]
    pub fn is_reconciled(&self) -> bool {
        self.missing_total() == 0
    }
}

impl fmt::Display for ReconciliationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of diffs found in the inserts: {}", self.inserts.found)?;
        writeln!(f, "Total number of missing inserts: {}", self.inserts.missing())?;
        writeln!(f, "Number of diffs found in the deletes: {}", self.deletes.found)?;
        write!(f, "Total number of missing deletes: {}", self.deletes.missing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(triples: &[(&str, &str, &str)]) -> TripleSet {
        triples
            .iter()
            .map(|(s, p, o)| Triple::new(*s, *p, *o))
            .collect()
    }

    #[test]
    fn single_insert_fully_matched() {
        let outcome = reconcile(set(&[("a", "p", "b")]), &set(&[("a", "p", "b")]));
        assert_eq!(outcome.found, 1);
        assert_eq!(outcome.missing(), 0);
    }

    #[test]
    fn partial_delete_leaves_remainder() {
        let outcome = reconcile(
            set(&[("a", "p", "b"), ("c", "p", "d")]),
            &set(&[("a", "p", "b")]),
        );
        assert_eq!(outcome.found, 1);
        assert_eq!(outcome.missing(), 1);
        assert!(outcome.is_missing(&Triple::new("c", "p", "d")));
    }

    #[test]
    fn declared_superset_leaves_nothing() {
        let observed = set(&[("a", "p", "b"), ("c", "p", "d")]);
        let declared = set(&[("a", "p", "b"), ("c", "p", "d"), ("x", "y", "z")]);
        let outcome = reconcile(observed, &declared);
        assert_eq!(outcome.found, 2, "extra declared triples are not counted");
        assert_eq!(outcome.missing(), 0);
    }

    #[test]
    fn found_plus_missing_is_observed_size() {
        let observed = set(&[("a", "p", "1"), ("a", "p", "2"), ("a", "p", "3"), ("b", "q", "4")]);
        let declared = set(&[("a", "p", "2"), ("b", "q", "4"), ("b", "q", "5")]);
        let size = observed.len();
        let outcome = reconcile(observed, &declared);
        assert_eq!(outcome.found + outcome.missing(), size);
    }

    #[test]
    fn empty_inputs() {
        let outcome = reconcile(TripleSet::new(), &set(&[("a", "p", "b")]));
        assert_eq!(outcome, SideOutcome::default());
    }

    #[test]
    fn report_totals_and_wording() {
        let report = ReconciliationReport {
            inserts: reconcile(set(&[("a", "p", "b")]), &set(&[("a", "p", "b")])),
            deletes: reconcile(
                set(&[("a", "p", "b"), ("c", "p", "d")]),
                &set(&[("a", "p", "b")]),
            ),
        };
        assert_eq!(report.missing_total(), 1);
        assert!(!report.is_reconciled());
        assert_eq!(
            report.to_string(),
            "Number of diffs found in the inserts: 1\n\
             Total number of missing inserts: 0\n\
             Number of diffs found in the deletes: 1\n\
             Total number of missing deletes: 1"
        );
    }
}
