//! Delta log reconciliation against RDF snapshot diffs.
//!
//! A synchronization pipeline records every insert and delete it applies as
//! a delta log. Given two snapshot diffs (statements that appeared between
//! two dumps, and statements that disappeared), this crate checks that the
//! delta log accounts for all of them:
//!
//! | Side | Observed | Declared |
//! |------|----------|----------|
//! | inserts | left (before) diff | `inserts` of every delta record |
//! | deletes | right (after) diff | `deletes` of every delta record |
//!
//! Statements are compared by the string values of subject, predicate and
//! object; named-graph context is ignored.
//!
//! # Entry Point
//!
//! ```no_run
//! use delta_reconcile::{run, write_missing, Job, OutputPlan};
//!
//! let job = Job::new("left.nq", "right.nq", "delta.json");
//! let audit = run(&job).expect("inputs are well-formed");
//! print!("{}", audit.report);
//! write_missing(&audit, &OutputPlan::resolve(true, None, None)).expect("writable");
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod delta;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod output;
pub mod reconcile;
pub mod serializer;

use std::fs;
use std::path::{Path, PathBuf};

pub use delta::{load_delta, DeltaMessage, DeltaSets};
pub use error::{ReconcileError, Result};
pub use loader::{load_snapshot, GraphFormat, GraphLoader, Snapshot};
pub use model::{Node, Quad, Triple, TripleSet};
pub use normalize::Normalizer;
pub use output::{truthy, OutputPlan};
pub use reconcile::{reconcile, ReconciliationReport, SideOutcome};

/// Inputs of one reconciliation run.
#[derive(Debug, Clone)]
pub struct Job {
    /// Snapshot diff of added statements, checked against delta inserts.
    pub left: PathBuf,
    /// Snapshot diff of removed statements, checked against delta deletes.
    pub right: PathBuf,
    /// JSON delta log.
    pub delta: PathBuf,
    /// Snapshot format; `None` maps each file's extension.
    pub format: Option<GraphFormat>,
    /// Value normalization applied to both snapshots and the delta log.
    pub normalizer: Normalizer,
}

impl Job {
    /// Creates a job with extension-based format detection and no
    /// normalization.
    pub fn new(
        left: impl Into<PathBuf>,
        right: impl Into<PathBuf>,
        delta: impl Into<PathBuf>,
    ) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            delta: delta.into(),
            format: None,
            normalizer: Normalizer::identity(),
        }
    }
}

/// Loaded snapshots together with the reconciliation outcome.
#[derive(Debug, Clone)]
pub struct Audit {
    /// Left (before) snapshot diff.
    pub left: Snapshot,
    /// Right (after) snapshot diff.
    pub right: Snapshot,
    /// Counts and unmatched triples for both sides.
    pub report: ReconciliationReport,
    normalizer: Normalizer,
}

impl Audit {
    /// Left-snapshot quads whose triple no delta insert accounted for.
    pub fn missing_inserts(&self) -> impl Iterator<Item = &Quad> {
        let normalizer = self.normalizer;
        self.left
            .quads
            .iter()
            .filter(move |q| self.report.inserts.is_missing(&normalizer.key(q)))
    }

    /// Right-snapshot quads whose triple no delta delete accounted for.
    pub fn missing_deletes(&self) -> impl Iterator<Item = &Quad> {
        let normalizer = self.normalizer;
        self.right
            .quads
            .iter()
            .filter(move |q| self.report.deletes.is_missing(&normalizer.key(q)))
    }
}

/// Loads all three inputs and reconciles them.
///
/// Every file is fully loaded before any comparison starts.
///
/// # Errors
///
/// Returns the first load error of either snapshot or the delta log.
pub fn run(job: &Job) -> Result<Audit> {
    let left = load_snapshot(&job.left, job.format, &job.normalizer)?;
    let right = load_snapshot(&job.right, job.format, &job.normalizer)?;
    let declared = load_delta(&job.delta, &job.normalizer)?;

    let report = ReconciliationReport {
        inserts: reconcile(left.triples.clone(), &declared.inserts),
        deletes: reconcile(right.triples.clone(), &declared.deletes),
    };
    tracing::info!(
        found_inserts = report.inserts.found,
        missing_inserts = report.inserts.missing(),
        found_deletes = report.deletes.found,
        missing_deletes = report.deletes.missing(),
        normalize_datetime = job.normalizer.normalizes_datetime(),
        "reconciliation complete"
    );

    Ok(Audit {
        left,
        right,
        report,
        normalizer: job.normalizer,
    })
}

/// Writes the unmatched quads of both snapshots as N-Quads, according to
/// `plan`. Returns the files written, inserts first.
///
/// # Errors
///
/// Returns [`ReconcileError::Io`] if either file cannot be written.
pub fn write_missing(audit: &Audit, plan: &OutputPlan) -> Result<Vec<PathBuf>> {
    let OutputPlan::Write {
        inserts, deletes, ..
    } = plan
    else {
        return Ok(Vec::new());
    };
    write_nquads(inserts, &audit.left, audit.missing_inserts())?;
    write_nquads(deletes, &audit.right, audit.missing_deletes())?;
    Ok(vec![inserts.clone(), deletes.clone()])
}

fn write_nquads<'a>(
    path: &Path,
    source: &Snapshot,
    quads: impl Iterator<Item = &'a Quad>,
) -> Result<()> {
    let body = serializer::nquads::to_nquads(quads);
    fs::write(path, body).map_err(|e| ReconcileError::io(path, e))?;
    tracing::info!(
        path = %path.display(),
        source = %source.path.display(),
        "wrote missing statements"
    );
    Ok(())
}
