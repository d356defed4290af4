//! `delta-reconcile`: checks that a delta log accounts for every statement
//! in a pair of snapshot diffs.
//!
//! **Usage:**
//! ```text
//! delta-reconcile <LEFT_DIFF> <RIGHT_DIFF> <DELTA>
//!     [--write <BOOL>] [--missing-inserts-file <PATH>] [--missing-deletes-file <PATH>]
//!     [--format <nt|nq|ttl|trig>] [--normalize-datetime]
//! ```
//!
//! Exits non-zero if any statement is left unmatched, or if an input cannot
//! be read.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser};
use delta_reconcile::normalize::NORMALIZE_ENV;
use delta_reconcile::output::{DEFAULT_MISSING_DELETES, DEFAULT_MISSING_INSERTS};
use delta_reconcile::{run, truthy, write_missing, GraphFormat, Job, Normalizer, OutputPlan};
use tracing_subscriber::EnvFilter;

/// Reconcile a delta log against before/after snapshot diffs.
#[derive(Parser)]
#[command(
    name = "delta-reconcile",
    about = "Check that a delta log accounts for all observed snapshot differences"
)]
struct Args {
    /// Snapshot diff of added statements (matched against delta inserts).
    left_diff: PathBuf,

    /// Snapshot diff of removed statements (matched against delta deletes).
    right_diff: PathBuf,

    /// JSON delta log.
    delta: PathBuf,

    /// Write missing statements to files (true/1/t/y/yes/yeah/yup).
    #[arg(
        long,
        value_name = "BOOL",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = parse_bool_token
    )]
    write: bool,

    /// Output file for left-diff statements no insert accounts for.
    #[arg(long, value_name = "PATH")]
    missing_inserts_file: Option<PathBuf>,

    /// Output file for right-diff statements no delete accounts for.
    #[arg(long, value_name = "PATH")]
    missing_deletes_file: Option<PathBuf>,

    /// Snapshot format (default: derived from each file's extension).
    /// Relative IRIs in Turtle/TriG resolve against the file's `file://` URL.
    #[arg(long)]
    format: Option<GraphFormat>,

    /// Compare xsd:dateTime literals by instant rather than lexical form.
    /// The environment variable enables it for any value except
    /// empty/false/0/no/off/n/f.
    #[arg(
        long,
        env = NORMALIZE_ENV,
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    normalize_datetime: bool,
}

fn parse_bool_token(token: &str) -> std::result::Result<bool, String> {
    Ok(truthy(token))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let plan = OutputPlan::resolve(
        args.write,
        args.missing_inserts_file,
        args.missing_deletes_file,
    );

    if let OutputPlan::Write {
        defaulted: true, ..
    } = plan
    {
        println!(
            "Warning: no output files specified, using {DEFAULT_MISSING_INSERTS} and {DEFAULT_MISSING_DELETES}"
        );
    }

    let job = Job {
        left: args.left_diff,
        right: args.right_diff,
        delta: args.delta,
        format: args.format,
        normalizer: if args.normalize_datetime {
            Normalizer::datetime()
        } else {
            Normalizer::identity()
        },
    };

    let audit = run(&job).context("Failed to reconcile delta log")?;
    println!("{}", audit.report);

    let written = write_missing(&audit, &plan).context("Failed to write missing statements")?;
    for (side, path) in ["inserts", "deletes"].iter().zip(&written) {
        println!("Writing missing {side} to {}", path.display());
    }

    if !audit.report.is_reconciled() {
        eprintln!(
            "Reconciliation FAILED: {} statement(s) not accounted for by the delta log.",
            audit.report.missing_total()
        );
        process::exit(1);
    }

    Ok(())
}
