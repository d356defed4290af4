//! Output settings: whether to write missing-triple files, and where.

use std::path::PathBuf;

/// Default file for unmatched left-snapshot statements.
pub const DEFAULT_MISSING_INSERTS: &str = "missing_inserts.nq";

/// Default file for unmatched right-snapshot statements.
pub const DEFAULT_MISSING_DELETES: &str = "missing_deletes.nq";

/// Tokens accepted as "true" (case-insensitive). Everything else is false.
pub const TRUTHY: &[&str] = &["true", "1", "t", "y", "yes", "yeah", "yup"];

/// Interprets a bool-like command-line token.
#[must_use]
pub fn truthy(token: &str) -> bool {
    let token = token.trim().to_ascii_lowercase();
    TRUTHY.contains(&token.as_str())
}

/// Where the missing-triple files go, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPlan {
    /// Output writing is disabled.
    Disabled,
    /// Write both files.
    Write {
        /// Destination for unmatched left-snapshot statements.
        inserts: PathBuf,
        /// Destination for unmatched right-snapshot statements.
        deletes: PathBuf,
        /// True if the default names were substituted because at least one
        /// path was not given. Callers must warn the user when set.
        defaulted: bool,
    },
}

impl OutputPlan {
    /// Resolves the plan from the command-line settings.
    ///
    /// Both paths must be given for either to be used; otherwise both fall
    /// back to [`DEFAULT_MISSING_INSERTS`] and [`DEFAULT_MISSING_DELETES`].
    #[must_use]
    pub fn resolve(write: bool, inserts: Option<PathBuf>, deletes: Option<PathBuf>) -> Self {
        if !write {
            return OutputPlan::Disabled;
        }
        match (inserts, deletes) {
            (Some(inserts), Some(deletes)) => OutputPlan::Write {
                inserts,
                deletes,
                defaulted: false,
            },
            _ => {
                tracing::debug!(
                    "output paths not paired, using {} and {}",
                    DEFAULT_MISSING_INSERTS,
                    DEFAULT_MISSING_DELETES
                );
                OutputPlan::Write {
                    inserts: PathBuf::from(DEFAULT_MISSING_INSERTS),
                    deletes: PathBuf::from(DEFAULT_MISSING_DELETES),
                    defaulted: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_tokens() {
        for token in ["true", "1", "t", "y", "yes", "yeah", "yup", "TRUE", "Yes", " yup "] {
            assert!(truthy(token), "{token:?} should be truthy");
        }
        for token in ["false", "0", "no", "n", "", "nope", "on"] {
            assert!(!truthy(token), "{token:?} should be falsy");
        }
    }

    #[test]
    fn disabled_ignores_paths() {
        assert_eq!(
            OutputPlan::resolve(false, Some("a.nq".into()), Some("b.nq".into())),
            OutputPlan::Disabled
        );
    }

    #[test]
    fn both_paths_are_used() {
        assert_eq!(
            OutputPlan::resolve(true, Some("a.nq".into()), Some("b.nq".into())),
            OutputPlan::Write {
                inserts: "a.nq".into(),
                deletes: "b.nq".into(),
                defaulted: false,
            }
        );
    }

    #[test]
    fn one_missing_path_falls_back_for_both() {
        let expected = OutputPlan::Write {
            inserts: DEFAULT_MISSING_INSERTS.into(),
            deletes: DEFAULT_MISSING_DELETES.into(),
            defaulted: true,
        };
        assert_eq!(OutputPlan::resolve(true, Some("a.nq".into()), None), expected);
        assert_eq!(OutputPlan::resolve(true, None, Some("b.nq".into())), expected);
        assert_eq!(OutputPlan::resolve(true, None, None), expected);
    }
}
