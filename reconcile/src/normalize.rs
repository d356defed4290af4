//! `xsd:dateTime` normalization.
//!
//! The delta producer may emit dateTime literals in a different but
//! equivalent lexical form than the triplestore dump. When enabled, both
//! sides are rewritten to UTC with millisecond precision and a `Z` suffix
//! (`2020-01-01T10:00:00.000Z`) before comparison.

use std::borrow::Cow;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::{Quad, Triple, XSD_DATE_TIME};

/// Environment variable that enables normalization when set to a non-falsey value.
pub const NORMALIZE_ENV: &str = "NORMALIZE_DATETIME_IN_QUAD";

/// Rewrites literal values before they are used as comparison keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalizer {
    datetime: bool,
}

impl Normalizer {
    /// A normalizer that leaves every value untouched.
    #[must_use]
    pub fn identity() -> Self {
        Self { datetime: false }
    }

    /// A normalizer that canonicalizes `xsd:dateTime` values.
    #[must_use]
    pub fn datetime() -> Self {
        Self { datetime: true }
    }

    /// Returns true if dateTime normalization is enabled.
    #[must_use]
    pub fn normalizes_datetime(&self) -> bool {
        self.datetime
    }

    /// Normalizes `value` according to its literal `datatype`.
    ///
    /// Values that are not `xsd:dateTime`, or that fail to parse as
    /// RFC 3339, are returned unchanged.
    #[must_use]
    pub fn apply<'a>(&self, value: &'a str, datatype: Option<&str>) -> Cow<'a, str> {
        if !self.datetime || datatype != Some(XSD_DATE_TIME) {
            return Cow::Borrowed(value);
        }
        match DateTime::parse_from_rfc3339(value.trim()) {
            Ok(parsed) => Cow::Owned(
                parsed
                    .with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            Err(_) => Cow::Borrowed(value),
        }
    }

    /// Returns the comparison key of `quad`, normalizing its object.
    #[must_use]
    pub fn key(&self, quad: &Quad) -> Triple {
        Triple::new(
            quad.subject.value(),
            quad.predicate.value(),
            self.apply(quad.object.value(), quad.object.datatype()),
        )
    }
}
