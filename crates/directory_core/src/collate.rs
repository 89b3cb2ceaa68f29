use std::cmp::Ordering;

use icu::collator::options::CollatorOptions;
use icu::collator::{Collator, CollatorBorrowed, CollatorPreferences};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("collation data unavailable: {0}")]
pub struct CollationError(String);

/// Locale-aware string ordering for the sort stage.
///
/// Wraps an ICU root collator so that accented and case-variant strings sort
/// with their base letters instead of by raw code point. Built once per
/// session and shared by every sort invocation.
pub struct Collation {
    collator: CollatorBorrowed<'static>,
}

impl Collation {
    pub fn new() -> Result<Self, CollationError> {
        let collator = Collator::try_new(CollatorPreferences::default(), CollatorOptions::default())
            .map_err(|err| CollationError(err.to_string()))?;
        Ok(Self { collator })
    }

    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        self.collator.compare(left, right)
    }
}

impl std::fmt::Debug for Collation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collation").finish_non_exhaustive()
    }
}
