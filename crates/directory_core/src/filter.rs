use std::borrow::Cow;

use crate::record::UserRecord;

/// Country-substring filter over a record list.
///
/// `None` and the empty string are identity: the input slice is returned
/// borrowed, without copying. Any other text selects the sub-sequence of
/// records whose country contains it, case-insensitively on both sides,
/// preserving input order. Pure; the input is never mutated.
pub fn filter_by_country<'a>(
    records: &'a [UserRecord],
    text: Option<&str>,
) -> Cow<'a, [UserRecord]> {
    let needle = match text {
        Some(text) if !text.is_empty() => text.to_lowercase(),
        _ => return Cow::Borrowed(records),
    };
    Cow::Owned(
        records
            .iter()
            .filter(|record| record.location.country.to_lowercase().contains(&needle))
            .cloned()
            .collect(),
    )
}
