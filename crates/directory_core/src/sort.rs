use std::borrow::Cow;

use crate::collate::Collation;
use crate::record::UserRecord;

/// Field the table is ordered by. `None` means "leave the list in working
/// order" and is the initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    None,
    FirstName,
    LastName,
    Country,
}

impl SortKey {
    /// Binary toggle behind the dedicated country-sort button: `None` turns
    /// country sorting on, any active key (country included) turns it off.
    pub fn toggled_country(self) -> Self {
        if self == Self::None {
            Self::Country
        } else {
            Self::None
        }
    }
}

type SortField = for<'a> fn(&'a UserRecord) -> &'a str;

fn first_name(record: &UserRecord) -> &str {
    &record.name.first
}

fn last_name(record: &UserRecord) -> &str {
    &record.name.last
}

fn country(record: &UserRecord) -> &str {
    &record.location.country
}

/// Key-to-accessor table backing `sort_records`. `SortKey::None` never
/// reaches the lookup; it short-circuits to the identity return first.
const SORT_FIELDS: [(SortKey, SortField); 3] = [
    (SortKey::FirstName, first_name),
    (SortKey::LastName, last_name),
    (SortKey::Country, country),
];

/// Stable ordering of `records` by the field `key` selects, comparing with
/// the session collator. `None` returns the input borrowed and unchanged;
/// records with equal keys keep their input order. Pure; the input is never
/// mutated.
pub fn sort_records<'a>(
    records: &'a [UserRecord],
    key: SortKey,
    collation: &Collation,
) -> Cow<'a, [UserRecord]> {
    if key == SortKey::None {
        return Cow::Borrowed(records);
    }
    let Some((_, field)) = SORT_FIELDS.iter().find(|(candidate, _)| *candidate == key) else {
        return Cow::Borrowed(records);
    };
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| collation.compare(field(a), field(b)));
    Cow::Owned(sorted)
}
