use crate::models::ProfileRecord;
use std::collections::HashSet;

/// Reduces records to one per person, keeping first-seen order.
///
/// A non-empty `profile_url` is the identity; only records without one fall
/// back to `name`. Records with neither are dropped, as is any record whose
/// URL was already seen, whatever its name.
pub fn dedup(records: Vec<ProfileRecord>) -> Vec<ProfileRecord> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut seen_names: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());

    for record in records {
        let url = record.profile_url.trim();
        let name = record.name.as_deref().map(str::trim).unwrap_or("");

        if !url.is_empty() {
            if seen_urls.insert(url.to_string()) {
                unique.push(record);
            }
        } else if !name.is_empty() && seen_names.insert(name.to_string()) {
            unique.push(record);
        }
    }

    unique
}
