//! Normalization from irregular provider posts to flat canonical records.
//!
//! Every step is conditional on the raw field it reads being present, so
//! normalization never fails. Columns that a record does not produce are
//! filled in later at the table level (see [`crate::table::PostTable`]).

use chrono::NaiveDateTime;
use fbscrape_core::Target;
use serde_json::{Map, Value};

use crate::table::PostTable;
use crate::types::{ProfileSidecar, RawBatch, RawPostRecord};

/// Reaction kinds the provider currently reports. Any other kind present in
/// `sub_reactions` is dropped.
pub const REACTION_KINDS: [&str; 7] = ["Like", "Haha", "Love", "Care", "Wow", "Sad", "Angry"];

/// Account metadata columns with the sidecar position each one is read from.
pub const ACCOUNT_METADATA: [(&str, usize); 4] = [
    ("account_type", 2),
    ("account_category", 3),
    ("account_website", 4),
    ("account_followers", 5),
];

pub const ACCOUNT_NAME_COLUMN: &str = "account_name";
pub const SCRAPE_DATE_COLUMN: &str = "scrape_date";
pub const SCRAPE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const PROFILE_FIELD: &str = "owing_profile";
const REACTIONS_FIELD: &str = "sub_reactions";

/// Raw key → canonical key. Only keys present on a record are renamed.
const RENAMES: [(&str, &str); 6] = [
    ("reaction_count.count", "total_reactions"),
    (
        "comment_rendering_instance.comments.total_count",
        "total_comments",
    ),
    ("share_count.count", "total_shares"),
    ("published_date", "timestamp"),
    ("published_date2", "date"),
    ("context", "post_text"),
];

/// Canonical column name for a reaction kind, e.g. `reaction_Like`.
#[must_use]
pub fn reaction_column(kind: &str) -> String {
    format!("reaction_{kind}")
}

/// A flat post record with stable, deterministic column names.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalPostRecord(Map<String, Value>);

impl CanonicalPostRecord {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Column names in output order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

/// Normalizes one raw post for `target`.
///
/// Steps, in order: rename known counters and text fields in place, flatten
/// `owing_profile` into `profile_type`/`profile_name`/`profile_id`, flatten
/// `sub_reactions` into the seven `reaction_*` counts, then stamp
/// `account_name`, the four account metadata fields, and `scrape_date`.
#[must_use]
pub fn normalize_record(
    raw: RawPostRecord,
    sidecar: &ProfileSidecar,
    target: &Target,
    scraped_at: NaiveDateTime,
) -> CanonicalPostRecord {
    let mut fields = rename_known_fields(raw.into_fields());

    if let Some(profile) = fields.shift_remove(PROFILE_FIELD) {
        flatten_profile(&mut fields, &profile);
    }

    if let Some(reactions) = fields.shift_remove(REACTIONS_FIELD) {
        flatten_reactions(&mut fields, &reactions);
    }

    fields.insert(
        ACCOUNT_NAME_COLUMN.to_owned(),
        Value::String(target.as_str().to_owned()),
    );
    for (column, position) in ACCOUNT_METADATA {
        // Type and category are free text and get trimmed; website and
        // follower count pass through untouched.
        let value = if position <= 3 {
            sidecar_text(sidecar, position)
        } else {
            sidecar_verbatim(sidecar, position)
        };
        fields.insert(column.to_owned(), value);
    }
    fields.insert(
        SCRAPE_DATE_COLUMN.to_owned(),
        Value::String(scraped_at.format(SCRAPE_DATE_FORMAT).to_string()),
    );

    CanonicalPostRecord(fields)
}

/// Normalizes a whole batch into the per-target table. All rows share one
/// `scrape_date`.
#[must_use]
pub fn normalize_batch(batch: RawBatch, target: &Target, scraped_at: NaiveDateTime) -> PostTable {
    let RawBatch { posts, profile } = batch;
    let records = posts
        .into_iter()
        .map(|raw| normalize_record(raw, &profile, target, scraped_at))
        .collect();
    PostTable::from_records(records)
}

/// Renames raw keys to their canonical names. A raw key whose canonical name
/// is already taken on the same record keeps its raw name, so neither value
/// is lost.
fn rename_known_fields(fields: Map<String, Value>) -> Map<String, Value> {
    let renames: Vec<(&str, &str)> = RENAMES
        .iter()
        .filter(|(from, to)| fields.contains_key(*from) && !fields.contains_key(*to))
        .copied()
        .collect();
    if renames.is_empty() {
        return fields;
    }

    fields
        .into_iter()
        .map(|(key, value)| {
            let renamed = renames
                .iter()
                .find(|(from, _)| *from == key)
                .map_or(key, |(_, to)| (*to).to_owned());
            (renamed, value)
        })
        .collect()
}

fn flatten_profile(fields: &mut Map<String, Value>, profile: &Value) {
    let pick = |key: &str| {
        profile
            .as_object()
            .and_then(|p| p.get(key))
            .cloned()
            .unwrap_or(Value::Null)
    };
    fields.insert("profile_type".to_owned(), pick("__typename"));
    fields.insert("profile_name".to_owned(), pick("name"));
    fields.insert("profile_id".to_owned(), pick("id"));
}

fn flatten_reactions(fields: &mut Map<String, Value>, reactions: &Value) {
    let counts = reactions.as_object();
    for kind in REACTION_KINDS {
        let count = counts
            .and_then(|c| c.get(kind))
            .map_or(0, reaction_count);
        fields.insert(reaction_column(kind), Value::from(count));
    }
}

/// Coerces a provider reaction count into a non-negative integer.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn reaction_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn sidecar_text(sidecar: &ProfileSidecar, position: usize) -> Value {
    let text = match sidecar.get(position) {
        Some(Value::String(s)) => s.trim().to_owned(),
        _ => String::new(),
    };
    Value::String(text)
}

fn sidecar_verbatim(sidecar: &ProfileSidecar, position: usize) -> Value {
    sidecar
        .get(position)
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
