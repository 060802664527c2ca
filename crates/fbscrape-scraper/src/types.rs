//! Raw shapes handed over by the fetch provider.
//!
//! ## Observed post record shape
//!
//! Each post is a loosely-typed JSON object. None of its keys are
//! guaranteed; the ones the normalizer cares about are:
//!
//! - `owing_profile`: object with `__typename`, `name`, `id` (the page or
//!   user that owns the post). May be absent or not an object.
//! - `sub_reactions`: object mapping reaction kind (`"Like"`, `"Haha"`, ...)
//!   to a count. Kinds with zero reactions are usually omitted.
//! - flattened counters such as `reaction_count.count` and
//!   `share_count.count`, with the dot being part of the key.
//! - `published_date`, `published_date2`, `context` (post body).
//!
//! ## Profile sidecar
//!
//! An array of scalars describing the account, returned next to the posts.
//! Only positions 2..=5 are read (type, category, website, followers).
//! Nothing about the array is typed, so it is accepted in any shape and
//! anything that is not an array is treated as empty.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One post exactly as the provider returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPostRecord(Map<String, Value>);

impl RawPostRecord {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wraps a JSON object; returns `None` for any other JSON value.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

/// Positional account metadata accompanying a batch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct ProfileSidecar(Vec<Value>);

impl ProfileSidecar {
    #[must_use]
    pub fn new(entries: Vec<Value>) -> Self {
        Self(entries)
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.0.get(position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Value> for ProfileSidecar {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(entries) => Self(entries),
            _ => Self::default(),
        }
    }
}

/// Everything one successful provider call produced.
///
/// `data` is `None` when the provider answered without a batch at all, which
/// the retry loop treats the same as an empty batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchResponse {
    #[serde(default)]
    pub data: Option<Vec<RawPostRecord>>,
    #[serde(default)]
    pub profile: Option<ProfileSidecar>,
}

/// A non-empty batch of posts plus the sidecar that came with it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBatch {
    pub posts: Vec<RawPostRecord>,
    pub profile: ProfileSidecar,
}
