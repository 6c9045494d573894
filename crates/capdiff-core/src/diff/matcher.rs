//! List pairing for the diff walk.
//!
//! Two lists are paired with the first applicable strategy, chosen for the
//! whole list pair:
//!
//! 1. **Identifier**: every element on both sides is an object with a unique
//!    string/number `id`; pair by equal `id`.
//! 2. **Name**: same, using `name`.
//! 3. **Positional**: pair by index up to the shorter length; the tail of the
//!    longer list is unpaired and a length mismatch is signalled.
//!
//! Keyed pairings are emitted in canonical key order, so the output does not
//! depend on element order or on map iteration order.

use crate::diff::classify::ExactNumber;
use crate::diff::path::Segment;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

pub const IDENTIFIER_FIELD: &str = "id";
pub const NAME_FIELD: &str = "name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    Identifier,
    Name,
    Positional,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PairResult<'a> {
    Matched {
        old: &'a Value,
        new: &'a Value,
        segment: Segment,
    },
    OnlyOld {
        old: &'a Value,
        segment: Segment,
    },
    OnlyNew {
        new: &'a Value,
        segment: Segment,
    },
}

impl PairResult<'_> {
    pub fn segment(&self) -> &Segment {
        match self {
            PairResult::Matched { segment, .. }
            | PairResult::OnlyOld { segment, .. }
            | PairResult::OnlyNew { segment, .. } => segment,
        }
    }
}

/// Raised by the positional fallback only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthMismatch {
    pub old_len: usize,
    pub new_len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayMatch<'a> {
    pub strategy: MatchStrategy,
    pub pairs: Vec<PairResult<'a>>,
    pub length_mismatch: Option<LengthMismatch>,
}

/// Pair the elements of two lists.
pub fn match_arrays<'a>(old: &'a [Value], new: &'a [Value]) -> ArrayMatch<'a> {
    if old.is_empty() && new.is_empty() {
        return ArrayMatch {
            strategy: MatchStrategy::Positional,
            pairs: Vec::new(),
            length_mismatch: None,
        };
    }

    for (strategy, key) in [
        (MatchStrategy::Identifier, IDENTIFIER_FIELD),
        (MatchStrategy::Name, NAME_FIELD),
    ] {
        if let (Some(old_by_key), Some(new_by_key)) = (index_by(old, key), index_by(new, key)) {
            return ArrayMatch {
                strategy,
                pairs: pair_keyed(key, old_by_key, new_by_key),
                length_mismatch: None,
            };
        }
    }

    pair_positional(old, new)
}

/// Canonical text of an identifying value.
///
/// Numbers use the same normalized form as the engine's numeric equality, so
/// `1` and `1.0` share a key; strings keep their quotes and never collide with
/// numbers.
fn canonical_key(key_value: &Value) -> Option<String> {
    match key_value {
        Value::String(_) => Some(key_value.to_string()),
        Value::Number(_) => ExactNumber::of(key_value).map(|n| n.to_string()),
        _ => None,
    }
}

/// Index elements by the canonical text of `key`.
///
/// `None` when any element is not an object, lacks a string/number `key`, or
/// repeats a key already seen.
fn index_by<'a>(list: &'a [Value], key: &str) -> Option<BTreeMap<String, (&'a Value, &'a Value)>> {
    let mut index = BTreeMap::new();
    for element in list {
        let key_value = element.as_object()?.get(key)?;
        let canonical = canonical_key(key_value)?;
        if index.insert(canonical, (key_value, element)).is_some() {
            return None;
        }
    }
    Some(index)
}

fn pair_keyed<'a>(
    key: &'static str,
    mut old_by_key: BTreeMap<String, (&'a Value, &'a Value)>,
    mut new_by_key: BTreeMap<String, (&'a Value, &'a Value)>,
) -> Vec<PairResult<'a>> {
    let all_keys: BTreeSet<String> = old_by_key.keys().chain(new_by_key.keys()).cloned().collect();

    all_keys
        .into_iter()
        .filter_map(|k| match (old_by_key.remove(&k), new_by_key.remove(&k)) {
            (Some((key_value, old)), Some((_, new))) => Some(PairResult::Matched {
                old,
                new,
                segment: Segment::keyed(key, key_value),
            }),
            (Some((key_value, old)), None) => Some(PairResult::OnlyOld {
                old,
                segment: Segment::keyed(key, key_value),
            }),
            (None, Some((key_value, new))) => Some(PairResult::OnlyNew {
                new,
                segment: Segment::keyed(key, key_value),
            }),
            (None, None) => None,
        })
        .collect()
}

fn pair_positional<'a>(old: &'a [Value], new: &'a [Value]) -> ArrayMatch<'a> {
    let shared = old.len().min(new.len());
    let mut pairs: Vec<PairResult<'a>> = old
        .iter()
        .zip(new.iter())
        .enumerate()
        .map(|(i, (o, n))| PairResult::Matched {
            old: o,
            new: n,
            segment: Segment::Index(i),
        })
        .collect();

    pairs.extend(
        old.iter()
            .enumerate()
            .skip(shared)
            .map(|(i, o)| PairResult::OnlyOld {
                old: o,
                segment: Segment::Index(i),
            }),
    );
    pairs.extend(
        new.iter()
            .enumerate()
            .skip(shared)
            .map(|(i, n)| PairResult::OnlyNew {
                new: n,
                segment: Segment::Index(i),
            }),
    );

    let length_mismatch = (old.len() != new.len()).then_some(LengthMismatch {
        old_len: old.len(),
        new_len: new.len(),
    });

    ArrayMatch {
        strategy: MatchStrategy::Positional,
        pairs,
        length_mismatch,
    }
}
