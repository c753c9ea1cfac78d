use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;
use std::{cmp::Reverse, ops::Deref};

/// Named entry of the upstream table, as scraped.
/// The score is expected in [0, 100] but is never validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub name: String,
    pub score: i64,
}

impl Item {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Item {
            name: name.into(),
            score,
        }
    }
}

type Items = Vec<Item>;

/// Items ordered by score, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ranking(Items);

/// A ranking as installed in the cache, with the time it was fetched at.
/// The generation grows with every successful refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub generation: u64,
    pub ranking: Ranking,
}

/// Orders items by descending score.
///
/// Items sharing a score keep the order in which they were fetched.
pub fn rank(items: &[Item]) -> Ranking {
    Ranking(
        items
            .iter()
            .cloned()
            .sorted_by_key(|item| Reverse(item.score))
            .collect(),
    )
}

impl Ranking {
    pub fn into_inner(self) -> Items {
        self.0
    }
}

impl Deref for Ranking {
    type Target = Items;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
