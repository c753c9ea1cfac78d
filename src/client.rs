use std::future::Future;

use crate::core::ranking::Item;
use crate::error::FreshResult;

pub mod rotten_tomatoes;

pub use rotten_tomatoes::RottenTomatoes;

/// Upstream the ranking is pulled from.
///
/// Items come back in upstream order, unsorted. Implementations are called
/// repeatedly from the refresh job and should bound each call with a timeout.
pub trait RankingSource: Send + Sync {
    fn fetch_ranking(&self) -> impl Future<Output = FreshResult<Vec<Item>>> + Send;
}
