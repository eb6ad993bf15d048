pub mod extract;
pub mod fetcher;
pub mod types;

use crate::errors::FeedError;
use std::future::Future;
use types::RawEntry;

pub trait FeedSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<RawEntry>, FeedError>> + Send;
}
