use async_trait::async_trait;

mod openbd;

pub use openbd::{OpenBd, RoleCodes};

use crate::error::Result;
use crate::models::Book;

/// A metadata provider that can look up books by identifier.
///
/// `scrape` returns `Ok(None)` when the provider does not know the book or
/// the record is a kind the scraper does not model; errors are reserved for
/// transport, decode, and contract failures.
#[async_trait]
pub trait Scraper {
    fn supports(&self, id: &str) -> bool;

    async fn scrape(&self, id: &str) -> Result<Option<Book>>;
}
