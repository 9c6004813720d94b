//! OpenBD scraper.
//!
//! Fetches `https://api.openbd.jp/v1/get?isbn=<isbn>` through the pluggable
//! HTTP collaborator, sanitizes and decodes the response, and maps the first
//! record to a [`Book`].

mod codes;
mod decode;
mod map;

pub use codes::RoleCodes;

use async_trait::async_trait;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::http::{provider_url, HttpClient};
use crate::models::Book;
use crate::scraper::Scraper;

const DEFAULT_BASE_URL: &str = "https://api.openbd.jp/v1/get";

static ISBN13: Lazy<Regex> = Lazy::new(|| Regex::new(r"^97[89][0-9]{10}$").unwrap());

type AcceptancePredicate = Box<dyn Fn(&Book) -> bool + Send + Sync>;

pub struct OpenBd {
    client: Box<dyn HttpClient>,
    base_url: String,
    roles: RoleCodes,
    acceptance: Option<AcceptancePredicate>,
}

impl OpenBd {
    pub fn new(client: impl HttpClient + 'static) -> OpenBd {
        OpenBd {
            client: Box::new(client),
            base_url: String::from(DEFAULT_BASE_URL),
            roles: RoleCodes::default(),
            acceptance: None,
        }
    }

    /// Points the scraper at a different endpoint. The URL must not already
    /// carry an `isbn` query parameter; that one is appended per scrape.
    pub fn with_base_url(mut self, base_url: &str) -> Result<OpenBd> {
        if has_isbn_parameter(base_url) {
            return Err(Error::Config(format!(
                "base URL {} already carries an isbn parameter",
                base_url
            )));
        }

        self.base_url = base_url.to_string();
        Ok(self)
    }

    /// Overrides the display text for one contributor role code. The shared
    /// default table is never mutated; this instance gets its own copy.
    pub fn with_role_text(mut self, code: &str, text: &str) -> OpenBd {
        self.roles = self.roles.with_text(code, text);
        self
    }

    /// Installs a predicate the surrounding multi-provider registry consults
    /// through [`OpenBd::is_acceptable`]. The scrape path itself never
    /// filters.
    pub fn with_acceptance(
        mut self,
        predicate: impl Fn(&Book) -> bool + Send + Sync + 'static,
    ) -> OpenBd {
        self.acceptance = Some(Box::new(predicate));
        self
    }

    pub fn is_acceptable(&self, book: &Book) -> bool {
        match &self.acceptance {
            Some(predicate) => predicate(book),
            None => true,
        }
    }
}

#[async_trait]
impl Scraper for OpenBd {
    fn supports(&self, id: &str) -> bool {
        ISBN13.is_match(id)
    }

    async fn scrape(&self, id: &str) -> Result<Option<Book>> {
        trace!("OpenBd::scrape({})", id);

        let url = provider_url(&self.base_url, id);

        let response = self.client.get(&url).await.map_err(Error::Transport)?;

        if response.status != 200 {
            debug!("openbd: status {} for isbn {}", response.status, id);
            return Ok(None);
        }

        let record = match decode::decode(&response.body)? {
            Some(record) => record,
            None => return Ok(None),
        };

        map::map_record(&record, &self.roles)
    }
}

/// True if the query part of the URL already names an `isbn` parameter.
fn has_isbn_parameter(url: &str) -> bool {
    let head = url.split('#').next().unwrap_or(url);

    match head.split_once('?') {
        Some((_, query)) => query
            .split('&')
            .any(|pair| pair == "isbn" || pair.starts_with("isbn=")),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use anyhow;
    use async_trait::async_trait;

    use super::OpenBd;
    use crate::error::Error;
    use crate::http::{HttpClient, HttpResponse};
    use crate::scraper::Scraper;

    struct StubClient {
        status: u16,
        body: String,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl StubClient {
        fn new(status: u16, body: &str) -> StubClient {
            StubClient {
                status,
                body: String::from(body),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn requests(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.requests)
        }
    }

    #[async_trait]
    impl HttpClient for StubClient {
        async fn get(&self, url: &str) -> anyhow::Result<HttpResponse> {
            self.requests.lock().unwrap().push(String::from(url));

            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    struct FailingClient;

    #[async_trait]
    impl HttpClient for FailingClient {
        async fn get(&self, _url: &str) -> anyhow::Result<HttpResponse> {
            Err(anyhow::Error::msg("connection refused"))
        }
    }

    const RECORD_BODY: &str = r#"[{
        "onix": {
            "RecordReference": "9784000000000",
            "DescriptiveDetail": {
                "ProductComposition": "00",
                "TitleDetail": {
                    "TitleElement": { "TitleText": { "content": "テスト駆動開発" } }
                }
            }
        }
    }]"#;

    #[test]
    fn supports_isbn13() {
        let scraper = OpenBd::new(StubClient::new(200, "[]"));

        assert!(scraper.supports("9784000000000"));
        assert!(scraper.supports("9791000000000"));
        assert!(!scraper.supports("1234567890123"));
        assert!(!scraper.supports("978400000000"));
        assert!(!scraper.supports("97840000000000"));
        assert!(!scraper.supports("978400000000a"));
    }

    #[tokio::test]
    async fn scrape_maps_a_known_isbn() -> anyhow::Result<()> {
        let scraper = OpenBd::new(StubClient::new(200, RECORD_BODY));

        let book = scraper.scrape("9784000000000").await?.unwrap();

        assert_eq!(book.id, "9784000000000");
        assert_eq!(book.title, "テスト駆動開発");

        Ok(())
    }

    #[tokio::test]
    async fn scrape_appends_the_isbn_to_the_base_url() -> anyhow::Result<()> {
        let client = StubClient::new(200, "[]");
        let requests = client.requests();
        let scraper = OpenBd::new(client);

        scraper.scrape("9784000000000").await?;

        assert_eq!(
            *requests.lock().unwrap(),
            vec![String::from(
                "https://api.openbd.jp/v1/get?isbn=9784000000000"
            )]
        );

        Ok(())
    }

    #[tokio::test]
    async fn scrape_returns_none_on_non_200() -> anyhow::Result<()> {
        let scraper = OpenBd::new(StubClient::new(404, "not found"));

        assert_eq!(scraper.scrape("9784000000000").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn scrape_returns_none_on_empty_result() -> anyhow::Result<()> {
        let scraper = OpenBd::new(StubClient::new(200, "[]"));

        assert_eq!(scraper.scrape("9784000000000").await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn scrape_wraps_transport_failures() {
        let scraper = OpenBd::new(FailingClient);

        let result = scraper.scrape("9784000000000").await;

        assert!(matches!(result, Err(Error::Transport(_))));
    }

    #[tokio::test]
    async fn scrape_surfaces_decode_failures() {
        let scraper = OpenBd::new(StubClient::new(200, "[{"));

        let result = scraper.scrape("9784000000000").await;

        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn base_url_with_isbn_parameter_is_rejected() {
        let result = OpenBd::new(StubClient::new(200, "[]"))
            .with_base_url("https://example.com/get?isbn=9784000000000");

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn base_url_without_isbn_parameter_is_accepted() -> anyhow::Result<()> {
        let scraper = OpenBd::new(StubClient::new(200, "[]"))
            .with_base_url("https://example.com/get?pretty=1")?;

        assert_eq!(scraper.base_url, "https://example.com/get?pretty=1");

        Ok(())
    }

    #[tokio::test]
    async fn role_override_applies_to_mapped_authors() -> anyhow::Result<()> {
        let body = r#"[{
            "onix": {
                "RecordReference": "9784000000000",
                "DescriptiveDetail": {
                    "ProductComposition": "00",
                    "TitleDetail": {
                        "TitleElement": { "TitleText": { "content": "方丈記" } }
                    },
                    "Contributor": [
                        { "PersonName": { "content": "鴨 長明" }, "ContributorRole": ["A01"] }
                    ]
                }
            }
        }]"#;

        let scraper = OpenBd::new(StubClient::new(200, body)).with_role_text("A01", "著者");

        let book = scraper.scrape("9784000000000").await?.unwrap();

        assert_eq!(book.authors[0].roles, vec![String::from("著者")]);

        Ok(())
    }

    #[tokio::test]
    async fn acceptance_predicate_defaults_to_true() -> anyhow::Result<()> {
        let scraper = OpenBd::new(StubClient::new(200, RECORD_BODY));

        let book = scraper.scrape("9784000000000").await?.unwrap();

        assert!(scraper.is_acceptable(&book));

        Ok(())
    }

    #[tokio::test]
    async fn acceptance_predicate_is_consulted() -> anyhow::Result<()> {
        let scraper = OpenBd::new(StubClient::new(200, RECORD_BODY))
            .with_acceptance(|book| book.page_count.is_some());

        let book = scraper.scrape("9784000000000").await?.unwrap();

        assert!(!scraper.is_acceptable(&book));

        Ok(())
    }
}
