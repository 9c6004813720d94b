extern crate bookmeta;

use anyhow;

use bookmeta::http::ReqwestClient;
use bookmeta::scraper::{OpenBd, Scraper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let isbn = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::Error::msg("usage: bookmeta <isbn13>"))?;

    let scraper = OpenBd::new(ReqwestClient::new());

    if !scraper.supports(&isbn) {
        return Err(anyhow::Error::msg(format!("{} is not an ISBN-13", isbn)));
    }

    match scraper.scrape(&isbn).await? {
        Some(book) => println!("{}", serde_json::to_string_pretty(&book)?),
        None => println!("{} is unknown to the provider", isbn),
    }

    Ok(())
}
