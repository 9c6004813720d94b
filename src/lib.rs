pub mod error;

pub mod http;

pub mod models;

pub mod scraper;

pub use error::Error;
pub use models::{Author, Book, Price, PublicationDate};
pub use scraper::{OpenBd, RoleCodes, Scraper};
