mod book;

pub use book::{Author, Book, Price, PublicationDate};
