//! Book mapper.
//!
//! Walks the decoded OpenBD record and produces a [`Book`]. The record is an
//! untyped ONIX-subset tree; all access goes through the dotted-path helpers
//! below, which resolve missing or mistyped segments to absent and normalize
//! empty string leaves to absent.

use std::str::FromStr;

use log::{debug, trace};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Author, Book, Price, PublicationDate};

use super::codes::{
    RoleCodes, COUNTRY, CURRENCY, DATE_ROLE_FIRST_PUBLICATION, DATE_ROLE_PUBLICATION,
    EXTENT_TYPE_PAGE_COUNT, PRICE_TYPE_FIXED_RETAIL, PRICE_TYPE_RRP,
    PRODUCT_COMPOSITION_SINGLE_ITEM, RESOURCE_CONTENT_TYPE_FRONT_COVER, TEXT_TYPE_DESCRIPTION,
};

/// Maps one decoded record to a [`Book`].
///
/// `Ok(None)` means the record is a multi-item product this scraper does not
/// model. [`Error::Mapping`] is raised only when a field the provider
/// guarantees (record reference, title) is missing; merely-optional fields
/// resolve to absent.
pub fn map_record(record: &Value, roles: &RoleCodes) -> Result<Option<Book>> {
    trace!("openbd::map_record");

    let onix = &record["onix"];

    if dig_str(onix, &["DescriptiveDetail", "ProductComposition"])
        != Some(PRODUCT_COMPOSITION_SINGLE_ITEM)
    {
        debug!("openbd: skipping non-single-item product");
        return Ok(None);
    }

    let id = dig_str(onix, &["RecordReference"])
        .ok_or_else(|| Error::Mapping(String::from("record has no RecordReference")))?
        .to_string();

    let null = Value::Null;
    let title_element = dig(onix, &["DescriptiveDetail", "TitleDetail", "TitleElement"])
        .unwrap_or(&null);

    let title = dig_str(title_element, &["TitleText", "content"])
        .ok_or_else(|| Error::Mapping(format!("record {} has no title", id)))?
        .to_string();

    let subtitle = dig_str(title_element, &["Subtitle", "content"]).map(String::from);

    let description = dig_items(onix, &["CollateralDetail", "TextContent"])
        .iter()
        .find(|entry| dig_str(entry, &["TextType"]) == Some(TEXT_TYPE_DESCRIPTION))
        .and_then(|entry| dig_str(entry, &["Text"]))
        .map(String::from);

    let cover_uri = dig_items(onix, &["CollateralDetail", "SupportingResource"])
        .iter()
        .find(|resource| {
            dig_str(resource, &["ResourceContentType"]) == Some(RESOURCE_CONTENT_TYPE_FRONT_COVER)
        })
        .and_then(|resource| dig_items(resource, &["ResourceVersion"]).first())
        .and_then(|version| dig_str(version, &["ResourceLink"]))
        .map(String::from);

    let page_count = dig_items(onix, &["DescriptiveDetail", "Extent"])
        .iter()
        .find(|extent| dig_str(extent, &["ExtentType"]) == Some(EXTENT_TYPE_PAGE_COUNT))
        .and_then(|extent| dig(extent, &["ExtentValue"]))
        .and_then(as_u32);

    let authors = map_authors(onix, roles);

    let publisher =
        dig_str(onix, &["PublishingDetail", "Imprint", "ImprintName"]).map(String::from);

    let published_date = map_published_date(onix);

    let price = map_price(onix);

    Ok(Some(Book {
        id,
        title,
        subtitle,
        description,
        cover_uri,
        page_count,
        authors,
        publisher,
        published_date,
        price,
    }))
}

/// One [`Author`] per Contributor entry, in source order. Entries without a
/// person name are skipped; unknown role codes are dropped from the role
/// list, since the provider's code table may grow without warning.
fn map_authors(onix: &Value, roles: &RoleCodes) -> Vec<Author> {
    let mut authors = Vec::new();

    for contributor in dig_items(onix, &["DescriptiveDetail", "Contributor"]) {
        let name = match dig_str(contributor, &["PersonName", "content"]) {
            Some(name) => name.to_string(),
            None => {
                debug!("openbd: skipping contributor without a name");
                continue;
            }
        };

        let mut texts = Vec::new();
        for code in dig_items(contributor, &["ContributorRole"]) {
            if let Some(code) = code.as_str() {
                match roles.text(code) {
                    Some(text) => texts.push(text.to_string()),
                    None => debug!("openbd: dropping unknown contributor role code {:?}", code),
                }
            }
        }

        authors.push(Author { name, roles: texts });
    }

    authors
}

/// Picks the publication date, preferring the "first publication" role over
/// the plain "publication" role. Within one role the last well-formed entry
/// wins; Date strings that are not exactly 8 characters are discarded.
fn map_published_date(onix: &Value) -> Option<PublicationDate> {
    let mut first_publication = None;
    let mut publication = None;

    for entry in dig_items(onix, &["PublishingDetail", "PublishingDate"]) {
        let date = match dig_str(entry, &["Date"]) {
            Some(date) if date.chars().count() == 8 => date,
            _ => continue,
        };

        match dig_str(entry, &["PublishingDateRole"]) {
            Some(DATE_ROLE_FIRST_PUBLICATION) => first_publication = Some(date),
            Some(DATE_ROLE_PUBLICATION) => publication = Some(date),
            _ => {}
        }
    }

    first_publication
        .or(publication)
        .map(|raw| PublicationDate {
            date: format_date(raw),
            country: COUNTRY.to_string(),
        })
}

/// Picks the retail price. Only RRP and fixed-retail-price entries qualify;
/// the last qualifying entry wins, with no priority between the two types.
fn map_price(onix: &Value) -> Option<Price> {
    let mut price = None;

    for entry in dig_items(onix, &["ProductSupply", "SupplyDetail", "Price"]) {
        match dig_str(entry, &["PriceType"]) {
            Some(PRICE_TYPE_RRP) | Some(PRICE_TYPE_FIXED_RETAIL) => {}
            _ => continue,
        }

        let amount = match dig(entry, &["PriceAmount"]).and_then(as_decimal) {
            Some(amount) => amount,
            None => continue,
        };

        price = Some(Price {
            amount,
            currency: CURRENCY.to_string(),
        });
    }

    price
}

/// YYYYMMDD -> YYYY-MM-DD. Separators are inserted right-to-left so the
/// earlier offset is not shifted by the later insertion.
fn format_date(raw: &str) -> String {
    let mut chars: Vec<char> = raw.chars().collect();
    chars.insert(6, '-');
    chars.insert(4, '-');
    chars.into_iter().collect()
}

/// Resolves a dotted path. A segment that is missing, or whose parent is not
/// an object, resolves to absent.
fn dig<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
}

/// Like [`dig`], for string leaves. Empty strings are normalized to absent.
fn dig_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    match dig(value, path)?.as_str() {
        Some("") | None => None,
        Some(text) => Some(text),
    }
}

/// Like [`dig`], for array leaves. Anything else resolves to an empty slice.
fn dig_items<'a>(value: &'a Value, path: &[&str]) -> &'a [Value] {
    dig(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// ONIX numeric leaves arrive as strings or numbers, depending on the feed.
fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::String(text) => text.parse().ok(),
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(text) => Decimal::from_str(text).ok(),
        Value::Number(number) => Decimal::from_str(&number.to_string()).ok(),
        _ => None,
    }
}
