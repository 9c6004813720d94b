//! ONIX code points as OpenBD populates them, plus the contributor role
//! table used to render role codes as display text.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// ProductComposition: single-item product. Anything else (sets, bundles) is
/// out of scope for this scraper.
pub const PRODUCT_COMPOSITION_SINGLE_ITEM: &str = "00";

/// TextContent/TextType: description for online bookstores.
pub const TEXT_TYPE_DESCRIPTION: &str = "03";

/// SupportingResource/ResourceContentType: front cover image.
pub const RESOURCE_CONTENT_TYPE_FRONT_COVER: &str = "01";

/// Extent/ExtentType: content page count.
pub const EXTENT_TYPE_PAGE_COUNT: &str = "11";

/// PublishingDate/PublishingDateRole: publication date.
pub const DATE_ROLE_PUBLICATION: &str = "01";

/// PublishingDate/PublishingDateRole: date of first publication.
pub const DATE_ROLE_FIRST_PUBLICATION: &str = "11";

/// Price/PriceType: recommended retail price, excluding tax.
pub const PRICE_TYPE_RRP: &str = "01";

/// Price/PriceType: fixed retail price, excluding tax.
pub const PRICE_TYPE_FIXED_RETAIL: &str = "03";

/// Currency for every OpenBD price.
pub const CURRENCY: &str = "JPY";

/// Country of publication for every OpenBD date.
pub const COUNTRY: &str = "JP";

/// The twelve ONIX List 17 contributor role codes OpenBD emits, with the
/// display text the provider publishes for them. A21 and B20 share one text;
/// role codes map many-to-one.
static DEFAULT_ROLE_TEXTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("A01", "著・文・その他"),
        ("A03", "脚本"),
        ("A06", "作曲"),
        ("A08", "写真"),
        ("A10", "企画・原案"),
        ("A12", "イラスト"),
        ("A21", "解説"),
        ("A38", "原著"),
        ("B01", "編集"),
        ("B06", "翻訳"),
        ("B20", "解説"),
        ("E07", "朗読"),
    ])
});

/// Contributor role code table.
///
/// The default table is shared and immutable; overriding an entry clones the
/// table for the owning scraper instance and never touches the default.
#[derive(Debug, Clone)]
pub struct RoleCodes {
    texts: HashMap<String, String>,
}

impl RoleCodes {
    /// Display text for a role code. `None` for codes the table does not
    /// know; callers decide whether to drop or fault.
    pub fn text(&self, code: &str) -> Option<&str> {
        self.texts.get(code).map(String::as_str)
    }

    /// Returns a copy of this table with one entry replaced or added.
    pub fn with_text(mut self, code: &str, text: &str) -> RoleCodes {
        self.texts.insert(code.to_string(), text.to_string());
        self
    }
}

impl Default for RoleCodes {
    fn default() -> Self {
        RoleCodes {
            texts: DEFAULT_ROLE_TEXTS
                .iter()
                .map(|(code, text)| (code.to_string(), text.to_string()))
                .collect(),
        }
    }
}
