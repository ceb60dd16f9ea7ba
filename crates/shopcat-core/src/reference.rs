//! Reference entities shared across the catalog: languages, stores, and the
//! code-named entities a product points at (categories, manufacturers, types).

use serde::{Deserialize, Serialize};

/// A language known to the platform, e.g. `{ id: 1, code: "en" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: i32,
    /// ISO 639-1 code.
    pub code: String,
}

impl Language {
    #[must_use]
    pub fn new(id: i32, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
        }
    }
}

/// A record tagged with the language it is written in.
pub trait Localized {
    fn language(&self) -> &Language;
}

/// The merchant store that owns products and defines display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantStore {
    pub id: i32,
    pub code: String,
    /// ISO 4217 currency code used for display amounts.
    pub currency_code: String,
    /// Language code used when a request does not name one.
    pub default_language: String,
    /// Dimension unit code as stored, e.g. `"CM"` or `"IN"`.
    pub dimension_unit_code: Option<String>,
    /// Weight unit code as stored, e.g. `"LB"`, `"KG"`, `"G"`.
    pub weight_unit_code: Option<String>,
}

/// Name and optional long text of a describable entity in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedDescription {
    pub id: i64,
    pub language: Language,
    pub name: String,
    pub description: Option<String>,
}

impl Localized for NamedDescription {
    fn language(&self) -> &Language {
        &self.language
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub code: String,
    pub merchant_store_id: i32,
    pub descriptions: Vec<NamedDescription>,
}

/// Categories are identified by id alone.
impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Category {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: i64,
    pub code: String,
    pub descriptions: Vec<NamedDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductType {
    pub id: i64,
    pub code: String,
    pub descriptions: Vec<NamedDescription>,
}
