use crate::error::ModelError;
use std::borrow::Borrow;

/// Strongly typed product identifier with validation.
///
/// Identifiers are opaque catalog keys. The only rule enforced here is that
/// they are not blank; uniqueness within a catalog snapshot is the catalog's
/// responsibility.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Result<Self, ModelError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidId(id));
        }
        if trimmed.len() != id.len() {
            return Ok(ProductId(trimmed.to_string()));
        }
        Ok(ProductId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProductId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ProductId::new(value)
    }
}

impl TryFrom<&str> for ProductId {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ProductId::new(value)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
