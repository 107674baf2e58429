//! Navigation-time page descriptors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Page id of the home page
pub const HOME_PAGE_CONTEXT: &str = "__HOMEPAGE__";

/// Page id of a SmartEdit preview request
pub const SMART_EDIT_CONTEXT: &str = "smartedit-preview";

/// CMS page types known to OCC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageType {
    ContentPage,
    ProductPage,
    CategoryPage,
    CatalogPage,
}

impl PageType {
    /// OCC wire name
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ContentPage => "ContentPage",
            Self::ProductPage => "ProductPage",
            Self::CategoryPage => "CategoryPage",
            Self::CatalogPage => "CatalogPage",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown page type name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown page type: {0}")]
pub struct UnknownPageType(pub String);

impl FromStr for PageType {
    type Err = UnknownPageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ContentPage" => Ok(Self::ContentPage),
            "ProductPage" => Ok(Self::ProductPage),
            "CategoryPage" => Ok(Self::CategoryPage),
            "CatalogPage" => Ok(Self::CatalogPage),
            other => Err(UnknownPageType(other.to_string())),
        }
    }
}

/// Which page is being requested
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageContext {
    /// Page label, product code, category code, or a sentinel id
    pub id: String,
    /// Page type, when known
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub page_type: Option<PageType>,
}

impl PageContext {
    /// Context with a type
    #[must_use]
    pub fn new(id: impl Into<String>, page_type: PageType) -> Self {
        Self {
            id: id.into(),
            page_type: Some(page_type),
        }
    }

    /// Context without a type
    #[must_use]
    pub fn untyped(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            page_type: None,
        }
    }

    /// Home page context
    #[must_use]
    pub fn home() -> Self {
        Self::new(HOME_PAGE_CONTEXT, PageType::ContentPage)
    }

    /// Whether the id is the home-page or SmartEdit sentinel
    #[inline]
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.id == HOME_PAGE_CONTEXT || self.id == SMART_EDIT_CONTEXT
    }
}

impl fmt::Display for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.page_type {
            Some(page_type) => write!(f, "{page_type}:{}", self.id),
            None => f.write_str(&self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_type_roundtrips_through_str() {
        for page_type in [
            PageType::ContentPage,
            PageType::ProductPage,
            PageType::CategoryPage,
            PageType::CatalogPage,
        ] {
            assert_eq!(page_type.as_str().parse::<PageType>().unwrap(), page_type);
        }
        assert!("Page".parse::<PageType>().is_err());
    }

    #[test]
    fn page_type_serializes_as_wire_name() {
        assert_eq!(
            serde_json::to_string(&PageType::ProductPage).unwrap(),
            "\"ProductPage\""
        );
    }

    #[test]
    fn sentinels() {
        assert!(PageContext::home().is_sentinel());
        assert!(PageContext::untyped(SMART_EDIT_CONTEXT).is_sentinel());
        assert!(!PageContext::untyped("/faq").is_sentinel());
    }

    #[test]
    fn display() {
        assert_eq!(PageContext::new("1234", PageType::ProductPage).to_string(), "ProductPage:1234");
        assert_eq!(PageContext::untyped("1234").to_string(), "1234");
    }
}
