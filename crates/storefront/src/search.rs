//! Client-side product search and category extraction.
//!
//! Search runs over the list the view already fetched; it never goes back to
//! the API. A product matches when its name or its description contains the
//! query, ignoring case. An empty query matches everything.

use jaangkhon_core::Product;

/// A search query, lowercased once so it can be tested against many products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    needle: String,
}

impl ProductQuery {
    /// Build a query from raw search box text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.to_lowercase(),
        }
    }

    /// Whether the query filters anything out at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Case-insensitive substring match on name or description.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.is_empty()
            || product.name.to_lowercase().contains(&self.needle)
            || product.description.to_lowercase().contains(&self.needle)
    }
}

/// The products matching `text`, in their original order.
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], text: &str) -> Vec<&'a Product> {
    let query = ProductQuery::new(text);
    products.iter().filter(|p| query.matches(p)).collect()
}

/// Distinct categories in order of first appearance.
#[must_use]
pub fn distinct_categories(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for product in products {
        if !categories.iter().any(|c| c == &product.category) {
            categories.push(product.category.clone());
        }
    }
    categories
}
