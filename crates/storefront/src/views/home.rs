//! Home page listing state.
//!
//! [`HomePage`] is a sans-IO controller. Starting a fetch hands out a
//! [`FetchTicket`]; the caller runs the request however it likes and passes the
//! outcome back to [`HomePage::complete`]. Only the newest ticket is accepted,
//! so when the user clicks through categories faster than the API answers, a
//! slow earlier response cannot overwrite the list for the current category.
//!
//! Category filtering is done by the server. Text search is done locally on
//! whatever was fetched and never triggers a request.

use tracing::{debug, error, info};

use jaangkhon_core::{Product, ProductId};

use crate::error::ClientError;
use crate::search::{distinct_categories, filter_products};
use crate::services::{AuthService, CatalogService};
use crate::views::header::routes;

/// Where the product list is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight; the grid shows a spinner.
    Loading,
    /// The latest fetch succeeded.
    Loaded,
    /// The latest fetch failed. Products from the previous successful fetch
    /// are kept.
    Failed(String),
}

/// Proof that a fetch was started, needed to deliver its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    category: Option<String>,
}

impl FetchTicket {
    /// The category to request, `None` for all products.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// One chip in the category bar. `category: None` is the "All" chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChip {
    pub category: Option<String>,
    pub selected: bool,
}

impl CategoryChip {
    #[must_use]
    pub fn label(&self) -> &str {
        self.category.as_deref().unwrap_or("All")
    }
}

/// Outcome of pressing a product's add-to-cart button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddToCart {
    /// Logged in; the product would go into the cart.
    Accepted(ProductId),
    /// Not logged in; send the user to the login page instead.
    LoginRequired { redirect: &'static str },
}

/// Listing state for the home page.
#[derive(Debug, Default)]
pub struct HomePage {
    state: LoadState,
    products: Vec<Product>,
    categories: Vec<String>,
    selected_category: Option<String>,
    search: String,
    generation: u64,
}

impl HomePage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the initial fetch for the current category.
    pub fn mount(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    /// Change the category filter (`None` = all products).
    ///
    /// Returns a ticket when the selection changed and a new fetch is needed,
    /// `None` when it is the category already selected.
    pub fn select_category(&mut self, category: Option<String>) -> Option<FetchTicket> {
        let category = category.filter(|c| !c.is_empty());
        if category == self.selected_category {
            return None;
        }
        self.selected_category = category;
        Some(self.begin_fetch())
    }

    /// Deliver the result of the fetch started with `ticket`.
    ///
    /// Returns `false` and changes nothing if a newer fetch has been started
    /// since.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Product>, ClientError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Discarding stale product list"
            );
            return false;
        }

        match result {
            Ok(products) => {
                self.categories = distinct_categories(&products);
                self.products = products;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                error!(error = %e, category = ?ticket.category, "Error fetching products");
                self.state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    /// Fetch for the current category and apply the result.
    pub async fn refresh(&mut self, catalog: &CatalogService) {
        let ticket = self.begin_fetch();
        let result = catalog.list_products(ticket.category()).await;
        self.complete(ticket, result);
    }

    /// Select a category and, if it changed, fetch and apply its products.
    pub async fn choose_category(&mut self, catalog: &CatalogService, category: Option<String>) {
        if let Some(ticket) = self.select_category(category) {
            let result = catalog.list_products(ticket.category()).await;
            self.complete(ticket, result);
        }
    }

    /// Update the search box text. Never fetches.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    #[must_use]
    pub const fn load_state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// Everything the last successful fetch returned, unfiltered.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Categories present in the last fetched list.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The fetched products narrowed by the search text.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        filter_products(&self.products, &self.search)
    }

    /// "All" followed by one chip per fetched category.
    #[must_use]
    pub fn chips(&self) -> Vec<CategoryChip> {
        std::iter::once(None)
            .chain(self.categories.iter().cloned().map(Some))
            .map(|category| CategoryChip {
                selected: category == self.selected_category,
                category,
            })
            .collect()
    }

    /// Whether to show the "no products found" notice.
    #[must_use]
    pub fn shows_empty_notice(&self) -> bool {
        !self.is_loading() && self.visible_products().is_empty()
    }

    /// Gate the add-to-cart button on the stored session.
    #[must_use]
    pub fn add_to_cart(&self, auth: &AuthService, product: &Product) -> AddToCart {
        if auth.is_authenticated() {
            info!(product_id = %product.id, name = %product.name, "Add to cart");
            AddToCart::Accepted(product.id)
        } else {
            AddToCart::LoginRequired {
                redirect: routes::LOGIN,
            }
        }
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.generation = self.generation.wrapping_add(1);
        self.state = LoadState::Loading;
        FetchTicket {
            generation: self.generation,
            category: self.selected_category.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use jaangkhon_core::Price;
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::ApiClient;
    use crate::config::StorefrontConfig;
    use crate::session::{MemoryStore, SessionStore, keys};

    fn product(id: i64, name: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: format!("{name} description"),
            price: Price::new(Decimal::from(59)),
            image_url: None,
            category: category.to_string(),
            stock: 3,
            is_active: true,
        }
    }

    fn all_products() -> Vec<Product> {
        vec![
            product(1, "Pad Thai Kit", "Food"),
            product(2, "Silk Scarf", "Clothing"),
            product(3, "Green Curry Paste", "Food"),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<i64> {
        products.iter().map(|p| p.id.get()).collect()
    }

    fn server_error() -> ClientError {
        ClientError::Status {
            status: 500,
            message: "Something went wrong".to_string(),
        }
    }

    #[test]
    fn test_mount_loads_all_products() {
        let mut page = HomePage::new();
        assert_eq!(page.load_state(), &LoadState::Idle);

        let ticket = page.mount();
        assert!(page.is_loading());
        assert_eq!(ticket.category(), None);
        assert!(!page.shows_empty_notice());

        assert!(page.complete(ticket, Ok(all_products())));
        assert_eq!(page.load_state(), &LoadState::Loaded);
        assert_eq!(page.categories(), ["Food", "Clothing"]);
        assert_eq!(ids(&page.visible_products()), vec![1, 2, 3]);
    }

    #[test]
    fn test_select_category_requests_that_category() {
        let mut page = HomePage::new();
        let ticket = page.mount();
        page.complete(ticket, Ok(all_products()));

        let ticket = page.select_category(Some("Food".to_string())).unwrap();
        assert_eq!(ticket.category(), Some("Food"));
        assert!(page.is_loading());

        // Same selection again does not refetch.
        assert!(page.select_category(Some("Food".to_string())).is_none());

        let food: Vec<Product> = all_products()
            .into_iter()
            .filter(|p| p.category == "Food")
            .collect();
        page.complete(ticket, Ok(food));
        assert_eq!(page.categories(), ["Food"]);

        let ticket = page.select_category(None).unwrap();
        assert_eq!(ticket.category(), None);
    }

    #[test]
    fn test_empty_category_means_all() {
        let mut page = HomePage::new();
        let _ = page.mount();
        assert!(page.select_category(Some(String::new())).is_none());
        assert_eq!(page.selected_category(), None);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut page = HomePage::new();
        let first = page.select_category(Some("Clothing".to_string())).unwrap();
        let second = page.select_category(Some("Food".to_string())).unwrap();

        let food = vec![product(1, "Pad Thai Kit", "Food")];
        assert!(page.complete(second, Ok(food)));

        // The slower, older response arrives last.
        let clothing = vec![product(2, "Silk Scarf", "Clothing")];
        assert!(!page.complete(first, Ok(clothing)));

        assert_eq!(ids(&page.visible_products()), vec![1]);
        assert_eq!(page.selected_category(), Some("Food"));
        assert_eq!(page.load_state(), &LoadState::Loaded);
    }

    #[test]
    fn test_stale_failure_does_not_clobber_loading() {
        let mut page = HomePage::new();
        let first = page.mount();
        let _second = page.select_category(Some("Food".to_string())).unwrap();

        assert!(!page.complete(first, Err(server_error())));
        assert!(page.is_loading());
    }

    #[test]
    fn test_failure_keeps_previous_products() {
        let mut page = HomePage::new();
        let ticket = page.mount();
        page.complete(ticket, Ok(all_products()));

        let ticket = page.select_category(Some("Food".to_string())).unwrap();
        page.complete(ticket, Err(server_error()));

        assert_eq!(
            page.load_state(),
            &LoadState::Failed("Something went wrong".to_string())
        );
        assert_eq!(page.products().len(), 3);
        assert_eq!(page.categories(), ["Food", "Clothing"]);
    }

    #[test]
    fn test_search_narrows_without_refetch() {
        let mut page = HomePage::new();
        let ticket = page.mount();
        page.complete(ticket, Ok(all_products()));

        page.set_search("CURRY");
        assert_eq!(page.search(), "CURRY");
        assert_eq!(ids(&page.visible_products()), vec![3]);
        assert_eq!(page.load_state(), &LoadState::Loaded);

        page.set_search("durian");
        assert!(page.shows_empty_notice());

        page.set_search("");
        assert_eq!(page.visible_products().len(), 3);
    }

    #[test]
    fn test_search_and_category_compose() {
        let mut page = HomePage::new();
        page.set_search("kit");
        let ticket = page.select_category(Some("Food".to_string())).unwrap();
        page.complete(
            ticket,
            Ok(vec![
                product(1, "Pad Thai Kit", "Food"),
                product(3, "Green Curry Paste", "Food"),
            ]),
        );
        assert_eq!(ids(&page.visible_products()), vec![1]);
    }

    #[test]
    fn test_chips_mark_selection() {
        let mut page = HomePage::new();
        let ticket = page.mount();
        page.complete(ticket, Ok(all_products()));

        let chips = page.chips();
        let labels: Vec<&str> = chips.iter().map(CategoryChip::label).collect();
        assert_eq!(labels, ["All", "Food", "Clothing"]);
        assert!(chips[0].selected);
        assert!(!chips[1].selected);

        let _ = page.select_category(Some("Clothing".to_string()));
        let chips = page.chips();
        assert!(!chips[0].selected);
        assert!(chips[2].selected);
    }

    #[test]
    fn test_add_to_cart_requires_login() {
        let store = MemoryStore::new();
        let shared: Arc<dyn SessionStore> = Arc::new(store.clone());
        let api = ApiClient::new(&StorefrontConfig::default(), Arc::clone(&shared)).unwrap();
        let auth = AuthService::new(api, shared);

        let page = HomePage::new();
        let scarf = product(2, "Silk Scarf", "Clothing");

        assert_eq!(
            page.add_to_cart(&auth, &scarf),
            AddToCart::LoginRequired { redirect: "/login" }
        );

        store.set(keys::TOKEN, "T1").unwrap();
        assert_eq!(
            page.add_to_cart(&auth, &scarf),
            AddToCart::Accepted(ProductId::new(2))
        );
    }
}
