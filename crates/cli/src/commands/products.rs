//! Product commands.
//!
//! `list` runs the same listing controller as the home page: the category goes
//! to the server, the search text is applied to what comes back.

use jaangkhon_core::{NewProduct, Product, ProductId, ProductPatch};
use jaangkhon_storefront::state::AppState;
use jaangkhon_storefront::views::{HomePage, LoadState};

use super::CommandError;

/// List products with the category chips above them.
pub async fn list(
    state: &AppState,
    category: Option<String>,
    search: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = HomePage::new();
    page.set_search(search.unwrap_or_default());
    let ticket = page
        .select_category(category)
        .unwrap_or_else(|| page.mount());
    let result = state.catalog().list_products(ticket.category()).await;
    page.complete(ticket, result);

    if let LoadState::Failed(reason) = page.load_state() {
        return Err(CommandError::Rejected(reason.clone()).into());
    }

    let chips: Vec<String> = page
        .chips()
        .iter()
        .map(|chip| {
            if chip.selected {
                format!("[{}]", chip.label())
            } else {
                chip.label().to_string()
            }
        })
        .collect();

    #[allow(clippy::print_stdout)]
    {
        println!("{}", chips.join("  "));
        if page.shows_empty_notice() {
            println!("No products found");
        }
        for product in page.visible_products() {
            println!("{}", summary_line(product));
        }
    }
    Ok(())
}

pub async fn show(state: &AppState, id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let product = state.catalog().get_product(id).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", summary_line(&product));
        if !product.description.is_empty() {
            println!("  {}", product.description);
        }
        if let Some(image_url) = &product.image_url {
            println!("  image: {image_url}");
        }
        println!("  stock: {}", product.stock);
    }
    Ok(())
}

pub async fn create(
    state: &AppState,
    product: &NewProduct,
) -> Result<(), Box<dyn std::error::Error>> {
    require_product_manager(state)?;
    let created = state.catalog().create_product(product).await?;
    tracing::info!(product_id = %created.id, "Product created");

    #[allow(clippy::print_stdout)]
    {
        println!("Created {}", summary_line(&created));
    }
    Ok(())
}

pub async fn update(
    state: &AppState,
    id: ProductId,
    patch: &ProductPatch,
) -> Result<(), Box<dyn std::error::Error>> {
    if patch.is_empty() {
        return Err(CommandError::EmptyUpdate.into());
    }
    require_product_manager(state)?;
    let updated = state.catalog().update_product(id, patch).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Updated {}", summary_line(&updated));
    }
    Ok(())
}

pub async fn delete(state: &AppState, id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    require_product_manager(state)?;
    if !state.catalog().delete_product(id).await? {
        return Err(CommandError::Rejected(format!("Product {id} was not deleted")).into());
    }

    #[allow(clippy::print_stdout)]
    {
        println!("Deleted product {id}");
    }
    Ok(())
}

/// Refuse product writes the stored session clearly cannot make.
///
/// A session whose user record is unreadable is let through; the server has
/// the final say either way.
fn require_product_manager(state: &AppState) -> Result<(), CommandError> {
    if !state.auth().is_authenticated() {
        return Err(CommandError::NotLoggedIn);
    }
    match state.auth().current_user() {
        Some(user) if !user.role.can_manage_products() => {
            Err(CommandError::NotPermitted(user.role))
        }
        _ => Ok(()),
    }
}

fn summary_line(product: &Product) -> String {
    let availability = if product.is_purchasable() {
        ""
    } else {
        "  (unavailable)"
    };
    format!(
        "#{:<5} {:<32} {:>12}  {}{availability}",
        product.id.get(),
        product.name,
        product.price.display(),
        product.category
    )
}
