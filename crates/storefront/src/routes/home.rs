//! Home page: category tabs and the product grid.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use freedom_project_core::{
    ALL_CATEGORIES, CATEGORY_TABS, Product, filter_by_category, tab_label,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::load_cart;
use crate::routes::layout::LayoutView;
use crate::state::AppState;

/// Category tab display data.
#[derive(Clone)]
pub struct CategoryTabView {
    pub href: String,
    pub name: &'static str,
    pub active: bool,
}

/// Size option in a product card's select.
#[derive(Clone)]
pub struct SizeOption {
    pub label: String,
    pub selected: bool,
}

/// Product card display data.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image_url: Option<String>,
    pub stock: u32,
    pub sizes: Vec<SizeOption>,
    pub sold_out: bool,
    pub low_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        let default_size = product.default_size();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
            stock: product.stock,
            sizes: product
                .sizes
                .iter()
                .map(|size| SizeOption {
                    label: size.clone(),
                    selected: Some(size.as_str()) == default_size,
                })
                .collect(),
            sold_out: product.is_sold_out(),
            low_stock: product.is_low_stock(),
        }
    }
}

/// Home page query parameters.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub category: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: LayoutView,
    pub tabs: Vec<CategoryTabView>,
    pub heading: &'static str,
    pub products: Vec<ProductCardView>,
    pub product_count: usize,
}

fn category_tabs(selected: &str) -> Vec<CategoryTabView> {
    CATEGORY_TABS
        .iter()
        .map(|tab| CategoryTabView {
            href: if tab.id == ALL_CATEGORIES {
                "/".to_string()
            } else {
                format!("/?category={}", urlencoding::encode(tab.id))
            },
            name: tab.name,
            active: tab.id == selected,
        })
        .collect()
}

/// Grid heading: the selected tab's label, or the "all" tab's label for an
/// unknown category.
fn heading_for(selected: &str) -> &'static str {
    tab_label(selected)
        .or_else(|| tab_label(ALL_CATEGORIES))
        .unwrap_or_default()
}

/// Display the home page, filtered by `?category=`.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<HomeQuery>,
) -> Result<impl IntoResponse> {
    let selected = query
        .category
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| ALL_CATEGORIES.to_string());

    let catalog = state.catalog().products();
    let products: Vec<ProductCardView> = filter_by_category(&catalog, &selected)
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    let cart = load_cart(&session).await?;

    Ok(HomeTemplate {
        layout: LayoutView::new(&state, cart.item_count()),
        tabs: category_tabs(&selected),
        heading: heading_for(&selected),
        product_count: products.len(),
        products,
    })
}

#[cfg(test)]
mod tests {
    use freedom_project_core::{Price, ProductId};

    use super::*;

    #[test]
    fn test_category_tabs_mark_selected() {
        let tabs = category_tabs("caps");
        let active: Vec<&str> = tabs.iter().filter(|t| t.active).map(|t| t.name).collect();
        assert_eq!(active, vec!["Gorras"]);
        assert_eq!(tabs.first().map(|t| t.href.as_str()), Some("/"));
        assert!(tabs.iter().any(|t| t.href == "/?category=caps"));
    }

    #[test]
    fn test_unknown_category_marks_no_tab() {
        assert!(category_tabs("boots").iter().all(|t| !t.active));
    }

    #[test]
    fn test_heading_falls_back_to_all_tab_label() {
        assert_eq!(heading_for("caps"), "Gorras");
        assert_eq!(heading_for(ALL_CATEGORIES), "Todo");
        assert_eq!(heading_for("boots"), "Todo");
    }

    #[test]
    fn test_product_card_preselects_first_size() {
        let product = Product {
            id: ProductId::new("p1"),
            name: "Air Max".to_string(),
            price: Price::from_units(120),
            category: "sneakers".to_string(),
            image_url: None,
            stock: 2,
            sizes: vec!["40".to_string(), "41".to_string()],
            created_at: None,
        };

        let card = ProductCardView::from(&product);
        let selected: Vec<&str> = card
            .sizes
            .iter()
            .filter(|s| s.selected)
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(selected, vec!["40"]);
        assert_eq!(card.price, "$120");
        assert!(card.low_stock);
        assert!(!card.sold_out);
    }
}
