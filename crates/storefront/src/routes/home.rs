//! Home page: the filterable product listing.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopwave_core::Price;

use crate::catalog::ListingFilter;
use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::{Product, StockLevel};
use crate::routes::NavView;
use crate::state::AppState;

/// Listing query parameters. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    /// Comma-separated multi-select.
    pub categories: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl ListingQuery {
    /// Build a filter, falling back to defaults for blank or invalid values.
    #[must_use]
    pub fn to_filter(&self) -> ListingFilter {
        let defaults = ListingFilter::default();
        let text = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or_default().to_string();
        let price = |v: &Option<String>, default: Price| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .and_then(|s| Price::from_str(s).ok())
                .unwrap_or(default)
        };

        ListingFilter {
            search: text(&self.search),
            category: self
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from),
            categories: self
                .categories
                .as_deref()
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect(),
            min_price: price(&self.min_price, defaults.min_price),
            max_price: price(&self.max_price, defaults.max_price),
        }
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Product card display data, shared with the product page's similar list.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image_url: String,
    pub rating: Option<String>,
    pub in_stock: bool,
    pub low_stock_note: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        let stock = product.stock_level();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
            rating: product.rating.map(|r| format!("{r:.1}")),
            in_stock: stock != StockLevel::OutOfStock,
            low_stock_note: match stock {
                StockLevel::Low(n) => Some(format!("Only {n} left!")),
                _ => None,
            },
        }
    }
}

/// A sidebar category toggle link.
#[derive(Debug, Clone)]
pub struct CategoryToggleView {
    pub name: String,
    pub selected: bool,
    pub href: String,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavView,
    pub products: Vec<ProductCardView>,
    pub result_count: usize,
    pub search: String,
    /// Single category from a navbar link, if any.
    pub category: Option<String>,
    pub toggles: Vec<CategoryToggleView>,
    /// Comma-joined multi-select, carried through the price form.
    pub categories_param: String,
    pub min_price: String,
    pub max_price: String,
    pub show_clear_all: bool,
    pub clear_all_href: String,
    /// Where card add-to-cart buttons come back to.
    pub return_to: String,
}

// =============================================================================
// Query String Helpers
// =============================================================================

/// Build a `/?...` listing URL, omitting default values.
fn listing_href(filter: &ListingFilter, categories: &[String]) -> String {
    let defaults = ListingFilter::default();
    let mut params: Vec<String> = Vec::new();

    if !filter.search.is_empty() {
        params.push(format!("search={}", urlencoding::encode(&filter.search)));
    }
    if let Some(category) = &filter.category {
        params.push(format!("category={}", urlencoding::encode(category)));
    }
    if !categories.is_empty() {
        params.push(format!(
            "categories={}",
            urlencoding::encode(&categories.join(","))
        ));
    }
    if filter.min_price != defaults.min_price {
        params.push(format!("min_price={}", filter.min_price.amount()));
    }
    if filter.max_price != defaults.max_price {
        params.push(format!("max_price={}", filter.max_price.amount()));
    }

    if params.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", params.join("&"))
    }
}

/// Where "Clear all" goes: same search and navbar category, default sidebar.
fn clear_all_href(filter: &ListingFilter) -> String {
    let reset = ListingFilter {
        search: filter.search.clone(),
        category: filter.category.clone(),
        ..ListingFilter::default()
    };
    listing_href(&reset, &[])
}

// =============================================================================
// Handlers
// =============================================================================

/// Home page handler.
#[instrument(skip(state, session, user))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Query(query): Query<ListingQuery>,
) -> Result<HomeTemplate, AppError> {
    let filter = query.to_filter();
    let products: Vec<ProductCardView> = filter
        .apply(state.catalog())
        .into_iter()
        .map(ProductCardView::from)
        .collect();

    tracing::debug!(results = products.len(), "Listing filtered");

    let toggles = state
        .catalog()
        .categories()
        .into_iter()
        .map(|name| CategoryToggleView {
            name: name.to_string(),
            selected: filter.is_selected(name),
            href: listing_href(&filter, &filter.toggled(name)),
        })
        .collect();

    let nav = NavView::load(&state, &session, user.as_ref())
        .await?
        .with_search(&filter.search);

    Ok(HomeTemplate {
        nav,
        result_count: products.len(),
        products,
        search: filter.search.clone(),
        category: filter.category.clone(),
        toggles,
        categories_param: filter.categories.join(","),
        min_price: filter.min_price.amount().to_string(),
        max_price: filter.max_price.amount().to_string(),
        show_clear_all: filter.has_sidebar_filters(),
        clear_all_href: clear_all_href(&filter),
        return_to: listing_href(&filter, &filter.categories),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_to_filter_defaults() {
        let filter = ListingQuery::default().to_filter();
        assert_eq!(filter, ListingFilter::default());
    }

    #[test]
    fn test_query_to_filter_parses_params() {
        let query = ListingQuery {
            search: Some(" watch ".to_string()),
            category: Some(String::new()),
            categories: Some("Audio,,Gaming".to_string()),
            min_price: Some("50".to_string()),
            max_price: Some("abc".to_string()),
        };
        let filter = query.to_filter();
        assert_eq!(filter.search, "watch");
        assert_eq!(filter.category, None);
        assert_eq!(filter.categories, vec!["Audio", "Gaming"]);
        assert_eq!(filter.min_price, Price::from_dollars(50));
        assert_eq!(filter.max_price, Price::from_dollars(1500));
    }

    #[test]
    fn test_listing_href_omits_defaults() {
        let filter = ListingFilter {
            search: "smart watch".to_string(),
            ..ListingFilter::default()
        };
        assert_eq!(
            listing_href(&filter, &["Audio".to_string(), "Home & Garden".to_string()]),
            "/?search=smart%20watch&categories=Audio%2CHome%20%26%20Garden"
        );
        assert_eq!(listing_href(&ListingFilter::default(), &[]), "/");
    }

    #[test]
    fn test_clear_all_keeps_search() {
        let filter = ListingFilter {
            search: "pro".to_string(),
            categories: vec!["Audio".to_string()],
            max_price: Price::from_dollars(100),
            ..ListingFilter::default()
        };
        assert_eq!(clear_all_href(&filter), "/?search=pro");
    }
}
