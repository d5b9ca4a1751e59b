//! Filters over catalog records.
//!
//! Each filter is built from query-string parameters by the route layer and
//! applied to borrowed catalog data. Filters never allocate new records.

use std::collections::HashSet;

use chrono::{DateTime, Days, Months, Utc};

use shopwave_core::{OrderStatus, Price, ProductId, Role, UserId};

use super::Catalog;
use crate::models::{Order, Product, UserAccount};

/// Default upper bound of the listing price range, in dollars.
pub const DEFAULT_MAX_PRICE: i64 = 1500;

/// Home page listing filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFilter {
    pub search: String,
    /// Single category from the `category` query parameter (exact match).
    pub category: Option<String>,
    /// Multi-select categories, used only when `category` is absent.
    pub categories: Vec<String>,
    pub min_price: Price,
    pub max_price: Price,
}

impl Default for ListingFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            categories: Vec::new(),
            min_price: Price::ZERO,
            max_price: Price::from_dollars(DEFAULT_MAX_PRICE),
        }
    }
}

impl ListingFilter {
    /// Apply search, then category, then price range.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        let base: Vec<&Product> = if self.search.is_empty() {
            catalog.products().iter().collect()
        } else {
            catalog.search_products(&self.search)
        };

        base.into_iter()
            .filter(|p| match &self.category {
                Some(category) => &p.category == category,
                None if self.categories.is_empty() => true,
                None => self.categories.contains(&p.category),
            })
            .filter(|p| p.price >= self.min_price && p.price <= self.max_price)
            .collect()
    }

    /// Whether any sidebar filter differs from its default ("Clear all").
    #[must_use]
    pub fn has_sidebar_filters(&self) -> bool {
        let defaults = Self::default();
        !self.categories.is_empty()
            || self.min_price > defaults.min_price
            || self.max_price < defaults.max_price
    }

    /// The multi-select list with `category` toggled on or off.
    #[must_use]
    pub fn toggled(&self, category: &str) -> Vec<String> {
        if self.categories.iter().any(|c| c == category) {
            self.categories
                .iter()
                .filter(|c| *c != category)
                .cloned()
                .collect()
        } else {
            let mut next = self.categories.clone();
            next.push(category.to_string());
            next
        }
    }

    /// Whether a category is currently selected (either way).
    #[must_use]
    pub fn is_selected(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category) || self.categories.iter().any(|c| c == category)
    }
}

/// Admin products table filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminProductFilter {
    pub search: String,
    /// `None` means "all".
    pub category: Option<String>,
}

impl AdminProductFilter {
    /// Search name or description; exact category; skip hidden products.
    #[must_use]
    pub fn apply<'a>(
        &self,
        products: &'a [Product],
        hidden: &HashSet<ProductId>,
    ) -> Vec<&'a Product> {
        let needle = self.search.to_lowercase();
        products
            .iter()
            .filter(|p| !hidden.contains(&p.id))
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .filter(|p| self.category.as_ref().is_none_or(|c| &p.category == c))
            .collect()
    }
}

/// Relative creation-date window for the admin orders table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    All,
    /// Same calendar day (UTC) as now.
    Today,
    /// The last seven days.
    Week,
    /// The last calendar month.
    Month,
}

impl DateRange {
    pub const ALL: [Self; 4] = [Self::All, Self::Today, Self::Week, Self::Month];

    /// Parse the query value; anything unknown means `All`.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        match value {
            "today" => Self::Today,
            "week" => Self::Week,
            "month" => Self::Month,
            _ => Self::All,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => "All Time",
            Self::Today => "Today",
            Self::Week => "Last 7 Days",
            Self::Month => "Last 30 Days",
        }
    }

    /// Whether `created_at` falls inside this window relative to `now`.
    #[must_use]
    pub fn contains(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Today => created_at.date_naive() == now.date_naive(),
            Self::Week => now
                .checked_sub_days(Days::new(7))
                .is_none_or(|cutoff| created_at >= cutoff),
            Self::Month => now
                .checked_sub_months(Months::new(1))
                .is_none_or(|cutoff| created_at >= cutoff),
        }
    }
}

/// Admin orders table filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminOrderFilter {
    /// Case-insensitive substring of the order ID.
    pub search: String,
    /// `None` means "all".
    pub status: Option<OrderStatus>,
    pub date: DateRange,
}

impl AdminOrderFilter {
    #[must_use]
    pub fn apply<'a>(&self, orders: &'a [Order], now: DateTime<Utc>) -> Vec<&'a Order> {
        let needle = self.search.to_lowercase();
        orders
            .iter()
            .filter(|o| o.id.as_str().to_lowercase().contains(&needle))
            .filter(|o| self.status.is_none_or(|s| o.status == s))
            .filter(|o| self.date.contains(o.created_at, now))
            .collect()
    }
}

/// Admin users table filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminUserFilter {
    pub search: String,
    /// `None` means "all".
    pub role: Option<Role>,
}

impl AdminUserFilter {
    /// Search name or email; exact role; skip hidden accounts.
    #[must_use]
    pub fn apply<'a>(
        &self,
        users: &'a [UserAccount],
        hidden: &HashSet<UserId>,
    ) -> Vec<&'a UserAccount> {
        let needle = self.search.to_lowercase();
        users
            .iter()
            .filter(|u| !hidden.contains(&u.id))
            .filter(|u| {
                u.name.to_lowercase().contains(&needle)
                    || u.email.as_str().to_lowercase().contains(&needle)
            })
            .filter(|u| self.role.is_none_or(|r| u.role == r))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn catalog() -> Catalog {
        Catalog::sample().unwrap()
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_default_listing_shows_everything_under_1500() {
        let catalog = catalog();
        assert_eq!(ListingFilter::default().apply(&catalog).len(), 8);
    }

    #[test]
    fn test_category_beats_multi_select() {
        let catalog = catalog();
        let filter = ListingFilter {
            category: Some("Audio".to_string()),
            categories: vec!["Gaming".to_string()],
            ..ListingFilter::default()
        };
        assert_eq!(ids(&filter.apply(&catalog)), vec!["6"]);
    }

    #[test]
    fn test_multi_select_and_price_range() {
        let catalog = catalog();
        let filter = ListingFilter {
            categories: vec!["Electronics".to_string(), "Gaming".to_string()],
            max_price: Price::from_dollars(300),
            ..ListingFilter::default()
        };
        assert_eq!(ids(&filter.apply(&catalog)), vec!["1", "7"]);
        assert!(filter.has_sidebar_filters());
    }

    #[test]
    fn test_search_then_category() {
        let catalog = catalog();
        let filter = ListingFilter {
            search: "wireless".to_string(),
            category: Some("Accessories".to_string()),
            ..ListingFilter::default()
        };
        assert_eq!(ids(&filter.apply(&catalog)), vec!["8"]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let catalog = catalog();
        let filter = ListingFilter {
            min_price: Price::from_cents(8999),
            max_price: Price::from_cents(8999),
            ..ListingFilter::default()
        };
        assert_eq!(ids(&filter.apply(&catalog)), vec!["6"]);
    }

    #[test]
    fn test_toggled() {
        let filter = ListingFilter {
            categories: vec!["Audio".to_string()],
            ..ListingFilter::default()
        };
        assert!(filter.toggled("Audio").is_empty());
        assert_eq!(filter.toggled("Gaming"), vec!["Audio", "Gaming"]);
        assert!(filter.is_selected("Audio"));
        assert!(!filter.is_selected("Gaming"));
    }

    #[test]
    fn test_admin_product_filter_hides_deleted() {
        let catalog = catalog();
        let hidden: HashSet<ProductId> = [ProductId::new("3")].into_iter().collect();
        let filter = AdminProductFilter {
            search: String::new(),
            category: Some("Electronics".to_string()),
        };
        assert_eq!(ids(&filter.apply(catalog.products(), &hidden)), vec!["1"]);
    }

    #[test]
    fn test_admin_product_search_skips_category_text() {
        let catalog = catalog();
        let filter = AdminProductFilter {
            search: "photography".to_string(),
            category: None,
        };
        assert!(filter.apply(catalog.products(), &HashSet::new()).is_empty());
    }

    #[test]
    fn test_date_ranges() {
        let now = Utc.with_ymd_and_hms(2023, 9, 21, 12, 0, 0).unwrap();
        let catalog = catalog();
        let orders = catalog.all_orders();

        let by = |date| AdminOrderFilter {
            date,
            ..AdminOrderFilter::default()
        };
        assert_eq!(by(DateRange::All).apply(orders, now).len(), 3);
        assert_eq!(by(DateRange::Week).apply(orders, now).len(), 1);
        assert_eq!(by(DateRange::Month).apply(orders, now).len(), 2);
        assert!(by(DateRange::Today).apply(orders, now).is_empty());

        let same_day = Utc.with_ymd_and_hms(2023, 9, 20, 23, 0, 0).unwrap();
        assert_eq!(by(DateRange::Today).apply(orders, same_day).len(), 1);
    }

    #[test]
    fn test_admin_order_search_and_status() {
        let catalog = catalog();
        let filter = AdminOrderFilter {
            search: "ord-100".to_string(),
            status: Some(OrderStatus::Delivered),
            date: DateRange::All,
        };
        let found = filter.apply(catalog.all_orders(), Utc::now());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "ORD-1001");
    }

    #[test]
    fn test_admin_user_filter() {
        let catalog = catalog();
        let filter = AdminUserFilter {
            search: "EXAMPLE.COM".to_string(),
            role: Some(Role::Customer),
        };
        let hidden: HashSet<UserId> = [UserId::new("5")].into_iter().collect();
        assert_eq!(filter.apply(catalog.users(), &hidden).len(), 3);
    }
}
