//! Admin panel route handlers.
//!
//! Every handler takes [`RequireAdmin`](crate::middleware::RequireAdmin), so
//! anonymous visitors land on `/login` and customers on `/`.

pub mod dashboard;
pub mod orders;
pub mod products;
pub mod users;

use crate::models::User;

/// Sidebar entries: (label, href).
pub const ADMIN_NAV: [(&str, &str); 4] = [
    ("Dashboard", "/admin"),
    ("Products", "/admin/products"),
    ("Orders", "/admin/orders"),
    ("Users", "/admin/users"),
];

/// Sidebar link display data.
#[derive(Debug, Clone)]
pub struct AdminNavItem {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Admin shell display data: sidebar, page title and signed-in admin.
#[derive(Debug, Clone)]
pub struct AdminShell {
    pub page: &'static str,
    pub admin_name: String,
    pub admin_email: String,
    pub nav: Vec<AdminNavItem>,
}

impl AdminShell {
    #[must_use]
    pub fn new(page: &'static str, admin: &User) -> Self {
        Self {
            page,
            admin_name: admin.name.clone(),
            admin_email: admin.email.to_string(),
            nav: ADMIN_NAV
                .iter()
                .map(|&(label, href)| AdminNavItem {
                    label,
                    href,
                    active: label == page,
                })
                .collect(),
        }
    }
}

/// Flash message for a `notice` query code.
#[must_use]
pub fn notice_message(code: &str) -> Option<&'static str> {
    match code {
        "saved" => Some("Changes saved"),
        "created" => Some("Created"),
        "deleted" => Some("Deleted"),
        "status" => Some("Order status updated"),
        _ => None,
    }
}
