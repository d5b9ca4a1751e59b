//! Admin users table and form.

use std::collections::HashSet;
use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopwave_core::{Role, UserId};

use super::{AdminShell, notice_message};
use crate::catalog::AdminUserFilter;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::middleware::session::{hide, load_hidden};
use crate::models::{UserAccount, session_keys};
use crate::services::{AccountDraft, AccountForm};
use crate::state::AppState;

/// Users table row.
#[derive(Debug, Clone)]
pub struct UserRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: &'static str,
    pub is_admin: bool,
    pub joined: String,
    pub orders: u32,
    pub total_spent: String,
}

impl From<&UserAccount> for UserRowView {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name.clone(),
            email: account.email.to_string(),
            role: account.role.as_str(),
            is_admin: account.role == Role::Admin,
            joined: account.created_at.format("%b %-d, %Y").to_string(),
            orders: account.orders,
            total_spent: account.total_spent.to_string(),
        }
    }
}

/// Query parameters for the users table.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub search: Option<String>,
    /// `all`, `admin` or `customer`.
    pub role: Option<String>,
    pub notice: Option<String>,
}

impl UsersQuery {
    fn to_filter(&self) -> AdminUserFilter {
        AdminUserFilter {
            search: self.search.as_deref().unwrap_or_default().trim().to_string(),
            role: self.role.as_deref().and_then(|r| Role::from_str(r).ok()),
        }
    }
}

/// Users table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct UsersTemplate {
    pub shell: AdminShell,
    pub users: Vec<UserRowView>,
    pub search: String,
    pub role: &'static str,
    pub notice: Option<&'static str>,
}

/// User create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/user_form.html")]
pub struct UserFormTemplate {
    pub shell: AdminShell,
    pub is_new: bool,
    pub form: AccountForm,
    pub error: Option<String>,
}

impl UserFormTemplate {
    fn id(&self) -> &str {
        self.form.id.as_deref().unwrap_or_default()
    }

    fn is_admin_role(&self) -> bool {
        self.form.role == Role::Admin.as_str()
    }
}

/// Users table handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<UsersQuery>,
) -> Result<UsersTemplate, AppError> {
    let hidden: HashSet<UserId> = load_hidden(&session, session_keys::ADMIN_HIDDEN_USERS).await?;
    let filter = query.to_filter();

    Ok(UsersTemplate {
        shell: AdminShell::new("Users", &admin),
        users: filter
            .apply(state.catalog().users(), &hidden)
            .into_iter()
            .map(UserRowView::from)
            .collect(),
        search: filter.search.clone(),
        role: filter.role.map_or("all", |r| r.as_str()),
        notice: query.notice.as_deref().and_then(notice_message),
    })
}

/// Blank user form.
#[instrument(skip(admin))]
pub async fn new(RequireAdmin(admin): RequireAdmin) -> UserFormTemplate {
    UserFormTemplate {
        shell: AdminShell::new("Users", &admin),
        is_new: true,
        form: AccountForm {
            role: Role::Customer.as_str().to_string(),
            ..AccountForm::default()
        },
        error: None,
    }
}

/// Edit form prefilled from the sample accounts.
#[instrument(skip(admin, state))]
pub async fn edit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<UserFormTemplate, AppError> {
    let account = state
        .catalog()
        .users()
        .iter()
        .find(|u| u.id.as_str() == id)
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    Ok(UserFormTemplate {
        shell: AdminShell::new("Users", &admin),
        is_new: false,
        form: AccountForm::from(account),
        error: None,
    })
}

/// Validate and log a user save.
#[instrument(skip(admin, form))]
pub async fn save(RequireAdmin(admin): RequireAdmin, Form(form): Form<AccountForm>) -> Response {
    match AccountDraft::from_form(&form) {
        Ok(draft) => {
            tracing::info!(
                admin_id = %admin.id,
                user_id = ?draft.id.as_ref().map(UserId::as_str),
                email = %draft.email,
                role = %draft.role,
                "User save requested (not persisted)"
            );
            let notice = if draft.is_new() { "created" } else { "saved" };
            Redirect::to(&format!("/admin/users?notice={notice}")).into_response()
        }
        Err(e) => {
            tracing::debug!(error = %e, "User form rejected");
            let is_new = form.id.as_deref().is_none_or(|id| id.trim().is_empty());
            UserFormTemplate {
                shell: AdminShell::new("Users", &admin),
                is_new,
                error: Some(e.to_string()),
                form,
            }
            .into_response()
        }
    }
}

/// Hide a user from the table for this session.
#[instrument(skip(admin, state, session))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    if !state.catalog().users().iter().any(|u| u.id.as_str() == id) {
        return Err(AppError::NotFound(format!("user {id}")));
    }
    if id == admin.id.as_str() {
        return Err(AppError::BadRequest("cannot delete yourself".to_string()));
    }

    hide(&session, session_keys::ADMIN_HIDDEN_USERS, UserId::new(id.as_str())).await?;
    tracing::info!(admin_id = %admin.id, user_id = %id, "User hidden for session");

    Ok(Redirect::to("/admin/users?notice=deleted"))
}
