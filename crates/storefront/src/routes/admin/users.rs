//! Admin user management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use athletica_core::UserId;

use crate::db::{RepositoryError, UserRepository};
use crate::filters;
use crate::middleware::{Flash, PageContext, RequireAdmin, push_flash};
use crate::models::User;
use crate::routes::parse_id;
use crate::state::AppState;

/// A row in the user table.
pub struct UserRow {
    pub user: User,
    pub joined: String,
    pub is_self: bool,
}

/// User list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct UsersTemplate {
    pub page: PageContext,
    pub users: Vec<UserRow>,
    pub load_failed: bool,
}

/// List every user.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    page: PageContext,
) -> impl IntoResponse {
    let (users, load_failed) = match UserRepository::new(state.pool()).list_all().await {
        Ok(users) => (users, false),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list users");
            (Vec::new(), true)
        }
    };

    let users = users
        .into_iter()
        .map(|user| UserRow {
            joined: user.created_at.format("%Y-%m-%d").to_string(),
            is_self: user.id == admin.id,
            user,
        })
        .collect();

    UsersTemplate {
        page,
        users,
        load_failed,
    }
}

/// Delete a user along with their cart, favorites and admin marker.
///
/// An admin cannot delete their own account.
#[instrument(skip(state, session, admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<String>,
) -> Redirect {
    let Some(id) = parse_id::<UserId>(&id) else {
        push_flash(&session, Flash::error("User not found")).await;
        return Redirect::to("/admin/users");
    };

    if id == admin.id {
        push_flash(&session, Flash::error("You cannot delete your own account")).await;
        return Redirect::to("/admin/users");
    }

    match UserRepository::new(state.pool()).delete(id).await {
        Ok(()) => {
            tracing::info!(admin_id = %admin.id, user_id = %id, "User deleted");
            push_flash(&session, Flash::success("User deleted")).await;
        }
        Err(RepositoryError::NotFound) => {
            push_flash(&session, Flash::error("User not found")).await;
        }
        Err(e) => {
            tracing::error!(user_id = %id, error = %e, "Failed to delete user");
            push_flash(&session, Flash::error("Could not delete user")).await;
        }
    }

    Redirect::to("/admin/users")
}
