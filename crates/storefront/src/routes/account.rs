//! Profile page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{Result, clear_sentry_user};
use crate::filters;
use crate::middleware::{Flash, PageContext, RequireAuth, clear_current_user, push_flash};
use crate::models::User;
use crate::state::AppState;

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub page: PageContext,
    pub user: User,
    pub member_since: String,
}

/// Display the signed-in user's profile.
///
/// A session whose account has been deleted is signed out.
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    page: PageContext,
) -> Result<Response> {
    let user = UserRepository::new(state.pool()).get_by_id(current.id).await?;

    Ok(match user {
        Some(user) => ProfileTemplate {
            member_since: user.created_at.format("%B %-d, %Y").to_string(),
            user,
            page,
        }
        .into_response(),
        None => {
            tracing::warn!("Session refers to a deleted account");
            clear_current_user(&session).await?;
            clear_sentry_user();
            push_flash(&session, Flash::error("Your account no longer exists")).await;
            Redirect::to("/login").into_response()
        }
    })
}
