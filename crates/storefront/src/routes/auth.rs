//! Login, registration and logout handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    Flash, PageContext, clear_current_user, push_flash, set_current_user,
};
use crate::services::auth::{AuthService, MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH};
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Deserialize)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
    pub min_name_length: usize,
    pub min_password_length: usize,
}

/// Display the login page. Signed-in users go home.
#[instrument(skip_all)]
pub async fn login_page(page: PageContext) -> Response {
    if page.is_signed_in() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate { page }.into_response()
}

/// Check credentials and start a session.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Redirect {
    let auth = AuthService::new(state.pool());

    let user = match auth.login(&form.email, &form.password).await {
        Ok(user) => user,
        Err(e) => {
            tracing::info!(error = %e, "Login failed");
            push_flash(&session, Flash::error(e.user_message())).await;
            return Redirect::to("/login");
        }
    };

    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!(user_id = %user.id, error = %e, "Failed to store session");
        push_flash(&session, Flash::error("Could not sign you in, please try again")).await;
        return Redirect::to("/login");
    }

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    if user.is_admin() {
        push_flash(&session, Flash::success("Welcome Admin")).await;
        Redirect::to("/admin/dashboard")
    } else {
        push_flash(&session, Flash::success("Login successful")).await;
        Redirect::to("/")
    }
}

/// Display the registration page. Signed-in users go home.
#[instrument(skip_all)]
pub async fn register_page(page: PageContext) -> Response {
    if page.is_signed_in() {
        return Redirect::to("/").into_response();
    }
    RegisterTemplate {
        page,
        min_name_length: MIN_NAME_LENGTH,
        min_password_length: MIN_PASSWORD_LENGTH,
    }
    .into_response()
}

/// Create an account. The visitor then signs in on the login page.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Redirect {
    let auth = AuthService::new(state.pool());

    match auth
        .register(&form.full_name, &form.email, &form.password)
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User registered");
            push_flash(&session, Flash::success("User registered successfully")).await;
            Redirect::to("/login")
        }
        Err(e) => {
            tracing::info!(error = %e, "Registration rejected");
            push_flash(&session, Flash::error(e.user_message())).await;
            Redirect::to("/register")
        }
    }
}

/// End the session.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "Failed to clear session on logout");
    }
    clear_sentry_user();
    push_flash(&session, Flash::info("You have been logged out")).await;
    Redirect::to("/")
}
