//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//! 5. Security headers (CSP, frame denial, etc.)
//! 6. Rate limiting on login and registration (governor)
//!
//! Authentication and the admin guard are extractors rather than layers so
//! each handler states what it needs in its signature.

pub mod admin;
pub mod auth;
pub mod flash;
pub mod page;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use admin::{AdminLookup, RequireAdmin, is_admin};
pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use flash::{Flash, FlashLevel, push_flash, take_flash};
pub use page::PageContext;
pub use rate_limit::auth_rate_limiter;
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
