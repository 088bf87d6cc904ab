//! Authentication middleware for axum
//!
//! ```ignore
//! let app = Router::new()
//!     .merge(tollgate_auth::routes(backend.config()))
//!     .layer(axum::middleware::from_fn_with_state(backend.clone(), authenticate))
//!     .with_state(backend);
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::backend::AuthBackend;
use crate::extractors::CurrentUser;
use crate::gate::{AuthOutcome, RequestContext};

/// Run the gate for one request.
///
/// A prior `AuthOutcome` in the request extensions (left by another
/// mechanism) is passed to the gate unchanged. On success the caller is
/// stored as a [`CurrentUser`] extension.
pub async fn authenticate(
    State(backend): State<AuthBackend>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let previous = parts
        .extensions
        .get::<AuthOutcome>()
        .cloned()
        .unwrap_or_default();
    let outcome = {
        let ctx = RequestContext::from_parts(&parts);
        backend.gate().on_request(&ctx, previous).await
    };

    match outcome {
        AuthOutcome::Error(e) => e.into_response(),
        AuthOutcome::Authenticated(user_id) => {
            parts.extensions.insert(CurrentUser(user_id));
            next.run(Request::from_parts(parts, body)).await
        }
        AuthOutcome::NoOpinion => next.run(Request::from_parts(parts, body)).await,
    }
}
