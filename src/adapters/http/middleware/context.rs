//! User context middleware and extractor for axum.
//!
//! - `context_middleware` - Resolves the `X-User-Id` header into a `UserContext`
//! - `RequireContext` - Extractor that requires a resolved context
//!
//! ```text
//! Request → context_middleware → UserContextResolver → injects UserContext
//!                                      ↓
//!                              Handler → RequireContext reads from extensions
//! ```
//!
//! Session validation happens upstream; by the time a request reaches this
//! service the user id header is trusted.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::entitlement::{EntitlementApiError, ErrorResponse};
use crate::application::UserContextResolver;
use crate::domain::entitlement::{EntitlementError, UserContext};
use crate::domain::foundation::UserId;

/// Header carrying the caller's identity.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Context middleware state.
pub type ContextState = Arc<UserContextResolver>;

/// Resolves the caller's identity and injects the `UserContext`.
///
/// A request without the header continues unresolved so that handlers decide
/// whether identity is required. A blank header is rejected with 401, and a
/// resolution failure is answered with its mapped error status.
pub async fn context_middleware(
    State(resolver): State<ContextState>,
    mut request: Request,
    next: Next,
) -> Response {
    let raw = match request.headers().get(USER_ID_HEADER) {
        None => return next.run(request).await,
        Some(value) => value.to_str().ok().map(str::to_owned),
    };

    let user_id = match raw.map(UserId::new) {
        Some(Ok(user_id)) => user_id,
        _ => return ContextRejection::InvalidIdentity.into_response(),
    };

    match resolver.resolve(&user_id).await {
        Ok(ctx) => {
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Err(err) => {
            if !matches!(err, EntitlementError::Unauthorized(_)) {
                tracing::warn!(user_id = %user_id, error = %err, "Context resolution failed");
            }
            EntitlementApiError::from(err).into_response()
        }
    }
}

/// Extractor that requires a resolved user context.
///
/// ```ignore
/// async fn my_handler(RequireContext(ctx): RequireContext) -> impl IntoResponse {
///     format!("{:?}", ctx.role())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireContext(pub UserContext);

impl<S> axum::extract::FromRequestParts<S> for RequireContext
where
    S: Send + Sync,
{
    type Rejection = ContextRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<UserContext>()
                .cloned()
                .map(RequireContext)
                .ok_or(ContextRejection::MissingIdentity)
        })
    }
}

/// Rejection for requests without a usable identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextRejection {
    /// No identity header reached the handler.
    MissingIdentity,
    /// The identity header was present but unusable.
    InvalidIdentity,
}

impl IntoResponse for ContextRejection {
    fn into_response(self) -> Response {
        let message = match self {
            ContextRejection::MissingIdentity => "User identity is required",
            ContextRejection::InvalidIdentity => "User identity header is invalid",
        };

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("UNAUTHORIZED", message)),
        )
            .into_response()
    }
}
