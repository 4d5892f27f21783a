//! HTTP middleware for axum.
//!
//! - `context` - User context resolution and the `RequireContext` extractor

pub mod context;

pub use context::{
    context_middleware, ContextRejection, ContextState, RequireContext, USER_ID_HEADER,
};
