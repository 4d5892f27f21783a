//! HTTP handlers for entitlement endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::entitlement::{
    AssignCourseToSchoolsCommand, AssignCourseToSchoolsHandler, ConfigureAvailabilityCommand,
    ConfigureAvailabilityHandler, CreateActivationCodeCommand, CreateActivationCodeHandler,
    CreateCourseCommand, CreateCourseHandler, EnrollFreeCommand, EnrollFreeHandler,
    GetCourseAccessHandler, GetCourseAccessQuery, ListCourseEnrollmentsHandler,
    ListCourseEnrollmentsQuery, RedeemCodeCommand, RedeemCodeHandler, ResolveCatalogHandler,
    ResolveCatalogQuery, UnenrollCommand, UnenrollHandler,
};
use crate::application::UserContextResolver;
use crate::adapters::http::middleware::{ContextState, RequireContext};
use crate::domain::catalog::CourseScope;
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::{CourseId, DomainError, SchoolId};
use crate::ports::{
    ActivationCodeVault, AvailabilityRegistry, CourseRepository, EnrollmentLedger,
    EventPublisher, SchoolRegistry,
};

use super::dto::{
    ActivationCodeResponse, AssignSchoolsRequest, AssignSchoolsResponse, CatalogResponse,
    ConfigureAvailabilityRequest, CreateActivationCodeRequest, CreateCourseRequest,
    EnrollmentResponse, EnrollmentsResponse, ErrorResponse, RedeemCodeRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct EntitlementAppState {
    pub courses: Arc<dyn CourseRepository>,
    pub availability: Arc<dyn AvailabilityRegistry>,
    pub ledger: Arc<dyn EnrollmentLedger>,
    pub vault: Arc<dyn ActivationCodeVault>,
    pub schools: Arc<dyn SchoolRegistry>,
    pub event_publisher: Arc<dyn EventPublisher>,
    pub resolver: Arc<UserContextResolver>,
}

impl EntitlementAppState {
    /// State for the context middleware.
    pub fn context_state(&self) -> ContextState {
        self.resolver.clone()
    }

    pub fn resolve_catalog_handler(&self) -> ResolveCatalogHandler {
        ResolveCatalogHandler::new(
            self.courses.clone(),
            self.availability.clone(),
            self.ledger.clone(),
        )
    }

    pub fn get_course_access_handler(&self) -> GetCourseAccessHandler {
        GetCourseAccessHandler::new(
            self.courses.clone(),
            self.availability.clone(),
            self.ledger.clone(),
        )
    }

    pub fn list_enrollments_handler(&self) -> ListCourseEnrollmentsHandler {
        ListCourseEnrollmentsHandler::new(self.courses.clone(), self.ledger.clone())
    }

    pub fn create_course_handler(&self) -> CreateCourseHandler {
        CreateCourseHandler::new(self.courses.clone(), self.schools.clone())
    }

    pub fn enroll_free_handler(&self) -> EnrollFreeHandler {
        EnrollFreeHandler::new(
            self.courses.clone(),
            self.availability.clone(),
            self.ledger.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn unenroll_handler(&self) -> UnenrollHandler {
        UnenrollHandler::new(self.ledger.clone(), self.event_publisher.clone())
    }

    pub fn redeem_code_handler(&self) -> RedeemCodeHandler {
        RedeemCodeHandler::new(self.vault.clone(), self.event_publisher.clone())
    }

    pub fn assign_schools_handler(&self) -> AssignCourseToSchoolsHandler {
        AssignCourseToSchoolsHandler::new(
            self.courses.clone(),
            self.availability.clone(),
            self.schools.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn configure_availability_handler(&self) -> ConfigureAvailabilityHandler {
        ConfigureAvailabilityHandler::new(self.availability.clone(), self.event_publisher.clone())
    }

    pub fn create_code_handler(&self) -> CreateActivationCodeHandler {
        CreateActivationCodeHandler::new(
            self.courses.clone(),
            self.vault.clone(),
            self.schools.clone(),
            self.event_publisher.clone(),
        )
    }
}

fn parse_course_id(raw: &str) -> Result<CourseId, EntitlementApiError> {
    raw.parse::<CourseId>().map_err(|_| {
        EntitlementError::validation("course_id", format!("'{}' is not a course id", raw)).into()
    })
}

fn parse_school_id(raw: String) -> Result<SchoolId, EntitlementApiError> {
    SchoolId::new(raw).map_err(|e| EntitlementError::from(e).into())
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/courses - The caller's catalog
pub async fn list_catalog(
    State(state): State<EntitlementAppState>,
    RequireContext(ctx): RequireContext,
) -> Result<impl IntoResponse, EntitlementApiError> {
    let courses = state
        .resolve_catalog_handler()
        .handle(ResolveCatalogQuery { ctx })
        .await?;

    Ok(Json(CatalogResponse { courses }))
}

/// GET /api/courses/:course_id - One course as the caller sees it
pub async fn get_course(
    State(state): State<EntitlementAppState>,
    RequireContext(ctx): RequireContext,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, EntitlementApiError> {
    let query = GetCourseAccessQuery {
        course_id: parse_course_id(&course_id)?,
        ctx,
    };

    let view = state.get_course_access_handler().handle(query).await?;
    Ok(Json(view))
}

/// GET /api/courses/:course_id/enrollments - Audit listing (superadmin)
pub async fn list_enrollments(
    State(state): State<EntitlementAppState>,
    RequireContext(ctx): RequireContext,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, EntitlementApiError> {
    let query = ListCourseEnrollmentsQuery {
        course_id: parse_course_id(&course_id)?,
        ctx,
    };

    let enrollments = state.list_enrollments_handler().handle(query).await?;
    Ok(Json(EnrollmentsResponse { enrollments }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST/PUT/DELETE endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/courses - Add a course to the catalog (superadmin)
pub async fn create_course(
    State(state): State<EntitlementAppState>,
    RequireContext(ctx): RequireContext,
    Json(request): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, EntitlementApiError> {
    let scope = match request.school_id {
        Some(school_id) => CourseScope::School { school_id },
        None => CourseScope::Global,
    };

    let command = CreateCourseCommand {
        title: request.title,
        description: request.description,
        scope,
        pricing: request.pricing,
        max_users_allowed: request.max_users_allowed,
        content_url: request.content_url,
        ctx,
    };

    let course = state.create_course_handler().handle(command).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// POST /api/courses/:course_id/enrollment - Self-enroll in a free course
pub async fn enroll(
    State(state): State<EntitlementAppState>,
    RequireContext(ctx): RequireContext,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, EntitlementApiError> {
    let command = EnrollFreeCommand {
        course_id: parse_course_id(&course_id)?,
        ctx,
    };

    let enrollment = state.enroll_free_handler().handle(command).await?;
    Ok((
        StatusCode::CREATED,
        Json(EnrollmentResponse::granted(enrollment)),
    ))
}

/// DELETE /api/courses/:course_id/enrollment - Leave a course
///
/// Returns 204 whether or not an enrollment existed.
pub async fn unenroll(
    State(state): State<EntitlementAppState>,
    RequireContext(ctx): RequireContext,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, EntitlementApiError> {
    let command = UnenrollCommand {
        course_id: parse_course_id(&course_id)?,
        ctx,
    };

    state.unenroll_handler().handle(command).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/courses/:course_id/redemptions - Redeem an activation code
pub async fn redeem_code(
    State(state): State<EntitlementAppState>,
    RequireContext(ctx): RequireContext,
    Path(course_id): Path<String>,
    Json(request): Json<RedeemCodeRequest>,
) -> Result<impl IntoResponse, EntitlementApiError> {
    let command = RedeemCodeCommand {
        course_id: parse_course_id(&course_id)?,
        code: request.code,
        ctx,
    };

    let enrollment = state.redeem_code_handler().handle(command).await?;
    Ok((
        StatusCode::CREATED,
        Json(EnrollmentResponse::granted(enrollment)),
    ))
}

/// PUT /api/courses/:course_id/schools - Replace the assigned schools (superadmin)
pub async fn assign_schools(
    State(state): State<EntitlementAppState>,
    RequireContext(ctx): RequireContext,
    Path(course_id): Path<String>,
    Json(request): Json<AssignSchoolsRequest>,
) -> Result<impl IntoResponse, EntitlementApiError> {
    let command = AssignCourseToSchoolsCommand {
        course_id: parse_course_id(&course_id)?,
        school_ids: request.school_ids,
        ctx,
    };

    let result = state.assign_schools_handler().handle(command).await?;
    Ok(Json(AssignSchoolsResponse::from(result.diff)))
}

/// PUT /api/courses/:course_id/schools/:school_id - Retarget one school's assignment
pub async fn configure_availability(
    State(state): State<EntitlementAppState>,
    RequireContext(ctx): RequireContext,
    Path((course_id, school_id)): Path<(String, String)>,
    Json(request): Json<ConfigureAvailabilityRequest>,
) -> Result<impl IntoResponse, EntitlementApiError> {
    let command = ConfigureAvailabilityCommand {
        course_id: parse_course_id(&course_id)?,
        school_id: parse_school_id(school_id)?,
        audience: request.audience,
        target_class_id: request.target_class_id,
        ctx,
    };

    let record = state.configure_availability_handler().handle(command).await?;
    Ok(Json(record))
}

/// POST /api/courses/:course_id/codes - Issue an activation code (superadmin)
pub async fn create_activation_code(
    State(state): State<EntitlementAppState>,
    RequireContext(ctx): RequireContext,
    Path(course_id): Path<String>,
    Json(request): Json<CreateActivationCodeRequest>,
) -> Result<impl IntoResponse, EntitlementApiError> {
    let command = CreateActivationCodeCommand {
        course_id: parse_course_id(&course_id)?,
        code: request.code,
        school_id: request.school_id,
        max_redemptions: request.max_redemptions,
        ctx,
    };

    let code = state.create_code_handler().handle(command).await?;
    Ok((StatusCode::CREATED, Json(ActivationCodeResponse::from(code))))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for converting entitlement errors to HTTP responses.
#[derive(Debug)]
pub struct EntitlementApiError(pub EntitlementError);

impl From<EntitlementError> for EntitlementApiError {
    fn from(err: EntitlementError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for EntitlementApiError {
    fn from(err: DomainError) -> Self {
        Self(EntitlementError::from(err))
    }
}

impl IntoResponse for EntitlementApiError {
    fn into_response(self) -> Response {
        let code = self.0.code().to_string();

        let (status, message) = match &self.0 {
            // Existing access is a success from the caller's point of view.
            EntitlementError::AlreadyEnrolled => {
                let body = EnrollmentResponse::already_enrolled(self.0.message());
                return (StatusCode::OK, Json(body)).into_response();
            }
            EntitlementError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.0.message()),
            EntitlementError::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.message()),
            EntitlementError::Exhausted(_) => (StatusCode::CONFLICT, self.0.message()),
            EntitlementError::NotFree(_) => (StatusCode::PAYMENT_REQUIRED, self.0.message()),
            EntitlementError::DependencyUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.0.message())
            }
            EntitlementError::ValidationFailed { .. } => {
                (StatusCode::BAD_REQUEST, self.0.message())
            }
            EntitlementError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "Request failed on infrastructure error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
