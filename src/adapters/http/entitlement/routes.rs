//! Axum router configuration for entitlement endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    assign_schools, configure_availability, create_activation_code, create_course, enroll,
    get_course, list_catalog, list_enrollments, redeem_code, unenroll, EntitlementAppState,
};

/// Create the entitlement API router.
///
/// # Routes
///
/// ## Learner Endpoints (students and teachers)
/// - `GET /courses` - Annotated catalog for the caller
/// - `GET /courses/:course_id` - One course as the caller sees it
/// - `POST /courses/:course_id/enrollment` - Self-enroll in a free course
/// - `DELETE /courses/:course_id/enrollment` - Leave a course
/// - `POST /courses/:course_id/redemptions` - Redeem an activation code
///
/// ## School Admin Endpoints
/// - `PUT /courses/:course_id/schools/:school_id` - Retarget an assignment
///
/// ## Superadmin Endpoints
/// - `POST /courses` - Add a course
/// - `PUT /courses/:course_id/schools` - Replace the assigned schools
/// - `POST /courses/:course_id/codes` - Issue an activation code
/// - `GET /courses/:course_id/enrollments` - Enrollment audit listing
pub fn entitlement_routes() -> Router<EntitlementAppState> {
    Router::new()
        .route("/courses", get(list_catalog).post(create_course))
        .route("/courses/:course_id", get(get_course))
        .route(
            "/courses/:course_id/enrollment",
            post(enroll).delete(unenroll),
        )
        .route("/courses/:course_id/redemptions", post(redeem_code))
        .route("/courses/:course_id/schools", put(assign_schools))
        .route(
            "/courses/:course_id/schools/:school_id",
            put(configure_availability),
        )
        .route("/courses/:course_id/codes", post(create_activation_code))
        .route("/courses/:course_id/enrollments", get(list_enrollments))
}
