use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    LikeCourseRequest, LikeCourseResponse, LikedCoursesResponse, MessageResponse,
    SaveStudentDataRequest, StudentDataResponse,
};
use crate::routes::{error_response, AppState};
use crate::services::{CacheKey, PostgresError};

/// Configure student data and liked course routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/students/{student_id}/data", web::get().to(get_student_data))
        .route("/students/{student_id}/data", web::post().to(save_student_data))
        .route("/students/{student_id}/liked-courses", web::get().to(get_liked_courses))
        .route("/students/{student_id}/liked-courses", web::post().to(like_course))
        .route(
            "/students/{student_id}/liked-courses/{program_id}",
            web::delete().to(unlike_course),
        );
}

/// Stored marks and preferences for a student
///
/// GET /api/v1/students/{student_id}/data
async fn get_student_data(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let student_id = path.into_inner();

    match state.postgres.load_profile(student_id).await {
        Ok(profile) => HttpResponse::Ok().json(StudentDataResponse {
            student_id,
            academic_marks: profile.marks,
            preferences: profile.preferences.unwrap_or_default(),
        }),
        Err(e) => {
            tracing::error!("Failed to load student data for {}: {}", student_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "student_data_unavailable", e.to_string())
        }
    }
}

/// Save marks and preferences
///
/// POST /api/v1/students/{student_id}/data
///
/// Request body:
/// ```json
/// {
///   "academicMarks": [{"subjectName": "Mathematics", "gradeOrPercentage": 72}],
///   "preferences": {"location": "Western Cape", "preferredDegrees": ["BSc"]}
/// }
/// ```
async fn save_student_data(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<SaveStudentDataRequest>,
) -> impl Responder {
    let student_id = path.into_inner();

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for student {} data: {:?}", student_id, errors);
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    if let Err(e) = state
        .postgres
        .save_student_data(student_id, &req.academic_marks, req.preferences.as_ref())
        .await
    {
        tracing::error!("Failed to save student data for {}: {}", student_id, e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "save_failed", e.to_string());
    }

    if let Err(e) = state.cache.delete(&CacheKey::profile(student_id)).await {
        tracing::warn!("Failed to invalidate profile cache for {}: {}", student_id, e);
    }

    HttpResponse::Created().json(MessageResponse {
        message: "Student data saved".to_string(),
    })
}

/// GET /api/v1/students/{student_id}/liked-courses
async fn get_liked_courses(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let student_id = path.into_inner();

    match state.postgres.get_liked_courses(student_id).await {
        Ok(program_ids) => HttpResponse::Ok().json(LikedCoursesResponse {
            student_id,
            program_ids,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch liked courses for {}: {}", student_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "liked_courses_unavailable", e.to_string())
        }
    }
}

/// POST /api/v1/students/{student_id}/liked-courses
async fn like_course(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<LikeCourseRequest>,
) -> impl Responder {
    let student_id = path.into_inner();

    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    match state.postgres.save_liked_course(student_id, req.program_id).await {
        Ok(inserted) => {
            tracing::debug!("Student {} liked program {} (new: {})", student_id, req.program_id, inserted);
            HttpResponse::Ok().json(LikeCourseResponse {
                success: true,
                already: Some(!inserted),
                removed: None,
            })
        }
        Err(PostgresError::NotFound(what)) => {
            error_response(StatusCode::NOT_FOUND, "not_found", format!("Unknown {}", what))
        }
        Err(e) => {
            tracing::error!("Failed to save liked course for {}: {}", student_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "save_failed", e.to_string())
        }
    }
}

/// DELETE /api/v1/students/{student_id}/liked-courses/{program_id}
async fn unlike_course(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> impl Responder {
    let (student_id, program_id) = path.into_inner();

    match state.postgres.remove_liked_course(student_id, program_id).await {
        Ok(removed) => HttpResponse::Ok().json(LikeCourseResponse {
            success: true,
            already: None,
            removed: Some(removed),
        }),
        Err(e) => {
            tracing::error!("Failed to remove liked course for {}: {}", student_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "delete_failed", e.to_string())
        }
    }
}
