use std::sync::Arc;
use axum::{
    extract::Request,
    response::IntoResponse,
    routing::get,
    Extension,
    Json,
    Router,
};
use chrono::Utc;
use log::{error, info};
use validator::Validate;
use crate::{
    AppState,
    dto::{HttpResult, SuccessResponse},
    error::{BodyParser, ErrorMessage, ErrorPayload, HttpError, QueryParser},
    modules::comment::{
        dto::{submission_error, CommentListParams, CommentRequest},
        model::CommentRepository,
    },
};

pub fn comment_router() -> Router {
    Router::new()
        .route(
            "/comments",
            get(comment_list_by_movie)
                .post(comment_create)
                .fallback(comment_method_not_allowed),
        )
}

async fn comment_list_by_movie(
    Extension(app_state): Extension<Arc<AppState>>,
    QueryParser(query_params): QueryParser<CommentListParams>,
) -> HttpResult<impl IntoResponse> {
    query_params.validate()
        .map_err(|_| HttpError::<ErrorPayload>::bad_request(ErrorMessage::MovieIdRequired.to_string(), None))?;
    let movie_id = query_params.movie_id
        .ok_or(HttpError::<ErrorPayload>::bad_request(ErrorMessage::MovieIdRequired.to_string(), None))?;
    let comments = app_state.comment_store.get_approved_comments_by_movie(&movie_id).await
        .map_err(|e| {
            error!("Error retrieving comments for {}: {}", movie_id, e);
            HttpError::server_error(ErrorMessage::RetrieveCommentsFailed.to_string(), app_state.error_detail(&e))
        })?;
    Ok(Json(comments))
}
async fn comment_create(
    Extension(app_state): Extension<Arc<AppState>>,
    BodyParser(body): BodyParser<CommentRequest>,
) -> HttpResult<impl IntoResponse> {
    body.validate().map_err(submission_error)?;
    let new_comment = body.into_new_comment(Utc::now())
        .ok_or(HttpError::<ErrorPayload>::bad_request(ErrorMessage::FieldsRequired.to_string(), None))?;
    let movie_id = new_comment.movie_id.clone();
    let comment = app_state.comment_store.save_comment(new_comment).await
        .map_err(|e| {
            error!("Error saving comment for {}: {}", movie_id, e);
            HttpError::server_error(ErrorMessage::SaveCommentFailed.to_string(), app_state.error_detail(&e))
        })?;
    info!("Comment {} stored for {}", comment.id, comment.movie_id);
    Ok(
        SuccessResponse::<()>::new("Comment submitted successfully", None)
    )
}
async fn comment_method_not_allowed(request: Request) -> HttpError<ErrorPayload> {
    info!("Rejected {} {}", request.method(), request.uri().path());
    HttpError::method_not_allowed(ErrorMessage::InvalidRequestMethod.to_string(), None)
}
