use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use mygram_types::Id;
use mygram_types::api::{
    AddCommentRequest, CommentOfUserResponse, CommentPhoto, CommentUser, MessageResponse,
    UpdateCommentRequest,
};

use crate::auth::AppState;
use crate::error::{ApiError, blocking};
use crate::middleware::CurrentUser;

pub async fn add_comment(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    WithRejection(Json(req), _): WithRejection<Json<AddCommentRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let comments = state.services.comments.clone();
    let comment = blocking(move || comments.add_comment(caller, &req)).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let svc = state.services.clone();
    let (user, comments) = blocking(move || {
        let user = svc.users.get_user(caller)?;
        let comments = svc.comments.list_comments(caller)?;
        Ok((user, comments))
    })
    .await?;

    let author = CommentUser {
        id: user.id,
        username: user.username,
        email: user.email,
    };
    let body: Vec<CommentOfUserResponse> = comments
        .into_iter()
        .map(|(comment, photo)| CommentOfUserResponse {
            comment,
            user: author.clone(),
            photo: CommentPhoto {
                id: photo.id,
                title: photo.title,
                caption: photo.caption,
                photo_url: photo.photo_url,
                user_id: photo.user_id,
            },
        })
        .collect();

    Ok(Json(body))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<Id>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateCommentRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let comments = state.services.comments.clone();
    let comment = blocking(move || comments.update_comment(caller, id, &req)).await?;
    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<Id>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let comments = state.services.comments.clone();
    blocking(move || comments.delete_comment(caller, id)).await?;

    Ok(Json(MessageResponse {
        message: "Your comment has been successfully deleted".into(),
    }))
}
