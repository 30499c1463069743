use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use mygram_types::Id;
use mygram_types::api::{AddPhotoRequest, MessageResponse, PhotoOfUserResponse, PhotoUser};

use crate::auth::AppState;
use crate::error::{ApiError, blocking};
use crate::middleware::CurrentUser;

pub async fn add_photo(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    WithRejection(Json(req), _): WithRejection<Json<AddPhotoRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let photos = state.services.photos.clone();
    let photo = blocking(move || photos.add_photo(caller, &req)).await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

/// The caller's photos, each tagged with the owner's email and username.
pub async fn list_photos(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let svc = state.services.clone();
    let (user, photos) = blocking(move || {
        let user = svc.users.get_user(caller)?;
        let photos = svc.photos.list_photos(caller)?;
        Ok((user, photos))
    })
    .await?;

    let owner = PhotoUser {
        email: user.email,
        username: user.username,
    };
    let body: Vec<PhotoOfUserResponse> = photos
        .into_iter()
        .map(|photo| PhotoOfUserResponse {
            photo,
            user: owner.clone(),
        })
        .collect();

    Ok(Json(body))
}

pub async fn get_photo(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Id>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let photos = state.services.photos.clone();
    let photo = blocking(move || photos.get_photo(id)).await?;
    Ok(Json(photo))
}

pub async fn update_photo(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<Id>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<AddPhotoRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let photos = state.services.photos.clone();
    let photo = blocking(move || photos.update_photo(caller, id, &req)).await?;
    Ok(Json(photo))
}

pub async fn delete_photo(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<Id>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let photos = state.services.photos.clone();
    blocking(move || photos.delete_photo(caller, id)).await?;

    Ok(Json(MessageResponse {
        message: "Your photo has been successfully deleted".into(),
    }))
}
