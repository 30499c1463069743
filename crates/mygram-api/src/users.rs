use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use mygram_types::Id;
use mygram_types::api::{MessageResponse, UpdateUserRequest, UpdateUserResponse};

use crate::auth::AppState;
use crate::error::{ApiError, blocking};
use crate::middleware::CurrentUser;

/// Profile of the caller.
pub async fn get_user(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.services.users.clone();
    let user = blocking(move || users.get_user(caller)).await?;
    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<Id>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateUserRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.services.users.clone();
    let user = blocking(move || users.update_user(caller, id, &req)).await?;

    Ok(Json(UpdateUserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        age: user.age,
        updated_at: user.updated_at,
    }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.services.users.clone();
    blocking(move || users.delete_user(caller)).await?;

    Ok(Json(MessageResponse {
        message: "Your account has been successfully deleted".into(),
    }))
}
