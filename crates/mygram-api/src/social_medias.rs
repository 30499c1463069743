use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use mygram_types::Id;
use mygram_types::api::{
    AddSocialMediaRequest, MessageResponse, SocialMediaListResponse, SocialMediaOfUserResponse,
    SocialMediaUser,
};

use crate::auth::AppState;
use crate::error::{ApiError, blocking};
use crate::middleware::CurrentUser;

pub async fn add_social_media(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    WithRejection(Json(req), _): WithRejection<Json<AddSocialMediaRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let social_medias = state.services.social_medias.clone();
    let social_media = blocking(move || social_medias.add_social_media(caller, &req)).await?;
    Ok((StatusCode::CREATED, Json(social_media)))
}

pub async fn list_social_medias(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let svc = state.services.clone();
    let (user, social_medias) = blocking(move || {
        let user = svc.users.get_user(caller)?;
        let social_medias = svc.social_medias.list_social_medias(caller)?;
        Ok((user, social_medias))
    })
    .await?;

    let owner = SocialMediaUser {
        id: user.id,
        username: user.username,
    };
    let social_medias = social_medias
        .into_iter()
        .map(|social_media| SocialMediaOfUserResponse {
            social_media,
            user: owner.clone(),
        })
        .collect();

    Ok(Json(SocialMediaListResponse { social_medias }))
}

pub async fn get_social_media(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Id>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let social_medias = state.services.social_medias.clone();
    let social_media = blocking(move || social_medias.get_social_media(id)).await?;
    Ok(Json(social_media))
}

pub async fn update_social_media(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<Id>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<AddSocialMediaRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let social_medias = state.services.social_medias.clone();
    let social_media =
        blocking(move || social_medias.update_social_media(caller, id, &req)).await?;
    Ok(Json(social_media))
}

pub async fn delete_social_media(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<Id>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let social_medias = state.services.social_medias.clone();
    blocking(move || social_medias.delete_social_media(caller, id)).await?;

    Ok(Json(MessageResponse {
        message: "Your social media has been successfully deleted".into(),
    }))
}
