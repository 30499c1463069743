use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::{comments, photos, social_medias, users};

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/users/register", post(auth::register))
        .route("/users/login", post(auth::login));

    let protected = Router::new()
        .route("/users", get(users::get_user).delete(users::delete_user))
        .route("/users/{id}", put(users::update_user))
        .route("/photos", post(photos::add_photo).get(photos::list_photos))
        .route(
            "/photos/{id}",
            get(photos::get_photo)
                .put(photos::update_photo)
                .delete(photos::delete_photo),
        )
        .route(
            "/comments",
            post(comments::add_comment).get(comments::list_comments),
        )
        .route(
            "/comments/{id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route(
            "/socialmedias",
            post(social_medias::add_social_media).get(social_medias::list_social_medias),
        )
        .route(
            "/socialmedias/{id}",
            get(social_medias::get_social_media)
                .put(social_medias::update_social_media)
                .delete(social_medias::delete_social_media),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
