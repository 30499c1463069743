pub mod auth;
pub mod comments;
pub mod error;
pub mod middleware;
pub mod photos;
pub mod routes;
pub mod social_medias;
pub mod users;

pub use auth::{AppState, AppStateInner};
pub use routes::router;
