use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    extract::WithRejection,
    headers::{Authorization, authorization::Bearer},
};
use tracing::debug;

use mygram_service::ServiceError;
use mygram_types::Id;

use crate::auth::AppState;
use crate::error::ApiError;

/// The authenticated caller, inserted by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Id);

/// Validate the bearer token and attach the caller's id to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    WithRejection(TypedHeader(Authorization(bearer)), _): WithRejection<
        TypedHeader<Authorization<Bearer>>,
        ApiError,
    >,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = state.tokens.validate(bearer.token()).map_err(|e| {
        debug!("Rejected token: {}", e);
        ApiError::from(ServiceError::from(e))
    })?;

    req.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(req).await)
}
