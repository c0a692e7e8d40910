//! Dashboard statistics endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, services::stats::Stats, AppState};

use super::AuthenticatedUser;

/// Headline counts for the staff dashboard
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Counts", body = Stats)
    )
)]
pub async fn get_stats(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Stats>> {
    claims.require_staff()?;
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
