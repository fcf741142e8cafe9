use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    error: Option<String>,
}

/// Returns the provider authorization URL
pub async fn login(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let auth_url = state.music.authorize_url()?;
    Ok(Json(json!({ "auth_url": auth_url })))
}

/// OAuth redirect target: trades the code and hands the token to the frontend
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackQuery>,
) -> AppResult<Redirect> {
    if let Some(error) = params.error {
        return Err(AppError::InvalidInput(format!("Authorization failed: {}", error)));
    }
    let code = params
        .code
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("No authorization code provided".to_string()))?;

    let token = state.music.exchange_code(&code).await?;

    Ok(Redirect::to(&format!(
        "{}/#access_token={}",
        state.frontend_url, token.access_token
    )))
}
