use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::translate::DEFAULT_TARGET_LANG;
use crate::AppContext;

pub fn translate_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/translate", post(translate))
        .route("/message", post(message))
        .with_state(ctx)
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: Option<String>,
    pub target_lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

async fn translate(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<TranslateRequest>,
) -> impl IntoResponse {
    let Some(text) = req.text else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Text is required for translation".to_string(),
            }),
        )
            .into_response();
    };
    let target_lang = req.target_lang.unwrap_or_else(|| DEFAULT_TARGET_LANG.to_string());

    match ctx.translator.translate(&text, &target_lang).await {
        Ok(translated_text) => (
            StatusCode::OK,
            Json(TranslateResponse { translated_text }),
        )
            .into_response(),
        Err(e) => {
            error!("Translation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: e.to_string() }),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Option<String>,
    #[serde(default = "default_is_user")]
    pub is_user: bool,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

fn default_is_user() -> bool {
    true
}

fn default_target_lang() -> String {
    DEFAULT_TARGET_LANG.to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub response: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_user: bool,
}

async fn message(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<MessageRequest>,
) -> impl IntoResponse {
    if req.kind != "text" {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Unsupported message type: {}", req.kind),
            }),
        )
            .into_response();
    }

    let content = req.content.unwrap_or_default();
    match ctx.translator.translate(&content, &req.target_lang).await {
        Ok(translated) => (
            StatusCode::OK,
            Json(MessageResponse {
                response: translated,
                kind: "text".to_string(),
                is_user: !req.is_user,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Translation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: e.to_string() }),
            )
                .into_response()
        }
    }
}
