use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

use crate::audio::capture;
use crate::task::TaskStatus;
use crate::AppContext;

pub fn record_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/record", post(record))
        .route("/check_status/:task_id", get(check_status))
        .with_state(ctx)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    pub target_lang: String,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub status: String,
    pub task_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

async fn record(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<RecordRequest>,
) -> impl IntoResponse {
    // admission control: one permit per in-flight pipeline
    let permit = match ctx.record_permits.clone().try_acquire_owned() {
        Ok(permit) => permit,
        Err(_) => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: "Too many recordings in flight, try again later".to_string(),
                }),
            )
                .into_response();
        }
    };

    // capture runs to completion before the 202 goes out
    let duration = *crate::RECORD_SECS;
    let dir = PathBuf::from(crate::AUDIO_PATH.as_str());
    let capture_result = tokio::task::spawn_blocking(move || {
        capture::record_to_wav(duration, capture::RECORD_SAMPLE_RATE, &dir)
    })
    .await;

    let audio_path = match capture_result {
        Ok(Ok(path)) => path,
        Ok(Err(e)) => {
            error!("Recording error: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: e.to_string() }),
            )
                .into_response();
        }
        Err(e) => {
            error!("Recording task panicked: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: e.to_string() }),
            )
                .into_response();
        }
    };

    let task = ctx.registry.create(&req.target_lang).await;

    let runner = ctx.runner.clone();
    let task_id = task.id.clone();
    let target_lang = req.target_lang.clone();
    tokio::spawn(async move {
        runner.run_task(audio_path, &task_id, &target_lang).await;
        drop(permit);
    });

    (
        StatusCode::ACCEPTED,
        Json(RecordResponse {
            status: TaskStatus::Processing.to_string(),
            task_id: task.id,
            message: "Audio recorded and processing started".to_string(),
        }),
    )
        .into_response()
}

async fn check_status(
    State(ctx): State<Arc<AppContext>>,
    Path(task_id): Path<String>,
) -> impl IntoResponse {
    match ctx.registry.get(&task_id).await {
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "status": "not_found",
                "error": "Task not found. It may have been cleaned up due to age.",
            })),
        ),
        Some(task) => match task.status {
            TaskStatus::Completed => (
                StatusCode::OK,
                Json(json!({
                    "status": "completed",
                    "transcription": task.transcription,
                    "translation": task.translation,
                })),
            ),
            TaskStatus::Failed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "failed",
                    "error": task.error,
                })),
            ),
            TaskStatus::Processing => (
                StatusCode::ACCEPTED,
                Json(json!({
                    "status": "processing",
                    "message": "Transcription and translation are still in progress",
                })),
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::handlers::test_support::test_ctx;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_check_status_unknown_id_is_not_found() {
        let ctx = test_ctx();
        let app = record_router(ctx);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/check_status/no-such-task")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["status"], "not_found");
        assert!(body["error"].as_str().unwrap().contains("Task not found"));
    }

    #[tokio::test]
    async fn test_check_status_processing_is_accepted() {
        let ctx = test_ctx();
        let task = ctx.registry.create("kn").await;
        let app = record_router(ctx);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/check_status/{}", task.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "processing");
        assert!(body["message"].as_str().unwrap().contains("in progress"));
    }

    #[tokio::test]
    async fn test_check_status_completed_carries_both_texts() {
        let ctx = test_ctx();
        let task = ctx.registry.create("kn").await;
        ctx.registry
            .complete(&task.id, "hello".to_string(), "kn:hello".to_string())
            .await;
        let app = record_router(ctx);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/check_status/{}", task.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "completed");
        assert_eq!(body["transcription"], "hello");
        assert_eq!(body["translation"], "kn:hello");
    }

    #[tokio::test]
    async fn test_check_status_failed_is_server_error() {
        let ctx = test_ctx();
        let task = ctx.registry.create("kn").await;
        ctx.registry.fail(&task.id, "model exploded".to_string()).await;
        let app = record_router(ctx);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/check_status/{}", task.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["status"], "failed");
        assert_eq!(body["error"], "model exploded");
    }

    #[tokio::test]
    async fn test_record_rejected_when_no_permits_left() {
        use crate::web::handlers::test_support::{test_ctx_with, EchoTranslator};

        let ctx = test_ctx_with(Arc::new(EchoTranslator), 0);
        let app = record_router(ctx);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/record")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"targetLang":"kn"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("Too many recordings"));
    }
}
