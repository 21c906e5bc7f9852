use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub session_id: Option<String>,
    pub message: String,
}

/*
    /api/chat/start
*/
pub async fn start(data: web::Data<AppState>) -> impl Responder {
    match data.conversation.start().await {
        Ok(reply) => HttpResponse::Ok().json(reply),
        Err(err) => {
            log::error!("Failed to start conversation: {}", err);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": "Failed to start conversation"}))
        }
    }
}

/*
    /api/chat/message
*/
pub async fn message(data: web::Data<AppState>, body: web::Json<MessageRequest>) -> impl Responder {
    let body = body.into_inner();
    let session_id = body
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    match data.conversation.process_message(&session_id, &body.message).await {
        Ok(reply) => HttpResponse::Ok().json(reply),
        Err(err) => {
            log::error!("Failed to process message for {}: {}", session_id, err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "session_id": session_id,
                "error": "Sorry, I couldn't process that message. Please try again."
            }))
        }
    }
}
