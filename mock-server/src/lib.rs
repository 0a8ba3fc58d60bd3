use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: Uuid,
    pub sender: String,
    pub recipient: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct SendSms {
    pub sender: String,
    pub recipient: String,
    pub message: String,
}

pub type Outbox = Arc<RwLock<Vec<SentMessage>>>;

pub fn app() -> Router {
    let outbox: Outbox = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/send_sms", post(send_sms))
        .route("/messages", get(list_messages))
        .with_state(outbox)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn send_sms(
    State(outbox): State<Outbox>,
    headers: HeaderMap,
    Json(input): Json<SendSms>,
) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"})));
    }
    if input.message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Message must not be empty"})),
        );
    }

    let sent = SentMessage {
        id: Uuid::new_v4(),
        sender: input.sender,
        recipient: input.recipient,
        message: input.message,
    };
    info!("accepted message {} for {}", sent.id, sent.recipient);
    let id = sent.id;
    outbox.write().await.push(sent);
    (StatusCode::OK, Json(json!({"status": "sent", "message_id": id})))
}

async fn list_messages(State(outbox): State<Outbox>) -> Json<Vec<SentMessage>> {
    Json(outbox.read().await.clone())
}
