//! Inventory chatbot handler.
//!
//! ```text
//! POST /chat/inventory {"question":"Which books are low on stock?","use_ollama":false}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{ChatProvider, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::Caller;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{json_body, missing_field_error};

/// Request body for `POST /chat/inventory`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ChatRequest {
    #[schema(example = "Which products expire this month?")]
    pub question: Option<String>,
    /// `true` or `"true"` selects the local Ollama model.
    #[schema(value_type = Option<bool>)]
    pub use_ollama: Option<Value>,
}

/// Chatbot answer with the model that produced it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub answer: String,
    #[schema(example = "openai-rag")]
    pub model: String,
}

fn provider_from(flag: Option<&Value>) -> ChatProvider {
    let use_ollama = match flag {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(raw)) => raw.trim().eq_ignore_ascii_case("true"),
        _ => false,
    };
    if use_ollama {
        ChatProvider::Ollama
    } else {
        ChatProvider::OpenAi
    }
}

/// Answer a question from the inventory and the caller's documents.
#[utoipa::path(
    post,
    path = "/chat/inventory",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Answer", body = ChatResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Model provider unavailable", body = Error)
    ),
    tags = ["chat"],
    operation_id = "chatInventory",
    security(("bearer" = []))
)]
#[post("/inventory")]
pub async fn chat_inventory(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: Result<web::Json<ChatRequest>, actix_web::Error>,
) -> ApiResult<web::Json<ChatResponse>> {
    let request = json_body(payload)?;
    let question = request
        .question
        .as_deref()
        .map(str::trim)
        .filter(|question| !question.is_empty())
        .ok_or_else(|| missing_field_error("question"))?;
    let provider = provider_from(request.use_ollama.as_ref());
    let answer = state.chat.answer(caller.user(), question, provider).await?;
    Ok(web::Json(ChatResponse {
        answer: answer.answer,
        model: answer.model.to_owned(),
    }))
}
