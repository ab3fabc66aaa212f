//! HTTP handler for the chat relay endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{Map, Value};
use tracing::{info, warn};

use consultia_core::{AuthUser, ChatId, ChatMessage, ChatRequest, ChatResponse, ExpertContext};

use crate::http::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Handler
// ============================================================================

/// POST /chat - Relay a conversation to the completion provider.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    json_result: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let body = match json_result {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!(error = %rejection, "Invalid JSON in request body");
            return Err(ApiError::InvalidJson {
                message: rejection.body_text(),
            });
        }
    };

    if !state.relay.is_configured() {
        return Err(ApiError::NotConfigured);
    }

    let request = parse_chat_request(&body).map_err(|e| {
        warn!(error = ?e, "Rejected chat request");
        e
    })?;

    info!(
        expert = %request.expert_context.name,
        messages = request.messages.len(),
        has_chat_id = request.chat_id.is_some(),
        authenticated = request.auth_user.as_ref().is_some_and(AuthUser::has_identity),
        "Chat request received"
    );

    let response = state.relay.relay(request).await?;
    Ok(Json(response))
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a raw body and build the typed request.
///
/// Field-level checks run here rather than through `Deserialize` so each
/// failure names the offending field.
pub fn parse_chat_request(body: &Value) -> Result<ChatRequest, ApiError> {
    let empty = Map::new();
    let fields = body.as_object().unwrap_or(&empty);

    let messages = parse_messages(fields.get("messages"))?;
    let expert_context = parse_expert_context(fields.get("expertContext"))?;

    let chat_id = match fields.get("chatId") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) if id.trim().is_empty() => None,
        Some(Value::String(id)) => Some(ChatId::new(id.trim())),
        Some(_) => return Err(ApiError::InvalidField { field: "chatId" }),
    };

    let auth_user = match fields.get("authUser") {
        None | Some(Value::Null) => None,
        Some(value @ Value::Object(_)) => Some(
            serde_json::from_value::<AuthUser>(value.clone())
                .map_err(|_| ApiError::InvalidField { field: "authUser" })?,
        ),
        Some(_) => return Err(ApiError::InvalidField { field: "authUser" }),
    };

    Ok(ChatRequest {
        messages,
        expert_context,
        chat_id,
        auth_user,
    })
}

fn parse_messages(value: Option<&Value>) -> Result<Vec<ChatMessage>, ApiError> {
    let items = match value {
        None | Some(Value::Null) => return Err(ApiError::MissingField { field: "messages" }),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ApiError::InvalidField { field: "messages" }),
    };

    if items.is_empty() {
        return Err(ApiError::InvalidField { field: "messages" });
    }

    items
        .iter()
        .map(|item| {
            serde_json::from_value::<ChatMessage>(item.clone())
                .map_err(|_| ApiError::InvalidField { field: "messages" })
        })
        .collect()
}

fn parse_expert_context(value: Option<&Value>) -> Result<ExpertContext, ApiError> {
    let fields = match value {
        None | Some(Value::Null) => {
            return Err(ApiError::MissingField {
                field: "expertContext",
            })
        }
        Some(Value::Object(fields)) => fields,
        Some(_) => {
            return Err(ApiError::InvalidField {
                field: "expertContext",
            })
        }
    };

    let name = required_text(fields, "name", "expertContext.name")?;
    let specialty = required_text(fields, "specialty", "expertContext.specialty")?;

    let context = ExpertContext::new(name, specialty);
    Ok(match fields.get("category").and_then(Value::as_str) {
        Some(category) if !category.trim().is_empty() => context.with_category(category),
        _ => context,
    })
}

fn required_text<'a>(
    fields: &'a Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<&'a str, ApiError> {
    match fields.get(key) {
        None | Some(Value::Null) => Err(ApiError::MissingField { field }),
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(ApiError::InvalidField { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consultia_core::ChatRole;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "messages": [{"role": "user", "content": "Como precificar?"}],
            "expertContext": {"name": "Henrique", "specialty": "Custos", "category": "financas"}
        })
    }

    fn field_of(err: ApiError) -> &'static str {
        match err {
            ApiError::MissingField { field } | ApiError::InvalidField { field } => field,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_valid_request() {
        let req = parse_chat_request(&valid()).unwrap();
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, ChatRole::User);
        assert_eq!(req.expert_context.category.as_deref(), Some("financas"));
        assert!(req.chat_id.is_none());
        assert!(req.auth_user.is_none());
    }

    #[test]
    fn test_messages_must_be_non_empty_array() {
        let mut body = valid();
        body.as_object_mut().unwrap().remove("messages");
        assert!(matches!(
            parse_chat_request(&body),
            Err(ApiError::MissingField { field: "messages" })
        ));

        body["messages"] = json!("oi");
        assert_eq!(field_of(parse_chat_request(&body).unwrap_err()), "messages");

        body["messages"] = json!([]);
        assert_eq!(field_of(parse_chat_request(&body).unwrap_err()), "messages");
    }

    #[test]
    fn test_malformed_message_is_rejected() {
        let mut body = valid();
        body["messages"] = json!([{"role": "robot", "content": "x"}]);
        assert_eq!(field_of(parse_chat_request(&body).unwrap_err()), "messages");

        body["messages"] = json!([{"role": "user"}]);
        assert_eq!(field_of(parse_chat_request(&body).unwrap_err()), "messages");
    }

    #[test]
    fn test_expert_context_requires_name_and_specialty() {
        let mut body = valid();
        body["expertContext"] = json!({"specialty": "Custos"});
        assert_eq!(
            field_of(parse_chat_request(&body).unwrap_err()),
            "expertContext.name"
        );

        body["expertContext"] = json!({"name": "Henrique", "specialty": "  "});
        assert_eq!(
            field_of(parse_chat_request(&body).unwrap_err()),
            "expertContext.specialty"
        );

        body.as_object_mut().unwrap().remove("expertContext");
        assert_eq!(
            field_of(parse_chat_request(&body).unwrap_err()),
            "expertContext"
        );
    }

    #[test]
    fn test_optional_fields() {
        let mut body = valid();
        body["chatId"] = json!("chat-42");
        body["authUser"] = json!({"id": "uid", "email": "ana@example.com"});

        let req = parse_chat_request(&body).unwrap();
        assert_eq!(req.chat_id, Some(ChatId::new("chat-42")));
        assert_eq!(req.auth_user.unwrap().email(), Some("ana@example.com"));

        body["chatId"] = json!("");
        assert!(parse_chat_request(&body).unwrap().chat_id.is_none());

        body["chatId"] = json!(42);
        assert_eq!(field_of(parse_chat_request(&body).unwrap_err()), "chatId");

        body["chatId"] = Value::Null;
        body["authUser"] = json!("ana");
        assert_eq!(field_of(parse_chat_request(&body).unwrap_err()), "authUser");
    }

    #[test]
    fn test_non_object_body() {
        assert!(matches!(
            parse_chat_request(&json!([1, 2])),
            Err(ApiError::MissingField { field: "messages" })
        ));
    }
}
