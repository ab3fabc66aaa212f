//! API error type and its JSON rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::error;

use consultia_core::ErrorBody;

use crate::provider::ProviderError;
use crate::relay::RelayError;

/// API errors with their HTTP status and `{error, code, ...}` body.
///
/// `error` carries the user-facing text shown by the browser; `code` is a
/// stable machine-readable identifier.
#[derive(Debug)]
pub enum ApiError {
    // Client errors (4xx)
    /// Body is not valid JSON or not `application/json`.
    InvalidJson { message: String },
    /// Required field absent.
    MissingField { field: &'static str },
    /// Field present with the wrong shape.
    InvalidField { field: &'static str },
    /// No route matched.
    NotFound,

    // Server errors (5xx)
    /// No provider API key configured.
    NotConfigured,
    /// Upstream failure; status and body are relayed when known.
    ProviderFailure {
        provider_status: Option<u16>,
        provider_error: Option<Value>,
    },
    /// Upstream did not answer in time.
    Timeout,
    /// Unexpected failure.
    Internal,
}

/// User-facing text for a validation failure on `field`.
fn field_message(field: &str) -> &'static str {
    match field.split('.').next().unwrap_or(field) {
        "messages" => "Mensagens inválidas",
        "expertContext" => "Contexto do especialista inválido",
        "chatId" => "Identificador de conversa inválido",
        "authUser" => "Usuário inválido",
        _ => "Requisição inválida",
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson { .. }
            | ApiError::MissingField { .. }
            | ApiError::InvalidField { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::ProviderFailure { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::NotConfigured | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the JSON body.
    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::InvalidJson { message } => ErrorBody {
                error: format!("JSON inválido: {}", message),
                code: Some("invalid_json".into()),
                ..Default::default()
            },
            ApiError::MissingField { field } => ErrorBody {
                error: field_message(field).into(),
                code: Some("missing_field".into()),
                param: Some((*field).into()),
                ..Default::default()
            },
            ApiError::InvalidField { field } => ErrorBody {
                error: field_message(field).into(),
                code: Some("invalid_field".into()),
                param: Some((*field).into()),
                ..Default::default()
            },
            ApiError::NotFound => ErrorBody {
                error: "Rota não encontrada".into(),
                code: Some("not_found".into()),
                ..Default::default()
            },
            ApiError::NotConfigured => ErrorBody {
                error: "Serviço temporariamente indisponível. Contate o suporte.".into(),
                code: Some("not_configured".into()),
                ..Default::default()
            },
            ApiError::ProviderFailure {
                provider_status,
                provider_error,
            } => ErrorBody {
                error: "Falha ao consultar o provedor de IA".into(),
                code: Some("provider_error".into()),
                provider_status: *provider_status,
                provider_error: provider_error.clone(),
                ..Default::default()
            },
            ApiError::Timeout => ErrorBody {
                error: "Tempo de resposta do provedor excedido".into(),
                code: Some("provider_timeout".into()),
                ..Default::default()
            },
            ApiError::Internal => ErrorBody {
                error: "Erro interno do servidor".into(),
                code: Some("internal_error".into()),
                ..Default::default()
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = ?self, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::NotConfigured => ApiError::NotConfigured,
            RelayError::Timeout(_) => ApiError::Timeout,
            RelayError::Provider(ProviderError::Status { status, body }) => {
                ApiError::ProviderFailure {
                    provider_status: Some(status),
                    provider_error: Some(body),
                }
            }
            RelayError::Provider(ProviderError::Transport(e)) => ApiError::ProviderFailure {
                provider_status: None,
                provider_error: Some(Value::String(e.to_string())),
            },
            RelayError::Provider(ProviderError::Decode(message)) => ApiError::ProviderFailure {
                provider_status: None,
                provider_error: Some(Value::String(message)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingField { field: "messages" }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Timeout.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            ApiError::NotConfigured.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_nested_field_uses_parent_message() {
        let body = ApiError::MissingField {
            field: "expertContext.specialty",
        }
        .body();
        assert_eq!(body.error, "Contexto do especialista inválido");
        assert_eq!(body.param.as_deref(), Some("expertContext.specialty"));
        assert_eq!(body.code.as_deref(), Some("missing_field"));
    }

    #[test]
    fn test_provider_status_is_relayed() {
        let err = ApiError::from(RelayError::Provider(ProviderError::Status {
            status: 401,
            body: json!({"error": {"message": "Invalid API Key"}}),
        }));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);

        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["providerStatus"], 401);
        assert_eq!(body["providerError"]["error"]["message"], "Invalid API Key");
    }

    #[test]
    fn test_decode_failure_has_no_provider_status() {
        let body = ApiError::from(RelayError::Provider(ProviderError::Decode("eof".into()))).body();
        assert_eq!(body.provider_status, None);
        assert_eq!(body.provider_error, Some(json!("eof")));
    }
}
