use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::error::{ErrorKind, LeaveError};

impl ResponseError for LeaveError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidTransition => StatusCode::CONFLICT,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::BalanceExceeded => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });

        match self {
            LeaveError::Storage { source } => {
                tracing::error!(error = %source, "leave store failure");
                // Storage details stay in the log.
                body["message"] = json!("Internal Server Error");
            }
            LeaveError::BalanceExceeded {
                leave_type,
                requested,
                available,
            } => {
                body["leaveType"] = json!(leave_type);
                body["requested"] = json!(requested);
                body["available"] = json!(available);
            }
            LeaveError::Authorization { action, .. } => {
                body["action"] = json!(action);
            }
            _ => {}
        }
        if let Some(field) = self.field() {
            body["field"] = json!(field);
        }
        if let Some(request_id) = self.request_id() {
            body["requestId"] = json!(request_id);
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}
