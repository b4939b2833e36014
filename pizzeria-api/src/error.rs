use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pizzeria_order::OrderError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    SchemaRejection(String),
    NotFoundError(String),
    ConflictError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::SchemaRejection(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::Validation(_) | OrderError::IllegalTransition { .. } => {
                Self::ValidationError(message)
            }
            OrderError::SchemaRejection(_) => Self::SchemaRejection(message),
            OrderError::StockConflict(_) => Self::ConflictError(message),
            OrderError::OrderNotFound(_) | OrderError::IngredientNotFound(_) => {
                Self::NotFoundError(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizzeria_order::OrderStatus;

    fn status_of(err: OrderError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn test_order_errors_map_to_http_status() {
        assert_eq!(status_of(OrderError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(OrderError::SchemaRejection("x".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(OrderError::StockConflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(status_of(OrderError::OrderNotFound(3)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(OrderError::IngredientNotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(OrderError::IllegalTransition {
                action: "start",
                current: OrderStatus::Delivered,
                required: OrderStatus::Pending,
            }),
            StatusCode::BAD_REQUEST
        );
    }
}
