use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use crate::Error;
use crate::text::{self, NotFoundMessage};
use super::pages;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure of a page handler
#[derive(Debug)]
pub enum AppError {
    NotFound(NotFoundMessage),
    Internal(Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::NotFound(message) => message.title.to_string(),
            AppError::Internal(e) => e.to_string(),
        }
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        if e.is_not_found() {
            AppError::NotFound(text::PAGE_NOT_FOUND)
        } else {
            AppError::Internal(e)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::NotFound(message) => pages::not_found_page(*message),
            AppError::Internal(e) => {
                tracing::error!("Request failed: {}", e);
                pages::error_page()
            }
        };
        match body {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                (status, self.message()).into_response()
            }
        }
    }
}

/// Failure of a JSON endpoint; same statuses as pages, `{ "error": ... }` body
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        ApiError(e)
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(AppError::from(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let AppError::Internal(e) = &self.0 {
            tracing::error!("API request failed: {}", e);
        }
        let status = self.0.status();
        (status, Json(ErrorResponse { error: self.0.message() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_errors_map_to_404() {
        let e = AppError::from(Error::NotFound("narrator".to_string()));
        assert_eq!(e.status(), StatusCode::NOT_FOUND);

        let e = AppError::from(Error::Schema("bad".to_string()));
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_error_body() {
        let response = ApiError(AppError::NotFound(text::HADITH_NOT_FOUND)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
