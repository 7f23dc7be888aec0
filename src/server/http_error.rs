//! HTTP status mapping and response bodies.
//!
//! Every failure leaves the handler as an [`HttpError`] carrying the format
//! negotiated for the request, so error bodies use the same encoding as a
//! successful response would have.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::TodoManagerError;
use crate::view::{Document, Format};

/// HTTP status for each error kind
pub fn status_code(error: &TodoManagerError) -> StatusCode {
    match error {
        TodoManagerError::Validation(_) => StatusCode::BAD_REQUEST,
        TodoManagerError::EntityNotFound { .. }
        | TodoManagerError::RelationNotFound { .. }
        | TodoManagerError::UnknownRoute(_) => StatusCode::NOT_FOUND,
        TodoManagerError::UnsupportedFormat(_) => StatusCode::NOT_ACCEPTABLE,
        TodoManagerError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        TodoManagerError::Config(_)
        | TodoManagerError::Io(_)
        | TodoManagerError::Json(_)
        | TodoManagerError::Yaml(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug)]
pub struct HttpError {
    pub error: TodoManagerError,
    pub format: Format,
}

impl HttpError {
    pub fn new(error: TodoManagerError, format: Format) -> Self {
        Self { error, format }
    }

    /// Adapter for `map_err` once the response format is known
    pub fn in_format(format: Format) -> impl Fn(TodoManagerError) -> HttpError {
        move |error| HttpError::new(error, format)
    }

    pub fn status(&self) -> StatusCode {
        status_code(&self.error)
    }
}

impl From<TodoManagerError> for HttpError {
    fn from(error: TodoManagerError) -> Self {
        HttpError::new(error, Format::default())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.error, "request failed");
        } else {
            tracing::debug!(error = %self.error, status = status.as_u16(), "request rejected");
        }

        Reply::new(status, self.format, Some(Document::error(self.error.to_string()))).into_response()
    }
}

/// A successful (or deliberately shaped) response
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub format: Format,
    pub document: Option<Document>,
}

impl Reply {
    pub fn new(status: StatusCode, format: Format, document: Option<Document>) -> Self {
        Self {
            status,
            format,
            document,
        }
    }

    pub fn ok(format: Format, document: Document) -> Self {
        Self::new(StatusCode::OK, format, Some(document))
    }

    pub fn created(format: Format, document: Option<Document>) -> Self {
        Self::new(StatusCode::CREATED, format, document)
    }

    /// Status line and headers only
    pub fn empty(status: StatusCode, format: Format) -> Self {
        Self::new(status, format, None)
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let content_type = [(header::CONTENT_TYPE, self.format.content_type())];
        match self.document {
            Some(document) => {
                (self.status, content_type, document.encode(self.format)).into_response()
            }
            None => (self.status, content_type).into_response(),
        }
    }
}
