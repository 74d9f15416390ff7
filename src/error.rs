use axum::{
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
    body::Bytes,
    extract::{
        FromRequest,
        FromRequestParts,
        Query,
        Request,
    },
    Json,
};
use log::debug;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::error::Category;
use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    error::Error,
    collections::BTreeMap
};
use validator::ValidationErrors;
use crate::dto::ErrorRouting;

#[derive(Debug, PartialEq)]
pub enum ErrorMessage {
    InvalidJson,
    InvalidFieldType,
    FieldsRequired,
    InvalidEmail,
    LinksNotAllowed,
    MovieIdRequired,
    InvalidRequestMethod,
    SaveCommentFailed,
    RetrieveCommentsFailed,
}
#[derive(Serialize)]
pub struct ErrorResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<T>,
}
#[derive(Debug)]
pub struct HttpError<T> {
    pub status: StatusCode,
    pub message: String,
    pub error: Option<T>,
}
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub messages: Vec<String>,
}
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    ValidationErrors(Vec<FieldError>),
    Message(String),
}

impl ErrorMessage {
    fn get_message(&self) -> &'static str {
        match self {
            ErrorMessage::InvalidJson => "Invalid JSON in request body",
            ErrorMessage::InvalidFieldType => "All fields must be text",
            ErrorMessage::FieldsRequired => "All fields are required",
            ErrorMessage::InvalidEmail => "Invalid email address",
            ErrorMessage::LinksNotAllowed => "Links are not allowed in comments",
            ErrorMessage::MovieIdRequired => "Movie ID is required",
            ErrorMessage::InvalidRequestMethod => "Invalid request method",
            ErrorMessage::SaveCommentFailed => "Error saving comment",
            ErrorMessage::RetrieveCommentsFailed => "Error retrieving comments",
        }
    }
}

impl Display for ErrorMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.get_message())
    }
}

impl<T> HttpError<T> where T: Serialize {
    pub fn server_error(message: impl Into<String>, error: Option<T>) -> Self {
        HttpError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            error,
        }
    }
    pub fn bad_request(message: impl Into<String>, error: Option<T>) -> Self {
        HttpError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            error,
        }
    }
    pub fn not_found(message: impl Into<String>, error: Option<T>) -> Self {
        HttpError {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            error,
        }
    }
    pub fn method_not_allowed(message: impl Into<String>, error: Option<T>) -> Self {
        HttpError {
            status: StatusCode::METHOD_NOT_ALLOWED,
            message: message.into(),
            error,
        }
    }
}

impl<T> Display for HttpError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "HttpError: message: {}, status: {}",
            self.message, self.status
        )
    }
}

impl<T> Error for HttpError<T> where T: Debug {}

impl<T> IntoResponse for HttpError<T> where T: Serialize + Debug {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            success: false,
            message: self.message,
            error: self.error,
        });
        (self.status, body).into_response()
    }
}

impl FieldError {
    pub fn collect_errors(errors: ValidationErrors) -> Vec<Self> {
        let mut error_map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, messages) in errors.field_errors() {
            let entry = error_map.entry(field.to_string()).or_default();
            for message in messages {
                let msg = message
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| message.code.to_string());
                entry.push(msg);
            }
        }
        error_map
            .into_iter()
            .map(|(field, messages)| FieldError { field, messages })
            .collect()
    }
    pub fn populate_errors(message: ErrorMessage, err: ValidationErrors) -> HttpError<ErrorPayload> {
        let errors = FieldError::collect_errors(err);
        HttpError::bad_request(message.to_string(), Some(ErrorPayload::ValidationErrors(errors)))
    }
}

/// JSON body extractor that ignores the `Content-Type` header and answers
/// malformed bodies with a 400 in the service's error shape.
pub struct BodyParser<T>(pub T);
impl<S, T> FromRequest<S> for BodyParser<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorRouting>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await
            .map_err(|rejection| (rejection.status(), ErrorRouting::new(rejection.body_text())))?;
        serde_json::from_slice::<T>(&bytes)
            .map(Self)
            .map_err(|e| {
                debug!("Rejected request body: {}", e);
                let message = match e.classify() {
                    Category::Data => ErrorMessage::InvalidFieldType,
                    Category::Syntax | Category::Eof | Category::Io => ErrorMessage::InvalidJson,
                };
                (StatusCode::BAD_REQUEST, ErrorRouting::new(message.to_string()))
            })
    }
}

pub struct QueryParser<T>(pub T);
impl<S, T> FromRequestParts<S> for QueryParser<T>
where
    T: DeserializeOwned + Send + Sync,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorRouting>);
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(query) => Ok(Self(query.0)),
            Err(rejection) => Err((StatusCode::BAD_REQUEST, ErrorRouting::new(rejection.body_text()))),
        }
    }
}
