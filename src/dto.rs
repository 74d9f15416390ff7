use axum::Json;
use serde::Serialize;
use crate::error::{ErrorPayload, HttpError};

#[derive(Serialize)]
pub struct SuccessResponse<'a, T> {
    pub success: bool,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}
impl<'a, T> SuccessResponse<'a, T> where T: Serialize {
    pub fn new(message: &'a str, data: Option<T>) -> Json<Self> {
        Json(Self{
            success: true,
            message,
            data,
        })
    }
}
#[derive(Serialize)]
pub struct ErrorRouting {
    pub success: bool,
    pub message: String,
}
impl ErrorRouting {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            message: message.into(),
        })
    }
}

pub type HttpResult<T> = Result<T, HttpError<ErrorPayload>>;
