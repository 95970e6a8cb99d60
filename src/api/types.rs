use serde::Serialize;

/// Envelope wrapped around every JSON body. `code` mirrors the HTTP status.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success with `data: null`.
    pub fn ok() -> Self {
        Self {
            code: 200,
            message: "ok".to_string(),
            data: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: i32,
}
