use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("The request is invalid: {field} {message}")]
    InvalidRequest { field: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl RenderError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field name carried by an `InvalidRequest`, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidRequest { field, .. } => Some(field),
            Self::Storage(_) => None,
        }
    }

    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. })
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

impl<T> From<std::sync::PoisonError<T>> for RenderError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Storage(err.to_string())
    }
}
