use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    MissingEnv { var: &'static str },
    InvalidBaseUrl { input: String },
    InvalidSendAt { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::MissingEnv { var } => {
                write!(f, "environment variable {var} is not set")
            }
            Self::InvalidBaseUrl { input } => {
                write!(f, "invalid base URL (expected http or https): {input}")
            }
            Self::InvalidSendAt { input } => {
                write!(f, "invalid send_at (expected YYYY-MM-DD HH:MM:SS): {input}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
