use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkidError {
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SkidError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SkidError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Configuration errors are raised at startup and never retried.
    pub fn is_fatal(&self) -> bool {
        match self {
            SkidError::InvalidConfig { .. } => true,
            SkidError::Json(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SkidError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = SkidError::invalid("max_skid_intensity", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: max_skid_intensity must be greater than zero"
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: SkidError = parse.unwrap_err().into();
        assert!(matches!(err, SkidError::Json(_)));
        assert!(!err.is_fatal());
    }
}
