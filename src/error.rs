use crate::workflow::guard::Denial;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Transition denied: {0}")]
    Denied(Denial),

    #[error("Unrecognized status: {0}")]
    UnknownStatus(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("An update for {0} is still in progress")]
    Busy(String),

    #[error("Request was abandoned because the view was closed")]
    Cancelled,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Server responded with {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse category of a failure, as the views present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any request was sent.
    Validation,
    Denied,
    UnknownState,
    Network,
    Cancelled,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Denied(_) | Error::Busy(_) => ErrorKind::Denied,
            Error::UnknownStatus(_) => ErrorKind::UnknownState,
            Error::Unauthorized(_) | Error::Api { .. } | Error::Reqwest(_) | Error::Json(_) => {
                ErrorKind::Network
            }
            Error::Cancelled => ErrorKind::Cancelled,
            Error::NotFound(_)
            | Error::Config(_)
            | Error::Url(_)
            | Error::Token(_)
            | Error::Io(_)
            | Error::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether re-issuing the same action could succeed. Nothing is retried
    /// automatically; this only decides whether a retry control is shown.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Reqwest(_) => true,
            Error::Api { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }
}

/// Inline message rendered next to the control that triggered the action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub retryable: bool,
    pub dismissible: bool,
}

impl From<&Error> for Banner {
    fn from(err: &Error) -> Self {
        let message = match err {
            Error::Validation(errors) => validation_message(errors),
            Error::Denied(denial) => denial.to_string(),
            Error::UnknownStatus(raw) => {
                format!("Unrecognized status \"{}\". Refresh to continue.", raw)
            }
            Error::Busy(_) => "Please wait for the current update to finish.".to_string(),
            Error::Unauthorized(_) => "Your session has expired. Please sign in again.".to_string(),
            Error::Api { message, .. } => message.clone(),
            Error::Reqwest(err) if err.is_timeout() => {
                "The server took too long to respond.".to_string()
            }
            Error::Reqwest(_) => "Could not reach the server.".to_string(),
            Error::Cancelled => String::new(),
            other => other.to_string(),
        };

        Self {
            message,
            retryable: err.is_retryable(),
            dismissible: !matches!(err, Error::Validation(_)),
        }
    }
}

fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let detail = errs
                .iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .next()
                .unwrap_or_else(|| errs.first().map(|e| e.code.to_string()).unwrap_or_default());
            format!("{}: {}", field, detail)
        })
        .collect();
    fields.sort();
    fields.join("; ")
}
