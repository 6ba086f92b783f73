use thiserror::Error;

/// Failure talking to one of the external services.
///
/// Every variant names the service so a log line is enough to tell which
/// collaborator misbehaved.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The service answered with an unexpected status
    #[error("{service} request failed: {status} - {body}")]
    Http {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The request never got a response
    #[error("{service} request could not be completed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not what the service documents
    #[error("{service} returned an unexpected response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    /// A URL, token or id needed for this call is not configured
    #[error("{setting} is not configured")]
    MissingSetting { setting: &'static str },
}

impl SourceError {
    pub fn http(service: &'static str, status: u16, body: impl Into<String>) -> Self {
        SourceError::Http {
            service,
            status,
            body: body.into(),
        }
    }

    pub fn decode(service: &'static str, message: impl Into<String>) -> Self {
        SourceError::Decode {
            service,
            message: message.into(),
        }
    }

    /// HTTP status, when the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Http { status, .. } => Some(*status),
            SourceError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_missing_setting(&self) -> bool {
        matches!(self, SourceError::MissingSetting { .. })
    }
}
