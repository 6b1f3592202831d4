use thiserror::Error;

pub type Result<T> = std::result::Result<T, WebDavError>;

/// Errors surfaced by the WebDAV transport and filesystem view
#[derive(Error, Debug)]
pub enum WebDavError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Status outside the accepted set. The response body is kept so callers
    /// can still inspect what the server sent.
    #[error("HTTP {code}: {message}")]
    Status {
        code: u16,
        message: String,
        body: String,
    },

    #[error("No such directory: {url}")]
    NoSuchDirectory { url: String },

    #[error("XML parsing error: {0}")]
    Xml(String),

    #[error("Invalid HTTP method '{method}'")]
    InvalidMethod { method: String },

    #[error("Invalid WebDAV configuration: {details}")]
    InvalidConfig { details: String },

    #[error("Failed to start blocking runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl WebDavError {
    pub fn invalid_config<S: Into<String>>(details: S) -> Self {
        Self::InvalidConfig { details: details.into() }
    }

    pub fn no_such_directory<S: Into<String>>(url: S) -> Self {
        Self::NoSuchDirectory { url: url.into() }
    }

    /// HTTP status code for status failures, `None` for everything else
    pub fn http_status(&self) -> Option<u16> {
        match self {
            WebDavError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WebDavError::NoSuchDirectory { .. }) || self.http_status() == Some(404)
    }
}

impl From<quick_xml::Error> for WebDavError {
    fn from(e: quick_xml::Error) -> Self {
        WebDavError::Xml(e.to_string())
    }
}
