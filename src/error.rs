use thiserror::Error;

/// Failures of the browser session itself.
///
/// These are the only errors allowed to abort a collection. Everything that
/// goes wrong at the page or item level is absorbed by the collection loop.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to start WebDriver session at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    #[error("WebDriver command failed while {context}: {source}")]
    Command {
        context: &'static str,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("invalid selector `{pattern}`")]
    InvalidSelector { pattern: String },

    #[error("element is no longer attached to the page")]
    StaleElement,

    #[error("failed to read snapshot {path}: {source}")]
    Snapshot {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    /// Wraps a failed WebDriver command. Stale node references get their
    /// own variant so extraction can tell a detached item from a dead session.
    pub(crate) fn command(context: &'static str, source: fantoccini::error::CmdError) -> Self {
        if source.is_stale_element_reference() {
            return Self::StaleElement;
        }
        Self::Command { context, source }
    }
}

/// Problems with a harvest configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("selector chain `{field}` is empty")]
    EmptyChain { field: &'static str },

    #[error("selector chain `{field}` contains an invalid pattern `{pattern}`")]
    InvalidSelector { field: &'static str, pattern: String },

    #[error("invalid base URL {url}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors surfaced to callers of [`crate::Harvester`].
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("invalid username `{0}`")]
    InvalidUsername(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
