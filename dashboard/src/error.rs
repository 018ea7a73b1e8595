use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("No chain provider available")]
    ProviderUnavailable,

    #[error("A wallet connection is already in progress")]
    ConnectInProgress,

    #[error("Provider returned no accounts")]
    NoAccounts,

    #[error("No wallet connected")]
    NotConnected,

    #[error("Wallet connection was cancelled")]
    ConnectCancelled,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("ETH price not available yet")]
    PriceUnavailable,
}

/// The two failure classes the dashboard distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required external capability is missing. Terminal for the attempted action.
    Unavailable,
    /// A network or provider call failed. The next attempt may succeed.
    Transient,
}

impl DashboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DashboardError::ProviderUnavailable => ErrorKind::Unavailable,
            _ => ErrorKind::Transient,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
