use std::fmt;

use harvester_core::BookAddress;

use crate::persist::PersistError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Why a book, a catalog page or a single chapter could not be harvested.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("fetching {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("could not parse {url}: {message}")]
    Parse { url: String, message: String },
    #[error("{url} has no title")]
    EmptyTitle { url: String },
    #[error("chapter {reference} of {url} skipped: {message}")]
    Chapter {
        url: String,
        reference: String,
        message: String,
    },
    #[error("could not serialize feed for {url}: {message}")]
    Serialize { url: String, message: String },
    #[error("could not write feed: {0}")]
    Persist(#[from] PersistError),
}

impl HarvestError {
    pub(crate) fn fetch(url: &str, source: FetchError) -> Self {
        HarvestError::Fetch {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn parse(url: &str, message: impl Into<String>) -> Self {
        HarvestError::Parse {
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// HTTP status behind a fetch failure, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            HarvestError::Fetch {
                source:
                    FetchError {
                        kind: FailureKind::HttpStatus(code),
                        ..
                    },
                ..
            } => Some(*code),
            _ => None,
        }
    }
}

/// Listing stopped early; `collected` holds every address found before `page`.
#[derive(Debug, thiserror::Error)]
#[error("catalog listing stopped at page {page} after {} addresses: {source}", .collected.len())]
pub struct ListingError {
    pub page: u32,
    pub collected: Vec<BookAddress>,
    #[source]
    pub source: HarvestError,
}
