use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No profile is flagged active.
    #[error("no active profile")]
    NotFound,

    /// The active profile does not allow printing.
    #[error("printing is disabled for the active profile")]
    Forbidden,

    /// A single image could not be read or decoded. Recovered by the layout
    /// engine, never returned from document generation.
    #[error("asset {name} is unreadable: {reason}")]
    AssetUnreadable { name: String, reason: String },

    #[error("store error: {0}")]
    Store(String),

    #[error("invalid store file {path}: {source}")]
    StoreFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP-equivalent status for callers that serve the document.
    pub fn status(&self) -> u16 {
        match self {
            Error::NotFound => 404,
            Error::Forbidden => 403,
            _ => 500,
        }
    }

    /// True for the two conditions that abort generation by design.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Error::NotFound | Error::Forbidden)
    }
}
