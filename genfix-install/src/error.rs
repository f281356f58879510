use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("staged output not found: {0}")]
    SourceMissing(Utf8PathBuf),

    #[error("invalid staging name `{0}`: must be a single path component")]
    InvalidStagingName(String),

    #[error("destination has no file name: {0}")]
    InvalidDestination(Utf8PathBuf),

    #[error("invalid exclude pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("non-UTF-8 path under {0}")]
    NonUtf8Path(Utf8PathBuf),

    #[error("walk {path}: {source}")]
    Walk {
        path: Utf8PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type InstallResult<T> = Result<T, InstallError>;
