use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("I/O error while {operation}: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("terminal error while {operation}: {source}")]
    Terminal {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("no password database entry for uid {uid}")]
    UnknownUser { uid: u32 },

    #[error("user lookup failed for uid {uid}: {source}")]
    UserLookup {
        uid: u32,
        #[source]
        source: std::io::Error,
    },
}

impl ProbeError {
    #[must_use]
    pub fn io(operation: &'static str, source: std::io::Error) -> Self {
        Self::Io { operation, source }
    }

    #[must_use]
    pub fn terminal(operation: &'static str, source: std::io::Error) -> Self {
        Self::Terminal { operation, source }
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
