use thiserror::Error;

/// Errors surfaced at the crate boundary.
///
/// Both core variants are caller contract violations; nothing in the crate
/// retries or recovers from them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid time {t}: simulation time must be finite and >= 0")]
    InvalidTime { t: f64 },

    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Rejects negative and non-finite times.
#[inline]
pub(crate) fn check_time(t: f64) -> Result<()> {
    if t.is_finite() && t >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidTime { t })
    }
}
