//! Tracing subscriber setup.

use crate::error::{DatasetError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global `fmt` subscriber filtered by `level`.
///
/// `level` accepts any `EnvFilter` directive (`"info"`, `"gindata=debug"`).
/// When `RUST_LOG` is set it takes precedence over `level`.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| DatasetError::InvalidArgument(format!("Invalid log level: {e}")))?,
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|_| DatasetError::InvalidArgument("Logging already initialized".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_directive() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = init_logging("gindata=notalevel").unwrap_err();
        assert!(matches!(err, DatasetError::InvalidArgument(_)));
    }
}
