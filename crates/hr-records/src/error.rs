use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

/// Failures that stop the process before or while serving.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("cannot prepare upload directory {}: {source}", path.display())]
    UploadRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_root_failures_name_the_directory() {
        let error = AppError::UploadRoot {
            path: PathBuf::from("/srv/hr/uploads"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            error.to_string(),
            "cannot prepare upload directory /srv/hr/uploads: denied"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn config_errors_convert() {
        let error: AppError = ConfigError::InvalidPort.into();
        assert!(matches!(error, AppError::Config(ConfigError::InvalidPort)));
    }
}
