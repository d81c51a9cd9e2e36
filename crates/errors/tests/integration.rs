//! Integration tests for error types

#[cfg(test)]
mod tests {
    use updatekit_errors::*;

    #[test]
    fn test_error_conversion() {
        let net_err = NetworkError::Timeout {
            url: "https://updates.example.com/version.txt".into(),
        };
        let err: Error = net_err.into();
        assert!(matches!(err, Error::Network(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_http_status_in_message() {
        let err: Error = NetworkError::HttpError {
            status: 404,
            message: "404 Not Found".into(),
        }
        .into();
        assert!(err.to_string().contains("404"));
        assert_eq!(err.user_code(), Some("network.http_error"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_invalid_format_carries_input() {
        let err: Error = VersionError::InvalidFormat {
            input: "garbage".into(),
        }
        .into();
        assert_eq!(
            err.user_message(),
            "invalid version format: garbage"
        );
    }

    #[test]
    fn test_cancelled_is_distinct() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::from(NetworkError::DownloadFailed("reset".into())).is_cancelled());
        assert_eq!(Error::Cancelled.user_code(), Some("error.cancelled"));
    }

    #[test]
    fn test_not_configured_helper() {
        let err: Error = ConfigError::UpdateServerNotConfigured.into();
        assert!(err.is_not_configured());
        assert!(err.user_hint().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let storage_err = StorageError::from_io_with_path(&io_err, std::path::Path::new("/tmp/x"));
        assert!(matches!(storage_err, StorageError::PermissionDenied { .. }));

        let err: Error = std::io::Error::other("boom").into();
        assert!(matches!(err, Error::Io { path: None, .. }));
    }
}
