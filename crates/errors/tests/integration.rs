//! Integration tests for error types

#[cfg(test)]
mod tests {
    use pace_errors::*;

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::InvalidValue {
            field: "window_capacity".into(),
            value: "1".into(),
        };
        let err: Error = config_err.into();
        assert!(matches!(err, Error::Config(_)));

        let err: Error = SessionError::EmptyActivity.into();
        assert!(matches!(err, Error::Session(SessionError::EmptyActivity)));
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::NotFound {
            path: "/etc/pace.toml".into(),
        };
        assert_eq!(err.to_string(), "config file not found: /etc/pace.toml");

        let err: Error = SessionError::AlreadyCompleted {
            activity: "Copy files".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "session error: progress session already completed: Copy files"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::BrokenPipe,
                path: None,
                ..
            }
        ));
        assert_eq!(err.user_code(), Some("error.io"));
    }

    #[test]
    fn test_user_facing_delegates_to_domain() {
        let err: Error = ConfigError::ParseError {
            message: "expected `=`".into(),
        }
        .into();
        assert_eq!(err.user_message(), "parse error: expected `=`");
        assert_eq!(err.user_code(), Some("config.parse"));
        assert!(err.user_hint().is_some());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_env_hint_differs_from_file_hint() {
        let env_err = ConfigError::InvalidValue {
            field: "PACE_WINDOW_CAPACITY".into(),
            value: "many".into(),
        };
        let file_err = ConfigError::InvalidValue {
            field: "window_capacity".into(),
            value: "1".into(),
        };
        assert_ne!(env_err.user_hint(), file_err.user_hint());
    }

    #[test]
    fn test_io_with_path_message() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io_with_path(&io_err, "/tmp/input.txt");
        assert_eq!(err.user_message(), "missing: /tmp/input.txt");
    }
}
