use std::io;

use pipen_filters::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::UnknownLoader { loader: "None".to_string() };
    assert_eq!(err.to_string(), "Unknown loader: None.");

    let err = Error::NoMatchError { pattern: "/data/*.txt".to_string() };
    assert_eq!(err.to_string(), "No paths matched pattern '/data/*.txt'.");
}

#[test]
fn test_into_template_error() {
    let err: minijinja::Error = Error::NotASymlinkError { path: "/a/b".to_string() }.into();

    assert_eq!(err.kind(), minijinja::ErrorKind::InvalidOperation);
    let source = std::error::Error::source(&err).and_then(|source| source.downcast_ref::<Error>());
    assert!(matches!(source, Some(Error::NotASymlinkError { path }) if path == "/a/b"));
}

#[test]
fn test_template_error_passes_through() {
    let inner = minijinja::Error::new(minijinja::ErrorKind::UndefinedError, "missing");
    let err: minijinja::Error = Error::MinijinjaError(inner).into();

    assert_eq!(err.kind(), minijinja::ErrorKind::UndefinedError);
}
