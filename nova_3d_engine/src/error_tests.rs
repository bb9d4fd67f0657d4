/// Tests for engine error types

use super::*;

#[test]
fn test_display_messages() {
    assert_eq!(
        Error::BackendError("context lost".to_string()).to_string(),
        "Backend error: context lost"
    );
    assert_eq!(
        Error::InvalidResource("bad mesh".to_string()).to_string(),
        "Invalid resource: bad mesh"
    );
    assert_eq!(
        Error::InitializationFailed("no driver".to_string()).to_string(),
        "Initialization failed: no driver"
    );
}

#[test]
fn test_question_mark_propagation() {
    fn inner() -> Result<()> {
        Err(Error::InvalidResource("x".to_string()))
    }
    fn outer() -> Result<u32> {
        inner()?;
        Ok(1)
    }

    assert!(matches!(outer(), Err(Error::InvalidResource(_))));
}

#[test]
fn test_error_is_std_error() {
    let error: Box<dyn std::error::Error> =
        Box::new(Error::BackendError("x".to_string()));
    assert!(error.source().is_none());
}
