use k6forge::{ForgeError, Result, ValidationError};

#[test]
fn test_validation_error_message() {
    let err = ValidationError::new(vec![
        "Step 1: URL is required".to_string(),
        "Step 2: HTTP method is required".to_string(),
    ]);
    assert_eq!(
        err.to_string(),
        "Step 1: URL is required; Step 2: HTTP method is required"
    );

    let forge_err: ForgeError = err.into();
    assert_eq!(
        forge_err.to_string(),
        "脚本校验失败: Step 1: URL is required; Step 2: HTTP method is required"
    );
}

#[test]
fn test_invalid_url() {
    let err = ForgeError::InvalidUrl("not a url".to_string());
    assert_eq!(err.to_string(), "无效的 URL: not a url");
}

#[test]
fn test_error_conversion_from_anyhow() {
    let anyhow_err = anyhow::anyhow!("test anyhow error");
    let forge_err: ForgeError = anyhow_err.into();
    assert!(forge_err.to_string().contains("test anyhow error"));
}

#[test]
fn test_error_conversion_from_json() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let forge_err: ForgeError = json_err.into();
    assert!(matches!(forge_err, ForgeError::JsonError(_)));
}

#[test]
fn test_result_type() {
    fn returns_error() -> Result<()> {
        Err(ForgeError::Config("test".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
    match result {
        Err(ForgeError::Config(msg)) => assert_eq!(msg, "test"),
        _ => panic!("Expected Config error"),
    }
}
