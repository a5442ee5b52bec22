//! Environment file validation tests

use botops::config::env_file::{validate, REQUIRED_KEYS};
use botops::errors::OpsError;

#[tokio::test]
async fn test_missing_file_is_config_missing() {
    let tmp = tempfile::tempdir().unwrap();
    let result = validate(&tmp.path().join("nope.env")).await;
    assert!(matches!(result, Err(OpsError::ConfigMissing(_))));
}

#[tokio::test]
async fn test_valid_file_returns_mapping() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(".env");
    std::fs::write(
        &path,
        "# secrets\nTELEGRAM_BOT_TOKEN=tg-token\nOPENAI_API_KEY=\"sk-test\"\nEXTRA=1\n",
    )
    .unwrap();

    let config = validate(&path).await.unwrap();
    assert_eq!(config.get("TELEGRAM_BOT_TOKEN"), Some("tg-token"));
    assert_eq!(config.get("OPENAI_API_KEY"), Some("sk-test"));
    assert_eq!(config.get("EXTRA"), Some("1"));
}

#[tokio::test]
async fn test_absent_required_key_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(".env");
    std::fs::write(&path, "TELEGRAM_BOT_TOKEN=tg-token\n").unwrap();

    match validate(&path).await {
        Err(OpsError::ConfigIncomplete(key)) => assert_eq!(key, "OPENAI_API_KEY"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_empty_required_key_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(".env");
    std::fs::write(&path, "TELEGRAM_BOT_TOKEN=   \nOPENAI_API_KEY=sk\n").unwrap();

    match validate(&path).await {
        Err(OpsError::ConfigIncomplete(key)) => assert_eq!(key, "TELEGRAM_BOT_TOKEN"),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_required_keys_checked_in_declared_order() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(".env");
    std::fs::write(&path, "UNRELATED=x\n").unwrap();

    // Both required keys are missing; the first declared one is reported
    match validate(&path).await {
        Err(OpsError::ConfigIncomplete(key)) => assert_eq!(key, REQUIRED_KEYS[0]),
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}
