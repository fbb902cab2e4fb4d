//! Loading desk configuration from disk

use std::io::Write;

use lab_confirm::GatePolicy;
use lab_desk::{ConfigError, Desk, DeskConfig};
use tempfile::NamedTempFile;

#[test]
fn loads_toml_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "page_size = 25").unwrap();
    writeln!(file, "gate_policy = \"reject\"").unwrap();
    writeln!(file, "log_filter = \"lab_desk=debug\"").unwrap();

    let config = DeskConfig::load(file.path()).unwrap();
    assert_eq!(config.page_size, 25);
    assert_eq!(config.gate_policy, GatePolicy::Reject);
    assert_eq!(config.history_limit, DeskConfig::default().history_limit);

    let desk = Desk::new(config).unwrap();
    assert_eq!(desk.gate().policy(), GatePolicy::Reject);
    assert_eq!(desk.view_state().unwrap().page_size().get(), 25);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = DeskConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "page_size = \"ten\"").unwrap();
    assert!(matches!(DeskConfig::load(file.path()), Err(ConfigError::Parse(_))));
}
