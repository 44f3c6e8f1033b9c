//! Global subscriber installation. Kept in its own test binary so the
//! process-wide subscriber never reaches the library's unit tests.

use lsq::logging;

#[test]
fn file_logging_under_state_home() {
    let state_home = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_STATE_HOME", state_home.path());
    std::env::remove_var("RUST_LOG");

    let path = logging::log_file_path().unwrap();
    assert_eq!(path, state_home.path().join("lsq").join("lsq.log"));
    assert!(path.parent().unwrap().is_dir());

    logging::init_logging().unwrap();
    tracing::info!("written to the state-home log file");
    assert!(path.is_file());
    let logged = std::fs::read_to_string(&path).unwrap();
    assert!(logged.contains("lsq logging initialized at"));

    // One global subscriber per process.
    assert!(logging::init_logging().is_err());
    assert!(logging::init_logging_stderr().is_err());
}
