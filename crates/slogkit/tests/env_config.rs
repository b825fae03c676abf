//! Environment-driven configuration; one test per binary since it mutates
//! the process environment and installs the global subscriber

use slogkit::{Config, Level};

#[test]
#[allow(unsafe_code)]
fn rust_log_directives_initialize() {
    // SAFETY: the only test in this binary, so no other thread reads the environment
    unsafe {
        std::env::remove_var("SLOGKIT_LEVEL");
        std::env::set_var("RUST_LOG", "info,hyper=warn");
    }

    let config = Config::from_env();
    assert_eq!(config.level, "info,hyper=warn");

    let (options, _guards) = config.into_options().unwrap();
    assert_eq!(options.level, Level::Info);

    let guard = slogkit::init().unwrap();
    tracing::info!("installed from RUST_LOG");
    drop(guard);
}
