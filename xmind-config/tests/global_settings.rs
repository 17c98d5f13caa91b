use std::env;

use serial_test::serial;
use xmind_config::{ConfigError, get_settings};

const SAMPLE: [(&str, &str); 8] = [
    ("APP_NAME", "xmind-api"),
    ("DEBUG", "true"),
    ("ENVIRONMENT", "dev"),
    ("MONGODB_URL", "mongodb://localhost:27017"),
    ("REDIS_HOST", "localhost"),
    ("REDIS_PORT", "6379"),
    ("API_HOST", "0.0.0.0"),
    ("API_PORT", "8000"),
];

// The global cell lives for the whole test binary, so the sequence below
// runs as a single test.
#[test]
#[serial]
fn global_settings_lifecycle() {
    unsafe {
        for (key, value) in SAMPLE {
            env::set_var(key, value);
        }
        env::set_var("API_PORT", "not-a-port");
    }

    let err = get_settings().expect_err("port is malformed");
    assert!(matches!(err, ConfigError::Validation { .. }));
    assert!(err.is_invalid("API_PORT"));

    unsafe {
        env::set_var("API_PORT", "8000");
    }

    let first = get_settings().expect("retry after fixing the environment");
    assert_eq!(first.app_name(), "xmind-api");
    assert!(first.debug());
    assert_eq!(first.environment(), "dev");
    assert_eq!(first.mongodb_url(), "mongodb://localhost:27017");
    assert_eq!(first.redis_host(), "localhost");
    assert_eq!(first.redis_port(), 6379);
    assert_eq!(first.api_host(), "0.0.0.0");
    assert_eq!(first.api_port(), 8000);

    unsafe {
        env::set_var("API_PORT", "9999");
        env::remove_var("APP_NAME");
    }

    let second = get_settings().expect("cached");
    assert!(std::ptr::eq(first, second));
    assert_eq!(second.api_port(), 8000);

    unsafe {
        for (key, _) in SAMPLE {
            env::remove_var(key);
        }
    }
}
