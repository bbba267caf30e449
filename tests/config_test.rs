use later_store::config::{Config, Endpoint};
use later_store::keys::KeyPolicy;

const VARS: [&str; 7] = [
    "LATER_KEYSPACE",
    "REDIS_HOST",
    "REDIS_PORT",
    "REDIS_SOCKET",
    "REDIS_URL",
    "LATER_KEY_POLICY",
    "LATER_POLL_INTERVAL_MS",
];

fn clear_env() {
    for var in VARS {
        unsafe {
            std::env::remove_var(var);
        }
    }
}

// Environment variables are process-global, so every env scenario runs in
// this one test to keep them from racing each other.
#[test]
fn config_from_env() {
    clear_env();

    // Nothing set: defaults
    let config = Config::from_env().unwrap();
    assert_eq!(config.keyspace, "");
    assert_eq!(config.key_policy, KeyPolicy::ContentAddressed);
    assert!(matches!(config.endpoint(), Endpoint::Default));
    assert!(!config.log_level.is_empty());

    // Socket and URL both set: socket wins
    unsafe {
        std::env::set_var("LATER_KEYSPACE", "jobs:");
        std::env::set_var("REDIS_SOCKET", "/var/run/redis.sock");
        std::env::set_var("REDIS_URL", "redis://cache:6379/2");
        std::env::set_var("LATER_KEY_POLICY", "salted");
        std::env::set_var("LATER_POLL_INTERVAL_MS", "250");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(config.keyspace, "jobs:");
    assert_eq!(config.key_policy, KeyPolicy::Salted);
    assert_eq!(config.poll_interval().as_millis(), 250);
    assert!(matches!(config.endpoint(), Endpoint::Unix(_)));

    // Host set: host wins, port defaults
    unsafe {
        std::env::set_var("REDIS_HOST", "redis.internal");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(
        config.endpoint().connection_url(),
        "redis://redis.internal:6379/"
    );

    // Malformed port fails fast
    unsafe {
        std::env::set_var("REDIS_PORT", "not-a-port");
    }
    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("REDIS_PORT"), "got: {err}");

    // Last: load() may import a local .env into the process environment
    clear_env();
    assert!(Config::load().is_ok());
}

#[test]
fn config_from_toml_file() {
    let path = std::env::temp_dir().join(format!("later-{}.toml", uuid::Uuid::new_v4()));
    std::fs::write(
        &path,
        r#"
keyspace = "jobs:"
port = 6380
key_policy = "salted"
"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.keyspace, "jobs:");
    assert_eq!(config.key_policy, KeyPolicy::Salted);
    assert_eq!(config.poll_interval_ms, 1000);
    assert_eq!(config.endpoint().connection_url(), "redis://127.0.0.1:6380/");
}

#[test]
fn config_from_missing_file_is_a_config_error() {
    let err = Config::from_file("/nonexistent/later.toml").unwrap_err();
    assert!(matches!(err, later_store::Error::Config(_)));
}
