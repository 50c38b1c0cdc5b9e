use session_fetch::telemetry::{
    LOG_FORMAT_ENV, LOG_LEVEL_ENV, OutputFormat, SubscriberConfig, init_from_env, init_subscriber,
    init_tracing,
};

struct EnvGuard {
    key: &'static str,
    previous: Option<String>,
}

impl EnvGuard {
    fn set(key: &'static str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        unsafe {
            std::env::set_var(key, value);
        }
        Self { key, previous }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

// One test per binary keeps the global subscriber and the env vars free of races.
#[test]
fn subscriber_installation_is_idempotent_and_env_driven() {
    {
        let _level = EnvGuard::set(LOG_LEVEL_ENV, "debug");
        let _format = EnvGuard::set(LOG_FORMAT_ENV, "yaml");
        let err = init_from_env().unwrap_err();
        assert!(err.message().contains("Invalid log format"));
    }
    {
        let _level = EnvGuard::set(LOG_LEVEL_ENV, "chatty");
        assert!(init_from_env().is_err());
    }

    let _level = EnvGuard::set(LOG_LEVEL_ENV, "debug");
    let _format = EnvGuard::set(LOG_FORMAT_ENV, "json");
    assert!(init_from_env().is_ok());
    assert!(tracing::dispatcher::has_been_set());

    let config = SubscriberConfig {
        log_level: tracing::Level::DEBUG,
        output_format: OutputFormat::Text,
    };
    assert!(init_subscriber(config).is_ok());
    assert!(init_tracing("session_fetch=trace").is_ok());
    assert!(init_tracing("session_fetch=loud").is_err());
}
