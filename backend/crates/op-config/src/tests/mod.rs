
use std::env;

/// Every variable the supervisor reads; cleared so tests see only what they set
const CONFIG_VARS: &[&str] = &[
    "SERVER_PROGRAM",
    "APP_MODULE",
    "HOST",
    "PORT",
    "UVICORN_LOOP",
    "UVICORN_HTTP",
    "UVICORN_WORKERS",
    "TOKEN_MANAGER_CMD",
    "TOKEN_WAIT_TIMEOUT",
    "TOKEN_MANAGER_STOP_TIMEOUT",
    "READINESS_CMD",
    "OPEN115_TOKEN_DB",
    "TMPDIR",
    "LOG_LEVEL",
    "LOG_COLORED",
];

/// RAII guard for environment variables - automatically restores on drop
pub(crate) struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::set_var(key, value);
            Self { key, original }
        }
    }

    pub(crate) fn remove(key: &'static str) -> Self {
        unsafe {
            let original = env::var(key).ok();
            env::remove_var(key);
            Self { key, original }
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match &self.original {
                Some(val) => env::set_var(self.key, val),
                None => env::remove_var(self.key),
            }
        }
    }
}

/// Remove every supervisor variable for the lifetime of the returned guards
pub(crate) fn clean_env() -> Vec<EnvGuard> {
    CONFIG_VARS.iter().map(|key| EnvGuard::remove(key)).collect()
}
