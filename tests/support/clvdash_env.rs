use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_HOME: &str = "CLVDASH_CONFIG_HOME";
const SERVICE_URL: &str = "CLVDASH_SERVICE_URL";

/// Points the app directory at a temp folder and optionally overrides the
/// service URL, restoring both on drop.
pub struct ClvdashEnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl ClvdashEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        Self::set(path, None)
    }

    pub fn set(path: PathBuf, service_url: Option<&str>) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous = vec![
            (CONFIG_HOME, std::env::var(CONFIG_HOME).ok()),
            (SERVICE_URL, std::env::var(SERVICE_URL).ok()),
        ];
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var(CONFIG_HOME, path);
            match service_url {
                Some(url) => std::env::set_var(SERVICE_URL, url),
                None => std::env::remove_var(SERVICE_URL),
            }
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for ClvdashEnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
