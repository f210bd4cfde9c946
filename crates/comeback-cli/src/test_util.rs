//! Process-environment helpers for tests that touch env vars.

use std::ffi::OsStr;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that mutate the process environment.
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Restores the previous values of the variables it touched on drop.
pub struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn set(var: &str, value: impl AsRef<OsStr>) -> Self {
        let saved = vec![(var.to_string(), std::env::var(var).ok())];
        unsafe { std::env::set_var(var, value) };
        Self { saved }
    }

    pub fn clear(vars: &[&str]) -> Self {
        let saved = vars
            .iter()
            .map(|v| (v.to_string(), std::env::var(v).ok()))
            .collect();
        for var in vars {
            unsafe { std::env::remove_var(var) };
        }
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (var, value) in self.saved.drain(..).rev() {
            match value {
                Some(v) => unsafe { std::env::set_var(&var, v) },
                None => unsafe { std::env::remove_var(&var) },
            }
        }
    }
}
