//! Scoped process environment variables for tests.
//!
//! [`EnvVarGuard`] sets or removes any number of variables and restores all
//! of them, in reverse order, when dropped. Tests using it must run
//! serially because the process environment is shared.

#[derive(Debug, Default)]
pub struct EnvVarGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvVarGuard {
    /// Guard that starts with no variables changed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value` until the guard is dropped.
    #[must_use]
    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.save(key);
        set_env_var(key, value);
        self
    }

    /// Remove `key` until the guard is dropped.
    #[must_use]
    pub fn remove(mut self, key: &str) -> Self {
        self.save(key);
        remove_env_var(key);
        self
    }

    /// Remove every variable whose name starts with `prefix`.
    #[must_use]
    pub fn clear_prefixed(mut self, prefix: &str) -> Self {
        let keys: Vec<String> = std::env::vars()
            .map(|(k, _)| k)
            .filter(|k| k.starts_with(prefix))
            .collect();
        for key in keys {
            self = self.remove(&key);
        }
        self
    }

    fn save(&mut self, key: &str) {
        self.saved.push((key.to_owned(), std::env::var(key).ok()));
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        while let Some((key, original)) = self.saved.pop() {
            match original {
                Some(v) => set_env_var(&key, &v),
                None => remove_env_var(&key),
            }
        }
    }
}

/// SAFETY: Must only be called from serial test contexts.
fn set_env_var(key: &str, value: &str) {
    unsafe { std::env::set_var(key, value) };
}

/// SAFETY: Must only be called from serial test contexts.
fn remove_env_var(key: &str) {
    unsafe { std::env::remove_var(key) };
}
