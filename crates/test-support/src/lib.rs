use std::sync::{Mutex, MutexGuard, OnceLock};

use tempfile::TempDir;

/// Serializes tests that touch process-wide state such as env vars.
pub fn test_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Sets (`Some`) or clears (`None`) env vars for the lifetime of the guard
/// and restores the previous values on drop.
pub struct TestEnvGuard {
    _lock: MutexGuard<'static, ()>,
    previous: Vec<(String, Option<String>)>,
}

impl TestEnvGuard {
    pub fn new(vars: &[(&str, Option<&str>)]) -> Self {
        let lock = test_lock().lock().unwrap_or_else(|err| err.into_inner());
        let previous = vars
            .iter()
            .map(|(name, _)| (name.to_string(), std::env::var(name).ok()))
            .collect();

        // SAFETY: tests using TestEnvGuard are serialized by test_lock.
        unsafe {
            for (name, value) in vars {
                match value {
                    Some(value) => std::env::set_var(name, value),
                    None => std::env::remove_var(name),
                }
            }
        }

        Self {
            _lock: lock,
            previous,
        }
    }
}

impl Drop for TestEnvGuard {
    fn drop(&mut self) {
        // SAFETY: tests using TestEnvGuard are serialized by test_lock.
        unsafe {
            for (name, value) in &self.previous {
                match value {
                    Some(value) => std::env::set_var(name, value),
                    None => std::env::remove_var(name),
                }
            }
        }
    }
}

/// Temporary directory holding a file-backed SQLite database.
pub struct TempDatabase {
    dir: TempDir,
}

impl TempDatabase {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::Builder::new().prefix("task-items-test").tempdir()?,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "sqlite://{}?mode=rwc",
            self.dir.path().join("db.sqlite").to_string_lossy()
        )
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_guard_restores_previous_values() {
        const NAME: &str = "TEST_SUPPORT_GUARD_PROBE";
        {
            let _guard = TestEnvGuard::new(&[(NAME, Some("inside"))]);
            assert_eq!(std::env::var(NAME).as_deref(), Ok("inside"));
        }
        assert!(std::env::var(NAME).is_err());
    }

    #[test]
    fn temp_database_url_points_inside_temp_dir() {
        let db = TempDatabase::new().unwrap();

        assert!(db.url().starts_with("sqlite://"));
        assert!(db.url().contains(&*db.path().to_string_lossy()));
    }
}
