//! Where the user currently is, and how the client moves them.

use parking_lot::RwLock;

/// Current location plus forced navigation. The gateway uses it to tell
/// whether the login view is showing and to send the user there when their
/// session expires.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;

    /// Replaces the current location.
    fn navigate(&self, path: &str);
}

/// In-process navigator that records every move.
#[derive(Debug)]
pub struct MemoryNavigator {
    state: RwLock<NavState>,
}

#[derive(Debug)]
struct NavState {
    current: String,
    history: Vec<String>,
}

impl MemoryNavigator {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(NavState {
                current: start.into(),
                history: Vec::new(),
            }),
        }
    }

    /// Paths navigated to, oldest first. The start path is not included.
    pub fn history(&self) -> Vec<String> {
        self.state.read().history.clone()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.state.read().current.clone()
    }

    fn navigate(&self, path: &str) {
        let mut state = self.state.write();
        state.current = path.to_string();
        state.history.push(path.to_string());
    }
}

/// True when `path` is the login view (query strings and sub-paths included).
pub fn is_login_path(path: &str, login_path: &str) -> bool {
    path == login_path
        || path
            .strip_prefix(login_path)
            .is_some_and(|rest| rest.starts_with(['/', '?', '#']))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_navigation() {
        let nav = MemoryNavigator::new("/dashboard");
        nav.navigate("/login");
        assert_eq!(nav.current_path(), "/login");
        assert_eq!(nav.history(), vec!["/login".to_string()]);
    }

    #[test]
    fn login_path_detection() {
        assert!(is_login_path("/login", "/login"));
        assert!(is_login_path("/login?next=/users", "/login"));
        assert!(!is_login_path("/loginhelp", "/login"));
        assert!(!is_login_path("/dashboard", "/login"));
    }
}
