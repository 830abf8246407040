//! # Money Router
//!
//! Client-side route table and authentication guard for the Money App.
//!
//! The table is declarative; the only logic is the guard, which reads a
//! session flag from a per-tab ephemeral store. View rendering is out of
//! scope: resolving a route yields its name and parameters, nothing more.

use hashbrown::HashMap;
use thiserror::Error;
use tracing::debug;

/// Session key holding the lock flag.
pub const SESSION_LOCK_KEY: &str = "isLocked";

/// Errors from route resolution.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("No route matches path: {0}")]
    NotFound(String),

    #[error("Unknown route name: {0}")]
    UnknownName(String),
}

/// One entry in the route table.
#[derive(Debug, Clone)]
pub struct Route {
    /// Path pattern; one `:param` segment is supported.
    pub path: &'static str,
    /// Route name.
    pub name: &'static str,
    /// Whether the guard requires an authenticated session.
    pub requires_auth: bool,
    /// Whether the view loads lazily.
    pub lazy: bool,
}

/// A resolved route with extracted path parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch<'r> {
    pub route: &'r Route,
    pub params: HashMap<String, String>,
}

/// Outcome of guarded navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Proceed to the requested route.
    Proceed(&'static str),
    /// Redirect to the named route instead.
    Redirect(&'static str),
}

/// Per-tab ephemeral string store the guard reads the session flag from.
pub trait SessionStore {
    /// Get a stored value.
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value.
    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// The session is authenticated only when the lock flag holds the literal
/// string "false"; any other value, including absence, means locked.
pub fn is_authenticated(store: &dyn SessionStore) -> bool {
    store.get(SESSION_LOCK_KEY).as_deref() == Some("false")
}

/// The application router.
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Build the Money App route table.
    pub fn new() -> Self {
        Self {
            routes: vec![
                Route {
                    path: "/login",
                    name: "login",
                    requires_auth: false,
                    lazy: false,
                },
                Route {
                    path: "/",
                    name: "dashboard",
                    requires_auth: true,
                    lazy: false,
                },
                Route {
                    path: "/transactions",
                    name: "transactions",
                    requires_auth: true,
                    lazy: false,
                },
                Route {
                    path: "/daily/:date",
                    name: "daily-detail",
                    requires_auth: true,
                    lazy: true,
                },
            ],
        }
    }

    /// All routes, in declaration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Look up a route by name.
    pub fn by_name(&self, name: &str) -> Result<&Route, RouterError> {
        self.routes
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| RouterError::UnknownName(name.to_string()))
    }

    /// Resolve a concrete path against the table.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch<'_>, RouterError> {
        for route in &self.routes {
            if let Some(params) = match_path(route.path, path) {
                return Ok(RouteMatch { route, params });
            }
        }
        Err(RouterError::NotFound(path.to_string()))
    }

    /// Resolve a path and apply the authentication guard.
    pub fn navigate(
        &self,
        path: &str,
        store: &dyn SessionStore,
    ) -> Result<Navigation, RouterError> {
        let target = self.resolve(path)?;
        let authenticated = is_authenticated(store);

        let navigation = if target.route.requires_auth && !authenticated {
            Navigation::Redirect("login")
        } else if target.route.name == "login" && authenticated {
            Navigation::Redirect("dashboard")
        } else {
            Navigation::Proceed(target.route.name)
        };

        debug!(path, authenticated, ?navigation, "Navigation guarded");
        Ok(navigation)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Match a concrete path against a pattern, extracting `:param` segments.
fn match_path(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_segments: Vec<&str> = pattern.trim_matches('/').split('/').collect();
    let path_segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (pattern_seg, path_seg) in pattern_segments.iter().zip(&path_segments) {
        if let Some(name) = pattern_seg.strip_prefix(':') {
            if path_seg.is_empty() {
                return None;
            }
            params.insert(name.to_string(), path_seg.to_string());
        } else if pattern_seg != path_seg {
            return None;
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unlocked_store() -> MemorySessionStore {
        let mut store = MemorySessionStore::new();
        store.set(SESSION_LOCK_KEY, "false");
        store
    }

    #[test]
    fn test_resolve_static_routes() {
        let router = Router::new();
        assert_eq!(router.resolve("/").unwrap().route.name, "dashboard");
        assert_eq!(router.resolve("/login").unwrap().route.name, "login");
        assert_eq!(
            router.resolve("/transactions").unwrap().route.name,
            "transactions"
        );
    }

    #[test]
    fn test_resolve_param_route() {
        let router = Router::new();
        let matched = router.resolve("/daily/2026-08-07").unwrap();
        assert_eq!(matched.route.name, "daily-detail");
        assert!(matched.route.lazy);
        assert_eq!(matched.params.get("date").map(String::as_str), Some("2026-08-07"));
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let router = Router::new();
        assert!(matches!(
            router.resolve("/settings"),
            Err(RouterError::NotFound(_))
        ));
        // A trailing segment does not match the bare transactions route.
        assert!(router.resolve("/transactions/42").is_err());
    }

    #[test]
    fn test_lock_flag_semantics() {
        let mut store = MemorySessionStore::new();
        assert!(!is_authenticated(&store));

        store.set(SESSION_LOCK_KEY, "true");
        assert!(!is_authenticated(&store));

        // Only the literal string "false" unlocks.
        store.set(SESSION_LOCK_KEY, "False");
        assert!(!is_authenticated(&store));

        store.set(SESSION_LOCK_KEY, "false");
        assert!(is_authenticated(&store));
    }

    #[test]
    fn test_guard_redirects_unauthenticated_to_login() {
        let router = Router::new();
        let store = MemorySessionStore::new();

        for path in ["/", "/transactions", "/daily/2026-08-07"] {
            assert_eq!(
                router.navigate(path, &store).unwrap(),
                Navigation::Redirect("login"),
                "path {path} must redirect to login"
            );
        }
    }

    #[test]
    fn test_guard_allows_authenticated_navigation() {
        let router = Router::new();
        let store = unlocked_store();

        assert_eq!(
            router.navigate("/transactions", &store).unwrap(),
            Navigation::Proceed("transactions")
        );
        assert_eq!(
            router.navigate("/", &store).unwrap(),
            Navigation::Proceed("dashboard")
        );
    }

    #[test]
    fn test_guard_bounces_authenticated_off_login() {
        let router = Router::new();
        assert_eq!(
            router.navigate("/login", &unlocked_store()).unwrap(),
            Navigation::Redirect("dashboard")
        );
    }

    #[test]
    fn test_login_reachable_when_locked() {
        let router = Router::new();
        let store = MemorySessionStore::new();
        assert_eq!(
            router.navigate("/login", &store).unwrap(),
            Navigation::Proceed("login")
        );
    }

    #[test]
    fn test_by_name() {
        let router = Router::new();
        assert_eq!(router.by_name("dashboard").unwrap().path, "/");
        assert!(matches!(
            router.by_name("missing"),
            Err(RouterError::UnknownName(_))
        ));
    }
}
