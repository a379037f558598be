#![forbid(unsafe_code)]

//! Navigation targets requested from the host.

use std::fmt;

/// A location the host router should move to.
///
/// Controllers never navigate themselves; they return a route and let the
/// embedding environment decide how to get there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Login screen; used when no session context is available.
    ChildLogin,
    /// Game selection screen; used on exit and after a game completes.
    ChildDashboard,
}

impl Route {
    /// Router path for this route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::ChildLogin => "/child-login",
            Self::ChildDashboard => "/child-dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::Route;

    #[test]
    fn paths_match_router_table() {
        assert_eq!(Route::ChildLogin.path(), "/child-login");
        assert_eq!(Route::ChildDashboard.path(), "/child-dashboard");
        assert_eq!(Route::ChildDashboard.to_string(), "/child-dashboard");
    }
}
