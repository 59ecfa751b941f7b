//! Navigation director.
//!
//! Resolves session state to a root route and broadcasts navigation commands.
//! Commands always replace history (or reset it outright) so the back button
//! can never land on a screen inconsistent with the session.

use tokio::sync::watch;

/// Root screens of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// No token: the login flow.
    Unauthenticated,
    /// Token present, profile incomplete: the completion gate.
    CompleteProfile,
    /// Token present, profile complete: the main area.
    Authenticated,
}

/// A navigation instruction for the shell driving the screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// Replace the current history entry.
    Replace(Route),
    /// Discard the whole stack and start over at `Route`.
    Reset(Route),
}

impl NavCommand {
    pub fn route(self) -> Route {
        match self {
            NavCommand::Replace(route) | NavCommand::Reset(route) => route,
        }
    }
}

/// Resolves session state to exactly one root route.
pub fn resolve(has_token: bool, profile_complete: bool) -> Route {
    match (has_token, profile_complete) {
        (false, _) => Route::Unauthenticated,
        (true, false) => Route::CompleteProfile,
        (true, true) => Route::Authenticated,
    }
}

/// Broadcasts navigation commands to whoever renders screens.
pub struct Director {
    tx: watch::Sender<NavCommand>,
}

impl Director {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(NavCommand::Reset(Route::Unauthenticated));
        Self { tx }
    }

    /// Replace-history navigation to `route`.
    pub fn replace(&self, route: Route) {
        self.tx.send_replace(NavCommand::Replace(route));
    }

    /// Full stack reset to `route` (used on logout and auth failure).
    pub fn reset(&self, route: Route) {
        self.tx.send_replace(NavCommand::Reset(route));
    }

    /// The most recently issued command.
    pub fn current(&self) -> NavCommand {
        *self.tx.borrow()
    }

    /// Subscribes to navigation commands.
    pub fn subscribe(&self) -> watch::Receiver<NavCommand> {
        self.tx.subscribe()
    }
}

impl Default for Director {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: full routing gate truth table.
    #[test]
    fn test_resolve_routing_gate() {
        assert_eq!(resolve(false, false), Route::Unauthenticated);
        assert_eq!(resolve(false, true), Route::Unauthenticated);
        assert_eq!(resolve(true, false), Route::CompleteProfile);
        assert_eq!(resolve(true, true), Route::Authenticated);
    }

    /// Test: commands are observable and the latest wins.
    #[test]
    fn test_director_broadcasts_latest() {
        let director = Director::new();
        let rx = director.subscribe();

        director.replace(Route::CompleteProfile);
        director.reset(Route::Unauthenticated);

        assert_eq!(*rx.borrow(), NavCommand::Reset(Route::Unauthenticated));
        assert_eq!(director.current().route(), Route::Unauthenticated);
    }

    /// Test: director works with no subscribers attached.
    #[test]
    fn test_director_without_subscribers() {
        let director = Director::new();
        director.replace(Route::Authenticated);
        assert_eq!(director.current(), NavCommand::Replace(Route::Authenticated));
    }
}
