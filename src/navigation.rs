use crate::types::Role;

/// Client-side destinations the core can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Route {
    /// Authentication entry point, requested when a session expires.
    Login,
    /// The student's order list, requested after a successful checkout.
    OrderTracking,
    /// Landing page for a role.
    Home(Role),
}

impl Route {
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::OrderTracking => "/student/orders",
            Self::Home(Role::Student) => "/student",
            Self::Home(Role::FoodCourtAdmin) => "/admin",
            Self::Home(Role::SuperAdmin) => "/super-admin",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Host-provided navigation hook.
///
/// The core never blocks on navigation; it reports the destination and
/// carries on returning its result to the caller.
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, route: Route);
}

/// Navigator that only records the request in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNavigation;

impl Navigator for NoNavigation {
    fn navigate(&self, route: Route) {
        tracing::info!(route = %route, "Navigation requested");
    }
}

impl<F> Navigator for F
where
    F: Fn(Route) + Send + Sync + 'static,
{
    fn navigate(&self, route: Route) {
        self(route);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn paths() {
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::OrderTracking.to_string(), "/student/orders");
        assert_eq!(Route::Home(Role::FoodCourtAdmin).path(), "/admin");
        assert_eq!(Route::Home(Role::SuperAdmin).path(), "/super-admin");
    }

    #[test]
    fn closures_are_navigators() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let navigator = move |route: Route| sink.lock().unwrap().push(route);

        navigator.navigate(Route::Login);
        assert_eq!(*seen.lock().unwrap(), vec![Route::Login]);
    }
}
