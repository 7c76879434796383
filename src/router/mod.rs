//! Route table and guarded navigation.
//!
//! Routes are the pure domain model: a path parser, canonical paths, and
//! per-route access requirements. [`Router`] holds the current location and
//! runs every navigation, including the initial one, through the guard.

pub mod guard;

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

use crate::models::Role;
use crate::session::SessionContext;

/// Login route, the fallback for unauthenticated and unknown navigation
pub const LOGIN_ROUTE: &str = "/auth/login";

/// Access requirements attached to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    pub role: Option<Role>,
}

/// Application routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Register,
    Login,
    AdminServices,
    AdminEmployees,
    AdminSchedule(i64),
    AdminAppointments,
    EmployeeSchedule(i64),
    EmployeeAppointments,
    ClientDashboard,
    ClientAppointments,
    ClientBusiness(i64),
    ClientBookService { business_id: i64, service_id: i64 },
}

impl Route {
    /// Parse a path into a route. The leading slash is optional; unknown
    /// paths parse to `None`.
    pub fn parse(path: &str) -> Option<Route> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["auth", "register"] => Some(Route::Register),
            ["auth", "login"] => Some(Route::Login),
            ["admin", "services"] => Some(Route::AdminServices),
            ["admin", "employees"] => Some(Route::AdminEmployees),
            ["admin", "schedule", id] => id.parse().ok().map(Route::AdminSchedule),
            ["admin", "appointments"] => Some(Route::AdminAppointments),
            ["employee", "schedule", id] => id.parse().ok().map(Route::EmployeeSchedule),
            ["employee", "appointments"] => Some(Route::EmployeeAppointments),
            ["client", "dashboard"] => Some(Route::ClientDashboard),
            ["client", "appointments"] => Some(Route::ClientAppointments),
            ["client", "business", id] => id.parse().ok().map(Route::ClientBusiness),
            ["client", "appointments", "new", business_id, service_id] => {
                match (business_id.parse().ok(), service_id.parse().ok()) {
                    (Some(business_id), Some(service_id)) => Some(Route::ClientBookService {
                        business_id,
                        service_id,
                    }),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::Register => "/auth/register".to_string(),
            Route::Login => LOGIN_ROUTE.to_string(),
            Route::AdminServices => "/admin/services".to_string(),
            Route::AdminEmployees => "/admin/employees".to_string(),
            Route::AdminSchedule(id) => format!("/admin/schedule/{}", id),
            Route::AdminAppointments => "/admin/appointments".to_string(),
            Route::EmployeeSchedule(id) => format!("/employee/schedule/{}", id),
            Route::EmployeeAppointments => "/employee/appointments".to_string(),
            Route::ClientDashboard => "/client/dashboard".to_string(),
            Route::ClientAppointments => "/client/appointments".to_string(),
            Route::ClientBusiness(id) => format!("/client/business/{}", id),
            Route::ClientBookService {
                business_id,
                service_id,
            } => format!("/client/appointments/new/{}/{}", business_id, service_id),
        }
    }

    /// Access requirements for this route
    pub fn meta(&self) -> RouteMeta {
        let role = match self {
            Route::Register | Route::Login => {
                return RouteMeta {
                    requires_auth: false,
                    role: None,
                }
            }
            Route::AdminServices
            | Route::AdminEmployees
            | Route::AdminSchedule(_)
            | Route::AdminAppointments => Role::Admin,
            Route::EmployeeSchedule(_) | Route::EmployeeAppointments => Role::Employee,
            Route::ClientDashboard
            | Route::ClientAppointments
            | Route::ClientBusiness(_)
            | Route::ClientBookService { .. } => Role::Client,
        };
        RouteMeta {
            requires_auth: true,
            role: Some(role),
        }
    }

    /// The `:id` parameter of the employee schedule section, used by the
    /// ownership check
    pub fn schedule_employee_id(&self) -> Option<i64> {
        match self {
            Route::EmployeeSchedule(id) => Some(*id),
            _ => None,
        }
    }
}

/// Destination sink for forced navigation; the HTTP layer redirects
/// through this on session invalidation.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Guarded navigation state.
pub struct Router {
    session: Arc<SessionContext>,
    current: RwLock<String>,
}

impl Router {
    /// Create a router; the initial location goes through the guard too.
    pub fn new(session: Arc<SessionContext>) -> Self {
        let router = Self {
            session,
            current: RwLock::new(LOGIN_ROUTE.to_string()),
        };
        router.navigate(LOGIN_ROUTE);
        router
    }

    /// Navigate to `path`, applying the guard. Returns the path actually
    /// landed on.
    pub fn navigate(&self, path: &str) -> String {
        let landed = self.resolve(path);
        debug!(requested = path, landed = %landed, "Navigation");
        *self.current.write() = landed.clone();
        landed
    }

    /// The path of the currently rendered route
    pub fn current(&self) -> String {
        self.current.read().clone()
    }

    fn resolve(&self, path: &str) -> String {
        let session = self.session.snapshot();
        let mut target = path.to_string();

        // Guard-issued redirects are themselves guarded; the hop count is
        // bounded and anything unresolvable lands on the login route.
        for _ in 0..4 {
            let route = match Route::parse(&target) {
                Some(route) => route,
                None => {
                    target = LOGIN_ROUTE.to_string();
                    continue;
                }
            };
            match guard::evaluate(&route, &session) {
                guard::RouteDecision::Allow => return route.path(),
                guard::RouteDecision::Redirect(next) => target = next,
            }
        }
        LOGIN_ROUTE.to_string()
    }
}

impl Navigator for Router {
    fn navigate(&self, path: &str) {
        Router::navigate(self, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_support::fixtures;

    fn session_with(user: Option<crate::models::User>) -> Arc<SessionContext> {
        let session = Arc::new(SessionContext::load(Arc::new(MemoryStorage::new())));
        if let Some(user) = user {
            session.establish("tok".to_string(), user);
        }
        session
    }

    #[test]
    fn test_parse_round_trip() {
        for path in [
            "/auth/register",
            "/auth/login",
            "/admin/services",
            "/admin/employees",
            "/admin/schedule/4",
            "/admin/appointments",
            "/employee/schedule/7",
            "/employee/appointments",
            "/client/dashboard",
            "/client/appointments",
            "/client/business/2",
            "/client/appointments/new/2/9",
        ] {
            let route = Route::parse(path).unwrap_or_else(|| panic!("should parse {}", path));
            assert_eq!(route.path(), path);
        }
    }

    #[test]
    fn test_parse_is_lenient_about_leading_slash() {
        assert_eq!(Route::parse("client/dashboard"), Some(Route::ClientDashboard));
        assert_eq!(Route::parse("/unknown/thing"), None);
    }

    #[test]
    fn test_initial_load_is_guarded() {
        let router = Router::new(session_with(None));
        assert_eq!(router.current(), LOGIN_ROUTE);
    }

    #[test]
    fn test_unknown_path_falls_back_to_login() {
        let router = Router::new(session_with(Some(fixtures::client_user(1))));
        assert_eq!(router.navigate("/nowhere/special"), LOGIN_ROUTE);
    }

    #[test]
    fn test_redirect_target_is_guarded_again() {
        // a client asking for an admin page bounces to the client dashboard
        let router = Router::new(session_with(Some(fixtures::client_user(1))));
        assert_eq!(router.navigate("/admin/services"), "/client/dashboard");
        assert_eq!(router.current(), "/client/dashboard");
    }

    #[test]
    fn test_employee_dashboard_redirect_lands_on_login() {
        // "employee/dashboard" names no real view, so the chase ends at login
        let router = Router::new(session_with(Some(fixtures::employee_user(1, Some(7)))));
        assert_eq!(router.navigate("/admin/services"), LOGIN_ROUTE);
    }
}
