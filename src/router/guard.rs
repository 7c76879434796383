//! Pure navigation guard.
//!
//! Decides, per navigation attempt, whether the session may enter the
//! target route. Checks run in order: authentication, role, resource
//! ownership. Side-effect free; the router applies the decision.

use tracing::error;

use super::{Route, LOGIN_ROUTE};
use crate::models::Role;
use crate::session::Session;

/// Outcome of a navigation check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(String),
}

/// Decide whether `session` may enter `route`.
pub fn evaluate(route: &Route, session: &Session) -> RouteDecision {
    let meta = route.meta();

    // 1. Authentication
    if meta.requires_auth && !session.is_authenticated() {
        return RouteDecision::Redirect(LOGIN_ROUTE.to_string());
    }

    // 2. Role
    if let Some(required) = meta.role {
        let user = match session.user.as_ref() {
            Some(user) => user,
            None => return RouteDecision::Redirect(LOGIN_ROUTE.to_string()),
        };
        let current = user.role;

        // Client pages also admit admins; anything else is an unexpected role.
        if required == Role::Client && current != Role::Client && current != Role::Admin {
            error!(role = %current, "Unexpected role for client route");
            return RouteDecision::Redirect(LOGIN_ROUTE.to_string());
        }

        if current != required {
            return RouteDecision::Redirect(format!("{}/dashboard", current.as_str()));
        }

        // 3. Ownership: an employee may only view their own schedule.
        if required == Role::Employee {
            if let Some(target_id) = route.schedule_employee_id() {
                match user.employee_id {
                    Some(own) if own == target_id => {}
                    Some(own) => {
                        return RouteDecision::Redirect(format!(
                            "{}/schedule/{}",
                            current.as_str(),
                            own
                        ));
                    }
                    None => {
                        error!("Employee session without an employee id");
                        return RouteDecision::Redirect(LOGIN_ROUTE.to_string());
                    }
                }
            }
        }
    }

    RouteDecision::Allow
}
