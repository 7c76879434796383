//! Shared test harness: a mock envelope API served over real HTTP,
//! recording implementations of the collaborator traits, and fixtures.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::models::{
    Appointment, AppointmentStatus, BookingRequest, Business, Role, Service, User,
};
use crate::notify::{Notifier, NotifyOptions, Severity};
use crate::router::Navigator;
use crate::session::SessionContext;

/// Notifier that records every message for assertions.
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity, _options: NotifyOptions) {
        self.messages.lock().push((message.to_string(), severity));
    }
}

/// Navigator that records visited paths, and optionally the session token
/// as observed at the moment of each navigation.
pub struct RecordingNavigator {
    session: Option<Arc<SessionContext>>,
    visited: Mutex<Vec<String>>,
    tokens: Mutex<Vec<Option<String>>>,
}

impl RecordingNavigator {
    pub fn new(session: Option<Arc<SessionContext>>) -> Self {
        Self {
            session,
            visited: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().clone()
    }

    /// Token snapshots taken as each navigation happened; only populated
    /// when a session was supplied.
    pub fn tokens_at_navigation(&self) -> Vec<Option<String>> {
        self.tokens.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        if let Some(session) = &self.session {
            self.tokens.lock().push(session.token());
        }
        self.visited.lock().push(path.to_string());
    }
}

pub mod fixtures {
    use super::*;
    use chrono::{TimeZone, Utc};

    pub fn user_with_role(role: Role) -> User {
        User {
            id: 1,
            business_id: 4,
            employee_id: if role == Role::Employee { Some(7) } else { None },
            email: Some("ada@example.com".to_string()),
            phone: None,
            full_name: "Ada".to_string(),
            role,
            created_at: None,
        }
    }

    pub fn admin_user(id: i64) -> User {
        User {
            id,
            ..user_with_role(Role::Admin)
        }
    }

    pub fn employee_user(id: i64, employee_id: Option<i64>) -> User {
        User {
            id,
            employee_id,
            ..user_with_role(Role::Employee)
        }
    }

    pub fn client_user(id: i64) -> User {
        User {
            id,
            ..user_with_role(Role::Client)
        }
    }

    /// `{token, user}` payload as the auth endpoints return it
    pub fn auth_json(token: &str, role: Role) -> serde_json::Value {
        serde_json::json!({
            "token": token,
            "user": serde_json::to_value(user_with_role(role)).unwrap(),
        })
    }

    pub fn business(id: i64, name: &str) -> Business {
        Business {
            id,
            name: name.to_string(),
            logo_url: None,
            color_scheme: None,
            created_at: None,
        }
    }

    pub fn business_json(id: i64, name: &str) -> serde_json::Value {
        serde_json::to_value(business(id, name)).unwrap()
    }

    pub fn service_json(id: i64, name: &str, duration: u32) -> serde_json::Value {
        serde_json::to_value(Service {
            id,
            business_id: 4,
            name: name.to_string(),
            description: None,
            duration,
            price: 50,
            is_active: true,
            created_at: None,
        })
        .unwrap()
    }

    pub fn appointment_json(id: i64) -> serde_json::Value {
        serde_json::to_value(Appointment {
            id,
            business_id: 4,
            client_id: 1,
            employee_id: 7,
            service_id: 11,
            start_time: Utc.with_ymd_and_hms(2024, 11, 14, 15, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 11, 14, 15, 45, 0).unwrap(),
            status: AppointmentStatus::Scheduled,
            reminder_time: None,
            created_at: None,
        })
        .unwrap()
    }

    pub fn booking_request() -> BookingRequest {
        BookingRequest {
            client_id: 1,
            employee_id: 7,
            service_id: 11,
            start_time: Utc.with_ymd_and_hms(2024, 11, 14, 15, 0, 0).unwrap(),
            reminder_time: None,
        }
    }
}

pub mod mock {
    use super::*;
    use axum::extract::Request;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    /// One request as the mock server saw it
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub method: String,
        pub path: String,
        pub query: Option<String>,
        pub authorization: Option<String>,
        pub content_type: Option<String>,
        pub body: String,
    }

    pub type Responder = Arc<dyn Fn() -> (u16, serde_json::Value) + Send + Sync>;

    /// Respond 200 with `{success: true, data}`
    pub fn respond_success(data: serde_json::Value) -> Responder {
        Arc::new(move || {
            (
                200,
                serde_json::json!({"success": true, "data": data.clone()}),
            )
        })
    }

    /// Respond 200 with `{success: false, error: {message}}`
    pub fn respond_failure(message: &str) -> Responder {
        let message = message.to_string();
        Arc::new(move || {
            (
                200,
                serde_json::json!({"success": false, "error": {"message": message.clone()}}),
            )
        })
    }

    /// Respond with an HTTP error status carrying an envelope body
    pub fn respond_status(status: u16, message: &str) -> Responder {
        let message = message.to_string();
        Arc::new(move || {
            (
                status,
                serde_json::json!({"success": false, "error": {"message": message.clone()}}),
            )
        })
    }

    struct RouteEntry {
        method: Option<String>,
        path: String,
        responder: Responder,
    }

    pub struct ServerBuilder {
        routes: Vec<RouteEntry>,
    }

    impl ServerBuilder {
        /// Register a responder for `path`, any method
        pub fn route(mut self, path: &str, responder: Responder) -> Self {
            self.routes.push(RouteEntry {
                method: None,
                path: path.to_string(),
                responder,
            });
            self
        }

        /// Register a responder for one method on `path`; wins over the
        /// any-method entry for the same path
        pub fn route_for(mut self, method: &str, path: &str, responder: Responder) -> Self {
            self.routes.push(RouteEntry {
                method: Some(method.to_string()),
                path: path.to_string(),
                responder,
            });
            self
        }

        pub async fn start(self) -> Server {
            let routes = Arc::new(self.routes);
            let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));

            let handler_routes = routes.clone();
            let handler_requests = requests.clone();
            let app = axum::Router::new().fallback(move |request: Request| {
                let routes = handler_routes.clone();
                let requests = handler_requests.clone();
                async move { handle(request, routes, requests).await }
            });

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind mock server");
            let addr = listener.local_addr().expect("mock server addr");
            tokio::spawn(async move {
                axum::serve(listener, app).await.expect("mock server");
            });

            Server {
                base_url: format!("http://{}/api/v1", addr),
                requests,
            }
        }
    }

    async fn handle(
        request: Request,
        routes: Arc<Vec<RouteEntry>>,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    ) -> Response {
        let (parts, body) = request.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .unwrap_or_default();

        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        requests.lock().push(RecordedRequest {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(String::from),
            authorization: header("authorization"),
            content_type: header("content-type"),
            body: String::from_utf8_lossy(&bytes).to_string(),
        });

        let method = parts.method.as_str();
        let path = parts.uri.path();
        let matched = routes
            .iter()
            .find(|r| r.method.as_deref() == Some(method) && r.path == path)
            .or_else(|| routes.iter().find(|r| r.method.is_none() && r.path == path));

        match matched {
            Some(entry) => {
                let (status, body) = (entry.responder)();
                (
                    axum::http::StatusCode::from_u16(status).unwrap(),
                    Json(body),
                )
                    .into_response()
            }
            None => (
                axum::http::StatusCode::NOT_FOUND,
                Json(serde_json::json!({"success": false, "error": {"message": "not found"}})),
            )
                .into_response(),
        }
    }

    /// A running mock API bound to an ephemeral port.
    pub struct Server {
        base_url: String,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    }

    impl Server {
        pub fn builder() -> ServerBuilder {
            ServerBuilder { routes: Vec::new() }
        }

        /// Base URL including the `/api/v1` prefix
        pub fn base_url(&self) -> String {
            self.base_url.clone()
        }

        /// Everything the server has seen so far
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().clone()
        }
    }
}
