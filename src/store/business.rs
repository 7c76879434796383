//! Store for the active business and its owned collections.
//!
//! Services, employees, employee-service links, schedule templates, and
//! appointments are cached locally and kept in sync by write-through:
//! every mutation hits the server first and only mirrors into the cache on
//! `success: true`. The business, services, and employees caches persist
//! across restarts; appointments and templates are refetched each session.

use parking_lot::RwLock;
use std::sync::Arc;

use super::{rethrown, swallowed};
use crate::api::{ApiClient, ApiError};
use crate::models::{
    Appointment, AssignServicesRequest, Business, CreateScheduleTemplateRequest,
    CreateServiceRequest, DateRange, Employee, ScheduleTemplate, Service,
    UpdateAppearanceRequest, UpdateBusinessRequest,
};
use crate::notify::Notifier;
use crate::storage::{self, Storage};

/// Persisted key for the active business
pub const BUSINESS_KEY: &str = "business";
/// Persisted key for the services cache
pub const SERVICES_KEY: &str = "services";
/// Persisted key for the employees cache
pub const EMPLOYEES_KEY: &str = "employees";

#[derive(Default)]
struct BusinessState {
    business: Option<Business>,
    services: Vec<Service>,
    employees: Vec<Employee>,
    employee_services: Vec<Service>,
    schedule_templates: Vec<ScheduleTemplate>,
    appointments: Vec<Appointment>,
}

/// Admin/employee-facing store for one business at a time.
pub struct BusinessStore {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
    storage: Arc<dyn Storage>,
    origin: String,
    state: RwLock<BusinessState>,
}

impl BusinessStore {
    /// Create the store, restoring the persisted subset.
    pub fn load(
        api: Arc<ApiClient>,
        notifier: Arc<dyn Notifier>,
        storage: Arc<dyn Storage>,
        origin: impl Into<String>,
    ) -> Self {
        let state = BusinessState {
            business: storage::load_json(storage.as_ref(), BUSINESS_KEY),
            services: storage::load_json(storage.as_ref(), SERVICES_KEY).unwrap_or_default(),
            employees: storage::load_json(storage.as_ref(), EMPLOYEES_KEY).unwrap_or_default(),
            ..Default::default()
        };
        Self {
            api,
            notifier,
            storage,
            origin: origin.into().trim_end_matches('/').to_string(),
            state: RwLock::new(state),
        }
    }

    // ------------------------------------------------------------------
    // Cache accessors
    // ------------------------------------------------------------------

    pub fn business(&self) -> Option<Business> {
        self.state.read().business.clone()
    }

    pub fn services(&self) -> Vec<Service> {
        self.state.read().services.clone()
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.state.read().employees.clone()
    }

    pub fn employee_services(&self) -> Vec<Service> {
        self.state.read().employee_services.clone()
    }

    pub fn schedule_templates(&self) -> Vec<ScheduleTemplate> {
        self.state.read().schedule_templates.clone()
    }

    pub fn appointments(&self) -> Vec<Appointment> {
        self.state.read().appointments.clone()
    }

    fn require_business(&self) -> Result<i64, ApiError> {
        self.state
            .read()
            .business
            .as_ref()
            .map(|b| b.id)
            .ok_or_else(|| ApiError::application("No business loaded"))
    }

    /// Flush the persisted subset.
    fn persist(&self) {
        let state = self.state.read();
        match &state.business {
            Some(business) => storage::store_json(self.storage.as_ref(), BUSINESS_KEY, business),
            None => self.storage.remove(BUSINESS_KEY),
        }
        storage::store_json(self.storage.as_ref(), SERVICES_KEY, &state.services);
        storage::store_json(self.storage.as_ref(), EMPLOYEES_KEY, &state.employees);
    }

    // ------------------------------------------------------------------
    // Business
    // ------------------------------------------------------------------

    /// Load a business and make it the active one.
    ///
    /// Switching to a different business id invalidates every cached
    /// collection; they are scoped to exactly one business at a time.
    /// Error policy: rethrow.
    pub async fn get_business(&self, business_id: i64) -> Result<Business, ApiError> {
        rethrown(self.notifier.as_ref(), async {
            let envelope = self
                .api
                .get::<Business>(&format!("businesses/{}", business_id))
                .await?;
            let business = envelope.into_data("Failed to get business")?;

            {
                let mut state = self.state.write();
                let switched = state.business.as_ref().map(|b| b.id) != Some(business.id);
                if switched {
                    state.services.clear();
                    state.employees.clear();
                    state.employee_services.clear();
                    state.schedule_templates.clear();
                    state.appointments.clear();
                }
                state.business = Some(business.clone());
            }
            self.persist();
            Ok(business)
        })
        .await
    }

    /// Rename the active business. Error policy: rethrow.
    pub async fn update_business(&self, payload: &UpdateBusinessRequest) -> Result<(), ApiError> {
        rethrown(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .put::<serde_json::Value, _>(&format!("businesses/{}", id), payload)
                .await?;
            envelope.ack("Failed to update business name")?;

            if let Some(business) = self.state.write().business.as_mut() {
                business.name = payload.name.clone();
            }
            self.persist();
            Ok(())
        })
        .await
    }

    /// Update logo and color scheme. Error policy: rethrow.
    pub async fn update_business_appearance(
        &self,
        payload: &UpdateAppearanceRequest,
    ) -> Result<(), ApiError> {
        rethrown(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .patch::<serde_json::Value, _>(&format!("businesses/{}/appearance", id), payload)
                .await?;
            envelope.ack("Failed to update business logo")?;

            {
                let mut state = self.state.write();
                if let Some(business) = state.business.as_mut() {
                    if payload.logo_url.is_some() {
                        business.logo_url = payload.logo_url.clone();
                    }
                    if payload.color_scheme.is_some() {
                        business.color_scheme = payload.color_scheme.clone();
                    }
                }
            }
            self.persist();
            Ok(())
        })
        .await
    }

    /// Registration link for inviting employees; pure derivation, no
    /// network call.
    pub fn registration_link(&self) -> Option<String> {
        self.state
            .read()
            .business
            .as_ref()
            .map(|b| format!("{}/auth/register?business_id={}", self.origin, b.id))
    }

    // ------------------------------------------------------------------
    // Services
    // ------------------------------------------------------------------

    /// Refresh the services cache. Error policy: swallow.
    pub async fn fetch_services(&self) -> Option<Vec<Service>> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .get::<Vec<Service>>(&format!("businesses/{}/services", id))
                .await?;
            let services = envelope.into_data("Failed to fetch services")?;

            self.state.write().services = services.clone();
            self.persist();
            Ok(services)
        })
        .await
    }

    /// Create a service and append the server's record to the cache.
    /// Error policy: swallow.
    pub async fn create_service(&self, payload: &CreateServiceRequest) -> Option<Service> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .post::<Service, _>(&format!("businesses/{}/services", id), payload)
                .await?;
            let service = envelope.into_data("Failed to create service")?;

            self.state.write().services.push(service.clone());
            self.persist();
            Ok(service)
        })
        .await
    }

    /// Update a service, replacing the cached entry by id.
    /// Error policy: swallow.
    pub async fn update_service(
        &self,
        service_id: i64,
        payload: &CreateServiceRequest,
    ) -> Option<Service> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .put::<Service, _>(
                    &format!("businesses/{}/services/{}", id, service_id),
                    payload,
                )
                .await?;
            let service = envelope.into_data("Failed to update service")?;

            {
                let mut state = self.state.write();
                if let Some(slot) = state.services.iter_mut().find(|s| s.id == service_id) {
                    *slot = service.clone();
                }
            }
            self.persist();
            Ok(service)
        })
        .await
    }

    /// Delete a service and drop it from the cache. Error policy: swallow.
    pub async fn delete_service(&self, service_id: i64) -> Option<()> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .delete::<serde_json::Value>(&format!("businesses/{}/services/{}", id, service_id))
                .await?;
            envelope.ack("Failed to delete service")?;

            self.state.write().services.retain(|s| s.id != service_id);
            self.persist();
            Ok(())
        })
        .await
    }

    // ------------------------------------------------------------------
    // Employees
    // ------------------------------------------------------------------

    /// Refresh the employees cache. Error policy: swallow.
    pub async fn fetch_employees(&self) -> Option<Vec<Employee>> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .get::<Vec<Employee>>(&format!("businesses/{}/employees", id))
                .await?;
            let employees = envelope.into_data("Failed to fetch employees")?;

            self.state.write().employees = employees.clone();
            self.persist();
            Ok(employees)
        })
        .await
    }

    /// Remove an employee from the business. Error policy: swallow.
    pub async fn delete_employee(&self, employee_id: i64) -> Option<()> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .delete::<serde_json::Value>(&format!(
                    "businesses/{}/employees/{}",
                    id, employee_id
                ))
                .await?;
            envelope.ack("Failed to delete employee")?;

            self.state.write().employees.retain(|e| e.id != employee_id);
            self.persist();
            Ok(())
        })
        .await
    }

    /// Fetch the services assigned to one employee. Error policy: swallow.
    pub async fn fetch_employee_services(&self, employee_id: i64) -> Option<Vec<Service>> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .get::<Vec<Service>>(&format!(
                    "businesses/{}/employees/{}/services",
                    id, employee_id
                ))
                .await?;
            let services = envelope.into_data("Failed to fetch employee services")?;

            self.state.write().employee_services = services.clone();
            Ok(services)
        })
        .await
    }

    /// Assign one service to an employee.
    ///
    /// The endpoint takes a batch; a single-element batch is sent. On
    /// success the matching record from the services cache is appended to
    /// the employee-services cache. Error policy: swallow.
    pub async fn assign_service(&self, employee_id: i64, service_id: i64) -> Option<Service> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let payload = AssignServicesRequest {
                service_ids: vec![service_id],
            };
            let envelope = self
                .api
                .post::<serde_json::Value, _>(
                    &format!("businesses/{}/employees/{}/services", id, employee_id),
                    &payload,
                )
                .await?;
            envelope.ack("Failed to assign service")?;

            let mut state = self.state.write();
            let service = state
                .services
                .iter()
                .find(|s| s.id == service_id)
                .cloned()
                .ok_or_else(|| ApiError::application("Service is not in the local cache"))?;
            state.employee_services.push(service.clone());
            Ok(service)
        })
        .await
    }

    /// Remove one service assignment from an employee. Error policy: swallow.
    pub async fn remove_service(&self, employee_id: i64, service_id: i64) -> Option<()> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let payload = AssignServicesRequest {
                service_ids: vec![service_id],
            };
            let envelope = self
                .api
                .delete_json::<serde_json::Value, _>(
                    &format!("businesses/{}/employees/{}/services", id, employee_id),
                    &payload,
                )
                .await?;
            envelope.ack("Failed to remove service")?;

            self.state
                .write()
                .employee_services
                .retain(|s| s.id != service_id);
            Ok(())
        })
        .await
    }

    // ------------------------------------------------------------------
    // Schedule templates
    // ------------------------------------------------------------------

    /// Fetch an employee's weekly templates. Error policy: swallow.
    pub async fn fetch_schedule_templates(
        &self,
        employee_id: i64,
    ) -> Option<Vec<ScheduleTemplate>> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .get::<Vec<ScheduleTemplate>>(&format!(
                    "businesses/{}/employees/{}/schedule/templates",
                    id, employee_id
                ))
                .await?;
            let templates = envelope.into_data("Failed to fetch schedule templates")?;

            self.state.write().schedule_templates = templates.clone();
            Ok(templates)
        })
        .await
    }

    /// Create a template and append the server's record.
    /// Error policy: swallow.
    pub async fn create_schedule_template(
        &self,
        employee_id: i64,
        payload: &CreateScheduleTemplateRequest,
    ) -> Option<ScheduleTemplate> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .post::<ScheduleTemplate, _>(
                    &format!(
                        "businesses/{}/employees/{}/schedule/templates",
                        id, employee_id
                    ),
                    payload,
                )
                .await?;
            let template = envelope.into_data("Failed to create schedule template")?;

            self.state.write().schedule_templates.push(template.clone());
            Ok(template)
        })
        .await
    }

    /// Update a template; the submitted payload replaces the cached entry.
    /// Error policy: swallow.
    pub async fn update_schedule_template(
        &self,
        employee_id: i64,
        template: &ScheduleTemplate,
    ) -> Option<()> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .put::<serde_json::Value, _>(
                    &format!(
                        "businesses/{}/employees/{}/schedule/templates/{}",
                        id, employee_id, template.id
                    ),
                    template,
                )
                .await?;
            envelope.ack("Failed to update schedule template")?;

            let mut state = self.state.write();
            if let Some(slot) = state
                .schedule_templates
                .iter_mut()
                .find(|t| t.id == template.id)
            {
                *slot = template.clone();
            }
            Ok(())
        })
        .await
    }

    /// Delete a template. Error policy: swallow.
    pub async fn delete_schedule_template(
        &self,
        employee_id: i64,
        template_id: i64,
    ) -> Option<()> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .delete::<serde_json::Value>(&format!(
                    "businesses/{}/employees/{}/schedule/templates/{}",
                    id, employee_id, template_id
                ))
                .await?;
            envelope.ack("Failed to delete schedule template")?;

            self.state
                .write()
                .schedule_templates
                .retain(|t| t.id != template_id);
            Ok(())
        })
        .await
    }

    // ------------------------------------------------------------------
    // Appointments
    // ------------------------------------------------------------------

    /// Fetch the business's appointments, optionally bounded by a date
    /// range. Error policy: swallow.
    pub async fn fetch_appointments(&self, range: &DateRange) -> Option<Vec<Appointment>> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .get_query::<Vec<Appointment>>(
                    &format!("businesses/{}/appointments", id),
                    &range.query(),
                )
                .await?;
            let appointments = envelope.into_data("Failed to fetch appointments")?;

            self.state.write().appointments = appointments.clone();
            Ok(appointments)
        })
        .await
    }

    /// Fetch one employee's appointments, optionally bounded by a date
    /// range. Error policy: swallow.
    pub async fn fetch_employee_appointments(
        &self,
        employee_id: i64,
        range: &DateRange,
    ) -> Option<Vec<Appointment>> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .get_query::<Vec<Appointment>>(
                    &format!("businesses/{}/appointments/employee/{}", id, employee_id),
                    &range.query(),
                )
                .await?;
            let appointments = envelope.into_data("Failed to fetch appointments")?;

            self.state.write().appointments = appointments.clone();
            Ok(appointments)
        })
        .await
    }

    /// Cancel an appointment and drop it from the cache; no status
    /// transition is kept client-side. Error policy: swallow.
    pub async fn cancel_appointment(&self, appointment_id: i64) -> Option<()> {
        swallowed(self.notifier.as_ref(), async {
            let id = self.require_business()?;
            let envelope = self
                .api
                .delete::<serde_json::Value>(&format!(
                    "businesses/{}/appointments/{}",
                    id, appointment_id
                ))
                .await?;
            envelope.ack("Failed to cancel appointment")?;

            self.state
                .write()
                .appointments
                .retain(|a| a.id != appointment_id);
            Ok(())
        })
        .await
    }
}
