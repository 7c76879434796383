//! Store for the end-user booking flow.
//!
//! Read-mostly and deliberately stateless: nothing is cached locally and
//! the persisted key set is empty. Results go straight to the caller;
//! failures go to the notification sink per the operation's policy.

use chrono::NaiveDate;
use std::sync::Arc;

use super::{rethrown, swallowed};
use crate::api::{ApiClient, ApiError};
use crate::models::{Appointment, BookingRequest, Business, DateRange, Employee, Service, TimeSlot};
use crate::notify::Notifier;
use crate::utils;

/// Client-facing search/browse/book operations.
pub struct ClientStore {
    api: Arc<ApiClient>,
    notifier: Arc<dyn Notifier>,
}

impl ClientStore {
    pub fn new(api: Arc<ApiClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Search businesses by name. Error policy: swallow.
    pub async fn search(&self, query: &str) -> Option<Vec<Business>> {
        swallowed(self.notifier.as_ref(), async {
            let envelope = self
                .api
                .get_query::<Vec<Business>>(
                    "businesses/search",
                    &[("search", query.to_string())],
                )
                .await?;
            envelope.into_data("An error occurred during loading")
        })
        .await
    }

    /// Fetch one business. Error policy: swallow.
    pub async fn get_business_details(&self, business_id: i64) -> Option<Business> {
        swallowed(self.notifier.as_ref(), async {
            let envelope = self
                .api
                .get::<Business>(&format!("businesses/{}", business_id))
                .await?;
            envelope.into_data("An error occurred during loading")
        })
        .await
    }

    /// Fetch a business's services. Error policy: swallow.
    pub async fn get_business_services(&self, business_id: i64) -> Option<Vec<Service>> {
        swallowed(self.notifier.as_ref(), async {
            let envelope = self
                .api
                .get::<Vec<Service>>(&format!("businesses/{}/services", business_id))
                .await?;
            envelope.into_data("An error occurred during loading")
        })
        .await
    }

    /// Fetch the employees offering a service. Error policy: swallow.
    pub async fn fetch_service_employees(
        &self,
        business_id: i64,
        service_id: i64,
    ) -> Option<Vec<Employee>> {
        swallowed(self.notifier.as_ref(), async {
            let envelope = self
                .api
                .get::<Vec<Employee>>(&format!(
                    "businesses/{}/services/{}/employees",
                    business_id, service_id
                ))
                .await?;
            envelope.into_data("An error occurred during loading")
        })
        .await
    }

    /// Fetch one service. Error policy: swallow.
    pub async fn get_service_details(
        &self,
        business_id: i64,
        service_id: i64,
    ) -> Option<Service> {
        swallowed(self.notifier.as_ref(), async {
            let envelope = self
                .api
                .get::<Service>(&format!(
                    "businesses/{}/services/{}",
                    business_id, service_id
                ))
                .await?;
            envelope.into_data("An error occurred during loading")
        })
        .await
    }

    /// Free slots for an employee/service on one date.
    ///
    /// The date is normalized to `YYYY-MM-DD` before hitting the wire.
    /// Unlike its siblings this operation does not notify; failures
    /// propagate raw to the caller.
    pub async fn fetch_available_time_slots(
        &self,
        business_id: i64,
        service_id: i64,
        employee_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, ApiError> {
        let query = [
            ("service_id", service_id.to_string()),
            ("employee_id", employee_id.to_string()),
            ("date", utils::format_date(date)),
        ];
        let envelope = self
            .api
            .get_query::<Vec<TimeSlot>>(
                &format!("businesses/{}/appointments/slots", business_id),
                &query,
            )
            .await?;
        envelope.into_data("An error occurred during loading")
    }

    /// Book a service. Error policy: rethrow, so the booking form can stay
    /// open; success is announced through the notifier.
    pub async fn book_service(
        &self,
        business_id: i64,
        payload: &BookingRequest,
    ) -> Result<Appointment, ApiError> {
        let appointment = rethrown(self.notifier.as_ref(), async {
            let envelope = self
                .api
                .post::<Appointment, _>(
                    &format!("businesses/{}/appointments", business_id),
                    payload,
                )
                .await?;
            envelope.into_data("An error occurred during booking")
        })
        .await?;

        self.notifier.success("Booking successful!");
        Ok(appointment)
    }

    /// Fetch the user's own appointments, optionally bounded by a date
    /// range. Error policy: swallow.
    pub async fn fetch_appointments(
        &self,
        user_id: i64,
        range: &DateRange,
    ) -> Option<Vec<Appointment>> {
        swallowed(self.notifier.as_ref(), async {
            let envelope = self
                .api
                .get_query::<Vec<Appointment>>(
                    &format!("users/{}/appointments", user_id),
                    &range.query(),
                )
                .await?;
            envelope.into_data("Failed to fetch appointments")
        })
        .await
    }
}
