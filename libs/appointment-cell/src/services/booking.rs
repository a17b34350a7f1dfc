// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use tracing::{info, instrument, warn};

use shared_models::auth::SessionUser;

use crate::models::{BookAppointmentRequest, BookingConfirmation, BookingError, NewAppointment};
use crate::store::AppointmentStore;

pub struct BookingService {
    appointments: Arc<dyn AppointmentStore>,
}

impl BookingService {
    pub fn new(appointments: Arc<dyn AppointmentStore>) -> Self {
        Self { appointments }
    }

    /// Persist one appointment for `session`. Double booking of a slot is not
    /// prevented, and a failed write is not retried.
    #[instrument(skip(self, session, request), fields(user_id = %session.id))]
    pub async fn book_appointment(
        &self,
        session: &SessionUser,
        request: BookAppointmentRequest,
    ) -> Result<BookingConfirmation, BookingError> {
        if session.id.trim().is_empty() {
            warn!("Booking attempted without a resolved identity");
            return Err(BookingError::Unauthorized);
        }

        let appointment = self
            .appointments
            .insert(NewAppointment::from_request(&session.id, request))
            .await?;

        info!(
            appointment_id = %appointment.id,
            doctor_id = %appointment.doctor_id,
            "appointment_booked"
        );

        Ok(BookingConfirmation {
            message: format!(
                "Appointment booked successfully with {} on {} at {}",
                display_or(&appointment.doctor_name, "your doctor"),
                display_or(&appointment.date, "the requested date"),
                display_or(&appointment.time, "the requested time"),
            ),
            appointment,
        })
    }
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
