use carefinder_auth::UserSession;
use carefinder_catalog::ProviderRecord;
use serde::Serialize;
use tracing::info;

/// Placeholder clinic line shown for every provider.
pub const CLINIC_PHONE: &str = "+91 80-XXXX-XXXX";

const LOGIN_REQUIRED: &str = "Please login to book an appointment";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BookingOutcome {
    AuthenticationRequired {
        message: String,
    },
    Confirmed {
        patient_name: String,
        provider_name: String,
        message: String,
    },
}

impl BookingOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, BookingOutcome::Confirmed { .. })
    }
}

/// Gates booking on an active session. No booking record is kept anywhere.
pub fn book_appointment(session: Option<&UserSession>, provider: &ProviderRecord) -> BookingOutcome {
    let Some(session) = session else {
        return BookingOutcome::AuthenticationRequired {
            message: LOGIN_REQUIRED.to_string(),
        };
    };

    info!(
        provider = %provider.id,
        patient = %session.email,
        "appointment confirmed"
    );

    BookingOutcome::Confirmed {
        patient_name: session.name.clone(),
        provider_name: provider.name.clone(),
        message: format!(
            "Great choice {}! Booking appointment with {}. You'll receive a confirmation SMS shortly.",
            session.name, provider.name
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactOutcome {
    pub provider_name: String,
    pub phone: String,
    pub message: String,
}

pub fn contact_clinic(provider: &ProviderRecord) -> ContactOutcome {
    ContactOutcome {
        provider_name: provider.name.clone(),
        phone: CLINIC_PHONE.to_string(),
        message: format!(
            "Connecting you to {}'s clinic. Phone: {CLINIC_PHONE}",
            provider.name
        ),
    }
}
