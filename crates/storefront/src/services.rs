use carefinder_auth::UserSession;
use serde::Serialize;

use crate::SearchLink;

/// Home-page service tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorefrontService {
    ConsultDoctor,
    OrderMedicines,
    ViewMedicalRecords,
    BookTest,
    ReadArticles,
    HealthcareProviders,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceOutcome {
    Navigate { href: String },
    Notice { message: String },
    AuthenticationRequired { message: String },
}

impl StorefrontService {
    pub const ALL: [StorefrontService; 6] = [
        StorefrontService::ConsultDoctor,
        StorefrontService::OrderMedicines,
        StorefrontService::ViewMedicalRecords,
        StorefrontService::BookTest,
        StorefrontService::ReadArticles,
        StorefrontService::HealthcareProviders,
    ];

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|service| service.slug() == slug)
    }

    pub fn slug(self) -> &'static str {
        match self {
            StorefrontService::ConsultDoctor => "consult-doctor",
            StorefrontService::OrderMedicines => "order-medicines",
            StorefrontService::ViewMedicalRecords => "view-medical-records",
            StorefrontService::BookTest => "book-test",
            StorefrontService::ReadArticles => "read-articles",
            StorefrontService::HealthcareProviders => "healthcare-providers",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StorefrontService::ConsultDoctor => "Consult with a doctor",
            StorefrontService::OrderMedicines => "Order Medicines",
            StorefrontService::ViewMedicalRecords => "View medical records",
            StorefrontService::BookTest => "Book test",
            StorefrontService::ReadArticles => "Read articles",
            StorefrontService::HealthcareProviders => "For healthcare providers",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StorefrontService::ConsultDoctor => "Get expert medical advice",
            StorefrontService::OrderMedicines => "Doorstep delivery",
            StorefrontService::ViewMedicalRecords => "Access your health data",
            StorefrontService::BookTest => "Lab tests at home",
            StorefrontService::ReadArticles => "Health tips & guides",
            StorefrontService::HealthcareProviders => "Join our network",
        }
    }

    pub fn badge(self) -> Option<&'static str> {
        match self {
            StorefrontService::BookTest => Some("New"),
            _ => None,
        }
    }

    pub fn resolve(self, session: Option<&UserSession>) -> ServiceOutcome {
        let notice = |message: &str| ServiceOutcome::Notice {
            message: message.to_string(),
        };

        match self {
            StorefrontService::ConsultDoctor => ServiceOutcome::Navigate {
                href: SearchLink::specialty("General Physician").href(),
            },
            StorefrontService::OrderMedicines => notice(
                "Medicine ordering feature coming soon! We'll deliver to your doorstep.",
            ),
            StorefrontService::ViewMedicalRecords => match session {
                Some(session) => ServiceOutcome::Notice {
                    message: format!(
                        "{}, your medical records feature is being prepared!",
                        session.name
                    ),
                },
                None => ServiceOutcome::AuthenticationRequired {
                    message: "Please login to view your medical records".to_string(),
                },
            },
            StorefrontService::BookTest => {
                notice("Lab test booking available! Home sample collection in 24 hours.")
            }
            StorefrontService::ReadArticles => {
                notice("Health articles section coming soon! Stay tuned for expert tips.")
            }
            StorefrontService::HealthcareProviders => {
                notice("Healthcare provider registration portal opening soon!")
            }
        }
    }
}
