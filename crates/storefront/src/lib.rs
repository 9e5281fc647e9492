//! Actions the storefront offers around search results and the home page.
//!
//! Everything here returns an outcome value for the presentation layer to
//! render; nothing talks to the user directly.

mod booking;
mod links;
mod services;

pub use booking::{book_appointment, contact_clinic, BookingOutcome, ContactOutcome, CLINIC_PHONE};
pub use links::{results_headline, SearchLink, POPULAR_SEARCHES};
pub use services::{ServiceOutcome, StorefrontService};
