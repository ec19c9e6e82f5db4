pub mod agitation;
pub mod assessments;
pub mod auth;
pub mod clinician;
pub mod family;
pub mod health;
pub mod memoryscape;
pub mod patients;
pub mod sessions;
pub mod vitals;
