mod contact;

pub use contact::{validate_contact_email, validate_person_name};
