use validator::{ValidateEmail, ValidationError};

/// Validates a person-name field: non-blank after trimming, bounded length.
pub fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("person_name_blank");
        err.message = Some("First name and last name are required".into());
        return Err(err);
    }

    if name.chars().count() > 100 {
        let mut err = ValidationError::new("person_name_length");
        err.message = Some("Names must be at most 100 characters".into());
        return Err(err);
    }

    Ok(())
}

/// Validates a contact-email field. A blank value means the sender left the
/// field empty and is accepted; only non-blank values must parse as an email
/// address.
pub fn validate_contact_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Ok(());
    }

    if !email.validate_email() {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Email address is not valid".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_person_name() {
        // Valid names
        assert!(validate_person_name("John").is_ok());
        assert!(validate_person_name("mary-jane").is_ok());
        assert!(validate_person_name("o'brien").is_ok());

        // Invalid names
        assert!(validate_person_name("").is_err());
        assert!(validate_person_name("   ").is_err());
        let too_long = "a".repeat(101);
        assert!(validate_person_name(&too_long).is_err());
    }

    #[test]
    fn test_validate_contact_email() {
        // Valid emails
        assert!(validate_contact_email("john@example.com").is_ok());

        // Blank means "not provided", never an error
        assert!(validate_contact_email("").is_ok());
        assert!(validate_contact_email("   ").is_ok());

        // Non-blank values must be well-formed
        assert!(validate_contact_email("not-an-email").is_err());
        assert!(validate_contact_email("john@").is_err());
    }
}
