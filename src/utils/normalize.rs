//! Input normalization applied before guest lookups and gift records are
//! written, so stored data stays in one consistent format.

/// Normalizes a name to title case with trimmed, collapsed whitespace.
/// Capitalization restarts after spaces, hyphens, and apostrophes:
/// `"  JOHN  DOE  "` -> `"John Doe"`, `"o'brien"` -> `"O'Brien"`.
pub fn normalize_name(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut out = String::with_capacity(collapsed.len());
    let mut start_of_word = true;
    for c in collapsed.chars() {
        if c == ' ' || c == '-' || c == '\'' {
            out.push(c);
            start_of_word = true;
        } else if start_of_word {
            out.extend(c.to_uppercase());
            start_of_word = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Strips all non-digit characters and formats as (XXX) XXX-XXXX.
/// Accepts various formats: 5551234567, 555-123-4567, (555) 123-4567,
/// +1 555 123 4567, etc. Returns the input unchanged if it does not reduce
/// to a 10-digit US number (might be international).
pub fn normalize_phone(phone: &str) -> String {
    if phone.is_empty() {
        return String::new();
    }

    let mut digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // 11 digits starting with 1 is a US number with country code
    if digits.len() == 11 && digits.starts_with('1') {
        digits.remove(0);
    }

    if digits.len() != 10 {
        return phone.to_string();
    }

    format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10])
}

/// Normalizes an email to lowercase with trimmed whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
