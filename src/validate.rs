//! Request field validation for the function endpoints. Failures collect per
//! field and join into a single message for the 400 response body.

use uuid::Uuid;

pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        let ok = value.len() <= 254
            && value.split('@').count() == 2
            && value.split('@').all(|part| {
                !part.is_empty() && !part.starts_with('.') && !part.ends_with('.')
            })
            && value.rsplit('@').next().is_some_and(|d| d.contains('.'))
            && !value.chars().any(char::is_whitespace);
        if !ok {
            self.errors.push(format!("{field}: invalid email address"));
        }
        self
    }

    pub fn max_len(&mut self, field: &str, value: &str, cap: usize) -> &mut Self {
        if value.len() > cap {
            self.errors
                .push(format!("{field}: exceeds {cap} characters"));
        }
        self
    }

    pub fn non_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(format!("{field}: must not be empty"));
        }
        self
    }

    pub fn uuid(&mut self, field: &str, value: &str) -> &mut Self {
        if Uuid::parse_str(value).is_err() {
            self.errors.push(format!("{field}: not a valid UUID"));
        }
        self
    }

    pub fn one_of(&mut self, field: &str, value: &str, allowed: &[&str]) -> &mut Self {
        if !allowed.contains(&value) {
            self.errors
                .push(format!("{field}: must be one of {}", allowed.join(", ")));
        }
        self
    }

    pub fn max_items<T>(&mut self, field: &str, values: &[T], cap: usize) -> &mut Self {
        if values.len() > cap {
            self.errors.push(format!("{field}: at most {cap} items"));
        }
        self
    }

    /// Joined field/message string, None when everything passed.
    pub fn finish(&self) -> Option<String> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self.errors.join("; "))
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email_passes() {
        let mut v = Validator::new();
        v.email("email", "guest@example.com");
        assert_eq!(v.finish(), None);
    }

    #[test]
    fn test_invalid_emails_fail() {
        for bad in [
            "",
            "no-at-sign",
            "two@@ats.com",
            "white space@example.com",
            "@example.com",
            "user@",
            "user@nodot",
            "user@.leading.dot",
        ] {
            let mut v = Validator::new();
            v.email("email", bad);
            assert!(v.finish().is_some(), "expected failure for {bad:?}");
        }
    }

    #[test]
    fn test_length_cap() {
        let mut v = Validator::new();
        v.max_len("name", &"x".repeat(101), 100);
        assert_eq!(v.finish(), Some("name: exceeds 100 characters".to_string()));
    }

    #[test]
    fn test_uuid_format() {
        let mut v = Validator::new();
        v.uuid("property_id", "11111111-1111-1111-1111-111111111111");
        assert_eq!(v.finish(), None);

        let mut v = Validator::new();
        v.uuid("property_id", "not-a-uuid");
        assert!(v.finish().is_some());
    }

    #[test]
    fn test_array_cap() {
        let mut v = Validator::new();
        v.max_items("items", &[1, 2, 3], 2);
        assert_eq!(v.finish(), Some("items: at most 2 items".to_string()));
    }

    #[test]
    fn test_errors_join_across_fields() {
        let mut v = Validator::new();
        v.email("email", "bad").non_empty("role", "  ");
        let msg = v.finish().expect("should fail");
        assert!(msg.contains("email:"));
        assert!(msg.contains("role:"));
        assert!(msg.contains("; "));
    }
}
