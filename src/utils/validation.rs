use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

/// Lowercase words of letters and digits joined by single dashes.
static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

pub fn is_kebab_case(value: &str) -> bool {
    SLUG_PATTERN.is_match(value)
}

pub fn validate_slug(value: &String) -> Result<(), ValidationError> {
    if is_kebab_case(value) {
        Ok(())
    } else {
        let mut error = ValidationError::new("slug_format");
        error.message = Some(std::borrow::Cow::from("Format of the slug is incorrect."));
        Err(error)
    }
}

pub fn validate_not_blank(value: &String) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("is_required");
        error.message = Some(std::borrow::Cow::from("This field is required"));
        Err(error)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case_slugs() {
        assert!(is_kebab_case("season-opening-2024"));
        assert!(is_kebab_case("premiere"));
        assert!(is_kebab_case("a1-b2"));

        assert!(!is_kebab_case(""));
        assert!(!is_kebab_case("Season-Opening"));
        assert!(!is_kebab_case("double--dash"));
        assert!(!is_kebab_case("-leading"));
        assert!(!is_kebab_case("trailing-"));
        assert!(!is_kebab_case("with space"));
        assert!(!is_kebab_case("snake_case"));
    }

    #[test]
    fn test_validate_slug_message() {
        let err = validate_slug(&"Bad Slug".to_string()).unwrap_err();
        assert_eq!(err.code, "slug_format");
        assert_eq!(
            err.message.as_deref(),
            Some("Format of the slug is incorrect.")
        );
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank(&"   ".to_string()).is_err());
        assert!(validate_not_blank(&"opera".to_string()).is_ok());
    }
}
