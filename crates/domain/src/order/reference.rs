use crate::error::OrderError;

/// Returns the trailing `[A-Za-z0-9_-]+` segment of a resource reference.
///
/// `http://user/customers/abc-123` yields `abc-123`. A reference that ends in
/// any other character, such as a trailing slash, has no identifier.
pub fn extract_id(reference: &str) -> Result<String, OrderError> {
    let is_id_char = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
    let start = reference
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_id_char(*c))
        .last()
        .map(|(i, _)| i);

    match start {
        Some(i) => Ok(reference[i..].to_string()),
        None => Err(OrderError::MalformedReference(format!(
            "Invalid ID format: {reference}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_trailing_segment() {
        assert_eq!(
            extract_id("http://svc/customers/abc-123").unwrap(),
            "abc-123"
        );
        assert_eq!(
            extract_id("http://user/customers/57a98d98e4b00679b4a830b2").unwrap(),
            "57a98d98e4b00679b4a830b2"
        );
    }

    #[test]
    fn test_bare_identifier() {
        assert_eq!(extract_id("Eve_Berger").unwrap(), "Eve_Berger");
    }

    #[test]
    fn test_trailing_slash_is_malformed() {
        assert!(matches!(
            extract_id("http://svc/customers/"),
            Err(OrderError::MalformedReference(_))
        ));
    }

    #[test]
    fn test_empty_and_punctuation_are_malformed() {
        assert!(extract_id("").is_err());
        assert!(extract_id("http://svc/customers/abc?").is_err());
    }

    #[test]
    fn test_non_ascii_stops_the_segment() {
        assert_eq!(extract_id("http://svc/é-42").unwrap(), "-42");
    }
}
