//! Query normalization and prompt answer parsing.

use super::error::FlowError;

/// Characters deleted from free-text search queries
pub const ILLEGAL_CHARS: [char; 30] = [
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '-', '_', '=', '+', '[', ']', '{', '}', ';',
    ':', '\'', '"', ',', '<', '>', '.', '?', '/', '\\', '|',
];

/// Delete every illegal character; everything else (whitespace included) is kept.
pub fn normalize_query(raw: &str) -> String {
    raw.chars().filter(|c| !ILLEGAL_CHARS.contains(c)).collect()
}

/// `y` / `yes` in any case; anything else is a no
pub fn parse_yes_no(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn parse_number(field: &'static str, answer: &str) -> Result<usize, FlowError> {
    answer
        .trim()
        .parse::<usize>()
        .map_err(|_| FlowError::InvalidNumber {
            field,
            input: answer.to_string(),
        })
}

/// A positive count such as the number of search results
pub fn parse_count(field: &'static str, answer: &str) -> Result<usize, FlowError> {
    match parse_number(field, answer)? {
        0 => Err(FlowError::NonPositive { field }),
        n => Ok(n),
    }
}

/// A 1-based index into a list of `len` entries, returned 1-based
pub fn parse_index(field: &'static str, answer: &str, len: usize) -> Result<usize, FlowError> {
    let index = parse_number(field, answer)?;
    if index == 0 || index > len {
        return Err(FlowError::IndexOutOfRange { field, index, len });
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_removes_every_illegal_char() {
        let raw: String = ILLEGAL_CHARS.iter().collect();
        assert_eq!(normalize_query(&raw), "");

        assert_eq!(
            normalize_query("AC/DC - Back In Black (Official Video)!"),
            "ACDC  Back In Black Official Video"
        );
    }

    #[test]
    fn test_normalize_keeps_whitespace_and_unicode() {
        assert_eq!(normalize_query("  tab\there  "), "  tab\there  ");
        assert_eq!(normalize_query("café naïve ~`"), "café naïve ~`");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_query("what's \"up\"? [live] {2024} <remix> a|b c\\d");
        assert_eq!(normalize_query(&once), once);
        assert_eq!(once, "whats up live 2024 remix ab cd");
    }

    #[test]
    fn test_yes_no() {
        assert!(parse_yes_no("y"));
        assert!(parse_yes_no(" YES "));
        assert!(!parse_yes_no("n"));
        assert!(!parse_yes_no(""));
        assert!(!parse_yes_no("yep"));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("result count", " 5 ").unwrap(), 5);
        assert!(matches!(
            parse_count("result count", "0"),
            Err(FlowError::NonPositive { .. })
        ));
        assert!(matches!(
            parse_count("result count", "five"),
            Err(FlowError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_count("result count", "-2"),
            Err(FlowError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("result", "3", 3).unwrap(), 3);
        assert!(matches!(
            parse_index("result", "4", 3),
            Err(FlowError::IndexOutOfRange { index: 4, len: 3, .. })
        ));
        assert!(matches!(
            parse_index("result", "0", 3),
            Err(FlowError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            parse_index("result", "1.5", 3),
            Err(FlowError::InvalidNumber { .. })
        ));
    }
}
