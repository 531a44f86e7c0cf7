use rand::Rng;

/// Generate a short student code, e.g. "S-493027". Uniqueness is
/// enforced by the callers against the users table.
pub fn generate_user_code() -> String {
    let mut rng = rand::rng();
    format!("S-{:06}", rng.random_range(100000..999999))
}

/// Split a comma-separated code list into trimmed, de-duplicated codes,
/// preserving first-seen order. Empty segments are dropped.
pub fn parse_user_codes(raw: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.split(',')
        .map(|code| code.trim())
        .filter(|code| !code.is_empty())
        .filter(|code| seen.insert(code.to_string()))
        .map(|code| code.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_code_has_expected_shape() {
        let code = generate_user_code();
        assert!(code.starts_with("S-"));
        assert_eq!(code.len(), 8);
    }

    #[test]
    fn parse_trims_and_dedupes() {
        let codes = parse_user_codes(" S-000001, S-000002 ,,S-000001, ");
        assert_eq!(codes, vec!["S-000001", "S-000002"]);
    }

    #[test]
    fn parse_empty_input() {
        assert!(parse_user_codes("").is_empty());
        assert!(parse_user_codes(" , ,").is_empty());
    }
}
