//! Parsing of delimited or JSON-encoded list cells.

/// Splits a list cell into trimmed, non-empty elements.
///
/// A bracketed cell is first tried as a JSON array; malformed JSON degrades
/// to a plain delimiter split instead of failing the batch. Plain cells are
/// split on `;` or `,`.
pub fn parse_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        if let Ok(values) = serde_json::from_str::<Vec<serde_json::Value>>(trimmed) {
            return values
                .into_iter()
                .map(|v| match v {
                    serde_json::Value::String(s) => s.trim().to_string(),
                    other => other.to_string(),
                })
                .filter(|s| !s.is_empty())
                .collect();
        }
        // Fall through: treat the bracketed content as a delimited list.
        let inner = &trimmed[1..trimmed.len() - 1];
        return split_delimited(inner);
    }

    split_delimited(trimmed)
}

fn split_delimited(raw: &str) -> Vec<String> {
    raw.split([';', ','])
        .map(|s| s.trim().trim_matches(['"', '\'']).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Joins elements back with the given delimiter. Inverse of [`parse_list`]
/// for inputs without embedded delimiters.
pub fn join_list(elements: &[String], delimiter: char) -> String {
    elements.join(&delimiter.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(raw: &str) -> Vec<String> {
        parse_list(raw)
    }

    #[test]
    fn splits_on_semicolon_and_comma() {
        assert_eq!(parsed("A;B;C"), vec!["A", "B", "C"]);
        assert_eq!(parsed("A, B ,C"), vec!["A", "B", "C"]);
    }

    #[test]
    fn drops_empty_elements() {
        assert_eq!(parsed("A;;B; ;C"), vec!["A", "B", "C"]);
        assert!(parsed("").is_empty());
        assert!(parsed("  ;  ").is_empty());
    }

    #[test]
    fn parses_json_arrays() {
        assert_eq!(parsed(r#"["A", "B", "C"]"#), vec!["A", "B", "C"]);
        assert_eq!(parsed(r#"[" A ", "B"]"#), vec!["A", "B"]);
    }

    #[test]
    fn malformed_json_degrades_to_delimiter_split() {
        // Missing closing quote: not valid JSON, still salvageable.
        assert_eq!(parsed(r#"["A", "B]"#), vec!["A", "B"]);
        assert_eq!(parsed("[A;B;C]"), vec!["A", "B", "C"]);
    }

    #[test]
    fn round_trip_without_embedded_delimiters() {
        let original = "A; B ;C";
        let elements = parsed(original);
        assert_eq!(join_list(&elements, ';'), "A;B;C");
        assert_eq!(parsed(&join_list(&elements, ';')), elements);
    }
}
