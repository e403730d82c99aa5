// src/utils/html.rs

/// Sanitises admin-entered text before it is stored and later shown to students.
///
/// Whitelist-based: safe inline tags survive, `<script>` and friends are
/// removed together with their content, event-handler attributes are dropped.
/// Surrounding whitespace is trimmed.
///
/// The same function must be applied to options and correct answers so that
/// both sides of a comparison are escaped identically.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input.trim())
}

/// [`clean_html`] over a list, dropping entries that end up empty.
pub fn clean_all(inputs: &[String]) -> Vec<String> {
    inputs
        .iter()
        .map(|s| clean_html(s))
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_script() {
        assert_eq!(clean_html("Wages<script>alert(1)</script>"), "Wages");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(clean_html("  Assets = Liabilities + Equity "), "Assets = Liabilities + Equity");
    }

    #[test]
    fn test_clean_all_drops_empty() {
        let cleaned = clean_all(&["A".to_string(), "<script>x</script>".to_string(), " ".to_string()]);
        assert_eq!(cleaned, vec!["A".to_string()]);
    }
}
