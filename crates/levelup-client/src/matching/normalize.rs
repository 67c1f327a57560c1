/// Lower-cases, trims, and collapses internal whitespace runs to one space.
pub fn normalize(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    for token in value.split_whitespace() {
        if !output.is_empty() {
            output.push(' ');
        }
        output.extend(token.chars().flat_map(char::to_lowercase));
    }
    output
}

/// First `depth` words of an already-normalized description.
pub fn word_prefix(normalized: &str, depth: usize) -> Option<String> {
    if depth == 0 || normalized.is_empty() {
        return None;
    }
    let words = normalized.split(' ').take(depth).collect::<Vec<&str>>();
    Some(words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::{normalize, word_prefix};

    #[test]
    fn normalize_lowercases_trims_and_collapses_whitespace() {
        assert_eq!(normalize("  TRADER   Joes\t#123 \n"), "trader joes #123");
    }

    #[test]
    fn normalize_of_empty_or_blank_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n "), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for value in [
            "Amazon Web  Services",
            "  UBER *TRIP  ",
            "",
            "Café   DU Monde",
            "a\u{00a0}b",
        ] {
            let once = normalize(value);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn word_prefix_takes_at_most_depth_words() {
        let normalized = normalize("Amazon Web Services AWS.Amazon.com");
        assert_eq!(
            word_prefix(&normalized, 3),
            Some("amazon web services".to_string())
        );
        assert_eq!(word_prefix(&normalized, 2), Some("amazon web".to_string()));
        assert_eq!(word_prefix(&normalized, 1), Some("amazon".to_string()));
        assert_eq!(word_prefix("netflix", 3), Some("netflix".to_string()));
        assert_eq!(word_prefix("", 3), None);
    }
}
