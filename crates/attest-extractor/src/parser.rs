//! Parse generator output into fact texts

/// Markers stripped from the start of a line
const BULLETS: [char; 3] = ['•', '-', '*'];

/// Split generator output into one fact text per non-empty line
///
/// Leading bullet markers (`•`, `-`, `*`) and `"<digits>. "` enumeration
/// prefixes are removed.
pub fn parse_fact_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn clean_line(line: &str) -> &str {
    let line = line.trim();
    let line = line.strip_prefix(BULLETS).map(str::trim_start).unwrap_or(line);
    strip_enumeration(line).trim()
}

/// Remove a `"<digits>. "` prefix, if present
fn strip_enumeration(line: &str) -> &str {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return line;
    }
    line[digits..].strip_prefix(". ").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines() {
        let facts = parse_fact_lines("Paris is in France.\nRome is in Italy.");
        assert_eq!(facts, vec!["Paris is in France.", "Rome is in Italy."]);
    }

    #[test]
    fn test_bullets_stripped() {
        let facts = parse_fact_lines("• First\n- Second\n* Third\n  -   Fourth  ");
        assert_eq!(facts, vec!["First", "Second", "Third", "Fourth"]);
    }

    #[test]
    fn test_enumeration_stripped() {
        let facts = parse_fact_lines("1. First\n2. Second\n10. Tenth");
        assert_eq!(facts, vec!["First", "Second", "Tenth"]);
    }

    #[test]
    fn test_numbers_that_are_not_prefixes_survive() {
        let facts = parse_fact_lines("1889 was the year.\n3.5 million people live there.");
        assert_eq!(facts, vec!["1889 was the year.", "3.5 million people live there."]);
    }

    #[test]
    fn test_empty_lines_dropped() {
        let facts = parse_fact_lines("\n\nFirst\n   \n-\nSecond\n\n");
        assert_eq!(facts, vec!["First", "Second"]);
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_fact_lines("").is_empty());
        assert!(parse_fact_lines("   \n  ").is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let facts = parse_fact_lines("- First\r\n- Second\r\n");
        assert_eq!(facts, vec!["First", "Second"]);
    }
}
