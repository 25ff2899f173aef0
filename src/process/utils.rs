/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Column names from a CSV header line. Blank names become `column_<position>`.
pub fn header_names(line: &str) -> Vec<String> {
    line.trim_end_matches(['\r', '\n'])
        .split(',')
        .enumerate()
        .map(|(i, raw)| {
            let name = clean_str(raw);
            if name.is_empty() {
                format!("column_{}", i)
            } else {
                name
            }
        })
        .collect()
}

/// Treat empty cells as missing.
pub fn non_empty(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_quotes() {
        assert_eq!(clean_str("  \"Subscriber\" "), "Subscriber");
        assert_eq!(clean_str("\""), "\"");
    }

    #[test]
    fn header_names_fill_blanks() {
        assert_eq!(
            header_names(",Start Time,End Station\r\n"),
            vec!["column_0", "Start Time", "End Station"]
        );
    }

    #[test]
    fn non_empty_filters_blank() {
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some(" 7 ")), Some("7"));
        assert_eq!(non_empty(None), None);
    }
}
