//! Plain-text rendering for query output
//!
//! Every helper returns a `String` so callers decide where it goes.

use serde_json::Value;

const WIDTH: usize = 70;
const MAX_COLUMN_WIDTH: usize = 50;

/// Shown for null values
pub const NULL: &str = "\u{2014}";
const ELLIPSIS: char = '\u{2026}';

/// Section header with title and description.
pub fn header(title: &str, description: &str) -> String {
    let rule = "=".repeat(WIDTH);
    format!("\n{rule}\n  {title}\n{rule}\n\n  {description}\n\n")
}

pub fn banner(text: &str) -> String {
    let rule = "#".repeat(WIDTH);
    format!("\n{rule}\n  {text}\n{rule}\n")
}

/// Echo a Cypher query with its common leading indentation removed.
pub fn cypher(query: &str) -> String {
    let lines: Vec<&str> = query
        .trim_end()
        .trim_start_matches(['\n', '\r'])
        .lines()
        .collect();
    let base = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = String::from("  Cypher:\n");
    for line in lines {
        out.push_str("    ");
        out.push_str(line.get(base..).unwrap_or(""));
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Cut `s` to at most `max_len` characters, marking the cut with `…`.
pub fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 || s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max_len - 1).collect();
    cut.push(ELLIPSIS);
    cut
}

/// Display form of a query value; `max_len` of 0 means no limit.
pub fn val(value: &Value, max_len: usize) -> String {
    let s = match value {
        Value::Null => NULL.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|v| val(v, 0))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    };
    truncate(&s, max_len)
}

/// Similarity scores with four decimals.
pub fn score(value: &Value) -> String {
    match value.as_f64() {
        Some(f) => format!("{:.4}", f),
        None => val(value, 0),
    }
}

/// Table with auto-sized columns (header or widest cell + 1, capped at 50).
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "  (no results)\n\n".to_string();
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let widest = rows
                .iter()
                .map(|r| r.get(i).map_or(0, |c| c.chars().count()))
                .fold(h.chars().count(), usize::max);
            (widest + 1).min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let mut out = String::new();
    let head: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", h, w = w))
        .collect();
    out.push_str(&format!("  {}\n", head.join("  ")));

    let rules: Vec<String> = widths.iter().map(|w| "\u{2500}".repeat(*w)).collect();
    out.push_str(&format!("  {}\n", rules.join("  ")));

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", truncate(cell, *w), w = w))
            .collect();
        out.push_str(&format!("  {}\n", cells.join("  ")));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_layout() {
        let h = header("1. Product Overview", "Products and domains.");
        let lines: Vec<&str> = h.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(70));
        assert_eq!(lines[2], "  1. Product Overview");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "  Products and domains.");
    }

    #[test]
    fn test_cypher_strips_common_indent() {
        let q = "\n        MATCH (n)\n          WHERE n.x = 1\n        RETURN n\n";
        assert_eq!(
            cypher(q),
            "  Cypher:\n    MATCH (n)\n      WHERE n.x = 1\n    RETURN n\n\n"
        );
    }

    #[test]
    fn test_val_formats_nulls_lists_and_truncates() {
        assert_eq!(val(&Value::Null, 0), "\u{2014}");
        assert_eq!(val(&json!(["a", "b"]), 0), "a, b");
        assert_eq!(val(&json!(42), 0), "42");
        assert_eq!(val(&json!("abcdefgh"), 5), "abcd\u{2026}");
        assert_eq!(val(&json!("abc"), 5), "abc");
    }

    #[test]
    fn test_score_has_four_decimals() {
        assert_eq!(score(&json!(0.912345)), "0.9123");
        assert_eq!(score(&Value::Null), "\u{2014}");
    }

    #[test]
    fn test_table_widths_and_truncation() {
        let long = "x".repeat(80);
        let rows = vec![
            vec!["p_1".to_string(), "Sedan".to_string()],
            vec!["p_2".to_string(), long],
        ];
        let t = table(&["ID", "Name"], &rows);
        let lines: Vec<&str> = t.lines().collect();

        // ID column: "p_1" + 1 = 4 wide; Name column capped at 50
        assert_eq!(lines[0], format!("  ID    {:<50}", "Name"));
        assert_eq!(lines[1], format!("  {}  {}", "\u{2500}".repeat(4), "\u{2500}".repeat(50)));
        assert!(lines[3].ends_with('\u{2026}'));
        assert_eq!(lines[3].chars().count(), 2 + 4 + 2 + 50);
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(table(&["A"], &[]), "  (no results)\n\n");
    }
}
