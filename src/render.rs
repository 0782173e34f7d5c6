use crate::request::{ListKind, RequestConfig};
use crate::result_set::{Record, ResultSet};

use std::fmt::Write;

const MAX_CELL_WIDTH: usize = 40;

fn truncate(cell: &str) -> String {
    let flat = cell.replace(['\n', '\r', '\t'], " ");
    if flat.chars().count() <= MAX_CELL_WIDTH {
        flat
    } else {
        let mut cut: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
        cut.push('…');
        cut
    }
}

pub fn render_page(results: &ResultSet) -> String {
    if results.is_empty() {
        return "No data.\n".to_string();
    }

    let columns = results.columns();
    let cells: Vec<Vec<String>> = results
        .current_page_rows()
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| truncate(row.get(c).map(String::as_str).unwrap_or("")))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(truncate(c).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let line = |out: &mut String, values: Vec<String>| {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{v:<w$}"))
            .collect();
        let _ = writeln!(out, "| {} |", padded.join(" | "));
    };

    line(&mut out, columns.iter().map(|c| truncate(c)).collect());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "|-{}-|", rule.join("-|-"));
    for row in cells {
        line(&mut out, row);
    }

    let _ = writeln!(
        out,
        "Page {}/{} · {} per page · {} rows",
        results.current_page(),
        results.total_pages(),
        results.page_size(),
        results.len()
    );
    out
}

pub fn render_record(record: &Record) -> String {
    let width = record.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    record
        .iter()
        .map(|(k, v)| format!("{k:>width$}: {v}\n"))
        .collect()
}

pub fn render_config(config: &RequestConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", config.method(), config.url());
    let options: Vec<&str> = config
        .method()
        .body_encodings()
        .iter()
        .map(|e| e.as_str())
        .collect();
    let _ = writeln!(
        out,
        "Body encoding: {} ({})",
        config.body_encoding(),
        options.join(", ")
    );

    for kind in ListKind::ALL {
        out.push_str(&render_list(config, kind));
    }
    out
}

pub fn render_list(config: &RequestConfig, kind: ListKind) -> String {
    let list = config.list(kind);
    if list.is_empty() {
        return format!("{}: (none)\n", kind.label());
    }
    let mut out = format!("{}:\n", kind.label());
    for entry in list.iter() {
        let _ = writeln!(out, "  [{}] {} = {}", entry.id(), entry.key(), entry.value());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_results_render_no_data() {
        assert_eq!(render_page(&ResultSet::new(vec![])), "No data.\n");
    }

    #[test]
    fn page_renders_aligned_table_and_footer() {
        let rows = (1..=7)
            .map(|i| record(&[("id", &i.to_string()), ("title", "abc")]))
            .collect();
        let mut results = ResultSet::new(rows);
        results.next();

        let text = render_page(&results);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "| id | title |");
        assert_eq!(lines[1], "|----|-------|");
        assert_eq!(lines[2], "| 6  | abc   |");
        assert_eq!(lines[3], "| 7  | abc   |");
        assert_eq!(lines[4], "Page 2/2 · 5 per page · 7 rows");
    }

    #[test]
    fn long_cells_are_truncated() {
        let long = "x".repeat(100);
        let results = ResultSet::new(vec![record(&[("body", &long)])]);
        let text = render_page(&results);
        let first_row = text.lines().nth(2).unwrap();
        assert!(first_row.contains(&format!("{}…", "x".repeat(39))));
        assert!(!first_row.contains(&"x".repeat(41)));
    }

    #[test]
    fn record_renders_key_value_lines() {
        let text = render_record(&record(&[("id", "1"), ("title", "hello")]));
        assert_eq!(text, "   id: 1\ntitle: hello\n");
    }

    #[test]
    fn config_lists_entries_with_ids() {
        let mut config = RequestConfig::new("http://localhost/posts");
        config.set_method(Method::Post);
        config.list_mut(ListKind::Headers).push("Accept", "application/json");

        let text = render_config(&config);
        assert!(text.starts_with("POST http://localhost/posts\n"));
        assert!(text.contains("Body encoding: JSON (x-www-form-urlencoded, Form Data, JSON, Form, Raw, None)"));
        assert!(text.contains("Headers:\n  [0] Accept = application/json\n"));
        assert!(text.contains("Cookies: (none)\n"));
    }

    #[test]
    fn list_renders_only_its_own_entries() {
        let mut config = RequestConfig::default();
        config.list_mut(ListKind::Params).push("userId", "1");
        config.list_mut(ListKind::Headers).push("Accept", "text/csv");

        assert_eq!(
            render_list(&config, ListKind::Params),
            "Params:\n  [0] userId = 1\n"
        );
        assert_eq!(render_list(&config, ListKind::Body), "Body: (none)\n");
    }
}
