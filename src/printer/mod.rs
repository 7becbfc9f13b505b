//! Printers: plain text, org-style tables and JSON.

use owo_colors::OwoColorize;

use crate::shape::ShapedResult;

pub struct TextPrinter {
    pub color: Option<&'static str>,
}

impl TextPrinter {
    pub fn print(&self, text: &str) {
        println!("{}", self.paint(text));
    }

    pub fn eprint(&self, text: &str) {
        eprintln!("{}", self.paint(text));
    }

    fn paint(&self, text: &str) -> String {
        match self.color {
            Some("green") => text.green().to_string(),
            Some("red") => text.red().to_string(),
            Some("yellow") => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Render a shaped result the way it would land in the document.
pub fn render_result(result: &ShapedResult) -> String {
    match result {
        ShapedResult::Scalar(s) => s.clone(),
        ShapedResult::Table(rows) => render_table(rows),
    }
}

/// `| a | b |` rows with columns padded to a common width.
pub fn render_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for (n, row) in rows.iter().enumerate() {
        if n > 0 {
            out.push('\n');
        }
        out.push('|');
        for (i, width) in widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            let pad = width - cell.chars().count();
            out.push(' ');
            out.push_str(cell);
            out.push_str(&" ".repeat(pad));
            out.push_str(" |");
        }
    }
    out
}

pub fn render_json(result: &ShapedResult) -> serde_json::Result<String> {
    serde_json::to_string(result)
}
