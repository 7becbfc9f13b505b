//! Turns captured program text into a scalar or a table.
//!
//! The table guess is a convenience, not a Dart parser: text wrapped in
//! matching `()`, `[]` or `{}` whose interior splits cleanly on commas
//! becomes rows of cells. Everything else stays a string.

use serde::Serialize;

use crate::directives::ResultFormat;

/// The value handed back to the host document.
///
/// Serializes as a JSON string or as an array of row arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ShapedResult {
    /// Captured text, unchanged.
    Scalar(String),
    /// Rows of cells, in output order. Rows may differ in length.
    Table(Vec<Vec<String>>),
}

impl ShapedResult {
    /// The text, when the result stayed a string.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ShapedResult::Scalar(s) => Some(s),
            ShapedResult::Table(_) => None,
        }
    }

    /// The rows, when the result was recognized as a table.
    pub fn as_table(&self) -> Option<&[Vec<String>]> {
        match self {
            ShapedResult::Table(rows) => Some(rows),
            ShapedResult::Scalar(_) => None,
        }
    }
}

/// Shape `raw_text` according to the `:results` flags.
pub fn shape(raw_text: &str, format: &ResultFormat) -> ShapedResult {
    if format.forces_scalar() {
        return ShapedResult::Scalar(raw_text.to_string());
    }
    match parse_table(raw_text) {
        Some(rows) => {
            tracing::debug!(rows = rows.len(), "result looks tabular");
            ShapedResult::Table(rows)
        }
        None => ShapedResult::Scalar(raw_text.to_string()),
    }
}

/// Strip a single trailing line terminator (`\n` or `\r\n`).
pub fn trim_trailing_newline(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

#[derive(Debug, PartialEq)]
enum Node {
    Atom(String),
    Group(Vec<Node>),
}

fn parse_table(text: &str) -> Option<Vec<Vec<String>>> {
    let trimmed = text.trim();
    if !trimmed.starts_with(['(', '[', '{']) {
        return None;
    }
    let mut parser = Parser { chars: trimmed.chars().collect(), pos: 0 };
    let root = parser.group(1)?;
    if parser.pos != parser.chars.len() {
        return None;
    }
    into_rows(root)
}

fn into_rows(root: Vec<Node>) -> Option<Vec<Vec<String>>> {
    if root.is_empty() {
        return None;
    }
    if root.iter().all(|n| matches!(n, Node::Atom(_))) {
        return Some(vec![atoms(root)?]);
    }
    root.into_iter()
        .map(|n| match n {
            Node::Group(cells) if !cells.is_empty() => atoms(cells),
            _ => None,
        })
        .collect()
}

fn atoms(nodes: Vec<Node>) -> Option<Vec<String>> {
    nodes
        .into_iter()
        .map(|n| match n {
            Node::Atom(s) => Some(s),
            Node::Group(_) => None,
        })
        .collect()
}

/// A table is at most a group of rows, each a group of cells.
const MAX_DEPTH: usize = 2;

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Parses a delimited group starting at the opening delimiter.
    ///
    /// Groups nested deeper than rows of cells can never form a table, so
    /// parsing stops there instead of recursing further.
    fn group(&mut self, depth: usize) -> Option<Vec<Node>> {
        if depth > MAX_DEPTH {
            return None;
        }
        let close = match self.peek()? {
            '(' => ')',
            '[' => ']',
            '{' => '}',
            _ => return None,
        };
        self.pos += 1;
        self.skip_ws();
        let mut items = Vec::new();
        if self.peek() == Some(close) {
            self.pos += 1;
            return Some(items);
        }
        loop {
            items.push(self.item(depth)?);
            self.skip_ws();
            match self.peek()? {
                ',' => self.pos += 1,
                c if c == close => {
                    self.pos += 1;
                    return Some(items);
                }
                _ => return None,
            }
        }
    }

    fn item(&mut self, depth: usize) -> Option<Node> {
        self.skip_ws();
        match self.peek()? {
            '(' | '[' | '{' => self.group(depth + 1).map(Node::Group),
            q @ ('"' | '\'') => self.quoted(q).map(Node::Atom),
            _ => self.bare().map(Node::Atom),
        }
    }

    fn quoted(&mut self, quote: char) -> Option<String> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.peek()? {
                '\\' => {
                    self.pos += 1;
                    out.push(self.peek()?);
                }
                c if c == quote => {
                    self.pos += 1;
                    return Some(out);
                }
                c => out.push(c),
            }
            self.pos += 1;
        }
    }

    fn bare(&mut self) -> Option<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            match c {
                ',' | ')' | ']' | '}' => break,
                '(' | '[' | '{' | '"' | '\'' => return None,
                _ => self.pos += 1,
            }
        }
        let cell: String = self.chars[start..self.pos].iter().collect();
        let cell = cell.trim();
        if cell.is_empty() {
            None
        } else {
            Some(cell.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> ShapedResult {
        shape(text, &ResultFormat::default())
    }

    fn table(rows: &[&[&str]]) -> ShapedResult {
        ShapedResult::Table(
            rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect(),
        )
    }

    #[test]
    fn single_group_is_one_row() {
        assert_eq!(plain("(1, 2, 3)"), table(&[&["1", "2", "3"]]));
        assert_eq!(plain("  [a, b]\n"), table(&[&["a", "b"]]));
    }

    #[test]
    fn nested_groups_are_rows() {
        assert_eq!(plain("[[1, 2], [3, 4]]"), table(&[&["1", "2"], &["3", "4"]]));
        assert_eq!(plain("[(1), [2, 3]]"), table(&[&["1"], &["2", "3"]]));
    }

    #[test]
    fn quoted_cells_keep_commas() {
        assert_eq!(plain(r#"["a, b", 'c']"#), table(&[&["a, b", "c"]]));
        assert_eq!(plain(r#"["say \"hi\""]"#), table(&[&["say \"hi\""]]));
    }

    #[test]
    fn dart_map_and_set_literals() {
        assert_eq!(plain("{a: 1, b: 2}"), table(&[&["a: 1", "b: 2"]]));
        assert_eq!(plain("{1, 2}"), table(&[&["1", "2"]]));
    }

    #[test]
    fn non_tables_stay_scalar() {
        for text in [
            "hello world",
            "42",
            "",
            "[]",
            "[1, [2, 3]]",
            "[[[1]]]",
            "[1, , 2]",
            "[1, 2",
            "(1, 2]",
            "(1, 2) + (3)",
            "[[1], []]",
            "[a(b), c]",
        ] {
            assert_eq!(plain(text), ShapedResult::Scalar(text.to_string()), "{:?}", text);
        }
    }

    #[test]
    fn raw_flag_returns_text_untouched() {
        for text in ["(1, 2, 3)", "hi\n", "", "  [[1]]  "] {
            assert_eq!(shape(text, &ResultFormat::raw()), ShapedResult::Scalar(text.to_string()));
        }
    }

    #[test]
    fn deep_nesting_falls_back_to_scalar() {
        let deep = "[".repeat(20_000) + &"]".repeat(20_000);
        assert_eq!(plain(&deep), ShapedResult::Scalar(deep.clone()));

        let unbalanced = "(".repeat(50_000);
        assert_eq!(plain(&unbalanced), ShapedResult::Scalar(unbalanced.clone()));

        let wide = format!("[{}]", vec!["[[1]]"; 1_000].join(", "));
        assert_eq!(plain(&wide), ShapedResult::Scalar(wide.clone()));
    }

    #[test]
    fn scalar_forcing_results_words_skip_tables() {
        for word in ["scalar", "verbatim", "pp", "code", "html", "latex", "org", "drawer", "file", "link"] {
            let mut d = crate::directives::Directives::default();
            d.apply_results_words(&format!("value {}", word));
            assert_eq!(
                shape("[1, 2]", &d.result_format),
                ShapedResult::Scalar("[1, 2]".to_string()),
                "{}",
                word
            );
        }
    }

    #[test]
    fn raw_shaping_of_a_scalar_is_idempotent() {
        let first = plain("hello world");
        let s = first.as_scalar().unwrap();
        assert_eq!(shape(s, &ResultFormat::raw()).as_scalar(), Some(s));
    }

    #[test]
    fn trims_one_trailing_newline() {
        assert_eq!(trim_trailing_newline("hi\n"), "hi");
        assert_eq!(trim_trailing_newline("hi\r\n"), "hi");
        assert_eq!(trim_trailing_newline("hi\n\n"), "hi\n");
        assert_eq!(trim_trailing_newline("hi"), "hi");
    }

    #[test]
    fn tables_serialize_as_nested_arrays() {
        let json = serde_json::to_string(&plain("[1, 2]")).unwrap();
        assert_eq!(json, r#"[["1","2"]]"#);
        let json = serde_json::to_string(&plain("x")).unwrap();
        assert_eq!(json, r#""x""#);
    }
}
