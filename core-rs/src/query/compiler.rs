//! Query text generation
//!
//! Clause order is fixed: prefixes, head (`SELECT`/`DESCRIBE`), `WHERE` block
//! (required patterns, optional blocks, filters), `ORDER BY`, `LIMIT`.
//! Compilation only reads the query, so compiling twice yields identical text.

use crate::query::builder::{Direction, Query, QueryForm};

/// Compact form: all clauses on one line separated by single spaces
pub fn compile(query: &Query) -> String {
    let prefixes = query.prefixes();
    let mut parts: Vec<String> = Vec::new();

    for (alias, namespace) in prefixes.iter() {
        parts.push(format!("PREFIX {}:<{}>", alias, namespace));
    }

    match query.form() {
        QueryForm::Select => {
            parts.push("SELECT".to_string());
            if query.is_distinct() {
                parts.push("DISTINCT".to_string());
            }
            parts.extend(query.columns().into_iter().map(|v| v.to_string()));
        }
        QueryForm::Describe => {
            parts.push("DESCRIBE".to_string());
            parts.push(query.result().render(prefixes));
        }
    }

    parts.push("WHERE {".to_string());
    for pattern in query.required() {
        parts.push(pattern.render(prefixes));
    }
    for pattern in query.optional() {
        parts.push(format!("OPTIONAL {{ {} }}", pattern.render(prefixes)));
    }
    for filter in query.filters() {
        parts.push(format!("FILTER({})", filter.render(prefixes)));
    }
    parts.push("}".to_string());

    if !query.ordering().is_empty() {
        let keys: Vec<String> = query
            .ordering()
            .iter()
            .map(|(v, dir)| match dir {
                Direction::Ascending => format!("ASC({})", v),
                Direction::Descending => format!("DESC({})", v),
            })
            .collect();
        parts.push(format!("ORDER BY {}", keys.join(" ")));
    }
    if let Some(limit) = query.limit() {
        parts.push(format!("LIMIT {}", limit));
    }

    parts.join(" ")
}

pub fn compile_pretty(query: &Query) -> String {
    pretty(&compile(query))
}

const BREAK_BEFORE: &[&str] = &["PREFIX", "SELECT", "DESCRIBE", "OPTIONAL", "ORDER", "LIMIT", "}"];
const BREAK_AFTER: &[&str] = &["{", ".", "}"];

/// Re-flow query text to one clause per line, indenting two spaces per open brace.
///
/// Only whitespace outside string literals changes; tokens and their order
/// are preserved, and `pretty(pretty(x)) == pretty(x)`.
///
/// # Example
///
/// ```
/// use sbolq_core::query::pretty;
///
/// let text = "SELECT ?s WHERE { ?s ?p \"a . b\" . }";
/// assert_eq!(pretty(text), "SELECT ?s WHERE {\n  ?s ?p \"a . b\" .\n}");
/// assert_eq!(pretty(&pretty(text)), pretty(text));
/// ```
pub fn pretty(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut depth: usize = 0;

    for token in tokens(text) {
        let breaks_before = BREAK_BEFORE.contains(&token) || token.starts_with("FILTER");
        if breaks_before && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if token == "}" {
            depth = depth.saturating_sub(1);
        }

        if line.is_empty() {
            line.push_str(&"  ".repeat(depth));
        } else {
            line.push(' ');
        }
        line.push_str(token);

        if token == "{" {
            depth += 1;
        }
        if BREAK_AFTER.contains(&token) {
            lines.push(std::mem::take(&mut line));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines.join("\n")
}

/// Whitespace-separated tokens; whitespace inside `"…"` / `'…'` literals does not split.
///
/// A quote or `<` opens a literal or IRI only where a term can start, so a
/// quote inside `<iri>` is a plain character.
fn tokens(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut quote: Option<char> = None;
    let mut in_iri = false;
    let mut escaped = false;
    let mut prev: Option<char> = None;

    for (i, c) in text.char_indices() {
        let before = prev.replace(c);

        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        if c.is_whitespace() {
            in_iri = false;
            if let Some(s) = start.take() {
                out.push(&text[s..i]);
            }
            continue;
        }

        if in_iri {
            if c == '>' {
                in_iri = false;
            }
            continue;
        }

        let term_start = start.is_none() || matches!(before, Some('(' | ',' | '!' | '='));
        if start.is_none() {
            start = Some(i);
        }
        if term_start {
            match c {
                '"' | '\'' => quote = Some(c),
                '<' => in_iri = true,
                _ => {}
            }
        }
    }
    if let Some(s) = start {
        out.push(&text[s..]);
    }
    out
}
