//! Triple patterns, pattern groups and filter expressions

use crate::query::term::{quote, Term, Variable};
use crate::query::vocab::Prefixes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl TriplePattern {
    pub fn new(subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    pub fn terms(&self) -> [&Term; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    /// `subject predicate object .`
    pub fn render(&self, prefixes: &Prefixes) -> String {
        format!(
            "{} {} {} .",
            self.subject.render(prefixes),
            self.predicate.render(prefixes),
            self.object.render(prefixes)
        )
    }
}

/// Triples that hold together; compiled adjacently and made optional as one unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternGroup {
    triples: Vec<TriplePattern>,
}

impl PatternGroup {
    pub fn new(triples: Vec<TriplePattern>) -> Self {
        Self { triples }
    }

    pub fn push(&mut self, triple: TriplePattern) {
        self.triples.push(triple);
    }

    pub fn triples(&self) -> &[TriplePattern] {
        &self.triples
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Triple(TriplePattern),
    Group(PatternGroup),
}

impl Pattern {
    pub fn triples(&self) -> &[TriplePattern] {
        match self {
            Pattern::Triple(t) => std::slice::from_ref(t),
            Pattern::Group(g) => g.triples(),
        }
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.triples()
            .iter()
            .flat_map(|t| t.terms())
            .filter_map(Term::as_variable)
    }

    /// Member triples, space separated, in insertion order
    pub fn render(&self, prefixes: &Prefixes) -> String {
        self.triples()
            .iter()
            .map(|t| t.render(prefixes))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<TriplePattern> for Pattern {
    fn from(t: TriplePattern) -> Self {
        Pattern::Triple(t)
    }
}

impl From<PatternGroup> for Pattern {
    fn from(g: PatternGroup) -> Self {
        Pattern::Group(g)
    }
}

/// Pre-built boolean condition. The builder only appends these; it never looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpression {
    Regex {
        target: Term,
        pattern: String,
        flags: Option<String>,
    },
    Equals(Term, Term),
    NotEquals(Term, Term),
    SameTerm(Term, Term),
    Bound(Variable),
    Not(Box<FilterExpression>),
    Or(Vec<FilterExpression>),
    And(Vec<FilterExpression>),
}

impl FilterExpression {
    /// Case-insensitive substring match of `text` against the string form of `target`
    pub fn contains_text(target: impl Into<Term>, text: &str) -> Self {
        FilterExpression::Regex {
            target: target.into(),
            pattern: escape_regex(text),
            flags: Some("i".to_string()),
        }
    }

    pub fn negate(self) -> Self {
        FilterExpression::Not(Box::new(self))
    }

    pub fn variables(&self) -> Vec<&Variable> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a Variable>) {
        match self {
            FilterExpression::Regex { target, .. } => out.extend(target.as_variable()),
            FilterExpression::Equals(a, b)
            | FilterExpression::NotEquals(a, b)
            | FilterExpression::SameTerm(a, b) => {
                out.extend(a.as_variable());
                out.extend(b.as_variable());
            }
            FilterExpression::Bound(v) => out.push(v),
            FilterExpression::Not(inner) => inner.collect_variables(out),
            FilterExpression::Or(items) | FilterExpression::And(items) => {
                for item in items {
                    item.collect_variables(out);
                }
            }
        }
    }

    /// Expression text without the surrounding `FILTER( )`
    pub fn render(&self, prefixes: &Prefixes) -> String {
        self.render_inner(prefixes, false)
    }

    fn render_inner(&self, prefixes: &Prefixes, nested: bool) -> String {
        let text = match self {
            FilterExpression::Regex { target, pattern, flags } => {
                let mut args = vec![format!("str({})", target.render(prefixes)), quote(pattern)];
                if let Some(flags) = flags {
                    args.push(quote(flags));
                }
                return format!("regex({})", args.join(", "));
            }
            FilterExpression::SameTerm(a, b) => {
                return format!("sameTerm({}, {})", a.render(prefixes), b.render(prefixes));
            }
            FilterExpression::Bound(v) => return format!("bound({})", v),
            FilterExpression::Not(inner) => return format!("!({})", inner.render_inner(prefixes, false)),
            FilterExpression::Equals(a, b) => {
                return format!("{} = {}", a.render(prefixes), b.render(prefixes));
            }
            FilterExpression::NotEquals(a, b) => {
                return format!("{} != {}", a.render(prefixes), b.render(prefixes));
            }
            FilterExpression::Or(items) if items.is_empty() => return "false".to_string(),
            FilterExpression::And(items) if items.is_empty() => return "true".to_string(),
            FilterExpression::Or(items) | FilterExpression::And(items) if items.len() == 1 => {
                return items[0].render_inner(prefixes, nested);
            }
            FilterExpression::Or(items) => join(items, " || ", prefixes),
            FilterExpression::And(items) => join(items, " && ", prefixes),
        };

        if nested {
            format!("({})", text)
        } else {
            text
        }
    }
}

fn join(items: &[FilterExpression], op: &str, prefixes: &Prefixes) -> String {
    items
        .iter()
        .map(|item| item.render_inner(prefixes, true))
        .collect::<Vec<_>>()
        .join(op)
}

/// Backslash-escape XPath regex metacharacters so `text` matches literally
pub fn escape_regex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if "\\.?*+|^$()[]{}-".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
