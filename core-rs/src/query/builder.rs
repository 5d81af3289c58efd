//! The mutable query aggregate and its builder operations
//!
//! A `Query` is owned by one search. Builder calls append patterns,
//! projections and filters; compiling is a separate pure read
//! (see [`crate::query::compiler`]).

use std::collections::HashSet;

use crate::errors::{Result, SbolError};
use crate::query::compiler;
use crate::query::pattern::{FilterExpression, Pattern, PatternGroup, TriplePattern};
use crate::query::term::{BlankNode, Iri, Literal, Term, Variable};
use crate::query::vocab::{self, Namespace, Prefixes, RDF, RDFS, REGISTRY, SBOL};

/// Name of the result variable seeded by [`Query::new_query`]
pub const RESULT_FIELD: &str = "uri";

/// Name of the display identifier projected by [`Query::new_query`]
pub const DISPLAY_ID_FIELD: &str = "displayId";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Which statement the query compiles to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryForm {
    /// Rows of projected fields
    Select,
    /// The graph around the result term (no projected fields)
    Describe,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    result: Term,
    projections: Vec<Variable>,
    required: Vec<Pattern>,
    optional: Vec<Pattern>,
    filters: Vec<FilterExpression>,
    prefixes: Prefixes,
    distinct: bool,
    limit: Option<usize>,
    order_by: Vec<(Variable, Direction)>,
    next_blank: usize,
}

impl Query {
    /// Unseeded query searching for `result`
    pub fn with_result(result: impl Into<Term>) -> Self {
        Self {
            result: result.into(),
            projections: Vec::new(),
            required: Vec::new(),
            optional: Vec::new(),
            filters: Vec::new(),
            prefixes: Prefixes::new(),
            distinct: false,
            limit: None,
            order_by: Vec::new(),
            next_blank: 0,
        }
    }

    /// Default part search: `?uri` must be a DNA component and exposes its display id.
    ///
    /// # Example
    ///
    /// ```
    /// use sbolq_core::query::Query;
    ///
    /// let query = Query::new_query();
    /// assert_eq!(query.identity_field(), Some("uri"));
    /// assert_eq!(query.projections()[0].name(), "displayId");
    /// ```
    pub fn new_query() -> Self {
        let result = Variable::new(RESULT_FIELD).expect("constant variable name");
        let mut query = Self::with_result(result);
        query.prefixes.insert_namespace(RDF);
        query.prefixes.insert_namespace(RDFS);
        query.prefixes.insert_namespace(SBOL);

        query.add_type(vocab::sbol::dna_component());
        query
            .add_attribute(vocab::sbol::display_id(), DISPLAY_ID_FIELD)
            .expect("fresh query has no projections");
        query
    }

    // ---------------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------------

    /// Require `result predicate ?field` and project `field`
    pub fn add_attribute(&mut self, predicate: impl Into<Term>, field: &str) -> Result<Variable> {
        let subject = self.result.clone();
        self.add_attribute_of(subject, predicate, field, Presence::Required)
    }

    /// Like [`Query::add_attribute`], but rows without the attribute are kept
    pub fn add_optional_attribute(&mut self, predicate: impl Into<Term>, field: &str) -> Result<Variable> {
        let subject = self.result.clone();
        self.add_attribute_of(subject, predicate, field, Presence::Optional)
    }

    /// Bind a fresh variable named `field` through `subject predicate ?field` and project it.
    ///
    /// A field name that is already projected, or that names the result
    /// variable, is rejected and the query is left untouched.
    pub fn add_attribute_of(
        &mut self,
        subject: impl Into<Term>,
        predicate: impl Into<Term>,
        field: &str,
        presence: Presence,
    ) -> Result<Variable> {
        let variable = self.fresh_field(field)?;
        let triple = TriplePattern::new(subject, predicate, variable.clone());
        self.push_pattern(triple.into(), presence);
        self.projections.push(variable.clone());
        Ok(variable)
    }

    /// Bind `field` through a two-step path: `result link _:bN . _:bN predicate ?field`.
    ///
    /// Both triples form one group, so an optional link is all-or-nothing.
    pub fn add_linked_attribute(
        &mut self,
        link: impl Into<Term>,
        predicate: impl Into<Term>,
        field: &str,
        presence: Presence,
    ) -> Result<Variable> {
        let variable = self.fresh_field(field)?;
        let hop = Term::from(self.fresh_blank());
        let group = PatternGroup::new(vec![
            TriplePattern::new(self.result.clone(), link, hop.clone()),
            TriplePattern::new(hop, predicate, variable.clone()),
        ]);
        self.push_pattern(group.into(), presence);
        self.projections.push(variable.clone());
        Ok(variable)
    }

    /// Append a caller-built group; nothing is projected
    pub fn add_linked_pattern(&mut self, group: PatternGroup, presence: Presence) {
        if group.is_empty() {
            return;
        }
        self.push_pattern(group.into(), presence);
    }

    pub fn add_pattern(&mut self, triple: TriplePattern, presence: Presence) {
        self.push_pattern(triple.into(), presence);
    }

    fn fresh_field(&self, field: &str) -> Result<Variable> {
        let variable = Variable::new(field)?;
        let taken = self.projections.contains(&variable) || self.result.as_variable() == Some(&variable);
        if taken {
            return Err(SbolError::DuplicateField(field.to_string()));
        }
        Ok(variable)
    }

    fn fresh_blank(&mut self) -> BlankNode {
        let label = format!("b{}", self.next_blank);
        self.next_blank += 1;
        BlankNode::new(label).expect("generated blank label")
    }

    fn push_pattern(&mut self, pattern: Pattern, presence: Presence) {
        match presence {
            Presence::Required => self.required.push(pattern),
            Presence::Optional => self.optional.push(pattern),
        }
    }

    // ---------------------------------------------------------------------
    // Types and identity
    // ---------------------------------------------------------------------

    /// Require the result to be typed `resource_type`
    pub fn add_type(&mut self, resource_type: Iri) {
        let subject = self.result.clone();
        self.add_type_of(subject, resource_type);
    }

    pub fn add_type_of(&mut self, subject: impl Into<Term>, resource_type: Iri) {
        let triple = TriplePattern::new(subject, vocab::rdf::type_(), resource_type);
        self.push_pattern(triple.into(), Presence::Required);
    }

    /// Require the result to have some type whose `rdfs:label` is `label`
    pub fn add_type_by_label(&mut self, label: &str) {
        let subject = self.result.clone();
        self.add_type_by_label_of(subject, label);
    }

    pub fn add_type_by_label_of(&mut self, subject: impl Into<Term>, label: &str) {
        let type_node = Term::from(self.fresh_blank());
        let group = PatternGroup::new(vec![
            TriplePattern::new(subject, vocab::rdf::type_(), type_node.clone()),
            TriplePattern::new(type_node, vocab::rdfs::label(), Literal::new(label)),
        ]);
        self.push_pattern(group.into(), Presence::Required);
    }

    /// Restrict the result to exactly one known resource
    pub fn add_exact_identity(&mut self, identifier: Iri) {
        let subject = self.result.clone();
        self.add_exact_identity_of(subject, identifier);
    }

    pub fn add_exact_identity_of(&mut self, subject: impl Into<Term>, identifier: Iri) {
        self.filters
            .push(FilterExpression::SameTerm(subject.into(), identifier.into()));
    }

    /// Parts Registry category, e.g. `cds` or `promoter`
    pub fn add_registry_type(&mut self, category: &str) -> Result<()> {
        let iri = REGISTRY.iri(category)?;
        self.prefixes.insert_namespace(REGISTRY);
        self.add_type(iri);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Canned SBOL attributes
    // ---------------------------------------------------------------------

    pub fn add_name(&mut self) -> Result<Variable> {
        self.add_optional_attribute(vocab::sbol::name(), "name")
    }

    pub fn add_description(&mut self) -> Result<Variable> {
        self.add_optional_attribute(vocab::sbol::description(), "description")
    }

    /// Optional `dnaSequence`/`nucleotides` path, projected as `nucleotides`
    pub fn add_sequence(&mut self) -> Result<Variable> {
        self.add_linked_attribute(
            vocab::sbol::dna_sequence(),
            vocab::sbol::nucleotides(),
            "nucleotides",
            Presence::Optional,
        )
    }

    // ---------------------------------------------------------------------
    // Filters
    // ---------------------------------------------------------------------

    pub fn add_filter(&mut self, expression: FilterExpression) {
        self.filters.push(expression);
    }

    /// Match `keyword` case-insensitively against any projected field.
    ///
    /// Returns `false` (and adds nothing) for an empty keyword.
    pub fn add_keyword_filter(&mut self, keyword: &str) -> bool {
        let fields = self.projections.clone();
        self.add_keyword_filter_on(keyword, &fields)
    }

    /// One disjunction: a hit on any of `fields` is a match.
    ///
    /// With no fields the disjunction is empty and matches nothing.
    pub fn add_keyword_filter_on(&mut self, keyword: &str, fields: &[Variable]) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return false;
        }
        let options = fields
            .iter()
            .map(|field| FilterExpression::contains_text(field, keyword))
            .collect();
        self.filters.push(FilterExpression::Or(options));
        true
    }

    // ---------------------------------------------------------------------
    // Shaping
    // ---------------------------------------------------------------------

    /// Project an existing variable without binding it.
    ///
    /// The caller is responsible for binding it in a pattern; see
    /// [`Query::unbound_variables`].
    pub fn select(&mut self, variable: Variable) {
        if !self.projections.contains(&variable) {
            self.projections.push(variable);
        }
    }

    pub fn add_prefix(&mut self, alias: &str, namespace: &str) -> Result<()> {
        self.prefixes.insert(alias, namespace)
    }

    pub fn add_namespace(&mut self, namespace: Namespace) {
        self.prefixes.insert_namespace(namespace);
    }

    pub fn set_distinct(&mut self, distinct: bool) {
        self.distinct = distinct;
    }

    /// Zero clears the limit
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit.filter(|n| *n > 0);
    }

    pub fn order_by(&mut self, variable: Variable, direction: Direction) {
        self.order_by.push((variable, direction));
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub fn result(&self) -> &Term {
        &self.result
    }

    /// Field name carrying the record identity in result rows
    pub fn identity_field(&self) -> Option<&str> {
        self.result.as_variable().map(Variable::name)
    }

    pub fn projections(&self) -> &[Variable] {
        &self.projections
    }

    pub fn required(&self) -> &[Pattern] {
        &self.required
    }

    pub fn optional(&self) -> &[Pattern] {
        &self.optional
    }

    pub fn filters(&self) -> &[FilterExpression] {
        &self.filters
    }

    pub fn prefixes(&self) -> &Prefixes {
        &self.prefixes
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn ordering(&self) -> &[(Variable, Direction)] {
        &self.order_by
    }

    pub fn form(&self) -> QueryForm {
        if self.projections.is_empty() {
            QueryForm::Describe
        } else {
            QueryForm::Select
        }
    }

    /// Output columns in order: the result variable first, then projections
    pub fn columns(&self) -> Vec<&Variable> {
        let mut columns: Vec<&Variable> = Vec::with_capacity(self.projections.len() + 1);
        if let Some(result) = self.result.as_variable() {
            if !self.projections.contains(result) {
                columns.push(result);
            }
        }
        columns.extend(self.projections.iter());
        columns
    }

    /// Variables that are output or filtered on but never bound by a pattern
    pub fn unbound_variables(&self) -> Vec<Variable> {
        let bound: HashSet<&Variable> = self
            .required
            .iter()
            .chain(self.optional.iter())
            .flat_map(Pattern::variables)
            .collect();

        let mut referenced: Vec<&Variable> = Vec::new();
        if self.form() == QueryForm::Select {
            referenced.extend(self.columns());
        }
        referenced.extend(self.filters.iter().flat_map(FilterExpression::variables));
        referenced.extend(self.order_by.iter().map(|(v, _)| v));

        let mut seen = HashSet::new();
        referenced
            .into_iter()
            .filter(|v| !bound.contains(v) && seen.insert(*v))
            .cloned()
            .collect()
    }

    /// Compact single-line query text
    pub fn compile(&self) -> String {
        compiler::compile(self)
    }

    /// Query text with one clause per line
    pub fn compile_pretty(&self) -> String {
        compiler::compile_pretty(self)
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.compile())
    }
}
