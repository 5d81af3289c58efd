//! Canned part searches
//!
//! A `SearchRequest` describes the common registry lookup (keyword, part
//! category, type label, sequence) and builds the matching [`Query`].

use crate::config::DEFAULT_LIMIT;
use crate::errors::Result;
use crate::query::{Direction, Query};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub keyword: Option<String>,
    /// Parts Registry category, e.g. `promoter` or `cds`
    pub category: Option<String>,
    /// `rdfs:label` of the part type
    pub type_label: Option<String>,
    pub limit: usize,
    pub with_sequence: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            keyword: None,
            category: None,
            type_label: None,
            limit: DEFAULT_LIMIT,
            with_sequence: false,
        }
    }
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn type_label(mut self, label: impl Into<String>) -> Self {
        self.type_label = Some(label.into());
        self
    }

    /// Zero means no limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_sequence(mut self, with_sequence: bool) -> Self {
        self.with_sequence = with_sequence;
        self
    }

    /// Build the search query.
    ///
    /// The keyword is matched against display id, name and description; the
    /// sequence is fetched but never searched.
    ///
    /// # Example
    ///
    /// ```
    /// use sbolq_core::search::SearchRequest;
    ///
    /// let query = SearchRequest::new().keyword("tetR").limit(10).build().unwrap();
    /// let text = query.compile();
    /// assert!(text.contains("regex(str(?name), \"tetR\", \"i\")"));
    /// assert!(text.ends_with("ORDER BY ASC(?displayId) LIMIT 10"));
    /// ```
    pub fn build(&self) -> Result<Query> {
        let mut query = Query::new_query();
        query.add_name()?;
        query.add_description()?;

        if let Some(category) = &self.category {
            query.add_registry_type(category)?;
        }
        if let Some(label) = &self.type_label {
            query.add_type_by_label(label);
        }
        if let Some(keyword) = &self.keyword {
            query.add_keyword_filter(keyword);
        }
        if self.with_sequence {
            query.add_sequence()?;
        }

        let display_id = query.projections()[0].clone();
        query.set_distinct(true);
        query.order_by(display_id, Direction::Ascending);
        query.set_limit(Some(self.limit));
        Ok(query)
    }
}
