//! Fluent chaining of text-level edits.
//!
//! ```
//! use portal_pql::PqlService;
//!
//! let service = PqlService::new();
//! let pql = service
//!     .builder("")
//!     .add_term("donor", "gender", "male")
//!     .add_term("donor", "gender", "female")
//!     .includes_facets()
//!     .build();
//! assert_eq!(pql, r#"select(*),facets(*),in(donor.gender,"male","female")"#);
//! ```

use crate::ast::{Limit, SortField, Term};
use crate::codec::{PqlCodec, PqlTextCodec};
use crate::service::PqlService;

/// Holds one PQL statement. Every chained call consumes the builder and returns a new one
/// wrapping the edited text; the text it was created with is kept as the reset point.
#[derive(Debug, Clone)]
pub struct PqlBuilder<'s, C = PqlTextCodec> {
    service: &'s PqlService<C>,
    initial: String,
    current: String,
}

impl<C: PqlCodec> PqlService<C> {
    pub fn builder(&self, initial: &str) -> PqlBuilder<'_, C> {
        PqlBuilder::new(self, initial)
    }
}

impl<'s, C: PqlCodec> PqlBuilder<'s, C> {
    pub fn new(service: &'s PqlService<C>, initial: &str) -> Self {
        Self {
            service,
            initial: initial.to_string(),
            current: initial.to_string(),
        }
    }

    fn with(self, current: String) -> Self {
        Self { current, ..self }
    }

    pub fn add_term(self, category: &str, facet: &str, term: impl Into<Term>) -> Self {
        let pql = self.service.add_term(&self.current, category, facet, term);
        self.with(pql)
    }

    pub fn add_terms(self, category: &str, facet: &str, terms: impl IntoIterator<Item = Term>) -> Self {
        let pql = self.service.add_terms(&self.current, category, facet, terms);
        self.with(pql)
    }

    pub fn exclude_term(self, category: &str, facet: &str, term: impl Into<Term>) -> Self {
        let pql = self.service.exclude_term(&self.current, category, facet, term);
        self.with(pql)
    }

    pub fn exclude_terms(
        self,
        category: &str,
        facet: &str,
        terms: impl IntoIterator<Item = Term>,
    ) -> Self {
        let pql = self.service.exclude_terms(&self.current, category, facet, terms);
        self.with(pql)
    }

    pub fn remove_term(self, category: &str, facet: &str, term: impl Into<Term>) -> Self {
        let pql = self.service.remove_term(&self.current, category, facet, term);
        self.with(pql)
    }

    pub fn remove_facet(self, category: &str, facet: &str) -> Self {
        let pql = self.service.remove_facet(&self.current, category, facet);
        self.with(pql)
    }

    pub fn has(self, category: &str, facet: &str) -> Self {
        let pql = self.service.has(&self.current, category, facet);
        self.with(pql)
    }

    pub fn has_no(self, category: &str, facet: &str) -> Self {
        let pql = self.service.has_no(&self.current, category, facet);
        self.with(pql)
    }

    pub fn with_missing(self, category: &str, facet: &str) -> Self {
        let pql = self.service.with_missing(&self.current, category, facet);
        self.with(pql)
    }

    pub fn without_missing(self, category: &str, facet: &str) -> Self {
        let pql = self.service.without_missing(&self.current, category, facet);
        self.with(pql)
    }

    pub fn overwrite(self, category: &str, facet: &str, terms: impl IntoIterator<Item = Term>) -> Self {
        let pql = self.service.overwrite(&self.current, category, facet, terms);
        self.with(pql)
    }

    pub fn includes(self, fields: &[&str]) -> Self {
        let pql = self.service.includes(&self.current, fields);
        self.with(pql)
    }

    pub fn includes_consequences(self) -> Self {
        let pql = self.service.includes_consequences(&self.current);
        self.with(pql)
    }

    pub fn includes_facets(self) -> Self {
        let pql = self.service.includes_facets(&self.current);
        self.with(pql)
    }

    pub fn set_sort(self, sort: Vec<SortField>) -> Self {
        let pql = self.service.set_sort(&self.current, sort);
        self.with(pql)
    }

    pub fn sort_asc(self, field: &str) -> Self {
        let pql = self.service.sort_asc(&self.current, field);
        self.with(pql)
    }

    pub fn sort_desc(self, field: &str) -> Self {
        let pql = self.service.sort_desc(&self.current, field);
        self.with(pql)
    }

    pub fn remove_sort(self, field: &str) -> Self {
        let pql = self.service.remove_sort(&self.current, field);
        self.with(pql)
    }

    pub fn set_limit(self, limit: Limit) -> Self {
        let pql = self.service.set_limit(&self.current, limit);
        self.with(pql)
    }

    /// Merges another statement into the current one; `other` wins on overlapping facets.
    pub fn merge_with(self, other: &str) -> Self {
        let pql = self.service.merge_pqls(&[self.current.as_str(), other]);
        self.with(pql)
    }

    /// Goes back to `pql`, or to the text the builder was created with. The reset point
    /// itself never moves.
    pub fn reset(self, pql: Option<&str>) -> Self {
        let pql = pql.unwrap_or(self.initial.as_str()).to_string();
        self.with(pql)
    }

    pub fn build(&self) -> String {
        self.current.clone()
    }

    pub fn build_filters(&self) -> String {
        self.service.to_filter_only_statement(&self.current)
    }

    pub fn build_count(&self) -> String {
        self.service.to_count_statement(&self.current)
    }
}
