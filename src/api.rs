//! Per-operation free functions over a shared default [`PqlService`].
//!
//! ```
//! use portal_pql::api;
//!
//! let pql = api::add_term("", "donor", "gender", "male");
//! assert_eq!(pql, r#"select(*),eq(donor.gender,"male")"#);
//! assert_eq!(api::to_count_statement(&pql), r#"count(),eq(donor.gender,"male")"#);
//! ```

use std::sync::OnceLock;

use crate::ast::{Limit, SortField, Term};
use crate::builder::PqlBuilder;
use crate::query::{Filters, QueryObject};
use crate::service::PqlService;

static DEFAULT_SERVICE: OnceLock<PqlService> = OnceLock::new();

/// The service behind every function here: the built-in codec and the default allow-list.
pub fn default_service() -> &'static PqlService {
    DEFAULT_SERVICE.get_or_init(PqlService::new)
}

/// Starts a builder over `initial`, or over empty text.
pub fn get_builder(initial: Option<&str>) -> PqlBuilder<'static> {
    default_service().builder(initial.unwrap_or_default())
}

pub fn convert_pql_to_query_object(pql: &str) -> QueryObject {
    default_service().convert_pql_to_query_object(pql)
}

pub fn convert_query_to_pql(query: &QueryObject) -> String {
    default_service().convert_query_to_pql(query)
}

pub fn get_filters(pql: &str) -> Filters {
    default_service().get_filters(pql)
}

pub fn get_sort(pql: &str) -> Vec<SortField> {
    default_service().get_sort(pql)
}

pub fn set_sort(pql: &str, sort: Vec<SortField>) -> String {
    default_service().set_sort(pql, sort)
}

pub fn sort_asc(pql: &str, field: &str) -> String {
    default_service().sort_asc(pql, field)
}

pub fn sort_desc(pql: &str, field: &str) -> String {
    default_service().sort_desc(pql, field)
}

pub fn remove_sort(pql: &str, field: &str) -> String {
    default_service().remove_sort(pql, field)
}

pub fn get_limit(pql: &str) -> Limit {
    default_service().get_limit(pql)
}

pub fn set_limit(pql: &str, limit: Limit) -> String {
    default_service().set_limit(pql, limit)
}

pub fn limit_size(pql: &str, size: f64) -> String {
    default_service().limit_size(pql, size)
}

pub fn limit_from_size(pql: &str, from: f64, size: f64) -> String {
    default_service().limit_from_size(pql, from, size)
}

pub fn add_term(pql: &str, category: &str, facet: &str, term: impl Into<Term>) -> String {
    default_service().add_term(pql, category, facet, term)
}

pub fn add_terms(pql: &str, category: &str, facet: &str, terms: impl IntoIterator<Item = Term>) -> String {
    default_service().add_terms(pql, category, facet, terms)
}

pub fn exclude_term(pql: &str, category: &str, facet: &str, term: impl Into<Term>) -> String {
    default_service().exclude_term(pql, category, facet, term)
}

pub fn exclude_terms(
    pql: &str,
    category: &str,
    facet: &str,
    terms: impl IntoIterator<Item = Term>,
) -> String {
    default_service().exclude_terms(pql, category, facet, terms)
}

pub fn remove_term(pql: &str, category: &str, facet: &str, term: impl Into<Term>) -> String {
    default_service().remove_term(pql, category, facet, term)
}

pub fn remove_facet(pql: &str, category: &str, facet: &str) -> String {
    default_service().remove_facet(pql, category, facet)
}

pub fn has(pql: &str, category: &str, facet: &str) -> String {
    default_service().has(pql, category, facet)
}

pub fn has_no(pql: &str, category: &str, facet: &str) -> String {
    default_service().has_no(pql, category, facet)
}

pub fn with_missing(pql: &str, category: &str, facet: &str) -> String {
    default_service().with_missing(pql, category, facet)
}

pub fn without_missing(pql: &str, category: &str, facet: &str) -> String {
    default_service().without_missing(pql, category, facet)
}

pub fn overwrite(pql: &str, category: &str, facet: &str, terms: impl IntoIterator<Item = Term>) -> String {
    default_service().overwrite(pql, category, facet, terms)
}

pub fn includes(pql: &str, fields: &[&str]) -> String {
    default_service().includes(pql, fields)
}

pub fn includes_consequences(pql: &str) -> String {
    default_service().includes_consequences(pql)
}

pub fn includes_facets(pql: &str) -> String {
    default_service().includes_facets(pql)
}

pub fn merge_pqls(pqls: &[&str]) -> String {
    default_service().merge_pqls(pqls)
}

pub fn merge_queries(queries: &[QueryObject]) -> QueryObject {
    default_service().merge_queries(queries)
}

pub fn to_filter_only_statement(pql: &str) -> String {
    default_service().to_filter_only_statement(pql)
}

pub fn to_count_statement(pql: &str) -> String {
    default_service().to_count_statement(pql)
}
