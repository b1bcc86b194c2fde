//! Text-level operations: decode PQL, edit the query object, print it back.
//!
//! Every operation is a full round trip and is idempotent on its own output. Text that
//! does not parse is treated as an empty query.

use tracing::{debug, warn};

use crate::ast::{Limit, Node, SortField, Term};
use crate::codec::{PqlCodec, PqlTextCodec};
use crate::config::EngineConfig;
use crate::converter::{encode_filters, Decoded, QueryConverter};
use crate::identifier::Identifier;
use crate::merge::merge_queries;
use crate::query::{Filters, QueryObject};

/// Translates and edits PQL statements through a [`PqlCodec`].
#[derive(Debug, Clone, Default)]
pub struct PqlService<C = PqlTextCodec> {
    codec: C,
    converter: QueryConverter,
}

impl PqlService<PqlTextCodec> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_codec(PqlTextCodec, config)
    }
}

impl<C: PqlCodec> PqlService<C> {
    pub fn with_codec(codec: C, config: EngineConfig) -> Self {
        Self {
            codec,
            converter: QueryConverter::with_config(config),
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn config(&self) -> &EngineConfig {
        self.converter.config()
    }

    /// Decodes text into a query object, reporting every node that was left out.
    pub fn decode_pql(&self, pql: &str) -> Decoded {
        match self.codec.parse(pql) {
            Ok(nodes) => self.converter.decode(&nodes),
            Err(err) => {
                warn!(pql = pql, error = %err, "treating unparseable pql as an empty query");
                Decoded::unparseable(&err)
            }
        }
    }

    pub fn convert_pql_to_query_object(&self, pql: &str) -> QueryObject {
        self.decode_pql(pql).query
    }

    pub fn convert_query_to_pql(&self, query: &QueryObject) -> String {
        self.codec.serialize(&self.converter.encode(query))
    }

    pub fn get_filters(&self, pql: &str) -> Filters {
        self.convert_pql_to_query_object(pql).filters
    }

    pub fn get_sort(&self, pql: &str) -> Vec<SortField> {
        self.convert_pql_to_query_object(pql).params.sort
    }

    pub fn set_sort(&self, pql: &str, sort: Vec<SortField>) -> String {
        self.update_query(pql, "set_sort", |query| query.params.sort = sort)
    }

    pub fn sort_asc(&self, pql: &str, field: &str) -> String {
        self.push_sort(pql, SortField::asc(field))
    }

    pub fn sort_desc(&self, pql: &str, field: &str) -> String {
        self.push_sort(pql, SortField::desc(field))
    }

    fn push_sort(&self, pql: &str, sort: SortField) -> String {
        if sort.field.is_empty() {
            return pql.to_string();
        }
        self.update_query(pql, "push_sort", |query| query.params.sort.push(sort))
    }

    /// Removes every sort entry on `field`.
    pub fn remove_sort(&self, pql: &str, field: &str) -> String {
        if field.is_empty() {
            return pql.to_string();
        }
        self.update_query(pql, "remove_sort", |query| {
            query.params.sort.retain(|s| s.field != field)
        })
    }

    pub fn get_limit(&self, pql: &str) -> Limit {
        self.convert_pql_to_query_object(pql).params.limit
    }

    pub fn set_limit(&self, pql: &str, limit: Limit) -> String {
        self.update_query(pql, "set_limit", |query| query.params.limit = limit)
    }

    pub fn limit_size(&self, pql: &str, size: f64) -> String {
        self.set_limit(pql, Limit::size(size))
    }

    pub fn limit_from_size(&self, pql: &str, from: f64, size: f64) -> String {
        self.set_limit(pql, Limit::from_size(from, size))
    }

    pub fn add_term(&self, pql: &str, category: &str, facet: &str, term: impl Into<Term>) -> String {
        self.update_filters(pql, "add_term", category, facet, |f| f.add_term(category, facet, term))
    }

    pub fn add_terms(
        &self,
        pql: &str,
        category: &str,
        facet: &str,
        terms: impl IntoIterator<Item = Term>,
    ) -> String {
        self.update_filters(pql, "add_terms", category, facet, |f| f.add_terms(category, facet, terms))
    }

    pub fn exclude_term(
        &self,
        pql: &str,
        category: &str,
        facet: &str,
        term: impl Into<Term>,
    ) -> String {
        self.update_filters(pql, "exclude_term", category, facet, |f| f.exclude_term(category, facet, term))
    }

    pub fn exclude_terms(
        &self,
        pql: &str,
        category: &str,
        facet: &str,
        terms: impl IntoIterator<Item = Term>,
    ) -> String {
        self.update_filters(pql, "exclude_terms", category, facet, |f| f.exclude_terms(category, facet, terms))
    }

    pub fn remove_term(
        &self,
        pql: &str,
        category: &str,
        facet: &str,
        term: impl Into<Term>,
    ) -> String {
        let term = term.into();
        self.update_filters(pql, "remove_term", category, facet, |f| f.remove_term(category, facet, &term))
    }

    pub fn remove_facet(&self, pql: &str, category: &str, facet: &str) -> String {
        self.update_filters(pql, "remove_facet", category, facet, |f| f.remove_facet(category, facet))
    }

    pub fn has(&self, pql: &str, category: &str, facet: &str) -> String {
        self.update_filters(pql, "has", category, facet, |f| f.set_exists(category, facet))
    }

    pub fn has_no(&self, pql: &str, category: &str, facet: &str) -> String {
        self.update_filters(pql, "has_no", category, facet, |f| f.clear_exists(category, facet))
    }

    pub fn with_missing(&self, pql: &str, category: &str, facet: &str) -> String {
        self.update_filters(pql, "with_missing", category, facet, |f| f.set_missing(category, facet))
    }

    pub fn without_missing(&self, pql: &str, category: &str, facet: &str) -> String {
        self.update_filters(pql, "without_missing", category, facet, |f| f.clear_missing(category, facet))
    }

    /// Replaces whatever the facet held with `terms`.
    pub fn overwrite(
        &self,
        pql: &str,
        category: &str,
        facet: &str,
        terms: impl IntoIterator<Item = Term>,
    ) -> String {
        self.update_filters(pql, "overwrite", category, facet, |f| f.overwrite(category, facet, terms))
    }

    /// Adds allowed fields to the custom projection. Text comes back unchanged when none of
    /// `fields` is allowed.
    pub fn includes(&self, pql: &str, fields: &[&str]) -> String {
        let config = self.config();
        if !fields.iter().any(|field| config.allows(field)) {
            return pql.to_string();
        }
        self.update_query(pql, "includes", |query| {
            self.converter
                .extend_custom_selects(&mut query.params.custom_selects, fields.iter().copied())
        })
    }

    pub fn includes_consequences(&self, pql: &str) -> String {
        self.includes(pql, &["consequences"])
    }

    pub fn includes_facets(&self, pql: &str) -> String {
        self.update_query(pql, "includes_facets", |query| query.params.facets = true)
    }

    pub fn merge_queries(&self, queries: &[QueryObject]) -> QueryObject {
        merge_queries(queries)
    }

    /// Merges statements after trimming them and dropping empty and duplicate ones. Any
    /// invalid statement makes the whole merge come back empty.
    pub fn merge_pqls(&self, pqls: &[&str]) -> String {
        let mut unique: Vec<&str> = Vec::with_capacity(pqls.len());
        for pql in pqls.iter().map(|pql| pql.trim()) {
            if !pql.is_empty() && !unique.contains(&pql) {
                unique.push(pql);
            }
        }

        match unique.as_slice() {
            [] => String::new(),
            [single] => {
                if self.codec.is_valid(single) {
                    single.to_string()
                } else {
                    warn!(pql = *single, "rejected merge of invalid pql");
                    String::new()
                }
            }
            _ => {
                let mut queries = Vec::with_capacity(unique.len());
                for pql in &unique {
                    match self.codec.parse(pql) {
                        Ok(nodes) => queries.push(self.converter.decode(&nodes).query),
                        Err(err) => {
                            warn!(pql = *pql, error = %err, "rejected merge of invalid pql");
                            return String::new();
                        }
                    }
                }
                let merged = self.convert_query_to_pql(&merge_queries(&queries));
                debug!(inputs = unique.len(), pql = %merged, "merged pql");
                merged
            }
        }
    }

    /// The filters of `pql` alone, without select, facets, sort or limit.
    pub fn to_filter_only_statement(&self, pql: &str) -> String {
        self.to_filter_only_statement_with(pql, |nodes| nodes)
    }

    /// Like [`PqlService::to_filter_only_statement`], passing the filter nodes through
    /// `wrap` before printing. Empty when there are no filters.
    pub fn to_filter_only_statement_with(
        &self,
        pql: &str,
        wrap: impl FnOnce(Vec<Node>) -> Vec<Node>,
    ) -> String {
        let filters = self.get_filters(pql);
        if filters.is_empty() {
            return String::new();
        }
        self.codec.serialize(&wrap(encode_filters(&filters)))
    }

    pub fn to_count_statement(&self, pql: &str) -> String {
        self.to_filter_only_statement_with(pql, |nodes| vec![Node::Count(nodes)])
    }

    fn update_query(&self, pql: &str, op: &'static str, edit: impl FnOnce(&mut QueryObject)) -> String {
        let mut query = self.convert_pql_to_query_object(pql);
        edit(&mut query);
        let updated = self.convert_query_to_pql(&query);
        debug!(op = op, pql = %updated, "updated pql");
        updated
    }

    /// Edits the filters of one facet. A pair that could not print as `category.facet` and
    /// read back unchanged leaves the text as it is.
    fn update_filters(
        &self,
        pql: &str,
        op: &'static str,
        category: &str,
        facet: &str,
        edit: impl FnOnce(&mut Filters),
    ) -> String {
        if Identifier::from_parts(category, facet).is_none() {
            debug!(op = op, category = category, facet = facet, "ignored edit on invalid field");
            return pql.to_string();
        }
        self.update_query(pql, op, |query| edit(&mut query.filters))
    }
}
