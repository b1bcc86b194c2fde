//! Deep merge of query objects.
//!
//! Only filters are merged; the result always carries default params. For a facet present
//! on both sides, a later non-empty `in`/`not` list replaces the earlier one wholesale and
//! `exists`/`missing` are or-ed.

use crate::query::{FacetFilter, Filters, Params, QueryObject};

/// Merges `queries` left to right. No input gives an empty query that prints as empty text
/// (not even `select(*)`), and a single input is returned as is.
pub fn merge_queries(queries: &[QueryObject]) -> QueryObject {
    match queries {
        [] => QueryObject {
            params: Params { select_all: false, ..Params::default() },
            filters: Filters::new(),
        },
        [single] => single.clone(),
        _ => {
            let mut filters = Filters::new();
            for query in queries {
                merge_filters(&mut filters, &query.filters);
            }
            QueryObject { params: Default::default(), filters }
        }
    }
}

/// Merges `other` into `target`, keeping `target`'s category and facet order and appending
/// anything new.
pub fn merge_filters(target: &mut Filters, other: &Filters) {
    for (category, facets) in other.categories() {
        for (facet, filter) in facets.iter() {
            merge_facet(target.facet_mut(category, facet), filter);
        }
    }
    target.prune();
}

fn merge_facet(target: &mut FacetFilter, other: &FacetFilter) {
    if !other.include.is_empty() {
        target.include = other.include.clone();
    }
    if !other.exclude.is_empty() {
        target.exclude = other.exclude.clone();
    }
    target.exists |= other.exists;
    target.missing |= other.missing;
}
