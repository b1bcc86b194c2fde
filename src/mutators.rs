//! Structural edits over a filter map.
//!
//! Every mutator leaves the map pruned: an edit that empties a facet removes it, and an
//! emptied category goes with it.

use crate::ast::Term;
use crate::query::{FacetFilter, Filters};

impl Filters {
    pub fn add_term(&mut self, category: &str, facet: &str, term: impl Into<Term>) {
        self.add_terms(category, facet, [term.into()]);
    }

    /// Appends terms to the facet's `in` list. Terms already present and blank terms are
    /// skipped; the first occurrence keeps its position.
    pub fn add_terms(&mut self, category: &str, facet: &str, terms: impl IntoIterator<Item = Term>) {
        self.push_terms(category, facet, terms, |filter| &mut filter.include);
    }

    pub fn exclude_term(&mut self, category: &str, facet: &str, term: impl Into<Term>) {
        self.exclude_terms(category, facet, [term.into()]);
    }

    /// Same as [`Filters::add_terms`] for the `not` list.
    pub fn exclude_terms(
        &mut self,
        category: &str,
        facet: &str,
        terms: impl IntoIterator<Item = Term>,
    ) {
        self.push_terms(category, facet, terms, |filter| &mut filter.exclude);
    }

    fn push_terms(
        &mut self,
        category: &str,
        facet: &str,
        terms: impl IntoIterator<Item = Term>,
        slot: impl Fn(&mut FacetFilter) -> &mut Vec<Term>,
    ) {
        let target = slot(self.facet_mut(category, facet));
        for term in terms {
            if !term.is_blank() && !target.contains(&term) {
                target.push(term);
            }
        }
        self.prune();
    }

    /// Removes one term from the facet's `in` list.
    pub fn remove_term(&mut self, category: &str, facet: &str, term: &Term) {
        if let Some(filter) = self.facet_entry(category, facet) {
            filter.include.retain(|t| t != term);
        }
        self.prune();
    }

    pub fn remove_facet(&mut self, category: &str, facet: &str) {
        if let Some(facets) = self.categories_mut().get_mut(category) {
            facets.remove(facet);
        }
        self.prune();
    }

    pub fn set_exists(&mut self, category: &str, facet: &str) {
        self.facet_mut(category, facet).exists = true;
    }

    pub fn clear_exists(&mut self, category: &str, facet: &str) {
        if let Some(filter) = self.facet_entry(category, facet) {
            filter.exists = false;
        }
        self.prune();
    }

    pub fn set_missing(&mut self, category: &str, facet: &str) {
        self.facet_mut(category, facet).missing = true;
    }

    pub fn clear_missing(&mut self, category: &str, facet: &str) {
        if let Some(filter) = self.facet_entry(category, facet) {
            filter.missing = false;
        }
        self.prune();
    }

    /// Replaces the facet with a fresh `in` list of `terms`.
    pub fn overwrite(&mut self, category: &str, facet: &str, terms: impl IntoIterator<Item = Term>) {
        self.remove_facet(category, facet);
        self.add_terms(category, facet, terms);
    }

    fn facet_entry(&mut self, category: &str, facet: &str) -> Option<&mut FacetFilter> {
        self.categories_mut().get_mut(category)?.get_mut(facet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(values: &[&str]) -> Vec<Term> {
        values.iter().map(|v| Term::from(*v)).collect()
    }

    #[test]
    fn test_add_terms_unique_in_order() {
        let mut filters = Filters::new();
        filters.add_term("donor", "gender", "male");
        filters.add_terms("donor", "gender", terms(&["female", "male", "other", "female"]));

        assert_eq!(
            filters.facet("donor", "gender").unwrap().include,
            terms(&["male", "female", "other"])
        );
    }

    #[test]
    fn test_add_blank_term_is_noop() {
        let mut filters = Filters::new();
        filters.add_term("donor", "gender", "");
        filters.add_terms("donor", "gender", Vec::new());
        assert!(filters.is_empty());

        filters.add_term("donor", "age", 0);
        assert_eq!(filters.facet("donor", "age").unwrap().include, vec![Term::from(0)]);
    }

    #[test]
    fn test_exclude_terms() {
        let mut filters = Filters::new();
        filters.add_term("donor", "age", 21);
        filters.exclude_terms("donor", "age", vec![Term::from(22), Term::from(22), Term::from(20)]);

        let age = filters.facet("donor", "age").unwrap();
        assert_eq!(age.include, vec![Term::from(21)]);
        assert_eq!(age.exclude, vec![Term::from(22), Term::from(20)]);
    }

    #[test]
    fn test_remove_term_cascades() {
        let mut filters = Filters::new();
        filters.add_terms("donor", "gender", terms(&["male", "female"]));

        filters.remove_term("donor", "gender", &Term::from("female"));
        assert_eq!(filters.facet("donor", "gender").unwrap().include, terms(&["male"]));

        filters.remove_term("donor", "gender", &Term::from("male"));
        assert!(filters.category("donor").is_none());
        assert!(filters.is_empty());
    }

    #[test]
    fn test_remove_term_keeps_other_conditions() {
        let mut filters = Filters::new();
        filters.add_term("donor", "gender", "male");
        filters.set_missing("donor", "gender");

        filters.remove_term("donor", "gender", &Term::from("male"));
        let gender = filters.facet("donor", "gender").unwrap();
        assert!(gender.include.is_empty());
        assert!(gender.missing);
    }

    #[test]
    fn test_remove_facet() {
        let mut filters = Filters::new();
        filters.add_term("donor", "gender", "male");
        filters.add_term("donor", "age", 22);

        filters.remove_facet("donor", "gender");
        assert!(filters.facet("donor", "gender").is_none());
        assert!(filters.facet("donor", "age").is_some());

        filters.remove_facet("donor", "age");
        assert!(filters.is_empty());

        filters.remove_facet("gene", "id");
        assert!(filters.is_empty());
    }

    #[test]
    fn test_exists_and_missing_toggles() {
        let mut filters = Filters::new();
        filters.set_exists("gene", "pathwayId");
        filters.set_missing("donor", "gender");
        assert!(filters.facet("gene", "pathwayId").unwrap().exists);
        assert!(filters.facet("donor", "gender").unwrap().missing);

        filters.clear_exists("gene", "pathwayId");
        filters.clear_missing("donor", "gender");
        assert!(filters.is_empty());

        filters.clear_missing("donor", "gender");
        assert!(filters.is_empty());
    }

    #[test]
    fn test_overwrite_replaces_facet() {
        let mut filters = Filters::new();
        filters.add_terms("donor", "gender", terms(&["male", "female"]));
        filters.set_exists("donor", "gender");

        filters.overwrite("donor", "gender", terms(&["other"]));
        let gender = filters.facet("donor", "gender").unwrap();
        assert_eq!(gender.include, terms(&["other"]));
        assert!(!gender.exists);
    }
}
