//! The query object: the UI-facing model of a PQL statement.
//!
//! ```text
//! QueryObject
//!   ├─ params:  selectAll, customSelects, facets, sort, limit
//!   └─ filters: category → facet → FacetFilter { in, not, exists, missing }
//! ```
//!
//! Categories and facets keep insertion order, which decides the order in which filters
//! are printed.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ast::{Limit, SortField, Term};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryObject {
    pub params: Params,
    pub filters: Filters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Params {
    /// Printed as `select(*)`. Always true for queries issued by the UI.
    pub select_all: bool,
    /// Extra projections on top of `*`, restricted to the configured allow-list.
    pub custom_selects: Vec<String>,
    /// Printed as `facets(*)`.
    pub facets: bool,
    pub sort: Vec<SortField>,
    pub limit: Limit,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            select_all: true,
            custom_selects: Vec::new(),
            facets: false,
            sort: Vec::new(),
            limit: Limit::default(),
        }
    }
}

/// Filter conditions on one facet. The present conditions are combined with an implicit "or".
///
/// An empty `include`/`exclude` list means the condition is absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FacetFilter {
    #[serde(rename = "in", default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<Term>,
    #[serde(rename = "not", default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<Term>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub exists: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub missing: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FacetFilter {
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty() && !self.exists && !self.missing
    }
}

/// `category → facet → FacetFilter`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(FieldMap<FieldMap<FacetFilter>>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn category(&self, category: &str) -> Option<&FieldMap<FacetFilter>> {
        self.0.get(category)
    }

    pub fn facet(&self, category: &str, facet: &str) -> Option<&FacetFilter> {
        self.0.get(category)?.get(facet)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &FieldMap<FacetFilter>)> {
        self.0.iter()
    }

    /// Creates the category and facet entries on first use.
    pub fn facet_mut(&mut self, category: &str, facet: &str) -> &mut FacetFilter {
        self.0.entry_or_default(category).entry_or_default(facet)
    }

    pub(crate) fn categories_mut(&mut self) -> &mut FieldMap<FieldMap<FacetFilter>> {
        &mut self.0
    }

    /// Drops empty facets, then empty categories.
    pub fn prune(&mut self) {
        self.0.retain(|_, facets| {
            facets.retain(|_, filter| !filter.is_empty());
            !facets.is_empty()
        });
    }
}

/// A string-keyed map that keeps insertion order.
///
/// Filter maps hold a handful of entries, so lookups are linear scans.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for FieldMap<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> FieldMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let i = self.position(key)?;
        Some(&mut self.entries[i].1)
    }

    /// Replaces the value in place when the key exists, otherwise appends.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn entry_or_default(&mut self, key: &str) -> &mut V
    where
        V: Default,
    {
        let i = match self.position(key) {
            Some(i) => i,
            None => {
                self.entries.push((key.to_string(), V::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }

    /// Removes the entry, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let i = self.position(key)?;
        Some(self.entries.remove(i).1)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &mut V) -> bool) {
        self.entries.retain_mut(|(k, v)| keep(k, v));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for FieldMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for FieldMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for FieldMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for FieldMapVisitor<V> {
            type Value = FieldMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = FieldMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor(PhantomData))
    }
}
