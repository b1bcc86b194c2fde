//! Converts parse trees to query objects and back.

use tracing::debug;

use crate::ast::Node;
use crate::config::EngineConfig;
use crate::error::ParseError;
use crate::identifier::Identifier;
use crate::processors::{decode_filter, encode_facet, DropReason, DroppedNode};
use crate::query::{Filters, QueryObject};

/// Result of decoding a parse tree, with everything that was left out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decoded {
    pub query: QueryObject,
    pub dropped: Vec<DroppedNode>,
}

impl Decoded {
    /// An empty query standing in for text that failed to parse.
    pub fn unparseable(error: &ParseError) -> Self {
        Self {
            query: QueryObject::default(),
            dropped: vec![DroppedNode::new(
                "pql",
                DropReason::Unparseable(error.message.clone()),
            )],
        }
    }
}

/// Tree ⇄ query object converter.
#[derive(Debug, Clone, Default)]
pub struct QueryConverter {
    config: EngineConfig,
}

impl QueryConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decodes a statement. Filters come from the first top-level `and` when there is one,
    /// otherwise from the top-level list itself; directives are always read from the top level.
    pub fn decode(&self, nodes: &[Node]) -> Decoded {
        let mut query = QueryObject::default();
        let mut dropped = Vec::new();

        let conjunction = nodes.iter().position(|node| matches!(node, Node::And(_)));

        for (i, node) in nodes.iter().enumerate() {
            match node {
                Node::Select(fields) => {
                    let fields = fields.iter().map(String::as_str);
                    self.extend_custom_selects(&mut query.params.custom_selects, fields);
                }
                Node::Facets(_) => query.params.facets = true,
                Node::Sort(fields) => {
                    if query.params.sort.is_empty() {
                        query.params.sort = fields.clone();
                    }
                }
                Node::Limit(limit) => {
                    if query.params.limit.is_empty() {
                        query.params.limit = *limit;
                    }
                }
                Node::And(children) if conjunction == Some(i) => {
                    for child in children {
                        decode_filter(child, &mut query.filters, &mut dropped);
                    }
                }
                _ if conjunction.is_some() => {
                    dropped.push(DroppedNode::new(node.name(), DropReason::OutsideConjunction));
                }
                _ => decode_filter(node, &mut query.filters, &mut dropped),
            }
        }

        query.params.select_all = true;
        query.filters.prune();

        for node in &dropped {
            debug!(op = node.op, reason = %node.reason, "dropped node while decoding");
        }

        Decoded { query, dropped }
    }

    /// Encodes a query object in the fixed order `select(*)`, custom `select`, `facets(*)`,
    /// filters, `sort`, `limit`.
    pub fn encode(&self, query: &QueryObject) -> Vec<Node> {
        let params = &query.params;
        let mut nodes = Vec::new();

        if params.select_all {
            nodes.push(Node::Select(vec!["*".to_string()]));
        }

        let mut custom_selects = Vec::new();
        let fields = params.custom_selects.iter().map(String::as_str);
        self.extend_custom_selects(&mut custom_selects, fields);
        if !custom_selects.is_empty() {
            nodes.push(Node::Select(custom_selects));
        }

        if params.facets {
            nodes.push(Node::Facets(vec!["*".to_string()]));
        }

        nodes.extend(encode_filters(&query.filters));

        if !params.sort.is_empty() {
            nodes.push(Node::Sort(params.sort.clone()));
        }
        if !params.limit.is_empty() {
            nodes.push(Node::Limit(params.limit));
        }

        nodes
    }

    /// Appends allowed, not yet present fields to `selects`.
    pub(crate) fn extend_custom_selects<'a>(
        &self,
        selects: &mut Vec<String>,
        fields: impl IntoIterator<Item = &'a str>,
    ) {
        for field in fields {
            if self.config.allows(field) && !selects.iter().any(|s| s == field) {
                selects.push(field.to_string());
            }
        }
    }
}

/// Encodes the filter tree alone. More than one leaf is wrapped in `and(...)`. Facets whose
/// `category.facet` would not read back as the same pair are skipped.
pub fn encode_filters(filters: &Filters) -> Vec<Node> {
    let mut leaves = Vec::new();
    for (category, facets) in filters.categories() {
        for (facet, filter) in facets.iter() {
            let Some(id) = Identifier::from_parts(category, facet) else {
                debug!(category = category, facet = facet, "skipped facet with invalid field");
                continue;
            };
            if let Some(node) = encode_facet(&id, filter) {
                leaves.push(node);
            }
        }
    }

    if leaves.len() > 1 {
        vec![Node::And(leaves)]
    } else {
        leaves
    }
}
