//! Per-operator translation between parse tree nodes and facet filters.
//!
//! | Operator      | Decode                                   | Encode                          |
//! |---------------|------------------------------------------|---------------------------------|
//! | `in` / `eq`   | `filters[cat][facet].in = values`        | `eq` for one term, else `in`    |
//! | `not`         | `not(in/eq)` → `.not = values`           | `not(eq/in)` of the `not` list  |
//! | `or`          | decodes every child into the same map    | wraps a facet's leaves if > 1   |
//! | `exists`      | `.exists = true`                         | `exists(field)`                 |
//! | `missing`     | `.missing = true`                        | `missing(field)`                |

use std::fmt;

use crate::ast::{Node, Term};
use crate::identifier::Identifier;
use crate::query::{FacetFilter, Filters};

/// Why a node was left out of the query object.
#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    /// The field is not a `category.facet` pair.
    InvalidIdentifier(String),
    /// The node carries no values.
    EmptyValues,
    /// `not` wraps something other than `in`/`eq`.
    NotOperand(&'static str),
    /// The operator has no place in a query object.
    Unsupported,
    /// A predicate sits next to the top-level `and` instead of inside it.
    OutsideConjunction,
    /// The whole text failed to parse.
    Unparseable(String),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::InvalidIdentifier(field) => write!(f, "invalid identifier '{}'", field),
            DropReason::EmptyValues => f.write_str("no values"),
            DropReason::NotOperand(op) => write!(f, "not() wraps unsupported '{}'", op),
            DropReason::Unsupported => f.write_str("unsupported operator"),
            DropReason::OutsideConjunction => f.write_str("outside the top-level and()"),
            DropReason::Unparseable(message) => write!(f, "unparseable text: {}", message),
        }
    }
}

/// A node (or text) that contributed nothing to a decoded query.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedNode {
    pub op: &'static str,
    pub reason: DropReason,
}

impl DroppedNode {
    pub fn new(op: &'static str, reason: DropReason) -> Self {
        Self { op, reason }
    }
}

impl fmt::Display for DroppedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.op, self.reason)
    }
}

#[derive(Clone, Copy)]
enum TermSlot {
    Include,
    Exclude,
}

/// Decodes one filter node into `filters`, recording anything it cannot use.
pub fn decode_filter(node: &Node, filters: &mut Filters, dropped: &mut Vec<DroppedNode>) {
    match node {
        Node::In { field, values } => {
            decode_terms(node, field, values, TermSlot::Include, filters, dropped)
        }
        Node::Eq { field, value } => decode_terms(
            node,
            field,
            std::slice::from_ref(value),
            TermSlot::Include,
            filters,
            dropped,
        ),
        Node::Not(inner) => match inner.as_ref() {
            Node::In { field, values } => {
                decode_terms(node, field, values, TermSlot::Exclude, filters, dropped)
            }
            Node::Eq { field, value } => decode_terms(
                node,
                field,
                std::slice::from_ref(value),
                TermSlot::Exclude,
                filters,
                dropped,
            ),
            other => dropped.push(DroppedNode::new("not", DropReason::NotOperand(other.name()))),
        },
        Node::Or(children) => {
            if children.is_empty() {
                dropped.push(DroppedNode::new("or", DropReason::EmptyValues));
            }
            // "has-or-missing" style groups land in the same facet entry
            for child in children {
                decode_filter(child, filters, dropped);
            }
        }
        Node::Exists(field) => match Identifier::parse(field) {
            Some(id) => filters.facet_mut(&id.category, &id.facet).exists = true,
            None => dropped.push(invalid_identifier(node, field)),
        },
        Node::Missing(field) => match Identifier::parse(field) {
            Some(id) => filters.facet_mut(&id.category, &id.facet).missing = true,
            None => dropped.push(invalid_identifier(node, field)),
        },
        Node::And(_)
        | Node::Compare { .. }
        | Node::Count(_)
        | Node::Select(_)
        | Node::Facets(_)
        | Node::Sort(_)
        | Node::Limit(_) => dropped.push(DroppedNode::new(node.name(), DropReason::Unsupported)),
    }
}

fn invalid_identifier(node: &Node, field: &str) -> DroppedNode {
    DroppedNode::new(node.name(), DropReason::InvalidIdentifier(field.to_string()))
}

fn decode_terms(
    node: &Node,
    field: &str,
    values: &[Term],
    slot: TermSlot,
    filters: &mut Filters,
    dropped: &mut Vec<DroppedNode>,
) {
    if values.is_empty() {
        dropped.push(DroppedNode::new(node.name(), DropReason::EmptyValues));
        return;
    }
    let Some(id) = Identifier::parse(field) else {
        dropped.push(invalid_identifier(node, field));
        return;
    };

    let facet = filters.facet_mut(&id.category, &id.facet);
    match slot {
        TermSlot::Include => facet.include = values.to_vec(),
        TermSlot::Exclude => facet.exclude = values.to_vec(),
    }
}

/// Encodes one facet's conditions, in the fixed order `in`, `not`, `exists`, `missing`.
/// More than one leaf is wrapped in `or(...)`.
pub fn encode_facet(id: &Identifier, filter: &FacetFilter) -> Option<Node> {
    let field = id.to_string();
    let mut leaves = Vec::with_capacity(4);

    if let Some(node) = encode_terms(&field, &filter.include) {
        leaves.push(node);
    }
    if let Some(node) = encode_terms(&field, &filter.exclude) {
        leaves.push(Node::Not(Box::new(node)));
    }
    if filter.exists {
        leaves.push(Node::Exists(field.clone()));
    }
    if filter.missing {
        leaves.push(Node::Missing(field));
    }

    match leaves.len() {
        0 => None,
        1 => leaves.pop(),
        _ => Some(Node::Or(leaves)),
    }
}

fn encode_terms(field: &str, terms: &[Term]) -> Option<Node> {
    match terms {
        [] => None,
        [term] => Some(Node::Eq {
            field: field.to_string(),
            value: term.clone(),
        }),
        _ => Some(Node::In {
            field: field.to_string(),
            values: terms.to_vec(),
        }),
    }
}
