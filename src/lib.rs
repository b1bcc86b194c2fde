//! Bidirectional translator between portal PQL text and a UI-friendly query object.
//!
//! ```text
//! PQL text ──codec──▶ Vec<Node> ──converter──▶ QueryObject ──mutators / merge──▶ QueryObject
//!     ▲                                                                              │
//!     └──────────────────codec◀── Vec<Node> ◀──converter─────────────────────────────┘
//! ```
//!
//! [`PqlService`] wraps one such round trip per operation, [`PqlBuilder`] chains them and
//! [`api`] exposes them as free functions.

pub mod api;
pub mod ast;
pub mod builder;
pub mod codec;
pub mod config;
pub mod converter;
pub mod error;
pub mod identifier;
pub mod lexer;
pub mod merge;
pub mod mutators;
pub mod parser;
pub mod printer;
pub mod processors;
pub mod query;
pub mod service;
pub mod token;

pub use ast::{CompOp, Direction, Limit, Node, SortField, Term};
pub use builder::PqlBuilder;
pub use codec::{PqlCodec, PqlTextCodec};
pub use config::EngineConfig;
pub use converter::{Decoded, QueryConverter};
pub use error::{ConfigError, ParseError};
pub use identifier::Identifier;
pub use processors::{DropReason, DroppedNode};
pub use query::{FacetFilter, FieldMap, Filters, Params, QueryObject};
pub use service::PqlService;
