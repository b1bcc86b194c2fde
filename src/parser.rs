//! PQL parser
//!
//! ## Parse flow
//!
//! ```text
//! parse()
//!   ├─ empty input → []
//!   └─ parse_call(top_level) (',' parse_call(top_level))*
//!        ├─ expect call name (Identifier)
//!        ├─ expect '('
//!        ├─ dispatch on name
//!        │    ├─ and / or       → parse_call(nested) (',' parse_call(nested))*
//!        │    ├─ not            → parse_call(nested)
//!        │    ├─ eq / ne / gt / ge / lt / le → field ',' value
//!        │    ├─ in             → field (',' value)+
//!        │    ├─ exists/missing → field
//!        │    ├─ select/facets  → ('*' | field) (',' ('*' | field))*
//!        │    ├─ sort           → ['+' | '-'] field (',' ['+' | '-'] field)*
//!        │    ├─ limit          → integer [',' integer]
//!        │    └─ count          → (nothing; top level only)
//!        └─ expect ')'
//! ```
//!
//! A top-level `count()` takes every following top-level call as its children, so
//! `count(),eq(donor.age,1)` becomes `Count([Eq(..)])`.
//!
//! ## Values
//! - **Strings**: `"double"` or `'single'` quoted, backslash escapes
//! - **Numbers**: `123`, `-45`, `2.51`
//! - **Bare identifiers**: read as strings, e.g. `eq(donor.gender,male)`

use crate::ast::{CompOp, Limit, Node, SortField, Term};
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    position: usize,
}

/// Lexes and parses a PQL statement.
pub fn parse(input: &str) -> Result<Vec<Node>, ParseError> {
    let tokens: Vec<_> = Lexer::new(input).collect();
    Parser::new(&tokens).parse()
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Returns the current token without advancing
    fn peek(&self) -> Option<&'a Token<'a>> {
        self.tokens.get(self.position)
    }

    /// Returns the current token and advances
    fn advance(&mut self) -> Option<&'a Token<'a>> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Checks whether the current token has the given kind
    fn match_token(&self, kind: &TokenKind) -> bool {
        match self.peek() {
            Some(token) => std::mem::discriminant(&token.kind) == std::mem::discriminant(kind),
            None => false,
        }
    }

    /// Expects a token of the given kind and advances, or fails
    fn expect(&mut self, expected: TokenKind) -> Result<&'a Token<'a>, ParseError> {
        match self.peek() {
            Some(token)
                if std::mem::discriminant(&token.kind) == std::mem::discriminant(&expected) =>
            {
                self.position += 1;
                Ok(token)
            }
            Some(token) => Err(ParseError::at_position(
                format!(
                    "Expected {}, found {}",
                    expected.describe(),
                    token.kind.describe()
                ),
                token.span,
            )),
            None => Err(self.end_of_input(&expected.describe())),
        }
    }

    fn end_of_input(&self, expected: &str) -> ParseError {
        ParseError::new(
            format!("Expected {}, but reached end of input", expected),
            None,
        )
    }

    pub fn parse(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        if self.peek().is_none() {
            return Ok(nodes);
        }

        loop {
            let node = self.parse_call(true)?;

            if let Node::Count(_) = node {
                let mut children = Vec::new();
                while self.match_token(&TokenKind::Comma) {
                    self.advance();
                    children.push(self.parse_call(false)?);
                }
                self.expect_end()?;
                nodes.push(Node::Count(children));
                return Ok(nodes);
            }

            nodes.push(node);

            match self.peek() {
                None => break,
                Some(token) if token.kind == TokenKind::Comma => {
                    self.advance();
                }
                Some(token) => {
                    return Err(ParseError::at_position(
                        format!("Expected ',' between calls, found {}", token.kind.describe()),
                        token.span,
                    ));
                }
            }
        }

        Ok(nodes)
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(ParseError::at_position(
                format!("Unexpected {} after statement", token.kind.describe()),
                token.span,
            )),
        }
    }

    /// Parses one `name(args)` call
    fn parse_call(&mut self, top_level: bool) -> Result<Node, ParseError> {
        let name_token = self.expect(TokenKind::Identifier(""))?;
        let TokenKind::Identifier(name) = name_token.kind else {
            return Err(ParseError::at_position(
                "Expected operator name".to_string(),
                name_token.span,
            ));
        };

        self.expect(TokenKind::LParen)?;

        let node = match name {
            "and" => Node::And(self.parse_node_list()?),
            "or" => Node::Or(self.parse_node_list()?),
            "not" => Node::Not(Box::new(self.parse_call(false)?)),
            "eq" => {
                let field = self.parse_field()?;
                self.expect(TokenKind::Comma)?;
                let value = self.parse_value()?;
                Node::Eq { field, value }
            }
            "in" => {
                let field = self.parse_field()?;
                let mut values = Vec::new();
                loop {
                    self.expect(TokenKind::Comma)?;
                    values.push(self.parse_value()?);
                    if self.match_token(&TokenKind::RParen) {
                        break;
                    }
                }
                Node::In { field, values }
            }
            "exists" => Node::Exists(self.parse_field()?),
            "missing" => Node::Missing(self.parse_field()?),
            "select" => Node::Select(self.parse_projection()?),
            "facets" => Node::Facets(self.parse_projection()?),
            "sort" => Node::Sort(self.parse_sort_fields()?),
            "limit" => Node::Limit(self.parse_limit()?),
            "count" if top_level => Node::Count(Vec::new()),
            "count" => {
                return Err(ParseError::at_position(
                    "count() is only allowed at the top level".to_string(),
                    name_token.span,
                ));
            }
            other => match CompOp::from_name(other) {
                Some(op) => {
                    let field = self.parse_field()?;
                    self.expect(TokenKind::Comma)?;
                    let value = self.parse_value()?;
                    Node::Compare { op, field, value }
                }
                None => {
                    return Err(ParseError::at_position(
                        format!("Unknown operator '{}'", other),
                        name_token.span,
                    ));
                }
            },
        };

        self.expect(TokenKind::RParen)?;
        Ok(node)
    }

    /// `call (',' call)*`, used by `and` and `or`
    fn parse_node_list(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = vec![self.parse_call(false)?];
        while self.match_token(&TokenKind::Comma) {
            self.advance();
            nodes.push(self.parse_call(false)?);
        }
        Ok(nodes)
    }

    fn parse_field(&mut self) -> Result<String, ParseError> {
        let token = self.expect(TokenKind::Identifier(""))?;
        match token.kind {
            TokenKind::Identifier(name) => Ok(name.to_string()),
            _ => Err(ParseError::at_position(
                "Expected field name".to_string(),
                token.span,
            )),
        }
    }

    fn parse_value(&mut self) -> Result<Term, ParseError> {
        let Some(token) = self.advance() else {
            return Err(self.end_of_input("value"));
        };
        match &token.kind {
            TokenKind::String(s) => Ok(Term::Text(s.clone())),
            TokenKind::Integer(n) => Ok(Term::from(*n)),
            TokenKind::Decimal(n) => Ok(Term::from(*n)),
            // Unquoted strings
            TokenKind::Identifier(s) => Ok(Term::Text(s.to_string())),
            other => Err(ParseError::at_position(
                format!("Expected value, found {}", other.describe()),
                token.span,
            )),
        }
    }

    /// `('*' | field) (',' ('*' | field))*`
    fn parse_projection(&mut self) -> Result<Vec<String>, ParseError> {
        let mut fields = Vec::new();
        loop {
            let Some(token) = self.advance() else {
                return Err(self.end_of_input("field or '*'"));
            };
            match token.kind {
                TokenKind::Star => fields.push("*".to_string()),
                TokenKind::Identifier(name) => fields.push(name.to_string()),
                ref other => {
                    return Err(ParseError::at_position(
                        format!("Expected field or '*', found {}", other.describe()),
                        token.span,
                    ));
                }
            }

            if !self.match_token(&TokenKind::Comma) {
                return Ok(fields);
            }
            self.advance();
        }
    }

    /// `['+' | '-'] field (',' ['+' | '-'] field)*`; a bare field sorts ascending
    fn parse_sort_fields(&mut self) -> Result<Vec<SortField>, ParseError> {
        let mut fields = Vec::new();
        loop {
            let descending = if self.match_token(&TokenKind::Dash) {
                self.advance();
                true
            } else {
                if self.match_token(&TokenKind::Plus) {
                    self.advance();
                }
                false
            };

            let field = self.parse_field()?;
            fields.push(if descending {
                SortField::desc(field)
            } else {
                SortField::asc(field)
            });

            if !self.match_token(&TokenKind::Comma) {
                return Ok(fields);
            }
            self.advance();
        }
    }

    /// `size` or `from ',' size`
    fn parse_limit(&mut self) -> Result<Limit, ParseError> {
        let first = self.parse_integer()?;
        if self.match_token(&TokenKind::Comma) {
            self.advance();
            let size = self.parse_integer()?;
            Ok(Limit::from_size(first, size))
        } else {
            Ok(Limit::size(first))
        }
    }

    fn parse_integer(&mut self) -> Result<f64, ParseError> {
        let Some(token) = self.advance() else {
            return Err(self.end_of_input("integer"));
        };
        match token.kind {
            TokenKind::Integer(n) => Ok(n as f64),
            // Wide integers and exponent forms such as `1e21` arrive as decimals
            TokenKind::Decimal(n) if n.fract() == 0.0 => Ok(n),
            ref other => Err(ParseError::at_position(
                format!("Expected integer, found {}", other.describe()),
                token.span,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Direction;

    #[test]
    fn test_empty_input() {
        assert_eq!(parse("").unwrap(), vec![]);
        assert_eq!(parse("   ").unwrap(), vec![]);
    }

    #[test]
    fn test_simple_predicate() {
        let nodes = parse(r#"eq(donor.gender,"male")"#).unwrap();
        assert_eq!(
            nodes,
            vec![Node::Eq {
                field: "donor.gender".to_string(),
                value: Term::from("male"),
            }]
        );
    }

    #[test]
    fn test_statement_shape() {
        let nodes = parse("select(*),facets(*),in(donor.age,21,23),sort(age,-gender,+type),limit(1,99)").unwrap();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0], Node::Select(vec!["*".to_string()]));
        assert_eq!(nodes[1], Node::Facets(vec!["*".to_string()]));
        assert_eq!(
            nodes[2],
            Node::In {
                field: "donor.age".to_string(),
                values: vec![Term::from(21), Term::from(23)],
            }
        );

        if let Node::Sort(fields) = &nodes[3] {
            let directions: Vec<_> = fields.iter().map(|f| f.direction).collect();
            assert_eq!(directions, vec![Direction::Asc, Direction::Desc, Direction::Asc]);
            assert_eq!(fields[1].field, "gender");
        } else {
            panic!("Expected sort node");
        }

        assert_eq!(nodes[4], Node::Limit(Limit::from_size(1.0, 99.0)));
    }

    #[test]
    fn test_single_argument_limit() {
        assert_eq!(parse("limit(77)").unwrap(), vec![Node::Limit(Limit::size(77.0))]);
    }

    #[test]
    fn test_nested_groups() {
        let nodes = parse(r#"and(or(eq(donor.age,123),missing(donor.age)),not(in(donor.gender,"a","b")))"#).unwrap();
        let Node::And(children) = &nodes[0] else {
            panic!("Expected and node");
        };
        assert_eq!(children.len(), 2);
        assert!(matches!(&children[0], Node::Or(inner) if inner.len() == 2));
        assert!(matches!(&children[1], Node::Not(inner) if matches!(**inner, Node::In { .. })));
    }

    #[test]
    fn test_comparison_operators() {
        let nodes = parse("gt(donor.age,60),le(donor.age,90)").unwrap();
        assert!(matches!(&nodes[0], Node::Compare { op: CompOp::Gt, .. }));
        assert!(matches!(&nodes[1], Node::Compare { op: CompOp::Le, .. }));
    }

    #[test]
    fn test_count_takes_following_calls() {
        let nodes = parse("count(),eq(donor.age,1),missing(gene.id)").unwrap();
        assert_eq!(nodes.len(), 1);
        let Node::Count(children) = &nodes[0] else {
            panic!("Expected count node");
        };
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_count_must_be_top_level() {
        assert!(parse("and(count())").is_err());
    }

    #[test]
    fn test_bare_and_single_quoted_values() {
        let nodes = parse("eq(gene.id,'G1'),eq(donor.gender,male)").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Eq { field: "gene.id".into(), value: Term::from("G1") },
                Node::Eq { field: "donor.gender".into(), value: Term::from("male") },
            ]
        );
    }

    #[test]
    fn test_invalid_statements() {
        assert!(parse("whatever").is_err());
        assert!(parse("eq(foo,)").is_err());
        assert!(parse("in(donor.age)").is_err());
        assert!(parse("in(donor.age,1,)").is_err());
        assert!(parse("select()").is_err());
        assert!(parse("and()").is_err());
        assert!(parse("not(eq(a.b,1),eq(a.b,2))").is_err());
        assert!(parse("eq(a.b,1) eq(a.c,2)").is_err());
        assert!(parse("eq(a.b,1),").is_err());
        assert!(parse("nested(gene,eq(a.b,1))").is_err());
        assert!(parse("limit(2.5)").is_err());
    }

    #[test]
    fn test_limit_accepts_whole_decimals() {
        assert_eq!(parse("limit(1e2)").unwrap(), vec![Node::Limit(Limit::size(100.0))]);
        assert_eq!(
            parse("limit(5,10000000000000000000)").unwrap(),
            vec![Node::Limit(Limit::from_size(5.0, 1e19))]
        );
        assert!(parse("limit(2.5e-1)").is_err());
    }

    #[test]
    fn test_error_position() {
        let err = parse("eq(a.b,1),foo(x)").unwrap_err();
        assert_eq!(err.message, "Unknown operator 'foo'");
        assert_eq!(err.span.map(|s| s.start), Some(10));

        let err = parse("eq(a.b,1").unwrap_err();
        assert!(err.span.is_none());
    }
}
