//! Prints a parse tree back to PQL text.

use std::fmt::Write;

use crate::ast::{Limit, Node, SortField, Term};

/// Serializes a statement. Nodes that print as nothing (an empty `sort`, `select`, or
/// `limit`) are left out of the comma-separated result.
pub fn print(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        let text = print_node(node);
        if text.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(',');
        }
        out.push_str(&text);
    }
    out
}

pub fn print_node(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::And(children) | Node::Or(children) => {
            out.push_str(node.name());
            out.push('(');
            write_children(out, children);
            out.push(')');
        }
        Node::Not(child) => {
            out.push_str("not(");
            write_node(out, child);
            out.push(')');
        }
        Node::Eq { field, value } => {
            let _ = write!(out, "eq({},", field);
            write_term(out, value);
            out.push(')');
        }
        Node::Compare { op, field, value } => {
            let _ = write!(out, "{}({},", op.name(), field);
            write_term(out, value);
            out.push(')');
        }
        Node::In { field, values } => {
            let _ = write!(out, "in({}", field);
            for value in values {
                out.push(',');
                write_term(out, value);
            }
            out.push(')');
        }
        Node::Exists(field) | Node::Missing(field) => {
            let _ = write!(out, "{}({})", node.name(), field);
        }
        Node::Select(fields) | Node::Facets(fields) => {
            if !fields.is_empty() {
                let _ = write!(out, "{}({})", node.name(), fields.join(","));
            }
        }
        Node::Sort(fields) => write_sort(out, fields),
        Node::Limit(limit) => write_limit(out, limit),
        Node::Count(children) => {
            out.push_str("count()");
            for child in children {
                let text = print_node(child);
                if !text.is_empty() {
                    out.push(',');
                    out.push_str(&text);
                }
            }
        }
    }
}

fn write_children(out: &mut String, children: &[Node]) {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_node(out, child);
    }
}

fn write_term(out: &mut String, term: &Term) {
    match term {
        Term::Number(n) => {
            let _ = write!(out, "{}", n);
        }
        Term::Text(s) => {
            out.push('"');
            for c in s.chars() {
                if c == '"' || c == '\\' {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('"');
        }
    }
}

fn write_sort(out: &mut String, fields: &[SortField]) {
    if fields.is_empty() {
        return;
    }
    out.push_str("sort(");
    for (i, sort) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push(sort.direction.symbol());
        out.push_str(&sort.field);
    }
    out.push(')');
}

/// Truncates to a non-negative integer
fn positive_integer(n: f64) -> u64 {
    if n > 0.0 {
        n.floor() as u64
    } else {
        0
    }
}

fn write_limit(out: &mut String, limit: &Limit) {
    if limit.is_empty() {
        return;
    }
    let size = limit.size.map(positive_integer).unwrap_or(0);
    let _ = match limit.from {
        Some(from) => write!(out, "limit({},{})", positive_integer(from), size),
        None => write!(out, "limit({})", size),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CompOp;
    use crate::parser::parse;

    #[test]
    fn test_print_canonical_statements() {
        let inputs = [
            r#"select(*),eq(donor.gender,"male")"#,
            r#"select(*),select(transcripts,occurrences),facets(*),in(donor.gender,"male","female"),sort(+donor.age,-donor.foo),limit(1,99)"#,
            r#"and(or(in(donor.age,21,23),not(eq(donor.age,22))),exists(gene.pathwayId),missing(donor.gender))"#,
            "count(),and(eq(donor.age,1),gt(donor.age,2))",
            "eq(donor.weight,2.5),ne(donor.age,-3)",
        ];
        for input in inputs {
            assert_eq!(print(&parse(input).unwrap()), input);
        }
    }

    #[test]
    fn test_sort_defaults_to_ascending() {
        assert_eq!(print(&parse("sort(age,-gender)").unwrap()), "sort(+age,-gender)");
    }

    #[test]
    fn test_limit_is_truncated() {
        assert_eq!(print(&[Node::Limit(Limit::size(2.51))]), "limit(2)");
        assert_eq!(print(&[Node::Limit(Limit::from_size(-4.0, 9.9))]), "limit(0,9)");
        assert_eq!(
            print(&[Node::Limit(Limit { from: Some(3.0), size: None })]),
            "limit(3,0)"
        );
    }

    #[test]
    fn test_empty_directives_are_skipped() {
        let nodes = vec![
            Node::Select(vec![]),
            Node::Eq { field: "a.b".into(), value: Term::from(1) },
            Node::Sort(vec![]),
            Node::Limit(Limit::default()),
        ];
        assert_eq!(print(&nodes), "eq(a.b,1)");
    }

    #[test]
    fn test_strings_are_escaped() {
        let node = Node::Compare {
            op: CompOp::Ne,
            field: "donor.name".into(),
            value: Term::from(r#"say "hi" \o/"#),
        };
        let text = print_node(&node);
        assert_eq!(text, r#"ne(donor.name,"say \"hi\" \\o/")"#);
        assert_eq!(parse(&text).unwrap(), vec![node]);
    }

    #[test]
    fn test_extreme_numbers_read_back() {
        for value in [1e21, 1e-7, -3.5e30] {
            let node = Node::Eq { field: "donor.weight".into(), value: Term::from(value) };
            assert_eq!(parse(&print_node(&node)).unwrap(), vec![node]);
        }

        let limit = Node::Limit(Limit::size(1e19));
        assert_eq!(print_node(&limit), "limit(10000000000000000000)");
        assert_eq!(parse(&print_node(&limit)).unwrap(), vec![limit]);
    }

    #[test]
    fn test_count_without_children() {
        assert_eq!(print(&[Node::Count(vec![])]), "count()");
    }
}
