//! N-Quads serializer for unmatched snapshot statements.
//!
//! Produces one statement per line with absolute IRIs, `_:` blank node
//! labels and escaped literals. Default-graph quads are written without a
//! graph term.

use std::fmt::Write as _;

use crate::model::{Node, Quad, XSD_STRING};

/// Serializes `quads` to an N-Quads string, in iteration order.
#[must_use]
pub fn to_nquads<'a, I>(quads: I) -> String
where
    I: IntoIterator<Item = &'a Quad>,
{
    let mut out = String::new();
    for quad in quads {
        quad_line(&mut out, quad);
    }
    out
}

fn quad_line(out: &mut String, quad: &Quad) {
    term(out, &quad.subject);
    out.push(' ');
    term(out, &quad.predicate);
    out.push(' ');
    term(out, &quad.object);
    if let Some(graph) = &quad.graph {
        out.push(' ');
        term(out, graph);
    }
    out.push_str(" .\n");
}

fn term(out: &mut String, node: &Node) {
    match node {
        Node::Iri(iri) => {
            out.push('<');
            push_escaped_iri(out, iri);
            out.push('>');
        }
        Node::BlankNode(label) => {
            out.push_str("_:");
            out.push_str(label);
        }
        Node::Literal {
            value,
            datatype,
            language,
        } => {
            out.push('"');
            push_escaped_literal(out, value);
            out.push('"');
            if let Some(lang) = language {
                out.push('@');
                out.push_str(lang);
            } else if !datatype.is_empty() && datatype != XSD_STRING {
                out.push_str("^^<");
                push_escaped_iri(out, datatype);
                out.push('>');
            }
        }
    }
}

fn push_escaped_literal(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
}

fn push_escaped_iri(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | '\u{0}'..='\u{20}' => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
}
