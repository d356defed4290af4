//! Core data model: RDF nodes, value-keyed triples, and full quads.
//!
//! Two views of a statement coexist. A [`Triple`] is the comparison key: the
//! plain string value of subject, predicate and object, with term kind,
//! datatype, language and graph dropped. A [`Quad`] keeps the complete terms
//! so that unmatched statements can be written back out faithfully.

use std::collections::HashSet;

/// `xsd:string`, the implicit datatype of a plain literal.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// `xsd:dateTime`.
pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

/// `rdf:langString`, the datatype of every language-tagged literal.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// A single RDF term as found in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// An absolute IRI.
    Iri(String),
    /// A blank node label (without the `_:` prefix).
    BlankNode(String),
    /// A literal with its lexical form.
    Literal {
        /// Lexical form.
        value: String,
        /// Datatype IRI. Language-tagged literals carry `rdf:langString`.
        datatype: String,
        /// Language tag, if any.
        language: Option<String>,
    },
}

impl Node {
    /// Creates a plain `xsd:string` literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Node::Literal {
            value: value.into(),
            datatype: XSD_STRING.to_string(),
            language: None,
        }
    }

    /// Creates a typed literal.
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Node::Literal {
            value: value.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// Returns the string value used for comparison: the IRI text, the blank
    /// node label, or the literal's lexical form.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Node::Iri(iri) => iri,
            Node::BlankNode(label) => label,
            Node::Literal { value, .. } => value,
        }
    }

    /// Returns the datatype IRI if this node is a literal.
    #[must_use]
    pub fn datatype(&self) -> Option<&str> {
        match self {
            Node::Literal { datatype, .. } => Some(datatype),
            _ => None,
        }
    }
}

/// Value-based comparison key for a statement, graph context discarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    /// Subject value.
    pub subject: String,
    /// Predicate value.
    pub predicate: String,
    /// Object value.
    pub object: String,
}

impl Triple {
    /// Builds a triple from its three values.
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// A set of triples. Set semantics: a triple is present at most once.
pub type TripleSet = HashSet<Triple>;

/// A complete statement as parsed from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    /// Subject term.
    pub subject: Node,
    /// Predicate term.
    pub predicate: Node,
    /// Object term.
    pub object: Node,
    /// Named graph, or `None` for the default graph.
    pub graph: Option<Node>,
}

impl Quad {
    /// Returns the comparison key of this quad using raw term values.
    #[must_use]
    pub fn triple(&self) -> Triple {
        Triple::new(self.subject.value(), self.predicate.value(), self.object.value())
    }
}
