//! Snapshot loading: one [`GraphLoader`] per RDF serialization.
//!
//! The format of a snapshot is either stated explicitly or derived from the
//! file extension; content is never sniffed. Every loader yields the same
//! thing: the file's statements as owned [`Quad`]s, in document order.
//! Triple formats produce quads in the default graph. Turtle and TriG
//! resolve relative IRIs against the snapshot's `file://` URL.

use std::collections::HashSet;
use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use sophia_api::parser::{QuadParser, TripleParser};
use sophia_api::quad::Quad as _;
use sophia_api::source::{QuadSource, StreamError, TripleSource};
use sophia_api::term::{Term as RdfTerm, TermKind};
use sophia_api::triple::Triple as _;
use sophia_iri::Iri;
use sophia_turtle::parser::trig::TriGParser;
use sophia_turtle::parser::turtle::TurtleParser;
use sophia_turtle::parser::{nq, nt};

use crate::error::{ReconcileError, Result};
use crate::model::{Node, Quad, TripleSet};
use crate::normalize::Normalizer;

/// Supported graph serializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    /// N-Triples 1.1.
    NTriples,
    /// N-Quads 1.1.
    NQuads,
    /// Turtle 1.1.
    Turtle,
    /// TriG 1.1.
    TriG,
}

impl GraphFormat {
    /// All formats, in the order they are listed to users.
    pub const ALL: [GraphFormat; 4] = [
        GraphFormat::NTriples,
        GraphFormat::NQuads,
        GraphFormat::Turtle,
        GraphFormat::TriG,
    ];

    /// Short name, also accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GraphFormat::NTriples => "nt",
            GraphFormat::NQuads => "nq",
            GraphFormat::Turtle => "ttl",
            GraphFormat::TriG => "trig",
        }
    }

    /// Maps a file extension to a format.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "nt" => Some(GraphFormat::NTriples),
            "nq" => Some(GraphFormat::NQuads),
            "ttl" | "turtle" => Some(GraphFormat::Turtle),
            "trig" => Some(GraphFormat::TriG),
            _ => None,
        }
    }

    /// Returns the loader for this format.
    #[must_use]
    pub fn loader(self) -> Box<dyn GraphLoader> {
        match self {
            GraphFormat::NTriples => Box::new(NTriplesLoader),
            GraphFormat::NQuads => Box::new(NQuadsLoader),
            GraphFormat::Turtle => Box::new(TurtleLoader),
            GraphFormat::TriG => Box::new(TrigLoader),
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nt" | "ntriples" | "n-triples" => Ok(GraphFormat::NTriples),
            "nq" | "nquads" | "n-quads" => Ok(GraphFormat::NQuads),
            "ttl" | "turtle" => Ok(GraphFormat::Turtle),
            "trig" => Ok(GraphFormat::TriG),
            other => Err(format!(
                "unknown graph format '{other}' (expected one of: {})",
                GraphFormat::ALL.map(GraphFormat::as_str).join(", ")
            )),
        }
    }
}

/// Parses one graph serialization into quads.
pub trait GraphLoader {
    /// The format this loader reads.
    fn format(&self) -> GraphFormat;

    /// Reads every statement from `reader`. `path` is used for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Parse`] on malformed input and
    /// [`ReconcileError::UnsupportedTerm`] on quoted triples or variables.
    fn read(&self, reader: &mut dyn BufRead, path: &Path) -> Result<Vec<Quad>>;
}

/// N-Triples loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct NTriplesLoader;

/// N-Quads loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct NQuadsLoader;

/// Turtle loader. Relative IRIs resolve against the file's URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurtleLoader;

/// TriG loader. Relative IRIs resolve against the file's URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrigLoader;

impl GraphLoader for NTriplesLoader {
    fn format(&self) -> GraphFormat {
        GraphFormat::NTriples
    }

    fn read(&self, reader: &mut dyn BufRead, path: &Path) -> Result<Vec<Quad>> {
        collect_triples(nt::parse_bufread(reader), path, self.format())
    }
}

impl GraphLoader for NQuadsLoader {
    fn format(&self) -> GraphFormat {
        GraphFormat::NQuads
    }

    fn read(&self, reader: &mut dyn BufRead, path: &Path) -> Result<Vec<Quad>> {
        collect_quads(nq::parse_bufread(reader), path, self.format())
    }
}

impl GraphLoader for TurtleLoader {
    fn format(&self) -> GraphFormat {
        GraphFormat::Turtle
    }

    fn read(&self, reader: &mut dyn BufRead, path: &Path) -> Result<Vec<Quad>> {
        let parser = TurtleParser {
            base: file_base_iri(path),
        };
        collect_triples(parser.parse(reader), path, self.format())
    }
}

impl GraphLoader for TrigLoader {
    fn format(&self) -> GraphFormat {
        GraphFormat::TriG
    }

    fn read(&self, reader: &mut dyn BufRead, path: &Path) -> Result<Vec<Quad>> {
        let parser = TriGParser {
            base: file_base_iri(path),
        };
        collect_quads(parser.parse(reader), path, self.format())
    }
}

/// Returns the `file://` URL of `path` for use as a base IRI, or `None`
/// if the path cannot be made absolute or is not valid UTF-8.
#[must_use]
pub fn file_base_iri(path: &Path) -> Option<Iri<String>> {
    let absolute = std::path::absolute(path).ok()?;
    let text = absolute.to_str()?.replace('\\', "/");
    let mut url = String::from("file://");
    if !text.starts_with('/') {
        url.push('/');
    }
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~/:@!$&'()*+,;=".contains(&byte) {
            url.push(char::from(byte));
        } else {
            let _ = write!(url, "%{byte:02X}");
        }
    }
    Iri::new(url).ok()
}

fn collect_triples<S: TripleSource>(
    mut source: S,
    path: &Path,
    format: GraphFormat,
) -> Result<Vec<Quad>> {
    let mut quads = Vec::new();
    source
        .try_for_each_triple(|t| -> Result<()> {
            quads.push(Quad {
                subject: to_node(t.s(), path)?,
                predicate: to_node(t.p(), path)?,
                object: to_node(t.o(), path)?,
                graph: None,
            });
            Ok(())
        })
        .map_err(|e| stream_error(e, path, format))?;
    Ok(quads)
}

fn collect_quads<S: QuadSource>(
    mut source: S,
    path: &Path,
    format: GraphFormat,
) -> Result<Vec<Quad>> {
    let mut quads = Vec::new();
    source
        .try_for_each_quad(|q| -> Result<()> {
            let graph = match q.g() {
                Some(g) => Some(to_node(g, path)?),
                None => None,
            };
            quads.push(Quad {
                subject: to_node(q.s(), path)?,
                predicate: to_node(q.p(), path)?,
                object: to_node(q.o(), path)?,
                graph,
            });
            Ok(())
        })
        .map_err(|e| stream_error(e, path, format))?;
    Ok(quads)
}

fn stream_error<E: std::error::Error>(
    err: StreamError<E, ReconcileError>,
    path: &Path,
    format: GraphFormat,
) -> ReconcileError {
    match err {
        StreamError::SourceError(e) => ReconcileError::Parse {
            path: path.to_path_buf(),
            format: format.as_str(),
            message: e.to_string(),
        },
        StreamError::SinkError(e) => e,
    }
}

fn to_node<T: RdfTerm>(term: T, path: &Path) -> Result<Node> {
    let unsupported = |kind: TermKind| ReconcileError::UnsupportedTerm {
        path: path.to_path_buf(),
        kind: format!("{kind:?}"),
    };
    let kind = term.kind();
    let node = match kind {
        TermKind::Iri => term.iri().map(|iri| Node::Iri(iri.as_str().to_string())),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| Node::BlankNode(id.as_str().to_string())),
        TermKind::Literal => term.lexical_form().map(|value| Node::Literal {
            value: value.to_string(),
            datatype: term
                .datatype()
                .map(|dt| dt.as_str().to_string())
                .unwrap_or_default(),
            language: term.language_tag().map(|tag| tag.as_str().to_string()),
        }),
        _ => None,
    };
    node.ok_or_else(|| unsupported(kind))
}

/// A fully loaded snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// File the snapshot was read from.
    pub path: PathBuf,
    /// Format it was parsed as.
    pub format: GraphFormat,
    /// Distinct quads in document order.
    pub quads: Vec<Quad>,
    /// Comparison keys of all quads, graph context stripped.
    pub triples: TripleSet,
}

impl Snapshot {
    /// Builds a snapshot from already parsed quads. Exact duplicate quads
    /// are dropped, keeping the first occurrence.
    #[must_use]
    pub fn from_quads(
        path: impl Into<PathBuf>,
        format: GraphFormat,
        quads: Vec<Quad>,
        normalizer: &Normalizer,
    ) -> Self {
        let mut seen = HashSet::with_capacity(quads.len());
        let quads: Vec<Quad> = quads
            .into_iter()
            .filter(|q| seen.insert(q.clone()))
            .collect();
        let triples = quads.iter().map(|q| normalizer.key(q)).collect();
        Self {
            path: path.into(),
            format,
            quads,
            triples,
        }
    }
}

/// Loads the snapshot at `path`.
///
/// `format` overrides the extension mapping.
///
/// # Errors
///
/// Returns [`ReconcileError::UnknownFormat`] if no format is given and the
/// extension is unknown, [`ReconcileError::Io`] if the file cannot be opened,
/// or any error of [`GraphLoader::read`].
pub fn load_snapshot(
    path: &Path,
    format: Option<GraphFormat>,
    normalizer: &Normalizer,
) -> Result<Snapshot> {
    let format = format
        .or_else(|| GraphFormat::from_path(path))
        .ok_or_else(|| ReconcileError::UnknownFormat {
            path: path.to_path_buf(),
        })?;
    let file = File::open(path).map_err(|e| ReconcileError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let quads = format.loader().read(&mut reader, path)?;
    let snapshot = Snapshot::from_quads(path, format, quads, normalizer);
    tracing::debug!(
        path = %path.display(),
        %format,
        quads = snapshot.quads.len(),
        triples = snapshot.triples.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Triple, RDF_LANG_STRING, XSD_STRING};

    const TURTLE: &str = r#"
@prefix ex: <http://example.org/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

ex:a ex:p ex:b ;
     ex:name "Alice"@en ;
     ex:age "42"^^xsd:integer .
"#;

    const NQUADS: &str = "\
<http://example.org/a> <http://example.org/p> <http://example.org/b> <http://example.org/g1> .
<http://example.org/a> <http://example.org/p> <http://example.org/b> <http://example.org/g2> .
<http://example.org/c> <http://example.org/p> \"d\" .
<http://example.org/a> <http://example.org/p> <http://example.org/b> <http://example.org/g1> .
";

    fn read(format: GraphFormat, text: &str) -> Result<Vec<Quad>> {
        let mut reader: &[u8] = text.as_bytes();
        format.loader().read(&mut reader, Path::new("fixture"))
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(GraphFormat::from_path(Path::new("x.nt")), Some(GraphFormat::NTriples));
        assert_eq!(GraphFormat::from_path(Path::new("x.NQ")), Some(GraphFormat::NQuads));
        assert_eq!(GraphFormat::from_path(Path::new("x.ttl")), Some(GraphFormat::Turtle));
        assert_eq!(GraphFormat::from_path(Path::new("x.trig")), Some(GraphFormat::TriG));
        assert_eq!(GraphFormat::from_path(Path::new("x.json")), None);
        assert_eq!(GraphFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn format_from_str() {
        assert_eq!("N-Quads".parse::<GraphFormat>(), Ok(GraphFormat::NQuads));
        assert_eq!("turtle".parse::<GraphFormat>(), Ok(GraphFormat::Turtle));
        assert!("rdfxml".parse::<GraphFormat>().is_err());
    }

    #[test]
    fn turtle_terms_are_preserved() {
        let quads = read(GraphFormat::Turtle, TURTLE).unwrap_or_default();
        assert_eq!(quads.len(), 3, "expected 3 statements, got {quads:#?}");
        assert!(quads.iter().all(|q| q.graph.is_none()));

        let name = quads
            .iter()
            .find(|q| q.predicate == Node::Iri("http://example.org/name".into()));
        assert_eq!(
            name.map(|q| &q.object),
            Some(&Node::Literal {
                value: "Alice".into(),
                datatype: RDF_LANG_STRING.into(),
                language: Some("en".into()),
            })
        );
        let age = quads
            .iter()
            .find(|q| q.predicate == Node::Iri("http://example.org/age".into()));
        assert_eq!(age.map(|q| q.object.value()), Some("42"));
    }

    #[test]
    fn nquads_keep_graph_names() {
        let quads = read(GraphFormat::NQuads, NQUADS).unwrap_or_default();
        assert_eq!(quads.len(), 4);
        assert_eq!(quads[0].graph, Some(Node::Iri("http://example.org/g1".into())));
        assert_eq!(quads[2].graph, None);
        assert_eq!(quads[2].object.datatype(), Some(XSD_STRING));
    }

    #[test]
    fn snapshot_strips_context_and_duplicates() {
        let quads = read(GraphFormat::NQuads, NQUADS).unwrap_or_default();
        let snapshot =
            Snapshot::from_quads("x.nq", GraphFormat::NQuads, quads, &Normalizer::identity());
        assert_eq!(snapshot.quads.len(), 3, "exact duplicate quad must collapse");
        assert_eq!(snapshot.triples.len(), 2, "graph context must be discarded");
        assert!(snapshot
            .triples
            .contains(&Triple::new("http://example.org/c", "http://example.org/p", "d")));
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        let err = read(GraphFormat::NTriples, "<http://example.org/a> <http://example.org/p> .\n");
        assert!(
            matches!(err, Err(ReconcileError::Parse { format: "nt", .. })),
            "expected parse error, got {err:?}"
        );
    }

    #[test]
    fn base_iri_is_percent_encoded_file_url() {
        let base = file_base_iri(Path::new("/data/dumps/my snapshot.ttl"));
        assert_eq!(
            base.as_ref().map(|iri| iri.as_str()),
            Some("file:///data/dumps/my%20snapshot.ttl")
        );
    }

    #[test]
    fn relative_iris_resolve_against_the_file() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("left.ttl");
        std::fs::write(&path, "<rel> <http://example.org/p> <#frag> .\n").expect("fixture");

        let snapshot = load_snapshot(&path, None, &Normalizer::identity()).expect("loads");
        let base = file_base_iri(&path).expect("base iri");
        let dir_url = base.as_str().trim_end_matches("left.ttl");
        assert_eq!(snapshot.quads.len(), 1);
        assert_eq!(snapshot.quads[0].subject, Node::Iri(format!("{dir_url}rel")));
        assert_eq!(
            snapshot.quads[0].object,
            Node::Iri(format!("{}#frag", base.as_str()))
        );
    }

    #[test]
    fn relative_iris_in_trig_resolve_too() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("left.trig");
        std::fs::write(&path, "<g> { <s> <http://example.org/p> \"o\" . }\n").expect("fixture");

        let snapshot = load_snapshot(&path, None, &Normalizer::identity()).expect("loads");
        let graph = snapshot.quads[0].graph.as_ref().map(Node::value).unwrap_or_default();
        assert!(graph.starts_with("file:///"), "graph: {graph}");
        assert!(graph.ends_with("/g"), "graph: {graph}");
    }

    #[test]
    fn unknown_extension_without_format_fails() {
        let err = load_snapshot(Path::new("snapshot.rdf"), None, &Normalizer::identity());
        assert!(matches!(err, Err(ReconcileError::UnknownFormat { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_snapshot(
            Path::new("/nonexistent/snapshot.nt"),
            None,
            &Normalizer::identity(),
        );
        assert!(matches!(err, Err(ReconcileError::Io { .. })));
    }
}
