//! N-Triples serialization (https://www.w3.org/TR/n-triples/) through `oxrdfio`

use oxrdf::Triple;
use oxrdfio::{RdfFormat, RdfSerializer, WriterQuadSerializer};
use std::io::{self, Write};

use crate::graph::Graph;

/// Line-oriented N-Triples writer over any byte sink, counting statements
pub struct NTriplesWriter<W: Write> {
    inner: WriterQuadSerializer<W>,
    written: usize,
}

impl<W: Write> NTriplesWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            inner: RdfSerializer::from_format(RdfFormat::NTriples).for_writer(sink),
            written: 0,
        }
    }

    /// Write one statement followed by a newline
    pub fn write_triple(&mut self, triple: &Triple) -> io::Result<()> {
        self.inner.serialize_triple(triple)?;
        self.written += 1;
        Ok(())
    }

    /// Write every triple of the graph in insertion order
    pub fn write_graph(&mut self, graph: &Graph) -> io::Result<()> {
        for triple in graph {
            self.write_triple(triple)?;
        }
        Ok(())
    }

    /// Number of statements written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and hand back the underlying sink
    pub fn finish(self) -> io::Result<W> {
        let mut sink = self.inner.finish()?;
        sink.flush()?;
        Ok(sink)
    }
}

/// Render the whole graph as an N-Triples document
pub fn to_string(graph: &Graph) -> io::Result<String> {
    let mut writer = NTriplesWriter::new(Vec::new());
    writer.write_graph(graph)?;
    let bytes = writer.finish()?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{blank_node, iri, lang_literal};
    use oxrdf::{Literal, NamedNode};

    fn node(s: &str) -> NamedNode {
        iri(s).unwrap()
    }

    fn single(triple: Triple) -> String {
        let graph: Graph = std::iter::once(triple).collect();
        to_string(&graph).unwrap()
    }

    #[test]
    fn test_plain_literal_has_no_datatype() {
        let line = single(Triple::new(
            node("http://example.org/knud-moller"),
            node("http://schema.org/name"),
            Literal::new_simple_literal("Knud Möller"),
        ));
        assert_eq!(
            line,
            "<http://example.org/knud-moller> <http://schema.org/name> \"Knud Möller\" .\n"
        );
    }

    #[test]
    fn test_typed_and_tagged_literals() {
        let price = single(Triple::new(
            node("http://example.org/p1"),
            node("http://purl.org/goodrelations/v1#hasCurrencyValue"),
            Literal::from(1.59),
        ));
        assert_eq!(
            price,
            "<http://example.org/p1> <http://purl.org/goodrelations/v1#hasCurrencyValue> \"1.59\"^^<http://www.w3.org/2001/XMLSchema#double> .\n"
        );

        let label = single(Triple::new(
            blank_node("b1").unwrap(),
            node("http://www.w3.org/2000/01/rdf-schema#label"),
            lang_literal("Apfel", "de").unwrap(),
        ));
        assert_eq!(
            label,
            "_:b1 <http://www.w3.org/2000/01/rdf-schema#label> \"Apfel\"@de .\n"
        );
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let line = single(Triple::new(
            node("http://example.org/a"),
            node("http://schema.org/description"),
            Literal::new_simple_literal("say \"hi\"\nback\\slash"),
        ));
        assert_eq!(line.lines().count(), 1);
        assert!(line.contains(r#""say \"hi\"\nback\\slash""#));
    }

    #[test]
    fn test_writer_counts_statements() {
        let mut graph = Graph::new();
        graph.insert(Triple::new(
            node("http://example.org/a"),
            node("http://schema.org/name"),
            Literal::new_simple_literal("A"),
        ));
        graph.insert(Triple::new(
            node("http://example.org/a"),
            node("http://schema.org/sameAs"),
            node("http://example.org/b"),
        ));

        let mut writer = NTriplesWriter::new(Vec::new());
        writer.write_graph(&graph).unwrap();
        assert_eq!(writer.written(), 2);
        let bytes = writer.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, to_string(&graph).unwrap());
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with(" .\n"));
    }
}
