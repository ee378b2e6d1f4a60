//! Append-only triple graph

use oxrdf::{BlankNode, NamedOrBlankNode, Term, Triple};
use std::collections::HashSet;

/// Insertion-ordered set of triples.
///
/// Membership only grows: there is no removal or in-place update.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    index: HashSet<Triple>,
    blank_labels: HashSet<String>,
    next_blank: u64,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple. Returns `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.index.contains(&triple) {
            return false;
        }
        if let NamedOrBlankNode::BlankNode(node) = &triple.subject {
            self.blank_labels.insert(node.as_str().to_string());
        }
        if let Term::BlankNode(node) = &triple.object {
            self.blank_labels.insert(node.as_str().to_string());
        }
        self.index.insert(triple.clone());
        self.triples.push(triple);
        true
    }

    /// Add several triples, returning how many were new
    pub fn extend<I: IntoIterator<Item = Triple>>(&mut self, triples: I) -> usize {
        let mut added = 0;
        for triple in triples {
            if self.insert(triple) {
                added += 1;
            }
        }
        added
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.index.contains(triple)
    }

    /// Triples in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Triple> {
        self.triples.iter()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Mint a fresh blank node (`_:b0`, `_:b1`, ...).
    ///
    /// Labels already used by inserted triples or earlier mints are skipped.
    pub fn new_blank_node(&mut self) -> BlankNode {
        loop {
            let label = format!("b{}", self.next_blank);
            self.next_blank += 1;
            if !self.blank_labels.contains(&label) {
                let node = BlankNode::new_unchecked(label.as_str());
                self.blank_labels.insert(label);
                return node;
            }
        }
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Graph::new();
        graph.extend(iter);
        graph
    }
}
