//! Faces of the partial embedding.
//!
//! An open face is still a path along the outer boundary: its edges are kept
//! in walk order, with the endpoints cached. Once closed, only the edge set
//! and its length matter.

use std::collections::VecDeque;

use crate::state::{Edge, EdgeId, VertexId};

pub type FaceId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Face {
  Open(OpenFace),
  Closed(ClosedFace),
}

impl Face {
  pub fn len(&self) -> usize {
    match self {
      Face::Open(open) => open.len(),
      Face::Closed(closed) => closed.len(),
    }
  }

  pub fn is_closed(&self) -> bool {
    matches!(self, Face::Closed(_))
  }

  pub fn edges(&self) -> Box<dyn Iterator<Item = EdgeId> + '_> {
    match self {
      Face::Open(open) => Box::new(open.edges()),
      Face::Closed(closed) => Box::new(closed.edges()),
    }
  }

  pub fn as_open(&self) -> Option<&OpenFace> {
    match self {
      Face::Open(open) => Some(open),
      Face::Closed(_) => None,
    }
  }
}

/// Boundary walk from `start` to `end`.
///
/// Edges are oriented: the first edge leaves `start` and the last edge
/// arrives at `end`. Growth at either end must keep the walk connected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenFace {
  edges: VecDeque<EdgeId>,
  start: VertexId,
  end: VertexId,
}

impl OpenFace {
  /// Walk made of the single edge `id`.
  pub fn single(id: EdgeId, edge: Edge) -> Self {
    Self { edges: VecDeque::from([id]), start: edge.from, end: edge.to }
  }

  /// Walk through `ids`, which must be non-empty and oriented head to tail.
  pub fn from_walk(ids: &[EdgeId], edges: &[Edge]) -> Self {
    let (first, rest) = ids.split_first().expect("open face needs at least one edge");
    let mut face = Self::single(*first, edges[*first]);
    for &id in rest {
      face.push_back(id, edges[id]);
    }
    face
  }

  pub fn len(&self) -> usize {
    self.edges.len()
  }

  pub fn start(&self) -> VertexId {
    self.start
  }

  pub fn end(&self) -> VertexId {
    self.end
  }

  pub fn first_edge(&self) -> EdgeId {
    self.edges[0]
  }

  pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
    self.edges.iter().copied()
  }

  pub fn push_back(&mut self, id: EdgeId, edge: Edge) {
    assert_eq!(edge.from, self.end, "edge {id} does not continue the walk");
    self.edges.push_back(id);
    self.end = edge.to;
  }

  pub fn push_front(&mut self, id: EdgeId, edge: Edge) {
    assert_eq!(edge.to, self.start, "edge {id} does not lead into the walk");
    self.edges.push_front(id);
    self.start = edge.from;
  }

  /// Append the whole walk of a neighbouring face that starts where this one ends.
  pub fn absorb(&mut self, other: &OpenFace) {
    assert_eq!(other.start, self.end, "absorbed walk is not adjacent");
    self.edges.extend(other.edges.iter().copied());
    self.end = other.end;
  }

  /// Seal the walk into a cycle with `extra` edges.
  pub fn close_with(&self, extra: impl IntoIterator<Item = EdgeId>) -> ClosedFace {
    ClosedFace { edges: self.edges.iter().copied().chain(extra).collect() }
  }
}

/// Finished face. Edge order carries no meaning.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClosedFace {
  edges: Box<[EdgeId]>,
}

impl ClosedFace {
  pub fn from_edges(edges: &[EdgeId]) -> Self {
    Self { edges: edges.into() }
  }

  pub fn len(&self) -> usize {
    self.edges.len()
  }

  pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
    self.edges.iter().copied()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn e(from: VertexId, to: VertexId) -> Edge {
    Edge { from, to }
  }

  #[test]
  fn walk_tracks_endpoints() {
    let edges = [e(0, 1), e(1, 2), e(2, 3), e(9, 0)];
    let mut face = OpenFace::from_walk(&[0, 1], &edges);
    assert_eq!((face.start(), face.end(), face.len()), (0, 2, 2));
    face.push_back(2, edges[2]);
    face.push_front(3, edges[3]);
    assert_eq!((face.start(), face.end()), (9, 3));
    assert_eq!(face.edges().collect::<Vec<_>>(), vec![3, 0, 1, 2]);
    assert_eq!(face.first_edge(), 3);
  }

  #[test]
  fn absorb_extends_end() {
    let edges = [e(0, 1), e(1, 2), e(2, 3)];
    let mut left = OpenFace::from_walk(&[0], &edges);
    let right = OpenFace::from_walk(&[1, 2], &edges);
    left.absorb(&right);
    assert_eq!(left.end(), 3);
    assert_eq!(left.len(), 3);
  }

  #[test]
  #[should_panic(expected = "does not continue")]
  fn detached_edge_is_fatal() {
    let edges = [e(0, 1), e(5, 6)];
    let mut face = OpenFace::single(0, edges[0]);
    face.push_back(1, edges[1]);
  }

  #[test]
  fn closing_keeps_every_edge() {
    let edges = [e(0, 1), e(1, 2)];
    let face = Face::Closed(OpenFace::from_walk(&[0, 1], &edges).close_with([7]));
    assert!(face.is_closed());
    assert_eq!(face.len(), 3);
    assert_eq!(face.edges().collect::<Vec<_>>(), vec![0, 1, 7]);
    assert!(face.as_open().is_none());
  }
}
