//! The partial planar map grown by the search.

use std::collections::HashMap;

use itertools::Itertools;

use crate::error::InvariantViolation;
use crate::face::{ClosedFace, Face, FaceId, OpenFace};
use crate::ring::OpenRing;

pub type VertexId = u32;
pub type EdgeId = usize;

// =============== Target profile ===============

pub const TRIANGLES: usize = 1;
pub const SQUARES: usize = 2;
pub const PENTAGONS: usize = 5;

/// Faces in the seed fragment.
pub const SEED_FACES: usize = 7;

/// Edge as stored: the orientation only matters while it lies on an open face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
  pub from: VertexId,
  pub to: VertexId,
}

/// Closed faces counted so far. The single triangle comes with the seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct FaceTally {
  pub squares: usize,
  pub pentagons: usize,
  pub hexagons: usize,
}

impl FaceTally {
  /// Record a face that just closed with `len` edges.
  pub fn count(&mut self, len: usize) {
    match len {
      4 => self.squares += 1,
      5 => self.pentagons += 1,
      6 => self.hexagons += 1,
      _ => panic!("closed a face of length {len}"),
    }
  }
}

/// Tentative counter used while judging a move: each face the move would
/// close must still fit the profile.
#[derive(Clone, Copy, Debug)]
pub struct Budget {
  triangles: usize,
  squares: usize,
  pentagons: usize,
}

impl Budget {
  pub fn new(tally: &FaceTally) -> Self {
    Self { triangles: TRIANGLES, squares: tally.squares, pentagons: tally.pentagons }
  }

  pub fn admit(&mut self, len: usize) -> bool {
    match len {
      3 => {
        self.triangles += 1;
        self.triangles <= TRIANGLES
      }
      4 => {
        self.squares += 1;
        self.squares <= SQUARES
      }
      5 => {
        self.pentagons += 1;
        self.pentagons <= PENTAGONS
      }
      6 => true,
      _ => false,
    }
  }
}

/// Face lengths in a fixed window of the ring around one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighborhood {
  /// Ring length.
  pub open: usize,
  /// `lens[3 + k]` is the length of the face `k` slots away, for `k` in -3..=3.
  pub lens: [usize; 7],
}

impl Neighborhood {
  pub fn at(&self, k: isize) -> usize {
    self.lens[(3 + k) as usize]
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanarMap {
  pub(crate) degrees: Vec<u8>,
  pub(crate) edges: Vec<Edge>,
  pub(crate) faces: Vec<Face>,
  pub(crate) ring: OpenRing,
  pub(crate) tally: FaceTally,
}

impl PlanarMap {
  /// The triangle, the hexagon on one of its sides and the five open faces
  /// around them: 7 vertices, 8 edges, 7 faces.
  pub fn seed() -> Self {
    let edges: Vec<Edge> = [(1, 2), (2, 3), (1, 3), (3, 4), (4, 5), (5, 6), (6, 7), (7, 1)]
      .into_iter()
      .map(|(a, b)| Edge { from: a - 1, to: b - 1 })
      .collect();
    let mut degrees = vec![0u8; 7];
    for e in &edges {
      degrees[e.from as usize] += 1;
      degrees[e.to as usize] += 1;
    }
    let faces = vec![
      Face::Closed(ClosedFace::from_edges(&[0, 1, 2])),
      Face::Closed(ClosedFace::from_edges(&[2, 3, 4, 5, 6, 7])),
      Face::Open(OpenFace::from_walk(&[7, 0], &edges)),
      Face::Open(OpenFace::from_walk(&[1, 3], &edges)),
      Face::Open(OpenFace::from_walk(&[4], &edges)),
      Face::Open(OpenFace::from_walk(&[5], &edges)),
      Face::Open(OpenFace::from_walk(&[6], &edges)),
    ];
    Self {
      degrees,
      edges,
      faces,
      ring: OpenRing::new(vec![2, 3, 4, 5, 6]),
      tally: FaceTally { squares: 0, pentagons: 0, hexagons: 1 },
    }
  }

  pub fn vertex_count(&self) -> usize {
    self.degrees.len()
  }

  pub fn edge_count(&self) -> usize {
    self.edges.len()
  }

  pub fn face_count(&self) -> usize {
    self.faces.len()
  }

  pub fn degree(&self, vertex: VertexId) -> u8 {
    self.degrees[vertex as usize]
  }

  pub fn edge(&self, id: EdgeId) -> Edge {
    self.edges[id]
  }

  pub fn face(&self, id: FaceId) -> &Face {
    &self.faces[id]
  }

  pub fn faces(&self) -> &[Face] {
    &self.faces
  }

  pub fn ring(&self) -> &OpenRing {
    &self.ring
  }

  pub fn tally(&self) -> FaceTally {
    self.tally
  }

  /// Face held in ring `slot`, which is open by construction.
  pub fn open_face(&self, slot: usize) -> &OpenFace {
    let id = self.ring.get(slot);
    self.faces[id].as_open().unwrap_or_else(|| panic!("ring slot {slot} holds closed face {id}"))
  }

  pub fn neighborhood(&self, slot: usize) -> Neighborhood {
    let mut lens = [0; 7];
    for (i, k) in (-3..=3).enumerate() {
      lens[i] = self.faces[self.ring.get(self.ring.offset(slot, k))].len();
    }
    Neighborhood { open: self.ring.len(), lens }
  }

  // =============== Size budgets ===============

  /// Prune test: no face has outgrown what it may still close to, and the
  /// closed faces still fit the profile.
  pub fn within_budget(&self) -> bool {
    let mut closed = [0usize; 7];
    for face in &self.faces {
      match face {
        Face::Closed(c) => {
          if !(3..=6).contains(&c.len()) {
            return false;
          }
          closed[c.len()] += 1;
        }
        Face::Open(o) => {
          if o.len() > 5 {
            return false;
          }
        }
      }
    }
    debug_assert_eq!(
      (closed[3], closed[4], closed[5], closed[6]),
      (TRIANGLES, self.tally.squares, self.tally.pentagons, self.tally.hexagons),
      "running tally drifted from the faces"
    );
    closed[3] <= TRIANGLES && closed[4] <= SQUARES && closed[5] <= PENTAGONS
  }

  /// Completion test: every face closed, sized 3..=6, matching the profile
  /// exactly. A closed map that is not cubic is a defect and panics.
  pub fn is_complete(&self) -> bool {
    if !self.ring.is_empty() {
      return false;
    }
    let mut closed = [0usize; 7];
    for face in &self.faces {
      if !face.is_closed() || !(3..=6).contains(&face.len()) {
        return false;
      }
      closed[face.len()] += 1;
    }
    if let Some(v) = self.degrees.iter().position(|&d| d != 3) {
      panic!("closed map is not cubic: vertex {v} has degree {}", self.degrees[v]);
    }
    closed[3] == TRIANGLES && closed[4] == SQUARES && closed[5] == PENTAGONS
  }

  // =============== Structural check ===============

  pub fn validate(&self) -> Result<(), InvariantViolation> {
    if let Some((v, &d)) = self.degrees.iter().enumerate().find(|(_, d)| **d > 3) {
      return Err(InvariantViolation::DegreeOverflow { vertex: v as VertexId, degree: d });
    }

    for slot in 0..self.ring.len() {
      let left = self.ring.get(slot);
      let right = self.ring.get(self.ring.successor(slot));
      let (Some(l), Some(r)) = (self.faces[left].as_open(), self.faces[right].as_open()) else {
        let face = if self.faces[left].is_closed() { left } else { right };
        return Err(InvariantViolation::RingNotOpen { face });
      };
      if l.end() != r.start() {
        return Err(InvariantViolation::RingBreak { left, right });
      }
    }

    let mut borders = vec![0usize; self.edges.len()];
    for (id, face) in self.faces.iter().enumerate() {
      match face {
        Face::Open(_) if !self.ring.contains(id) => {
          return Err(InvariantViolation::OpenOutsideRing { face: id });
        }
        Face::Closed(closed) => {
          let mut touches: HashMap<VertexId, usize> = HashMap::new();
          for e in closed.edges().map(|e| self.edges[e]) {
            *touches.entry(e.from).or_default() += 1;
            *touches.entry(e.to).or_default() += 1;
          }
          if touches.len() != closed.len() || touches.values().any(|&t| t != 2) {
            return Err(InvariantViolation::NotACycle { face: id });
          }
        }
        Face::Open(_) => {}
      }
      for e in face.edges() {
        borders[e] += 1;
      }
    }
    if let Some((edge, &count)) = borders.iter().enumerate().find(|(_, c)| **c != 2) {
      return Err(InvariantViolation::EdgeFaceCount { edge, count });
    }
    Ok(())
  }

  // =============== Export ===============

  /// Edges as 1-based unordered pairs, the form the canonical oracle takes.
  pub fn edge_list(&self) -> Vec<(usize, usize)> {
    self.edges.iter().map(|e| (e.from as usize + 1, e.to as usize + 1)).collect()
  }

  /// One line describing a finished map: the sizes of the faces across each
  /// edge of the triangle and of each square, then hexagon and vertex counts.
  pub fn summary(&self) -> String {
    let mut sides: HashMap<EdgeId, Vec<FaceId>> = HashMap::new();
    for (id, face) in self.faces.iter().enumerate() {
      for e in face.edges() {
        sides.entry(e).or_default().push(id);
      }
    }
    let across = |id: FaceId| {
      self.faces[id]
        .edges()
        .filter_map(|e| sides[&e].iter().find(|&&f| f != id))
        .map(|&f| self.faces[f].len())
        .join(", ")
    };

    let mut parts = Vec::new();
    if let Some(tri) = self.faces.iter().position(|f| f.len() == 3) {
      parts.push(format!("tri: {}", across(tri)));
    }
    for (id, _) in self.faces.iter().enumerate().filter(|(_, f)| f.len() == 4) {
      parts.push(format!("sqr: {}", across(id)));
    }
    parts.push(format!("{:>2} hexes, {} verts", self.tally.hexagons, self.vertex_count()));
    parts.join("  ")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn seed_shape() {
    let map = PlanarMap::seed();
    assert_eq!(map.vertex_count(), 7);
    assert_eq!(map.edge_count(), 8);
    assert_eq!(map.face_count(), SEED_FACES);
    assert_eq!(map.ring().as_slice(), &[2, 3, 4, 5, 6]);
    let closed: Vec<usize> = map.faces().iter().filter(|f| f.is_closed()).map(Face::len).collect();
    assert_eq!(closed, vec![3, 6]);
    let open: Vec<usize> = map.ring().iter().map(|f| map.face(f).len()).collect();
    assert_eq!(open, vec![2, 2, 1, 1, 1]);
    assert_eq!(map.tally(), FaceTally { squares: 0, pentagons: 0, hexagons: 1 });
    assert!(map.validate().is_ok());
    assert!(map.within_budget());
    assert!(!map.is_complete());
  }

  #[test]
  fn seed_open_walks_meet() {
    let map = PlanarMap::seed();
    let ends: Vec<(VertexId, VertexId)> =
      (0..5).map(|s| (map.open_face(s).start(), map.open_face(s).end())).collect();
    // 0-based: 7-1-2 | 2-3-4 | 4-5 | 5-6 | 6-7
    assert_eq!(ends, vec![(6, 1), (1, 3), (3, 4), (4, 5), (5, 6)]);
  }

  #[test]
  fn seed_degrees() {
    let map = PlanarMap::seed();
    let degrees: Vec<u8> = (0..7).map(|v| map.degree(v)).collect();
    assert_eq!(degrees, vec![3, 2, 3, 2, 2, 2, 2]);
  }

  #[test]
  fn neighborhood_wraps() {
    let map = PlanarMap::seed();
    let hood = map.neighborhood(0);
    assert_eq!(hood.open, 5);
    // slots -3..=3 from 0 are 2, 3, 4, 0, 1, 2, 3
    assert_eq!(hood.lens, [1, 1, 1, 2, 2, 1, 1]);
    assert_eq!(hood.at(-1), 1);
    assert_eq!(hood.at(1), 2);
  }

  #[test]
  fn budget_counts_each_admission() {
    let mut budget = Budget::new(&FaceTally { squares: 1, pentagons: 5, hexagons: 0 });
    assert!(!budget.admit(3));
    assert!(budget.admit(4));
    assert!(!budget.admit(4));
    assert!(!budget.admit(5));
    assert!(budget.admit(6));
    assert!(!budget.admit(2));
    assert!(!budget.admit(7));
  }

  #[test]
  fn tally_counts_lengths() {
    let mut tally = FaceTally::default();
    for len in [4, 5, 5, 6] {
      tally.count(len);
    }
    assert_eq!(tally, FaceTally { squares: 1, pentagons: 2, hexagons: 1 });
  }

  #[test]
  fn seed_edges_are_one_based_for_export() {
    let list = PlanarMap::seed().edge_list();
    assert_eq!(list[0], (1, 2));
    assert_eq!(list[7], (7, 1));
  }

  #[test]
  fn long_open_face_fails_budget() {
    let mut map = PlanarMap::seed();
    let walk: Vec<EdgeId> = vec![3, 4, 5, 6, 7, 0];
    map.faces[3] = Face::Open(OpenFace::from_walk(&walk, &map.edges));
    assert!(!map.within_budget());
  }

  /// Follow the search's own face order to the first map on the profile.
  fn close_up(map: &mut PlanarMap, depth: usize) -> bool {
    if map.ring().is_empty() {
      return map.is_complete();
    }
    if depth == 0 || map.ring().len() < 2 || !map.within_budget() {
      return false;
    }
    let slot = crate::search::choose_face(map);
    for mv in map.legal_moves(slot) {
      let undo = map.apply(slot, mv);
      if close_up(map, depth - 1) {
        return true;
      }
      map.undo(undo);
    }
    false
  }

  fn finished_map() -> PlanarMap {
    let mut map = PlanarMap::seed();
    assert!(close_up(&mut map, 10), "no complete map within ten moves");
    map
  }

  #[test]
  fn finished_map_matches_profile() {
    let map = finished_map();
    assert!(map.is_complete());
    assert!(map.validate().is_ok());
    assert_eq!((map.tally().squares, map.tally().pentagons), (SQUARES, PENTAGONS));
    assert_eq!(map.face_count(), 8 + map.tally().hexagons);
    assert_eq!(2 * map.edge_count(), 3 * map.vertex_count());
  }

  #[test]
  fn closed_map_off_profile_is_rejected() {
    let mut map = finished_map();
    let square = map.faces.iter().position(|f| f.len() == 4).unwrap();
    let mut edges: Vec<EdgeId> = map.faces[square].edges().collect();
    edges.push(edges[0]);
    map.faces[square] = Face::Closed(ClosedFace::from_edges(&edges));
    assert!(!map.is_complete());
  }

  #[test]
  fn open_map_is_not_complete() {
    let mut map = finished_map();
    let id = map.face_count() - 1;
    let walk: Vec<EdgeId> = vec![0];
    map.faces[id] = Face::Open(OpenFace::from_walk(&walk, &map.edges));
    assert!(!map.is_complete());
  }

  #[test]
  #[should_panic(expected = "not cubic")]
  fn closed_map_with_low_degree_panics() {
    let mut map = finished_map();
    map.degrees[0] = 2;
    map.is_complete();
  }
}
