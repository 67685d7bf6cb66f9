//! Playing a move on the map, and taking it back.
//!
//! `PlanarMap::apply` edits the map in place and returns the `Undo` needed to
//! restore it, so the driver never copies a whole map per search node.

use crate::face::{Face, FaceId, OpenFace};
use crate::moves::Move;
use crate::ring::OpenRing;
use crate::state::{Edge, EdgeId, FaceTally, PlanarMap, VertexId};

/// Inverse of one applied move.
#[derive(Clone, Debug)]
pub struct Undo {
  vertices: usize,
  edges: usize,
  faces: usize,
  /// Pre-move contents of every face the move edited, by pre-move id.
  touched: Vec<(FaceId, Face)>,
  /// Faces dropped from the list, highest id first.
  removed: Vec<(FaceId, Face)>,
  ring: OpenRing,
  tally: FaceTally,
}

impl PlanarMap {
  /// Close the face in ring `slot` with `mv`. The move must be legal there.
  pub fn apply(&mut self, slot: usize, mv: Move) -> Undo {
    debug_assert!(
      mv.is_legal(&self.neighborhood(slot), &self.tally),
      "{mv} is not legal on ring slot {slot}"
    );
    let vertices = self.vertex_count();
    let mut ex = Executor::new(self);
    ex.play(slot, mv);
    let undo = ex.finish();
    debug_assert_eq!(self.vertex_count() - vertices, mv.vertices_added(), "{mv} vertex count");
    undo
  }

  /// Restore the map exactly as it was before the move that produced `undo`.
  pub fn undo(&mut self, undo: Undo) {
    let Undo { vertices, edges, faces, touched, removed, ring, tally } = undo;

    self.faces.truncate(faces - removed.len());
    for (id, face) in removed.into_iter().rev() {
      self.faces.insert(id, face);
    }
    for (id, face) in touched {
      self.faces[id] = face;
    }
    debug_assert_eq!(self.faces.len(), faces);

    for e in self.edges.drain(edges..) {
      self.degrees[e.from as usize] -= 1;
      self.degrees[e.to as usize] -= 1;
    }
    self.degrees.truncate(vertices);
    self.ring = ring;
    self.tally = tally;
  }
}

struct Executor<'a> {
  map: &'a mut PlanarMap,
  undo: Undo,
  /// Faces absorbed into a neighbour, removed once the move is done.
  doomed: Vec<FaceId>,
}

impl<'a> Executor<'a> {
  fn new(map: &'a mut PlanarMap) -> Self {
    let undo = Undo {
      vertices: map.degrees.len(),
      edges: map.edges.len(),
      faces: map.faces.len(),
      touched: Vec::new(),
      removed: Vec::new(),
      ring: map.ring.clone(),
      tally: map.tally,
    };
    Self { map, undo, doomed: Vec::new() }
  }

  // =============== Primitive edits ===============

  fn vertex(&mut self) -> VertexId {
    self.map.degrees.push(0);
    (self.map.degrees.len() - 1) as VertexId
  }

  fn edge(&mut self, from: VertexId, to: VertexId) -> EdgeId {
    for v in [from, to] {
      let degree = &mut self.map.degrees[v as usize];
      *degree += 1;
      assert!(*degree <= 3, "vertex {v} pushed to degree {degree}");
    }
    self.map.edges.push(Edge { from, to });
    self.map.edges.len() - 1
  }

  fn touch(&mut self, face: FaceId) {
    if !self.undo.touched.iter().any(|(id, _)| *id == face) {
      self.undo.touched.push((face, self.map.faces[face].clone()));
    }
  }

  fn open(&self, face: FaceId) -> &OpenFace {
    self.map.faces[face].as_open().unwrap_or_else(|| panic!("face {face} is already closed"))
  }

  fn open_mut(&mut self, face: FaceId) -> &mut OpenFace {
    self.touch(face);
    match &mut self.map.faces[face] {
      Face::Open(open) => open,
      Face::Closed(_) => panic!("face {face} is already closed"),
    }
  }

  fn append(&mut self, face: FaceId, edge: EdgeId) {
    let e = self.map.edges[edge];
    self.open_mut(face).push_back(edge, e);
  }

  fn prepend(&mut self, face: FaceId, edge: EdgeId) {
    let e = self.map.edges[edge];
    self.open_mut(face).push_front(edge, e);
  }

  /// `into` takes over the walk of the following face `from`, which is dropped.
  fn absorb(&mut self, into: FaceId, from: FaceId) {
    let other = self.open(from).clone();
    self.open_mut(into).absorb(&other);
    self.doomed.push(from);
  }

  fn close(&mut self, face: FaceId, extra: &[EdgeId]) {
    let closed = self.open(face).close_with(extra.iter().copied());
    self.touch(face);
    self.map.tally.count(closed.len());
    self.map.faces[face] = Face::Closed(closed);
  }

  /// New open face made of one edge.
  fn spawn(&mut self, edge: EdgeId) -> FaceId {
    let e = self.map.edges[edge];
    self.map.faces.push(Face::Open(OpenFace::single(edge, e)));
    self.map.faces.len() - 1
  }

  // =============== Moves ===============

  fn play(&mut self, slot: usize, mv: Move) {
    let ring = &self.map.ring;
    let n = ring.len();
    let at = |k: isize| ring.get(ring.offset(slot, k));
    let (ppp, pp, p, f, x, xx, xxx) = (at(-3), at(-2), at(-1), at(0), at(1), at(2), at(3));
    let back2 = ring.offset(slot, -2);
    let (sf, ef) = (self.open(f).start(), self.open(f).end());

    // Edges F gains besides its own walk.
    let mut rim: Vec<EdgeId> = Vec::with_capacity(6);

    match mv {
      Move::Chord => {
        let e = self.edge(sf, ef);
        self.append(p, e);
        self.map.ring.remove_run(slot, 2);
        if n == 2 {
          // p and x are one face, sealed by the same edge.
          self.close(p, &[]);
        } else {
          self.absorb(p, x);
        }
        rim.push(e);
      }
      Move::Apex => {
        let a = self.vertex();
        let e1 = self.edge(sf, a);
        self.append(p, e1);
        let e2 = self.edge(a, ef);
        self.prepend(x, e2);
        self.map.ring.remove_run(slot, 1);
        rim.extend([e2, e1]);
      }
      Move::WrapNext | Move::WrapNextLong => {
        let ex = self.open(x).end();
        let e1 = self.edge(ef, ex);
        self.close(x, &[e1]);
        let crossed: Vec<EdgeId> = self.open(xx).edges().collect();
        let exx = self.open(xx).end();
        let e2 = self.edge(sf, exx);
        self.append(p, e2);
        self.map.ring.remove_run(slot, 4);
        self.doomed.push(xx);
        if n == 4 {
          // p is also xxx and now closes.
          self.close(p, &[]);
        } else {
          self.absorb(p, xxx);
        }
        rim.push(e1);
        rim.extend(crossed);
        rim.push(e2);
      }
      Move::WrapPrev | Move::WrapPrevLong => {
        let sp = self.open(p).start();
        let e1 = self.edge(sp, sf);
        self.close(p, &[e1]);
        let crossed: Vec<EdgeId> = self.open(pp).edges().collect();
        let spp = self.open(pp).start();
        let e2 = self.edge(spp, ef);
        self.append(ppp, e2);
        self.map.ring.remove_run(back2, 4);
        self.doomed.push(pp);
        if n == 4 {
          self.close(x, &[]);
        } else {
          self.absorb(ppp, x);
        }
        rim.push(e1);
        rim.extend(crossed);
        rim.push(e2);
      }
      Move::Span => {
        let a = self.vertex();
        let e1 = self.edge(sf, a);
        self.append(p, e1);
        let b = self.vertex();
        let e2 = self.edge(a, b);
        let fresh = self.spawn(e2);
        self.map.ring.replace(slot, fresh);
        let e3 = self.edge(b, ef);
        self.prepend(x, e3);
        rim.extend([e3, e2, e1]);
      }
      Move::WrapNextApex => {
        let ex = self.open(x).end();
        let e1 = self.edge(ef, ex);
        self.close(x, &[e1]);
        let crossed = self.open(xx).first_edge();
        let exx = self.open(xx).end();
        let a = self.vertex();
        let e2 = self.edge(a, exx);
        self.prepend(xxx, e2);
        let e3 = self.edge(sf, a);
        self.append(p, e3);
        self.map.ring.remove_run(slot, 3);
        self.doomed.push(xx);
        rim.extend([e1, crossed, e2, e3]);
      }
      Move::WrapPrevApex => {
        let sp = self.open(p).start();
        let e1 = self.edge(sp, sf);
        self.close(p, &[e1]);
        let crossed = self.open(pp).first_edge();
        let spp = self.open(pp).start();
        let a = self.vertex();
        let e2 = self.edge(spp, a);
        self.append(ppp, e2);
        let e3 = self.edge(a, ef);
        self.prepend(x, e3);
        self.map.ring.remove_run(back2, 3);
        self.doomed.push(pp);
        rim.extend([e1, crossed, e2, e3]);
      }
      Move::Bulge => {
        let a = self.vertex();
        let e1 = self.edge(sf, a);
        self.append(p, e1);
        let b = self.vertex();
        let e2 = self.edge(a, b);
        let first = self.spawn(e2);
        let c = self.vertex();
        let e3 = self.edge(b, c);
        let second = self.spawn(e3);
        self.map.ring.splice(slot, &[first, second]);
        let e4 = self.edge(c, ef);
        self.prepend(x, e4);
        rim.extend([e1, e2, e3, e4]);
      }
    }

    debug_assert_eq!(rim.len(), mv.growth(), "{mv} rim length");
    self.close(f, &rim);
  }

  /// Drop absorbed faces, highest id first, keeping ring ids in step.
  fn finish(mut self) -> Undo {
    self.doomed.sort_unstable_by(|a, b| b.cmp(a));
    for id in std::mem::take(&mut self.doomed) {
      let face = self.map.faces.remove(id);
      self.map.ring.renumber_after_removal(id);
      self.undo.removed.push((id, face));
    }
    self.undo
  }
}
