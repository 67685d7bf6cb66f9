//! The ten face-closure moves and when each one may be played.
//!
//! Every move closes the selected open face F. Names below use `p`/`pp`/`ppp`
//! for the faces one, two and three slots before F on the ring and `x`/`xx`/`xxx`
//! for those after it.

use std::fmt;

use crate::state::{Budget, FaceTally, Neighborhood, PlanarMap};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Move {
  /// One edge joining F's endpoints. `p` and `x` merge.
  Chord = 1,
  /// Two edges through one new vertex.
  Apex = 2,
  /// Three edges: close `x`, cross the single edge of `xx`, return to F's start.
  WrapNext = 3,
  /// Mirror of `WrapNext`: close `p`, cross the single edge of `pp`.
  WrapPrev = 4,
  /// Three edges through two new vertices, leaving a new one-edge open face.
  Span = 5,
  /// Like `WrapNext`, crossing the two edges of `xx`.
  WrapNextLong = 6,
  /// Mirror of `WrapNextLong`.
  WrapPrevLong = 7,
  /// Close `x`, cross `xx`, then meet F's start at a new vertex.
  WrapNextApex = 8,
  /// Mirror of `WrapNextApex`.
  WrapPrevApex = 9,
  /// Four edges through three new vertices, leaving two new one-edge open faces.
  Bulge = 10,
}

impl Move {
  pub const ALL: [Move; 10] = [
    Move::Chord,
    Move::Apex,
    Move::WrapNext,
    Move::WrapPrev,
    Move::Span,
    Move::WrapNextLong,
    Move::WrapPrevLong,
    Move::WrapNextApex,
    Move::WrapPrevApex,
    Move::Bulge,
  ];

  pub fn id(self) -> u8 {
    self as u8
  }

  /// Edges the closed face gains beyond its own walk.
  pub fn growth(self) -> usize {
    match self {
      Move::Chord => 1,
      Move::Apex => 2,
      Move::WrapNext | Move::WrapPrev | Move::Span => 3,
      _ => 4,
    }
  }

  /// Vertices the move adds.
  pub fn vertices_added(self) -> usize {
    match self {
      Move::Apex | Move::WrapNextApex | Move::WrapPrevApex => 1,
      Move::Span => 2,
      Move::Bulge => 3,
      _ => 0,
    }
  }

  /// Whether the move may be played on the face with neighbourhood `hood`.
  ///
  /// Pure: depends only on the ring length, the window of face lengths and the
  /// closed squares and pentagons so far.
  pub fn is_legal(self, hood: &Neighborhood, tally: &FaceTally) -> bool {
    let n = hood.open;
    let (ppp, pp, p) = (hood.at(-3), hood.at(-2), hood.at(-1));
    let f = hood.at(0);
    let (x, xx, xxx) = (hood.at(1), hood.at(2), hood.at(3));
    let mut budget = Budget::new(tally);
    // A lone open face starts where it ends; nothing can close it cubically.
    if n < 2 {
      return false;
    }

    match self {
      Move::Chord => {
        if n > 2 && p + x > 4 {
          return false;
        }
        if n == 2 && !budget.admit(x + 1) {
          return false;
        }
        budget.admit(f + self.growth())
      }
      Move::Apex => p <= 4 && x <= 4 && budget.admit(f + self.growth()),
      Move::WrapNext | Move::WrapNextLong => {
        let crossed = if self == Move::WrapNext { 1 } else { 2 };
        if n < 4 || n == 5 || xx != crossed {
          return false;
        }
        if !budget.admit(x + 1) {
          return false;
        }
        if n > 4 && p + xxx > 4 {
          return false;
        }
        if n == 4 && !budget.admit(p + 1) {
          return false;
        }
        budget.admit(f + self.growth())
      }
      // With four open faces these coincide with the forward wraps.
      Move::WrapPrev | Move::WrapPrevLong => {
        let crossed = if self == Move::WrapPrev { 1 } else { 2 };
        if n < 6 || pp != crossed {
          return false;
        }
        budget.admit(p + 1) && ppp + x <= 4 && budget.admit(f + self.growth())
      }
      Move::Span => p <= 4 && x <= 4 && budget.admit(f + self.growth()),
      Move::WrapNextApex => {
        n >= 5
          && xx == 1 && p <= 4 && xxx <= 4
          && budget.admit(x + 1)
          && budget.admit(f + self.growth())
      }
      Move::WrapPrevApex => {
        n >= 5
          && pp == 1 && x <= 4 && ppp <= 4
          && budget.admit(p + 1)
          && budget.admit(f + self.growth())
      }
      Move::Bulge => p <= 4 && x <= 4 && budget.admit(f + self.growth()),
    }
  }
}

impl fmt::Display for Move {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}({})", self, self.id())
  }
}

impl PlanarMap {
  /// First legal move on the face in ring `slot`, in ascending id order,
  /// strictly after `after`.
  pub fn next_move(&self, slot: usize, after: Option<Move>) -> Option<Move> {
    let hood = self.neighborhood(slot);
    Move::ALL
      .into_iter()
      .filter(|&mv| after.is_none_or(|last| mv > last))
      .find(|mv| mv.is_legal(&hood, &self.tally))
  }

  /// Every move legal on the face in ring `slot`.
  pub fn legal_moves(&self, slot: usize) -> Vec<Move> {
    let hood = self.neighborhood(slot);
    Move::ALL.into_iter().filter(|mv| mv.is_legal(&hood, &self.tally)).collect()
  }
}
