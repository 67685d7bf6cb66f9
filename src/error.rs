use crate::face::FaceId;
use crate::state::VertexId;

/// Rejected search configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
  #[error("face bound {bound} is below the {seed} faces of the seed fragment")]
  BoundBelowSeed { bound: usize, seed: usize },
  #[error("depth margin {margin} leaves no room under face bound {bound}")]
  MarginTooLarge { margin: usize, bound: usize },
}

/// Failure reported by a canonical-labeling oracle. The search logs these and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
  #[error("graph has no vertices")]
  Empty,
  #[error("vertex {vertex} outside 1..={count}")]
  VertexOutOfRange { vertex: usize, count: usize },
  #[error("self-loop at vertex {vertex}")]
  SelfLoop { vertex: usize },
  #[error("edge {a}-{b} listed twice")]
  DuplicateEdge { a: usize, b: usize },
}

/// Structural defect found by `PlanarMap::validate`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
  #[error("vertex {vertex} has degree {degree}")]
  DegreeOverflow { vertex: VertexId, degree: u8 },
  #[error("open faces {left} and {right} are ring neighbours but do not meet")]
  RingBreak { left: FaceId, right: FaceId },
  #[error("ring slot points at face {face}, which is not open")]
  RingNotOpen { face: FaceId },
  #[error("open face {face} is missing from the ring")]
  OpenOutsideRing { face: FaceId },
  #[error("closed face {face} is not a cycle")]
  NotACycle { face: FaceId },
  #[error("edge {edge} borders {count} faces")]
  EdgeFaceCount { edge: usize, count: usize },
}
