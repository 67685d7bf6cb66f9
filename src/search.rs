//! Depth-first enumeration over an explicit stack of frames.
//!
//! Each frame remembers which open face it works on, the last move tried there
//! and the undo record of the move currently applied below it. Backtracking
//! replays undo records; no map is ever copied.

use std::cmp::Reverse;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::canon::{CanonicalOracle, Refinement};
use crate::config::{PruningPolicy, SearchConfig};
use crate::crosscheck::EdgeListGraph;
use crate::error::ConfigError;
use crate::executor::Undo;
use crate::moves::Move;
use crate::registry::Registry;
use crate::report::Report;
use crate::state::PlanarMap;

const PROGRESS_EVERY: u64 = 4096;

/// Ring slot of the longest open face; ties go to the lowest slot.
pub fn choose_face(map: &PlanarMap) -> usize {
  map
    .ring()
    .iter()
    .enumerate()
    .min_by_key(|&(slot, face)| (Reverse(map.face(face).len()), slot))
    .map_or(0, |(slot, _)| slot)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
  /// Moves applied.
  pub nodes: u64,
  /// Frames that ran out of legal moves.
  pub dead_ends: u64,
  /// Maps with no open face left.
  pub candidates: u64,
  pub over_bound: u64,
  /// Closed maps off the face profile.
  pub rejected: u64,
  pub pruned_depth: u64,
  pub pruned_single: u64,
  pub pruned_size: u64,
  pub pruned_flank: u64,
  pub duplicates: u64,
  pub oracle_failures: u64,
}

#[derive(Debug, Default)]
struct Frame {
  slot: Option<usize>,
  cursor: Option<Move>,
  applied: Option<Undo>,
}

enum Step {
  Descend,
  Retreat,
}

pub struct Search<O> {
  config: SearchConfig,
  oracle: O,
  map: PlanarMap,
  frames: Vec<Frame>,
  registry: Registry,
  stats: SearchStats,
  candidates: Vec<EdgeListGraph>,
  progress: ProgressBar,
}

impl<O: CanonicalOracle> Search<O> {
  pub fn new(config: SearchConfig, oracle: O) -> Result<Self, ConfigError> {
    config.validate()?;
    let progress = if config.progress {
      let pb = ProgressBar::new_spinner();
      pb.set_style(
        ProgressStyle::with_template("[search] {spinner} {pos} nodes {elapsed_precise} {msg}")
          .unwrap_or_else(|_| ProgressStyle::default_spinner()),
      );
      pb
    } else {
      ProgressBar::hidden()
    };
    Ok(Self {
      registry: Registry::new(config.keep_solutions),
      oracle,
      map: PlanarMap::seed(),
      frames: vec![Frame::default()],
      stats: SearchStats::default(),
      candidates: Vec::new(),
      progress,
      config,
    })
  }

  pub fn run(mut self) -> Report {
    info!(
      "searching up to {} faces (depth limit {}, pruning {:?})",
      self.config.max_faces,
      self.config.depth_limit(),
      self.config.pruning
    );

    loop {
      let depth = self.frames.len();
      let Some(top) = self.frames.last_mut() else { break };
      let slot = *top.slot.get_or_insert_with(|| choose_face(&self.map));
      let Some(mv) = self.map.next_move(slot, top.cursor) else {
        trace!("no move left on ring slot {slot}");
        self.backtrack();
        continue;
      };
      top.cursor = Some(mv);

      let undo = self.map.apply(slot, mv);
      self.stats.nodes += 1;
      trace!("{mv} on ring slot {slot} at depth {depth}");
      if cfg!(debug_assertions) {
        if let Err(e) = self.map.validate() {
          panic!("{mv} on ring slot {slot} broke the map: {e}");
        }
      }
      if self.stats.nodes % PROGRESS_EVERY == 0 {
        self.progress.set_position(self.stats.nodes);
        self.progress.set_message(format!("{} classes", self.registry.classes()));
      }

      match self.step(depth) {
        Step::Descend => {
          self.frames[depth - 1].applied = Some(undo);
          self.frames.push(Frame::default());
        }
        Step::Retreat => self.map.undo(undo),
      }
    }

    self.finish()
  }

  /// Drop the exhausted top frame and take back the move that led to it.
  fn backtrack(&mut self) {
    self.stats.dead_ends += 1;
    self.frames.pop();
    if let Some(undo) = self.frames.last_mut().and_then(|parent| parent.applied.take()) {
      self.map.undo(undo);
    }
  }

  /// Judge the map just produced by a move made from the frame at `depth`.
  fn step(&mut self, depth: usize) -> Step {
    let PruningPolicy { flank_symmetry, single_open_face, .. } = self.config.pruning;
    if flank_symmetry && self.mirrored_flanks() {
      self.stats.pruned_flank += 1;
      return Step::Retreat;
    }
    if self.map.ring().is_empty() {
      self.complete();
      return Step::Retreat;
    }
    if depth > self.config.depth_limit() {
      debug!("curtailing at depth {depth}");
      self.stats.pruned_depth += 1;
      return Step::Retreat;
    }
    if single_open_face && self.map.ring().len() == 1 {
      self.stats.pruned_single += 1;
      return Step::Retreat;
    }
    if !self.map.within_budget() {
      debug!("face sizes out of budget");
      self.stats.pruned_size += 1;
      return Step::Retreat;
    }
    Step::Descend
  }

  /// Faces 2 and 3 flank the seed triangle. Once face 3 has closed shorter
  /// than a long face 2, the mirror ordering was explored already.
  fn mirrored_flanks(&self) -> bool {
    if self.map.face_count() < 4 {
      return false;
    }
    let (left, right) = (self.map.face(2), self.map.face(3));
    left.len() > 4 && right.is_closed() && right.len() < left.len()
  }

  fn complete(&mut self) {
    self.stats.candidates += 1;
    if self.map.face_count() > self.config.max_faces {
      self.stats.over_bound += 1;
      return;
    }
    if !self.map.is_complete() {
      debug!("closed map off the face profile: {:?}", self.map.tally());
      self.stats.rejected += 1;
      return;
    }
    if self.config.keep_candidates {
      self.candidates.push(EdgeListGraph {
        node_count: self.map.vertex_count(),
        edges: self.map.edge_list(),
      });
    }
    self.registry.submit(&self.oracle, &self.map);
  }

  fn finish(mut self) -> Report {
    self.stats.duplicates = self.registry.duplicates() as u64;
    self.stats.oracle_failures = self.registry.failures() as u64;
    debug_assert_eq!(self.map, PlanarMap::seed(), "search ended away from the seed");
    let classes = self.registry.classes();
    self.progress.set_position(self.stats.nodes);
    self.progress.finish_with_message(format!("✔ {classes} classes"));
    info!(
      "search done: {classes} classes from {} candidates, {} nodes",
      self.stats.candidates, self.stats.nodes
    );

    let (by_hexagons, solutions) = self.registry.into_parts();
    Report {
      max_faces: self.config.max_faces,
      classes,
      by_hexagons,
      stats: self.stats,
      config: self.config,
      solutions,
      candidates: self.candidates,
    }
  }
}

/// Run the search with the bundled canonical labeler.
pub fn enumerate(config: SearchConfig) -> Result<Report, ConfigError> {
  Ok(Search::new(config, Refinement)?.run())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn seed_picks_first_two_edge_face() {
    // open lengths [2, 2, 1, 1, 1]
    assert_eq!(choose_face(&PlanarMap::seed()), 0);
  }

  #[test]
  fn longest_face_wins_lowest_slot_on_ties() {
    let mut map = PlanarMap::seed();
    let undo = map.apply(0, Move::Apex);
    // open lengths [3, 1, 1, 2]
    assert_eq!(choose_face(&map), 0);
    map.undo(undo);
    let _ = map.apply(0, Move::Span);
    // open lengths [1, 2, 1, 1, 2]
    assert_eq!(choose_face(&map), 1);
  }

  #[test]
  fn bad_config_is_refused() {
    assert!(Search::new(SearchConfig::with_max_faces(3), Refinement).is_err());
  }

  #[test]
  fn bound_eight_finds_nothing() {
    let report = enumerate(SearchConfig::with_max_faces(8)).unwrap();
    assert_eq!(report.classes, 0);
    assert!(report.by_hexagons.is_empty());
    assert!(report.stats.nodes > 0);
  }

  #[test]
  fn kept_candidates_match_submissions() {
    let mut config = SearchConfig::with_max_faces(11);
    config.keep_candidates = true;
    let report = enumerate(config).unwrap();
    let submitted = report.classes as u64 + report.stats.duplicates + report.stats.oracle_failures;
    assert_eq!(report.candidates.len() as u64, submitted);
    assert_eq!(report.stats.oracle_failures, 0);
    assert_eq!(
      report.stats.candidates,
      submitted + report.stats.over_bound + report.stats.rejected
    );
  }
}
