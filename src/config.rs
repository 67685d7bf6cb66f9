use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::state::SEED_FACES;

/// Face bound used when nothing else is asked for.
pub const DEFAULT_MAX_FACES: usize = 14;

/// Heuristic cut-offs of the driver.
///
/// Neither rule is known to be complete (that is, to never discard a branch
/// that would finish inside the bound), so both are exposed here and checked
/// against the independent cross-check instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruningPolicy {
  /// Abandon a branch once its depth exceeds `max_faces - depth_margin`.
  pub depth_margin: usize,
  /// Abandon a branch when exactly one open face is left.
  pub single_open_face: bool,
  /// Only explore one of the two mirror orders of the faces flanking the triangle.
  pub flank_symmetry: bool,
}

impl Default for PruningPolicy {
  fn default() -> Self {
    Self { depth_margin: 4, single_open_face: true, flank_symmetry: false }
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
  pub max_faces: usize,
  pub pruning: PruningPolicy,
  /// Keep a `Solution` for every new isomorphism class.
  pub keep_solutions: bool,
  /// Keep every completed candidate, duplicates included, for `crosscheck`.
  pub keep_candidates: bool,
  /// Draw an indicatif spinner while searching.
  pub progress: bool,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      max_faces: DEFAULT_MAX_FACES,
      pruning: PruningPolicy::default(),
      keep_solutions: false,
      keep_candidates: false,
      progress: false,
    }
  }
}

impl SearchConfig {
  pub fn with_max_faces(max_faces: usize) -> Self {
    Self { max_faces, ..Self::default() }
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.max_faces < SEED_FACES {
      return Err(ConfigError::BoundBelowSeed { bound: self.max_faces, seed: SEED_FACES });
    }
    if self.pruning.depth_margin >= self.max_faces {
      return Err(ConfigError::MarginTooLarge {
        margin: self.pruning.depth_margin,
        bound: self.max_faces,
      });
    }
    Ok(())
  }

  /// Deepest stack the driver keeps exploring from.
  pub fn depth_limit(&self) -> usize {
    self.max_faces - self.pruning.depth_margin
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_bound_is_fourteen() {
    let cfg = SearchConfig::default();
    assert_eq!(cfg.max_faces, 14);
    assert_eq!(cfg.depth_limit(), 10);
    assert!(cfg.validate().is_ok());
  }

  #[test]
  fn rejects_bound_below_seed() {
    let cfg = SearchConfig::with_max_faces(6);
    assert_eq!(cfg.validate(), Err(ConfigError::BoundBelowSeed { bound: 6, seed: 7 }));
  }

  #[test]
  fn rejects_oversized_margin() {
    let mut cfg = SearchConfig::with_max_faces(9);
    cfg.pruning.depth_margin = 9;
    assert!(matches!(cfg.validate(), Err(ConfigError::MarginTooLarge { .. })));
  }

  #[test]
  fn config_survives_json() {
    let mut cfg = SearchConfig::with_max_faces(20);
    cfg.pruning.flank_symmetry = true;
    let text = serde_json::to_string(&cfg).unwrap();
    let back: SearchConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(back, cfg);
  }
}
