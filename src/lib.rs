//! Enumeration of cubic planar graphs with one triangle, two squares, five
//! pentagons and any number of hexagons, up to isomorphism.
//!
//! A seed fragment is grown one face closure at a time by a depth-first
//! search; every finished map is deduplicated through a canonical form.

pub mod canon;
pub mod config;
pub mod crosscheck;
pub mod error;
pub mod executor;
pub mod face;
pub mod moves;
pub mod registry;
pub mod report;
pub mod ring;
pub mod search;
pub mod state;

pub use canon::{Canonical, CanonicalForm, CanonicalOracle, Refinement};
pub use config::{DEFAULT_MAX_FACES, PruningPolicy, SearchConfig};
pub use error::{ConfigError, InvariantViolation, OracleError};
pub use moves::Move;
pub use report::{Report, Solution};
pub use search::{Search, SearchStats, enumerate};
pub use state::PlanarMap;
