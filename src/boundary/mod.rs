//! Boundaries made of key cells at one time: cycles, paths and hole
//! decompositions.

mod chain;
pub mod cycle;
pub mod cycle_helper;
pub mod path;
pub mod proper_cycle;
pub mod proper_path;
pub mod text;

pub use cycle::{Cycle, CycleBoundary};
pub use cycle_helper::CycleHelper;
pub use path::{Path, PathBoundary};
pub use proper_cycle::ProperCycle;
pub use proper_path::ProperPath;
pub use text::UnresolvedBoundary;
