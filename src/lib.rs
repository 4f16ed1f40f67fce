pub mod animated;
pub mod boundary;
pub mod error;
pub mod geometry;
pub mod math;
pub mod topology;

#[cfg(test)]
mod test_fixtures;

pub use error::{Result, VacError};
