//! Settlement engine: balance aggregation followed by debt minimization

pub mod aggregator;
pub mod core;
pub mod minimizer;

pub use aggregator::*;
pub use self::core::*;
pub use minimizer::*;
