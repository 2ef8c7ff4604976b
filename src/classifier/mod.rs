//! Category Classification
//!
//! Every scanned file belongs to zero or one configured category. A file
//! matching two or more rules is a configuration error that fails the run;
//! [`CategoryMatcher::classify_all`] collects every such conflict first.

mod engine;

pub use engine::{CategoryMatcher, ClassifiedFile, path_matches_pattern};
