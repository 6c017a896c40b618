//! Static HTML review pages for a single Git commit or SVN revision, with
//! static-analysis findings aligned onto the diff.

pub mod config;
pub mod diff;
pub mod error;
pub mod generate;
pub mod render;
pub mod scan;
pub mod vcs;
