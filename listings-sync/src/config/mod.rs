//! Configuration for the listings sync job.

mod dependencies;

pub use dependencies::Dependencies;
