//! Algolia implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! speaking the Algolia REST API over HTTP.

mod provider;

pub use provider::AlgoliaProvider;
