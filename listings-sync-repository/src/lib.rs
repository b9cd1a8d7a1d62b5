//! # Listings Sync Repository
//!
//! This crate provides traits and implementations for interacting with the
//! hosted search index. It includes definitions for errors, interfaces, the
//! typed index settings model, and a concrete implementation for Algolia.

pub mod algolia;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod service;
pub mod settings;

pub use algolia::AlgoliaProvider;
pub use config::SearchIndexServiceConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use service::SearchIndexService;
pub use settings::{FacetAttribute, IndexSettings, RankingCriterion, SearchableField, SearchableGroup};
