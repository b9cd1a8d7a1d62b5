//! Listing document types for the search index.
//!
//! This module defines the flattened document shape that is published to the
//! search index. The struct is the allow-list: a source field with no
//! counterpart here cannot reach the index, and fields absent on the source
//! stay absent in the serialized document (never `null`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Document representation for the search index.
///
/// One `ListingDocument` is built, once, per source record and never mutated
/// afterwards. All attributes except `object_id` are optional and sparse:
/// serialization skips every `None` so the indexed document only carries the
/// fields the source actually had.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListingDocument {
    /// Unique document identifier, copied verbatim from the source `_id`.
    #[serde(rename = "objectID")]
    pub object_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood_overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// Nested address mapping, passed through from the source unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accommodates: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_reviews: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_deposit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaning_fee: Option<f64>,
    /// Star summary derived from the source review rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<ReviewScores>,
    /// Opaque images value, passed through from the source unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Value>,
    /// Geo position, present only for point-located listings.
    #[serde(rename = "_geoloc", skip_serializing_if = "Option::is_none")]
    pub geoloc: Option<GeoPoint>,
}

impl ListingDocument {
    /// Create an empty document carrying only the identifier.
    pub fn new(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            ..Self::default()
        }
    }
}

/// Star summary derived from the source percentage rating.
///
/// `stars` is the rating divided by 20 and rounded; the `has_*` flags are
/// threshold markers for faceted filtering and are monotonic by construction
/// (`has_five` implies every lower flag).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReviewScores {
    pub stars: f64,
    pub has_one: bool,
    pub has_two: bool,
    pub has_three: bool,
    pub has_four: bool,
    pub has_five: bool,
}

impl ReviewScores {
    /// Derive the star summary from a percentage rating in `[0, 100]`.
    ///
    /// Rounding is half-to-even: a rating of 90 is 4.5 stars raw and
    /// rounds to 4, not 5.
    pub fn from_rating(rating: f64) -> Self {
        let stars = (rating / 20.0).round_ties_even();
        Self {
            stars,
            has_one: stars >= 1.0,
            has_two: stars >= 2.0,
            has_three: stars >= 3.0,
            has_four: stars >= 4.0,
            has_five: stars >= 5.0,
        }
    }
}

/// Geographic position of a listing.
///
/// Note the coordinate order: the source stores `[longitude, latitude]`
/// pairs, while the index wants named `lat`/`lng` members.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}
