//! Listing processor implementation.
//!
//! Transforms source records into `ListingDocument` structures for indexing.
//! The transformation is a strict allow-list projection: a source field with
//! no entry in the field tables (or in the derivation rules below) never
//! reaches the target document.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::IngestError;
use crate::processor::normalize;
use listings_sync_shared::{GeoPoint, ListingDocument, ReviewScores, SourceNumber, SourceRecord};

/// Text fields with their trail-with-terminator flag, in projection order.
///
/// `address` is nominally in this list but holds a mapping, which the text
/// normalizer passes through unchanged - it is effectively a copy-if-present.
const STRING_FIELDS: &[(&str, bool)] = &[
    ("name", true),
    ("space", true),
    ("description", true),
    ("neighborhood_overview", true),
    ("transit", true),
    ("address", false),
    ("property_type", false),
];

/// Numeric fields with their per-field maximum bound.
///
/// The bounds defend range filters against data-entry outliers.
const NUMERIC_FIELDS: &[(&str, f64)] = &[
    ("accommodates", 100.0),
    ("bedrooms", 20.0),
    ("beds", 100.0),
    ("number_of_reviews", 1_000_000.0),
    ("bathrooms", 100.0),
    ("price", 1000.0),
    ("weekly_price", 1000.0),
    ("security_deposit", 1000.0),
    ("cleaning_fee", 1000.0),
];

/// Processor that transforms source records into search documents.
///
/// Stateless and side-effect free: every record is transformed independently,
/// so the batch could be processed in any order (or in parallel) without
/// changing the output. A malformed record fails the whole batch - with an
/// atomic full replace downstream, skipping a record would silently drop it
/// from the published index.
pub struct ListingProcessor {
    // Could hold per-run configuration in the future
}

impl ListingProcessor {
    /// Create a new listing processor.
    pub fn new() -> Self {
        Self {}
    }

    /// Transform a batch of source records into search documents.
    ///
    /// # Arguments
    ///
    /// * `records` - The source records to transform
    ///
    /// # Returns
    ///
    /// One document per record, in input order, or the first structural
    /// failure encountered.
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub fn process_batch(
        &self,
        records: Vec<SourceRecord>,
    ) -> Result<Vec<ListingDocument>, IngestError> {
        let documents = records
            .iter()
            .enumerate()
            .map(|(position, record)| {
                self.transform(record).map_err(|e| {
                    IngestError::structural(format!("record at position {}: {}", position, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(document_count = documents.len(), "Transformed record batch");
        Ok(documents)
    }

    /// Transform one source record into exactly one search document.
    ///
    /// A field present with a JSON `null` value is treated as absent: the
    /// export writes nulls where the scraper had nothing, and the target
    /// document never carries null placeholders.
    pub fn transform(&self, record: &SourceRecord) -> Result<ListingDocument, IngestError> {
        let object_id = record
            .identifier()
            .ok_or_else(|| IngestError::structural("record carries no usable _id"))?;
        let mut doc = ListingDocument::new(object_id);

        for (field, trail) in STRING_FIELDS {
            if let Some(value) = record.get(field).filter(|v| !v.is_null()) {
                let normalized = normalize::strip_long_text(value, *trail);
                Self::assign_text_field(&mut doc, field, normalized)?;
            }
        }

        for (field, max_value) in NUMERIC_FIELDS {
            if let Some(value) = record.get(field).filter(|v| !v.is_null()) {
                let clamped = normalize::clamp_number(value, *max_value).ok_or_else(|| {
                    IngestError::structural(format!(
                        "field {:?} on {:?} is not a usable number",
                        field, doc.object_id
                    ))
                })?;
                Self::assign_numeric_field(&mut doc, field, clamped);
            }
        }

        if let Some(rating) = record
            .get("review_scores")
            .and_then(|scores| scores.get("review_scores_rating"))
            .filter(|v| !v.is_null())
        {
            let rating = SourceNumber::from_value(rating)
                .and_then(|n| n.as_f64())
                .ok_or_else(|| {
                    IngestError::structural(format!(
                        "review_scores_rating on {:?} is not a usable number",
                        doc.object_id
                    ))
                })?;
            doc.scores = Some(ReviewScores::from_rating(rating));
        }

        if let Some(images) = record.get("images").filter(|v| !v.is_null()) {
            doc.images = Some(images.clone());
        }

        doc.geoloc = Self::extract_geoloc(record, &doc.object_id)?;

        Ok(doc)
    }

    /// Assign a normalized value to its text-table slot.
    ///
    /// Text-typed slots only accept strings; a non-string value in one of
    /// them is a structural failure. `address` is the mapping slot and takes
    /// whatever shape the source had.
    fn assign_text_field(
        doc: &mut ListingDocument,
        field: &str,
        value: Value,
    ) -> Result<(), IngestError> {
        if field == "address" {
            doc.address = Some(value);
            return Ok(());
        }

        let text = match value {
            Value::String(s) => s,
            other => {
                return Err(IngestError::structural(format!(
                    "field {:?} on {:?} is not textual (got {})",
                    field, doc.object_id, other
                )))
            }
        };
        match field {
            "name" => doc.name = Some(text),
            "space" => doc.space = Some(text),
            "description" => doc.description = Some(text),
            "neighborhood_overview" => doc.neighborhood_overview = Some(text),
            "transit" => doc.transit = Some(text),
            "property_type" => doc.property_type = Some(text),
            other => unreachable!("field {other} missing from STRING_FIELDS dispatch"),
        }
        Ok(())
    }

    /// Assign a clamped value to its numeric-table slot.
    fn assign_numeric_field(doc: &mut ListingDocument, field: &str, value: f64) {
        match field {
            "accommodates" => doc.accommodates = Some(value),
            "bedrooms" => doc.bedrooms = Some(value),
            "beds" => doc.beds = Some(value),
            "number_of_reviews" => doc.number_of_reviews = Some(value),
            "bathrooms" => doc.bathrooms = Some(value),
            "price" => doc.price = Some(value),
            "weekly_price" => doc.weekly_price = Some(value),
            "security_deposit" => doc.security_deposit = Some(value),
            "cleaning_fee" => doc.cleaning_fee = Some(value),
            other => unreachable!("field {other} missing from NUMERIC_FIELDS dispatch"),
        }
    }

    /// Derive the geo position from `address.location`.
    ///
    /// Present iff the location is a `Point`. The source stores coordinates
    /// as an ordered `[longitude, latitude]` pair; the target wants named
    /// members, so the order flips here. A point location without a usable
    /// coordinate pair is a structural failure.
    fn extract_geoloc(
        record: &SourceRecord,
        object_id: &str,
    ) -> Result<Option<GeoPoint>, IngestError> {
        let location = match record
            .get("address")
            .and_then(|a| a.get("location"))
            .filter(|v| !v.is_null())
        {
            Some(location) => location,
            None => return Ok(None),
        };

        let location_type = location.get("type").and_then(Value::as_str).ok_or_else(|| {
            IngestError::structural(format!(
                "address.location on {:?} carries no type",
                object_id
            ))
        })?;
        if location_type != "Point" {
            return Ok(None);
        }

        let coordinates = location
            .get("coordinates")
            .and_then(Value::as_array)
            .filter(|pair| pair.len() >= 2)
            .ok_or_else(|| {
                IngestError::structural(format!(
                    "address.location.coordinates on {:?} is not a coordinate pair",
                    object_id
                ))
            })?;

        let component = |index: usize, name: &str| {
            SourceNumber::from_value(&coordinates[index])
                .and_then(|n| n.as_f64())
                .ok_or_else(|| {
                    IngestError::structural(format!(
                        "{} coordinate on {:?} is not a usable number",
                        name, object_id
                    ))
                })
        };

        Ok(Some(GeoPoint {
            lng: component(0, "longitude")?,
            lat: component(1, "latitude")?,
        }))
    }
}

impl Default for ListingProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> SourceRecord {
        SourceRecord::try_from(value).expect("object")
    }

    #[test]
    fn test_object_id_copied_verbatim() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({"_id": "10006546"})))
            .unwrap();
        assert_eq!(doc.object_id, "10006546");
    }

    #[test]
    fn test_missing_id_is_structural_failure() {
        let err = ListingProcessor::new()
            .transform(&record(json!({"name": "No id"})))
            .unwrap_err();
        assert!(matches!(err, IngestError::StructuralError(_)));
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({"_id": "x"})))
            .unwrap();

        let value = serde_json::to_value(&doc).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["objectID"]);
    }

    #[test]
    fn test_long_name_truncated_with_terminator() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({"_id": "x1", "name": "A".repeat(400)})))
            .unwrap();

        let name = doc.name.unwrap();
        assert!(name.ends_with('.'));
        // ≤350 chars before the appended terminator.
        assert!(name.trim_end_matches('.').chars().count() <= normalize::TEXT_LIMIT);
    }

    #[test]
    fn test_property_type_not_terminator_trailed() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({"_id": "x", "property_type": "Apartment"})))
            .unwrap();
        assert_eq!(doc.property_type, Some("Apartment".to_string()));
    }

    #[test]
    fn test_address_mapping_passes_through() {
        let address = json!({"street": "Rua X", "country": "Portugal"});
        let doc = ListingProcessor::new()
            .transform(&record(json!({"_id": "x", "address": address.clone()})))
            .unwrap();
        assert_eq!(doc.address, Some(address));
    }

    #[test]
    fn test_price_clamped_from_decimal_representation() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({
                "_id": "x",
                "price": {"$numberDecimal": "5000"}
            })))
            .unwrap();
        assert_eq!(doc.price, Some(1000.0));
    }

    #[test]
    fn test_bedrooms_clamped_at_own_bound() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({"_id": "x", "bedrooms": 35})))
            .unwrap();
        assert_eq!(doc.bedrooms, Some(20.0));
    }

    #[test]
    fn test_null_numeric_field_treated_as_absent() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({"_id": "x", "price": null, "bedrooms": null})))
            .unwrap();

        assert_eq!(doc.price, None);
        assert_eq!(doc.bedrooms, None);
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("price").is_none());
    }

    #[test]
    fn test_null_text_field_treated_as_absent() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({
                "_id": "x",
                "transit": null,
                "address": null,
                "name": "Kept"
            })))
            .unwrap();

        assert_eq!(doc.transit, None);
        assert_eq!(doc.address, None);
        assert!(doc.geoloc.is_none());
        assert_eq!(doc.name, Some("Kept.".to_string()));
    }

    #[test]
    fn test_null_rating_and_images_treated_as_absent() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({
                "_id": "x",
                "review_scores": {"review_scores_rating": null},
                "images": null
            })))
            .unwrap();

        assert!(doc.scores.is_none());
        assert!(doc.images.is_none());
    }

    #[test]
    fn test_garbage_numeric_field_is_structural_failure() {
        let err = ListingProcessor::new()
            .transform(&record(json!({"_id": "x", "price": [1, 2]})))
            .unwrap_err();
        assert!(matches!(err, IngestError::StructuralError(_)));
    }

    #[test]
    fn test_scores_derived_from_rating() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({
                "_id": "x",
                "review_scores": {"review_scores_rating": 100}
            })))
            .unwrap();

        let scores = doc.scores.unwrap();
        assert_eq!(scores.stars, 5.0);
        assert!(scores.has_one && scores.has_two && scores.has_three);
        assert!(scores.has_four && scores.has_five);
    }

    #[test]
    fn test_scores_absent_without_rating() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({
                "_id": "x",
                "review_scores": {"review_scores_accuracy": 10}
            })))
            .unwrap();
        assert!(doc.scores.is_none());
    }

    #[test]
    fn test_images_copied_verbatim() {
        let images = json!({"picture_url": "https://example.com/p.jpg", "thumbnail_url": ""});
        let doc = ListingProcessor::new()
            .transform(&record(json!({"_id": "x", "images": images.clone()})))
            .unwrap();
        assert_eq!(doc.images, Some(images));
    }

    #[test]
    fn test_geoloc_flips_coordinate_order() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({
                "_id": "x1",
                "address": {"location": {"type": "Point", "coordinates": [10.0, 20.0]}}
            })))
            .unwrap();

        let geoloc = doc.geoloc.unwrap();
        assert_eq!(geoloc.lng, 10.0);
        assert_eq!(geoloc.lat, 20.0);
    }

    #[test]
    fn test_geoloc_absent_for_non_point_location() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({
                "_id": "x",
                "address": {"location": {"type": "Polygon", "coordinates": [[0.0, 0.0]]}}
            })))
            .unwrap();
        assert!(doc.geoloc.is_none());
    }

    #[test]
    fn test_geoloc_absent_without_location() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({"_id": "x", "address": {"street": "Rua X"}})))
            .unwrap();
        assert!(doc.geoloc.is_none());
    }

    #[test]
    fn test_point_without_coordinates_is_structural_failure() {
        let err = ListingProcessor::new()
            .transform(&record(json!({
                "_id": "x",
                "address": {"location": {"type": "Point"}}
            })))
            .unwrap_err();
        assert!(matches!(err, IngestError::StructuralError(_)));
    }

    #[test]
    fn test_unlisted_fields_never_reach_the_document() {
        // Fields outside the allow-list, including ones the source
        // collection actually carries, must not appear in the document.
        let doc = ListingProcessor::new()
            .transform(&record(json!({
                "_id": "x",
                "name": "Kept",
                "summary": "Dropped",
                "house_rules": "Dropped",
                "host": {"host_id": "123"},
                "amenities": ["Wifi"],
                "minimum_nights": "2"
            })))
            .unwrap();

        let value = serde_json::to_value(&doc).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("name"));
        for dropped in ["summary", "house_rules", "host", "amenities", "minimum_nights"] {
            assert!(!obj.contains_key(dropped), "{dropped} leaked into the document");
        }
    }

    #[test]
    fn test_end_to_end_reference_record() {
        let doc = ListingProcessor::new()
            .transform(&record(json!({
                "_id": "x1",
                "name": "A".repeat(400),
                "review_scores": {"review_scores_rating": 100},
                "address": {"location": {"type": "Point", "coordinates": [10.0, 20.0]}}
            })))
            .unwrap();

        assert_eq!(doc.object_id, "x1");
        assert!(doc.name.as_deref().unwrap().ends_with('.'));
        let scores = doc.scores.unwrap();
        assert_eq!(scores.stars, 5.0);
        assert!(scores.has_five);
        assert_eq!(doc.geoloc, Some(GeoPoint { lat: 20.0, lng: 10.0 }));
        assert!(doc.images.is_none());
    }

    #[test]
    fn test_process_batch_preserves_order_and_identity() {
        let records = vec![
            record(json!({"_id": "a", "price": 10})),
            record(json!({"_id": "b"})),
            record(json!({"_id": "c", "beds": 300})),
        ];

        let docs = ListingProcessor::new().process_batch(records).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.object_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(docs[2].beds, Some(100.0));
    }

    #[test]
    fn test_process_batch_fails_on_first_malformed_record() {
        let records = vec![
            record(json!({"_id": "a"})),
            record(json!({"no_id": true})),
        ];

        let err = ListingProcessor::new().process_batch(records).unwrap_err();
        match err {
            IngestError::StructuralError(msg) => assert!(msg.contains("position 1")),
            other => panic!("expected structural error, got {other}"),
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Every key a serialized document may legally carry.
        const ALLOWED_KEYS: &[&str] = &[
            "objectID",
            "name",
            "space",
            "description",
            "neighborhood_overview",
            "transit",
            "property_type",
            "address",
            "accommodates",
            "bedrooms",
            "beds",
            "number_of_reviews",
            "bathrooms",
            "price",
            "weekly_price",
            "security_deposit",
            "cleaning_fee",
            "scores",
            "images",
            "_geoloc",
        ];

        fn arb_field_value() -> impl Strategy<Value = Value> {
            prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::Bool),
                (0i64..100_000).prop_map(|n| json!(n)),
                "[a-zA-Z .]{0,60}".prop_map(Value::String),
                prop::collection::vec(0i64..100, 0..4).prop_map(|v| json!(v)),
            ]
        }

        proptest! {
            #[test]
            fn transformed_documents_never_leak_unexpected_keys(
                fields in prop::collection::hash_map("[a-z_]{1,16}", arb_field_value(), 0..12)
            ) {
                let mut map = serde_json::Map::new();
                for (key, value) in fields {
                    map.insert(key, value);
                }
                map.insert("_id".to_string(), json!("prop-doc"));

                // Structural rejection of a hostile shape is acceptable; a
                // produced document must stay inside the allow-list.
                if let Ok(doc) = ListingProcessor::new().transform(&SourceRecord::new(map)) {
                    let value = serde_json::to_value(&doc).unwrap();
                    for key in value.as_object().unwrap().keys() {
                        prop_assert!(
                            ALLOWED_KEYS.contains(&key.as_str()),
                            "{} leaked into the document",
                            key
                        );
                    }
                }
            }
        }
    }
}
