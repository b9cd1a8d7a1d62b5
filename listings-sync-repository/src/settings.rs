//! Typed index settings model.
//!
//! This module defines the backend-neutral settings structure for the
//! listings search index: ordered searchable-attribute groups, faceting
//! attributes, the retrieve list, the fixed ranking vocabulary, and the
//! plurals flag. `IndexSettings::listings()` is the canonical configuration
//! the sync job applies on every run.

use serde_json::{json, Value};

/// One attribute inside a searchable group.
///
/// An `unordered` attribute does not rank matches by their position within
/// the attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchableField {
    pub name: String,
    pub unordered: bool,
}

impl SearchableField {
    /// An ordered (position-sensitive) searchable attribute.
    pub fn ordered(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unordered: false,
        }
    }

    /// An unordered searchable attribute.
    pub fn unordered(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unordered: true,
        }
    }

    fn render(&self) -> String {
        if self.unordered {
            format!("unordered({})", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// One priority tier of searchable attributes.
///
/// Attributes within a group share the same relevance priority; groups are
/// applied in declaration order, most important first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchableGroup(pub Vec<SearchableField>);

impl SearchableGroup {
    /// A group of same-priority ordered attributes.
    pub fn of(names: &[&str]) -> Self {
        Self(names.iter().map(|n| SearchableField::ordered(*n)).collect())
    }

    /// A single-attribute group.
    pub fn single(field: SearchableField) -> Self {
        Self(vec![field])
    }

    fn render(&self) -> String {
        self.0
            .iter()
            .map(SearchableField::render)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// An attribute declared for faceting.
///
/// A `searchable` facet additionally allows querying the facet values
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetAttribute {
    pub name: String,
    pub searchable: bool,
}

impl FacetAttribute {
    /// A plain (filter-only) facet.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            searchable: false,
        }
    }

    /// A facet whose values can be searched.
    pub fn searchable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            searchable: true,
        }
    }

    fn render(&self) -> String {
        if self.searchable {
            format!("searchable({})", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Ranking criteria vocabulary, applied in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingCriterion {
    Geo,
    Typo,
    Words,
    Filters,
    Proximity,
    Attribute,
    Exact,
    Custom,
}

impl RankingCriterion {
    /// The wire name of the criterion.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Geo => "geo",
            Self::Typo => "typo",
            Self::Words => "words",
            Self::Filters => "filters",
            Self::Proximity => "proximity",
            Self::Attribute => "attribute",
            Self::Exact => "exact",
            Self::Custom => "custom",
        }
    }
}

/// Full settings structure for the search index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSettings {
    /// Ordered searchable-attribute groups, most important first.
    pub searchable_attributes: Vec<SearchableGroup>,
    /// Attributes available for faceted filtering.
    pub attributes_for_faceting: Vec<FacetAttribute>,
    /// Attributes returned with search results.
    pub attributes_to_retrieve: Vec<String>,
    /// Ordered ranking criteria.
    pub ranking: Vec<RankingCriterion>,
    /// Ignore plurals during matching.
    pub ignore_plurals: bool,
}

impl IndexSettings {
    /// The canonical settings for the listings index.
    ///
    /// Geo ranks first because nearby results matter most for listings;
    /// the searchable groups put the listing name and street-level address
    /// fields at the top priority.
    pub fn listings() -> Self {
        Self {
            searchable_attributes: vec![
                SearchableGroup::of(&["name", "address.street", "address.suburb"]),
                SearchableGroup::of(&["address.market", "address.country"]),
                SearchableGroup::single(SearchableField::unordered("description")),
                SearchableGroup::single(SearchableField::unordered("space")),
                SearchableGroup::single(SearchableField::unordered("neighborhood_overview")),
                SearchableGroup::of(&["transit"]),
            ],
            attributes_for_faceting: vec![
                FacetAttribute::plain("property_type"),
                FacetAttribute::searchable("address.country"),
                FacetAttribute::plain("scores.stars"),
                FacetAttribute::plain("price"),
                FacetAttribute::plain("cleaning_fee"),
            ],
            attributes_to_retrieve: [
                "images.picture_url",
                "summary",
                "description",
                "space",
                "neighborhood",
                "transit",
                "address",
                "number_of_reviews",
                "scores",
                "price",
                "cleaning_fee",
                "property_type",
                "accommodates",
                "bedrooms",
                "beds",
                "bathrooms",
                "security_deposit",
                "_geoloc",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ranking: vec![
                RankingCriterion::Geo,
                RankingCriterion::Typo,
                RankingCriterion::Words,
                RankingCriterion::Filters,
                RankingCriterion::Proximity,
                RankingCriterion::Attribute,
                RankingCriterion::Exact,
                RankingCriterion::Custom,
            ],
            ignore_plurals: true,
        }
    }

    /// Render the settings as the JSON body the index API expects.
    pub fn to_json(&self) -> Value {
        json!({
            "searchableAttributes": self
                .searchable_attributes
                .iter()
                .map(SearchableGroup::render)
                .collect::<Vec<_>>(),
            "attributesForFaceting": self
                .attributes_for_faceting
                .iter()
                .map(FacetAttribute::render)
                .collect::<Vec<_>>(),
            "attributesToRetrieve": self.attributes_to_retrieve,
            "ranking": self
                .ranking
                .iter()
                .map(RankingCriterion::as_str)
                .collect::<Vec<_>>(),
            "ignorePlurals": self.ignore_plurals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_searchable_field_rendering() {
        assert_eq!(SearchableField::ordered("transit").render(), "transit");
        assert_eq!(
            SearchableField::unordered("description").render(),
            "unordered(description)"
        );
    }

    #[test]
    fn test_searchable_group_rendering() {
        let group = SearchableGroup::of(&["name", "address.street", "address.suburb"]);
        assert_eq!(group.render(), "name,address.street,address.suburb");
    }

    #[test]
    fn test_facet_rendering() {
        assert_eq!(FacetAttribute::plain("price").render(), "price");
        assert_eq!(
            FacetAttribute::searchable("address.country").render(),
            "searchable(address.country)"
        );
    }

    #[test]
    fn test_ranking_vocabulary() {
        let settings = IndexSettings::listings();
        let names: Vec<&str> = settings.ranking.iter().map(RankingCriterion::as_str).collect();
        assert_eq!(
            names,
            vec!["geo", "typo", "words", "filters", "proximity", "attribute", "exact", "custom"]
        );
    }

    #[test]
    fn test_listings_settings_json() {
        let body = IndexSettings::listings().to_json();

        assert_eq!(
            body["searchableAttributes"],
            json!([
                "name,address.street,address.suburb",
                "address.market,address.country",
                "unordered(description)",
                "unordered(space)",
                "unordered(neighborhood_overview)",
                "transit"
            ])
        );
        assert_eq!(
            body["attributesForFaceting"],
            json!([
                "property_type",
                "searchable(address.country)",
                "scores.stars",
                "price",
                "cleaning_fee"
            ])
        );
        assert_eq!(body["ignorePlurals"], json!(true));
        assert_eq!(
            body["attributesToRetrieve"].as_array().unwrap().len(),
            18
        );
        assert_eq!(body["ranking"][0], json!("geo"));
    }
}
