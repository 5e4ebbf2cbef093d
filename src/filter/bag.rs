use super::date_format::{format_date, FilterDate, DEFAULT_DATE_FORMAT};
use super::definition::{Condition, FilterDefinition, ScalarValue};
use super::kind::FilterKind;
use super::unique_key::KeyDeduplicator;
use crate::error::AppResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Id column used for cursor style pagination when none is given
pub const DEFAULT_ID_FIELD_NAME: &str = "entity_id";

const LAST_ID_FILTER_NAME: &str = "lastid";
const WEBSITE_FILTER_NAME: &str = "website_id";
const STORE_FILTER_NAME: &str = "store_id";

type FilterMap = IndexMap<String, FilterDefinition>;

/// Filters as expected by the remote API client:
/// `{"filters": {"filter": [...], "complex_filter": [...]}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppliedFilters {
    pub filters: FilterGroups,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterGroups {
    #[serde(rename = "filter", default, skip_serializing_if = "Vec::is_empty")]
    pub simple: Vec<FilterDefinition>,
    #[serde(rename = "complex_filter", default, skip_serializing_if = "Vec::is_empty")]
    pub complex: Vec<FilterDefinition>,
}

impl FilterGroups {
    pub fn get(&self, kind: FilterKind) -> &[FilterDefinition] {
        match kind {
            FilterKind::Simple => &self.simple,
            FilterKind::Complex => &self.complex,
        }
    }

    fn get_mut(&mut self, kind: FilterKind) -> &mut Vec<FilterDefinition> {
        match kind {
            FilterKind::Simple => &mut self.simple,
            FilterKind::Complex => &mut self.complex,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.simple.is_empty() && self.complex.is_empty()
    }
}

/// Magento API filter container.
///
/// Filters are stored per kind under a name; adding a filter under an
/// existing name replaces it in place. Insertion order is kept so the
/// emitted filters are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchFilterBag {
    simple: FilterMap,
    complex: FilterMap,
}

impl BatchFilterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bag seeded with `name => value` pairs. Each seed is stored
    /// as `{key: name, value}` under its own name.
    pub fn with_filters<S, V, C>(
        simple: impl IntoIterator<Item = (S, V)>,
        complex: impl IntoIterator<Item = (C, Condition)>,
    ) -> Self
    where
        S: Into<String>,
        V: Into<ScalarValue>,
        C: Into<String>,
    {
        let mut bag = Self::new();

        for (name, value) in simple {
            let name = name.into();
            let definition = FilterDefinition::new(name.clone(), value);
            bag.add_filter(name, definition);
        }

        for (name, condition) in complex {
            let name = name.into();
            let definition = FilterDefinition {
                key: name.clone(),
                value: condition.into(),
            };
            bag.add_complex_filter(name, definition);
        }

        bag
    }

    fn map(&self, kind: FilterKind) -> &FilterMap {
        match kind {
            FilterKind::Simple => &self.simple,
            FilterKind::Complex => &self.complex,
        }
    }

    fn map_mut(&mut self, kind: FilterKind) -> &mut FilterMap {
        match kind {
            FilterKind::Simple => &mut self.simple,
            FilterKind::Complex => &mut self.complex,
        }
    }

    /// Add a simple filter
    pub fn add_filter(&mut self, name: impl Into<String>, definition: FilterDefinition) -> &mut Self {
        self.add_filter_of_kind(name, definition, FilterKind::Simple)
    }

    pub fn add_complex_filter(
        &mut self,
        name: impl Into<String>,
        definition: FilterDefinition,
    ) -> &mut Self {
        self.add_filter_of_kind(name, definition, FilterKind::Complex)
    }

    pub fn add_filter_of_kind(
        &mut self,
        name: impl Into<String>,
        definition: FilterDefinition,
        kind: FilterKind,
    ) -> &mut Self {
        let name = name.into();
        debug!(kind = %kind, name = %name, key = %definition.key, "Adding filter");
        self.map_mut(kind).insert(name, definition);
        self
    }

    /// Add a filter by wire kind name; unknown kinds are stored as simple filters
    pub fn add_filter_by_kind_name(
        &mut self,
        name: impl Into<String>,
        definition: FilterDefinition,
        kind_name: &str,
    ) -> &mut Self {
        let kind = FilterKind::from_name(kind_name);
        if FilterKind::parse(kind_name).is_none() {
            warn!(kind = %kind_name, "Unknown filter kind, storing as simple filter");
        }
        self.add_filter_of_kind(name, definition, kind)
    }

    /// Continue from the last fetched id: `id_field > last_id`
    pub fn add_last_id_filter(&mut self, last_id: impl Into<ScalarValue>) -> &mut Self {
        self.add_last_id_filter_for(last_id, DEFAULT_ID_FIELD_NAME)
    }

    pub fn add_last_id_filter_for(
        &mut self,
        last_id: impl Into<ScalarValue>,
        id_field_name: &str,
    ) -> &mut Self {
        self.add_complex_filter(
            LAST_ID_FILTER_NAME,
            FilterDefinition::nested(id_field_name, "gt", last_id),
        )
    }

    /// Compare `date_field` against `date` with operator `date_key`
    /// (`gteq`, `lteq`, ...). The filter is named `{date_field}-{date_key}`.
    pub fn add_date_filter<D: FilterDate + ?Sized>(
        &mut self,
        date_field: &str,
        date_key: &str,
        date: &D,
    ) -> &mut Self {
        self.add_date_filter_with_format(date_field, date_key, date, DEFAULT_DATE_FORMAT)
    }

    pub fn add_date_filter_with_format<D: FilterDate + ?Sized>(
        &mut self,
        date_field: &str,
        date_key: &str,
        date: &D,
        format: &str,
    ) -> &mut Self {
        self.add_complex_filter(
            format!("{}-{}", date_field, date_key),
            FilterDefinition::nested(date_field, date_key, format_date(date, format)),
        )
    }

    pub fn add_website_filter<T: ToString>(&mut self, website_ids: &[T]) -> &mut Self {
        self.add_in_filter(WEBSITE_FILTER_NAME, website_ids)
    }

    pub fn add_store_filter<T: ToString>(&mut self, store_ids: &[T]) -> &mut Self {
        self.add_in_filter(STORE_FILTER_NAME, store_ids)
    }

    fn add_in_filter<T: ToString>(&mut self, field: &str, ids: &[T]) -> &mut Self {
        let joined = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.add_complex_filter(field, FilterDefinition::nested(field, "in", joined))
    }

    /// Remove filters.
    ///
    /// - no kind, no name: everything
    /// - kind only: every filter of that kind
    /// - kind and name: that single filter
    ///
    /// A name without a kind removes nothing.
    pub fn reset(&mut self, kind: Option<FilterKind>, name: Option<&str>) -> &mut Self {
        match (kind, name) {
            (None, None) => {
                debug!("Resetting all filters");
                self.simple.clear();
                self.complex.clear();
            }
            (Some(kind), None) => {
                debug!(kind = %kind, "Resetting filters of kind");
                self.map_mut(kind).clear();
            }
            (Some(kind), Some(name)) => {
                if self.map_mut(kind).shift_remove(name).is_some() {
                    debug!(kind = %kind, name = %name, "Removed filter");
                }
            }
            (None, Some(_)) => {}
        }
        self
    }

    /// Same as [`reset`](Self::reset) with a wire kind name. An unknown kind
    /// name removes nothing.
    pub fn reset_by_kind_name(&mut self, kind_name: Option<&str>, name: Option<&str>) -> &mut Self {
        match kind_name {
            None => self.reset(None, name),
            Some(kind_name) => match FilterKind::parse(kind_name) {
                Some(kind) => self.reset(Some(kind), name),
                None => self,
            },
        }
    }

    /// Merge the applied filters of `other` into this bag.
    ///
    /// Entries are re-added under their emitted key, complex filters first,
    /// so same-named filters of this bag are replaced.
    pub fn merge(&mut self, other: &BatchFilterBag) -> &mut Self {
        let applied = other.applied_filters();
        debug!(
            simple = applied.filters.simple.len(),
            complex = applied.filters.complex.len(),
            "Merging filter bag"
        );

        for definition in applied.filters.complex {
            let name = definition.key.clone();
            self.add_complex_filter(name, definition);
        }
        for definition in applied.filters.simple {
            let name = definition.key.clone();
            self.add_filter(name, definition);
        }
        self
    }

    pub fn get(&self, kind: FilterKind, name: &str) -> Option<&FilterDefinition> {
        self.map(kind).get(name)
    }

    pub fn len(&self, kind: FilterKind) -> usize {
        self.map(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.simple.is_empty() && self.complex.is_empty()
    }

    /// Filters in wire shape, simple filters first, with colliding keys
    /// made distinct across both kinds.
    pub fn applied_filters(&self) -> AppliedFilters {
        let mut dedup = KeyDeduplicator::new();
        let mut groups = FilterGroups::default();

        for kind in FilterKind::ALL {
            let fixed: Vec<FilterDefinition> = self
                .map(kind)
                .values()
                .map(|definition| FilterDefinition {
                    key: dedup.claim(&definition.key),
                    value: definition.value.clone(),
                })
                .collect();
            *groups.get_mut(kind) = fixed;
        }

        AppliedFilters { filters: groups }
    }

    pub fn applied_filters_value(&self) -> AppResult<serde_json::Value> {
        Ok(serde_json::to_value(self.applied_filters())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_empty_bag() {
        let bag = BatchFilterBag::new();
        assert!(bag.is_empty());
        assert_eq!(bag.applied_filters_value().unwrap(), json!({"filters": {}}));
    }

    #[test]
    fn test_seeded_bag() {
        let bag = BatchFilterBag::with_filters(
            [("status", "pending")],
            [("created_at", Condition::new("gteq", "2024-01-01"))],
        );

        assert_eq!(
            bag.get(FilterKind::Simple, "status"),
            Some(&FilterDefinition::new("status", "pending"))
        );
        assert_eq!(
            bag.get(FilterKind::Complex, "created_at"),
            Some(&FilterDefinition::nested("created_at", "gteq", "2024-01-01"))
        );
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut bag = BatchFilterBag::new();
        bag.add_filter("a", FilterDefinition::new("a", 1))
            .add_filter("b", FilterDefinition::new("b", 2))
            .add_filter("a", FilterDefinition::new("a", 3));

        let applied = bag.applied_filters();
        assert_eq!(
            applied.filters.simple,
            vec![FilterDefinition::new("a", 3), FilterDefinition::new("b", 2)]
        );
    }

    #[test]
    fn test_unknown_kind_name_downgrades() {
        let mut bag = BatchFilterBag::new();
        bag.add_filter_by_kind_name("x", FilterDefinition::new("x", 1), "weird");
        assert_eq!(bag.len(FilterKind::Simple), 1);
        assert_eq!(bag.len(FilterKind::Complex), 0);
    }

    #[test]
    fn test_last_id_filter() {
        let mut bag = BatchFilterBag::new();
        bag.add_last_id_filter(100);
        assert_eq!(
            bag.get(FilterKind::Complex, "lastid"),
            Some(&FilterDefinition::nested("entity_id", "gt", 100))
        );

        bag.add_last_id_filter_for(5, "customer_id");
        assert_eq!(bag.len(FilterKind::Complex), 1);
        assert_eq!(
            bag.get(FilterKind::Complex, "lastid"),
            Some(&FilterDefinition::nested("customer_id", "gt", 5))
        );
    }

    #[test]
    fn test_date_filter_with_custom_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let mut bag = BatchFilterBag::new();
        bag.add_date_filter_with_format("updated_at", "lteq", &date, "d.m.Y");

        assert_eq!(
            bag.get(FilterKind::Complex, "updated_at-lteq"),
            Some(&FilterDefinition::nested("updated_at", "lteq", "15.03.2024"))
        );
    }

    #[test]
    fn test_store_filter() {
        let mut bag = BatchFilterBag::new();
        bag.add_store_filter(&[4]);
        assert_eq!(
            bag.applied_filters_value().unwrap(),
            json!({"filters": {"complex_filter": [
                {"key": "store_id", "value": {"key": "in", "value": "4"}}
            ]}})
        );
    }

    #[test]
    fn test_reset_name_without_kind_is_noop() {
        let mut bag = BatchFilterBag::new();
        bag.add_filter("a", FilterDefinition::new("a", 1));
        bag.reset(None, Some("a"));
        assert_eq!(bag.len(FilterKind::Simple), 1);
    }

    #[test]
    fn test_reset_by_unknown_kind_name_is_noop() {
        let mut bag = BatchFilterBag::new();
        bag.add_filter("a", FilterDefinition::new("a", 1));
        bag.reset_by_kind_name(Some("bogus"), None);
        assert_eq!(bag.len(FilterKind::Simple), 1);

        bag.reset_by_kind_name(Some("filter"), Some("a"));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_collision_fix_spans_both_kinds() {
        let mut bag = BatchFilterBag::new();
        bag.add_complex_filter("c", FilterDefinition::nested("sku", "like", "A%"))
            .add_filter("s", FilterDefinition::new("sku", "A1"));

        let applied = bag.applied_filters();
        assert_eq!(applied.filters.simple[0].key, "sku");
        assert_eq!(applied.filters.complex[0].key, "Sku");

        // Stored definitions stay untouched
        assert_eq!(bag.get(FilterKind::Complex, "c").unwrap().key, "sku");
    }
}
