//! Flattening of applied filters into bracketed query parameters for REST
//! transports, e.g. `filters[complex_filter][0][value][key]=gt`.

use crate::filter::{AppliedFilters, FilterKind, FilterValue};

const ROOT_PARAMETER: &str = "filters";

/// Query parameter pairs in emission order
pub fn to_query_pairs(applied: &AppliedFilters) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for kind in FilterKind::ALL {
        for (index, definition) in applied.filters.get(kind).iter().enumerate() {
            let prefix = format!("{}[{}][{}]", ROOT_PARAMETER, kind.as_str(), index);
            pairs.push((format!("{}[key]", prefix), definition.key.clone()));

            match &definition.value {
                FilterValue::Scalar(value) => {
                    pairs.push((format!("{}[value]", prefix), value.to_query_value()));
                }
                FilterValue::Nested(condition) => {
                    pairs.push((format!("{}[value][key]", prefix), condition.key.clone()));
                    pairs.push((
                        format!("{}[value][value]", prefix),
                        condition.value.to_query_value(),
                    ));
                }
            }
        }
    }

    pairs
}

/// Url-encoded query string (`application/x-www-form-urlencoded`)
pub fn to_query_string(applied: &AppliedFilters) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(to_query_pairs(applied))
        .finish()
}
