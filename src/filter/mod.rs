pub mod bag;
pub mod date_format;
pub mod definition;
pub mod kind;
pub mod unique_key;

pub use bag::{AppliedFilters, BatchFilterBag, FilterGroups, DEFAULT_ID_FIELD_NAME};
pub use date_format::{format_date, FilterDate, DEFAULT_DATE_FORMAT};
pub use definition::{Condition, FilterDefinition, FilterValue, ScalarValue};
pub use kind::FilterKind;
