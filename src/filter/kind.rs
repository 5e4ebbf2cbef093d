use std::fmt;

/// Group a filter is sent under in the remote API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterKind {
    /// Flat `{key, value}` criterion, sent as `filter[]`
    #[default]
    Simple,
    /// Operator criterion `{key, value: {key, value}}`, sent as `complex_filter[]`
    Complex,
}

impl FilterKind {
    /// Emission order of the groups in the applied filters.
    pub const ALL: [FilterKind; 2] = [FilterKind::Simple, FilterKind::Complex];

    /// Wire name of the group
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Simple => "filter",
            FilterKind::Complex => "complex_filter",
        }
    }

    /// Strict lookup by wire name
    pub fn parse(name: &str) -> Option<FilterKind> {
        match name {
            "filter" => Some(FilterKind::Simple),
            "complex_filter" => Some(FilterKind::Complex),
            _ => None,
        }
    }

    /// Lookup by wire name, anything unknown falls back to `Simple`
    pub fn from_name(name: &str) -> FilterKind {
        FilterKind::parse(name).unwrap_or_default()
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
