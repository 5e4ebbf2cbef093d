#![allow(dead_code)]

use magento_filter_bag::{BatchFilterBag, FilterDefinition, FilterKind};

/// Bag with one simple filter per `(name, value)`, each keyed by its name
pub fn simple_bag(entries: &[(&str, &str)]) -> BatchFilterBag {
    let mut bag = BatchFilterBag::new();
    for (name, value) in entries {
        bag.add_filter(*name, FilterDefinition::new(*name, *value));
    }
    bag
}

/// Keys in emission order for one kind
pub fn emitted_keys(bag: &BatchFilterBag, kind: FilterKind) -> Vec<String> {
    bag.applied_filters()
        .filters
        .get(kind)
        .iter()
        .map(|definition| definition.key.clone())
        .collect()
}
