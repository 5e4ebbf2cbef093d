mod common;

use magento_filter_bag::{BatchFilterBag, FilterDefinition, FilterKind};

#[test]
fn test_merge_overwrites_on_name_collision() {
    let mut target = common::simple_bag(&[("A", "y"), ("B", "z")]);
    let source = common::simple_bag(&[("A", "x")]);

    target.merge(&source);

    assert_eq!(
        target.applied_filters().filters.simple,
        vec![FilterDefinition::new("A", "x"), FilterDefinition::new("B", "z")]
    );
}

#[test]
fn test_merge_keeps_kinds() {
    let mut source = BatchFilterBag::new();
    source
        .add_website_filter(&[1])
        .add_filter("status", FilterDefinition::new("status", "complete"));

    let mut target = BatchFilterBag::new();
    target.merge(&source);

    assert_eq!(
        target.get(FilterKind::Complex, "website_id"),
        Some(&FilterDefinition::nested("website_id", "in", "1"))
    );
    assert_eq!(
        target.get(FilterKind::Simple, "status"),
        Some(&FilterDefinition::new("status", "complete"))
    );
}

#[test]
fn test_merge_uses_emitted_key_as_name() {
    let mut source = BatchFilterBag::new();
    source.add_last_id_filter(42);

    let mut target = BatchFilterBag::new();
    target.merge(&source);

    // "lastid" is re-added under its key
    assert!(target.get(FilterKind::Complex, "lastid").is_none());
    assert_eq!(
        target.get(FilterKind::Complex, "entity_id"),
        Some(&FilterDefinition::nested("entity_id", "gt", 42))
    );
}

#[test]
fn test_merge_carries_fixed_keys() {
    let mut source = BatchFilterBag::new();
    source
        .add_filter("one", FilterDefinition::new("sku", "A"))
        .add_filter("two", FilterDefinition::new("sku", "B"));

    let mut target = BatchFilterBag::new();
    target.merge(&source);

    assert_eq!(
        target.get(FilterKind::Simple, "Sku"),
        Some(&FilterDefinition::new("Sku", "B"))
    );
    assert_eq!(target.len(FilterKind::Simple), 2);
}

#[test]
fn test_merge_empty_bag_is_noop() {
    let mut target = common::simple_bag(&[("A", "y")]);
    let before = target.clone();
    target.merge(&BatchFilterBag::new());
    assert_eq!(target, before);
}
