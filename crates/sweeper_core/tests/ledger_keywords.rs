use pretty_assertions::assert_eq;
use sweeper_core::{KeywordStore, Ledger};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn merge_dedupes_and_keeps_first_seen_order() {
    let ledger = Ledger::from_items(strings(&["b", "a"]));
    let (ledger, added) = ledger.merged(strings(&["c", "a", "c", "d"]));

    assert_eq!(added, 2);
    assert_eq!(ledger.items(), strings(&["b", "a", "c", "d"]).as_slice());
}

#[test]
fn merge_is_idempotent() {
    let mut ledger = Ledger::new();
    assert_eq!(ledger.merge(strings(&["x", "y"])), 2);
    let snapshot = ledger.clone();

    assert_eq!(ledger.merge(strings(&["x", "y"])), 0);
    assert_eq!(ledger, snapshot);
}

#[test]
fn merge_with_nothing_is_a_noop() {
    let mut ledger = Ledger::from_items(strings(&["x"]));
    assert_eq!(ledger.merge(Vec::<String>::new()), 0);
    assert_eq!(ledger.len(), 1);
    assert!(ledger.contains("x"));
}

#[test]
fn keyword_store_add_remove_merge() {
    let mut store = KeywordStore::new();
    assert!(store.add(" deals@shop.example "));
    assert!(!store.add("deals@shop.example"));
    assert!(!store.add("   "));

    let added = store.merge(strings(&[
        "digest@list.example",
        "deals@shop.example",
        "promo@bulk.example",
    ]));
    assert_eq!(added, 2);
    assert_eq!(
        store.emails(),
        strings(&[
            "deals@shop.example",
            "digest@list.example",
            "promo@bulk.example"
        ])
        .as_slice()
    );

    assert!(store.remove("digest@list.example"));
    assert!(!store.remove("digest@list.example"));
    assert_eq!(store.emails().len(), 2);
}

#[test]
fn protected_list_is_independent_of_targets() {
    let mut store = KeywordStore::from_lists(
        strings(&["deals@shop.example", "deals@shop.example"]),
        strings(&["boss@work.example", ""]),
    );
    assert_eq!(store.emails().len(), 1);
    assert_eq!(store.protected_emails(), strings(&["boss@work.example"]).as_slice());
    assert!(store.is_protected("boss@work.example"));

    assert!(store.unprotect("boss@work.example"));
    assert!(!store.is_protected("boss@work.example"));
    assert!(store.protect("hr@work.example"));
    assert!(!store.protect("hr@work.example"));
}
