use sodme_schemas::StrategySettings;
use sodme_strategy::{InMemoryStrategyStore, StrategyStore};

/// A trading account can have at most one default strategy at a time; the
/// invariant holds across repeated switches and across settings updates
/// that are unrelated to the default flag.
#[test]
fn switching_the_default_strategy_is_exclusive() {
    let mut store = InMemoryStrategyStore::new();
    let alpha = store.create("acct-7", StrategySettings::sane_defaults()).unwrap();
    let beta = store.create("acct-7", StrategySettings::sane_defaults()).unwrap();
    let gamma = store.create("acct-7", StrategySettings::sane_defaults()).unwrap();

    store.set_default(alpha.id).unwrap();
    assert!(store.get(alpha.id).unwrap().is_default);

    store.set_default(gamma.id).unwrap();
    let strategies = store.list_by_account("acct-7");
    let defaults: Vec<_> = strategies.iter().filter(|s| s.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, gamma.id);
    assert!(!store.get(beta.id).unwrap().is_default);
}
