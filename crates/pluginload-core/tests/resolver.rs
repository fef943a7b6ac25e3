use std::sync::Arc;

use pluginload_core::{
    DirectoryResolver, Environment, KEY_LAST_DIR, MemoryStore, PREF_SECTION, PathNormalizer,
    PreferenceStore,
};

fn resolver_with(store: Arc<MemoryStore>, home: Option<&str>) -> DirectoryResolver {
    let env = Environment {
        home: home.map(str::to_string),
        install_dir: "/opt/pluginload".to_string(),
    };
    DirectoryResolver::new(store, PathNormalizer::new("/opt/pluginload"), env)
}

#[test]
fn empty_store_falls_back_to_home() {
    let store = Arc::new(MemoryStore::new());
    let resolver = resolver_with(store, Some("/home/u"));

    assert_eq!(resolver.resolve_default_directory(), "/home/u");
}

#[test]
fn empty_store_without_home_falls_back_to_install_dir() {
    let store = Arc::new(MemoryStore::new());
    let resolver = resolver_with(store, None);

    assert_eq!(resolver.resolve_default_directory(), "/opt/pluginload");
}

#[test]
fn stored_last_dir_wins_and_is_normalized() {
    let store = Arc::new(MemoryStore::new());
    store
        .write(PREF_SECTION, KEY_LAST_DIR, "C:\\old\\path")
        .expect("write should succeed");
    let resolver = resolver_with(store, Some("/home/u"));

    assert_eq!(resolver.resolve_default_directory(), "C:/old/path");
}

#[test]
fn record_then_resolve_returns_the_normalized_directory() {
    let store = Arc::new(MemoryStore::new());
    let resolver = resolver_with(store.clone(), Some("/home/u"));

    resolver
        .record_directory("C:\\new\\dir")
        .expect("record should succeed");

    assert_eq!(resolver.resolve_default_directory(), "C:/new/dir");
    // The persisted value itself is already normalized.
    assert_eq!(store.read(PREF_SECTION, KEY_LAST_DIR, ""), "C:/new/dir");
}

#[test]
fn resolve_does_not_write_to_the_store() {
    let store = Arc::new(MemoryStore::new());
    let resolver = resolver_with(store.clone(), Some("/home/u"));

    let _ = resolver.resolve_default_directory();

    assert_eq!(store.read(PREF_SECTION, KEY_LAST_DIR, "absent"), "absent");
}

#[test]
fn record_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let resolver = resolver_with(store.clone(), None);

    resolver
        .record_directory("/projects/scripts")
        .expect("record should succeed");
    resolver
        .record_directory("/projects/scripts")
        .expect("record should succeed");

    assert_eq!(
        store.read(PREF_SECTION, KEY_LAST_DIR, ""),
        "/projects/scripts"
    );
}
