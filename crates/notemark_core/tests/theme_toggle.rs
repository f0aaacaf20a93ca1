use notemark_core::store::kv::KvStore;
use notemark_core::theme::{Theme, ThemeSwitch, THEME_SLOT};
use notemark_core::Workspace;
use std::rc::Rc;

#[test]
fn default_theme_is_light() {
    let kv = Rc::new(KvStore::open_in_memory().unwrap());
    let theme = ThemeSwitch::new(kv);
    assert_eq!(theme.current(), Theme::Light);
}

#[test]
fn toggling_twice_returns_to_the_original_value() {
    let mut shell = Workspace::new(Rc::new(KvStore::open_in_memory().unwrap()));
    let original = shell.theme();

    let flipped = shell.toggle_theme();
    assert_ne!(flipped, original);
    let restored = shell.toggle_theme();
    assert_eq!(restored, original);
}

#[test]
fn theme_survives_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("notemark.sqlite3");

    {
        let kv = Rc::new(KvStore::open(&db_path).unwrap());
        let theme = ThemeSwitch::new(kv);
        assert_eq!(theme.toggle(), Theme::Dark);
    }

    let kv = Rc::new(KvStore::open(&db_path).unwrap());
    let theme = ThemeSwitch::new(kv);
    assert_eq!(theme.current(), Theme::Dark);
}

#[test]
fn unknown_persisted_value_falls_back_to_light() {
    let kv = Rc::new(KvStore::open_in_memory().unwrap());
    kv.set(THEME_SLOT, &"sepia");
    let theme = ThemeSwitch::new(kv);
    assert_eq!(theme.current(), Theme::Light);
}
