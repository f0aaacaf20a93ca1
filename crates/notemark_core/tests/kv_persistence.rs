use notemark_core::store::kv::KvStore;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn unset_slot_returns_the_caller_default() {
    let kv = KvStore::open_in_memory().unwrap();
    let value: Vec<String> = kv.get_or("notes", Vec::new());
    assert!(value.is_empty());
    assert_eq!(kv.get_or("theme", "light".to_string()), "light");
    assert_eq!(kv.get::<String>("theme"), None);
}

#[test]
fn set_is_observable_immediately() {
    let kv = KvStore::open_in_memory().unwrap();
    kv.set("theme", &"dark");
    assert_eq!(kv.get_or("theme", "light".to_string()), "dark");
}

#[test]
fn updater_form_receives_the_current_value() {
    let kv = KvStore::open_in_memory().unwrap();
    kv.set("counter", &10_u32);
    kv.update("counter", 0_u32, |current| current + 5);
    assert_eq!(kv.get_or("counter", 0_u32), 15);

    // Unset slot: the updater sees the default.
    kv.update("fresh", 100_u32, |current| current + 1);
    assert_eq!(kv.get_or("fresh", 0_u32), 101);
}

#[test]
fn subscribers_observe_every_mutation_key() {
    let kv = KvStore::open_in_memory().unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    kv.subscribe(move |key| sink.borrow_mut().push(key.to_string()));

    kv.set("theme", &"dark");
    kv.update("notes", Vec::<String>::new(), |notes| notes);

    assert_eq!(*seen.borrow(), vec!["theme".to_string(), "notes".to_string()]);
}

#[test]
fn write_receipts_acknowledge_durability() {
    let kv = KvStore::open_in_memory().unwrap();
    let receipt = kv.set("theme", &"dark");
    assert!(receipt.wait());
    assert!(kv.flush());
}

#[test]
fn slots_survive_reopening_the_same_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("notemark.sqlite3");

    {
        let kv = KvStore::open(&db_path).unwrap();
        kv.set("theme", &"dark");
        kv.set("notes", &vec!["payload".to_string()]);
        // Drop joins the writer thread, making everything durable.
    }

    let reopened = KvStore::open(&db_path).unwrap();
    assert_eq!(reopened.get_or("theme", "light".to_string()), "dark");
    assert_eq!(
        reopened.get_or("notes", Vec::<String>::new()),
        vec!["payload".to_string()]
    );
}

#[test]
fn slots_are_independent_of_each_other() {
    let kv = KvStore::open_in_memory().unwrap();
    kv.set("theme", &"dark");
    kv.set("notes", &vec!["a".to_string()]);

    kv.set("theme", &"light");
    assert_eq!(
        kv.get_or("notes", Vec::<String>::new()),
        vec!["a".to_string()]
    );
}

#[test]
fn last_write_wins_within_a_slot() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("notemark.sqlite3");

    {
        let kv = KvStore::open(&db_path).unwrap();
        for round in 0..50_u32 {
            kv.set("counter", &round);
        }
    }

    let reopened = KvStore::open(&db_path).unwrap();
    assert_eq!(reopened.get_or("counter", 0_u32), 49);
}
