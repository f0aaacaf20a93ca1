//! Named-slot key-value store with optimistic writes.
//!
//! # Responsibility
//! - Keep the authoritative in-memory copy of every persisted slot.
//! - Mirror each mutation to SQLite on a background writer thread.
//! - Notify subscribers synchronously after each observed mutation.
//!
//! # Invariants
//! - A mutation is observable through `get` before it is durable.
//! - Writes to a slot reach SQLite in the order they were issued.
//! - Undecodable persisted payloads are treated as unset, never as errors.
//! - Subscriber callbacks must not register further subscribers; they may
//!   read and write slots.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::note::now_ms;
use log::{error, info, warn};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::JoinHandle;

pub type StoreResult<T> = Result<T, StoreError>;

/// Slot store construction error.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    WriterSpawn(std::io::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::WriterSpawn(err) => write!(f, "failed to spawn slot writer thread: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::WriterSpawn(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Durability acknowledgment for a single enqueued write.
///
/// Dropping the receipt makes the write fire-and-forget; `wait` blocks
/// until the row has been handed to SQLite.
#[derive(Debug)]
pub struct WriteReceipt {
    done: Receiver<()>,
}

impl WriteReceipt {
    /// Blocks until the write attempt has completed.
    ///
    /// Returns `false` when the writer thread is gone (store dropped or
    /// writer panicked); the in-memory state is still authoritative.
    pub fn wait(self) -> bool {
        self.done.recv().is_ok()
    }

    fn resolved() -> Self {
        let (ack, done) = channel();
        drop(ack);
        Self { done }
    }
}

enum WriterCommand {
    Persist {
        key: String,
        payload: String,
        ack: Sender<()>,
    },
    Flush {
        ack: Sender<()>,
    },
}

/// Persistent named-slot store.
///
/// Single-threaded by design: the store is not `Send`, and all reads and
/// mutations happen on the owning thread. Only durability is offloaded.
pub struct KvStore {
    cache: RefCell<HashMap<String, serde_json::Value>>,
    subscribers: RefCell<Vec<Box<dyn Fn(&str)>>>,
    writer: Option<Sender<WriterCommand>>,
    worker: Option<JoinHandle<()>>,
}

impl KvStore {
    /// Opens the store over a SQLite database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens the store over an in-memory database. State does not survive
    /// the store; intended for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        let cache = load_slots(&conn)?;
        info!(
            "event=kv_open module=store status=ok slots={}",
            cache.len()
        );

        let (writer, commands) = channel();
        let worker = std::thread::Builder::new()
            .name("notemark-slot-writer".to_string())
            .spawn(move || writer_loop(conn, commands))
            .map_err(StoreError::WriterSpawn)?;

        Ok(Self {
            cache: RefCell::new(cache),
            subscribers: RefCell::new(Vec::new()),
            writer: Some(writer),
            worker: Some(worker),
        })
    }

    /// Returns the deserialized slot value, or `None` when the slot is
    /// unset or its payload does not decode as `T` (logged, treated as
    /// unset).
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.cache.borrow().get(key).cloned()?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!("event=kv_get module=store status=undecodable key={key} error={err}");
                None
            }
        }
    }

    /// Returns the slot value, or `default` when unset.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Replaces the slot value.
    ///
    /// The new value is observable immediately; subscribers run before this
    /// method returns; durability happens in the background.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> WriteReceipt {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(err) => {
                error!(
                    "event=kv_set module=store status=unserializable key={key} error={err}"
                );
                return WriteReceipt::resolved();
            }
        };

        let payload = json.to_string();
        self.cache.borrow_mut().insert(key.to_string(), json);
        self.notify(key);
        self.enqueue(key, payload)
    }

    /// Applies `apply` to the current slot value (or `default` when unset)
    /// and stores the result.
    pub fn update<T>(&self, key: &str, default: T, apply: impl FnOnce(T) -> T) -> WriteReceipt
    where
        T: Serialize + DeserializeOwned,
    {
        let current = self.get_or(key, default);
        let next = apply(current);
        self.set(key, &next)
    }

    /// Registers a callback invoked with the slot key after every mutation.
    pub fn subscribe(&self, callback: impl Fn(&str) + 'static) {
        self.subscribers.borrow_mut().push(Box::new(callback));
    }

    /// Blocks until every write enqueued so far has reached SQLite.
    ///
    /// Returns `false` when the writer thread is gone.
    pub fn flush(&self) -> bool {
        let Some(writer) = self.writer.as_ref() else {
            return false;
        };
        let (ack, done) = channel();
        if writer.send(WriterCommand::Flush { ack }).is_err() {
            return false;
        }
        done.recv().is_ok()
    }

    fn enqueue(&self, key: &str, payload: String) -> WriteReceipt {
        let (ack, done) = channel();
        let command = WriterCommand::Persist {
            key: key.to_string(),
            payload,
            ack,
        };
        let sent = self
            .writer
            .as_ref()
            .is_some_and(|writer| writer.send(command).is_ok());
        if !sent {
            error!("event=kv_set module=store status=writer_gone key={key}");
            return WriteReceipt::resolved();
        }
        WriteReceipt { done }
    }

    fn notify(&self, key: &str) {
        for subscriber in self.subscribers.borrow().iter() {
            subscriber(key);
        }
    }
}

impl Drop for KvStore {
    fn drop(&mut self) {
        // Closing the channel lets the writer drain pending commands and
        // exit; joining guarantees durability of everything enqueued.
        drop(self.writer.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("event=kv_close module=store status=writer_panicked");
            }
        }
    }
}

fn load_slots(conn: &Connection) -> StoreResult<HashMap<String, serde_json::Value>> {
    let mut stmt = conn
        .prepare("SELECT key, value FROM slots;")
        .map_err(DbError::from)?;
    let mut rows = stmt.query([]).map_err(DbError::from)?;

    let mut cache = HashMap::new();
    while let Some(row) = rows.next().map_err(DbError::from)? {
        let key: String = row.get(0).map_err(DbError::from)?;
        let raw: String = row.get(1).map_err(DbError::from)?;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                cache.insert(key, value);
            }
            Err(err) => {
                warn!("event=kv_load module=store status=undecodable key={key} error={err}");
            }
        }
    }

    Ok(cache)
}

fn writer_loop(conn: Connection, commands: Receiver<WriterCommand>) {
    while let Ok(command) = commands.recv() {
        match command {
            WriterCommand::Persist { key, payload, ack } => {
                let result = conn.execute(
                    "INSERT INTO slots (key, value, written_at)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        written_at = excluded.written_at;",
                    params![key, payload, now_ms()],
                );
                if let Err(err) = result {
                    error!(
                        "event=kv_persist module=store status=error key={key} error={err}"
                    );
                }
                let _ = ack.send(());
            }
            WriterCommand::Flush { ack } => {
                let _ = ack.send(());
            }
        }
    }
}
