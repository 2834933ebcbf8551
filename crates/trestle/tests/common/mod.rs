#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use trestle::{Blueprint, Config, ConnectionConfig, Database, DebugInfo, QueryMonitor, SqlValue};

/// Events seen by [`Recorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Connected(String),
    ConnectFailed(String),
    Disconnected(String),
    Completed(String, u64),
    Failed(String),
}

/// Monitor that keeps every event for assertions.
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl QueryMonitor for Recorder {
    fn on_connect(&self, connection: &str, _blueprint: Blueprint, _url: &str) {
        self.push(Event::Connected(String::from(connection)));
    }

    fn on_connect_failed(&self, connection: &str, _error: &str) {
        self.push(Event::ConnectFailed(String::from(connection)));
    }

    fn on_disconnect(&self, connection: &str) {
        self.push(Event::Disconnected(String::from(connection)));
    }

    fn on_query_complete(&self, debug: &DebugInfo, count: u64) {
        self.push(Event::Completed(debug.query.clone(), count));
    }

    fn on_query_failed(&self, debug: &DebugInfo, _error: &str) {
        self.push(Event::Failed(debug.query.clone()));
    }
}

pub fn memory_config() -> Config {
    Config::new()
        .with_connection("test", ConnectionConfig::sqlite(":memory:"))
        .default_connection("test")
}

/// In-memory database with a `users` and an `articles` table.
pub fn seeded() -> Database {
    seeded_with(&memory_config())
}

pub fn seeded_with(config: &Config) -> Database {
    init_tracing();
    let db = Database::connect(config, None).expect("connect to in-memory sqlite");
    for sql in [
        "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, username TEXT NOT NULL UNIQUE, email TEXT, age INTEGER)",
        "CREATE TABLE articles (id INTEGER PRIMARY KEY AUTOINCREMENT, author INTEGER NOT NULL, title TEXT NOT NULL, score REAL)",
        "INSERT INTO users (username, email, age) VALUES ('julian', 'julian@example.com', 33), ('ana', 'ana@example.com', 28), ('bo', NULL, 41)",
        "INSERT INTO articles (author, title, score) VALUES (1, 'Hello', 4.5), (1, 'Again', 3.0), (2, 'Mine', 5.0)",
    ] {
        let result = db
            .query(sql, ())
            .expect("valid statement")
            .exec()
            .expect("seed statement");
        assert!(result.status(), "seed failed: {:?}", result.debug().error);
    }
    db
}

/// Routes log events to the test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn recorder() -> Arc<Recorder> {
    Arc::new(Recorder::default())
}

pub fn text(value: &str) -> SqlValue {
    SqlValue::Text(String::from(value))
}
