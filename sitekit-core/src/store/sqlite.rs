//! SQLite-backed [`DocumentStore`].
//!
//! Every collection shares one `documents` table keyed by
//! `(collection, id)`; bodies are stored as JSON text and equality filters
//! are evaluated with `json_extract`, so adding a field never needs a schema
//! change. Statements run on Tokio's blocking pool behind a single
//! connection mutex.

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use log::debug;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter, types::Value as SqlValue};
use serde_json::{Number, Value};

use super::{DocumentStore, StoreError};
use crate::{Collection, Document, FieldFilter, Fields};

const CREATE_DOCUMENTS: &str = "CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    data TEXT NOT NULL CHECK (json_valid(data)),
    PRIMARY KEY (collection, id)
) WITHOUT ROWID";

const SELECT_DOCUMENT: &str = "SELECT data FROM documents WHERE collection = ?1 AND id = ?2";

const UPSERT_DOCUMENT: &str = "INSERT INTO documents (collection, id, data) VALUES (?1, ?2, ?3)
    ON CONFLICT (collection, id) DO UPDATE SET data = excluded.data";

const UPDATE_DOCUMENT: &str = "UPDATE documents SET data = ?3 WHERE collection = ?1 AND id = ?2";

/// Document store persisted in a SQLite database.
///
/// # Examples
///
/// ```
/// use sitekit_core::SqliteDocumentStore;
///
/// let store = SqliteDocumentStore::open_in_memory()?;
/// assert!(store.location().is_none());
/// # Ok::<(), sitekit_core::StoreError>(())
/// ```
pub struct SqliteDocumentStore {
    connection: Arc<Mutex<Connection>>,
    location: Option<Utf8PathBuf>,
}

impl fmt::Debug for SqliteDocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDocumentStore")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl SqliteDocumentStore {
    /// Open (or create) the database at `path`.
    ///
    /// Parent directories are created when missing and the `documents`
    /// table is initialised if absent.
    pub fn open(path: &Utf8Path) -> Result<Self, StoreError> {
        ensure_parent_dir(path)?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| StoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_connection(connection, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: Utf8PathBuf::from(":memory:"),
            source,
        })?;
        Self::from_connection(connection, None)
    }

    /// Database file backing the store, or `None` for in-memory stores.
    #[must_use]
    pub fn location(&self) -> Option<&Utf8Path> {
        self.location.as_deref()
    }

    fn from_connection(
        connection: Connection,
        location: Option<Utf8PathBuf>,
    ) -> Result<Self, StoreError> {
        connection
            .execute(CREATE_DOCUMENTS, [])
            .map_err(query_error("create documents table"))?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            location,
        })
    }

    async fn run<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let mut guard = connection.lock().map_err(|_| StoreError::Poisoned)?;
            operation(&mut guard)
        })
        .await
        .map_err(StoreError::Blocking)?
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        let key = id.to_owned();
        self.run(move |connection| {
            let text: Option<String> = connection
                .query_row(SELECT_DOCUMENT, params![collection.name(), key], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(query_error("read document"))?;
            text.map(|body| {
                let fields = decode_body(collection, &key, &body)?;
                Ok(Document::new(key.clone(), fields))
            })
            .transpose()
        })
        .await
    }

    async fn set(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        debug!("set {collection}/{id}");
        let body = encode_body(collection, id, &fields)?;
        let key = id.to_owned();
        self.run(move |connection| {
            connection
                .execute(UPSERT_DOCUMENT, params![collection.name(), key, body])
                .map(|_| ())
                .map_err(query_error("write document"))
        })
        .await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        debug!("update {collection}/{id}");
        let key = id.to_owned();
        self.run(move |connection| {
            let transaction = connection
                .transaction()
                .map_err(query_error("begin update transaction"))?;
            let current: Option<String> = transaction
                .query_row(SELECT_DOCUMENT, params![collection.name(), key], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(query_error("read document for update"))?;
            let Some(text) = current else {
                return Err(StoreError::NotFound { collection, id: key });
            };

            let mut merged = decode_body(collection, &key, &text)?;
            merged.extend(fields);
            let body = encode_body(collection, &key, &merged)?;
            transaction
                .execute(UPDATE_DOCUMENT, params![collection.name(), key, body])
                .map_err(query_error("write merged document"))?;
            transaction
                .commit()
                .map_err(query_error("commit update transaction"))
        })
        .await
    }

    async fn query(
        &self,
        collection: Collection,
        filter: Option<&FieldFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        let mut sql = String::from("SELECT id, data FROM documents WHERE collection = ?1");
        let mut bindings = vec![SqlValue::Text(collection.name().to_owned())];
        if let Some(active) = filter {
            let (clause, extra) = filter_clause(active)?;
            sql.push_str(" AND ");
            sql.push_str(clause);
            bindings.extend(extra);
        }
        sql.push_str(" ORDER BY id");
        if let Some(cap) = limit {
            let bounded = i64::try_from(cap).unwrap_or(i64::MAX);
            sql.push_str(&format!(" LIMIT {bounded}"));
        }

        self.run(move |connection| {
            let mut statement = connection
                .prepare(&sql)
                .map_err(query_error("prepare document query"))?;
            let mut rows = statement
                .query(params_from_iter(bindings.iter()))
                .map_err(query_error("query documents"))?;
            let mut documents = Vec::new();
            while let Some(row) = rows.next().map_err(query_error("step document rows"))? {
                let id: String = row.get(0).map_err(query_error("read document id"))?;
                let text: String = row.get(1).map_err(query_error("read document body"))?;
                let fields = decode_body(collection, &id, &text)?;
                documents.push(Document::new(id, fields));
            }
            Ok(documents)
        })
        .await
    }
}

/// SQL predicate and its `?2`/`?3` bindings for an equality filter.
///
/// Type checks mirror JSON equality: `"1"` never matches `1`, and `true`
/// never matches `1`.
fn filter_clause(filter: &FieldFilter) -> Result<(&'static str, Vec<SqlValue>), StoreError> {
    filter.validate()?;
    let path = SqlValue::Text(format!("$.{}", filter.field));
    match &filter.value {
        Value::Null => Ok((
            "(json_type(data, ?2) IS NULL OR json_type(data, ?2) = 'null')",
            vec![path],
        )),
        Value::Bool(flag) => Ok((
            "json_type(data, ?2) = ?3",
            vec![path, SqlValue::Text(flag.to_string())],
        )),
        Value::Number(number) => Ok((
            "json_type(data, ?2) IN ('integer', 'real') AND json_extract(data, ?2) = ?3",
            vec![path, number_value(number)],
        )),
        Value::String(text) => Ok((
            "json_type(data, ?2) = 'text' AND json_extract(data, ?2) = ?3",
            vec![path, SqlValue::Text(text.clone())],
        )),
        Value::Array(_) | Value::Object(_) => Err(StoreError::UnsupportedFilter {
            field: filter.field.clone(),
        }),
    }
}

fn number_value(number: &Number) -> SqlValue {
    number.as_i64().map_or_else(
        || SqlValue::Real(number.as_f64().unwrap_or(f64::NAN)),
        SqlValue::Integer,
    )
}

fn decode_body(collection: Collection, id: &str, text: &str) -> Result<Fields, StoreError> {
    serde_json::from_str(text).map_err(|source| StoreError::Decode {
        collection,
        id: id.to_owned(),
        source,
    })
}

fn encode_body(collection: Collection, id: &str, fields: &Fields) -> Result<String, StoreError> {
    serde_json::to_string(fields).map_err(|source| StoreError::Encode {
        collection,
        id: id.to_owned(),
        source,
    })
}

fn query_error(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> StoreError {
    move |source| StoreError::Query { operation, source }
}

fn ensure_parent_dir(path: &Utf8Path) -> Result<(), StoreError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base, relative) = if parent.is_absolute() {
        ("/", parent.strip_prefix("/").unwrap_or(parent))
    } else {
        (".", parent)
    };
    let create = |source| StoreError::CreateDirectory {
        path: parent.to_path_buf(),
        source,
    };
    fs_utf8::Dir::open_ambient_dir(base, ambient_authority())
        .map_err(create)?
        .create_dir_all(relative)
        .map_err(create)
}
