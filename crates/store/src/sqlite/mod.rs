// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

mod config;

use std::{
	path::{Path, PathBuf},
	sync::Arc,
};

pub use config::*;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use tidemark_core::IndexDef;
use tidemark_type::{Error, Result, diagnostic::store, error};
use tracing::{debug, instrument};

use crate::{collection::Collection, working::WorkingSet};

/// Single-file backend. Each collection is one row in `collections` holding its
/// index definitions, plus one row per document in `documents`.
#[derive(Clone)]
pub struct SqliteBackend(Arc<Mutex<Connection>>);

impl SqliteBackend {
	#[instrument(name = "store::sqlite::open", level = "debug", skip(config), fields(path = ?config.path))]
	pub fn new(config: SqliteConfig) -> Result<Self> {
		let flags = config.flags.to_rusqlite();
		let conn = match &config.path {
			DbPath::Memory => Connection::open_in_memory_with_flags(flags),
			DbPath::File(path) if config.flags.create => Connection::open_with_flags(Self::resolve_db_path(path)?, flags),
			DbPath::File(path) => Connection::open_with_flags(config::db_file(path), flags),
		}
		.map_err(backend_error)?;

		conn.busy_timeout(config.busy_timeout).map_err(backend_error)?;
		if config.is_read_only() {
			debug!("sqlite store opened read-only");
			return Ok(Self(Arc::new(Mutex::new(conn))));
		}

		conn.pragma_update(None, "journal_mode", config.journal_mode.as_str()).map_err(backend_error)?;
		conn.pragma_update(None, "synchronous", config.synchronous_mode.as_str()).map_err(backend_error)?;

		conn.execute_batch(
			"BEGIN;
			 CREATE TABLE IF NOT EXISTS collections (
			     name    TEXT NOT NULL,
			     indexes TEXT NOT NULL,
			     PRIMARY KEY (name)
			 );

			 CREATE TABLE IF NOT EXISTS documents (
			     collection TEXT NOT NULL,
			     position   INTEGER NOT NULL,
			     body       TEXT NOT NULL,
			     PRIMARY KEY (collection, position)
			 );
			 COMMIT;",
		)
		.map_err(backend_error)?;

		debug!("sqlite store ready");
		Ok(Self(Arc::new(Mutex::new(conn))))
	}

	#[instrument(name = "store::sqlite::read", level = "trace", skip(self))]
	pub fn read(&self, name: &str) -> Result<Option<Collection>> {
		load(&self.0.lock(), name)
	}

	pub fn collection_names(&self) -> Result<Vec<String>> {
		let conn = self.0.lock();
		let mut stmt = conn.prepare_cached("SELECT name FROM collections ORDER BY name").map_err(backend_error)?;
		let rows = stmt.query_map([], |row| row.get::<_, String>(0)).map_err(backend_error)?;
		rows.collect::<rusqlite::Result<Vec<_>>>().map_err(backend_error)
	}

	/// Runs `f` inside an immediate transaction; touched collections are
	/// rewritten and committed only when it succeeds.
	#[instrument(name = "store::sqlite::write", level = "trace", skip_all)]
	pub fn write<T>(&self, f: impl FnOnce(&mut WorkingSet<'_>) -> Result<T>) -> Result<T> {
		let mut conn = self.0.lock();
		let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate).map_err(backend_error)?;

		let (result, changes) = {
			let loader = |name: &str| load(&tx, name);
			let mut working = WorkingSet::new(&loader);
			let result = f(&mut working)?;
			(result, working.into_changes())
		};

		for (name, collection) in &changes {
			persist(&tx, name, collection.as_ref())?;
		}

		tx.commit().map_err(backend_error)?;
		Ok(result)
	}

	fn resolve_db_path(path: &Path) -> Result<PathBuf> {
		let file = config::db_file(path);
		if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
			std::fs::create_dir_all(parent).map_err(|e| error!(store::backend(e.to_string())))?;
		}
		Ok(file)
	}
}

fn load(conn: &Connection, name: &str) -> Result<Option<Collection>> {
	let indexes: Option<String> = conn
		.query_row("SELECT indexes FROM collections WHERE name = ?1", params![name], |row| row.get(0))
		.optional()
		.map_err(backend_error)?;

	let Some(indexes) = indexes else {
		return Ok(None);
	};
	let indexes: Vec<IndexDef> = serde_json::from_str(&indexes).map_err(codec_error)?;

	let mut stmt = conn
		.prepare_cached("SELECT body FROM documents WHERE collection = ?1 ORDER BY position")
		.map_err(backend_error)?;
	let rows = stmt.query_map(params![name], |row| row.get::<_, String>(0)).map_err(backend_error)?;

	let mut documents = Vec::new();
	for body in rows {
		let body = body.map_err(backend_error)?;
		documents.push(serde_json::from_str(&body).map_err(codec_error)?);
	}

	Ok(Some(Collection {
		documents,
		indexes,
	}))
}

fn persist(conn: &Connection, name: &str, collection: Option<&Collection>) -> Result<()> {
	conn.execute("DELETE FROM documents WHERE collection = ?1", params![name]).map_err(backend_error)?;

	let Some(collection) = collection else {
		conn.execute("DELETE FROM collections WHERE name = ?1", params![name]).map_err(backend_error)?;
		return Ok(());
	};

	let indexes = serde_json::to_string(&collection.indexes).map_err(codec_error)?;
	conn.execute(
		"INSERT INTO collections (name, indexes) VALUES (?1, ?2)
		 ON CONFLICT(name) DO UPDATE SET indexes = excluded.indexes",
		params![name, indexes],
	)
	.map_err(backend_error)?;

	let mut stmt = conn
		.prepare_cached("INSERT INTO documents (collection, position, body) VALUES (?1, ?2, ?3)")
		.map_err(backend_error)?;
	for (position, document) in collection.documents.iter().enumerate() {
		let body = serde_json::to_string(document).map_err(codec_error)?;
		stmt.execute(params![name, position as i64, body]).map_err(backend_error)?;
	}

	Ok(())
}

fn backend_error(err: rusqlite::Error) -> Error {
	error!(store::backend(err.to_string()))
}

fn codec_error(err: serde_json::Error) -> Error {
	error!(store::codec(err.to_string()))
}

#[cfg(test)]
pub mod tests {
	use serde_json::json;
	use tidemark_core::{Document, Filter};
	use tidemark_testing::tempdir::temp_dir;

	use super::*;

	fn doc(value: serde_json::Value) -> Document {
		value.as_object().cloned().unwrap()
	}

	#[test]
	fn test_resolve_db_path_with_directory() {
		temp_dir(|temp_path| {
			let dir_path = temp_path.join("mydb");
			let result = SqliteBackend::resolve_db_path(&dir_path).unwrap();

			assert_eq!(result, dir_path.join("tidemark.db"));
			assert!(dir_path.is_dir());
			Ok(())
		})
		.expect("test failed");
	}

	#[test]
	fn test_resolve_db_path_with_file() {
		temp_dir(|temp_path| {
			let file_path = temp_path.join("nested").join("custom.db");
			let result = SqliteBackend::resolve_db_path(&file_path).unwrap();

			assert_eq!(result, file_path);
			assert!(temp_path.join("nested").is_dir());
			Ok(())
		})
		.expect("test failed");
	}

	#[test]
	fn test_write_and_read_back() {
		let backend = SqliteBackend::new(SqliteConfig::in_memory()).unwrap();
		backend
			.write(|w| {
				w.insert("user", vec![doc(json!({"_id": 1, "name": "ann"})), doc(json!({"_id": 2, "name": "bob"}))])?;
				w.create_index("user", IndexDef::new("by_name", ["name"]).unique())
			})
			.unwrap();

		let user = backend.read("user").unwrap().unwrap();
		assert_eq!(user.documents().len(), 2);
		assert_eq!(user.documents()[0].get("name"), Some(&json!("ann")));
		assert_eq!(user.indexes().len(), 2);
		assert_eq!(user.count(&Filter::eq("name", "bob")), 1);
	}

	#[test]
	fn test_failed_write_rolls_back() {
		let backend = SqliteBackend::new(SqliteConfig::in_memory()).unwrap();
		backend.write(|w| w.insert("user", vec![doc(json!({"_id": 1}))])).unwrap();

		let err = backend
			.write(|w| {
				w.insert("car", vec![doc(json!({"make": "ford"}))])?;
				w.insert("user", vec![doc(json!({"_id": 1}))])
			})
			.unwrap_err();

		assert_eq!(err.code, "STORE_002");
		assert!(backend.read("car").unwrap().is_none());
		assert_eq!(backend.read("user").unwrap().unwrap().documents().len(), 1);
	}

	#[test]
	fn test_drop_collection_removes_rows() {
		let backend = SqliteBackend::new(SqliteConfig::in_memory()).unwrap();
		backend.write(|w| w.insert("car", vec![doc(json!({"make": "ford"}))])).unwrap();
		backend.write(|w| w.drop_collection("car")).unwrap();

		assert!(backend.read("car").unwrap().is_none());
		assert!(backend.collection_names().unwrap().is_empty());
	}

	#[test]
	fn test_read_only_missing_file_is_not_created() {
		temp_dir(|temp_path| {
			let path = temp_path.join("missing").join("store.db");
			let err = SqliteBackend::new(SqliteConfig::read_only(&path)).err().unwrap();

			assert_eq!(err.code, "STORE_001");
			assert!(!path.exists());
			assert!(!temp_path.join("missing").exists());
			Ok(())
		})
		.expect("test failed");
	}

	#[test]
	fn test_read_only_reads_and_rejects_writes() {
		temp_dir(|temp_path| {
			let path = temp_path.join("store.db");
			{
				let backend = SqliteBackend::new(SqliteConfig::safe(&path)).unwrap();
				backend.write(|w| w.insert("car", vec![doc(json!({"make": "ford"}))])).unwrap();
			}

			let backend = SqliteBackend::new(SqliteConfig::read_only(&path)).unwrap();
			assert_eq!(backend.read("car").unwrap().unwrap().documents().len(), 1);

			let err = backend.write(|w| w.insert("car", vec![doc(json!({"make": "fiat"}))])).unwrap_err();
			assert_eq!(err.code, "STORE_001");
			assert_eq!(backend.read("car").unwrap().unwrap().documents().len(), 1);
			Ok(())
		})
		.expect("test failed");
	}

	#[test]
	fn test_reopen_file_keeps_data() {
		temp_dir(|temp_path| {
			let path = temp_path.join("store.db");
			{
				let backend = SqliteBackend::new(SqliteConfig::fast(&path)).unwrap();
				backend.write(|w| w.insert("car", vec![doc(json!({"make": "ford"}))])).unwrap();
			}

			let backend = SqliteBackend::new(SqliteConfig::fast(&path)).unwrap();
			assert_eq!(backend.read("car").unwrap().unwrap().documents().len(), 1);
			Ok(())
		})
		.expect("test failed");
	}
}
