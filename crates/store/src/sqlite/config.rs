// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use std::{
	path::{Path, PathBuf},
	time::Duration,
};

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbPath {
	File(PathBuf),
	Memory,
}

/// Configuration for the SQLite backend
#[derive(Debug, Clone)]
pub struct SqliteConfig {
	pub path: DbPath,
	pub flags: OpenFlags,
	pub journal_mode: JournalMode,
	pub synchronous_mode: SynchronousMode,
	pub busy_timeout: Duration,
}

impl SqliteConfig {
	/// Durable defaults for a database file. A path without extension is treated
	/// as a directory holding `tidemark.db`.
	pub fn new<P: AsRef<Path>>(path: P) -> Self {
		Self {
			path: DbPath::File(path.as_ref().to_path_buf()),
			flags: OpenFlags::default(),
			journal_mode: JournalMode::Wal,
			synchronous_mode: SynchronousMode::Normal,
			busy_timeout: Duration::from_secs(5),
		}
	}

	/// Full fsync on every commit and a rollback journal.
	pub fn safe<P: AsRef<Path>>(path: P) -> Self {
		Self {
			journal_mode: JournalMode::Delete,
			synchronous_mode: SynchronousMode::Full,
			..Self::new(path)
		}
	}

	/// Skips fsync entirely. For tests and throwaway databases.
	pub fn fast<P: AsRef<Path>>(path: P) -> Self {
		Self {
			synchronous_mode: SynchronousMode::Off,
			..Self::new(path)
		}
	}

	/// Opens an existing database file. Nothing is created and writes are rejected.
	pub fn read_only<P: AsRef<Path>>(path: P) -> Self {
		Self {
			flags: OpenFlags::read_only(),
			..Self::new(path)
		}
	}

	/// A private database that disappears with the connection.
	pub fn in_memory() -> Self {
		Self {
			path: DbPath::Memory,
			flags: OpenFlags::default(),
			journal_mode: JournalMode::Memory,
			synchronous_mode: SynchronousMode::Off,
			busy_timeout: Duration::from_secs(5),
		}
	}

	pub fn journal_mode(mut self, mode: JournalMode) -> Self {
		self.journal_mode = mode;
		self
	}

	pub fn synchronous_mode(mut self, mode: SynchronousMode) -> Self {
		self.synchronous_mode = mode;
		self
	}

	pub fn busy_timeout(mut self, timeout: Duration) -> Self {
		self.busy_timeout = timeout;
		self
	}

	pub fn flags(mut self, flags: OpenFlags) -> Self {
		self.flags = flags;
		self
	}

	pub fn is_read_only(&self) -> bool {
		!self.flags.read_write
	}

	/// The database file this configuration opens; `None` for in-memory databases.
	pub fn db_file(&self) -> Option<PathBuf> {
		match &self.path {
			DbPath::File(path) => Some(db_file(path)),
			DbPath::Memory => None,
		}
	}
}

pub(crate) fn db_file(path: &Path) -> PathBuf {
	if path.extension().is_none() {
		path.join("tidemark.db")
	} else {
		path.to_path_buf()
	}
}

/// SQLite open flags
#[derive(Debug, Clone)]
pub struct OpenFlags {
	pub read_write: bool,
	pub create: bool,
	pub full_mutex: bool,
	pub no_mutex: bool,
	pub uri: bool,
}

impl Default for OpenFlags {
	fn default() -> Self {
		Self {
			read_write: true,
			create: true,
			full_mutex: false,
			no_mutex: true,
			uri: false,
		}
	}
}

impl OpenFlags {
	pub fn read_only() -> Self {
		Self {
			read_write: false,
			create: false,
			..Self::default()
		}
	}

	pub(crate) fn to_rusqlite(&self) -> rusqlite::OpenFlags {
		let mut flags = rusqlite::OpenFlags::empty();

		if self.read_write {
			flags |= rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE;
		} else {
			flags |= rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY;
		}

		if self.create {
			flags |= rusqlite::OpenFlags::SQLITE_OPEN_CREATE;
		}

		if self.full_mutex {
			flags |= rusqlite::OpenFlags::SQLITE_OPEN_FULL_MUTEX;
		}

		if self.no_mutex {
			flags |= rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX;
		}

		if self.uri {
			flags |= rusqlite::OpenFlags::SQLITE_OPEN_URI;
		}

		flags
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
	Delete,
	Wal,
	Memory,
}

impl JournalMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			JournalMode::Delete => "DELETE",
			JournalMode::Wal => "WAL",
			JournalMode::Memory => "MEMORY",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynchronousMode {
	Off,
	Normal,
	Full,
}

impl SynchronousMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			SynchronousMode::Off => "OFF",
			SynchronousMode::Normal => "NORMAL",
			SynchronousMode::Full => "FULL",
		}
	}
}
