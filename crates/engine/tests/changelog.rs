// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Tidemark

use std::path::{Path, PathBuf};

use tidemark_core::{ChangeSetId, Contexts, Filter, Outcome, PlannedAction, interface::AuditStore};
use tidemark_engine::{Engine, EngineConfig};
use tidemark_source::JsonChangeLogSource;
use tidemark_store::{DocumentStore, SqliteConfig};
use tidemark_testing::tempdir::temp_dir;
use tidemark_type::ErrorKind;

fn fixture(name: &str) -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name).join("master.json")
}

fn each_backend(f: impl Fn(DocumentStore)) {
	f(DocumentStore::memory());
	temp_dir(|dir| {
		f(DocumentStore::sqlite(SqliteConfig::fast(dir.join("target.db"))).unwrap());
		Ok(())
	})
	.unwrap();
}

fn engine(store: &DocumentStore) -> Engine<tidemark_audit::DocumentAuditStore, tidemark_engine::StoreExecutor> {
	Engine::with_store(store.clone(), &EngineConfig::default()).unwrap()
}

fn count(store: &DocumentStore, collection: &str) -> usize {
	store.count(collection, &Filter::all()).unwrap()
}

#[test]
fn test_four_change_sets_applied_once() {
	each_backend(|store| {
		let engine = engine(&store);

		let report = engine.run(JsonChangeLogSource, &fixture("simple"), &Contexts::new()).unwrap();
		assert!(report.initialized);
		assert_eq!(report.applied().len(), 4);
		assert_eq!(count(&store, "mongeez"), 5);
		assert_eq!(count(&store, "organization"), 2);
		assert_eq!(count(&store, "user"), 2);

		let report = engine.run(JsonChangeLogSource, &fixture("simple"), &Contexts::new()).unwrap();
		assert!(!report.initialized);
		assert!(report.applied().is_empty());
		assert_eq!(report.already_applied().len(), 4);
		assert_eq!(count(&store, "mongeez"), 5);
		assert_eq!(count(&store, "organization"), 2);
		assert_eq!(count(&store, "user"), 2);
	});
}

#[test]
fn test_no_active_context() {
	each_backend(|store| {
		engine(&store).run(JsonChangeLogSource, &fixture("contexts"), &Contexts::new()).unwrap();

		assert_eq!(count(&store, "mongeez"), 2);
		assert_eq!(count(&store, "car"), 2);
		assert_eq!(count(&store, "user"), 0);
		assert_eq!(count(&store, "organization"), 0);
		assert_eq!(count(&store, "house"), 0);
	});
}

#[test]
fn test_users_context() {
	each_backend(|store| {
		engine(&store).run(JsonChangeLogSource, &fixture("contexts"), &Contexts::parse("users")).unwrap();

		assert_eq!(count(&store, "mongeez"), 4);
		assert_eq!(count(&store, "car"), 2);
		assert_eq!(count(&store, "user"), 2);
		assert_eq!(count(&store, "organization"), 0);
		assert_eq!(count(&store, "house"), 2);
	});
}

#[test]
fn test_organizations_context() {
	each_backend(|store| {
		engine(&store).run(JsonChangeLogSource, &fixture("contexts"), &Contexts::parse("organizations")).unwrap();

		assert_eq!(count(&store, "mongeez"), 4);
		assert_eq!(count(&store, "car"), 2);
		assert_eq!(count(&store, "user"), 0);
		assert_eq!(count(&store, "organization"), 2);
		assert_eq!(count(&store, "house"), 2);
	});
}

#[test]
fn test_context_skip_is_not_remembered() {
	each_backend(|store| {
		let engine = engine(&store);
		engine.run(JsonChangeLogSource, &fixture("contexts"), &Contexts::new()).unwrap();
		engine.run(JsonChangeLogSource, &fixture("contexts"), &Contexts::parse("users")).unwrap();

		assert_eq!(count(&store, "mongeez"), 4);
		assert_eq!(count(&store, "car"), 2);
		assert_eq!(count(&store, "user"), 2);
		assert_eq!(count(&store, "house"), 2);
	});
}

#[test]
fn test_declaration_order() {
	each_backend(|store| {
		engine(&store).run(JsonChangeLogSource, &fixture("ordering"), &Contexts::new()).unwrap();

		let mode = store.find_one("setting", &Filter::eq("_id", "mode")).unwrap().unwrap();
		assert_eq!(mode["value"], "finished");
		assert_eq!(mode["steps"], 3);

		let history: Vec<String> =
			engine(&store).audit().history().unwrap().into_iter().map(|r| r.change_id).collect();
		assert_eq!(history, vec!["create", "touch", "finish"]);
	});
}

#[test]
fn test_fail_fast() {
	each_backend(|store| {
		let err = engine(&store).run(JsonChangeLogSource, &fixture("fail_fast"), &Contexts::new()).unwrap_err();

		assert_eq!(err.kind(), ErrorKind::Execution);
		assert_eq!(err.label.as_deref(), Some("changesets/steps.json:step-2"));
		assert_eq!(err.root_cause().code, "STORE_007");
		assert_eq!(err.root_cause().message, "no such command: 'reIndexEverything'");

		assert_eq!(count(&store, "mongeez"), 2);
		assert_eq!(count(&store, "step"), 1);
		assert!(store.find_one("step", &Filter::eq("_id", 2)).unwrap().is_none());
	});
}

#[test]
fn test_fail_soft() {
	each_backend(|store| {
		let engine = engine(&store);
		let pending = ChangeSetId::new("changesets/steps.json", "step-2");

		let report = engine.run(JsonChangeLogSource, &fixture("fail_soft"), &Contexts::new()).unwrap();
		assert_eq!(report.applied().len(), 2);
		assert!(matches!(report.outcome(&pending), Some(Outcome::PendingRetry { .. })));
		assert_eq!(count(&store, "mongeez"), 3);
		assert_eq!(count(&store, "step"), 2);

		let report = engine.run(JsonChangeLogSource, &fixture("fail_soft"), &Contexts::new()).unwrap();
		assert_eq!(report.pending_retry(), vec![&pending]);
		assert_eq!(report.already_applied().len(), 2);
		assert_eq!(count(&store, "mongeez"), 3);
		assert_eq!(count(&store, "step"), 2);
	});
}

#[test]
fn test_missing_change_files_touches_nothing() {
	each_backend(|store| {
		let reference = fixture("no_change_files");
		let err = engine(&store).run(JsonChangeLogSource, &reference, &Contexts::new()).unwrap_err();

		assert_eq!(err.kind(), ErrorKind::Format);
		assert_eq!(
			err.message,
			format!(
				"The file \"{}\" doesn't seem to contain a changeFiles declaration. Are you using the correct file to initialize Tidemark?",
				reference.display()
			)
		);
		assert!(store.collection_names().unwrap().is_empty());
	});
}

#[test]
fn test_empty_changelog_only_initializes() {
	each_backend(|store| {
		let report = engine(&store).run(JsonChangeLogSource, &fixture("empty"), &Contexts::new()).unwrap();

		assert!(report.initialized);
		assert!(report.entries.is_empty());
		assert_eq!(count(&store, "mongeez"), 1);
		assert_eq!(store.collection_names().unwrap(), vec!["mongeez".to_string()]);
	});
}

#[test]
fn test_run_always() {
	each_backend(|store| {
		let engine = engine(&store);
		for _ in 0..3 {
			engine.run(JsonChangeLogSource, &fixture("run_always"), &Contexts::new()).unwrap();
		}

		assert_eq!(count(&store, "cache"), 1);
		assert_eq!(count(&store, "run"), 3);
		assert_eq!(count(&store, "mongeez"), 3);
	});
}

#[test]
fn test_custom_audit_collection() {
	each_backend(|store| {
		let config = EngineConfig::default().with_audit_collection("schema_history");
		let engine = Engine::with_store(store.clone(), &config).unwrap();
		engine.run(JsonChangeLogSource, &fixture("simple"), &Contexts::new()).unwrap();

		assert_eq!(count(&store, "schema_history"), 5);
		assert!(!store.collection_exists("mongeez").unwrap());
	});
}

#[test]
fn test_plan_is_read_only() {
	each_backend(|store| {
		let engine = engine(&store);
		let changelog = tidemark_core::interface::ChangeLogSource::load(&JsonChangeLogSource, &fixture("contexts")).unwrap();

		let plan = engine.plan(&changelog, &Contexts::parse("users")).unwrap();
		let actions: Vec<PlannedAction> = plan.iter().map(|p| p.action).collect();
		assert_eq!(
			actions,
			vec![PlannedAction::Apply, PlannedAction::Apply, PlannedAction::SkippedByContext, PlannedAction::Apply]
		);
		assert!(store.collection_names().unwrap().is_empty());
		assert!(!engine.audit().is_initialized().unwrap());

		engine.process(&changelog, &Contexts::parse("users")).unwrap();
		let plan = engine.plan(&changelog, &Contexts::parse("users, organizations")).unwrap();
		let actions: Vec<PlannedAction> = plan.iter().map(|p| p.action).collect();
		assert_eq!(
			actions,
			vec![
				PlannedAction::AlreadyApplied,
				PlannedAction::AlreadyApplied,
				PlannedAction::Apply,
				PlannedAction::AlreadyApplied
			]
		);
	});
}
