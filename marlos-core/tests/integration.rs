//! Integration tests — on-disk stores, knowledge files and exports.

use std::sync::Arc;
use std::time::Duration;

use marlos_core::config::{HistoryConfig, MarlosConfig};
use marlos_core::export::{self, ExportFormat};
use marlos_core::knowledge::KnowledgeBase;
use marlos_core::persistence::SqliteStore;
use marlos_core::{ApiSettings, ChatMessage, HistoryStore, LocalMatcher, Role, SettingsStore};

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("marlos.db");
    let config = HistoryConfig::default();

    {
        let store = SqliteStore::open(&path, &config).expect("open");
        store.append(&ChatMessage::user("¿cuánta RAM tengo?")).expect("append");
        store.append(&ChatMessage::bot("Mira el Administrador de tareas")).expect("append");
        store
            .save(&ApiSettings::new("https://api.example.com/v1", "api.example.com", "secret"))
            .expect("save settings");
    }

    let store = SqliteStore::open(&path, &config).expect("reopen");
    let history = store.read_all().expect("read");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[1].role, Role::Bot);
    assert!(store.load().expect("settings").is_complete());
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn knowledge_file_drives_matcher() {
    let dir = tempfile::tempdir().expect("tempdir");
    let kb_path = dir.path().join("kb.toml");
    std::fs::write(
        &kb_path,
        r#"
        [[entry]]
        keys = ["contraseña", "password"]
        reply = "Usa un gestor de contraseñas."
        "#,
    )
    .expect("write kb");

    let config = MarlosConfig::from_toml(&format!(
        "[matcher]\ncompose_delay_ms = 0\nknowledge_path = {:?}\n",
        kb_path.display().to_string()
    ))
    .expect("config");
    let path = config.matcher.knowledge_path.clone().expect("path set");
    let kb = KnowledgeBase::from_file(&path).expect("kb loads");

    let matcher = LocalMatcher::from_config(Arc::new(kb), &config.matcher);
    assert_eq!(matcher.compose_delay(), Duration::ZERO);
    assert_eq!(
        matcher.find("Olvidé mi CONTRASENA"),
        Some("Usa un gestor de contraseñas.")
    );
    assert!(matcher.find("¿qué es DNS?").is_none());
}

#[test]
fn exported_transcript_from_disk() {
    let store = SqliteStore::open_in_memory().expect("open");
    store.append(&ChatMessage::user("hdd vs ssd")).expect("append");
    store.append(&ChatMessage::bot("SSD es más rápido")).expect("append");

    let history = store.read_all().expect("read");
    let txt = export::render(&history, ExportFormat::Txt)
        .expect("render")
        .expect("non-empty");
    let lines: Vec<&str> = txt.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("USER: hdd vs ssd"));
    assert!(lines[1].ends_with("BOT: SSD es más rápido"));
}

#[test]
fn missing_config_file_is_io_error() {
    let err = MarlosConfig::from_file(std::path::Path::new("/definitely/not/here.toml"))
        .expect_err("missing file");
    assert!(matches!(err, marlos_core::MarlosError::Io(_)));
}
