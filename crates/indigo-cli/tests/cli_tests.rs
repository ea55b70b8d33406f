//! Commands against an on-disk store.

use tempfile::TempDir;

use indigo_cli::{handle_command, open_indigo, Commands, Document};
use indigo_types::{IndexSettings, SelectorKind, Settings};

fn settings(dir: &TempDir) -> Settings {
    Settings {
        db_path: dir.path().join("db").to_string_lossy().to_string(),
        indices: vec![
            IndexSettings {
                id: "names".to_string(),
                field: "name".to_string(),
                selector: SelectorKind::Exact,
                stop_words: true,
                ngrams: true,
            },
            IndexSettings {
                id: "tags".to_string(),
                field: "tags".to_string(),
                selector: SelectorKind::Exact,
                stop_words: false,
                ngrams: false,
            },
        ],
        ..Default::default()
    }
}

fn run(settings: &Settings, command: Commands) -> String {
    let indigo = open_indigo(settings).unwrap();
    let mut out = Vec::new();
    handle_command(&indigo, settings, command, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn put(settings: &Settings, json: &str) -> String {
    run(
        settings,
        Commands::Put {
            json: json.to_string(),
        },
    )
}

fn search(settings: &Settings, index: &str, term: &str) -> String {
    run(
        settings,
        Commands::Search {
            index: index.to_string(),
            term: term.to_string(),
        },
    )
}

#[test]
fn test_records_survive_between_invocations() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);

    assert_eq!(put(&settings, r#"{"name":"Tomato","tags":["red","vine"]}"#), "1\n");
    assert_eq!(put(&settings, r#"{"name":"Tomatillo","tags":["green"]}"#), "2\n");

    assert_eq!(search(&settings, "names", "toma"), "1\n2\n");
    assert_eq!(search(&settings, "tags", "Green"), "2\n");
    assert_eq!(run(&settings, Commands::List), "1\n2\n");

    let shown = run(&settings, Commands::Get { id: 1 });
    let doc: Document = serde_json::from_str(&shown).unwrap();
    assert_eq!(doc.field_text("tags"), "red vine");
}

#[test]
fn test_replace_by_id() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);

    put(&settings, r#"{"name":"Damson"}"#);
    assert_eq!(put(&settings, r#"{"id":1,"name":"Sloe"}"#), "1\n");

    assert_eq!(search(&settings, "names", "damson"), "");
    assert_eq!(search(&settings, "names", "sloe"), "1\n");
}

#[test]
fn test_replace_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    let indigo = open_indigo(&settings).unwrap();

    let mut out = Vec::new();
    let err = handle_command(
        &indigo,
        &settings,
        Commands::Put {
            json: r#"{"id":5,"name":"Quince"}"#.to_string(),
        },
        &mut out,
    )
    .unwrap_err();
    assert!(err.to_string().contains("Entity 5 doesn't exist"));
}

#[test]
fn test_reindex_after_new_index_is_configured() {
    let dir = TempDir::new().unwrap();
    let mut settings = settings(&dir);
    let tags = settings.indices.pop().unwrap();

    put(&settings, r#"{"name":"Plum","tags":["stone"]}"#);
    put(&settings, r#"{"name":"Cherry","tags":["stone","red"]}"#);

    settings.indices.push(tags);
    assert_eq!(search(&settings, "tags", "stone"), "");

    let report = run(
        &settings,
        Commands::Reindex {
            batch_size: None,
            clear: false,
        },
    );
    assert!(report.starts_with("Reindexed 2 of 2 records in 1 batches"));
    assert_eq!(search(&settings, "tags", "stone"), "1\n2\n");
}
