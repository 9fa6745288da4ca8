use serde_json::json;
use source_edit::{EditError, LineEnding};
use source_edit_change::{ChangeError, ChangeOptions, DocumentId, SourceChange, Workspace};

const MAIN_PATH: &str = "/project/lib/main.dart";
const UTIL_PATH: &str = "/project/lib/util.dart";
const MAIN_TEXT: &str = "var hello = 1;\r\nprint(hello);\r\n";
const UTIL_TEXT: &str = "int hello() => 1;\n";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn open_project() -> (Workspace, DocumentId, DocumentId) {
    init_tracing();
    let mut workspace = Workspace::new();
    let main = workspace.open_document(MAIN_PATH, MAIN_TEXT).unwrap();
    let util = workspace.open_document(UTIL_PATH, UTIL_TEXT).unwrap();
    (workspace, main, util)
}

fn rename_change() -> SourceChange {
    SourceChange::from_value(json!({
        "message": "Rename 'hello' to 'world'",
        "edits": [
            {
                "file": MAIN_PATH,
                "fileStamp": 3,
                "edits": [
                    { "offset": 22, "length": 5, "replacement": "world", "id": "main-call" },
                    { "offset": 4, "length": 5, "replacement": "world", "id": "main-decl" }
                ]
            },
            {
                "file": UTIL_PATH,
                "fileStamp": 7,
                "edits": [
                    { "offset": 4, "length": 5, "replacement": "world", "id": "util-decl" }
                ]
            }
        ],
        "linkedEditGroups": [
            {
                "positions": [
                    { "file": MAIN_PATH, "offset": 4 },
                    { "file": MAIN_PATH, "offset": 22 },
                    { "file": "/project/lib/closed.dart", "offset": 0 }
                ],
                "length": 5,
                "suggestions": [ { "value": "greeting", "kind": "VARIABLE" } ]
            }
        ],
        "selection": { "file": MAIN_PATH, "offset": 27 }
    }))
    .unwrap()
}

#[test]
fn test_rename_across_files() {
    let (mut workspace, main, util) = open_project();

    let outcome = workspace
        .apply_source_change(&rename_change(), &ChangeOptions::default())
        .unwrap();

    assert_eq!(
        workspace.document_text(main).unwrap(),
        "var world = 1;\nprint(world);\n"
    );
    assert_eq!(
        workspace.document_text_for_saving(main).unwrap(),
        "var world = 1;\r\nprint(world);\r\n"
    );
    assert_eq!(
        workspace.document_line_ending(main).unwrap(),
        LineEnding::Crlf
    );
    assert_eq!(workspace.document_text(util).unwrap(), "int world() => 1;\n");

    assert_eq!(outcome.message, "Rename 'hello' to 'world'");
    assert_eq!(outcome.documents.len(), 2);
    assert_eq!(outcome.documents[0].id, main);
    assert_eq!(outcome.documents[0].applied, 2);
    assert!(!outcome.documents[0].created);
    assert_eq!(outcome.applied_edits(), 3);

    // End of the second "world" on the "print" line.
    let selection = outcome.selection.unwrap();
    assert_eq!(selection.document, main);
    assert_eq!(selection.offset, 26);

    assert_eq!(outcome.linked_edit_groups.len(), 1);
    let group = &outcome.linked_edit_groups[0];
    assert_eq!(group.ranges, vec![(main, 4..9), (main, 21..26)]);
    assert_eq!(group.suggestions[0].value, "greeting");

    assert_eq!(workspace.document_version(main), Some(1));
    assert_eq!(workspace.document_version(util), Some(1));
}

#[test]
fn test_offset_table_is_refreshed_after_change() {
    let (mut workspace, main, _) = open_project();
    workspace
        .apply_source_change(&rename_change(), &ChangeOptions::default())
        .unwrap();

    let follow_up = SourceChange::from_value(json!({
        "message": "Shorten name",
        "edits": [{
            "file": MAIN_PATH,
            "fileStamp": 4,
            "edits": [
                { "offset": 22, "length": 5, "replacement": "w" },
                { "offset": 4, "length": 5, "replacement": "w" }
            ]
        }],
        "selection": { "file": MAIN_PATH, "offset": 18 }
    }))
    .unwrap();

    let outcome = workspace
        .apply_source_change(&follow_up, &ChangeOptions::default())
        .unwrap();

    assert_eq!(workspace.document_text(main).unwrap(), "var w = 1;\nprint(w);\n");
    assert_eq!(outcome.selection.unwrap().offset, 17);
    assert_eq!(workspace.document_version(main), Some(2));
    assert_eq!(
        workspace.document_offsets(main).unwrap().original_len(),
        "var w = 1;\r\nprint(w);\r\n".len()
    );
}

#[test]
fn test_file_edits_for_same_path_are_merged() {
    let (mut workspace, main, _) = open_project();
    // Two file edits for the same path; the second is expressed against the text left by the
    // first, and the selection sits after the CRLF inserted by the first.
    let change = SourceChange::from_value(json!({
        "message": "Split call",
        "edits": [
            {
                "file": MAIN_PATH,
                "fileStamp": 3,
                "edits": [ { "offset": 22, "length": 5, "replacement": "a\r\nb" } ]
            },
            {
                "file": MAIN_PATH,
                "fileStamp": 3,
                "edits": [ { "offset": 4, "length": 5, "replacement": "w" } ]
            }
        ],
        "selection": { "file": MAIN_PATH, "offset": 22 }
    }))
    .unwrap();

    let outcome = workspace
        .apply_source_change(&change, &ChangeOptions::default())
        .unwrap();

    assert_eq!(
        workspace.document_text(main).unwrap(),
        "var w = 1;\nprint(a\nb);\n"
    );
    assert_eq!(
        workspace.document_text_for_saving(main).unwrap(),
        "var w = 1;\r\nprint(a\r\nb);\r\n"
    );
    assert_eq!(outcome.documents.len(), 1);
    assert_eq!(outcome.documents[0].supplied, 2);
    assert_eq!(outcome.documents[0].applied, 2);
    // Just after the 'b'.
    assert_eq!(outcome.selection.unwrap().offset, 20);
    assert_eq!(workspace.document_version(main), Some(1));
}

#[test]
fn test_excluded_edits_are_not_applied() {
    let (mut workspace, main, util) = open_project();
    let mut options = ChangeOptions::default();
    options.excluded.insert("main-call".to_string());
    options.excluded.insert("util-decl".to_string());

    let outcome = workspace
        .apply_source_change(&rename_change(), &options)
        .unwrap();

    assert_eq!(
        workspace.document_text(main).unwrap(),
        "var world = 1;\nprint(hello);\n"
    );
    assert_eq!(workspace.document_text(util).unwrap(), UTIL_TEXT);
    assert_eq!(outcome.documents[1].supplied, 1);
    assert_eq!(outcome.documents[1].applied, 0);
    // Untouched documents keep their version.
    assert_eq!(workspace.document_version(util), Some(0));
}

#[test]
fn test_missing_file_applies_nothing() {
    init_tracing();
    let mut workspace = Workspace::new();
    let main = workspace.open_document(MAIN_PATH, MAIN_TEXT).unwrap();

    let result = workspace.apply_source_change(&rename_change(), &ChangeOptions::default());

    match result {
        Err(ChangeError::MissingFile(path)) => assert_eq!(path, UTIL_PATH),
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(
        workspace.document_text(main).unwrap(),
        "var hello = 1;\nprint(hello);\n"
    );
    assert_eq!(workspace.document_version(main), Some(0));
}

#[test]
fn test_new_file_is_created() {
    init_tracing();
    let mut workspace = Workspace::new();
    let change = SourceChange::from_value(json!({
        "message": "Extract class",
        "edits": [{
            "file": "/project/lib/extracted.dart",
            "fileStamp": -1,
            "edits": [ { "offset": 0, "length": 0, "replacement": "class Extracted {\r\n}\r\n" } ]
        }],
        "selection": { "file": "/project/lib/extracted.dart", "offset": 6 }
    }))
    .unwrap();

    let outcome = workspace
        .apply_source_change(&change, &ChangeOptions::default())
        .unwrap();

    let id = workspace
        .document_id_for_path("/project/lib/extracted.dart")
        .unwrap();
    assert!(outcome.documents[0].created);
    assert_eq!(workspace.document_text(id).unwrap(), "class Extracted {\n}\n");
    assert_eq!(outcome.selection.unwrap().offset, 6);

    let mut options = ChangeOptions::default();
    options.create_new_files = false;
    let mut other = Workspace::new();
    assert!(matches!(
        other.apply_source_change(&change, &options),
        Err(ChangeError::MissingFile(_))
    ));
    assert!(other.is_empty());
}

fn change_with_bad_util_edit() -> SourceChange {
    SourceChange::from_value(json!({
        "message": "Broken change",
        "edits": [
            {
                "file": MAIN_PATH,
                "fileStamp": 3,
                "edits": [ { "offset": 4, "length": 5, "replacement": "world" } ]
            },
            {
                "file": UTIL_PATH,
                "fileStamp": 7,
                "edits": [ { "offset": 100, "length": 1, "replacement": "x" } ]
            }
        ]
    }))
    .unwrap()
}

#[test]
fn test_failed_file_is_named_and_earlier_files_stay_edited() {
    let (mut workspace, main, util) = open_project();

    let result =
        workspace.apply_source_change(&change_with_bad_util_edit(), &ChangeOptions::default());

    match result {
        Err(ChangeError::Edit { path, source }) => {
            assert_eq!(path, UTIL_PATH);
            assert_eq!(
                source,
                EditError::InvalidOffset {
                    offset: 100,
                    len: UTIL_TEXT.len()
                }
            );
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(
        workspace.document_text(main).unwrap(),
        "var world = 1;\nprint(hello);\n"
    );
    assert_eq!(workspace.document_version(main), Some(1));
    assert_eq!(workspace.document_text(util).unwrap(), UTIL_TEXT);
}

#[test]
fn test_atomic_change_restores_documents() {
    let (mut workspace, main, util) = open_project();
    let options = ChangeOptions {
        atomic: true,
        ..ChangeOptions::default()
    };

    let result = workspace.apply_source_change(&change_with_bad_util_edit(), &options);

    assert!(matches!(result, Err(ChangeError::Edit { .. })));
    assert_eq!(
        workspace.document_text(main).unwrap(),
        "var hello = 1;\nprint(hello);\n"
    );
    assert_eq!(workspace.document_version(main), Some(0));
    assert_eq!(workspace.document_text(util).unwrap(), UTIL_TEXT);
}

#[test]
fn test_selection_in_untouched_document_is_converted() {
    let (mut workspace, _, util) = open_project();
    let change = SourceChange::from_value(json!({
        "message": "Only util",
        "edits": [{
            "file": UTIL_PATH,
            "fileStamp": 7,
            "edits": [ { "offset": 0, "length": 3, "replacement": "num" } ]
        }],
        "selection": { "file": MAIN_PATH, "offset": 16 }
    }))
    .unwrap();

    let outcome = workspace
        .apply_source_change(&change, &ChangeOptions::default())
        .unwrap();

    assert_eq!(workspace.document_text(util).unwrap(), "num hello() => 1;\n");
    // Original 16 is the 'p' of "print", after one CRLF.
    let selection = outcome.selection.unwrap();
    assert_eq!(selection.offset, 15);
}

#[test]
fn test_document_lifecycle() {
    init_tracing();
    let mut workspace = Workspace::new();
    let id = workspace.open_document(MAIN_PATH, MAIN_TEXT).unwrap();
    assert_eq!(workspace.len(), 1);
    assert_eq!(workspace.document_path(id).unwrap(), MAIN_PATH);
    assert!(matches!(
        workspace.open_document(MAIN_PATH, ""),
        Err(ChangeError::PathAlreadyOpen(_))
    ));

    workspace.close_document(id).unwrap();
    assert!(workspace.is_empty());
    assert_eq!(workspace.document_id_for_path(MAIN_PATH), None);
    assert!(matches!(
        workspace.document_text(id),
        Err(ChangeError::DocumentNotFound(_))
    ));
    assert!(matches!(
        SourceChange::from_json("{ \"edits\": 3 }"),
        Err(ChangeError::Json(_))
    ));
}
