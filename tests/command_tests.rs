use std::io::Write;
use tempfile::NamedTempFile;
use traceflow::commands::{execute_view, validate_args, validate_view_file, ViewArgs};
use traceflow::output::{read_view, Layout};
use traceflow::tree::ViewConfig;

const DUMP: &str = r#"{
  "entries": [
    {"id": "a1", "sessionId": "s-a", "className": "com.shop.OrderController", "methodName": "place",
     "methodType": "ENTRY_POINT", "duration": 50, "startTime": 1700000000000},
    {"id": "a2", "sessionId": "s-a", "parentId": "a1", "className": "com.shop.Order", "methodName": "getId",
     "methodType": "GETTER", "duration": 1},
    {"id": "a3", "sessionId": "s-a", "parentId": "a1", "className": "com.shop.Repo", "methodName": "save",
     "duration": 12},
    {"id": "a4", "sessionId": "s-a", "parentId": "a1", "className": "com.shop.Repo", "methodName": "save",
     "duration": 15, "error": true, "errorType": "SQLException", "errorMessage": "timeout"},
    {"id": "b1", "sessionId": "s-b", "className": "com.shop.Job", "methodName": "run",
     "methodType": "ENTRY_POINT", "duration": 5}
  ]
}"#;

fn dump_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(DUMP.as_bytes()).unwrap();
    file
}

#[test]
fn test_view_writes_merged_tree() {
    let input = dump_file();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out/view.json");

    let args = ViewArgs {
        input: input.path().to_path_buf(),
        session: Some("s-a".to_string()),
        output_json: output.clone(),
        config: ViewConfig::new().with_merge(true),
        ..Default::default()
    };

    validate_args(&args).unwrap();
    execute_view(args).unwrap();

    let document = read_view(&output).unwrap();
    assert_eq!(document.summary.entry_method, "OrderController.place");
    assert_eq!(document.summary.accessor_count, 1);
    assert_eq!(document.filter_stats.total, 4);
    assert_eq!(document.filter_stats.showing, 2);

    let root = document.tree.unwrap();
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].merged_ids, vec!["a3", "a4"]);
    assert_eq!(root.children[0].total_duration(), 27);

    let stats = document.stats.unwrap();
    assert_eq!(stats.merged_nodes, 1);
    assert_eq!(stats.absorbed_records, 3);
}

#[test]
fn test_view_flat_layout_defaults_to_first_session() {
    let input = dump_file();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("flat.json");

    let args = ViewArgs {
        input: input.path().to_path_buf(),
        output_json: output.clone(),
        config: ViewConfig::new().with_accessors(true),
        layout: Layout::Flat,
        ..Default::default()
    };

    execute_view(args).unwrap();

    let document = read_view(&output).unwrap();
    assert_eq!(document.summary.session_id, "s-a");
    assert!(document.tree.is_none());

    let records = document.records.unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["a1", "a2", "a3", "a4"]);
    assert!(records[3].record.has_error());
}

#[test]
fn test_view_unknown_session_fails() {
    let input = dump_file();
    let dir = tempfile::tempdir().unwrap();

    let args = ViewArgs {
        input: input.path().to_path_buf(),
        session: Some("nope".to_string()),
        output_json: dir.path().join("view.json"),
        ..Default::default()
    };

    assert!(execute_view(args).is_err());
}

#[test]
fn test_view_malformed_dump_fails() {
    let mut input = NamedTempFile::new().unwrap();
    input.write_all(b"{\"unexpected\": 1}").unwrap();
    let dir = tempfile::tempdir().unwrap();

    let args = ViewArgs {
        input: input.path().to_path_buf(),
        output_json: dir.path().join("view.json"),
        ..Default::default()
    };

    assert!(execute_view(args).is_err());
}

#[test]
fn test_view_empty_dump_writes_empty_document() {
    let mut input = NamedTempFile::new().unwrap();
    input.write_all(b"[]").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("view.json");

    let args = ViewArgs {
        input: input.path().to_path_buf(),
        output_json: output.clone(),
        print_summary: true,
        ..Default::default()
    };

    execute_view(args).unwrap();

    let document = read_view(&output).unwrap();
    assert!(document.tree.is_none());
    assert_eq!(document.filter_stats.total, 0);
    assert_eq!(document.filter_stats.showing, 0);
    assert!(document.slowest_calls.is_empty());
}

#[test]
fn test_validate_reads_back_deep_view() {
    let depth = 2_000;
    let records: Vec<String> = (0..depth)
        .map(|i| match i {
            0 => r#"{"id": 0, "className": "a.Walker", "methodName": "visit"}"#.to_string(),
            _ => format!(
                r#"{{"id": {}, "parentId": {}, "className": "a.Walker", "methodName": "visit"}}"#,
                i,
                i - 1
            ),
        })
        .collect();

    let mut input = NamedTempFile::new().unwrap();
    write!(input, "[{}]", records.join(",")).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("deep.json");

    let args = ViewArgs {
        input: input.path().to_path_buf(),
        output_json: output.clone(),
        ..Default::default()
    };
    execute_view(args).unwrap();

    validate_view_file(&output).unwrap();

    let document = read_view(&output).unwrap();
    assert_eq!(document.stats.unwrap().max_depth, depth);
    assert!(document.tree.is_some());
}
