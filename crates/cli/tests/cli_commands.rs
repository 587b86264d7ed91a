//! Command surface tests for the `gridview` CLI, run in-process against an
//! offline store file.

use std::path::Path;

use assert_matches::assert_matches;
use clap::Parser;
use serde_json::{json, Value};

use gridview_cli::{run, Cli, Commands, KindCli};
use gridview_client::ClientConfig;

const PAGE: &str = "properties-list";

fn config() -> ClientConfig {
    ClientConfig {
        user_id: Some(7),
        ..ClientConfig::default()
    }
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("gridview").chain(args.iter().copied())).unwrap()
}

async fn run_offline(store: &Path, args: &[&str], stdin: &str) -> anyhow::Result<Value> {
    let mut full = vec!["--offline", store.to_str().unwrap()];
    full.extend_from_slice(args);
    run(parse(&full), &config(), stdin.as_bytes()).await
}

// ---------------------------------------------------------------------------
// Test: argument parsing
// ---------------------------------------------------------------------------

#[test]
fn every_subcommand_parses() {
    let cli = parse(&["list", "--kind", "filters", "--page", PAGE]);
    assert_matches!(cli.command, Commands::List { kind: KindCli::Filters, ref page } if page == PAGE);
    assert!(cli.offline.is_none());

    let cli = parse(&[
        "save", "--kind", "columns", "--page", PAGE, "--name", "Wide", "--payload", "-",
    ]);
    assert_matches!(
        cli.command,
        Commands::Save { kind: KindCli::Columns, ref name, ref description, ref payload, .. }
            if name == "Wide" && description.is_empty() && payload.as_os_str() == "-"
    );

    let cli = parse(&["delete", "--kind", "filters", "--page", PAGE, "--id", "4"]);
    assert_matches!(cli.command, Commands::Delete { id: 4, .. });

    let cli = parse(&["default", "--kind", "columns", "--page", PAGE, "--id", "9"]);
    assert_matches!(cli.command, Commands::Default { kind: KindCli::Columns, id: 9, .. });

    let cli = parse(&["encode", "state.json"]);
    assert_matches!(cli.command, Commands::Encode { ref input } if input.as_os_str() == "state.json");

    let cli = parse(&["decode", "abc", "--offline", "views.json"]);
    assert_matches!(cli.command, Commands::Decode { ref token } if token == "abc");
    assert_eq!(cli.offline.unwrap().as_os_str(), "views.json");
}

#[test]
fn bad_arguments_are_rejected() {
    let attempt = |args: &[&str]| {
        Cli::try_parse_from(std::iter::once("gridview").chain(args.iter().copied()))
    };
    assert!(attempt(&["list", "--kind", "rows", "--page", PAGE]).is_err());
    assert!(attempt(&["list", "--kind", "filters"]).is_err());
    assert!(attempt(&["delete", "--kind", "filters", "--page", PAGE, "--id", "x"]).is_err());
    assert!(attempt(&[]).is_err());
}

// ---------------------------------------------------------------------------
// Test: share tokens
// ---------------------------------------------------------------------------

#[tokio::test]
async fn encode_then_decode_round_trips() {
    let state = json!({
        "filters": {"state": {"type": "equals", "filter": "NV"}},
        "columns": [{"colId": "name", "width": 240}]
    });

    let encoded = run(parse(&["encode", "-"]), &config(), state.to_string().as_bytes())
        .await
        .unwrap();
    assert_eq!(encoded["param"], "gridParams");
    let token = encoded["token"].as_str().unwrap().to_string();

    let decoded = run(parse(&["decode", &token]), &config(), std::io::empty())
        .await
        .unwrap();
    assert_eq!(decoded, state);
}

#[tokio::test]
async fn decode_rejects_garbage() {
    let result = run(parse(&["decode", "%%%"]), &config(), std::io::empty()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn encode_reads_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"filters":{}}"#).unwrap();

    let encoded = run(
        parse(&["encode", path.to_str().unwrap()]),
        &config(),
        std::io::empty(),
    )
    .await
    .unwrap();
    assert!(encoded["token"].as_str().is_some_and(|t| !t.is_empty()));
}

// ---------------------------------------------------------------------------
// Test: offline store persists between runs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn offline_save_list_default_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("views.json");

    let saved = run_offline(
        &store,
        &["save", "--kind", "filters", "--page", PAGE, "--name", "By State", "--payload", "-"],
        r#"{"state":{"type":"equals","filter":"NV"}}"#,
    )
    .await
    .unwrap();
    assert_eq!(saved["id"], 1);
    assert_eq!(saved["userId"], 7);
    assert_eq!(saved["totalFiltersApplied"], 1);
    assert!(store.exists());

    run_offline(
        &store,
        &["save", "--kind", "filters", "--page", PAGE, "--name", "Active Only", "--payload", "-"],
        r#"{"status":{"values":["Active"]}}"#,
    )
    .await
    .unwrap();

    let listed = run_offline(&store, &["list", "--kind", "filters", "--page", PAGE], "")
        .await
        .unwrap();
    let names: Vec<_> = listed["own"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["table_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["By State", "Active Only"]);
    assert_eq!(listed["default"], Value::Null);

    run_offline(&store, &["default", "--kind", "filters", "--page", PAGE, "--id", "2"], "")
        .await
        .unwrap();
    let listed = run_offline(&store, &["list", "--kind", "filters", "--page", PAGE], "")
        .await
        .unwrap();
    assert_eq!(listed["default"], 2);

    run_offline(&store, &["delete", "--kind", "filters", "--page", PAGE, "--id", "2"], "")
        .await
        .unwrap();
    let listed = run_offline(&store, &["list", "--kind", "filters", "--page", PAGE], "")
        .await
        .unwrap();
    assert_eq!(listed["own"].as_array().unwrap().len(), 1);
    assert_eq!(listed["default"], Value::Null);

    // Column views of the same page live apart from filter views.
    let columns = run_offline(&store, &["list", "--kind", "columns", "--page", PAGE], "")
        .await
        .unwrap();
    assert!(columns["own"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn save_rejects_invalid_payload_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("views.json");

    let result = run_offline(
        &store,
        &["save", "--kind", "columns", "--page", PAGE, "--name", "Broken", "--payload", "-"],
        "{not json",
    )
    .await;
    assert!(result.is_err());
    assert!(!store.exists());
}

#[tokio::test]
async fn failed_command_leaves_store_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("views.json");
    run_offline(
        &store,
        &["save", "--kind", "columns", "--page", PAGE, "--name", "Wide", "--payload", "-"],
        r#"[{"colId":"name","width":300}]"#,
    )
    .await
    .unwrap();
    let before = std::fs::read_to_string(&store).unwrap();

    let result =
        run_offline(&store, &["delete", "--kind", "columns", "--page", PAGE, "--id", "99"], "").await;
    assert!(result.is_err());
    assert_eq!(std::fs::read_to_string(&store).unwrap(), before);
}

#[tokio::test]
async fn view_commands_need_a_user() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("views.json");
    let cli = parse(&[
        "--offline",
        store.to_str().unwrap(),
        "list",
        "--kind",
        "filters",
        "--page",
        PAGE,
    ]);

    let result = run(cli, &ClientConfig::default(), std::io::empty()).await;
    assert!(result.is_err());
    assert!(!store.exists());
}
