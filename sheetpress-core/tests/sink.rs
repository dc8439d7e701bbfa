use std::sync::{Arc, Mutex};

use serde_json::json;
use tempfile::tempdir;

use sheetpress_core::poller::Snapshot;
use sheetpress_core::sink::{CallbackSink, JsonFileSink, Sink, SinkError, DEFAULT_INDENT};

fn sample() -> Snapshot {
    json!({"blogContent": [{"title": "Hello"}], "usernameContent": {}})
        .as_object()
        .unwrap()
        .clone()
}

#[tokio::test]
async fn writes_snapshot_with_eight_space_indent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    let sink = JsonFileSink::new(&path);
    assert_eq!(DEFAULT_INDENT, 8);

    sink.publish(&sample()).await.expect("publish should succeed");

    let written = std::fs::read_to_string(&path).unwrap();
    let expected = concat!(
        "{\n",
        "        \"blogContent\": [\n",
        "                {\n",
        "                        \"title\": \"Hello\"\n",
        "                }\n",
        "        ],\n",
        "        \"usernameContent\": {}\n",
        "}\n",
    );
    assert_eq!(written, expected);
}

#[tokio::test]
async fn custom_indent_and_nested_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("public").join("blog").join("data.json");
    let sink = JsonFileSink::new(&path).with_indent(2);

    sink.publish(&sample()).await.unwrap();

    let written = std::fs::read_to_string(sink.path()).unwrap();
    assert!(written.starts_with("{\n  \"blogContent\": [\n    {"));
    assert!(written.ends_with("}\n"));
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed["blogContent"][0]["title"], "Hello");
}

#[tokio::test]
async fn overwrites_previous_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    let sink = JsonFileSink::new(&path);

    sink.publish(&sample()).await.unwrap();
    let mut next = sample();
    next.insert("blogContent".to_string(), json!([]));
    sink.publish(&next).await.unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed, json!({"blogContent": [], "usernameContent": {}}));

    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1, "no temporary files are left behind");
}

#[tokio::test]
async fn unwritable_target_is_an_io_error() {
    let dir = tempdir().unwrap();
    // A directory where the file should be.
    let path = dir.path().join("taken");
    std::fs::create_dir(&path).unwrap();
    let sink = JsonFileSink::new(&path);

    let err = sink.publish(&sample()).await.unwrap_err();
    match err {
        SinkError::Io { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn callback_sink_receives_the_snapshot() {
    let seen: Arc<Mutex<Vec<Snapshot>>> = Arc::new(Mutex::new(Vec::new()));
    let store = seen.clone();
    let sink = CallbackSink::new(move |snapshot: &Snapshot| {
        store.lock().unwrap().push(snapshot.clone());
    });

    sink.publish(&sample()).await.unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![sample()]);
}
