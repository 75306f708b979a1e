use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use graft::error::ApiError;
use graft::ingest::{DirectoryIngestor, IngestConfig, IngestOutcome, IngestState};
use graft::notify::{drain, ChannelNotifier, Notice};
use graft::source::local::{list_relative_files, LocalPicker, PickerMode};
use graft::tree::export::flatten;
use graft::tree::{FileSystemNode, FileTree, SharedTree, TreeConsumer};
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("src/components")).unwrap();
    fs::create_dir_all(root.join(".git/objects")).unwrap();
    fs::write(root.join("package.json"), "{\"name\":\"demo\"}").unwrap();
    fs::write(root.join("src/index.ts"), "import './components/Button';\n").unwrap();
    fs::write(root.join("src/components/Button.tsx"), "export {}\n").unwrap();
    fs::write(root.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
    fs::write(root.join("src/logo.png"), [0x89u8, 0x50, 0x4e, 0x47, 0xff, 0xfe]).unwrap();
    temp
}

fn ingestor(
    root: &Path,
    mode: PickerMode,
    tree: &SharedTree,
    config: &IngestConfig,
) -> (DirectoryIngestor, UnboundedReceiver<Notice>) {
    let (notifier, rx) = ChannelNotifier::channel();
    let picker = LocalPicker::new(root, mode).excluding(config.exclusions());
    let ingestor = DirectoryIngestor::new(
        Box::new(picker),
        Box::new(tree.clone()),
        Box::new(notifier),
        config,
    );
    (ingestor, rx)
}

fn names(nodes: &[FileSystemNode]) -> Vec<&str> {
    let mut names: Vec<&str> = nodes.iter().map(FileSystemNode::name).collect();
    names.sort();
    names
}

#[tokio::test]
async fn handle_mode_reads_folder_contents_into_root() {
    let temp = project();
    let tree = SharedTree::default();
    let (ingestor, mut rx) = ingestor(
        temp.path(),
        PickerMode::DirectoryHandle,
        &tree,
        &IngestConfig::default(),
    );

    let outcome = ingestor.ingest_directory("").await.unwrap();
    assert!(matches!(outcome, IngestOutcome::Merged { node_count: 6, .. }));
    assert_eq!(ingestor.state(), IngestState::Idle);

    let children = tree.snapshot();
    assert_eq!(names(&children), vec!["package.json", "src"]);

    let files: BTreeMap<String, String> = flatten(&children).into_iter().collect();
    assert_eq!(files["src/index.ts"], "import './components/Button';\n");
    assert_eq!(files["src/components/Button.tsx"], "export {}\n");
    assert_eq!(files["src/logo.png"], "[Error reading file]");

    let notices = drain(&mut rx);
    assert_eq!(notices.first(), Some(&Notice::Loading("Reading folder contents...".to_string())));
    assert_eq!(notices.last(), Some(&Notice::Success("Folder loaded successfully".to_string())));
}

#[tokio::test]
async fn file_list_mode_wraps_contents_in_folder_name() {
    let temp = project();
    let folder = temp.path().file_name().unwrap().to_string_lossy().to_string();
    let tree = SharedTree::default();
    let (ingestor, _rx) = ingestor(
        temp.path(),
        PickerMode::FileList,
        &tree,
        &IngestConfig::default(),
    );

    ingestor.ingest_directory("").await.unwrap();

    let children = tree.snapshot();
    assert_eq!(names(&children), vec![folder.as_str()]);
    let files: BTreeMap<String, String> = flatten(&children).into_iter().collect();
    assert!(files.contains_key(&format!("{folder}/src/components/Button.tsx")));
    assert!(!files.keys().any(|p| p.contains("/.git/")));
}

#[tokio::test]
async fn file_list_round_trip_matches_disk() {
    let temp = project();
    let config = IngestConfig {
        excluded_names: Vec::new(),
        ..IngestConfig::default()
    };
    let tree = SharedTree::default();
    let (ingestor, _rx) = ingestor(temp.path(), PickerMode::FileList, &tree, &config);
    ingestor.ingest_directory("").await.unwrap();

    let on_disk: Vec<String> = {
        let mut paths: Vec<String> = list_relative_files(temp.path(), &config.exclusions())
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        paths.sort();
        paths
    };
    let mut ingested: Vec<String> = flatten(&tree.snapshot()).into_iter().map(|(p, _)| p).collect();
    ingested.sort();
    assert_eq!(ingested, on_disk);
}

#[tokio::test]
async fn oversized_files_get_size_sentinel() {
    let temp = project();
    let config = IngestConfig {
        max_file_size: 16,
        ..IngestConfig::default()
    };
    let tree = SharedTree::default();
    let (ingestor, _rx) = ingestor(temp.path(), PickerMode::DirectoryHandle, &tree, &config);
    ingestor.ingest_directory("").await.unwrap();

    let files: BTreeMap<String, String> = flatten(&tree.snapshot()).into_iter().collect();
    assert!(files["src/index.ts"].starts_with("[File too large:"));
    assert_eq!(files["src/components/Button.tsx"], "export {}\n");
    assert_eq!(files["package.json"], "{\"name\":\"demo\"}");
}

#[tokio::test]
async fn mount_path_replaces_only_target_directory() {
    let temp = project();
    let mut seeded = FileTree::new();
    seeded
        .update_directory(
            "",
            vec![
                FileSystemNode::directory("vendor", vec![FileSystemNode::file("stale.js", "old")]),
                FileSystemNode::file("notes.md", "keep me"),
            ],
        )
        .unwrap();
    let tree = SharedTree::new(seeded);
    let (ingestor, _rx) = ingestor(
        temp.path(),
        PickerMode::DirectoryHandle,
        &tree,
        &IngestConfig::default(),
    );

    ingestor.ingest_directory("vendor").await.unwrap();

    let vendor = tree.read(|t| t.directory("vendor").cloned()).unwrap();
    assert_eq!(names(&vendor.children), vec!["package.json", "src"]);
    let files: BTreeMap<String, String> = flatten(&tree.snapshot()).into_iter().collect();
    assert_eq!(files["notes.md"], "keep me");
    assert!(!files.contains_key("vendor/stale.js"));
}

#[tokio::test]
async fn unknown_mount_path_leaves_tree_unchanged() {
    let temp = project();
    let tree = SharedTree::default();
    let (ingestor, mut rx) = ingestor(
        temp.path(),
        PickerMode::DirectoryHandle,
        &tree,
        &IngestConfig::default(),
    );

    let err = ingestor.ingest_directory("missing/dir").await.unwrap_err();
    assert!(matches!(err, ApiError::MountPathNotFound(_)));
    assert!(tree.snapshot().is_empty());
    assert!(matches!(
        drain(&mut rx).last(),
        Some(Notice::Error(msg)) if msg.starts_with("Failed to open folder:")
    ));
    assert!(!ingestor.is_busy());
}

#[cfg(unix)]
#[tokio::test]
async fn decomposed_names_are_normalized() {
    let temp = TempDir::new().unwrap();
    // "e" followed by a combining acute accent
    fs::write(temp.path().join("cafe\u{301}.txt"), "x").unwrap();
    let tree = SharedTree::default();
    let (ingestor, _rx) = ingestor(
        temp.path(),
        PickerMode::DirectoryHandle,
        &tree,
        &IngestConfig::default(),
    );
    ingestor.ingest_directory("").await.unwrap();
    assert_eq!(names(&tree.snapshot()), vec!["caf\u{e9}.txt"]);
}
