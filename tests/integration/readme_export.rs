use std::fs;

use async_trait::async_trait;
use graft::error::ApiError;
use graft::ingest::{DirectoryIngestor, IngestConfig};
use graft::notify::TracingNotifier;
use graft::provider::{GenerationOptions, ReadmeService, TextGenerator};
use graft::source::local::{LocalPicker, PickerMode};
use graft::summary::SummaryConfig;
use graft::tree::export::write_to_dir;
use graft::tree::{SharedTree, TreeConsumer};
use parking_lot::Mutex;
use std::sync::Arc;
use tempfile::TempDir;

struct EchoGenerator {
    seen: Arc<Mutex<Option<String>>>,
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ApiError> {
        assert_eq!(options.top_k, 40);
        *self.seen.lock() = Some(prompt.to_string());
        Ok("# Demo\n\nGenerated.".to_string())
    }
}

#[tokio::test]
async fn ingest_generate_readme_and_export() {
    let source = TempDir::new().unwrap();
    fs::create_dir_all(source.path().join("lib")).unwrap();
    fs::write(source.path().join("lib/util.js"), "module.exports = 1;\n").unwrap();
    fs::write(source.path().join("index.js"), "require('./lib/util');\n").unwrap();

    let tree = SharedTree::default();
    let ingestor = DirectoryIngestor::new(
        Box::new(LocalPicker::new(source.path(), PickerMode::DirectoryHandle)),
        Box::new(tree.clone()),
        Box::new(TracingNotifier),
        &IngestConfig::default(),
    );
    ingestor.ingest_directory("").await.unwrap();

    let seen = Arc::new(Mutex::new(None));
    let service = ReadmeService::new(
        Box::new(EchoGenerator { seen: seen.clone() }),
        GenerationOptions::default(),
        SummaryConfig::default(),
    );
    service.generate_readme(&tree, &TracingNotifier).await.unwrap();

    let prompt = seen.lock().clone().unwrap();
    assert!(prompt.contains("Project Structure:"));
    assert!(prompt.contains("module.exports = 1;"));

    let dest = TempDir::new().unwrap();
    let written = write_to_dir(&tree.snapshot(), dest.path()).unwrap();
    assert_eq!(written, 3);
    assert_eq!(
        fs::read_to_string(dest.path().join("README.md")).unwrap(),
        "# Demo\n\nGenerated."
    );
    assert_eq!(
        fs::read_to_string(dest.path().join("lib/util.js")).unwrap(),
        "module.exports = 1;\n"
    );
}
