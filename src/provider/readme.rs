//! README generation from the mounted tree.

use crate::error::ApiError;
use crate::notify::{Notice, Notifier};
use crate::provider::{GenerationOptions, TextGenerator};
use crate::summary::{readme_prompt, SummaryConfig};
use crate::tree::mount::TreeConsumer;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

pub const README_NAME: &str = "README.md";

struct Busy<'a>(&'a AtomicBool);

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Generates a README for the current tree and mounts it at the root.
pub struct ReadmeService {
    generator: Box<dyn TextGenerator>,
    options: GenerationOptions,
    summary: SummaryConfig,
    busy: AtomicBool,
}

impl ReadmeService {
    pub fn new(
        generator: Box<dyn TextGenerator>,
        options: GenerationOptions,
        summary: SummaryConfig,
    ) -> Self {
        Self {
            generator,
            options,
            summary,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Generate README text for `tree` and place it at the root.
    ///
    /// An existing root `README.md` keeps its position and gets the new
    /// content; otherwise the file is appended. On failure the tree is
    /// unchanged.
    pub async fn generate_readme(
        &self,
        tree: &dyn TreeConsumer,
        notifier: &dyn Notifier,
    ) -> Result<String, ApiError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            let err = ApiError::GenerationInProgress;
            notifier.notify(Notice::Error(err.to_string()));
            return Err(err);
        }
        let _busy = Busy(&self.busy);

        notifier.notify(Notice::Loading("Generating README...".to_string()));
        let result = self.run(tree).await;
        notifier.notify(Notice::Dismiss);
        match &result {
            Ok(text) => {
                info!(len = text.len(), "README generated");
                notifier.notify(Notice::Success("README generated".to_string()));
            }
            Err(e) => {
                warn!(error = %e, "README generation failed");
                notifier.notify(Notice::Error(format!("Failed to generate README: {}", e)));
            }
        }
        result
    }

    async fn run(&self, tree: &dyn TreeConsumer) -> Result<String, ApiError> {
        let prompt = readme_prompt(&tree.snapshot(), &self.summary);
        let text = self.generator.generate(&prompt, &self.options).await?;
        // Write against the live tree, not the snapshot the prompt came from.
        tree.upsert_root_file(README_NAME, text.clone());
        Ok(text)
    }
}
