use crate::core::archive::build_archive;
use crate::core::prompt::build_prompt;
use crate::core::response::parse_fixed_files;
use crate::core::LanguageModel;
use crate::domain::model::{FixOutcome, FixRequest, FixedFiles};
use crate::utils::error::{FixerError, Result};

pub struct FixEngine<M: LanguageModel> {
    model: M,
}

impl<M: LanguageModel> FixEngine<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub async fn run(&self, request: FixRequest) -> Result<FixOutcome> {
        let fixed = self.fix(&request).await?;

        let files_changed = request
            .files
            .iter()
            .filter(|f| fixed.get(&f.path).is_some_and(|c| *c != f.content))
            .count();
        let archive = build_archive(&request.files, &fixed)?;

        tracing::info!(
            "Archive ready: {} files, {} changed, {} bytes",
            request.files.len(),
            files_changed,
            archive.len()
        );

        Ok(FixOutcome {
            archive,
            files_total: request.files.len(),
            files_changed,
        })
    }

    async fn fix(&self, request: &FixRequest) -> Result<FixedFiles> {
        if request.files.is_empty() {
            tracing::debug!("No files uploaded, skipping model call");
            return Ok(FixedFiles::new());
        }

        let prompt = build_prompt(request);
        tracing::info!(
            "Sending prompt to model ({} files, {} bytes)",
            request.files.len(),
            prompt.len()
        );

        let reply = self
            .model
            .generate(&prompt)
            .await
            .map_err(|e| FixerError::model(format!("Error calling Gemini: {}", e)))?;

        let fixed = parse_fixed_files(&reply);
        tracing::info!("Model fixed {} files", fixed.len());
        Ok(fixed)
    }
}
