//! ABV Pipeline File Emitter
//!
//! Builds the complete `_abv.yml` pipeline file from configuration: one
//! all-project CI job per configured editor, in configuration order.

use crate::abv::{AbvAllProjectCiJob, AllProjectCiAssembler};
use crate::schema::JobFile;
use tracing::info;
use yamato_core::{AbvConfig, Result};
use yamato_naming::Namer;

/// Header comment placed at the top of generated pipeline files.
pub const GENERATED_HEADER: &str =
    "# Generated by yamato-gen. Do not edit by hand; run `yamato-gen generate` instead.";

/// ABV pipeline file emitter
#[derive(Debug, Clone, Copy)]
pub struct AbvFileEmitter {
    /// Prepend [`GENERATED_HEADER`] to emitted YAML
    pub with_header: bool,
}

impl Default for AbvFileEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl AbvFileEmitter {
    /// Create an emitter that writes the generated-file header.
    #[must_use]
    pub const fn new() -> Self {
        Self { with_header: true }
    }

    /// Do not write the generated-file header.
    #[must_use]
    pub const fn without_header(mut self) -> Self {
        self.with_header = false;
        self
    }

    /// Assemble the all-project CI job for every configured editor.
    ///
    /// # Errors
    ///
    /// Fails on the first job that cannot be assembled, or with
    /// [`yamato_core::Error::DuplicateJob`] if two editors map to the same
    /// job id. Nothing is returned on failure.
    pub fn jobs<N: Namer + ?Sized>(
        &self,
        config: &AbvConfig,
        namer: &N,
    ) -> Result<Vec<AbvAllProjectCiJob>> {
        let assembler = AllProjectCiAssembler::new(namer).with_trigger_config(&config.trigger);
        config
            .editors
            .iter()
            .map(|editor| assembler.build(editor, &config.projects, &config.abv_trigger_editors))
            .collect()
    }

    /// Build the ABV pipeline file.
    ///
    /// # Errors
    ///
    /// See [`AbvFileEmitter::jobs`].
    pub fn generate<N: Namer + ?Sized>(&self, config: &AbvConfig, namer: &N) -> Result<JobFile> {
        let mut file = JobFile::new();
        for abv in self.jobs(config, namer)? {
            file.insert(abv.job_id, abv.job)?;
        }

        info!(
            path = %namer.abv_filepath(),
            jobs = file.len(),
            "Generated ABV pipeline file"
        );
        Ok(file)
    }

    /// Build and serialize the ABV pipeline file.
    ///
    /// # Errors
    ///
    /// See [`AbvFileEmitter::generate`]; also fails if serialization fails.
    pub fn emit<N: Namer + ?Sized>(&self, config: &AbvConfig, namer: &N) -> Result<String> {
        self.render(&self.generate(config, namer)?)
    }

    /// Serialize an already generated file.
    ///
    /// # Errors
    ///
    /// Returns [`yamato_core::Error::Serialization`] if serialization fails.
    pub fn render(&self, file: &JobFile) -> Result<String> {
        let yaml = file.to_yaml()?;
        if self.with_header {
            Ok(format!("{GENERATED_HEADER}\n{yaml}"))
        } else {
            Ok(yaml)
        }
    }
}
