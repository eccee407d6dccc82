use anyhow::{anyhow, Result};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::enrichment::batch::BatchScheduler;
use crate::enrichment::client::EnrichmentClient;
use crate::enrichment::sink::{CsvSink, WriteMode};
use crate::enrichment::{Language, RunRange};
use crate::file_utils::FileManager;
use crate::grouping;
use crate::providers::openai::OpenAI;

// @module: Application controller for enrichment runs

/// Options for a single enrichment invocation
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// First ordinal to process (default 1)
    pub start: usize,

    /// Process exactly this ordinal, forcing append mode
    pub line: Option<usize>,

    /// Override of the configured batch size
    pub batch_size: Option<usize>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            start: 1,
            line: None,
            batch_size: None,
        }
    }
}

/// Main application controller for common-name enrichment
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the enrichment workflow over the configured species list
    pub async fn run(&self, options: RunOptions) -> Result<()> {
        let paths = &self.config.paths;

        info!("Loading prompt templates...");
        let en_template = FileManager::load_prompt_template(&paths.en_prompt)?;
        let ja_template = FileManager::load_prompt_template(&paths.ja_prompt)?;

        info!("Loading species list...");
        let species = FileManager::load_species_list(&paths.species_list)?;
        if species.is_empty() {
            return Err(anyhow!("Species list {:?} is empty", paths.species_list));
        }
        info!("Loaded {} scientific names", species.len());

        let (range, mode) = self.resolve_range(&options, species.len())?;
        if mode == WriteMode::Append {
            info!("Appending to existing output, starting from line {}", range.start);
        } else {
            info!("Starting line: {}", range.start);
        }

        let api_key = self.config.provider.resolve_api_key();
        if api_key.is_empty() {
            warn!("No API key configured (set OPENAI_API_KEY or provider.api_key)");
        }

        let provider = OpenAI::with_timeout(
            api_key,
            &self.config.provider.endpoint,
            Duration::from_secs(self.config.provider.timeout_secs),
        );
        let enrichment = &self.config.enrichment;
        let client = EnrichmentClient::new(Arc::new(provider), &self.config.provider.model)
            .with_max_retries(enrichment.max_retries)
            .with_backoff_base(Duration::from_secs(enrichment.backoff_base_secs))
            .with_max_tokens(enrichment.max_tokens)
            .with_temperature(enrichment.temperature);

        let batch_size = options.batch_size.unwrap_or(enrichment.batch_size);
        let scheduler = BatchScheduler::new(client, batch_size)
            .with_batch_delay(Duration::from_millis(enrichment.batch_delay_ms));

        // An unopenable output file is the one fatal storage error
        let mut sink = CsvSink::open(&paths.output, mode)?;

        info!("Starting enrichment (batch size: {})", batch_size);
        scheduler
            .run(&species, range, &en_template, &ja_template, &mut sink)
            .await?;

        info!("Finished! Processed {} species", range.len());
        Ok(())
    }

    /// Derive the run range and output mode from the invocation options
    ///
    /// A single-line run always appends. A resumed run (start > 1) appends
    /// only when the output file already exists; everything else creates.
    fn resolve_range(&self, options: &RunOptions, list_len: usize) -> Result<(RunRange, WriteMode)> {
        if let Some(line) = options.line {
            if line > list_len {
                return Err(anyhow!(
                    "Line {} is beyond the species list ({} entries)",
                    line,
                    list_len
                ));
            }
            info!("Processing single line {}", line);
            return Ok((RunRange::single(line)?, WriteMode::Append));
        }

        let range = RunRange::new(options.start, list_len)?;
        let mode = if options.start > 1 && FileManager::file_exists(&self.config.paths.output) {
            WriteMode::Append
        } else {
            WriteMode::Create
        };
        Ok((range, mode))
    }

    /// Run the grouped JSONL export for one language
    pub fn group(
        &self,
        language: Language,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> Result<()> {
        let input = input.unwrap_or_else(|| PathBuf::from(&self.config.paths.output));
        let output = output.unwrap_or_else(|| {
            let stem = match language {
                Language::English => "english_name_grouped",
                Language::Japanese => "japanese_name_grouped",
            };
            PathBuf::from(format!("{}.jsonl", stem))
        });

        let summary = grouping::group_by_common_name(&input, &output, language)?;
        info!("Grouping complete:");
        info!("  input: {:?}", input);
        info!("  output: {:?}", output);
        info!("  distinct {} names: {}", language, summary.distinct_names);
        info!("  total scientific names: {}", summary.total_names);
        Ok(())
    }
}
