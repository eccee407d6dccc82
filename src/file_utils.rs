use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

use crate::enrichment::SPECIES_PLACEHOLDER;

// @module: File and input loading utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Load the species list: one scientific name per line, blanks dropped
    ///
    /// The position of a name after blank-line filtering is its 1-based
    /// ordinal for the whole run.
    pub fn load_species_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let content = Self::read_to_string(&path)
            .with_context(|| format!("Failed to load species list: {:?}", path.as_ref()))?;
        Ok(content
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string())
            .collect())
    }

    /// Load a prompt template and check it carries the species placeholder
    pub fn load_prompt_template<P: AsRef<Path>>(path: P) -> Result<String> {
        let template = Self::read_to_string(&path)
            .with_context(|| format!("Failed to load prompt template: {:?}", path.as_ref()))?;
        if !template.contains(SPECIES_PLACEHOLDER) {
            return Err(anyhow!(
                "Prompt template {:?} is missing the {} placeholder",
                path.as_ref(),
                SPECIES_PLACEHOLDER
            ));
        }
        Ok(template)
    }
}
