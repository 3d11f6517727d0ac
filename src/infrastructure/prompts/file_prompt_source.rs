use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;

use crate::application::ports::{PromptSource, PromptSourceError};

const COMPANY_VALUES_PLACEHOLDER: &str = "{{company_values}}";
const EDUCATION_PLAN_PLACEHOLDER: &str = "{{education_plan}}";

#[derive(Debug, Clone)]
pub struct PromptPaths {
    pub analysis: PathBuf,
    pub merge: PathBuf,
    pub company_values: Option<PathBuf>,
    pub education_plan: Option<PathBuf>,
}

impl PromptPaths {
    /// Conventional layout under a prompts directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            analysis: dir.join("analyze_system_prompt.md"),
            merge: dir.join("merge_system_prompt.md"),
            company_values: Some(dir.join("company_values.md")),
            education_plan: Some(dir.join("education_plan.md")),
        }
    }
}

struct CachedPrompt {
    content: String,
    mtime: Option<SystemTime>,
}

/// Loads the analysis/merge system instructions from Markdown files, caching
/// by modification time so an edited prompt takes effect on the next run
/// without a restart. `{{company_values}}` and `{{education_plan}}`
/// placeholders are substituted from sibling files; a missing file degrades
/// to empty content with a warning rather than failing the run.
pub struct FilePromptSource {
    paths: PromptPaths,
    cache: RwLock<HashMap<&'static str, CachedPrompt>>,
}

impl FilePromptSource {
    pub fn new(paths: PromptPaths) -> Self {
        Self {
            paths,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn load(&self, cache_key: &'static str, path: Option<&Path>) -> String {
        let Some(path) = path else {
            return String::new();
        };

        let current_mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok();

        {
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = cache.get(cache_key)
                && cached.mtime == current_mtime
            {
                return cached.content.clone();
            }
        }

        let content = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read prompt file");
                String::new()
            }
        };

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        cache.insert(
            cache_key,
            CachedPrompt {
                content: content.clone(),
                mtime: current_mtime,
            },
        );

        content
    }

    fn substitute_placeholders(&self, mut prompt: String) -> String {
        if prompt.contains(COMPANY_VALUES_PLACEHOLDER) {
            let values = self.load("company_values", self.paths.company_values.as_deref());
            prompt = prompt.replace(COMPANY_VALUES_PLACEHOLDER, &values);
        }
        if prompt.contains(EDUCATION_PLAN_PLACEHOLDER) {
            let plan = self.load("education_plan", self.paths.education_plan.as_deref());
            prompt = prompt.replace(EDUCATION_PLAN_PLACEHOLDER, &plan);
        }
        prompt
    }

    fn instruction(
        &self,
        cache_key: &'static str,
        path: &Path,
    ) -> Result<String, PromptSourceError> {
        let prompt = self.load(cache_key, Some(path));
        if prompt.trim().is_empty() {
            return Err(PromptSourceError::Unavailable(format!(
                "prompt file empty or missing: {}",
                path.display()
            )));
        }
        Ok(self.substitute_placeholders(prompt))
    }
}

impl PromptSource for FilePromptSource {
    fn analysis_instruction(&self) -> Result<String, PromptSourceError> {
        self.instruction("analysis", &self.paths.analysis)
    }

    fn merge_instruction(&self) -> Result<String, PromptSourceError> {
        self.instruction("merge", &self.paths.merge)
    }
}
