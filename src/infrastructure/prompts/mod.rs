mod file_prompt_source;

pub use file_prompt_source::{FilePromptSource, PromptPaths};
