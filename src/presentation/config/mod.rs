mod settings;

pub use settings::{
    ConfigError, DatabaseSettings, LlmSettings, PipelineSettings, ServerSettings, Settings,
    StorageProviderSetting, StorageSettings, TranscriptionSettings,
};
