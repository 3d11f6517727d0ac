mod openai_transcriber;

pub use openai_transcriber::OpenAiTranscriber;
