/// Splits a transcript into bounded text windows, one LLM call each.
/// Deterministic: the same transcript always yields the same windows, in
/// original order, covering the text exactly once.
pub trait TranscriptWindower: Send + Sync {
    fn split(&self, transcript: &str) -> Vec<String>;
}
