use crate::application::ports::TranscriptWindower;

/// Approximate characters per model token for the expected Japanese/English
/// transcript mix. A deliberate heuristic, not a tokenizer: window sizing
/// only needs to be safely under the model's context budget, and the merge
/// contract was tuned against windows of this granularity.
pub const CHARS_PER_TOKEN: usize = 2;

/// Cuts a transcript into contiguous, non-overlapping character windows in
/// original order, each sized for one LLM call.
pub struct FixedWindowSplitter {
    max_window_chars: usize,
}

impl FixedWindowSplitter {
    pub fn new(max_window_tokens: usize) -> Self {
        Self {
            max_window_chars: max_window_tokens.saturating_mul(CHARS_PER_TOKEN).max(1),
        }
    }
}

impl TranscriptWindower for FixedWindowSplitter {
    fn split(&self, transcript: &str) -> Vec<String> {
        if transcript.chars().count() <= self.max_window_chars {
            return vec![transcript.to_string()];
        }

        let mut windows = Vec::new();
        let mut current = String::with_capacity(self.max_window_chars);
        let mut count = 0;

        for ch in transcript.chars() {
            current.push(ch);
            count += 1;
            if count == self.max_window_chars {
                windows.push(std::mem::take(&mut current));
                count = 0;
            }
        }

        if !current.is_empty() {
            windows.push(current);
        }

        windows
    }
}
