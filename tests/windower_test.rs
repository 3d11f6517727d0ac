use caresight::application::ports::TranscriptWindower;
use caresight::infrastructure::text_processing::{CHARS_PER_TOKEN, FixedWindowSplitter};

const SMALL_TOKEN_BUDGET: usize = 5;

#[test]
fn given_transcript_under_budget_when_split_then_returns_single_identical_window() {
    let splitter = FixedWindowSplitter::new(100);
    let transcript = "A short session.";

    let windows = splitter.split(transcript);

    assert_eq!(windows, vec![transcript.to_string()]);
}

#[test]
fn given_empty_transcript_when_split_then_returns_single_empty_window() {
    let splitter = FixedWindowSplitter::new(100);

    let windows = splitter.split("");

    assert_eq!(windows, vec![String::new()]);
}

#[test]
fn given_long_transcript_when_split_then_windows_cover_text_exactly_once_in_order() {
    let splitter = FixedWindowSplitter::new(SMALL_TOKEN_BUDGET);
    let transcript = "abcdefghijklmnopqrstuvwxyz0123456789";

    let windows = splitter.split(transcript);

    assert!(windows.len() > 1);
    let rejoined: String = windows.concat();
    assert_eq!(rejoined, transcript);
}

#[test]
fn given_long_transcript_when_split_then_each_window_respects_char_budget() {
    let splitter = FixedWindowSplitter::new(SMALL_TOKEN_BUDGET);
    let max_chars = SMALL_TOKEN_BUDGET * CHARS_PER_TOKEN;
    let transcript = "abcdefghijklmnopqrstuvwxyz0123456789";

    let windows = splitter.split(transcript);

    for window in &windows {
        assert!(window.chars().count() <= max_chars);
    }
}

#[test]
fn given_multibyte_transcript_when_split_then_windows_respect_char_boundaries() {
    let splitter = FixedWindowSplitter::new(SMALL_TOKEN_BUDGET);
    let transcript = "今日はカウンセリングのセッションを振り返ります。よろしくお願いします。";

    let windows = splitter.split(transcript);

    let rejoined: String = windows.concat();
    assert_eq!(rejoined, transcript);
}

#[test]
fn given_same_transcript_when_split_twice_then_windows_are_identical() {
    let splitter = FixedWindowSplitter::new(SMALL_TOKEN_BUDGET);
    let transcript = "deterministic windowing is part of the contract, always";

    assert_eq!(splitter.split(transcript), splitter.split(transcript));
}
