mod fixed_window_splitter;

pub use fixed_window_splitter::{CHARS_PER_TOKEN, FixedWindowSplitter};
