//! # Code Block Text
//!
//! File: cli/src/site/code_block.rs
//!
//! Guide pages render a "Copy" button inside each code block, so the block's
//! visible text ends with the button label. Both the copy action and the modal
//! viewer strip that label before using the text.
//!
use std::time::Duration;

/// Resting label of a copy button.
pub const COPY_LABEL: &str = "Copy";
/// Label shown on a copy button after a successful copy.
pub const COPIED_LABEL: &str = "Copied!";
/// How long the copied label stays up before the button is restored.
pub const COPY_FEEDBACK: Duration = Duration::from_millis(1500);
/// Message shown when the clipboard write fails.
pub const COPY_FAILED_MESSAGE: &str = "Copy failed!";

/// Text of a rendered code block with the trailing copy-button label removed.
///
/// The first `Copy` on the last line is cut together with everything after
/// it on that line; the result is then trimmed. Earlier lines are never
/// touched, so code that mentions `Copy` survives.
pub fn copyable_text(rendered: &str) -> String {
    let last_line_start = rendered.rfind('\n').map_or(0, |i| i + 1);
    let end = rendered[last_line_start..]
        .find(COPY_LABEL)
        .map_or(rendered.len(), |i| last_line_start + i);
    rendered[..end].trim().to_string()
}
