/// Character limit for a synthesized conversation title.
const TITLE_MAX_CHARS: usize = 30;

/// Derive a conversation title from its first message: the trimmed text
/// truncated to 30 characters, with an ellipsis when longer. Char-based so
/// multi-byte input never splits a code point.
pub fn synthesize_title(text: &str) -> String {
    let trimmed = text.trim();
    let truncated: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();

    if trimmed.chars().count() > TITLE_MAX_CHARS {
        format!("{truncated}...")
    } else {
        truncated
    }
}
