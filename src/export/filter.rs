//! Non-content message detection.
//!
//! Exports interleave real messages with notices the app writes on the user's
//! behalf: encryption banners, deleted-message markers, media placeholders,
//! group events and call notices. These never become training text.

/// Lowercase substrings that mark a message as non-content.
const NON_CONTENT_MARKERS: &[&str] = &[
    "messages and calls are end-to-end encrypted",
    "<media omitted>",
    "this message was deleted",
    "you deleted this message",
    "missed voice call",
    "missed video call",
    "changed their phone number",
    "changed the subject",
    "changed this group",
    "added you",
    "removed you",
    "left the group",
    "joined using this group",
    "created this group",
    "changed the group description",
    "changed the group icon",
    "turned on disappearing messages",
    "turned off disappearing messages",
    "message timer was",
    "security code changed",
    "is now an admin",
    "gif omitted",
    "image omitted",
    "video omitted",
    "audio omitted",
    "sticker omitted",
    "document omitted",
    "contact card omitted",
    "live location shared",
    "location:",
    // Left-to-right mark the app prefixes to its own notices
    "\u{200e}",
    "null",
    "waiting for this message",
];

/// Returns true if a message should be discarded instead of emitted.
///
/// Applied to the complete message text (after continuation lines have been
/// joined), so a marker on any line drops the whole message.
pub fn is_non_content(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }
    let lower = trimmed.to_lowercase();
    NON_CONTENT_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}
