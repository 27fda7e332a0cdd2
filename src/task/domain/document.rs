//! Placement of provisioned text inside a task document.

use super::TaskDomainError;

/// Heading after which new tasks are inserted by default.
pub const DEFAULT_ANCHOR: &str = "# Tasks\n\n";

/// Inserts `text` followed by a newline directly after the first occurrence
/// of `anchor`.
///
/// New entries therefore appear at the top of the list, newest first.
///
/// # Errors
///
/// Returns [`TaskDomainError::AnchorNotFound`] when the document does not
/// contain the anchor; the caller must leave the document untouched.
///
/// # Examples
///
///     use taskwright::task::domain::{insert_after_anchor, DEFAULT_ANCHOR};
///
///     let updated = insert_after_anchor("# Tasks\n\n- [ ] old\n", DEFAULT_ANCHOR, "- [ ] new")
///         .expect("anchor present");
///     assert_eq!(updated, "# Tasks\n\n- [ ] new\n- [ ] old\n");
pub fn insert_after_anchor(
    document: &str,
    anchor: &str,
    text: &str,
) -> Result<String, TaskDomainError> {
    if anchor.is_empty() {
        return Err(TaskDomainError::AnchorNotFound(anchor.to_owned()));
    }
    let Some((before, after)) = document.split_once(anchor) else {
        return Err(TaskDomainError::AnchorNotFound(anchor.to_owned()));
    };

    let mut updated = String::with_capacity(document.len() + text.len() + 1);
    updated.push_str(before);
    updated.push_str(anchor);
    updated.push_str(text);
    updated.push('\n');
    updated.push_str(after);
    Ok(updated)
}
