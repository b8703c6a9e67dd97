//! Built-in browser actions.
//!
//! Each action is a thin adapter from validated oracle arguments to one
//! [`PageDriver`](crate::PageDriver) call. Output is pre-formatted and
//! pre-truncated here; the dispatcher and session never reshape it.

pub mod click;
pub mod extract_text;
pub mod navigate;
pub mod page_info;
pub mod type_text;

#[cfg(test)]
pub(crate) mod test_support;

/// Truncate action output before it reaches the oracle.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}\n[output truncated at {max_chars} characters]")
}
