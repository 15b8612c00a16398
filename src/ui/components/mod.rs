//! Built-in widget kinds

pub mod button;
pub mod label;
pub mod panel;

pub use button::Button;
pub use label::{Label, TextSize};
pub use panel::Panel;

/// Maximum text length of labels and buttons, in bytes.
pub const TEXT_CAPACITY: usize = 32;

/// Copy as much of `text` as fits, never splitting a character.
pub(crate) fn truncated(text: &str) -> heapless::String<TEXT_CAPACITY> {
    let mut out = heapless::String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
