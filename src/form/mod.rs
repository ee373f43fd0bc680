pub mod color;
pub mod history;

pub use color::{Channel, Color};

/// Smallest size the size slider allows, in pixels
pub const SIZE_MIN: u32 = 100;
/// Largest size the size slider allows, in pixels
pub const SIZE_MAX: u32 = 400;
/// Size used when nothing else is configured
pub const SIZE_DEFAULT: u32 = 200;

/// The four values the user edits. Every setter is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub text: String,
    pub fg_color: Color,
    pub bg_color: Color,
    pub size: u32,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            text: String::new(),
            fg_color: Color::BLACK,
            bg_color: Color::WHITE,
            size: SIZE_DEFAULT,
        }
    }
}

impl FormState {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_fg_color(&mut self, color: Color) {
        self.fg_color = color;
    }

    pub fn set_bg_color(&mut self, color: Color) {
        self.bg_color = color;
    }

    /// Set the size, clamped to the slider range
    pub fn set_size(&mut self, size: u32) {
        self.size = clamp_size(size);
    }

    /// Move the size slider by `delta` steps
    pub fn step_size(&mut self, delta: i64) {
        let size = (self.size as i64 + delta).clamp(SIZE_MIN as i64, SIZE_MAX as i64);
        self.size = size as u32;
    }

    /// Whether "create" would do anything
    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

pub fn clamp_size(size: u32) -> u32 {
    size.clamp(SIZE_MIN, SIZE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_blank_form() {
        let form = FormState::default();
        assert!(form.text.is_empty());
        assert_eq!(form.fg_color.to_hex(), "#000000");
        assert_eq!(form.bg_color.to_hex(), "#ffffff");
        assert_eq!(form.size, 200);
    }

    #[test]
    fn test_size_setter_clamps() {
        let mut form = FormState::default();
        form.set_size(50);
        assert_eq!(form.size, SIZE_MIN);
        form.set_size(9000);
        assert_eq!(form.size, SIZE_MAX);
        form.set_size(250);
        assert_eq!(form.size, 250);
    }

    #[test]
    fn test_step_size_stays_in_range() {
        let mut form = FormState::default();
        form.set_size(395);
        form.step_size(10);
        assert_eq!(form.size, SIZE_MAX);
        form.set_size(SIZE_MIN);
        form.step_size(-1);
        assert_eq!(form.size, SIZE_MIN);
        form.step_size(1);
        assert_eq!(form.size, 101);
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let mut form = FormState::default();
        form.set_text("  spaced \t");
        assert_eq!(form.text, "  spaced \t");
        assert!(form.has_content());

        form.set_text(" \t\n ");
        assert!(!form.has_content());
    }
}
