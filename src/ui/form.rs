// Labeled text fields with cyclic focus, shared by "add" and "edit"
use crate::models::Profile;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Longest value a field accepts, in characters
pub const FIELD_CHAR_LIMIT: usize = 128;

/// Labels in `Profile` attribute order
pub const PROFILE_FIELD_LABELS: [&str; 6] = [
    "Platform name",
    "Client ID",
    "Client Secret",
    "OAuth URL",
    "Base URL",
    "Audience",
];

const SECRET_FIELD: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    label: &'static str,
    value: String,
    /// Cursor position in characters
    cursor: usize,
    masked: bool,
}

impl Field {
    fn new(label: &'static str, value: &str) -> Self {
        let value: String = value.chars().take(FIELD_CHAR_LIMIT).collect();
        Self {
            label,
            cursor: value.chars().count(),
            value,
            masked: false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn set(&mut self, text: &str) {
        self.value = text.chars().take(FIELD_CHAR_LIMIT).collect();
        self.cursor = self.len();
    }

    /// Apply an editing key. Returns false when the key is not an editing key.
    fn edit(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor < self.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let at = self.byte_offset(self.cursor - 1);
                    self.value.remove(at);
                    self.cursor -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.len() {
                    let at = self.byte_offset(self.cursor);
                    self.value.remove(at);
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.value.clear();
                self.cursor = 0;
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                if self.len() < FIELD_CHAR_LIMIT {
                    let at = self.byte_offset(self.cursor);
                    self.value.insert(at, c);
                    self.cursor += 1;
                }
            }
            _ => return false,
        }
        true
    }
}

/// Bounded set of fields; exactly one is focused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    fields: Vec<Field>,
    focus: usize,
}

impl Form {
    /// Empty profile form, focus on the first field
    pub fn blank() -> Self {
        let fields = PROFILE_FIELD_LABELS
            .iter()
            .enumerate()
            .map(|(i, &label)| Field {
                masked: i == SECRET_FIELD,
                ..Field::new(label, "")
            })
            .collect();
        Self { fields, focus: 0 }
    }

    /// Form pre-filled with an existing profile's values
    pub fn from_profile(profile: &Profile) -> Self {
        let mut form = Self::blank();
        for (i, value) in profile.values().iter().enumerate() {
            form.set_value(i, value);
        }
        form
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn is_last_focused(&self) -> bool {
        self.focus + 1 == self.fields.len()
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self
            .focus
            .checked_sub(1)
            .unwrap_or(self.fields.len() - 1);
    }

    /// Replace a field's text. Out-of-range indices are ignored.
    pub fn set_value(&mut self, index: usize, text: &str) {
        if let Some(field) = self.fields.get_mut(index) {
            field.set(text);
        }
    }

    pub fn current_values(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.value.clone()).collect()
    }

    pub fn to_profile(&self) -> Profile {
        Profile::from_values(self.current_values())
    }

    /// Forward an editing key to the focused field
    pub fn edit_focused(&mut self, key: KeyEvent) -> bool {
        match self.fields.get_mut(self.focus) {
            Some(field) => field.edit(key),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut Form, text: &str) {
        for c in text.chars() {
            form.edit_focused(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_blank_form() {
        let form = Form::blank();
        assert_eq!(form.fields().len(), 6);
        assert_eq!(form.focus(), 0);
        assert!(form.current_values().iter().all(String::is_empty));
        assert_eq!(form.fields()[3].label(), "OAuth URL");
        assert!(form.fields()[2].is_masked());
        assert!(!form.fields()[0].is_masked());
    }

    #[test]
    fn test_focus_wraps_both_directions() {
        let mut form = Form::blank();
        form.focus_prev();
        assert_eq!(form.focus(), 5);
        assert!(form.is_last_focused());
        form.focus_next();
        assert_eq!(form.focus(), 0);
        for _ in 0..7 {
            form.focus_next();
        }
        assert_eq!(form.focus(), 1);
    }

    #[test]
    fn test_from_profile_prefills_in_order() {
        let profile = Profile::from_values(["dev", "id", "sec", "https://o", "https://b", "aud"]);
        let form = Form::from_profile(&profile);
        assert_eq!(form.focus(), 0);
        assert_eq!(form.current_values(), profile.values());
        assert_eq!(form.to_profile(), profile);
        assert_eq!(form.fields()[0].cursor(), 3);
    }

    #[test]
    fn test_typing_and_cursor_editing() {
        let mut form = Form::blank();
        type_text(&mut form, "dv");
        form.edit_focused(key(KeyCode::Left));
        type_text(&mut form, "e");
        assert_eq!(form.fields()[0].value(), "dev");

        form.edit_focused(key(KeyCode::Home));
        form.edit_focused(key(KeyCode::Delete));
        assert_eq!(form.fields()[0].value(), "ev");
        form.edit_focused(key(KeyCode::End));
        form.edit_focused(key(KeyCode::Backspace));
        assert_eq!(form.fields()[0].value(), "e");

        form.focus_next();
        type_text(&mut form, "client");
        assert_eq!(form.current_values()[1], "client");
        assert_eq!(form.current_values()[0], "e");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut form = Form::blank();
        type_text(&mut form, "ñé");
        form.edit_focused(key(KeyCode::Left));
        form.edit_focused(key(KeyCode::Backspace));
        assert_eq!(form.fields()[0].value(), "é");
        assert_eq!(form.fields()[0].cursor(), 0);
    }

    #[test]
    fn test_char_limit() {
        let mut form = Form::blank();
        type_text(&mut form, &"x".repeat(FIELD_CHAR_LIMIT + 10));
        assert_eq!(form.fields()[0].value().chars().count(), FIELD_CHAR_LIMIT);

        form.set_value(1, &"y".repeat(FIELD_CHAR_LIMIT * 2));
        assert_eq!(form.fields()[1].value().len(), FIELD_CHAR_LIMIT);
    }

    #[test]
    fn test_control_keys_are_not_text() {
        let mut form = Form::blank();
        type_text(&mut form, "abc");
        assert!(!form.edit_focused(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert_eq!(form.fields()[0].value(), "abc");
        assert!(form.edit_focused(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert_eq!(form.fields()[0].value(), "");
    }

    #[test]
    fn test_set_value_out_of_range_is_ignored() {
        let mut form = Form::blank();
        form.set_value(42, "nope");
        assert!(form.current_values().iter().all(String::is_empty));
    }

    #[test]
    fn test_empty_values_are_kept() {
        let form = Form::blank();
        let profile = form.to_profile();
        assert_eq!(profile, Profile::default());
    }
}
