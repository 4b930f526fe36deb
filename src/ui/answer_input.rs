use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    /// The text was edited; callers re-check it against the current word.
    Changed,
    Submit,
    Cancel,
}

/// Single-line answer field with readline-style editing.
#[derive(Clone, Debug, Default)]
pub struct AnswerInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
}

impl AnswerInput {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    /// When cursor is at end of text, cursor_char is None.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        let mut rest = self.text[byte_offset..].chars();
        match rest.next() {
            Some(ch) => (
                &self.text[..byte_offset],
                Some(ch),
                &self.text[byte_offset + ch.len_utf8()..],
            ),
            None => (&self.text, None, ""),
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,

            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                if self.cursor < self.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.len(),

            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return InputResult::Continue;
                }
                self.cursor -= 1;
                self.remove_at_cursor();
                return InputResult::Changed;
            }
            KeyCode::Delete => {
                if self.cursor >= self.len() {
                    return InputResult::Continue;
                }
                self.remove_at_cursor();
                return InputResult::Changed;
            }
            KeyCode::Char('u') if ctrl => {
                if self.text.is_empty() {
                    return InputResult::Continue;
                }
                self.clear();
                return InputResult::Changed;
            }
            KeyCode::Char('w') if ctrl => {
                if self.cursor == 0 {
                    return InputResult::Continue;
                }
                self.delete_word_back();
                return InputResult::Changed;
            }
            KeyCode::Char(ch) if !ctrl => {
                let byte_offset = self.char_to_byte(self.cursor);
                self.text.insert(byte_offset, ch);
                self.cursor += 1;
                return InputResult::Changed;
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn remove_at_cursor(&mut self) {
        let byte_offset = self.char_to_byte(self.cursor);
        if let Some(ch) = self.text[byte_offset..].chars().next() {
            self.text
                .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
        }
    }

    /// Delete word before cursor (unix-word-rubout: skip whitespace, then non-whitespace).
    fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;

        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }

        let start_byte = self.char_to_byte(pos);
        let end_byte = self.char_to_byte(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(input: &mut AnswerInput, text: &str) {
        for ch in text.chars() {
            input.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn typing_cyrillic_reports_changes() {
        let mut input = AnswerInput::default();
        assert_eq!(input.handle(key(KeyCode::Char('к'))), InputResult::Changed);
        type_str(&mut input, "іт");
        assert_eq!(input.value(), "кіт");
        assert_eq!(input.cursor, 3);
    }

    #[test]
    fn insert_in_middle() {
        let mut input = AnswerInput::new("кт");
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Char('і')));
        assert_eq!(input.value(), "кіт");
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn backspace_and_delete_multibyte() {
        let mut input = AnswerInput::new("пес");
        assert_eq!(input.handle(key(KeyCode::Backspace)), InputResult::Changed);
        assert_eq!(input.value(), "пе");

        input.handle(key(KeyCode::Home));
        assert_eq!(input.handle(key(KeyCode::Backspace)), InputResult::Continue);
        assert_eq!(input.handle(key(KeyCode::Delete)), InputResult::Changed);
        assert_eq!(input.value(), "е");

        input.handle(key(KeyCode::End));
        assert_eq!(input.handle(key(KeyCode::Delete)), InputResult::Continue);
    }

    #[test]
    fn ctrl_w_deletes_word() {
        let mut input = AnswerInput::new("new york  ");
        input.handle(ctrl('w'));
        assert_eq!(input.value(), "new ");

        let mut empty = AnswerInput::default();
        assert_eq!(empty.handle(ctrl('w')), InputResult::Continue);
    }

    #[test]
    fn ctrl_u_clears() {
        let mut input = AnswerInput::new("hello world");
        assert_eq!(input.handle(ctrl('u')), InputResult::Changed);
        assert!(input.is_empty());
        assert_eq!(input.cursor, 0);
        assert_eq!(input.handle(ctrl('u')), InputResult::Continue);
    }

    #[test]
    fn cursor_movement_is_not_a_change() {
        let mut input = AnswerInput::new("abc");
        assert_eq!(input.handle(key(KeyCode::Home)), InputResult::Continue);
        assert_eq!(input.cursor, 0);
        input.handle(key(KeyCode::Left));
        assert_eq!(input.cursor, 0);
        input.handle(ctrl('e'));
        assert_eq!(input.cursor, 3);
        input.handle(key(KeyCode::Right));
        assert_eq!(input.cursor, 3);
        input.handle(ctrl('a'));
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn render_parts_positions() {
        let mut input = AnswerInput::new("abc");
        assert_eq!(input.render_parts(), ("abc", None, ""));
        input.cursor = 1;
        assert_eq!(input.render_parts(), ("a", Some('b'), "c"));
        input.cursor = 0;
        assert_eq!(input.render_parts(), ("", Some('a'), "bc"));
    }

    #[test]
    fn submit_and_cancel() {
        let mut input = AnswerInput::new("test");
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
        assert_eq!(input.value(), "test");
    }
}
