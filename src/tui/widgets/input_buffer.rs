//! Single-line text input with a byte-indexed cursor kept on char boundaries.

#[derive(Debug, Default, Clone)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Replace the content, cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.content = text.to_string();
        self.cursor = self.content.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Text before and after the cursor, for rendering a caret between them.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.content.split_at(self.cursor)
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputBuffer {
        let mut buf = InputBuffer::new();
        text.chars().for_each(|c| buf.insert_char(c));
        buf
    }

    #[test]
    fn test_insert_and_cursor() {
        let buf = typed("pika");
        assert_eq!(buf.text(), "pika");
        assert_eq!(buf.cursor_position(), 4);
    }

    #[test]
    fn test_backspace_multibyte() {
        let mut buf = typed("flabébé");
        buf.backspace();
        assert_eq!(buf.text(), "flabéb");
        buf.move_left();
        buf.backspace();
        assert_eq!(buf.text(), "flabb");
        assert_eq!(buf.cursor_position(), 4);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut buf = typed("a");
        buf.move_home();
        buf.backspace();
        assert_eq!(buf.text(), "a");
    }

    #[test]
    fn test_delete_under_cursor() {
        let mut buf = typed("éevee");
        buf.move_home();
        buf.delete();
        assert_eq!(buf.text(), "evee");
        buf.move_end();
        buf.delete();
        assert_eq!(buf.text(), "evee");
    }

    #[test]
    fn test_movement() {
        let mut buf = typed("abc");
        buf.move_home();
        assert_eq!(buf.cursor_position(), 0);
        buf.move_left();
        assert_eq!(buf.cursor_position(), 0);
        buf.move_end();
        assert_eq!(buf.cursor_position(), 3);
        buf.move_right();
        assert_eq!(buf.cursor_position(), 3);
        buf.move_left();
        assert_eq!(buf.split_at_cursor(), ("ab", "c"));
    }

    #[test]
    fn test_whitespace_is_content() {
        let mut buf = InputBuffer::new();
        assert!(buf.is_empty());
        buf.insert_char(' ');
        assert!(!buf.is_empty());
    }

    #[test]
    fn test_set_text_and_clear() {
        let mut buf = InputBuffer::new();
        buf.set_text("25");
        assert_eq!(buf.cursor_position(), 2);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.cursor_position(), 0);
    }
}
