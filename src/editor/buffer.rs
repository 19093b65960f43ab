use ropey::Rope;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    pub const fn new() -> Self {
        Self::at(0, 0)
    }

    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The MJML source being edited.
///
/// Every change to the text bumps [`EditorBuffer::revision`]; cursor
/// movement does not. The event loop compares revisions to decide when the
/// source has been edited.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    revision: u64,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_line_endings(text)),
            cursor: Cursor::new(),
            revision: 0,
        }
    }

    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Monotonic counter of text mutations.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of a line without its trailing newline.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let mut line = self.rope.line(line_idx).to_string();
        if line.ends_with('\n') {
            line.pop();
        }
        Some(line)
    }

    /// Length of a line in bytes, without its trailing newline.
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// True when the buffer holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.rope.chars().all(char::is_whitespace)
    }

    /// Replace the whole text, keeping the cursor where it still fits.
    ///
    /// Does nothing (and keeps the revision) when the text is unchanged.
    pub fn replace_text(&mut self, text: &str) {
        let text = normalize_line_endings(text);
        if self.rope == text.as_str() {
            return;
        }
        self.rope = Rope::from_str(&text);
        let (line, col) = (self.cursor.line, self.cursor.col);
        self.move_to(line, col);
        self.touch();
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.split_line();
            return;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, ch);
        self.cursor.set_col(self.cursor.col + ch.len_utf8());
        self.touch();
    }

    /// Insert pasted text at the cursor; `\r\n` and lone `\r` become `\n`.
    pub fn insert_str(&mut self, s: &str) {
        let s = normalize_line_endings(s);
        if s.is_empty() {
            return;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.insert(char_idx, &s);

        match s.rsplit_once('\n') {
            Some((_, tail)) => {
                self.cursor.line += s.matches('\n').count();
                self.cursor.set_col(tail.len());
            }
            None => self.cursor.set_col(self.cursor.col + s.len()),
        }
        self.touch();
    }

    /// Split the current line at the cursor (Enter).
    pub fn split_line(&mut self) {
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
        self.touch();
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor.col == 0 && self.cursor.line == 0 {
            return false;
        }

        let char_idx = self.cursor_char_idx();
        if self.cursor.col == 0 {
            let prev_line_len = self.line_len(self.cursor.line - 1);
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.line -= 1;
            self.cursor.set_col(prev_line_len);
        } else {
            let prev_char_len = self.char_len_before_cursor();
            self.rope.remove(char_idx - 1..char_idx);
            self.cursor.set_col(self.cursor.col - prev_char_len);
        }
        self.touch();
        true
    }

    /// Delete the character at the cursor (Delete).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let char_idx = self.cursor_char_idx();
        if char_idx >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(char_idx..=char_idx);
        self.touch();
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_vertical(-1),
            Direction::Down => self.move_vertical(1),
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    pub fn move_end(&mut self) {
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    /// Move to the start of the previous word (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let trimmed = line[..self.cursor.col].trim_end_matches(|c: char| !is_word_char(c));
        let pos = trimmed
            .rfind(|c: char| !is_word_char(c))
            .map_or(0, |i| i + 1);
        self.cursor.set_col(pos);
    }

    /// Move to the start of the next word (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let line = self.line_at(self.cursor.line).unwrap_or_default();
        if self.cursor.col >= line.len() {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }

        let after = &line[self.cursor.col..];
        let word_end = after.find(|c: char| !is_word_char(c)).unwrap_or(after.len());
        let rest = &after[word_end..];
        let gap = rest.find(is_word_char).unwrap_or(rest.len());
        self.cursor.set_col(self.cursor.col + word_end + gap);
    }

    /// Move to a line and byte column, clamped to the buffer.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.cursor.line = line.min(self.line_count().saturating_sub(1));
        let text = self.line_at(self.cursor.line).unwrap_or_default();
        let mut col = col.min(text.len());
        while !text.is_char_boundary(col) {
            col -= 1;
        }
        self.cursor.set_col(col);
    }

    /// Move to a line and character column, e.g. from a mouse click.
    pub fn move_to_column(&mut self, line: usize, char_col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        let text = self.line_at(line).unwrap_or_default();
        let byte_col = text
            .char_indices()
            .nth(char_col)
            .map_or(text.len(), |(idx, _)| idx);
        self.move_to(line, byte_col);
    }

    pub const fn move_to_start(&mut self) {
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    pub fn move_to_end(&mut self) {
        let last_line = self.line_count().saturating_sub(1);
        self.cursor.line = last_line;
        self.cursor.set_col(self.line_len(last_line));
    }

    const fn touch(&mut self) {
        self.revision += 1;
    }

    fn cursor_char_idx(&self) -> usize {
        let line_start = self.rope.line_to_char(self.cursor.line);
        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let byte_col = self.cursor.col.min(line.len());
        line_start + line[..byte_col].chars().count()
    }

    fn char_len_before_cursor(&self) -> usize {
        let line = self.line_at(self.cursor.line).unwrap_or_default();
        line[..self.cursor.col.min(line.len())]
            .chars()
            .next_back()
            .map_or(1, char::len_utf8)
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            let len = self.char_len_before_cursor();
            self.cursor.set_col(self.cursor.col - len);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        let line = self.line_at(self.cursor.line).unwrap_or_default();
        if let Some(ch) = line[self.cursor.col.min(line.len())..].chars().next() {
            self.cursor.set_col(self.cursor.col + ch.len_utf8());
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let Some(target) = self.cursor.line.checked_add_signed(delta) else {
            return;
        };
        if target >= self.line_count() {
            return;
        }
        self.cursor.line = target;
        let text = self.line_at(target).unwrap_or_default();
        let mut col = self.cursor.col_memory.min(text.len());
        while !text.is_char_boundary(col) {
            col -= 1;
        }
        self.cursor.col = col;
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("rope", &format_args!("Rope({} lines)", self.rope.len_lines()))
            .field("cursor", &self.cursor)
            .field("revision", &self.revision)
            .finish()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn normalize_line_endings(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}
