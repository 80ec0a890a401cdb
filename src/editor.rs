//! Line editor module
//!
//! A small modal text editor used wherever the app captures free text:
//! the endpoint filter, parameter values, the request body and the source
//! and token modals. It provides:
//! - Insert mode with character, word and line motions
//! - A vim-style normal mode for multi-line editors
//! - Batching of rapid character input (terminal paste without bracketed
//!   paste support) behind a [`FlushTimer`]
//! - Smart quote normalization for JSON bodies
//!
//! Cursor positions count characters, not bytes.

use std::fmt;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;

/// Default window in which typed characters are coalesced
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(8);

/// Scheduler for flushing batched input.
///
/// The editor arms the timer when characters are buffered and asks it
/// whether the deadline passed on every tick.
pub trait FlushTimer: fmt::Debug {
    fn arm(&mut self, delay: Duration);
    fn disarm(&mut self);
    fn is_armed(&self) -> bool;
    fn expired(&self, now: Instant) -> bool;
    /// Time left until the deadline, `None` when not armed
    fn remaining(&self, now: Instant) -> Option<Duration>;
}

/// Wall-clock [`FlushTimer`]; re-arming pushes the deadline back
#[derive(Debug, Default)]
pub struct DeadlineTimer {
    deadline: Option<Instant>,
}

impl FlushTimer for DeadlineTimer {
    fn arm(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    fn disarm(&mut self) {
        self.deadline = None;
    }

    fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    fn expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    /// No newlines, insert mode only
    SingleLine,
    /// Newlines allowed, insert and normal modes
    MultiLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Insert,
    Normal,
}

/// What the owner should do after a key was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Continue,
    Commit(String),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Whitespace,
    Word,
    Punctuation,
}

fn char_class(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Whitespace
    } else if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

/// Start of the next word after `pos`, or `chars.len()` if there is none
fn find_word_forward(chars: &[char], pos: usize) -> usize {
    if pos >= chars.len() {
        return chars.len();
    }
    let start_class = char_class(chars[pos]);
    let mut p = pos;
    while p < chars.len() && char_class(chars[p]) == start_class {
        p += 1;
    }
    while p < chars.len() && char_class(chars[p]) == CharClass::Whitespace {
        p += 1;
    }
    p
}

/// Start of the word before `pos`
fn find_word_backward(chars: &[char], pos: usize) -> usize {
    let mut p = pos.min(chars.len());
    if p == 0 {
        return 0;
    }
    p -= 1;
    while p > 0 && char_class(chars[p]) == CharClass::Whitespace {
        p -= 1;
    }
    let word_class = char_class(chars[p]);
    while p > 0 && char_class(chars[p - 1]) == word_class {
        p -= 1;
    }
    p
}

/// Converts curly quotes to straight quotes for JSON compatibility
pub fn normalize_quotes(s: &str) -> String {
    s.replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
}

/// Pretty-print `text` as JSON, or report why it is not valid JSON
pub fn prettify_json(text: &str) -> Result<String, String> {
    serde_json::from_str::<Value>(text)
        .and_then(|json| serde_json::to_string_pretty(&json))
        .map_err(|e| format!("Invalid JSON: {e}"))
}

fn is_printable(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(_))
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

#[derive(Debug)]
pub struct LineEditor {
    chars: Vec<char>,
    cursor: usize,
    mode: EditorMode,
    kind: EditorKind,

    /// Typed characters not yet spliced into `chars`
    pending: String,
    timer: Box<dyn FlushTimer>,
    batch_delay: Duration,
    normalize_quotes: bool,
}

impl LineEditor {
    fn with_kind(kind: EditorKind, initial: &str) -> Self {
        let chars: Vec<char> = match kind {
            EditorKind::SingleLine => initial.chars().filter(|c| *c != '\n').collect(),
            EditorKind::MultiLine => initial.chars().collect(),
        };
        Self {
            cursor: chars.len(),
            chars,
            mode: EditorMode::Insert,
            kind,
            pending: String::new(),
            timer: Box::new(DeadlineTimer::default()),
            batch_delay: DEFAULT_BATCH_DELAY,
            normalize_quotes: false,
        }
    }

    /// Editor for a filter, parameter value or modal field
    pub fn single_line(initial: &str) -> Self {
        Self::with_kind(EditorKind::SingleLine, initial)
    }

    /// Editor for a request body
    pub fn multi_line(initial: &str) -> Self {
        Self::with_kind(EditorKind::MultiLine, initial)
    }

    pub fn with_timer(mut self, timer: Box<dyn FlushTimer>) -> Self {
        self.timer = timer;
        self
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Replace smart quotes in batched and pasted text
    pub fn with_quote_normalization(mut self) -> Self {
        self.normalize_quotes = true;
        self
    }

    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Buffer contents without any pending batch, for rendering
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Current value with every buffered character applied
    pub fn value(&mut self) -> String {
        self.flush();
        self.text()
    }

    /// Apply the pending batch now
    pub fn flush(&mut self) {
        self.timer.disarm();
        if self.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.pending);
        self.insert_str(&batch);
    }

    /// Flush if the batch window elapsed. Returns true when text changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.timer.expired(now) && self.has_pending() {
            self.flush();
            true
        } else {
            if self.timer.expired(now) {
                self.timer.disarm();
            }
            false
        }
    }

    /// How long the event loop may sleep before the next flush is due
    pub fn next_flush_in(&self, now: Instant) -> Option<Duration> {
        if self.has_pending() {
            self.timer.remaining(now)
        } else {
            None
        }
    }

    /// Line and column (both in characters) of the cursor
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.chars[..self.cursor.min(self.chars.len())];
        let line = before.iter().filter(|c| **c == '\n').count();
        let col = before.iter().rev().take_while(|c| **c != '\n').count();
        (line, col)
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().split('\n').map(str::to_string).collect()
    }

    /// Insert a string at the cursor (bracketed paste or a flushed batch)
    pub fn insert_str(&mut self, s: &str) {
        let text = if self.normalize_quotes {
            normalize_quotes(s)
        } else {
            s.to_string()
        };
        let inserted: Vec<char> = match self.kind {
            EditorKind::SingleLine => text.chars().filter(|c| *c != '\n' && *c != '\r').collect(),
            EditorKind::MultiLine => text.chars().filter(|c| *c != '\r').collect(),
        };
        let at = self.cursor.min(self.chars.len());
        let tail = self.chars.split_off(at);
        self.cursor = at + inserted.len();
        self.chars.extend(inserted);
        self.chars.extend(tail);
    }

    /// Handle a bracketed paste event
    pub fn handle_paste(&mut self, text: &str) {
        self.flush();
        if self.mode == EditorMode::Normal {
            self.mode = EditorMode::Insert;
        }
        self.insert_str(text);
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.pending.clear();
        self.cursor = 0;
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> EditOutcome {
        if self.mode == EditorMode::Insert && is_printable(&key) {
            if let KeyCode::Char(c) = key.code {
                self.pending.push(c);
                self.timer.arm(self.batch_delay);
            }
            return EditOutcome::Continue;
        }

        // Control actions see every character typed before them
        if key.code == KeyCode::Esc && self.kind == EditorKind::SingleLine {
            return self.cancel();
        }
        self.flush();

        match self.mode {
            EditorMode::Insert => self.handle_insert_key(key),
            EditorMode::Normal => self.handle_normal_key(key),
        }
    }

    fn cancel(&mut self) -> EditOutcome {
        self.timer.disarm();
        self.pending.clear();
        EditOutcome::Cancel
    }

    fn commit(&mut self) -> EditOutcome {
        let value = self.value();
        self.timer.disarm();
        EditOutcome::Commit(value)
    }

    fn handle_insert_key(&mut self, key: KeyEvent) -> EditOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Enter => match self.kind {
                EditorKind::SingleLine => return self.commit(),
                EditorKind::MultiLine => self.insert_str("\n"),
            },
            KeyCode::Esc => {
                self.mode = EditorMode::Normal;
                self.clamp_normal();
            }
            KeyCode::Backspace if alt => self.delete_word_before_cursor(),
            KeyCode::Backspace => self.delete_char_before_cursor(),
            KeyCode::Delete => self.delete_char_after_cursor(),
            KeyCode::Left if ctrl || alt => {
                self.cursor = find_word_backward(&self.chars, self.cursor);
            }
            KeyCode::Right if ctrl || alt => {
                self.cursor = find_word_forward(&self.chars, self.cursor);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.chars.len()),
            KeyCode::Up if self.kind == EditorKind::MultiLine => self.move_line(-1),
            KeyCode::Down if self.kind == EditorKind::MultiLine => self.move_line(1),
            KeyCode::Home => self.cursor = self.line_start(),
            KeyCode::End => self.cursor = self.line_end(),
            KeyCode::Char('a') if ctrl => self.cursor = self.line_start(),
            KeyCode::Char('e') if ctrl => self.cursor = self.line_end(),
            KeyCode::Char('w') if ctrl => self.delete_word_before_cursor(),
            KeyCode::Char('l') if ctrl => self.clear(),
            KeyCode::Tab if self.kind == EditorKind::MultiLine => self.insert_str("  "),
            _ => {}
        }
        EditOutcome::Continue
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> EditOutcome {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => return self.commit(),
            KeyCode::Char('h') | KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Char('l') | KeyCode::Right => self.cursor += 1,
            KeyCode::Char('j') | KeyCode::Down => self.move_line(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_line(-1),
            KeyCode::Char('w') => self.cursor = find_word_forward(&self.chars, self.cursor),
            KeyCode::Char('b') => self.cursor = find_word_backward(&self.chars, self.cursor),
            KeyCode::Char('0') => self.cursor = self.line_start(),
            KeyCode::Char('$') => {
                self.cursor = self.line_end().saturating_sub(1).max(self.line_start());
            }
            KeyCode::Char('x') => {
                if self.cursor < self.chars.len() {
                    self.chars.remove(self.cursor);
                }
            }
            KeyCode::Char('i') => {
                self.mode = EditorMode::Insert;
                return EditOutcome::Continue;
            }
            KeyCode::Char('a') => {
                self.mode = EditorMode::Insert;
                self.cursor = (self.cursor + 1).min(self.chars.len());
                return EditOutcome::Continue;
            }
            KeyCode::Char('I') => {
                self.mode = EditorMode::Insert;
                self.cursor = self.line_start();
                return EditOutcome::Continue;
            }
            KeyCode::Char('A') => {
                self.mode = EditorMode::Insert;
                self.cursor = self.line_end();
                return EditOutcome::Continue;
            }
            _ => {}
        }
        self.clamp_normal();
        EditOutcome::Continue
    }

    /// Keep the cursor on a character (or at 0 for empty text)
    fn clamp_normal(&mut self) {
        self.cursor = self.cursor.min(self.chars.len().saturating_sub(1));
    }

    fn delete_char_before_cursor(&mut self) {
        if self.cursor == 0 || self.chars.is_empty() {
            return;
        }
        self.cursor = self.cursor.min(self.chars.len()) - 1;
        self.chars.remove(self.cursor);
    }

    /// Delete the character under the cursor (delete key)
    fn delete_char_after_cursor(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    fn delete_word_before_cursor(&mut self) {
        let end = self.cursor.min(self.chars.len());
        let start = find_word_backward(&self.chars, end);
        self.chars.drain(start..end);
        self.cursor = start;
    }

    fn line_start(&self) -> usize {
        let at = self.cursor.min(self.chars.len());
        self.chars[..at]
            .iter()
            .rposition(|c| *c == '\n')
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// Index of the line's newline, or the text length on the last line
    fn line_end(&self) -> usize {
        let at = self.cursor.min(self.chars.len());
        self.chars[at..]
            .iter()
            .position(|c| *c == '\n')
            .map(|i| at + i)
            .unwrap_or(self.chars.len())
    }

    fn move_line(&mut self, delta: isize) {
        let (line, col) = self.cursor_line_col();
        let line_count = self.chars.iter().filter(|c| **c == '\n').count() + 1;
        let target = line.saturating_add_signed(delta).min(line_count - 1);
        if target == line {
            return;
        }

        let mut start = 0;
        for _ in 0..target {
            start += self.chars[start..]
                .iter()
                .position(|c| *c == '\n')
                .map(|i| i + 1)
                .unwrap_or(0);
        }
        let len = self.chars[start..]
            .iter()
            .position(|c| *c == '\n')
            .unwrap_or(self.chars.len() - start);
        self.cursor = start + col.min(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Timer that only fires when the test says so
    #[derive(Debug)]
    struct ManualTimer {
        armed: bool,
        fired: Rc<Cell<bool>>,
    }

    fn manual_timer() -> (Box<dyn FlushTimer>, Rc<Cell<bool>>) {
        let fired = Rc::new(Cell::new(false));
        let timer = ManualTimer {
            armed: false,
            fired: Rc::clone(&fired),
        };
        (Box::new(timer), fired)
    }

    impl FlushTimer for ManualTimer {
        fn arm(&mut self, _delay: Duration) {
            self.armed = true;
        }
        fn disarm(&mut self) {
            self.armed = false;
        }
        fn is_armed(&self) -> bool {
            self.armed
        }
        fn expired(&self, _now: Instant) -> bool {
            self.armed && self.fired.get()
        }
        fn remaining(&self, _now: Instant) -> Option<Duration> {
            self.armed.then_some(Duration::ZERO)
        }
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn esc() -> KeyEvent {
        code(KeyCode::Esc)
    }

    fn type_str(editor: &mut LineEditor, s: &str) {
        for c in s.chars() {
            editor.handle_key(key(c));
        }
    }

    #[test]
    fn test_new_editor_cursor_at_end() {
        let editor = LineEditor::multi_line("hello");
        assert_eq!(editor.text(), "hello");
        assert_eq!(editor.cursor(), 5);
        assert_eq!(editor.mode(), EditorMode::Insert);
    }

    #[test]
    fn test_escape_then_delete_under_cursor() {
        let mut editor = LineEditor::multi_line("hello");
        editor.handle_key(esc());
        assert_eq!(editor.mode(), EditorMode::Normal);
        assert_eq!(editor.cursor(), 4);

        editor.handle_key(key('x'));
        assert_eq!(editor.text(), "hell");
        assert_eq!(editor.cursor(), 3);
    }

    #[test]
    fn test_word_motion() {
        let mut editor = LineEditor::multi_line("hello world test");
        editor.handle_key(esc());
        editor.handle_key(key('0'));
        assert_eq!(editor.cursor(), 0);
        editor.handle_key(key('w'));
        assert_eq!(editor.cursor(), 6);
        editor.handle_key(key('w'));
        assert_eq!(editor.cursor(), 12);
        editor.handle_key(key('w'));
        assert_eq!(editor.cursor(), 15);
        editor.handle_key(key('b'));
        assert_eq!(editor.cursor(), 12);
        editor.handle_key(key('b'));
        assert_eq!(editor.cursor(), 6);
    }

    #[test]
    fn test_punctuation_is_its_own_word() {
        let mut editor = LineEditor::multi_line("foo.bar_baz(1)");
        editor.handle_key(esc());
        editor.handle_key(key('0'));
        let mut stops = Vec::new();
        for _ in 0..4 {
            editor.handle_key(key('w'));
            stops.push(editor.cursor());
        }
        assert_eq!(stops, vec![3, 4, 11, 12]);
    }

    #[test]
    fn test_normal_mode_cursor_stays_on_a_character() {
        let mut editor = LineEditor::multi_line("abc");
        editor.handle_key(esc());
        for k in ['l', 'l', 'l', '$', 'x', 'x', 'x', 'x', 'h', 'l'] {
            editor.handle_key(key(k));
            let len = editor.text().chars().count();
            assert!(editor.cursor() <= len.saturating_sub(1));
        }
        assert_eq!(editor.text(), "");
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_insert_entry_points() {
        let mut editor = LineEditor::multi_line("abc");
        editor.handle_key(esc());
        editor.handle_key(key('0'));
        editor.handle_key(key('a'));
        assert_eq!(editor.mode(), EditorMode::Insert);
        assert_eq!(editor.cursor(), 1);

        editor.handle_key(esc());
        editor.handle_key(key('A'));
        assert_eq!(editor.cursor(), 3);

        editor.handle_key(esc());
        editor.handle_key(key('I'));
        assert_eq!(editor.cursor(), 0);

        editor.handle_key(esc());
        editor.handle_key(key('i'));
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_single_line_enter_commits_and_esc_cancels() {
        let mut editor = LineEditor::single_line("pet");
        type_str(&mut editor, "s");
        assert_eq!(
            editor.handle_key(code(KeyCode::Enter)),
            EditOutcome::Commit("pets".into())
        );

        let mut editor = LineEditor::single_line("pet");
        type_str(&mut editor, "s");
        assert_eq!(editor.handle_key(esc()), EditOutcome::Cancel);
        assert!(!editor.has_pending());
    }

    #[test]
    fn test_multi_line_enter_inserts_newline() {
        let mut editor = LineEditor::multi_line("{");
        editor.handle_key(code(KeyCode::Enter));
        type_str(&mut editor, "}");
        assert_eq!(editor.value(), "{\n}");
        assert_eq!(editor.cursor_line_col(), (1, 1));

        editor.handle_key(esc());
        assert_eq!(
            editor.handle_key(code(KeyCode::Enter)),
            EditOutcome::Commit("{\n}".into())
        );
    }

    #[test]
    fn test_backspace_and_forward_delete() {
        let mut editor = LineEditor::single_line("hello");
        editor.handle_key(code(KeyCode::Backspace));
        assert_eq!(editor.text(), "hell");
        editor.handle_key(code(KeyCode::Home));
        editor.handle_key(code(KeyCode::Delete));
        assert_eq!(editor.text(), "ell");
        assert_eq!(editor.cursor(), 0);
        editor.handle_key(code(KeyCode::Backspace));
        assert_eq!(editor.text(), "ell");
    }

    #[test]
    fn test_word_delete() {
        let mut editor = LineEditor::single_line("GET /pets/{id}");
        editor.handle_key(ctrl('w'));
        assert_eq!(editor.text(), "GET /pets/{id");
        editor.handle_key(ctrl('w'));
        assert_eq!(editor.text(), "GET /pets/{");

        let mut editor = LineEditor::single_line("hello world");
        editor.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::ALT));
        assert_eq!(editor.text(), "hello ");
        assert_eq!(editor.cursor(), 6);
    }

    #[test]
    fn test_insert_word_motions() {
        let mut editor = LineEditor::single_line("one two three");
        editor.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL));
        assert_eq!(editor.cursor(), 8);
        editor.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::ALT));
        assert_eq!(editor.cursor(), 4);
        editor.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::CONTROL));
        assert_eq!(editor.cursor(), 8);
        editor.handle_key(ctrl('a'));
        assert_eq!(editor.cursor(), 0);
        editor.handle_key(ctrl('e'));
        assert_eq!(editor.cursor(), 13);
        editor.handle_key(ctrl('l'));
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn test_typed_characters_wait_for_flush() {
        let (timer, fired) = manual_timer();
        let mut editor = LineEditor::single_line("").with_timer(timer);
        type_str(&mut editor, "abc");
        assert_eq!(editor.text(), "");
        assert!(editor.has_pending());

        assert!(!editor.tick(Instant::now()));
        fired.set(true);
        assert!(editor.tick(Instant::now()));
        assert_eq!(editor.text(), "abc");
        assert_eq!(editor.cursor(), 3);
    }

    #[test]
    fn test_value_reflects_pending_input() {
        let (timer, _fired) = manual_timer();
        let mut editor = LineEditor::single_line("x").with_timer(timer);
        type_str(&mut editor, "yz");
        assert_eq!(editor.value(), "xyz");
        assert!(editor.next_flush_in(Instant::now()).is_none());
    }

    #[test]
    fn test_control_key_flushes_before_acting() {
        let (timer, _fired) = manual_timer();
        let mut editor = LineEditor::single_line("").with_timer(timer);
        type_str(&mut editor, "ab");
        editor.handle_key(code(KeyCode::Left));
        type_str(&mut editor, "X");
        assert_eq!(editor.value(), "aXb");
    }

    #[test]
    fn test_escape_in_multiline_applies_pending_batch() {
        let (timer, _fired) = manual_timer();
        let mut editor = LineEditor::multi_line("").with_timer(timer);
        type_str(&mut editor, "hi");
        editor.handle_key(esc());
        assert_eq!(editor.text(), "hi");
        assert_eq!(editor.cursor(), 1);
    }

    #[test]
    fn test_paste_inserts_directly() {
        let mut editor = LineEditor::single_line("a").with_quote_normalization();
        editor.handle_paste("\u{201C}b\u{201D}\nc");
        assert_eq!(editor.text(), "a\"b\"c");
        assert_eq!(editor.cursor(), 5);
    }

    #[test]
    fn test_multibyte_characters_count_as_one() {
        let mut editor = LineEditor::single_line("héllo😀");
        assert_eq!(editor.cursor(), 6);
        editor.handle_key(code(KeyCode::Backspace));
        assert_eq!(editor.value(), "héllo");
    }

    #[test]
    fn test_vertical_motion_keeps_column() {
        let mut editor = LineEditor::multi_line("abcd\nxy\nlonger");
        editor.handle_key(code(KeyCode::Up));
        assert_eq!(editor.cursor_line_col(), (1, 2));
        editor.handle_key(code(KeyCode::Up));
        assert_eq!(editor.cursor_line_col(), (0, 2));
        editor.handle_key(esc());
        editor.handle_key(key('j'));
        editor.handle_key(key('j'));
        assert_eq!(editor.cursor_line_col(), (2, 2));
    }

    #[test]
    fn test_smart_quote_normalization() {
        assert_eq!(
            normalize_quotes("{\u{201C}username\u{201D}:\u{2018}x\u{2019}}"),
            "{\"username\":'x'}"
        );
    }

    #[test]
    fn test_prettify_json() {
        let pretty = prettify_json(r#"{"name":"test","age":30}"#).unwrap();
        assert!(pretty.contains("  \"name\""));
        assert!(prettify_json("{invalid json").is_err());
    }
}
