//! Application model types: `App` and `InputMode`.
//!
//! `App` holds the terminal-only state: the list cursor, the add-files
//! prompt and popup toggles. Playback state lives in the transport
//! controller.

use std::env;
use std::path::PathBuf;

const SPINNER: &[&str] = &["◐", "◓", "◑", "◒"];

/// Where key presses go.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// The add-files prompt has focus; shortcuts are suppressed.
    Prompt,
}

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    /// Cursor position in the playlist.
    pub selected: usize,
    /// Cursor jumps to the current track whenever it changes.
    pub follow_playback: bool,
    pub mode: InputMode,
    pub prompt: String,
    pub metadata_window: bool,
    spin: usize,
}

impl App {
    pub fn new(follow_playback: bool) -> Self {
        Self {
            follow_playback,
            ..Self::default()
        }
    }

    /// Keep the cursor inside a playlist of `len` tracks.
    pub fn clamp_selected(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Move the cursor onto `current` when following playback.
    pub fn follow(&mut self, current: Option<usize>) {
        if let (true, Some(i)) = (self.follow_playback, current) {
            self.selected = i;
        }
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.follow_playback = false;
        self.selected = (self.selected + 1) % len;
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.follow_playback = false;
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn top(&mut self) {
        self.follow_playback = false;
        self.selected = 0;
    }

    pub fn bottom(&mut self, len: usize) {
        self.follow_playback = false;
        self.selected = len.saturating_sub(1);
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    pub fn is_prompting(&self) -> bool {
        self.mode == InputMode::Prompt
    }

    pub fn open_prompt(&mut self) {
        self.mode = InputMode::Prompt;
        self.prompt.clear();
    }

    pub fn push_prompt_char(&mut self, c: char) {
        self.prompt.push(c);
    }

    pub fn pop_prompt_char(&mut self) {
        self.prompt.pop();
    }

    pub fn cancel_prompt(&mut self) {
        self.mode = InputMode::Normal;
        self.prompt.clear();
    }

    /// Close the prompt and return the paths typed into it.
    pub fn submit_prompt(&mut self) -> Vec<PathBuf> {
        let paths = parse_paths(&self.prompt);
        self.cancel_prompt();
        paths
    }

    /// Advance the now-playing spinner by one frame while audio is playing.
    pub fn tick_spinner(&mut self, spinning: bool) {
        if spinning {
            self.spin = (self.spin + 1) % SPINNER.len();
        }
    }

    pub fn spinner_glyph(&self) -> &'static str {
        SPINNER[self.spin % SPINNER.len()]
    }
}

/// Split prompt input into paths. Entries are separated by `;`, may be
/// quoted, and a leading `~/` expands to `$HOME`.
pub fn parse_paths(input: &str) -> Vec<PathBuf> {
    input
        .split(';')
        .map(|s| s.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|s| !s.is_empty())
        .map(expand_home)
        .collect()
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}
