use crate::api::models::{LandingPage, QrCode, QrFilter};
use crate::app::store::Store;
use crate::config::AppConfig;

#[derive(Debug, Default)]
pub struct InputState {
    pub text: String,
    pub cursor: usize,
    pub history: Vec<String>,
    pub history_index: Option<usize>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.text.len() {
            let next = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
            self.text.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn set_text(&mut self, text: String) {
        self.cursor = text.len();
        self.text = text;
    }

    /// Take the current line. Lines with a password in them (`/login`,
    /// `/signup`) are not kept in history.
    pub fn take_text(&mut self) -> String {
        let text = std::mem::take(&mut self.text);
        self.cursor = 0;
        self.history_index = None;
        if !text.is_empty() && !carries_secret(&text) {
            self.history.push(text.clone());
        }
        text
    }

    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.history_index {
            Some(i) if i > 0 => i - 1,
            Some(_) => return,
            None => self.history.len() - 1,
        };
        self.history_index = Some(idx);
        self.set_text(self.history[idx].clone());
    }

    pub fn history_down(&mut self) {
        match self.history_index {
            Some(i) if i + 1 < self.history.len() => {
                let idx = i + 1;
                self.history_index = Some(idx);
                self.set_text(self.history[idx].clone());
            }
            Some(_) => {
                self.history_index = None;
                self.clear();
            }
            None => {}
        }
    }

    pub fn delete_word_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let mut pos = self.cursor;
        while pos > 0 && self.text.as_bytes().get(pos - 1) == Some(&b' ') {
            pos -= 1;
        }
        while pos > 0 && self.text.as_bytes().get(pos - 1) != Some(&b' ') {
            pos -= 1;
        }
        self.text.drain(pos..self.cursor);
        self.cursor = pos;
    }

    /// Text as drawn: the password argument of `/login` and `/signup` is masked.
    pub fn display_text(&self) -> String {
        if !carries_secret(&self.text) {
            return self.text.clone();
        }
        let mut out = String::with_capacity(self.text.len());
        // Index of the current word; leading whitespace belongs to none.
        let mut word: Option<usize> = None;
        let mut in_space = true;
        for c in self.text.chars() {
            if c.is_whitespace() {
                in_space = true;
                out.push(c);
                continue;
            }
            if in_space {
                word = Some(word.map_or(0, |w| w + 1));
            }
            in_space = false;
            if word == Some(2) {
                // One star per byte keeps the cursor offset valid.
                out.extend(std::iter::repeat('*').take(c.len_utf8()));
            } else {
                out.push(c);
            }
        }
        out
    }
}

fn carries_secret(text: &str) -> bool {
    let cmd = text.split_whitespace().next().unwrap_or("").to_lowercase();
    matches!(cmd.as_str(), "/login" | "/signup" | "/register")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    Input,
    QrList,
    Pages,
}

/// What the analytics panel is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsScope {
    Dashboard,
    QrCode { id: String, name: String },
}

impl AnalyticsScope {
    pub fn qr_id(&self) -> Option<&str> {
        match self {
            AnalyticsScope::Dashboard => None,
            AnalyticsScope::QrCode { id, .. } => Some(id),
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub store: Store,
    pub input: InputState,
    pub focus: FocusPanel,
    pub qr_selected: usize,
    pub landing_pages: Vec<LandingPage>,
    pub page_selected: usize,
    pub filter: QrFilter,
    pub analytics_scope: Option<AnalyticsScope>,
    pub show_help: bool,
    pub should_quit: bool,
    pub dirty: bool,
    pub status_message: Option<String>,
    pub tick_count: u64,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store) -> Self {
        Self {
            config,
            store,
            input: InputState::new(),
            focus: FocusPanel::Input,
            qr_selected: 0,
            landing_pages: Vec::new(),
            page_selected: 0,
            filter: QrFilter::default(),
            analytics_scope: None,
            show_help: false,
            should_quit: false,
            dirty: true,
            status_message: None,
            tick_count: 0,
        }
    }

    pub fn selected_qr(&self) -> Option<&QrCode> {
        self.store.qr_codes().get(self.qr_selected)
    }

    pub fn selected_page(&self) -> Option<&LandingPage> {
        self.landing_pages.get(self.page_selected)
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPanel::Input => FocusPanel::QrList,
            FocusPanel::QrList => FocusPanel::Pages,
            FocusPanel::Pages => FocusPanel::Input,
        };
        self.dirty = true;
    }

    pub fn select_next(&mut self) {
        match self.focus {
            FocusPanel::QrList => {
                step_forward(&mut self.qr_selected, self.store.qr_codes().len())
            }
            FocusPanel::Pages => step_forward(&mut self.page_selected, self.landing_pages.len()),
            FocusPanel::Input => {}
        }
        self.dirty = true;
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            FocusPanel::QrList => self.qr_selected = self.qr_selected.saturating_sub(1),
            FocusPanel::Pages => self.page_selected = self.page_selected.saturating_sub(1),
            FocusPanel::Input => {}
        }
        self.dirty = true;
    }

    /// Keep selections in range after a list shrinks.
    pub fn clamp_selection(&mut self) {
        self.qr_selected = self.qr_selected.min(self.store.qr_codes().len().saturating_sub(1));
        self.page_selected = self.page_selected.min(self.landing_pages.len().saturating_sub(1));
    }

    /// Drop everything that belongs to a signed-in session and is not kept
    /// by the store itself.
    pub fn reset_session_view(&mut self) {
        self.landing_pages.clear();
        self.qr_selected = 0;
        self.page_selected = 0;
        self.analytics_scope = None;
        self.dirty = true;
    }

    pub fn status_line(&self) -> String {
        if let Some(ref msg) = self.status_message {
            return msg.clone();
        }
        let mut s = format!("QR codes: {}", self.store.qr_codes().len());
        if !self.landing_pages.is_empty() {
            s.push_str(&format!(" | Pages: {}", self.landing_pages.len()));
        }
        if !self.filter.is_empty() {
            s.push_str(&format!(" | Filter: {}", self.filter));
        }
        s
    }
}

fn step_forward(selected: &mut usize, len: usize) {
    if *selected + 1 < len {
        *selected += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_editing() {
        let mut input = InputState::new();
        for c in "héllo".chars() {
            input.insert_char(c);
        }
        input.move_left();
        input.delete_back();
        assert_eq!(input.text, "hélo");
        input.move_home();
        input.delete_forward();
        assert_eq!(input.text, "élo");
        input.move_end();
        input.insert_char(' ');
        input.insert_char('x');
        input.delete_word_back();
        assert_eq!(input.text, "élo ");
    }

    #[test]
    fn test_history_skips_credentials() {
        let mut input = InputState::new();
        input.set_text("/login demo@example.com secret".into());
        assert_eq!(input.take_text(), "/login demo@example.com secret");
        input.set_text("/refresh".into());
        input.take_text();
        assert_eq!(input.history, vec!["/refresh".to_string()]);

        input.history_up();
        assert_eq!(input.text, "/refresh");
        input.history_down();
        assert_eq!(input.text, "");
    }

    #[test]
    fn test_password_is_masked() {
        let mut input = InputState::new();
        input.set_text("/login demo@example.com secret".into());
        assert_eq!(input.display_text(), "/login demo@example.com ******");
        input.set_text("/signup a@b.co pw1234 Demo User".into());
        assert_eq!(input.display_text(), "/signup a@b.co ****** Demo User");
        input.set_text("/rename secret".into());
        assert_eq!(input.display_text(), "/rename secret");
    }

    #[test]
    fn test_leading_space_still_hides_password() {
        let mut input = InputState::new();
        input.set_text("  /login demo@example.com  secret123".into());
        assert_eq!(input.display_text(), "  /login demo@example.com  *********");
        assert_eq!(input.display_text().len(), input.text.len());

        input.set_text(" /LOGIN demo@example.com secret123".into());
        assert_eq!(input.display_text(), " /LOGIN demo@example.com *********");
        input.take_text();
        input.set_text("\t/signup a@b.co pw1234 Demo".into());
        input.take_text();
        assert!(input.history.is_empty());
    }
}
