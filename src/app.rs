use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::animation::Entrance;
use crate::config::AppConfig;
use crate::error::Error;
use crate::form::history::History;
use crate::form::{Channel, Color, FormState};
use crate::qr::{self, export, RenderOptions, Surface};

/// How long a status message stays in the info line
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Color channel step for PageUp/PageDown
const COLOR_COARSE_STEP: i16 = 16;
/// Size slider step for PageUp/PageDown
const SIZE_COARSE_STEP: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Text,
    Foreground,
    Background,
    Size,
    History,
}

impl Section {
    fn next(self) -> Self {
        match self {
            Section::Text => Section::Foreground,
            Section::Foreground => Section::Background,
            Section::Background => Section::Size,
            Section::Size => Section::History,
            Section::History => Section::Text,
        }
    }

    fn prev(self) -> Self {
        match self {
            Section::Text => Section::History,
            Section::Foreground => Section::Text,
            Section::Background => Section::Foreground,
            Section::Size => Section::Background,
            Section::History => Section::Size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

pub struct App {
    pub section: Section,
    pub popup: Popup,

    // What the user is editing
    pub form: FormState,

    // Live preview, re-projected from `form` after every event
    pub surface: Option<Surface>,
    pub render_error: Option<String>,

    // Created codes, newest first, with their frozen thumbnails
    pub history: History,
    pub thumbnails: Vec<Option<Surface>>,
    pub selected_entry: usize,

    // Color picker state
    pub channel: Channel,
    pub hex_input: Option<String>, // Some while typing "#rrggbb"

    pub config: AppConfig,
    pub render_options: RenderOptions,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    pub entrance: Option<Entrance>,
}

impl App {
    pub fn new(config: AppConfig, form: FormState) -> Self {
        let render_options = config.render_options();
        let entrance = config.animation.then(Entrance::start);

        let mut app = Self {
            section: Section::Text,
            popup: Popup::None,

            form,
            surface: None,
            render_error: None,

            history: History::new(),
            thumbnails: Vec::new(),
            selected_entry: 0,

            channel: Channel::Red,
            hex_input: None,

            config,
            render_options,

            status_message: None,
            status_message_time: None,

            entrance,
        };

        app.refresh_surface();
        app
    }

    /// Set a status message (auto-clears after 3 seconds)
    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// True while the color picker is taking a typed hex value
    pub fn is_typing_hex(&self) -> bool {
        self.hex_input.is_some()
    }

    /// Re-render the preview from the current form
    pub fn refresh_surface(&mut self) {
        match qr::render(&self.form, &self.render_options) {
            Ok(surface) => {
                self.surface = surface;
                self.render_error = None;
            }
            Err(e) => {
                let msg = e.to_string();
                if self.render_error.as_deref() != Some(msg.as_str()) {
                    tracing::debug!("Render failed: {}", msg);
                }
                self.surface = None;
                self.render_error = Some(msg);
            }
        }
    }

    fn refresh_thumbnails(&mut self) {
        let options = self.render_options;
        self.thumbnails = self
            .history
            .iter()
            .map(|entry| match qr::thumbnail(entry, &options) {
                Ok(surface) => Some(surface),
                Err(e) => {
                    tracing::debug!("Thumbnail for entry {:?} failed: {}", entry.id, e);
                    None
                }
            })
            .collect();
    }

    /// Snapshot the form into history. Blank text is silently ignored.
    pub fn create(&mut self) {
        let Some(id) = self.history.create(&self.form) else {
            return;
        };

        tracing::info!("Created history entry {:?} ({} chars)", id, self.form.text.chars().count());
        self.refresh_thumbnails();
        self.selected_entry = 0;
        self.set_status(format!("Created QR code ({}/{})", self.history.len(), crate::form::history::HISTORY_CAPACITY));
    }

    /// Save the current preview as a PNG in the download directory
    pub async fn download(&self) -> crate::error::Result<PathBuf> {
        let surface = self.surface.as_ref().ok_or(Error::NoSurface)?;
        let dir = self.config.download_dir();
        export::save(surface, &dir, &self.config.file_name).await
    }

    async fn download_and_report(&mut self) {
        match self.download().await {
            Ok(path) => {
                self.set_status(format!("Saved {}", path.display()));
                if self.config.notifications {
                    if let Err(e) = crate::notify("qrsmith", &format!("Saved {}", path.display())) {
                        tracing::warn!("Notification failed: {}", e);
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Download failed: {}", e);
                self.set_status(format!("Download failed: {}", e));
            }
        }
    }

    /// Handle one key press. Failures (render, download) end up in the
    /// status line, never here.
    pub async fn handle_key(&mut self, key: KeyEvent) {
        // Handle popups first
        if self.popup != Popup::None {
            self.handle_popup_key(key);
            return;
        }

        self.handle_normal_key(key).await;

        // Every event may have touched the form
        self.refresh_surface();
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        match self.popup {
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q')) {
                    self.popup = Popup::None;
                }
            }
            Popup::None => {}
        }
    }

    async fn handle_normal_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Tab => {
                self.hex_input = None;
                self.section = self.section.next();
                return;
            }
            KeyCode::BackTab => {
                self.hex_input = None;
                self.section = self.section.prev();
                return;
            }
            KeyCode::Enter => {
                self.create();
                return;
            }
            KeyCode::F(2) => {
                self.download_and_report().await;
                return;
            }
            KeyCode::Char('s') if ctrl => {
                self.download_and_report().await;
                return;
            }
            KeyCode::F(1) => {
                self.hex_input = None;
                self.popup = Popup::Help;
                return;
            }
            KeyCode::Char('?') if self.section != Section::Text && !self.is_typing_hex() => {
                self.popup = Popup::Help;
                return;
            }
            _ => {}
        }

        match self.section {
            Section::Text => self.handle_text_key(key),
            Section::Foreground | Section::Background => self.handle_color_key(key),
            Section::Size => self.handle_size_key(key),
            Section::History => self.handle_history_key(key),
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut text = std::mem::take(&mut self.form.text);
                text.push(c);
                self.form.set_text(text);
            }
            KeyCode::Backspace => {
                let mut text = std::mem::take(&mut self.form.text);
                text.pop();
                self.form.set_text(text);
            }
            _ => {}
        }
    }

    fn focused_color(&self) -> Color {
        if self.section == Section::Background {
            self.form.bg_color
        } else {
            self.form.fg_color
        }
    }

    fn set_focused_color(&mut self, color: Color) {
        if self.section == Section::Background {
            self.form.set_bg_color(color);
        } else {
            self.form.set_fg_color(color);
        }
    }

    fn handle_color_key(&mut self, key: KeyEvent) {
        if let Some(mut buffer) = self.hex_input.take() {
            match key.code {
                KeyCode::Char(c) if c.is_ascii_hexdigit() => {
                    buffer.push(c.to_ascii_lowercase());
                    if buffer.len() == 6 {
                        // Six hex digits always parse
                        if let Ok(color) = Color::from_hex(&buffer) {
                            self.set_focused_color(color);
                        }
                        return;
                    }
                }
                KeyCode::Backspace => {
                    if buffer.pop().is_none() {
                        return;
                    }
                }
                KeyCode::Esc => return,
                _ => {}
            }
            self.hex_input = Some(buffer);
            return;
        }

        let color = self.focused_color();
        match key.code {
            KeyCode::Char('#') => self.hex_input = Some(String::new()),
            KeyCode::Left => self.channel = self.channel.prev(),
            KeyCode::Right => self.channel = self.channel.next(),
            KeyCode::Up => self.set_focused_color(color.adjust(self.channel, 1)),
            KeyCode::Down => self.set_focused_color(color.adjust(self.channel, -1)),
            KeyCode::PageUp => self.set_focused_color(color.adjust(self.channel, COLOR_COARSE_STEP)),
            KeyCode::PageDown => self.set_focused_color(color.adjust(self.channel, -COLOR_COARSE_STEP)),
            _ => {}
        }
    }

    fn handle_size_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Right | KeyCode::Up => self.form.step_size(1),
            KeyCode::Left | KeyCode::Down => self.form.step_size(-1),
            KeyCode::PageUp => self.form.step_size(SIZE_COARSE_STEP),
            KeyCode::PageDown => self.form.step_size(-SIZE_COARSE_STEP),
            KeyCode::Home => self.form.set_size(crate::form::SIZE_MIN),
            KeyCode::End => self.form.set_size(crate::form::SIZE_MAX),
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        if self.history.is_empty() {
            return;
        }
        let len = self.history.len();
        match key.code {
            KeyCode::Right | KeyCode::Down => {
                self.selected_entry = (self.selected_entry + 1) % len;
            }
            KeyCode::Left | KeyCode::Up => {
                self.selected_entry = self.selected_entry.checked_sub(1).unwrap_or(len - 1);
            }
            _ => {}
        }
    }

    /// Periodic housekeeping between events
    pub fn tick(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() >= STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }

        if self.entrance.map(|e| e.is_finished()).unwrap_or(false) {
            self.entrance = None;
        }
    }
}
