mod components;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use std::sync::OnceLock;

use crate::app::{App, Popup, Section};
use crate::config::ThemeConfig;
use crate::form::history::HISTORY_CAPACITY;
use crate::form::{Channel, Color as FormColor, SIZE_MAX, SIZE_MIN};
use crate::theme::Theme;

// Theme is resolved once at startup from the config
static THEME: OnceLock<Theme> = OnceLock::new();

pub fn init_theme(config: &ThemeConfig) {
    let _ = THEME.set(Theme::from_config(config));
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let full = f.area();

    // Entrance effect: start scaled down and faded, grow into the full screen
    let frame = app.entrance.map(|e| e.frame());
    let area = match frame {
        Some(k) if k.scale < 1.0 => {
            let pct = (k.scale * 100.0).round() as u16;
            centered_rect(pct, pct, full)
        }
        _ => full,
    };

    let history_height = if area.height < 30 { Constraint::Min(6) } else { Constraint::Length(16) };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info line
            Constraint::Min(16),   // Form + preview
            history_height,        // History strip
            Constraint::Length(1), // Footer
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    draw_info_line(f, app, chunks[0]);
    draw_form(f, app, body[0]);
    draw_preview(f, app, body[1]);
    draw_history(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);

    if app.popup == Popup::Help {
        draw_help_popup(f);
    }

    if let Some(k) = frame {
        components::fade_area(f.buffer_mut(), area, k.opacity);
    }
}

fn section_block(title: &str, focused: bool) -> Block<'_> {
    let border_color = if focused { accent() } else { inactive() };
    let title_style = if focused {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };

    Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    // Priority: status message > render error > ready
    let line = if let Some(ref status) = app.status_message {
        let color = if status.starts_with("Download failed") { danger() } else { warning() };
        Line::from(Span::styled(status.as_str(), Style::default().fg(color)))
    } else if let Some(ref err) = app.render_error {
        Line::from(vec![
            Span::styled("⚠ ", Style::default().fg(danger())),
            Span::styled(err.as_str(), Style::default().fg(danger())),
        ])
    } else if app.surface.is_some() {
        Line::from(Span::styled("Enter creates · Ctrl-S downloads", Style::default().fg(text_dim())))
    } else {
        Line::from(Span::styled("Ready", Style::default().fg(text_dim())))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" QR Code Generator ", Style::default().fg(header()).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Text
            Constraint::Length(3), // Foreground
            Constraint::Length(3), // Background
            Constraint::Length(3), // Size
            Constraint::Min(3),    // Actions
        ])
        .split(inner);

    draw_text_input(f, app, rows[0]);
    draw_color_input(f, app, rows[1], Section::Foreground);
    draw_color_input(f, app, rows[2], Section::Background);
    draw_size_slider(f, app, rows[3]);
    draw_actions(f, app, rows[4]);
}

fn draw_text_input(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.section == Section::Text;
    let cursor = if focused { "_" } else { "" };

    let line = if app.form.text.is_empty() && !focused {
        Line::from(Span::styled("Enter content...", Style::default().fg(text_dim())))
    } else {
        // Keep the tail visible when the text outgrows the box
        let room = area.width.saturating_sub(3) as usize;
        let count = app.form.text.chars().count();
        let shown: String = app.form.text.chars().skip(count.saturating_sub(room)).collect();
        Line::from(vec![
            Span::styled(shown, Style::default().fg(text())),
            Span::styled(cursor, Style::default().fg(accent())),
        ])
    };

    let input = Paragraph::new(line).block(section_block(" Content ", focused));
    f.render_widget(input, area);
}

fn draw_color_input(f: &mut Frame, app: &App, area: Rect, section: Section) {
    let focused = app.section == section;
    let (title, color) = match section {
        Section::Background => (" Background Color ", app.form.bg_color),
        _ => (" Foreground Color ", app.form.fg_color),
    };

    let mut spans = vec![
        components::swatch(color),
        Span::raw(" "),
    ];

    match (&app.hex_input, focused) {
        (Some(buffer), true) => {
            spans.push(Span::styled(format!("#{}_", buffer), Style::default().fg(accent()).add_modifier(Modifier::BOLD)));
        }
        _ => {
            spans.push(Span::styled(color.to_hex(), Style::default().fg(text())));
            spans.push(Span::styled("  ", Style::default()));
            spans.extend(channel_spans(color, focused.then_some(app.channel)));
        }
    }

    let picker = Paragraph::new(Line::from(spans)).block(section_block(title, focused));
    f.render_widget(picker, area);
}

fn channel_spans(color: FormColor, selected: Option<Channel>) -> Vec<Span<'static>> {
    [Channel::Red, Channel::Green, Channel::Blue]
        .into_iter()
        .flat_map(|ch| {
            let style = if selected == Some(ch) {
                Style::default().fg(accent()).bg(bg_selected()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(text_dim())
            };
            [
                Span::styled(format!("{} {:>3}", ch.label(), color.channel(ch)), style),
                Span::raw(" "),
            ]
        })
        .collect()
}

fn draw_size_slider(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.section == Section::Size;
    let ratio = app.form.size.saturating_sub(SIZE_MIN) as f64 / (SIZE_MAX - SIZE_MIN) as f64;

    let gauge = Gauge::default()
        .block(section_block(" QR Code Size ", focused))
        .gauge_style(Style::default().fg(if focused { accent() } else { inactive() }))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(Span::styled(format!("{}px", app.form.size), Style::default().fg(text())));
    f.render_widget(gauge, area);
}

fn draw_actions(f: &mut Frame, app: &App, area: Rect) {
    let create_style = if app.form.has_content() {
        Style::default().fg(success()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };

    let mut spans = vec![
        Span::styled("[ ", Style::default().fg(text_dim())),
        Span::styled("Enter = Create QR Code", create_style),
        Span::styled(" ]", Style::default().fg(text_dim())),
    ];

    // Download only makes sense while something is drawn
    if app.surface.is_some() {
        spans.extend([
            Span::styled("  [ ", Style::default().fg(text_dim())),
            Span::styled("Ctrl-S = Download", Style::default().fg(accent()).add_modifier(Modifier::BOLD)),
            Span::styled(" ]", Style::default().fg(text_dim())),
        ]);
    }

    let actions = Paragraph::new(vec![Line::from(""), Line::from(spans)]).alignment(Alignment::Center);
    f.render_widget(actions, area);
}

fn draw_preview(f: &mut Frame, app: &App, area: Rect) {
    let title = match &app.surface {
        Some(s) => format!(" Preview {}×{}px ", s.width(), s.height()),
        None => " Preview ".to_string(),
    };
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(header())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let content: Vec<Line> = match (&app.surface, &app.render_error) {
        (Some(surface), _) => components::qr_lines(
            surface.matrix(),
            surface.fg_color(),
            surface.bg_color(),
            inner.width,
            inner.height,
        ),
        (None, Some(err)) => vec![Line::from(Span::styled(err.as_str(), Style::default().fg(danger())))],
        (None, None) => vec![Line::from(Span::styled(
            "Type something to generate a code",
            Style::default().fg(text_dim()),
        ))],
    };

    let top_pad = inner.height.saturating_sub(content.len() as u16) / 2;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(top_pad), Constraint::Min(0)])
        .split(inner);

    f.render_widget(Paragraph::new(content).alignment(Alignment::Center), rows[1]);
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.section == Section::History;
    let title = format!(" QR Code History ({}/{}) ", app.history.len(), HISTORY_CAPACITY);
    let block = section_block(&title, focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.history.is_empty() {
        let empty = Paragraph::new(Span::styled("  No codes created yet", Style::default().fg(text_dim())));
        f.render_widget(empty, inner);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(inner);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, HISTORY_CAPACITY as u32); HISTORY_CAPACITY])
        .split(rows[0]);

    for (i, (entry, column)) in app.history.iter().zip(columns.iter()).enumerate() {
        let selected = focused && i == app.selected_entry;
        let thumb_rows = column.height.saturating_sub(1);

        let mut lines: Vec<Line> = match app.thumbnails.get(i).and_then(|t| t.as_ref()) {
            Some(thumb) => components::qr_lines(
                thumb.matrix(),
                thumb.fg_color(),
                thumb.bg_color(),
                column.width.saturating_sub(1),
                thumb_rows,
            ),
            None => vec![Line::from(Span::styled("(too long)", Style::default().fg(danger())))],
        };

        let label_style = if selected {
            Style::default().fg(text()).bg(bg_selected()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(text_dim())
        };
        lines.push(Line::from(Span::styled(entry.label(), label_style)));

        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), *column);
    }

    // Details of the selected entry
    let details = match app.history.get(app.selected_entry) {
        Some(entry) if focused => Line::from(vec![
            Span::styled(entry.text.as_str(), Style::default().fg(text())),
            Span::styled(" │ ", Style::default().fg(text_dim())),
            components::swatch(entry.fg_color),
            Span::styled(format!(" {} ", entry.fg_color), Style::default().fg(text_dim())),
            components::swatch(entry.bg_color),
            Span::styled(format!(" {} ", entry.bg_color), Style::default().fg(text_dim())),
            Span::styled(" │ ", Style::default().fg(text_dim())),
            Span::styled(format!("{}px", entry.size), Style::default().fg(text_dim())),
            Span::styled(" │ ", Style::default().fg(text_dim())),
            Span::styled(format_created_at(entry.created_at), Style::default().fg(text_dim())),
        ]),
        _ => Line::from(Span::styled("Tab to the history to inspect an entry", Style::default().fg(text_dim()))),
    };
    f.render_widget(Paragraph::new(details).wrap(Wrap { trim: true }), rows[1]);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: &[(&str, &str)] = match app.section {
        Section::Text => &[("Tab", "next field"), ("Enter", "create"), ("Ctrl-S", "download"), ("F1", "help"), ("Esc", "quit")],
        Section::Foreground | Section::Background if app.is_typing_hex() => {
            &[("0-9 a-f", "hex digits"), ("Backspace", "delete"), ("Esc", "cancel")]
        }
        Section::Foreground | Section::Background => {
            &[("←/→", "channel"), ("↑/↓", "±1"), ("PgUp/PgDn", "±16"), ("#", "type hex"), ("Tab", "next")]
        }
        Section::Size => &[("←/→", "±1px"), ("PgUp/PgDn", "±10px"), ("Home/End", "min/max"), ("Tab", "next")],
        Section::History => &[("←/→", "select"), ("Enter", "create"), ("Tab", "next"), ("?", "help")],
    };

    let mut spans = Vec::new();
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(inactive())));
        }
        spans.push(Span::styled(*key, Style::default().fg(accent())));
        spans.push(Span::styled(format!(" {}", desc), Style::default().fg(text_dim())));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", k), Style::default().fg(accent())),
            Span::raw(desc),
        ])
    };
    let heading = |t: &'static str| {
        Line::from(Span::styled(t, Style::default().fg(header()).add_modifier(Modifier::BOLD)))
    };

    let help_text = vec![
        heading("═══ Form ═══"),
        key("Tab", "Next field (Content → Colors → Size → History)"),
        key("Shift-Tab", "Previous field"),
        key("Enter", "Create QR code and add it to history"),
        key("Ctrl-S / F2", "Download the current code as PNG"),
        Line::from(""),
        heading("═══ Colors ═══"),
        key("←/→", "Pick channel (R, G, B)"),
        key("↑/↓", "Adjust channel by 1"),
        key("PgUp/PgDn", "Adjust channel by 16"),
        key("#", "Type a hex color (6 digits)"),
        Line::from(""),
        heading("═══ Size ═══"),
        key("←/→", "Adjust by 1px"),
        key("PgUp/PgDn", "Adjust by 10px"),
        key("Home/End", "100px / 400px"),
        Line::from(""),
        heading("═══ History ═══"),
        key("←/→", "Select entry to inspect"),
        Line::from(""),
        heading("═══ CLI ═══"),
        key("qrsmith TEXT --export out.png", ""),
        key("qrsmith TEXT --json", ""),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("F1", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" qrsmith Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

/// Wall-clock time of day (UTC) for a creation timestamp
fn format_created_at(millis: u64) -> String {
    let secs = (millis / 1000) % 86_400;
    format!("{:02}:{:02}:{:02} UTC", secs / 3600, (secs / 60) % 60, secs % 60)
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
