mod animation;
mod app;
mod config;
mod error;
mod form;
mod qr;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use config::AppConfig;
use form::{Color, FormState};

#[derive(Parser, Debug)]
#[command(name = "qrsmith")]
#[command(author = "Sean Fournier")]
#[command(version = "0.1.0")]
#[command(about = "A terminal QR code generator with live preview, history and PNG export")]
struct Args {
    /// Text to start with
    text: Option<String>,

    /// Foreground (module) color, e.g. "#112233"
    #[arg(long, value_parser = parse_color)]
    fg: Option<Color>,

    /// Background color, e.g. "#ffffff"
    #[arg(long, value_parser = parse_color)]
    bg: Option<Color>,

    /// Size in pixels (clamped to 100..=400)
    #[arg(short, long)]
    size: Option<u32>,

    /// Render TEXT to a PNG at this path and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Print the render as JSON and exit
    #[arg(long)]
    json: bool,

    /// Skip the entrance animation
    #[arg(long)]
    no_animation: bool,
}

fn parse_color(s: &str) -> std::result::Result<Color, String> {
    Color::from_hex(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so --json output stays clean)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load().unwrap_or_default();
    if args.no_animation {
        config.animation = false;
    }
    let form = initial_form(&config, &args);

    // Handle CLI-only commands
    if args.json {
        return print_json(&config, &form);
    }

    if let Some(path) = args.export {
        return export_png(&config, &form, &path).await;
    }

    // Run TUI
    run_tui(config, form).await
}

/// Config defaults, overridden by whatever was passed on the command line
fn initial_form(config: &AppConfig, args: &Args) -> FormState {
    let mut form = config.initial_form();
    if let Some(text) = &args.text {
        form.set_text(text.clone());
    }
    if let Some(fg) = args.fg {
        form.set_fg_color(fg);
    }
    if let Some(bg) = args.bg {
        form.set_bg_color(bg);
    }
    if let Some(size) = args.size {
        form.set_size(size);
    }
    form
}

fn render_required(config: &AppConfig, form: &FormState) -> Result<qr::Surface> {
    if !form.has_content() {
        anyhow::bail!("No text given (usage: qrsmith TEXT ...)");
    }
    qr::render(form, &config.render_options())?.context("Nothing was rendered")
}

fn print_json(config: &AppConfig, form: &FormState) -> Result<()> {
    let surface = render_required(config, form)?;

    let output = serde_json::json!({
        "text": form.text,
        "fg_color": form.fg_color,
        "bg_color": form.bg_color,
        "size": form.size,
        "modules": surface.matrix().width(),
        "width": surface.width(),
        "height": surface.height(),
    });

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

async fn export_png(config: &AppConfig, form: &FormState, path: &std::path::Path) -> Result<()> {
    let surface = render_required(config, form)?;
    let bytes = qr::export::encode_png(&surface)?;
    qr::export::write_to(path, &bytes).await?;
    tracing::info!("Exported {}x{} code to {}", surface.width(), surface.height(), path.display());
    println!("{}", path.display());
    Ok(())
}

async fn run_tui(config: AppConfig, form: FormState) -> Result<()> {
    ui::init_theme(&config.theme);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(config, form);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll faster while the entrance effect is playing
        let poll = if app.entrance.is_some() { 16 } else { 100 };
        if event::poll(std::time::Duration::from_millis(poll))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc if app.popup == Popup::None && !app.is_typing_hex() => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => app.handle_key(key).await,
                    }
                }
            }
        }

        app.tick();
    }
}

fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("image-x-generic")
        .show()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_seeds_form() {
        let args = Args::parse_from(["qrsmith", "hello", "--fg", "#112233", "--size", "9000"]);
        let form = initial_form(&AppConfig::default(), &args);

        assert_eq!(form.text, "hello");
        assert_eq!(form.fg_color.to_hex(), "#112233");
        assert_eq!(form.bg_color.to_hex(), "#ffffff");
        assert_eq!(form.size, form::SIZE_MAX);
    }

    #[test]
    fn test_cli_rejects_bad_color() {
        assert!(Args::try_parse_from(["qrsmith", "x", "--bg", "white"]).is_err());
    }

    #[test]
    fn test_render_required_needs_text() {
        let config = AppConfig::default();
        let blank = FormState { text: "  ".to_string(), ..FormState::default() };
        assert!(render_required(&config, &blank).is_err());

        let form = FormState { text: "ok".to_string(), size: 150, ..FormState::default() };
        let surface = render_required(&config, &form).unwrap();
        assert_eq!(surface.width(), 150);
    }

    #[tokio::test]
    async fn test_export_png_writes_file() {
        let path = std::env::temp_dir().join(format!("qrsmith-cli-{}.png", std::process::id()));
        let form = FormState { text: "cli".to_string(), size: 120, ..FormState::default() };

        export_png(&AppConfig::default(), &form, &path).await.unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (120, 120));
        let _ = std::fs::remove_file(&path);
    }
}
