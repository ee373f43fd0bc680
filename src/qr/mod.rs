//! QR rendering: form values in, a sized raster surface out.
//!
//! The symbol itself comes from the `qrcode` crate. This module only decides
//! which module every output pixel falls on and paints it with the form's
//! colors, so a surface is always exactly `size` x `size` pixels.

pub mod export;

use image::{Rgb, RgbImage};
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::form::history::HistoryEntry;
use crate::form::{Color, FormState};

/// Fixed edge length of history thumbnails, in pixels
pub const THUMBNAIL_SIZE: u32 = 80;

/// Widest quiet zone accepted, in modules
pub const MAX_MARGIN: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    #[default]
    Low,
    Medium,
    Quartile,
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Encoder settings shared by the live preview and the thumbnails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub error_correction: ErrorCorrection,
    /// Quiet zone around the symbol, in modules
    pub margin: u32,
}

/// Square grid of modules, quiet zone included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    width: usize,
    dark: Vec<bool>,
}

impl Matrix {
    pub fn encode(text: &str, options: &RenderOptions) -> Result<Self> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), options.error_correction.into())?;
        let symbol_width = code.width();
        let colors = code.to_colors();

        if options.margin > MAX_MARGIN {
            return Err(Error::Margin(options.margin));
        }
        let margin = options.margin as usize;
        let width = margin
            .checked_mul(2)
            .and_then(|m| m.checked_add(symbol_width))
            .ok_or(Error::Margin(options.margin))?;
        let cells = width.checked_mul(width).ok_or(Error::Margin(options.margin))?;
        let mut dark = vec![false; cells];

        for (i, module) in colors.iter().enumerate() {
            if *module == qrcode::Color::Dark {
                let (x, y) = (i % symbol_width, i / symbol_width);
                dark[(y + margin) * width + x + margin] = true;
            }
        }

        Ok(Self { width, dark })
    }

    /// Modules per side
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.dark[y * self.width + x]
    }
}

/// A rendered code: its module grid plus the painted raster
#[derive(Debug, Clone)]
pub struct Surface {
    matrix: Matrix,
    image: RgbImage,
    fg_color: Color,
    bg_color: Color,
}

impl Surface {
    pub fn draw(text: &str, fg_color: Color, bg_color: Color, size: u32, options: &RenderOptions) -> Result<Self> {
        let matrix = Matrix::encode(text, options)?;
        let n = matrix.width() as u64;
        let size = size.max(1);
        let scale = |px: u32| (px as u64 * n / size as u64) as usize;

        let fg = Rgb(fg_color.to_rgb8());
        let bg = Rgb(bg_color.to_rgb8());
        let image = RgbImage::from_fn(size, size, |x, y| {
            if matrix.is_dark(scale(x), scale(y)) { fg } else { bg }
        });

        Ok(Self { matrix, image, fg_color, bg_color })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn fg_color(&self) -> Color {
        self.fg_color
    }

    pub fn bg_color(&self) -> Color {
        self.bg_color
    }
}

/// Project the form onto a surface. Nothing is drawn while the text is empty.
pub fn render(form: &FormState, options: &RenderOptions) -> Result<Option<Surface>> {
    if form.text.is_empty() {
        return Ok(None);
    }
    Surface::draw(&form.text, form.fg_color, form.bg_color, form.size, options).map(Some)
}

/// Render a history entry with its own stored colors at thumbnail size
pub fn thumbnail(entry: &HistoryEntry, options: &RenderOptions) -> Result<Surface> {
    Surface::draw(&entry.text, entry.fg_color, entry.bg_color, THUMBNAIL_SIZE, options)
}
