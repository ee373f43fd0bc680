//! Reusable UI pieces: QR matrices as half-block text, color swatches and
//! the entrance fade.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
};

use crate::form::Color as FormColor;
use crate::qr::Matrix;

const UPPER_HALF: &str = "▀";

/// Draw a module matrix with one column per module and two module rows per
/// terminal row. Matrices too big for the box are sampled down.
pub fn qr_lines(matrix: &Matrix, fg: FormColor, bg: FormColor, max_cols: u16, max_rows: u16) -> Vec<Line<'static>> {
    let n = matrix.width();
    if n == 0 || max_cols == 0 || max_rows == 0 {
        return Vec::new();
    }

    let step = sample_step(n, max_cols as usize, max_rows as usize * 2);
    let cells = n.div_ceil(step);
    let (fg, bg): (Color, Color) = (fg.into(), bg.into());
    let color_at = |col: usize, row: usize| {
        let (x, y) = (col * step, row * step);
        if y < n && matrix.is_dark(x, y) { fg } else { bg }
    };

    (0..cells.div_ceil(2))
        .map(|term_row| {
            let spans: Vec<Span> = (0..cells)
                .map(|col| {
                    let top = color_at(col, term_row * 2);
                    let bottom = color_at(col, term_row * 2 + 1);
                    Span::styled(UPPER_HALF, Style::default().fg(top).bg(bottom))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Smallest module stride that fits `n` modules into the given cell counts
fn sample_step(n: usize, cols: usize, half_rows: usize) -> usize {
    let fit = cols.min(half_rows).max(1);
    n.div_ceil(fit).max(1)
}

/// A small block painted in the color
pub fn swatch(color: FormColor) -> Span<'static> {
    Span::styled("████", Style::default().fg(color.into()))
}

/// Fade every cell in `area` toward black by `opacity` (0.0 = invisible)
pub fn fade_area(buf: &mut Buffer, area: Rect, opacity: f32) {
    if opacity >= 1.0 {
        return;
    }
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.fg = fade(cell.fg, opacity);
                cell.bg = fade(cell.bg, opacity);
            }
        }
    }
}

fn fade(color: Color, opacity: f32) -> Color {
    let o = opacity.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => {
            let scale = |c: u8| (c as f32 * o).round() as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        Color::Reset => Color::Reset,
        // Named colors can't be scaled; keep them dark until half way in
        _ if o < 0.5 => Color::Black,
        other => other,
    }
}
