//! Fixed-width ASCII loading bars.

use std::io::{self, Write};
use std::iter::{once, repeat_n};

/// Glyph used for the unfilled part of the bar.
pub const EMPTY: char = '-';

/// A loading bar of `length` glyphs, filled with `fill` in proportion to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingBar {
    pub length: usize,
    pub fill: char,
}

impl Default for LoadingBar {
    fn default() -> Self {
        Self {
            length: 30,
            fill: '#',
        }
    }
}

impl LoadingBar {
    pub fn new(length: usize, fill: char) -> Self {
        Self { length, fill }
    }

    /// Number of fill glyphs for `value` out of `max`.
    ///
    /// `floor(length * value / max)`, clamped to `[0, length]`. NaN, negative
    /// values and a non-positive `max` yield an empty bar.
    pub fn filled(&self, value: f64, max: f64) -> usize {
        if value.is_nan() || max.is_nan() || value <= 0.0 || max <= 0.0 {
            return 0;
        }
        let filled = (self.length as f64 * value / max).floor();
        (filled as usize).min(self.length)
    }

    /// Render the bar as `" [####------]"`.
    pub fn render(&self, value: f64, max: f64) -> String {
        let Self { length, fill } = *self;
        let filled = self.filled(value, max);

        let body = repeat_n(fill, filled).chain(repeat_n(EMPTY, length - filled));
        once(' ')
            .chain(once('['))
            .chain(body)
            .chain(once(']'))
            .collect()
    }

    /// Write the bar as one line and flush, so hosts reading a pipe see it at once.
    pub fn draw(&self, value: f64, max: f64, writer: &mut impl Write) -> io::Result<()> {
        let line = self.render(value, max);
        writeln!(writer, "{line}")?;
        writer.flush()
    }
}
