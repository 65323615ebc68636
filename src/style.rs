//! Glyph and style types.
//!
//! A [`Style`] packs foreground color, background color, and text attribute
//! flags into a single `u32` so the renderer's hot loop can compare two
//! styles with one word comparison instead of three field comparisons.

use bitflags::bitflags;

/// One of the 8 ANSI colors, or the terminal's own default.
///
/// `Default` is not "unset" — it is the 9th palette entry (`Color::Default`)
/// and maps to SGR codes 39/49, matching the source's "default" fg/bg slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Color {
    #[default]
    Default = 0,
    Black = 1,
    Red = 2,
    Green = 3,
    Yellow = 4,
    Blue = 5,
    Magenta = 6,
    Cyan = 7,
    White = 8,
}

impl Color {
    const fn from_bits(bits: u8) -> Self {
        match bits {
            1 => Color::Black,
            2 => Color::Red,
            3 => Color::Green,
            4 => Color::Yellow,
            5 => Color::Blue,
            6 => Color::Magenta,
            7 => Color::Cyan,
            8 => Color::White,
            _ => Color::Default,
        }
    }

    /// SGR foreground code (30-37, or 39 for default).
    pub const fn fg_code(self) -> u16 {
        match self {
            Color::Default => 39,
            c => 30 + (c as u16 - 1),
        }
    }

    /// SGR background code (40-47, or 49 for default).
    pub const fn bg_code(self) -> u16 {
        match self {
            Color::Default => 49,
            c => 40 + (c as u16 - 1),
        }
    }
}

bitflags! {
    /// Text attribute flags, packed into the high 16 bits of a [`Style`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StyleFlags: u16 {
        const BOLD          = 1 << 0;
        const DIM           = 1 << 1;
        const ITALIC        = 1 << 2;
        const UNDERLINE     = 1 << 3;
        const BLINK         = 1 << 4;
        const REVERSE       = 1 << 5;
        const HIDDEN        = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

/// A packed fg/bg/flags word.
///
/// Equality is equality of the packed `u32`, so two styles that describe the
/// same appearance through different construction paths must still compare
/// equal bit-for-bit — there is no field-by-field fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct Style(u32);

impl Style {
    pub const DEFAULT: Style = Style::new(Color::Default, Color::Default, StyleFlags::empty());

    pub const fn new(fg: Color, bg: Color, flags: StyleFlags) -> Self {
        Style((fg as u32) | ((bg as u32) << 8) | ((flags.bits() as u32) << 16))
    }

    pub const fn fg(self) -> Color {
        Color::from_bits((self.0 & 0xFF) as u8)
    }

    pub const fn bg(self) -> Color {
        Color::from_bits(((self.0 >> 8) & 0xFF) as u8)
    }

    pub const fn flags(self) -> StyleFlags {
        StyleFlags::from_bits_truncate((self.0 >> 16) as u16)
    }

    pub const fn with_fg(self, fg: Color) -> Self {
        Style::new(fg, self.bg(), self.flags())
    }

    pub const fn with_bg(self, bg: Color) -> Self {
        Style::new(self.fg(), bg, self.flags())
    }

    pub const fn with_flags(self, flags: StyleFlags) -> Self {
        Style::new(self.fg(), self.bg(), flags)
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::DEFAULT
    }
}

/// A single terminal cell: one code point plus its packed style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub style: Style,
}

impl Glyph {
    pub const fn new(ch: char, style: Style) -> Self {
        Glyph { ch, style }
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Glyph { ch: ' ', style: Style::DEFAULT }
    }
}
