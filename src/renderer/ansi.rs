//! ANSI escape sequence builders.
//!
//! Every sequence this crate ever emits lives here: cursor motion, the
//! minimal SGR diff between two packed `Style`s, screen clear/alt-screen
//! toggles, cursor visibility, and the mouse-reporting mode selected at
//! compile time by the `mouse-*` Cargo features.

use crate::renderer::buffer::EscapeBuffer;
use crate::style::{Color, Style, StyleFlags};
use crate::error::Result;

/// Number of decimal digits in `n`, treating 0 as one digit. Used to price
/// a cursor move against re-emitting a run of unchanged cells.
pub fn digits(n: u16) -> usize {
    let mut n = n;
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

/// `move_cost = digits(x+1) + digits(y+1) + 3` — the `3` accounts for
/// `ESC [ ... ; ... H`'s fixed punctuation.
pub fn move_cost(x: u16, y: u16) -> usize {
    digits(x + 1) + digits(y + 1) + 3
}

/// Per-cell cursor move: `ESC[{y+1};{x+1}H`.
pub fn cursor_move(x: u16, y: u16) -> Result<EscapeBuffer> {
    let mut buf = EscapeBuffer::new();
    buf.push_str("\x1b[")?;
    buf.push_str(itoa(y as u32 + 1).as_str())?;
    buf.push_str(";")?;
    buf.push_str(itoa(x as u32 + 1).as_str())?;
    buf.push_str("H")?;
    Ok(buf)
}

/// The end-of-frame tidy move: `ESC[{height};{width}H`, using the raw
/// dimensions, not `+1` — distinct from the per-cell move above.
pub fn tidy_move(width: u16, height: u16) -> Result<EscapeBuffer> {
    let mut buf = EscapeBuffer::new();
    buf.push_str("\x1b[")?;
    buf.push_str(itoa(height as u32).as_str())?;
    buf.push_str(";")?;
    buf.push_str(itoa(width as u32).as_str())?;
    buf.push_str("H")?;
    Ok(buf)
}

fn itoa(mut n: u32) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(b'0' + (n % 10) as u8);
        n /= 10;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap()
}

pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[0;0H";

pub const ENTER_ALT_SCREEN: &str = "\x1b[?1049h";
pub const EXIT_ALT_SCREEN: &str = "\x1b[?1049l";

pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";

pub const SGR_RESET: &str = "\x1b[0m";

/// The mouse-reporting enable/disable pair selected by the `mouse-*`
/// feature active in this build. Exactly one is compiled in, matching one
/// of the four sequences the wire format allows: basic tracking (1000),
/// button-event tracking (1002), any-event tracking (1003), or SGR
/// extended encoding (1006).
#[cfg(feature = "mouse-basic")]
pub const MOUSE_ENABLE: &str = "\x1b[?1000h";
#[cfg(feature = "mouse-basic")]
pub const MOUSE_DISABLE: &str = "\x1b[?1000l";

#[cfg(feature = "mouse-button")]
pub const MOUSE_ENABLE: &str = "\x1b[?1002h";
#[cfg(feature = "mouse-button")]
pub const MOUSE_DISABLE: &str = "\x1b[?1002l";

#[cfg(feature = "mouse-any")]
pub const MOUSE_ENABLE: &str = "\x1b[?1003h";
#[cfg(feature = "mouse-any")]
pub const MOUSE_DISABLE: &str = "\x1b[?1003l";

#[cfg(feature = "mouse-sgr")]
pub const MOUSE_ENABLE: &str = "\x1b[?1006h";
#[cfg(feature = "mouse-sgr")]
pub const MOUSE_DISABLE: &str = "\x1b[?1006l";

fn on_off_code(flag: StyleFlags) -> (u8, u8) {
    match flag {
        StyleFlags::BOLD => (1, 22),
        StyleFlags::DIM => (2, 22),
        StyleFlags::ITALIC => (3, 23),
        StyleFlags::UNDERLINE => (4, 24),
        StyleFlags::BLINK => (5, 25),
        StyleFlags::REVERSE => (7, 27),
        StyleFlags::HIDDEN => (8, 28),
        StyleFlags::STRIKETHROUGH => (9, 29),
        _ => unreachable!("on_off_code called with a non-singleton flag"),
    }
}

const ALL_FLAGS: [StyleFlags; 8] = [
    StyleFlags::BOLD,
    StyleFlags::DIM,
    StyleFlags::ITALIC,
    StyleFlags::UNDERLINE,
    StyleFlags::BLINK,
    StyleFlags::REVERSE,
    StyleFlags::HIDDEN,
    StyleFlags::STRIKETHROUGH,
];

/// Emit the minimal SGR sequence turning `from` into `to`. Writes nothing if
/// the two styles are already equal. Flags that turn off share the bold/dim
/// `22` reset code the way real terminals only offer one "un-bold-or-dim"
/// code, so turning off one of a co-active bold+dim pair must not clear the
/// other — this re-applies the still-active one immediately after.
pub fn sgr_diff(from: Style, to: Style) -> Result<EscapeBuffer> {
    let mut buf = EscapeBuffer::new();
    if from == to {
        return Ok(buf);
    }

    let mut codes: Vec<u16> = Vec::new();

    if from.fg() != to.fg() {
        codes.push(to.fg().fg_code());
    }
    if from.bg() != to.bg() {
        codes.push(to.bg().bg_code());
    }

    let from_flags = from.flags();
    let to_flags = to.flags();
    let mut reapply_after_shared_off = false;

    for flag in ALL_FLAGS {
        let was = from_flags.contains(flag);
        let now = to_flags.contains(flag);
        if was == now {
            continue;
        }
        let (on, off) = on_off_code(flag);
        if now {
            codes.push(on as u16);
        } else {
            codes.push(off as u16);
            if (flag == StyleFlags::BOLD && to_flags.contains(StyleFlags::DIM))
                || (flag == StyleFlags::DIM && to_flags.contains(StyleFlags::BOLD))
            {
                reapply_after_shared_off = true;
            }
        }
    }

    if codes.is_empty() && !reapply_after_shared_off {
        return Ok(buf);
    }

    buf.push_str("\x1b[")?;
    for (i, code) in codes.iter().enumerate() {
        if i > 0 {
            buf.push_str(";")?;
        }
        buf.push_str(itoa(*code as u32).as_str())?;
    }
    buf.push_str("m")?;

    if reapply_after_shared_off {
        if to_flags.contains(StyleFlags::BOLD) {
            buf.push_str("\x1b[1m")?;
        }
        if to_flags.contains(StyleFlags::DIM) {
            buf.push_str("\x1b[2m")?;
        }
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_of_single_and_multi() {
        assert_eq!(digits(0), 1);
        assert_eq!(digits(9), 1);
        assert_eq!(digits(10), 2);
        assert_eq!(digits(99), 2);
        assert_eq!(digits(100), 3);
    }

    #[test]
    fn move_cost_matches_worked_example() {
        // 80x24 context, 0-indexed (79, 23) -> "80;24" -> digits(80)+digits(24)+3 = 2+2+3 = 7
        assert_eq!(move_cost(79, 23), 7);
    }

    #[test]
    fn cursor_move_is_one_indexed() {
        let buf = cursor_move(0, 0).unwrap();
        assert_eq!(buf.as_bytes(), b"\x1b[1;1H");
    }

    #[test]
    fn tidy_move_is_not_incremented() {
        let buf = tidy_move(80, 24).unwrap();
        assert_eq!(buf.as_bytes(), b"\x1b[24;80H");
    }

    #[test]
    fn sgr_diff_empty_when_equal() {
        let s = Style::new(Color::Red, Color::Default, StyleFlags::BOLD);
        let buf = sgr_diff(s, s).unwrap();
        assert!(buf.as_bytes().is_empty());
    }

    #[test]
    fn sgr_diff_fg_only() {
        let from = Style::DEFAULT;
        let to = Style::new(Color::Green, Color::Default, StyleFlags::empty());
        let buf = sgr_diff(from, to).unwrap();
        assert_eq!(buf.as_bytes(), b"\x1b[32m");
    }

    #[test]
    fn sgr_diff_turning_off_bold_reapplies_dim() {
        let from = Style::new(Color::Default, Color::Default, StyleFlags::BOLD | StyleFlags::DIM);
        let to = Style::new(Color::Default, Color::Default, StyleFlags::DIM);
        let buf = sgr_diff(from, to).unwrap();
        assert_eq!(buf.as_bytes(), b"\x1b[22m\x1b[2m");
    }
}
