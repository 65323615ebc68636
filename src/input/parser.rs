//! Byte-level ANSI/mouse parsing.
//!
//! A hand-rolled state machine, not a buffered disambiguation parser: the
//! reader thread blocks on one byte at a time (`VMIN=1, VTIME=0`), so an
//! `ESC` is disambiguated by synchronously reading up to two more bytes
//! rather than by a timeout. Malformed or unrecognized escape sequences are
//! flushed back out as plain `Key` events for whatever bytes were consumed,
//! mirroring the source's "flush what we read" fallback.

use crate::input::event::InputEvent;
use std::io::Read;

const ESC: u8 = 0x1b;
const SGR_SEQ_CAP: usize = 32;

fn read_byte(reader: &mut dyn Read) -> std::io::Result<Option<u8>> {
    let mut b = [0u8; 1];
    loop {
        match reader.read(&mut b) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(b[0])),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Read and parse exactly one logical event (a key, or a fully-formed
/// mouse report) from `reader`. Returns `Ok(None)` on EOF before any byte
/// was read. A malformed escape sequence surfaces as the raw bytes that
/// were consumed while trying to recognize it, each as its own `Key`.
pub fn read_event(reader: &mut dyn Read) -> std::io::Result<Option<Vec<InputEvent>>> {
    let Some(b0) = read_byte(reader)? else { return Ok(None) };
    if b0 != ESC {
        return Ok(Some(vec![InputEvent::Key(b0)]));
    }

    let Some(b1) = read_byte(reader)? else { return Ok(Some(vec![InputEvent::Key(b0)])) };
    let Some(b2) = read_byte(reader)? else {
        return Ok(Some(vec![InputEvent::Key(b0), InputEvent::Key(b1)]));
    };

    if b1 == b'[' && (b2 == b'M' || b2 == b'm') {
        let mut rest = [0u8; 3];
        for slot in rest.iter_mut() {
            match read_byte(reader)? {
                Some(b) => *slot = b,
                None => return Ok(Some(vec![InputEvent::Key(b0), InputEvent::Key(b1), InputEvent::Key(b2)])),
            }
        }
        return Ok(Some(vec![parse_basic_mouse(rest)]));
    }

    if b1 == b'[' && b2 == b'<' {
        let mut seq = Vec::with_capacity(16);
        let mut final_byte = None;
        while seq.len() < SGR_SEQ_CAP {
            match read_byte(reader)? {
                Some(b @ (b'M' | b'm')) => {
                    final_byte = Some(b);
                    break;
                }
                Some(b) => seq.push(b),
                None => break,
            }
        }
        if let (Some(fb), Some((a, b, c))) = (final_byte, parse_sgr_digits(&seq)) {
            return Ok(Some(vec![InputEvent::Mouse { button: a, released: fb == b'm', x: b, y: c }]));
        }
        let mut events = vec![InputEvent::Key(b0), InputEvent::Key(b1), InputEvent::Key(b2)];
        events.extend(seq.into_iter().map(InputEvent::Key));
        if let Some(fb) = final_byte {
            events.push(InputEvent::Key(fb));
        }
        return Ok(Some(events));
    }

    Ok(Some(vec![InputEvent::Key(b0), InputEvent::Key(b1), InputEvent::Key(b2)]))
}

/// `ESC [ M Cb Cx Cy` (or `ESC [ m ...`) — the X10/legacy fixed-width
/// encoding. Each of the three data bytes is `value + 32`; `released` is
/// signaled by `Cb == 3` exactly, rather than a distinct button id, since
/// the legacy protocol has no room to name which button went up.
fn parse_basic_mouse(bytes: [u8; 3]) -> InputEvent {
    let cb = bytes[0].wrapping_sub(32);
    let cx = bytes[1].wrapping_sub(32) as u16;
    let cy = bytes[2].wrapping_sub(32) as u16;
    InputEvent::Mouse { button: cb as u16, released: cb == 3, x: cx, y: cy }
}

/// Parse the `a;b;c` decimal body of an SGR mouse report. `None` on
/// anything that isn't exactly three unsigned decimal fields.
fn parse_sgr_digits(seq: &[u8]) -> Option<(u16, u16, u16)> {
    let s = std::str::from_utf8(seq).ok()?;
    let mut parts = s.split(';');
    let a = parts.next()?.parse().ok()?;
    let b = parts.next()?.parse().ok()?;
    let c = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((a, b, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn plain_key_passes_through() {
        let mut cursor = Cursor::new(b"q".to_vec());
        let events = read_event(&mut cursor).unwrap().unwrap();
        assert_eq!(events, vec![InputEvent::Key(b'q')]);
    }

    #[test]
    fn lone_escape_at_eof_is_one_key_event() {
        let mut cursor = Cursor::new(vec![ESC]);
        let events = read_event(&mut cursor).unwrap().unwrap();
        assert_eq!(events, vec![InputEvent::Key(ESC)]);
    }

    #[test]
    fn basic_mouse_press() {
        // Cb=0 (left press), Cx=5 -> byte 37, Cy=10 -> byte 42
        let mut cursor = Cursor::new(vec![ESC, b'[', b'M', 32, 37, 42]);
        let events = read_event(&mut cursor).unwrap().unwrap();
        assert_eq!(events, vec![InputEvent::Mouse { button: 0, released: false, x: 5, y: 10 }]);
    }

    #[test]
    fn basic_mouse_release() {
        let mut cursor = Cursor::new(vec![ESC, b'[', b'M', 32 + 3, 32, 32]);
        let events = read_event(&mut cursor).unwrap().unwrap();
        assert_eq!(events, vec![InputEvent::Mouse { button: 3, released: true, x: 0, y: 0 }]);
    }

    #[test]
    fn basic_mouse_cb_seven_is_not_a_release() {
        // cb=7 shares its low two bits with cb=3 (both end in 0b11), so a
        // masked `cb & 0x03 == 3` check would wrongly call this a release.
        let mut cursor = Cursor::new(vec![ESC, b'[', b'M', 32 + 7, 32, 32]);
        let events = read_event(&mut cursor).unwrap().unwrap();
        assert_eq!(events, vec![InputEvent::Mouse { button: 7, released: false, x: 0, y: 0 }]);
    }

    #[test]
    fn basic_mouse_lowercase_m_is_dispatched_as_mouse() {
        let mut cursor = Cursor::new(vec![ESC, b'[', b'm', 32 + 3, 32, 32]);
        let events = read_event(&mut cursor).unwrap().unwrap();
        assert_eq!(events, vec![InputEvent::Mouse { button: 3, released: true, x: 0, y: 0 }]);
    }

    #[test]
    fn sgr_mouse_press_and_release() {
        let mut cursor = Cursor::new(b"\x1b[<0;12;34M".to_vec());
        let events = read_event(&mut cursor).unwrap().unwrap();
        assert_eq!(events, vec![InputEvent::Mouse { button: 0, released: false, x: 12, y: 34 }]);

        let mut cursor = Cursor::new(b"\x1b[<0;12;34m".to_vec());
        let events = read_event(&mut cursor).unwrap().unwrap();
        assert_eq!(events, vec![InputEvent::Mouse { button: 0, released: true, x: 12, y: 34 }]);
    }

    #[test]
    fn malformed_sgr_sequence_flushes_raw_keys() {
        let mut cursor = Cursor::new(b"\x1b[<nope".to_vec());
        let events = read_event(&mut cursor).unwrap().unwrap();
        assert_eq!(
            events,
            vec![
                InputEvent::Key(ESC),
                InputEvent::Key(b'['),
                InputEvent::Key(b'<'),
                InputEvent::Key(b'n'),
                InputEvent::Key(b'o'),
                InputEvent::Key(b'p'),
                InputEvent::Key(b'e'),
            ]
        );
    }

    #[test]
    fn unrecognized_escape_sequence_flushes_three_keys() {
        let mut cursor = Cursor::new(b"\x1bOP".to_vec());
        let events = read_event(&mut cursor).unwrap().unwrap();
        assert_eq!(events, vec![InputEvent::Key(ESC), InputEvent::Key(b'O'), InputEvent::Key(b'P')]);
    }
}
