//! Property 8 — parsing an SGR mouse report is lossless for all (a, b, c)
//! in [0, 65535], for both the press and release terminator.

use gridterm::input::parser;
use gridterm::InputEvent;
use proptest::prelude::*;
use std::io::Cursor;

fn encode_sgr(a: u16, b: u16, c: u16, released: bool) -> Vec<u8> {
    let terminator = if released { 'm' } else { 'M' };
    format!("\x1b[<{a};{b};{c}{terminator}").into_bytes()
}

proptest! {
    #[test]
    fn sgr_mouse_roundtrips(a in 0u16..=65535, b in 0u16..=65535, c in 0u16..=65535, released in any::<bool>()) {
        let bytes = encode_sgr(a, b, c, released);
        let mut cursor = Cursor::new(bytes);
        let events = parser::read_event(&mut cursor).unwrap().unwrap();
        prop_assert_eq!(events, vec![InputEvent::Mouse { button: a, released, x: b, y: c }]);
    }
}
