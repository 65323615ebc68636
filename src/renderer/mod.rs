//! The differential renderer: diffs `update` against `cache` one row at a
//! time and writes the minimal byte stream that brings the terminal from
//! the previous frame to the current one.

pub mod ansi;
pub mod buffer;

pub use buffer::WriteBuffer;

use crate::error::{Error, Result};
use crate::screen::Screen;
use crate::style::{Glyph, Style};
use std::io::Write;

/// Render `screen`'s pending `update` grid to `out`.
///
/// Nothing is written and `cache`/cursor/style tracking are left untouched
/// if the frame is identical to the last one (`update == cache`
/// everywhere) or if assembling the byte stream overflows the scratch
/// buffer — the caller's recovery path is `Screen::set_scratch_capacity`
/// followed by retrying this same call. `cache` only advances to `update`
/// after the whole stream has been flushed successfully, so a failed frame
/// can always be retried from a known-good state.
pub fn render(screen: &mut Screen, out: &mut dyn Write) -> Result<()> {
    screen.scratch.clear();

    let width = screen.width();
    let height = screen.height();
    let mut cursor = screen.cursor;
    let mut style = screen.style;
    let mut dirty_any = false;

    for y in 0..height {
        let row_start = y as usize * width as usize;
        let dirty: Vec<u16> = (0..width)
            .filter(|&x| {
                let idx = row_start + x as usize;
                screen.update[idx] != screen.cache[idx]
            })
            .collect();
        if dirty.is_empty() {
            continue;
        }
        dirty_any = true;

        let mut run_start = dirty[0];
        let mut run_end = dirty[0];

        for &next in &dirty[1..] {
            let gap = next - run_end - 1;
            if gap == 0 {
                run_end = next;
                continue;
            }
            let style_entering_gap = screen.update[row_start + run_end as usize].style;
            let gap_cost = estimate_gap_cost(screen, row_start, run_end, gap, style_entering_gap);
            let cost_move = ansi::move_cost(next, y);
            if gap_cost <= cost_move {
                run_end = next;
            } else {
                emit_run(screen, row_start, y, run_start, run_end, &mut cursor, &mut style)?;
                run_start = next;
                run_end = next;
            }
        }
        emit_run(screen, row_start, y, run_start, run_end, &mut cursor, &mut style)?;
    }

    if dirty_any {
        let tidy = ansi::tidy_move(width, height)?;
        screen.scratch.push_bytes(tidy.as_bytes())?;
        cursor = (width - 1, height - 1);
    }

    out.write_all(screen.scratch.as_bytes()).map_err(Error::FlushFailed)?;
    out.flush().map_err(Error::FlushFailed)?;

    if dirty_any {
        screen.cache.copy_from_slice(&screen.update);
    }
    screen.cursor = cursor;
    screen.style = style;
    Ok(())
}

/// Cost, in bytes, of reprinting an unchanged run of `gap` cells starting
/// right after `run_end` on row `row_start`, given the style the emitter
/// would be carrying into the gap. Pure: does not mutate `screen`.
fn estimate_gap_cost(screen: &Screen, row_start: usize, run_end: u16, gap: u16, mut style: Style) -> usize {
    let mut cost = 0;
    for x in (run_end + 1)..(run_end + 1 + gap) {
        let cell = screen.update[row_start + x as usize];
        if let Ok(diff) = ansi::sgr_diff(style, cell.style) {
            cost += diff.as_bytes().len();
        }
        cost += cell.ch.len_utf8();
        style = cell.style;
    }
    cost
}

/// Emit the cells `[run_start, run_end]` on row `y`, moving the cursor
/// there first if it isn't already positioned correctly, then writing each
/// cell's SGR diff (if its style differs from the carried style) followed
/// by the glyph itself.
fn emit_run(
    screen: &mut Screen,
    row_start: usize,
    y: u16,
    run_start: u16,
    run_end: u16,
    cursor: &mut (u16, u16),
    style: &mut Style,
) -> Result<()> {
    if *cursor != (run_start, y) {
        let mv = ansi::cursor_move(run_start, y)?;
        screen.scratch.push_bytes(mv.as_bytes())?;
    }

    for x in run_start..=run_end {
        let cell: Glyph = screen.update[row_start + x as usize];
        let diff = ansi::sgr_diff(*style, cell.style)?;
        if !diff.as_bytes().is_empty() {
            screen.scratch.push_bytes(diff.as_bytes())?;
            *style = cell.style;
        }
        screen.scratch.push_char(cell.ch)?;
    }

    *cursor = (run_end + 1, y);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    fn render_to_vec(screen: &mut Screen) -> Vec<u8> {
        let mut out = Vec::new();
        render(screen, &mut out).unwrap();
        out
    }

    #[test]
    fn identical_frame_is_a_no_op() {
        let mut screen = Screen::new(10, 3).unwrap();
        let bytes = render_to_vec(&mut screen);
        assert!(bytes.is_empty());
    }

    #[test]
    fn single_cell_change_moves_and_writes() {
        let mut screen = Screen::new(10, 3).unwrap();
        let pane = screen.register_pane(0, 0, 10, 3).unwrap();
        screen.set(pane, 2, 1, crate::style::Glyph::new('x', Style::DEFAULT)).unwrap();
        let bytes = render_to_vec(&mut screen);
        assert_eq!(bytes, b"\x1b[2;3Hx\x1b[3;10H".to_vec());
    }

    #[test]
    fn idempotent_second_render_is_empty() {
        let mut screen = Screen::new(10, 3).unwrap();
        let pane = screen.register_pane(0, 0, 10, 3).unwrap();
        screen.set(pane, 0, 0, crate::style::Glyph::new('z', Style::DEFAULT)).unwrap();
        let first = render_to_vec(&mut screen);
        assert!(!first.is_empty());
        let second = render_to_vec(&mut screen);
        assert!(second.is_empty());
    }

    #[test]
    fn adjacent_cells_share_one_move() {
        let mut screen = Screen::new(10, 3).unwrap();
        let pane = screen.register_pane(0, 0, 10, 3).unwrap();
        screen.set(pane, 0, 0, crate::style::Glyph::new('a', Style::DEFAULT)).unwrap();
        screen.set(pane, 1, 0, crate::style::Glyph::new('b', Style::DEFAULT)).unwrap();
        let bytes = render_to_vec(&mut screen);
        // one move to (0,0), then both chars, then the tidy move - no second move between a and b.
        assert_eq!(bytes, b"\x1b[1;1Hab\x1b[3;10H".to_vec());
    }

    #[test]
    fn style_change_emits_sgr_between_cells() {
        let mut screen = Screen::new(10, 3).unwrap();
        let pane = screen.register_pane(0, 0, 10, 3).unwrap();
        screen.set(pane, 0, 0, crate::style::Glyph::new('a', Style::DEFAULT)).unwrap();
        screen
            .set(pane, 1, 0, crate::style::Glyph::new('b', Style::new(Color::Red, Color::Default, Default::default())))
            .unwrap();
        let bytes = render_to_vec(&mut screen);
        assert_eq!(bytes, b"\x1b[1;1Ha\x1b[31mb\x1b[3;10H".to_vec());
    }

    #[test]
    fn successful_render_leaves_cache_equal_to_update() {
        let mut screen = Screen::new(20, 5).unwrap();
        let pane = screen.register_pane(0, 0, 20, 5).unwrap();
        screen.set(pane, 3, 2, crate::style::Glyph::new('q', Style::DEFAULT)).unwrap();
        render_to_vec(&mut screen);
        assert_eq!(screen.cache, screen.update);
    }

    #[test]
    fn failed_flush_leaves_cache_and_cursor_untouched() {
        struct FailingWriter;
        impl Write for FailingWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("nope"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut screen = Screen::new(5, 2).unwrap();
        let pane = screen.register_pane(0, 0, 5, 2).unwrap();
        screen.set(pane, 0, 0, crate::style::Glyph::new('x', Style::DEFAULT)).unwrap();

        let cache_before = screen.cache.clone();
        let cursor_before = screen.cursor;
        let err = render(&mut screen, &mut FailingWriter).unwrap_err();
        assert!(matches!(err, Error::FlushFailed(_)));
        assert_eq!(screen.cache, cache_before);
        assert_eq!(screen.cursor, cursor_before);
    }
}
