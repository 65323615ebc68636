//! The pane compositor and the screen's shared cell storage.
//!
//! `Screen` owns the grid; `Pane` is a plain value handle (id + rect) that
//! is always re-bound to the `Screen` at the call site rather than holding a
//! back-reference to it — there is no cyclic pane/context ownership to fight
//! the borrow checker over.

use crate::error::{Error, Result};
use crate::renderer::WriteBuffer;
use crate::style::{Glyph, Style};

/// A registered rectangle within a [`Screen`].
///
/// `width`/`height` are exactly what was requested at registration, even if
/// the rectangle runs off the edge of the screen — only the *mask* is
/// clipped to the visible grid. Writing to the off-screen portion of such a
/// pane fails with [`Error::InvalidCoordinates`], since those cells were
/// never stamped into the render mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pane {
    id: u32,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
}

impl Pane {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }
}

/// Root screen state: the glyph grid, its render mask, and the scratch
/// buffer the renderer assembles each frame's escape sequences into.
pub struct Screen {
    width: u16,
    height: u16,
    pub(crate) update: Vec<Glyph>,
    pub(crate) cache: Vec<Glyph>,
    render_mask: Vec<u32>,
    pub(crate) scratch: WriteBuffer,
    pub(crate) cursor: (u16, u16),
    pub(crate) style: Style,
    next_pane_id: u32,
}

impl Screen {
    /// Construct a screen of the given size. Cells default to `(' ',
    /// Style::DEFAULT)`. Panes are registered against it afterward; they
    /// cannot be resized or unregistered for the context's lifetime.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions);
        }
        let len = width as usize * height as usize;
        let default_capacity = (len * 3).max(1024);
        Ok(Screen {
            width,
            height,
            update: vec![Glyph::default(); len],
            cache: vec![Glyph::default(); len],
            render_mask: vec![0; len],
            scratch: WriteBuffer::with_capacity(default_capacity),
            // Out of range on purpose: no real cell has y == height, so the
            // renderer's first dirty cell always forces a cursor move.
            cursor: (width, height),
            style: Style::DEFAULT,
            next_pane_id: 1,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Raise the scratch buffer's byte budget. The recovery path for a
    /// `WriteBufferOverflow`/`EscapeBufferOverflow`: expand, then retry the
    /// same `render` call.
    pub fn set_scratch_capacity(&mut self, bytes: usize) {
        self.scratch.set_capacity(bytes);
    }

    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Register a pane at `(x, y, w, h)`. Every cell of the rectangle that
    /// falls inside the screen is stamped with the pane's id in the render
    /// mask and reset to the default glyph; cells outside the screen are
    /// silently skipped — the pane is clipped to the screen, but its
    /// reported `width`/`height` are not.
    ///
    /// A later registration's mask writes win over an earlier one's for any
    /// cell both claim: the library does not detect overlap.
    pub fn register_pane(&mut self, x: u16, y: u16, width: u16, height: u16) -> Result<Pane> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions);
        }

        let id = self.next_pane_id;
        self.next_pane_id += 1;

        for py in 0..height {
            let Some(gy) = y.checked_add(py).filter(|&gy| gy < self.height) else { continue };
            for px in 0..width {
                let Some(gx) = x.checked_add(px).filter(|&gx| gx < self.width) else { continue };
                let idx = self.index(gx, gy);
                self.render_mask[idx] = id;
                self.update[idx] = Glyph::default();
            }
        }

        Ok(Pane { id, x, y, width, height })
    }

    /// Write one glyph through `pane` at pane-local coordinates. Fails with
    /// `InvalidCoordinates` if `(px, py)` is outside the pane (including the
    /// off-screen portion of a clipped pane) and `InvalidPane` if the target
    /// cell's mask entry no longer belongs to this pane.
    pub fn set(&mut self, pane: Pane, px: u16, py: u16, glyph: Glyph) -> Result<()> {
        if px >= pane.width || py >= pane.height {
            return Err(Error::InvalidCoordinates);
        }
        let (gx, gy) = match (pane.x.checked_add(px), pane.y.checked_add(py)) {
            (Some(gx), Some(gy)) if gx < self.width && gy < self.height => (gx, gy),
            _ => return Err(Error::InvalidCoordinates),
        };
        let idx = self.index(gx, gy);
        if self.render_mask[idx] != pane.id {
            return Err(Error::InvalidPane);
        }
        self.update[idx] = glyph;
        Ok(())
    }

    /// Write `chars` left to right starting at `(px, py)`, stopping at the
    /// pane's right edge; trailing characters are silently dropped.
    pub fn set_str(&mut self, pane: Pane, px: u16, py: u16, style: Style, chars: &str) -> Result<()> {
        for (i, ch) in chars.chars().enumerate() {
            let Some(x) = px.checked_add(i as u16) else { break };
            if x >= pane.width {
                break;
            }
            self.set(pane, x, py, Glyph::new(ch, style))?;
        }
        Ok(())
    }

    /// Reset every cell this pane still owns in the render mask back to the
    /// default glyph. Gated on mask id rather than blindly walking the
    /// pane's original rectangle, so a cell another, later-registered pane
    /// has since claimed is left untouched.
    pub fn clear(&mut self, pane: Pane) {
        for py in 0..pane.height {
            let Some(gy) = pane.y.checked_add(py).filter(|&gy| gy < self.height) else { continue };
            for px in 0..pane.width {
                let Some(gx) = pane.x.checked_add(px).filter(|&gx| gx < self.width) else { continue };
                let idx = self.index(gx, gy);
                if self.render_mask[idx] == pane.id {
                    self.update[idx] = Glyph::default();
                }
            }
        }
    }
}
