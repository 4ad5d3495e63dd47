//! Platform abstraction layer
//!
//! The simulation only needs to know how big the drawing surface is, and
//! whether it can be drawn on at all. Browser builds wrap a canvas; native
//! builds and tests use a headless surface.

use std::cell::Cell;
use std::rc::Rc;

/// Something the game can be drawn on
pub trait DrawSurface {
    /// Drawable size in pixels, or None when no usable 2D context exists
    fn context_size(&self) -> Option<(f32, f32)>;
}

/// In-memory surface. Clones share their size, so a test can keep a handle
/// and resize the surface an engine owns.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    size: Rc<Cell<Option<(f32, f32)>>>,
}

impl HeadlessSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Rc::new(Cell::new(Some((width, height)))),
        }
    }

    /// A surface that cannot produce a 2D context
    pub fn without_context() -> Self {
        Self {
            size: Rc::new(Cell::new(None)),
        }
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.size.set(Some((width, height)));
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}

impl DrawSurface for HeadlessSurface {
    fn context_size(&self) -> Option<(f32, f32)> {
        self.size.get()
    }
}

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

#[cfg(target_arch = "wasm32")]
mod canvas {
    use web_sys::HtmlCanvasElement;

    use super::DrawSurface;

    /// A `<canvas>` element
    pub struct CanvasSurface {
        canvas: HtmlCanvasElement,
    }

    impl CanvasSurface {
        pub fn new(canvas: HtmlCanvasElement) -> Self {
            Self { canvas }
        }

        /// Match the backing store to the element's on-page size
        pub fn fit_to_client(&self) {
            let w = self.canvas.client_width().max(1) as u32;
            let h = self.canvas.client_height().max(1) as u32;
            if self.canvas.width() != w || self.canvas.height() != h {
                self.canvas.set_width(w);
                self.canvas.set_height(h);
            }
        }
    }

    impl DrawSurface for CanvasSurface {
        fn context_size(&self) -> Option<(f32, f32)> {
            self.canvas.get_context("2d").ok().flatten()?;
            Some((self.canvas.width() as f32, self.canvas.height() as f32))
        }
    }
}
