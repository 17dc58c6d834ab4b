//! Double-buffered 2D fields.
//!
//! A field is a pair of equally sized surfaces. One is the current state
//! (`read`), the other is scratch space (`write`). A pass samples `read`,
//! renders into `write`, then calls [`DoubleField::swap`] so the fresh
//! result becomes current.
//!
//! The simulation keeps two fields:
//! - **velocity**: a 2D vector per texel
//! - **dye**: an RGB color per texel

use glam::Vec2;

use crate::backend::RenderBackend;

/// Read/write surface pair with its texel size.
#[derive(Debug)]
pub struct DoubleField<S> {
    read: S,
    write: S,
    width: u32,
    height: u32,
}

impl<S> DoubleField<S> {
    /// Wrap two existing surfaces of `width` x `height` texels.
    pub fn new(read: S, write: S, width: u32, height: u32) -> Self {
        Self {
            read,
            write,
            width,
            height,
        }
    }

    /// Allocate both surfaces on `backend`.
    pub fn allocate<B>(backend: &mut B, width: u32, height: u32) -> Self
    where
        B: RenderBackend<Surface = S>,
    {
        log::debug!("Allocating {}x{} double-buffered field", width, height);
        let read = backend.create_surface(width, height);
        let write = backend.create_surface(width, height);
        Self::new(read, write, width, height)
    }

    /// Current state.
    pub fn read(&self) -> &S {
        &self.read
    }

    /// Scratch target for the next pass.
    pub fn write(&self) -> &S {
        &self.write
    }

    /// Exchange roles: the surface just rendered becomes `read`.
    ///
    /// Only call after `write` has been fully rendered.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.read, &mut self.write);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reciprocal of the resolution on each axis.
    pub fn texel_size(&self) -> Vec2 {
        Vec2::new(1.0 / self.width as f32, 1.0 / self.height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RecordingBackend, SurfaceId};

    #[test]
    fn test_swap_exchanges_roles() {
        let mut field = DoubleField::new(SurfaceId(1), SurfaceId(2), 8, 8);
        field.swap();
        assert_eq!(*field.read(), SurfaceId(2));
        assert_eq!(*field.write(), SurfaceId(1));
        field.swap();
        assert_eq!(*field.read(), SurfaceId(1));
    }

    #[test]
    fn test_texel_size() {
        let field = DoubleField::new((), (), 256, 128);
        assert_eq!(field.texel_size(), Vec2::new(1.0 / 256.0, 1.0 / 128.0));
    }

    #[test]
    fn test_allocate_creates_two_surfaces() {
        let mut backend = RecordingBackend::new();
        let field = DoubleField::allocate(&mut backend, 64, 32);
        assert_ne!(field.read(), field.write());
        assert_eq!((field.width(), field.height()), (64, 32));
        assert_eq!(backend.commands().len(), 2);
    }
}
