/// Multi-target framebuffer resource (G-buffer)
///
/// One texture attachment per requested format at sequential color indices,
/// plus a single depth-stencil renderbuffer. Attachment textures are
/// resource entities so other materials can sample them (the deferred
/// composite pass reads them back).

use crate::engine_assert;
use crate::graphics::{DriverHandle, FramebufferId, RenderbufferId, TextureFormat};
use crate::resource::Texture;
use crate::world::{EntityRef, World};

/// Framebuffer component stored on a resource entity
pub struct Framebuffer {
    driver: DriverHandle,
    id: FramebufferId,
    depth_stencil: RenderbufferId,
    width: u32,
    height: u32,
    attachments: Vec<EntityRef>,
}

impl Framebuffer {
    /// Create a framebuffer resource entity
    ///
    /// Incompleteness after creation is an unrecoverable attachment-format
    /// mismatch and aborts.
    pub fn create(
        world: &World,
        driver: &DriverHandle,
        width: u32,
        height: u32,
        attachment_formats: &[TextureFormat],
    ) -> EntityRef {
        let mut attachments = Vec::with_capacity(attachment_formats.len());
        let mut texture_ids = Vec::with_capacity(attachment_formats.len());
        for &format in attachment_formats {
            let texture = Texture::create_texture2d(world, driver, width, height, format);
            texture_ids.push(texture.get::<Texture>().map(|t| t.texture_id()));
            attachments.push(texture);
        }
        let texture_ids: Vec<_> = texture_ids.into_iter().flatten().collect();

        let (id, depth_stencil) = {
            let mut d = driver.borrow_mut();
            let depth_stencil = d.create_renderbuffer(width, height);
            (d.create_framebuffer(&texture_ids, depth_stencil), depth_stencil)
        };

        let framebuffer = Framebuffer {
            driver: driver.clone(),
            id,
            depth_stencil,
            width,
            height,
            attachments,
        };
        engine_assert!(
            framebuffer.is_complete(),
            "nova3d::Framebuffer",
            "Framebuffer with {} attachments is incomplete",
            attachment_formats.len()
        );

        let handle = EntityRef::create(world);
        handle.set(framebuffer);
        handle
    }

    /// Make this framebuffer the active render target
    pub fn bind(&self) {
        self.driver.borrow_mut().bind_framebuffer(Some(self.id));
    }

    /// Restore the default (swap-chain) render target
    pub fn unbind(&self) {
        self.driver.borrow_mut().bind_framebuffer(None);
    }

    /// Driver completeness status
    pub fn is_complete(&self) -> bool {
        self.driver.borrow().framebuffer_is_complete(self.id)
    }

    /// Resize to the given dimensions
    ///
    /// Reallocates the depth-stencil target in place and updates the stored
    /// dimensions; color attachments keep their creation-time storage.
    /// No-op when the dimensions are unchanged.
    pub fn set_size(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.driver
            .borrow_mut()
            .resize_renderbuffer(self.depth_stencil, width, height);
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of color attachments
    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    /// Handle to the texture attached at a color index
    ///
    /// Requesting an index past the attachment list is a programmer error.
    pub fn attachment(&self, index: usize) -> EntityRef {
        engine_assert!(
            index < self.attachments.len(),
            "nova3d::Framebuffer",
            "Attachment index {} out of range ({} attachments)",
            index,
            self.attachments.len()
        );
        self.attachments[index].clone()
    }

    pub(crate) fn depth_stencil_id(&self) -> RenderbufferId {
        self.depth_stencil
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        let mut driver = self.driver.borrow_mut();
        driver.destroy_framebuffer(self.id);
        driver.destroy_renderbuffer(self.depth_stencil);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "framebuffer_tests.rs"]
mod tests;
