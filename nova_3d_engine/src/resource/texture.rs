/// Texture resource
///
/// A closed tagged variant over the known texture kinds. The set is small
/// and fixed, so binding dispatches through a plain `match` instead of a
/// virtual base on the hot path.

use crate::engine_error;
use crate::graphics::{DriverHandle, TextureDesc, TextureFormat, TextureId};
use crate::world::{EntityRef, World};

/// One concrete texture kind
pub enum TextureKind {
    Texture2D(Texture2D),
}

/// Texture component stored on a resource entity
pub struct Texture {
    kind: TextureKind,
}

impl Texture {
    /// Allocate an empty 2D texture (render-target storage)
    ///
    /// Returns a handle owning the new resource entity.
    pub fn create_texture2d(
        world: &World,
        driver: &DriverHandle,
        width: u32,
        height: u32,
        format: TextureFormat,
    ) -> EntityRef {
        let texture = Texture {
            kind: TextureKind::Texture2D(Texture2D::new(driver, width, height, format, None)),
        };
        let handle = EntityRef::create(world);
        handle.set(texture);
        handle
    }

    /// Create a 2D texture from raw decoded pixels
    ///
    /// A payload whose size does not match `width * height * texel size`
    /// leaves the texture in the invalid state instead of failing the call;
    /// callers check [`is_valid`](Texture::is_valid) before use.
    pub fn from_pixels(
        world: &World,
        driver: &DriverHandle,
        width: u32,
        height: u32,
        format: TextureFormat,
        pixels: &[u8],
    ) -> EntityRef {
        let texture = Texture {
            kind: TextureKind::Texture2D(Texture2D::new(
                driver,
                width,
                height,
                format,
                Some(pixels),
            )),
        };
        let handle = EntityRef::create(world);
        handle.set(texture);
        handle
    }

    /// Whether the texture holds usable storage
    pub fn is_valid(&self) -> bool {
        match &self.kind {
            TextureKind::Texture2D(texture) => texture.is_valid(),
        }
    }

    /// Bind to a texture unit
    pub fn bind(&self, unit: u32) {
        match &self.kind {
            TextureKind::Texture2D(texture) => texture.bind(unit),
        }
    }

    /// Backend id, for framebuffer attachment
    pub fn texture_id(&self) -> TextureId {
        match &self.kind {
            TextureKind::Texture2D(texture) => texture.id(),
        }
    }

    pub fn width(&self) -> u32 {
        match &self.kind {
            TextureKind::Texture2D(texture) => texture.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match &self.kind {
            TextureKind::Texture2D(texture) => texture.height(),
        }
    }

    pub fn format(&self) -> TextureFormat {
        match &self.kind {
            TextureKind::Texture2D(texture) => texture.format(),
        }
    }
}

/// 2D texture over one driver object
pub struct Texture2D {
    driver: DriverHandle,
    id: TextureId,
    width: u32,
    height: u32,
    format: TextureFormat,
    valid: bool,
}

impl Texture2D {
    fn new(
        driver: &DriverHandle,
        width: u32,
        height: u32,
        format: TextureFormat,
        pixels: Option<&[u8]>,
    ) -> Texture2D {
        let expected = width as usize * height as usize * format.texel_size();
        let mut valid = true;
        let upload = match pixels {
            Some(data) if data.len() != expected => {
                engine_error!(
                    "nova3d::Texture",
                    "Pixel payload of {} bytes does not match {}x{} {:?} ({} bytes)",
                    data.len(),
                    width,
                    height,
                    format,
                    expected
                );
                valid = false;
                None
            }
            other => other,
        };

        let id = driver
            .borrow_mut()
            .create_texture2d(TextureDesc { width, height, format }, upload);
        Texture2D {
            driver: driver.clone(),
            id,
            width,
            height,
            format,
            valid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn bind(&self, unit: u32) {
        self.driver.borrow_mut().bind_texture(unit, self.id);
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        self.driver.borrow_mut().destroy_texture(self.id);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
