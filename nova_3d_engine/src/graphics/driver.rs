/// GraphicsDriver trait - contract-level low-level graphics interface
///
/// The engine core never talks to a graphics API directly; everything goes
/// through this trait. A backend supplies object creation/destruction,
/// uniform upload, binding and draw submission. Object ids are plain
/// integers handed out by the backend; ownership and double-free protection
/// live in the RAII wrappers of [`crate::graphics::buffer`].

use std::cell::RefCell;
use std::rc::Rc;

use bitflags::bitflags;

use crate::graphics::{BufferLayout, ShaderDataType};

// ============================================================================
// Object ids
// ============================================================================

/// Backend id of a vertex/index/storage buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Backend id of a vertex array (attribute binding state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayId(pub u32);

/// Backend id of a texture object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Backend id of a linked shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Backend id of a depth-stencil renderbuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderbufferId(pub u32);

/// Backend id of a framebuffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub u32);

/// Resolved uniform location inside a linked program
pub type UniformLocation = i32;

// ============================================================================
// Descriptors
// ============================================================================

/// What a buffer object is bound as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Vertex attribute data
    Vertex,
    /// 32-bit index data
    Index,
    /// Shader storage block data
    Storage,
}

/// Texel format of a texture attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    R8,
    RG8,
    RGB8,
    RGBA8,
    /// 16-bit float per channel, used for position/normal G-buffer targets
    RGBA16F,
}

impl TextureFormat {
    /// Byte size of one texel
    pub fn texel_size(self) -> usize {
        match self {
            TextureFormat::R8 => 1,
            TextureFormat::RG8 => 2,
            TextureFormat::RGB8 => 3,
            TextureFormat::RGBA8 => 4,
            TextureFormat::RGBA16F => 8,
        }
    }
}

/// Descriptor for creating a 2D texture
#[derive(Debug, Clone, Copy)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

bitflags! {
    /// Which aspects of the bound target a clear touches
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

// ============================================================================
// Program reflection
// ============================================================================

/// One active uniform discovered by program reflection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformInfo {
    pub name: String,
    pub data_type: ShaderDataType,
    pub location: UniformLocation,
}

/// One named storage block discovered by program reflection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageBlockInfo {
    pub name: String,
    /// Binding index the block is wired to
    pub index: u32,
}

/// Result of compiling and linking a shader program
///
/// Reflection happens exactly once, here. On failure `valid` is false and
/// `errors` accumulates the vertex, fragment and link diagnostics in that
/// order; the program id is still handed out so the owner can release it.
#[derive(Debug, Clone)]
pub struct ProgramReflection {
    pub program: ProgramId,
    pub valid: bool,
    pub errors: String,
    /// Active uniforms in declaration order
    pub uniforms: Vec<UniformInfo>,
    /// Storage blocks in declaration order
    pub storage_blocks: Vec<StorageBlockInfo>,
}

// ============================================================================
// GraphicsDriver trait
// ============================================================================

/// Low-level graphics backend contract
///
/// Single-threaded by design: the renderer owns one driver per running scene
/// and every call happens on the render thread. Object-creation-time status
/// (compile, link, framebuffer completeness) is checked; per-call errors in
/// the draw loop are not.
pub trait GraphicsDriver {
    // ----- Buffers -----

    /// Create a buffer object and upload its initial contents
    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> BufferId;

    /// Overwrite a byte range of an existing buffer
    fn update_buffer(&mut self, id: BufferId, offset: usize, data: &[u8]);

    /// Reallocate a buffer to `size` bytes, discarding its contents
    fn resize_buffer(&mut self, id: BufferId, size: usize);

    /// Release a buffer object
    fn destroy_buffer(&mut self, id: BufferId);

    // ----- Vertex arrays -----

    /// Create attribute binding state over a vertex and an index buffer
    fn create_vertex_array(
        &mut self,
        vertex_buffer: BufferId,
        index_buffer: BufferId,
        layout: &BufferLayout,
    ) -> VertexArrayId;

    /// Release a vertex array object
    fn destroy_vertex_array(&mut self, id: VertexArrayId);

    // ----- Textures -----

    /// Create a 2D texture, optionally uploading pixel data
    ///
    /// `pixels`, when present, must hold exactly
    /// `width * height * format.texel_size()` bytes.
    fn create_texture2d(&mut self, desc: TextureDesc, pixels: Option<&[u8]>) -> TextureId;

    /// Release a texture object
    fn destroy_texture(&mut self, id: TextureId);

    /// Bind a texture to a texture unit
    fn bind_texture(&mut self, unit: u32, id: TextureId);

    // ----- Shader programs -----

    /// Compile, link and reflect a program from vertex+fragment source
    fn compile_program(&mut self, vertex_source: &str, fragment_source: &str)
        -> ProgramReflection;

    /// Release a program object
    fn destroy_program(&mut self, id: ProgramId);

    /// Make a program the active one
    fn bind_program(&mut self, id: ProgramId);

    /// Currently active program, if any
    fn bound_program(&self) -> Option<ProgramId>;

    /// Upload a uniform payload to a location of a program
    ///
    /// `data` must be exactly `data_type.size()` bytes.
    fn set_uniform(
        &mut self,
        program: ProgramId,
        location: UniformLocation,
        data_type: ShaderDataType,
        data: &[u8],
    );

    /// Bind a storage buffer to a block binding index
    fn bind_storage_buffer(&mut self, index: u32, id: BufferId);

    // ----- Render targets -----

    /// Create a depth-stencil renderbuffer
    fn create_renderbuffer(&mut self, width: u32, height: u32) -> RenderbufferId;

    /// Reallocate a renderbuffer's storage in place
    fn resize_renderbuffer(&mut self, id: RenderbufferId, width: u32, height: u32);

    /// Release a renderbuffer object
    fn destroy_renderbuffer(&mut self, id: RenderbufferId);

    /// Create a framebuffer from ordered color attachments + depth-stencil
    fn create_framebuffer(
        &mut self,
        color_attachments: &[TextureId],
        depth_stencil: RenderbufferId,
    ) -> FramebufferId;

    /// Driver completeness check for a framebuffer
    fn framebuffer_is_complete(&self, id: FramebufferId) -> bool;

    /// Release a framebuffer object
    fn destroy_framebuffer(&mut self, id: FramebufferId);

    /// Bind a framebuffer, or `None` for the default (swap-chain) target
    fn bind_framebuffer(&mut self, id: Option<FramebufferId>);

    // ----- Frame commands -----

    /// Set the rasterization viewport
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Clear the bound target
    fn clear(&mut self, mask: ClearMask, color: [f32; 4]);

    /// Draw `index_count` 32-bit indices from a vertex array as triangles
    fn draw_indexed(&mut self, vertex_array: VertexArrayId, index_count: u32);
}

/// Shared handle to the active driver
///
/// Resources hold a clone of this so their destructors can release backend
/// objects. Single-threaded, so `Rc<RefCell>` is sufficient.
pub type DriverHandle = Rc<RefCell<dyn GraphicsDriver>>;
