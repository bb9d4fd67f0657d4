/// Headless in-memory graphics driver
///
/// Backend for tests and tooling: no GPU, no window. Every call is recorded
/// into plain data structures that tests inspect through the accessor
/// methods at the bottom. Shader "compilation" keeps the real contract
/// (validity flag, accumulated stage diagnostics, one-time reflection) by
/// scanning the source text for `uniform` and `buffer` declarations.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::graphics::{
    BufferId, BufferKind, BufferLayout, ClearMask, FramebufferId, GraphicsDriver, ProgramId,
    ProgramReflection, RenderbufferId, ShaderDataType, StorageBlockInfo, TextureDesc, TextureId,
    UniformInfo, UniformLocation, VertexArrayId,
};

// ============================================================================
// Recorded state
// ============================================================================

struct BufferRecord {
    kind: BufferKind,
    data: Vec<u8>,
}

struct VertexArrayRecord {
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    stride: usize,
}

struct TextureRecord {
    desc: TextureDesc,
    pixels: Option<Vec<u8>>,
}

struct ProgramRecord {
    uniforms: Vec<UniformInfo>,
    /// Last payload uploaded per location
    uniform_values: FxHashMap<UniformLocation, (ShaderDataType, Vec<u8>)>,
}

struct FramebufferRecord {
    color_attachments: Vec<TextureId>,
    depth_stencil: RenderbufferId,
}

/// One recorded indexed draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRecord {
    pub vertex_array: VertexArrayId,
    pub index_count: u32,
    pub program: Option<ProgramId>,
    pub framebuffer: Option<FramebufferId>,
}

/// One recorded clear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearRecord {
    pub mask: ClearMask,
    pub color: [f32; 4],
    pub framebuffer: Option<FramebufferId>,
}

// ============================================================================
// Driver
// ============================================================================

/// In-memory [`GraphicsDriver`] implementation
pub struct HeadlessDriver {
    next_id: u32,
    buffers: FxHashMap<BufferId, BufferRecord>,
    vertex_arrays: FxHashMap<VertexArrayId, VertexArrayRecord>,
    textures: FxHashMap<TextureId, TextureRecord>,
    programs: FxHashMap<ProgramId, ProgramRecord>,
    renderbuffers: FxHashMap<RenderbufferId, (u32, u32)>,
    framebuffers: FxHashMap<FramebufferId, FramebufferRecord>,
    bound_program: Option<ProgramId>,
    bound_framebuffer: Option<FramebufferId>,
    texture_units: FxHashMap<u32, TextureId>,
    storage_bindings: FxHashMap<u32, BufferId>,
    viewport: (u32, u32),
    clears: Vec<ClearRecord>,
    draws: Vec<DrawRecord>,
}

impl HeadlessDriver {
    pub fn new() -> HeadlessDriver {
        HeadlessDriver {
            next_id: 1,
            buffers: FxHashMap::default(),
            vertex_arrays: FxHashMap::default(),
            textures: FxHashMap::default(),
            programs: FxHashMap::default(),
            renderbuffers: FxHashMap::default(),
            framebuffers: FxHashMap::default(),
            bound_program: None,
            bound_framebuffer: None,
            texture_units: FxHashMap::default(),
            storage_bindings: FxHashMap::default(),
            viewport: (0, 0),
            clears: Vec::new(),
            draws: Vec::new(),
        }
    }

    /// Convenience constructor yielding the shared handle form the engine
    /// consumes, still inspectable through the concrete type
    pub fn new_shared() -> Rc<RefCell<HeadlessDriver>> {
        Rc::new(RefCell::new(HeadlessDriver::new()))
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Scan one stage's source for declarations
    ///
    /// Uniform and storage-block names are collected in declaration order,
    /// first occurrence wins across stages.
    fn reflect_stage(
        source: &str,
        uniforms: &mut Vec<(String, ShaderDataType)>,
        blocks: &mut Vec<String>,
    ) {
        for line in source.lines() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.first() == Some(&"uniform") && tokens.len() >= 3 {
                if let Some(data_type) = ShaderDataType::from_glsl(tokens[1]) {
                    let name = tokens[2].trim_end_matches(';');
                    if !name.is_empty() && !uniforms.iter().any(|(n, _)| n == name) {
                        uniforms.push((name.to_string(), data_type));
                    }
                }
            } else if let Some(pos) = tokens.iter().position(|t| *t == "buffer") {
                if let Some(raw) = tokens.get(pos + 1) {
                    let name = raw.trim_end_matches('{').trim_end_matches(';');
                    if !name.is_empty() && !blocks.iter().any(|b| b == name) {
                        blocks.push(name.to_string());
                    }
                }
            }
        }
    }

    /// Minimal stage validation: a stage must define an entry point
    fn check_stage(source: &str, stage: &str, errors: &mut String) -> bool {
        if source.contains("void main") {
            return true;
        }
        errors.push_str(&format!(
            "Error while compiling {} shader:\nmissing entry point 'main'\n",
            stage
        ));
        false
    }
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        HeadlessDriver::new()
    }
}

impl GraphicsDriver for HeadlessDriver {
    fn create_buffer(&mut self, kind: BufferKind, data: &[u8]) -> BufferId {
        let id = BufferId(self.next_id());
        self.buffers.insert(id, BufferRecord { kind, data: data.to_vec() });
        id
    }

    fn update_buffer(&mut self, id: BufferId, offset: usize, data: &[u8]) {
        if let Some(record) = self.buffers.get_mut(&id) {
            let end = offset + data.len();
            if record.data.len() < end {
                record.data.resize(end, 0);
            }
            record.data[offset..end].copy_from_slice(data);
        }
    }

    fn resize_buffer(&mut self, id: BufferId, size: usize) {
        if let Some(record) = self.buffers.get_mut(&id) {
            record.data = vec![0; size];
        }
    }

    fn destroy_buffer(&mut self, id: BufferId) {
        self.buffers.remove(&id);
    }

    fn create_vertex_array(
        &mut self,
        vertex_buffer: BufferId,
        index_buffer: BufferId,
        layout: &BufferLayout,
    ) -> VertexArrayId {
        let id = VertexArrayId(self.next_id());
        self.vertex_arrays.insert(
            id,
            VertexArrayRecord {
                vertex_buffer,
                index_buffer,
                stride: layout.stride(),
            },
        );
        id
    }

    fn destroy_vertex_array(&mut self, id: VertexArrayId) {
        self.vertex_arrays.remove(&id);
    }

    fn create_texture2d(&mut self, desc: TextureDesc, pixels: Option<&[u8]>) -> TextureId {
        let id = TextureId(self.next_id());
        self.textures.insert(
            id,
            TextureRecord { desc, pixels: pixels.map(|p| p.to_vec()) },
        );
        id
    }

    fn destroy_texture(&mut self, id: TextureId) {
        self.textures.remove(&id);
    }

    fn bind_texture(&mut self, unit: u32, id: TextureId) {
        self.texture_units.insert(unit, id);
    }

    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> ProgramReflection {
        let id = ProgramId(self.next_id());

        let mut errors = String::new();
        let vertex_ok = Self::check_stage(vertex_source, "vertex", &mut errors);
        let fragment_ok = Self::check_stage(fragment_source, "fragment", &mut errors);
        let valid = vertex_ok && fragment_ok;

        let mut raw_uniforms = Vec::new();
        let mut raw_blocks = Vec::new();
        if valid {
            Self::reflect_stage(vertex_source, &mut raw_uniforms, &mut raw_blocks);
            Self::reflect_stage(fragment_source, &mut raw_uniforms, &mut raw_blocks);
        }

        let uniforms: Vec<UniformInfo> = raw_uniforms
            .into_iter()
            .enumerate()
            .map(|(i, (name, data_type))| UniformInfo {
                name,
                data_type,
                location: i as UniformLocation,
            })
            .collect();
        let storage_blocks: Vec<StorageBlockInfo> = raw_blocks
            .into_iter()
            .enumerate()
            .map(|(i, name)| StorageBlockInfo { name, index: i as u32 })
            .collect();

        self.programs.insert(
            id,
            ProgramRecord {
                uniforms: uniforms.clone(),
                uniform_values: FxHashMap::default(),
            },
        );

        ProgramReflection { program: id, valid, errors, uniforms, storage_blocks }
    }

    fn destroy_program(&mut self, id: ProgramId) {
        self.programs.remove(&id);
        if self.bound_program == Some(id) {
            self.bound_program = None;
        }
    }

    fn bind_program(&mut self, id: ProgramId) {
        self.bound_program = Some(id);
    }

    fn bound_program(&self) -> Option<ProgramId> {
        self.bound_program
    }

    fn set_uniform(
        &mut self,
        program: ProgramId,
        location: UniformLocation,
        data_type: ShaderDataType,
        data: &[u8],
    ) {
        debug_assert_eq!(data.len(), data_type.size());
        if let Some(record) = self.programs.get_mut(&program) {
            record
                .uniform_values
                .insert(location, (data_type, data.to_vec()));
        }
    }

    fn bind_storage_buffer(&mut self, index: u32, id: BufferId) {
        self.storage_bindings.insert(index, id);
    }

    fn create_renderbuffer(&mut self, width: u32, height: u32) -> RenderbufferId {
        let id = RenderbufferId(self.next_id());
        self.renderbuffers.insert(id, (width, height));
        id
    }

    fn resize_renderbuffer(&mut self, id: RenderbufferId, width: u32, height: u32) {
        if let Some(size) = self.renderbuffers.get_mut(&id) {
            *size = (width, height);
        }
    }

    fn destroy_renderbuffer(&mut self, id: RenderbufferId) {
        self.renderbuffers.remove(&id);
    }

    fn create_framebuffer(
        &mut self,
        color_attachments: &[TextureId],
        depth_stencil: RenderbufferId,
    ) -> FramebufferId {
        let id = FramebufferId(self.next_id());
        self.framebuffers.insert(
            id,
            FramebufferRecord {
                color_attachments: color_attachments.to_vec(),
                depth_stencil,
            },
        );
        id
    }

    fn framebuffer_is_complete(&self, id: FramebufferId) -> bool {
        let Some(record) = self.framebuffers.get(&id) else {
            return false;
        };
        if record.color_attachments.is_empty() {
            return false;
        }
        if !self.renderbuffers.contains_key(&record.depth_stencil) {
            return false;
        }
        // All color attachments must exist and share dimensions
        let mut size = None;
        for attachment in &record.color_attachments {
            let Some(texture) = self.textures.get(attachment) else {
                return false;
            };
            let this = (texture.desc.width, texture.desc.height);
            if *size.get_or_insert(this) != this {
                return false;
            }
        }
        true
    }

    fn destroy_framebuffer(&mut self, id: FramebufferId) {
        self.framebuffers.remove(&id);
        if self.bound_framebuffer == Some(id) {
            self.bound_framebuffer = None;
        }
    }

    fn bind_framebuffer(&mut self, id: Option<FramebufferId>) {
        self.bound_framebuffer = id;
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn clear(&mut self, mask: ClearMask, color: [f32; 4]) {
        self.clears.push(ClearRecord {
            mask,
            color,
            framebuffer: self.bound_framebuffer,
        });
    }

    fn draw_indexed(&mut self, vertex_array: VertexArrayId, index_count: u32) {
        self.draws.push(DrawRecord {
            vertex_array,
            index_count,
            program: self.bound_program,
            framebuffer: self.bound_framebuffer,
        });
    }
}

// ============================================================================
// Inspection API (tests and tooling)
// ============================================================================

impl HeadlessDriver {
    /// Current bytes of a live buffer
    pub fn buffer_data(&self, id: BufferId) -> Option<&[u8]> {
        self.buffers.get(&id).map(|r| r.data.as_slice())
    }

    /// Kind a live buffer was created as
    pub fn buffer_kind(&self, id: BufferId) -> Option<BufferKind> {
        self.buffers.get(&id).map(|r| r.kind)
    }

    pub fn buffer_exists(&self, id: BufferId) -> bool {
        self.buffers.contains_key(&id)
    }

    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn live_program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn live_vertex_array_count(&self) -> usize {
        self.vertex_arrays.len()
    }

    /// Vertex buffer stride a vertex array was created with
    pub fn vertex_array_stride(&self, id: VertexArrayId) -> Option<usize> {
        self.vertex_arrays.get(&id).map(|r| r.stride)
    }

    /// Buffers a vertex array was created over
    pub fn vertex_array_buffers(&self, id: VertexArrayId) -> Option<(BufferId, BufferId)> {
        self.vertex_arrays
            .get(&id)
            .map(|r| (r.vertex_buffer, r.index_buffer))
    }

    /// Descriptor of a live texture
    pub fn texture_desc(&self, id: TextureId) -> Option<TextureDesc> {
        self.textures.get(&id).map(|r| r.desc)
    }

    /// Pixels uploaded at texture creation, if any
    pub fn texture_pixels(&self, id: TextureId) -> Option<&[u8]> {
        self.textures.get(&id).and_then(|r| r.pixels.as_deref())
    }

    /// Last payload uploaded to a uniform location of a program
    pub fn uniform_bytes(
        &self,
        program: ProgramId,
        location: UniformLocation,
    ) -> Option<&[u8]> {
        self.programs
            .get(&program)
            .and_then(|r| r.uniform_values.get(&location))
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// Reflected uniforms of a live program
    pub fn program_uniforms(&self, id: ProgramId) -> Option<&[UniformInfo]> {
        self.programs.get(&id).map(|r| r.uniforms.as_slice())
    }

    /// Texture bound to a unit
    pub fn texture_at_unit(&self, unit: u32) -> Option<TextureId> {
        self.texture_units.get(&unit).copied()
    }

    /// Storage buffer bound to a block binding index
    pub fn storage_buffer_at(&self, index: u32) -> Option<BufferId> {
        self.storage_bindings.get(&index).copied()
    }

    /// Dimensions of a live renderbuffer
    pub fn renderbuffer_size(&self, id: RenderbufferId) -> Option<(u32, u32)> {
        self.renderbuffers.get(&id).copied()
    }

    pub fn bound_framebuffer(&self) -> Option<FramebufferId> {
        self.bound_framebuffer
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// All recorded clears, in submission order
    pub fn clears(&self) -> &[ClearRecord] {
        &self.clears
    }

    /// All recorded indexed draws, in submission order
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Forget recorded clears and draws (per-frame test bookkeeping)
    pub fn reset_recording(&mut self) {
        self.clears.clear();
        self.draws.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "headless_tests.rs"]
mod tests;
