/// Indexed triangle mesh resource
///
/// An `ArrayMesh` is a list of surfaces, each one a dedicated vertex buffer,
/// an index buffer, the vertex array tying them together and a material
/// handle. Drawing records one indexed triangle-list draw per surface with
/// 32-bit indices.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use rustc_hash::FxHashMap;

use crate::graphics::{
    BufferLayout, DriverHandle, IndexBuffer, ShaderDataType, VertexArray, VertexBuffer,
};
use crate::resource::Material;
use crate::world::{EntityRef, World};
use crate::{engine_assert, engine_warn};

// ============================================================================
// Vertex formats
// ============================================================================

/// Interleaved position + UV vertex (procedural geometry)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub fn layout() -> BufferLayout {
        BufferLayout::new(&[ShaderDataType::Vec3, ShaderDataType::Vec2])
    }
}

/// Interleaved position + normal + UV vertex (file-loaded geometry)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl MeshVertex {
    pub fn layout() -> BufferLayout {
        BufferLayout::new(&[
            ShaderDataType::Vec3,
            ShaderDataType::Vec3,
            ShaderDataType::Vec2,
        ])
    }
}

// ============================================================================
// ArrayMesh
// ============================================================================

struct Surface {
    // Buffers must outlive the vertex array created over them
    _vertex_buffer: VertexBuffer,
    _index_buffer: IndexBuffer,
    vertex_array: VertexArray,
    index_count: u32,
    material: EntityRef,
}

/// Mesh component stored on a resource entity
pub struct ArrayMesh {
    driver: DriverHandle,
    surfaces: Vec<Surface>,
}

impl ArrayMesh {
    /// Create an empty mesh resource entity
    pub fn create(world: &World, driver: &DriverHandle) -> EntityRef {
        let handle = EntityRef::create(world);
        handle.set(ArrayMesh { driver: driver.clone(), surfaces: Vec::new() });
        handle
    }

    /// Upload a vertex/index pair as a new surface
    pub fn add_surface(&mut self, vertices: &[Vertex], indices: &[u32], material: EntityRef) {
        self.push_surface(
            bytemuck::cast_slice(vertices),
            &Vertex::layout(),
            indices,
            material,
        );
    }

    /// Build a surface from face-indexed attribute arrays
    ///
    /// Source formats index positions, normals and UVs independently per
    /// face corner. Corners sharing the same (position, normal, uv) index
    /// triple are emitted once: the first occurrence allocates an output
    /// vertex, later occurrences reuse it, so output vertex count equals the
    /// number of distinct triples and stays reproducible across runs.
    pub fn add_surface_indexed(
        &mut self,
        positions: &[Vec3],
        normals: &[Vec3],
        uvs: &[Vec2],
        position_indices: &[u32],
        normal_indices: &[u32],
        uv_indices: &[u32],
        material: EntityRef,
    ) {
        engine_assert!(
            position_indices.len() == normal_indices.len()
                && position_indices.len() == uv_indices.len(),
            "nova3d::ArrayMesh",
            "Face index arrays differ in length ({}/{}/{})",
            position_indices.len(),
            normal_indices.len(),
            uv_indices.len()
        );

        let mut vertices: Vec<MeshVertex> = Vec::new();
        let mut indices: Vec<u32> = Vec::with_capacity(position_indices.len());
        let mut dedup: FxHashMap<u64, u32> = FxHashMap::default();

        for corner in 0..position_indices.len() {
            let position_index = position_indices[corner];
            let normal_index = normal_indices[corner];
            let uv_index = uv_indices[corner];

            engine_assert!(
                position_index <= u16::MAX as u32
                    && normal_index <= u16::MAX as u32
                    && uv_index <= u16::MAX as u32,
                "nova3d::ArrayMesh",
                "Attribute sub-index exceeds 16 bits (corner {})",
                corner
            );

            let key = ((position_index as u64) << 32)
                | ((normal_index as u64) << 16)
                | uv_index as u64;

            let output_index = *dedup.entry(key).or_insert_with(|| {
                vertices.push(MeshVertex {
                    position: positions[position_index as usize],
                    normal: normals[normal_index as usize],
                    uv: uvs[uv_index as usize],
                });
                (vertices.len() - 1) as u32
            });
            indices.push(output_index);
        }

        self.push_surface(
            bytemuck::cast_slice(&vertices),
            &MeshVertex::layout(),
            &indices,
            material,
        );
    }

    fn push_surface(
        &mut self,
        vertex_bytes: &[u8],
        layout: &BufferLayout,
        indices: &[u32],
        material: EntityRef,
    ) {
        let vertex_buffer = VertexBuffer::new(&self.driver, vertex_bytes);
        let index_buffer = IndexBuffer::new(&self.driver, indices);
        let vertex_array = VertexArray::new(&self.driver, &vertex_buffer, &index_buffer, layout);

        self.surfaces.push(Surface {
            _vertex_buffer: vertex_buffer,
            _index_buffer: index_buffer,
            vertex_array,
            index_count: indices.len() as u32,
            material,
        });
    }

    /// Bind each surface's material + transforms and issue its draw
    pub fn record_draw(&self, projection: &Mat4, view: &Mat4, model: &Mat4) {
        for surface in &self.surfaces {
            if !surface.material.is_alive() {
                engine_warn!(
                    "nova3d::ArrayMesh",
                    "Surface material handle is dead, draw skipped"
                );
                continue;
            }
            let Some(material) = surface.material.get::<Material>() else {
                engine_warn!(
                    "nova3d::ArrayMesh",
                    "Surface material handle holds no material, draw skipped"
                );
                continue;
            };
            material.bind_material();
            material.bind_pvm(projection, view, model);
            self.driver
                .borrow_mut()
                .draw_indexed(surface.vertex_array.id(), surface.index_count);
        }
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Number of indices the surface draws
    ///
    /// Requesting a surface past the surface list is a programmer error.
    pub fn surface_index_count(&self, surface: usize) -> u32 {
        engine_assert!(
            surface < self.surfaces.len(),
            "nova3d::ArrayMesh",
            "Surface index {} out of range ({} surfaces)",
            surface,
            self.surfaces.len()
        );
        self.surfaces[surface].index_count
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
