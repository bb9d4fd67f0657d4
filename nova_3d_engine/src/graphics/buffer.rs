/// Move-only RAII wrappers over driver buffer objects
///
/// Each wrapper owns exactly one backend object and releases it on drop.
/// None of these types implement `Clone`: copying an id would double-free
/// the backend object. Shared ownership belongs to the entity store via
/// [`crate::world::EntityRef`], not to these value types.

use crate::engine_warn;
use crate::graphics::{BufferId, BufferKind, BufferLayout, DriverHandle, VertexArrayId};

// ============================================================================
// Vertex buffer
// ============================================================================

/// GPU buffer holding interleaved vertex data
pub struct VertexBuffer {
    driver: DriverHandle,
    id: BufferId,
}

impl VertexBuffer {
    /// Create and upload a vertex buffer
    pub fn new(driver: &DriverHandle, data: &[u8]) -> VertexBuffer {
        let id = driver.borrow_mut().create_buffer(BufferKind::Vertex, data);
        VertexBuffer { driver: driver.clone(), id }
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Overwrite a byte range
    pub fn update(&self, offset: usize, data: &[u8]) {
        self.driver.borrow_mut().update_buffer(self.id, offset, data);
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        self.driver.borrow_mut().destroy_buffer(self.id);
    }
}

// ============================================================================
// Index buffer
// ============================================================================

/// GPU buffer holding 32-bit triangle indices
pub struct IndexBuffer {
    driver: DriverHandle,
    id: BufferId,
    index_count: u32,
}

impl IndexBuffer {
    /// Create and upload an index buffer
    pub fn new(driver: &DriverHandle, indices: &[u32]) -> IndexBuffer {
        let id = driver
            .borrow_mut()
            .create_buffer(BufferKind::Index, bytemuck::cast_slice(indices));
        IndexBuffer {
            driver: driver.clone(),
            id,
            index_count: indices.len() as u32,
        }
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Number of indices uploaded at construction
    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        self.driver.borrow_mut().destroy_buffer(self.id);
    }
}

// ============================================================================
// Vertex array
// ============================================================================

/// Attribute binding state tying a vertex buffer, an index buffer and a
/// layout together for draw submission
pub struct VertexArray {
    driver: DriverHandle,
    id: VertexArrayId,
}

impl VertexArray {
    /// Create a vertex array over existing buffers
    ///
    /// The buffers must outlive the vertex array; the owning Surface keeps
    /// all three together.
    pub fn new(
        driver: &DriverHandle,
        vertex_buffer: &VertexBuffer,
        index_buffer: &IndexBuffer,
        layout: &BufferLayout,
    ) -> VertexArray {
        let id = driver.borrow_mut().create_vertex_array(
            vertex_buffer.id(),
            index_buffer.id(),
            layout,
        );
        VertexArray { driver: driver.clone(), id }
    }

    pub fn id(&self) -> VertexArrayId {
        self.id
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.driver.borrow_mut().destroy_vertex_array(self.id);
    }
}

// ============================================================================
// Storage buffer
// ============================================================================

/// Grow-only shader storage buffer
///
/// Capacity never shrinks: per-frame bulk uploads (light tables) would
/// otherwise churn reallocations whenever counts fluctuate.
pub struct StorageBuffer {
    driver: DriverHandle,
    id: BufferId,
    capacity: usize,
}

impl StorageBuffer {
    /// Create an empty storage buffer
    pub fn new(driver: &DriverHandle) -> StorageBuffer {
        let id = driver.borrow_mut().create_buffer(BufferKind::Storage, &[]);
        StorageBuffer { driver: driver.clone(), id, capacity: 0 }
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Current allocation in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Grow the allocation to at least `size` bytes
    ///
    /// Requests at or below the current capacity are no-ops; the buffer
    /// never shrinks. Growing discards the previous contents.
    pub fn reserve(&mut self, size: usize) {
        if size <= self.capacity {
            return;
        }
        self.driver.borrow_mut().resize_buffer(self.id, size);
        self.capacity = size;
    }

    /// Upload bytes at the start of the buffer
    ///
    /// The payload must fit the current capacity; oversized uploads are
    /// dropped with a warning instead of corrupting the allocation.
    pub fn upload(&self, data: &[u8]) {
        if data.len() > self.capacity {
            engine_warn!(
                "nova3d::StorageBuffer",
                "Upload of {} bytes exceeds capacity {}, skipped",
                data.len(),
                self.capacity
            );
            return;
        }
        self.driver.borrow_mut().update_buffer(self.id, 0, data);
    }

    /// Bind to a storage block binding index
    pub fn bind(&self, index: u32) {
        self.driver.borrow_mut().bind_storage_buffer(index, self.id);
    }
}

impl Drop for StorageBuffer {
    fn drop(&mut self) {
        self.driver.borrow_mut().destroy_buffer(self.id);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
