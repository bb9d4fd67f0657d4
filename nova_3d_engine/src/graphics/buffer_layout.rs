/// Vertex buffer layout descriptor

use crate::graphics::ShaderDataType;

/// One attribute of an interleaved vertex layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferElement {
    /// Logical attribute type
    pub data_type: ShaderDataType,
    /// Byte offset from the start of a vertex
    pub offset: usize,
}

/// Interleaved vertex layout, computed once at construction
///
/// Offsets are the partial sums of the preceding attribute sizes; the stride
/// is the total byte size of one vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferLayout {
    elements: Vec<BufferElement>,
    stride: usize,
}

impl BufferLayout {
    /// Build a layout from an ordered attribute type list
    pub fn new(types: &[ShaderDataType]) -> BufferLayout {
        let mut elements = Vec::with_capacity(types.len());
        let mut offset = 0;
        for &data_type in types {
            elements.push(BufferElement { data_type, offset });
            offset += data_type.size();
        }
        BufferLayout { elements, stride: offset }
    }

    /// Attribute descriptors in declaration order
    pub fn elements(&self) -> &[BufferElement] {
        &self.elements
    }

    /// Byte size of one interleaved vertex
    pub fn stride(&self) -> usize {
        self.stride
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "buffer_layout_tests.rs"]
mod tests;
