/// Tests for vertex buffer layouts

use super::*;

#[test]
fn test_stride_is_total_size() {
    let layout = BufferLayout::new(&[
        ShaderDataType::Vec3,
        ShaderDataType::Vec3,
        ShaderDataType::Vec2,
    ]);
    assert_eq!(layout.stride(), 12 + 12 + 8);
}

#[test]
fn test_offsets_are_partial_sums() {
    let layout = BufferLayout::new(&[
        ShaderDataType::Vec3,
        ShaderDataType::Vec3,
        ShaderDataType::Vec2,
    ]);

    let offsets: Vec<usize> = layout.elements().iter().map(|e| e.offset).collect();
    assert_eq!(offsets, vec![0, 12, 24]);

    // Monotonically increasing by the size of the preceding attribute
    let mut expected = 0;
    for element in layout.elements() {
        assert_eq!(element.offset, expected);
        expected += element.data_type.size();
    }
    assert_eq!(layout.stride(), expected);
}

#[test]
fn test_empty_layout() {
    let layout = BufferLayout::new(&[]);
    assert_eq!(layout.stride(), 0);
    assert!(layout.elements().is_empty());
}

#[test]
fn test_mixed_scalar_and_matrix_attributes() {
    let layout = BufferLayout::new(&[
        ShaderDataType::Float,
        ShaderDataType::Mat4,
        ShaderDataType::Int,
    ]);
    assert_eq!(layout.elements()[1].offset, 4);
    assert_eq!(layout.elements()[2].offset, 68);
    assert_eq!(layout.stride(), 72);
}
