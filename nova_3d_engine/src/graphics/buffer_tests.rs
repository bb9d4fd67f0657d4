/// Tests for RAII buffer wrappers

use super::*;
use crate::graphics::{HeadlessDriver, ShaderDataType};

fn setup() -> (std::rc::Rc<std::cell::RefCell<HeadlessDriver>>, DriverHandle) {
    let driver = HeadlessDriver::new_shared();
    let handle: DriverHandle = driver.clone();
    (driver, handle)
}

#[test]
fn test_vertex_buffer_uploads_and_releases() {
    let (driver, handle) = setup();

    let data: Vec<u8> = (0..24).collect();
    let id;
    {
        let buffer = VertexBuffer::new(&handle, &data);
        id = buffer.id();
        assert_eq!(driver.borrow().buffer_data(id), Some(data.as_slice()));
        assert_eq!(driver.borrow().buffer_kind(id), Some(BufferKind::Vertex));
    }
    assert!(!driver.borrow().buffer_exists(id));
}

#[test]
fn test_vertex_buffer_update_overwrites_range() {
    let (driver, handle) = setup();

    let buffer = VertexBuffer::new(&handle, &[0; 8]);
    buffer.update(4, &[1, 2, 3, 4]);

    let d = driver.borrow();
    assert_eq!(d.buffer_data(buffer.id()), Some(&[0, 0, 0, 0, 1, 2, 3, 4][..]));
}

#[test]
fn test_index_buffer_casts_to_bytes() {
    let (driver, handle) = setup();

    let buffer = IndexBuffer::new(&handle, &[0u32, 1, 2]);
    assert_eq!(buffer.index_count(), 3);

    let d = driver.borrow();
    assert_eq!(d.buffer_kind(buffer.id()), Some(BufferKind::Index));
    assert_eq!(d.buffer_data(buffer.id()).unwrap().len(), 12);
}

#[test]
fn test_vertex_array_records_layout_and_buffers() {
    let (driver, handle) = setup();

    let vertices = VertexBuffer::new(&handle, &[0; 40]);
    let indices = IndexBuffer::new(&handle, &[0u32, 1, 2]);
    let layout = BufferLayout::new(&[ShaderDataType::Vec3, ShaderDataType::Vec2]);
    let array = VertexArray::new(&handle, &vertices, &indices, &layout);

    let d = driver.borrow();
    assert_eq!(d.vertex_array_stride(array.id()), Some(20));
    assert_eq!(
        d.vertex_array_buffers(array.id()),
        Some((vertices.id(), indices.id()))
    );
}

#[test]
fn test_storage_buffer_grows_and_never_shrinks() {
    let (driver, handle) = setup();

    let mut buffer = StorageBuffer::new(&handle);
    assert_eq!(buffer.capacity(), 0);

    buffer.reserve(5 * 16);
    assert_eq!(buffer.capacity(), 80);

    // Smaller request keeps the current allocation
    buffer.reserve(2 * 16);
    assert_eq!(buffer.capacity(), 80);
    assert_eq!(driver.borrow().buffer_data(buffer.id()).unwrap().len(), 80);

    buffer.reserve(160);
    assert_eq!(buffer.capacity(), 160);
}

#[test]
fn test_storage_buffer_upload_and_bind() {
    let (driver, handle) = setup();

    let mut buffer = StorageBuffer::new(&handle);
    buffer.reserve(16);
    buffer.upload(&[7; 16]);
    buffer.bind(3);

    let d = driver.borrow();
    assert_eq!(&d.buffer_data(buffer.id()).unwrap()[..16], &[7; 16]);
    assert_eq!(d.storage_buffer_at(3), Some(buffer.id()));
}

#[test]
fn test_storage_buffer_oversized_upload_is_skipped() {
    let (driver, handle) = setup();

    let mut buffer = StorageBuffer::new(&handle);
    buffer.reserve(4);
    buffer.upload(&[1; 8]);

    // Allocation untouched
    assert_eq!(driver.borrow().buffer_data(buffer.id()).unwrap(), &[0; 4]);
}

#[test]
fn test_drop_order_independent_release() {
    let (driver, handle) = setup();

    let vertices = VertexBuffer::new(&handle, &[0; 12]);
    let indices = IndexBuffer::new(&handle, &[0u32]);
    let layout = BufferLayout::new(&[ShaderDataType::Vec3]);
    let array = VertexArray::new(&handle, &vertices, &indices, &layout);

    drop(array);
    drop(indices);
    drop(vertices);

    let d = driver.borrow();
    assert_eq!(d.live_buffer_count(), 0);
    assert_eq!(d.live_vertex_array_count(), 0);
}
