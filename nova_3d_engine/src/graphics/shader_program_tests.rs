/// Tests for shader program compilation and reflection

use super::*;
use crate::graphics::{DriverHandle, HeadlessDriver};

const VERTEX: &str = "
uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
void main() {}
";

const FRAGMENT: &str = "
uniform vec4 u_color;
uniform sampler2D u_albedo;
layout(std430, binding = 0) buffer LightColors { vec4 colors[]; };
void main() {}
";

fn setup() -> DriverHandle {
    let driver: DriverHandle = HeadlessDriver::new_shared();
    driver
}

#[test]
fn test_valid_program_reflects_uniforms_in_order() {
    let driver = setup();
    let program = ShaderProgram::new(&driver, VERTEX, FRAGMENT);

    assert!(program.is_valid());
    assert!(program.errors().is_empty());

    let names: Vec<&str> = program.uniforms().iter().map(|u| u.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["u_model", "u_view", "u_projection", "u_color", "u_albedo"]
    );
    assert_eq!(program.uniforms()[3].data_type, ShaderDataType::Vec4);
    assert_eq!(program.uniforms()[4].data_type, ShaderDataType::Sampler2D);
}

#[test]
fn test_reflection_assigns_distinct_locations() {
    let driver = setup();
    let program = ShaderProgram::new(&driver, VERTEX, FRAGMENT);

    let mut locations: Vec<_> = program.uniforms().iter().map(|u| u.location).collect();
    locations.sort_unstable();
    locations.dedup();
    assert_eq!(locations.len(), program.uniforms().len());
}

#[test]
fn test_storage_blocks_are_reflected() {
    let driver = setup();
    let program = ShaderProgram::new(&driver, VERTEX, FRAGMENT);

    assert_eq!(program.storage_blocks().len(), 1);
    assert_eq!(program.storage_blocks()[0].name, "LightColors");
}

#[test]
fn test_uniform_location_lookup() {
    let driver = setup();
    let program = ShaderProgram::new(&driver, VERTEX, FRAGMENT);

    assert!(program.uniform_location("u_color").is_some());
    assert!(program.uniform_location("u_missing").is_none());
}

#[test]
fn test_invalid_fragment_names_the_stage() {
    let driver = setup();
    let program = ShaderProgram::new(&driver, VERTEX, "uniform vec4 u_color;");

    assert!(!program.is_valid());
    assert!(program.errors().contains("fragment"));
    // Failed programs reflect nothing
    assert!(program.uniforms().is_empty());
}

#[test]
fn test_errors_accumulate_vertex_then_fragment() {
    let driver = setup();
    let program = ShaderProgram::new(&driver, "", "");

    assert!(!program.is_valid());
    let vertex_pos = program.errors().find("vertex").unwrap();
    let fragment_pos = program.errors().find("fragment").unwrap();
    assert!(vertex_pos < fragment_pos);
}

#[test]
fn test_bind_tracks_active_program() {
    let driver = setup();
    let first = ShaderProgram::new(&driver, VERTEX, FRAGMENT);
    let second = ShaderProgram::new(&driver, VERTEX, FRAGMENT);

    first.bind();
    assert!(first.is_bound());
    assert!(!second.is_bound());

    second.bind();
    assert!(!first.is_bound());
    assert!(second.is_bound());
}
