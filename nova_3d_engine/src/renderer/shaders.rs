/// Built-in shader sources for the deferred pipeline

/// Geometry pass: writes world position, albedo and normal into the
/// G-buffer targets
pub const GEOMETRY_VERTEX: &str = r#"
#version 430 core

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec2 a_uv;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_world_position;
out vec3 v_world_normal;
out vec2 v_uv;

void main() {
    vec4 world_position = u_model * vec4(a_position, 1.0);
    v_world_position = world_position.xyz;
    v_world_normal = normalize(mat3(u_model) * vec3(0.0, 0.0, 1.0));
    v_uv = a_uv;
    gl_Position = u_projection * u_view * world_position;
}
"#;

pub const GEOMETRY_FRAGMENT: &str = r#"
#version 430 core

uniform vec4 u_albedo;

in vec3 v_world_position;
in vec3 v_world_normal;
in vec2 v_uv;

layout(location = 0) out vec4 o_position;
layout(location = 1) out vec4 o_albedo;
layout(location = 2) out vec4 o_normal;

void main() {
    o_position = vec4(v_world_position, 1.0);
    o_albedo = u_albedo;
    o_normal = vec4(normalize(v_world_normal), 0.0);
}
"#;

/// Composite pass: reads the three G-buffer attachments and the light
/// tables, accumulates point-light contributions per pixel
pub const SCREEN_VERTEX: &str = r#"
#version 430 core

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec2 a_uv;

out vec2 v_uv;

void main() {
    v_uv = a_uv;
    gl_Position = vec4(a_position, 1.0);
}
"#;

pub const SCREEN_FRAGMENT: &str = r#"
#version 430 core

uniform sampler2D u_gbuffer_position;
uniform sampler2D u_gbuffer_albedo;
uniform sampler2D u_gbuffer_normal;
uniform int u_light_count;

layout(std430, binding = 0) buffer LightColors {
    vec4 light_colors[];
};

layout(std430, binding = 1) buffer LightPositions {
    vec4 light_positions[];
};

in vec2 v_uv;

out vec4 o_color;

void main() {
    vec3 position = texture(u_gbuffer_position, v_uv).xyz;
    vec4 albedo = texture(u_gbuffer_albedo, v_uv);
    vec3 normal = normalize(texture(u_gbuffer_normal, v_uv).xyz);

    vec3 lit = vec3(0.0);
    for (int i = 0; i < u_light_count; i++) {
        vec3 to_light = light_positions[i].xyz - position;
        float attenuation = light_colors[i].w / max(dot(to_light, to_light), 0.0001);
        float incidence = max(dot(normal, normalize(to_light)), 0.0);
        lit += albedo.rgb * light_colors[i].rgb * incidence * attenuation;
    }
    o_color = vec4(lit, albedo.a);
}
"#;
