/// Logical shader data types
///
/// Every uniform and vertex attribute carries one of these tags. Byte sizes
/// and component counts follow the std140-free tightly packed convention
/// used by client-side vertex layouts and uniform payloads.

/// Logical type of a shader uniform or vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderDataType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
    Int,
    IVec2,
    IVec3,
    IVec4,
    Bool,
    /// 2D texture sampler (bound through a texture unit index)
    Sampler2D,
}

impl ShaderDataType {
    /// Byte size of one value of this type
    pub fn size(self) -> usize {
        match self {
            ShaderDataType::Float => 4,
            ShaderDataType::Vec2 => 8,
            ShaderDataType::Vec3 => 12,
            ShaderDataType::Vec4 => 16,
            ShaderDataType::Mat2 => 16,
            ShaderDataType::Mat3 => 36,
            ShaderDataType::Mat4 => 64,
            ShaderDataType::Int => 4,
            ShaderDataType::IVec2 => 8,
            ShaderDataType::IVec3 => 12,
            ShaderDataType::IVec4 => 16,
            ShaderDataType::Bool => 4,
            ShaderDataType::Sampler2D => 4,
        }
    }

    /// Number of scalar components (matrices report columns * rows)
    pub fn component_count(self) -> u32 {
        match self {
            ShaderDataType::Float => 1,
            ShaderDataType::Vec2 => 2,
            ShaderDataType::Vec3 => 3,
            ShaderDataType::Vec4 => 4,
            ShaderDataType::Mat2 => 4,
            ShaderDataType::Mat3 => 9,
            ShaderDataType::Mat4 => 16,
            ShaderDataType::Int => 1,
            ShaderDataType::IVec2 => 2,
            ShaderDataType::IVec3 => 3,
            ShaderDataType::IVec4 => 4,
            ShaderDataType::Bool => 1,
            ShaderDataType::Sampler2D => 1,
        }
    }

    /// Whether this type binds a resource (texture unit) rather than bytes
    pub fn is_sampler(self) -> bool {
        matches!(self, ShaderDataType::Sampler2D)
    }

    /// Parse a GLSL type keyword
    ///
    /// Returns `None` for keywords outside the supported set.
    pub fn from_glsl(keyword: &str) -> Option<ShaderDataType> {
        match keyword {
            "float" => Some(ShaderDataType::Float),
            "vec2" => Some(ShaderDataType::Vec2),
            "vec3" => Some(ShaderDataType::Vec3),
            "vec4" => Some(ShaderDataType::Vec4),
            "mat2" => Some(ShaderDataType::Mat2),
            "mat3" => Some(ShaderDataType::Mat3),
            "mat4" => Some(ShaderDataType::Mat4),
            "int" => Some(ShaderDataType::Int),
            "ivec2" => Some(ShaderDataType::IVec2),
            "ivec3" => Some(ShaderDataType::IVec3),
            "ivec4" => Some(ShaderDataType::IVec4),
            "bool" => Some(ShaderDataType::Bool),
            "sampler2D" => Some(ShaderDataType::Sampler2D),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "shader_data_type_tests.rs"]
mod tests;
