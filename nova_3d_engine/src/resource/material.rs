/// Material resource - shader program + typed uniform tables
///
/// A material owns a compiled [`ShaderProgram`] and two tables built by
/// reflection at construction: scalar/vector/matrix uniforms (name to a
/// fixed 64-byte payload, zero-initialized) and resource uniforms (name to
/// an entity handle, for sampler and storage-block inputs). The three
/// transform uniforms `u_model`/`u_view`/`u_projection` are excluded from
/// both tables; only their locations are cached, since they change every
/// draw call and go through [`bind_pvm`](Material::bind_pvm).

use std::path::Path;

use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::graphics::{DriverHandle, ShaderDataType, ShaderProgram, StorageBuffer, UniformLocation};
use crate::nova3d::Result;
use crate::resource::Texture;
use crate::world::{EntityRef, World};
use crate::{engine_err, engine_warn};

/// Reserved per-draw model matrix uniform
pub const MODEL_UNIFORM: &str = "u_model";
/// Reserved per-draw view matrix uniform
pub const VIEW_UNIFORM: &str = "u_view";
/// Reserved per-draw projection matrix uniform
pub const PROJECTION_UNIFORM: &str = "u_projection";

/// Largest accepted scalar uniform payload (one mat4)
const MAX_UNIFORM_SIZE: usize = 64;

// ============================================================================
// Uniform value types
// ============================================================================

mod sealed {
    pub trait Sealed {}
}

/// Closed set of CPU-side types accepted by [`Material::set_uniform`]
///
/// Every implementor is plain-old-data of exactly the byte size its logical
/// type declares, so uploads are straight memcpys.
pub trait UniformValue: bytemuck::Pod + sealed::Sealed {
    const DATA_TYPE: ShaderDataType;
}

macro_rules! impl_uniform_value {
    ($($ty:ty => $data_type:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl UniformValue for $ty {
                const DATA_TYPE: ShaderDataType = ShaderDataType::$data_type;
            }
        )*
    };
}

impl_uniform_value!(
    f32 => Float,
    glam::Vec2 => Vec2,
    glam::Vec3 => Vec3,
    glam::Vec4 => Vec4,
    glam::Mat2 => Mat2,
    glam::Mat3 => Mat3,
    glam::Mat4 => Mat4,
    i32 => Int,
    glam::IVec2 => IVec2,
    glam::IVec3 => IVec3,
    glam::IVec4 => IVec4,
);

// ============================================================================
// Tables
// ============================================================================

struct Uniform {
    data_type: ShaderDataType,
    location: UniformLocation,
    data: [u8; MAX_UNIFORM_SIZE],
}

enum ResourceBinding {
    /// Sampler uniform, bound through a texture unit
    Sampler { location: UniformLocation },
    /// Storage block, bound through a buffer binding index
    StorageBlock { index: u32 },
}

/// Resources are kept apart from plain uniforms: they hold entity handles
/// whose liveness is re-checked every bind.
struct ResourceUniform {
    binding: ResourceBinding,
    resource: Option<EntityRef>,
}

// ============================================================================
// Material
// ============================================================================

/// Material component stored on a resource entity
pub struct Material {
    program: ShaderProgram,
    uniforms: FxHashMap<String, Uniform>,
    resource_uniforms: FxHashMap<String, ResourceUniform>,
    model_location: Option<UniformLocation>,
    view_location: Option<UniformLocation>,
    projection_location: Option<UniformLocation>,
}

impl Material {
    /// Compile from vertex + fragment source and build the uniform tables
    ///
    /// Compilation failure does not fail the call: the material is created
    /// invalid, with the accumulated diagnostics queryable through
    /// [`errors`](Material::errors).
    pub fn new(driver: &DriverHandle, vertex_source: &str, fragment_source: &str) -> Material {
        let program = ShaderProgram::new(driver, vertex_source, fragment_source);

        let mut uniforms = FxHashMap::default();
        let mut resource_uniforms = FxHashMap::default();
        let mut model_location = None;
        let mut view_location = None;
        let mut projection_location = None;

        for info in program.uniforms() {
            match info.name.as_str() {
                MODEL_UNIFORM => {
                    model_location = Some(info.location);
                    continue;
                }
                VIEW_UNIFORM => {
                    view_location = Some(info.location);
                    continue;
                }
                PROJECTION_UNIFORM => {
                    projection_location = Some(info.location);
                    continue;
                }
                _ => {}
            }

            if info.data_type.is_sampler() {
                resource_uniforms.insert(
                    info.name.clone(),
                    ResourceUniform {
                        binding: ResourceBinding::Sampler { location: info.location },
                        resource: None,
                    },
                );
            } else {
                uniforms.insert(
                    info.name.clone(),
                    Uniform {
                        data_type: info.data_type,
                        location: info.location,
                        data: [0; MAX_UNIFORM_SIZE],
                    },
                );
            }
        }

        for block in program.storage_blocks() {
            resource_uniforms.insert(
                block.name.clone(),
                ResourceUniform {
                    binding: ResourceBinding::StorageBlock { index: block.index },
                    resource: None,
                },
            );
        }

        Material {
            program,
            uniforms,
            resource_uniforms,
            model_location,
            view_location,
            projection_location,
        }
    }

    /// Create a material resource entity from shader source
    pub fn create_from_source(
        world: &World,
        driver: &DriverHandle,
        vertex_source: &str,
        fragment_source: &str,
    ) -> EntityRef {
        let handle = EntityRef::create(world);
        handle.set(Material::new(driver, vertex_source, fragment_source));
        handle
    }

    /// Create a material resource entity from shader source files
    pub fn load(
        world: &World,
        driver: &DriverHandle,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<EntityRef> {
        let vertex_source = std::fs::read_to_string(vertex_path).map_err(|e| {
            engine_err!(
                "nova3d::Material",
                "Could not read vertex shader '{}': {}",
                vertex_path.display(),
                e
            )
        })?;
        let fragment_source = std::fs::read_to_string(fragment_path).map_err(|e| {
            engine_err!(
                "nova3d::Material",
                "Could not read fragment shader '{}': {}",
                fragment_path.display(),
                e
            )
        })?;
        Ok(Material::create_from_source(
            world,
            driver,
            &vertex_source,
            &fragment_source,
        ))
    }

    /// Whether the shader program compiled and linked
    pub fn is_valid(&self) -> bool {
        self.program.is_valid()
    }

    /// Accumulated compile/link diagnostics (empty when valid)
    pub fn errors(&self) -> &str {
        self.program.errors()
    }

    /// Set a scalar/vector/matrix uniform by name
    ///
    /// Names the program does not declare, and payloads whose size does not
    /// match the declared logical type, are logged and skipped. Shader
    /// variants legitimately drop uniforms a caller sets, so neither case is
    /// an error, and neither grows the table.
    pub fn set_uniform<T: UniformValue>(&mut self, name: &str, value: T) {
        let Some(slot) = self.uniforms.get_mut(name) else {
            engine_warn!("nova3d::Material", "Unknown uniform '{}', ignored", name);
            return;
        };
        if T::DATA_TYPE.size() != slot.data_type.size() {
            engine_warn!(
                "nova3d::Material",
                "Uniform '{}' is {:?} ({} bytes), got {:?} ({} bytes), ignored",
                name,
                slot.data_type,
                slot.data_type.size(),
                T::DATA_TYPE,
                T::DATA_TYPE.size()
            );
            return;
        }
        let bytes = bytemuck::bytes_of(&value);
        slot.data[..bytes.len()].copy_from_slice(bytes);
    }

    /// Set a sampler or storage-block input by name
    pub fn set_uniform_resource(&mut self, name: &str, resource: EntityRef) {
        let Some(slot) = self.resource_uniforms.get_mut(name) else {
            engine_warn!(
                "nova3d::Material",
                "Unknown resource uniform '{}', ignored",
                name
            );
            return;
        };
        slot.resource = Some(resource);
    }

    /// Activate the program and upload every material-level uniform
    ///
    /// Idempotent on program state: the bind is skipped when this material's
    /// program is already active. Assumes programs are unique per material
    /// instance; two materials sharing one compiled program would leave the
    /// second one's uniforms stale.
    ///
    /// Dead, unset or wrong-typed resource entries are skipped; textures are
    /// assigned to sequential units, storage buffers go to their reflected
    /// binding index.
    pub fn bind_material(&self) {
        if !self.program.is_bound() {
            self.program.bind();
        }

        for slot in self.uniforms.values() {
            self.program.set_uniform_bytes(
                slot.location,
                slot.data_type,
                &slot.data[..slot.data_type.size()],
            );
        }

        let mut unit: u32 = 0;
        for (name, slot) in &self.resource_uniforms {
            let Some(handle) = &slot.resource else {
                continue;
            };
            if !handle.is_alive() {
                engine_warn!(
                    "nova3d::Material",
                    "Resource uniform '{}' holds a dead handle, skipped",
                    name
                );
                continue;
            }
            match &slot.binding {
                ResourceBinding::Sampler { location } => {
                    let Some(texture) = handle.get::<Texture>() else {
                        engine_warn!(
                            "nova3d::Material",
                            "Resource uniform '{}' does not hold a texture, skipped",
                            name
                        );
                        continue;
                    };
                    texture.bind(unit);
                    self.program.set_uniform_bytes(
                        *location,
                        ShaderDataType::Int,
                        bytemuck::bytes_of(&(unit as i32)),
                    );
                    unit += 1;
                }
                ResourceBinding::StorageBlock { index } => {
                    let Some(buffer) = handle.get::<StorageBuffer>() else {
                        engine_warn!(
                            "nova3d::Material",
                            "Resource uniform '{}' does not hold a storage buffer, skipped",
                            name
                        );
                        continue;
                    };
                    buffer.bind(*index);
                }
            }
        }
    }

    /// Upload the three per-draw transform matrices
    ///
    /// Always re-uploads regardless of bind state: unlike material-level
    /// uniforms these change every draw call.
    pub fn bind_pvm(&self, projection: &Mat4, view: &Mat4, model: &Mat4) {
        if let Some(location) = self.projection_location {
            self.program
                .set_uniform_bytes(location, ShaderDataType::Mat4, bytemuck::bytes_of(projection));
        }
        if let Some(location) = self.view_location {
            self.program
                .set_uniform_bytes(location, ShaderDataType::Mat4, bytemuck::bytes_of(view));
        }
        if let Some(location) = self.model_location {
            self.program
                .set_uniform_bytes(location, ShaderDataType::Mat4, bytemuck::bytes_of(model));
        }
    }

    /// Number of scalar uniforms reflected into the table (reserved names
    /// excluded)
    pub fn uniform_count(&self) -> usize {
        self.uniforms.len()
    }

    /// The compiled program backing this material
    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
