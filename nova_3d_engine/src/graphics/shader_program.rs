/// Compiled shader program with one-time reflection

use crate::graphics::{
    DriverHandle, ProgramId, ShaderDataType, StorageBlockInfo, UniformInfo, UniformLocation,
};

/// Compiled GPU program plus reflected metadata
///
/// Reflection happens exactly once, at construction, after link success.
/// Compile or link failure never panics: it is recorded as a validity flag
/// plus accumulated diagnostic text (vertex, then fragment, then link) that
/// callers query through [`is_valid`](ShaderProgram::is_valid) and
/// [`errors`](ShaderProgram::errors).
pub struct ShaderProgram {
    driver: DriverHandle,
    id: ProgramId,
    valid: bool,
    errors: String,
    uniforms: Vec<UniformInfo>,
    storage_blocks: Vec<StorageBlockInfo>,
}

impl ShaderProgram {
    /// Compile and link from vertex + fragment source
    pub fn new(driver: &DriverHandle, vertex_source: &str, fragment_source: &str) -> ShaderProgram {
        let reflection = driver
            .borrow_mut()
            .compile_program(vertex_source, fragment_source);
        ShaderProgram {
            driver: driver.clone(),
            id: reflection.program,
            valid: reflection.valid,
            errors: reflection.errors,
            uniforms: reflection.uniforms,
            storage_blocks: reflection.storage_blocks,
        }
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Whether compilation and linking succeeded
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Accumulated compile/link diagnostics (empty when valid)
    pub fn errors(&self) -> &str {
        &self.errors
    }

    /// Active uniforms in declaration order
    pub fn uniforms(&self) -> &[UniformInfo] {
        &self.uniforms
    }

    /// Storage blocks in declaration order
    pub fn storage_blocks(&self) -> &[StorageBlockInfo] {
        &self.storage_blocks
    }

    /// Resolved location of a uniform by name
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms
            .iter()
            .find(|u| u.name == name)
            .map(|u| u.location)
    }

    /// Make this program the active one
    pub fn bind(&self) {
        self.driver.borrow_mut().bind_program(self.id);
    }

    /// Whether this program is the active one
    pub fn is_bound(&self) -> bool {
        self.driver.borrow().bound_program() == Some(self.id)
    }

    /// Upload a raw uniform payload to a location of this program
    ///
    /// `data` must be exactly `data_type.size()` bytes; the driver contract
    /// assumes it.
    pub fn set_uniform_bytes(
        &self,
        location: UniformLocation,
        data_type: ShaderDataType,
        data: &[u8],
    ) {
        self.driver
            .borrow_mut()
            .set_uniform(self.id, location, data_type, data);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.driver.borrow_mut().destroy_program(self.id);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "shader_program_tests.rs"]
mod tests;
