/// Graphics module - contract-level GPU driver and RAII primitives

// Module declarations
pub mod driver;
pub mod shader_data_type;
pub mod buffer_layout;
pub mod buffer;
pub mod shader_program;
pub mod headless;

// Re-export everything
pub use driver::*;
pub use shader_data_type::*;
pub use buffer_layout::*;
pub use buffer::*;
pub use shader_program::*;
pub use headless::*;
