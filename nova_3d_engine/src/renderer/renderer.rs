/// Renderer - the per-frame deferred rendering pipeline
///
/// One renderer per running scene, passed explicitly into each pipeline
/// stage as a shared service object. Per frame, five strictly ordered
/// stages run through the world schedule:
///
/// 1. StartFrame (PreUpdate): make the context current, poll events, clear
///    the default target, bind + resize + clear the G-buffer.
/// 2. ResolveCamera (PostUpdate): view = inverse of the camera transform,
///    projection from the camera parameters and window size.
/// 3. GeometryPass (PreStore): rasterize every visible mesh instance into
///    the G-buffer.
/// 4. LightGather (PreStore, after 3): upload visible point lights into the
///    two grow-only storage buffers.
/// 5. Composite+Present (OnStore): bind the default target, draw the
///    fullscreen quad through the screen material, swap buffers.
///
/// The light buffers are written in stage 4 and read in stage 5; ordering is
/// enforced by phase + registration order alone, so reordering stages is a
/// correctness bug.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Mat4;

use crate::graphics::{ClearMask, DriverHandle, StorageBuffer, TextureFormat};
use crate::renderer::shaders;
use crate::resource::{ArrayMesh, Framebuffer, Material, Vertex};
use crate::scene::{Camera, PointLight, ProjectionType, Transform};
use crate::windowing::WindowContext;
use crate::world::{Entity, EntityRef, World};
use crate::{engine_assert, engine_info, engine_warn};

// ============================================================================
// Render components
// ============================================================================

/// Marker gating an entity into the geometry and light passes
#[derive(Debug, Clone, Copy, Default)]
pub struct Visible;

/// Places a mesh resource into the scene at the entity's transform
pub struct ArrayMeshInstance {
    pub array_mesh: EntityRef,
}

// ============================================================================
// Pipeline constants
// ============================================================================

/// G-buffer targets: world position, albedo, normal
pub const GBUFFER_FORMATS: [TextureFormat; 3] = [
    TextureFormat::RGBA16F,
    TextureFormat::RGBA8,
    TextureFormat::RGBA16F,
];

const CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];

/// One packed light record: vec4 of color+energy or position
const LIGHT_RECORD_SIZE: usize = 16;

fn screen_quad_vertices() -> [Vertex; 4] {
    [
        Vertex { position: glam::Vec3::new(-1.0, -1.0, 0.0), uv: glam::Vec2::new(0.0, 0.0) },
        Vertex { position: glam::Vec3::new(1.0, -1.0, 0.0), uv: glam::Vec2::new(1.0, 0.0) },
        Vertex { position: glam::Vec3::new(1.0, 1.0, 0.0), uv: glam::Vec2::new(1.0, 1.0) },
        Vertex { position: glam::Vec3::new(-1.0, 1.0, 0.0), uv: glam::Vec2::new(0.0, 1.0) },
    ]
}

const SCREEN_QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

// ============================================================================
// Renderer
// ============================================================================

/// Frame pipeline state and the resources it owns
pub struct Renderer {
    window: Box<dyn WindowContext>,
    driver: DriverHandle,
    current_camera: Option<Entity>,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    gbuffer: EntityRef,
    default_material: EntityRef,
    screen_material: EntityRef,
    screen_quad: EntityRef,
    light_colors: EntityRef,
    light_positions: EntityRef,
}

impl Renderer {
    /// Create the renderer resources and register the five pipeline stages
    /// on the world schedule
    pub fn install(
        world: &World,
        window: Box<dyn WindowContext>,
        driver: DriverHandle,
    ) -> Rc<RefCell<Renderer>> {
        let width = window.width();
        let height = window.height();

        let gbuffer = Framebuffer::create(world, &driver, width, height, &GBUFFER_FORMATS);

        let light_colors = EntityRef::create(world);
        light_colors.set(StorageBuffer::new(&driver));
        let light_positions = EntityRef::create(world);
        light_positions.set(StorageBuffer::new(&driver));

        let default_material = Material::create_from_source(
            world,
            &driver,
            shaders::GEOMETRY_VERTEX,
            shaders::GEOMETRY_FRAGMENT,
        );
        let screen_material = Material::create_from_source(
            world,
            &driver,
            shaders::SCREEN_VERTEX,
            shaders::SCREEN_FRAGMENT,
        );

        // Feed the composite material from the G-buffer and the light tables
        let (position_target, albedo_target, normal_target) = {
            let framebuffer = gbuffer
                .get::<Framebuffer>()
                .expect("just created this framebuffer");
            (
                framebuffer.attachment(0),
                framebuffer.attachment(1),
                framebuffer.attachment(2),
            )
        };
        {
            let mut material = screen_material
                .get_mut::<Material>()
                .expect("just created this material");
            material.set_uniform_resource("u_gbuffer_position", position_target);
            material.set_uniform_resource("u_gbuffer_albedo", albedo_target);
            material.set_uniform_resource("u_gbuffer_normal", normal_target);
            material.set_uniform_resource("LightColors", light_colors.clone());
            material.set_uniform_resource("LightPositions", light_positions.clone());
            material.set_uniform("u_light_count", 0i32);
        }

        let screen_quad = ArrayMesh::create(world, &driver);
        screen_quad
            .get_mut::<ArrayMesh>()
            .expect("just created this mesh")
            .add_surface(
                &screen_quad_vertices(),
                &SCREEN_QUAD_INDICES,
                screen_material.clone(),
            );

        let renderer = Rc::new(RefCell::new(Renderer {
            window,
            driver,
            current_camera: None,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            gbuffer,
            default_material,
            screen_material,
            screen_quad,
            light_colors,
            light_positions,
        }));

        Renderer::install_stages(world, &renderer);
        engine_info!("nova3d::Renderer", "Renderer installed ({}x{})", width, height);
        renderer
    }

    fn install_stages(world: &World, renderer: &Rc<RefCell<Renderer>>) {
        use crate::world::Phase;

        let rd = renderer.clone();
        world.add_system(Phase::PreUpdate, "Start Frame", move |_world| {
            rd.borrow_mut().start_frame();
        });

        let rd = renderer.clone();
        world.add_system(Phase::PostUpdate, "Resolve Camera", move |world| {
            rd.borrow_mut().resolve_camera(world);
        });

        let rd = renderer.clone();
        world.add_system(Phase::PreStore, "Geometry Pass", move |world| {
            rd.borrow().geometry_pass(world);
        });

        let rd = renderer.clone();
        world.add_system(Phase::PreStore, "Light Gather", move |world| {
            rd.borrow().light_gather(world);
        });

        let rd = renderer.clone();
        world.add_system(Phase::OnStore, "Composite and Present", move |_world| {
            rd.borrow_mut().composite_present();
        });
    }

    // ----- Stage 1 -----

    fn start_frame(&mut self) {
        self.window.make_current();
        self.window.poll_events();

        let width = self.window.width();
        let height = self.window.height();
        {
            let mut driver = self.driver.borrow_mut();
            driver.bind_framebuffer(None);
            driver.set_viewport(width, height);
            driver.clear(ClearMask::COLOR | ClearMask::DEPTH, CLEAR_COLOR);
        }

        if let Some(mut framebuffer) = self.gbuffer.get_mut::<Framebuffer>() {
            framebuffer.set_size(width, height);
            framebuffer.bind();
        }
        self.driver
            .borrow_mut()
            .clear(ClearMask::COLOR | ClearMask::DEPTH, CLEAR_COLOR);
    }

    // ----- Stage 2 -----

    fn resolve_camera(&mut self, world: &World) {
        // No camera set: keep the last-known view/projection
        let Some(camera_entity) = self.current_camera else {
            return;
        };
        if !world.is_alive(camera_entity) {
            return;
        }
        let Some(camera) = world.get::<Camera>(camera_entity).map(|c| *c) else {
            return;
        };
        let Some(camera_matrix) = world
            .get_mut::<Transform>(camera_entity)
            .map(|mut t| t.matrix())
        else {
            return;
        };

        // Minimized windows report zero extents; keep the last-known
        // matrices rather than computing a NaN projection
        let width = self.window.width() as f32;
        let height = self.window.height() as f32;
        if width == 0.0 || height == 0.0 {
            return;
        }

        self.view_matrix = camera_matrix.inverse();
        self.projection_matrix = match camera.projection {
            ProjectionType::Perspective => {
                Mat4::perspective_rh_gl(camera.fov, width / height, camera.near, camera.far)
            }
            ProjectionType::Orthographic => Mat4::orthographic_rh_gl(
                -0.5 * width,
                0.5 * width,
                -0.5 * height,
                0.5 * height,
                camera.near,
                camera.far,
            ),
        };
    }

    // ----- Stage 3 -----

    fn geometry_pass(&self, world: &World) {
        for entity in world.entities_with::<ArrayMeshInstance>() {
            if !world.has::<Visible>(entity) || !world.has::<Transform>(entity) {
                continue;
            }
            let Some(model) = world.get_mut::<Transform>(entity).map(|mut t| t.matrix()) else {
                continue;
            };
            let Some(mesh_handle) = world
                .get::<ArrayMeshInstance>(entity)
                .map(|instance| instance.array_mesh.clone())
            else {
                continue;
            };
            if !mesh_handle.is_alive() {
                engine_warn!(
                    "nova3d::Renderer",
                    "Mesh instance on {:?} holds a dead mesh handle, skipped",
                    entity
                );
                continue;
            }
            let Some(mesh) = mesh_handle.get::<ArrayMesh>() else {
                engine_warn!(
                    "nova3d::Renderer",
                    "Mesh instance on {:?} does not point at a mesh, skipped",
                    entity
                );
                continue;
            };
            mesh.record_draw(&self.projection_matrix, &self.view_matrix, &model);
        }
    }

    // ----- Stage 4 -----

    fn light_gather(&self, world: &World) {
        let mut colors: Vec<[f32; 4]> = Vec::new();
        let mut positions: Vec<[f32; 4]> = Vec::new();

        for entity in world.entities_with::<PointLight>() {
            if !world.has::<Visible>(entity) || !world.has::<Transform>(entity) {
                continue;
            }
            let Some(light) = world.get::<PointLight>(entity).map(|l| *l) else {
                continue;
            };
            let Some(world_position) = world
                .get_mut::<Transform>(entity)
                .map(|mut t| t.matrix().w_axis)
            else {
                continue;
            };
            colors.push([light.color.x, light.color.y, light.color.z, light.energy]);
            positions.push(world_position.to_array());
        }

        let byte_size = colors.len() * LIGHT_RECORD_SIZE;
        if let Some(mut buffer) = self.light_colors.get_mut::<StorageBuffer>() {
            buffer.reserve(byte_size);
            buffer.upload(bytemuck::cast_slice(&colors));
        }
        if let Some(mut buffer) = self.light_positions.get_mut::<StorageBuffer>() {
            buffer.reserve(byte_size);
            buffer.upload(bytemuck::cast_slice(&positions));
        }
        if let Some(mut material) = self.screen_material.get_mut::<Material>() {
            material.set_uniform("u_light_count", colors.len() as i32);
        }
    }

    // ----- Stage 5 -----

    fn composite_present(&mut self) {
        self.driver.borrow_mut().bind_framebuffer(None);
        if let Some(quad) = self.screen_quad.get::<ArrayMesh>() {
            quad.record_draw(&Mat4::IDENTITY, &Mat4::IDENTITY, &Mat4::IDENTITY);
        }
        self.window.swap_buffers();
    }

    // ----- Camera -----

    /// Make an entity the active camera
    ///
    /// The entity must carry both a Camera and a Transform component; a
    /// renderer with a cameraless "camera" cannot produce a projection, so
    /// violating this is fatal.
    pub fn set_current_camera(&mut self, world: &World, entity: Entity) {
        engine_assert!(
            world.has::<Camera>(entity),
            "nova3d::Renderer",
            "The provided entity is not a camera"
        );
        engine_assert!(
            world.has::<Transform>(entity),
            "nova3d::Renderer",
            "The provided camera has no transform component"
        );
        self.current_camera = Some(entity);
    }

    pub fn current_camera(&self) -> Option<Entity> {
        self.current_camera
    }

    // ----- Accessors -----

    /// View matrix computed by the last camera resolve
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    /// Projection matrix computed by the last camera resolve
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// Handle to the G-buffer resource
    pub fn gbuffer(&self) -> &EntityRef {
        &self.gbuffer
    }

    /// Handle to the built-in geometry-pass material
    pub fn default_material(&self) -> &EntityRef {
        &self.default_material
    }

    /// Handle to the screen-composite material
    pub fn screen_material(&self) -> &EntityRef {
        &self.screen_material
    }

    /// Handle to the color/energy light table
    pub fn light_colors(&self) -> &EntityRef {
        &self.light_colors
    }

    /// Handle to the position light table
    pub fn light_positions(&self) -> &EntityRef {
        &self.light_positions
    }

    pub fn window_should_close(&self) -> bool {
        self.window.should_close()
    }

    pub fn window_set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
