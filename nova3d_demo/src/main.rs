//! Nova3D deferred-renderer demo
//!
//! Spins a textured-less quad under two moving point lights through the
//! headless backend for a fixed number of frames. Swap in a real window and
//! driver implementation to put the same scene on screen.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Quat, Vec2, Vec3, Vec4};

use nova_3d_engine::engine_info;
use nova_3d_engine::nova3d::graphics::{DriverHandle, HeadlessDriver};
use nova_3d_engine::nova3d::render::{ArrayMeshInstance, Renderer, Visible};
use nova_3d_engine::nova3d::resource::{ArrayMesh, Material, Vertex};
use nova_3d_engine::nova3d::scene::{Camera, PointLight, Transform};
use nova_3d_engine::nova3d::windowing::HeadlessWindow;
use nova_3d_engine::nova3d::world::{Entity, Phase, World};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;
const FRAME_BUDGET: u32 = 240;

fn spawn_quad(world: &World, driver: &DriverHandle, renderer: &Renderer) -> Entity {
    let vertices = [
        Vertex { position: Vec3::new(-1.0, -1.0, 0.0), uv: Vec2::new(0.0, 0.0) },
        Vertex { position: Vec3::new(1.0, -1.0, 0.0), uv: Vec2::new(1.0, 0.0) },
        Vertex { position: Vec3::new(1.0, 1.0, 0.0), uv: Vec2::new(1.0, 1.0) },
        Vertex { position: Vec3::new(-1.0, 1.0, 0.0), uv: Vec2::new(0.0, 1.0) },
    ];

    renderer
        .default_material()
        .get_mut::<Material>()
        .expect("built-in material")
        .set_uniform("u_albedo", Vec4::new(0.8, 0.3, 0.2, 1.0));

    let mesh = ArrayMesh::create(world, driver);
    mesh.get_mut::<ArrayMesh>().expect("just created").add_surface(
        &vertices,
        &[0, 1, 2, 2, 3, 0],
        renderer.default_material().clone(),
    );

    let entity = world.spawn();
    world.set(entity, Transform::default());
    world.set(entity, ArrayMeshInstance { array_mesh: mesh });
    world.add::<Visible>(entity);
    entity
}

fn spawn_light(world: &World, position: Vec3, color: Vec3, energy: f32) -> Entity {
    let entity = world.spawn();
    world.set(entity, Transform::new(position, Quat::IDENTITY, Vec3::ONE));
    world.set(entity, PointLight { color, energy });
    world.add::<Visible>(entity);
    entity
}

fn main() {
    let world = World::new();
    let driver: DriverHandle = HeadlessDriver::new_shared();
    let window = Box::new(HeadlessWindow::new(WIDTH, HEIGHT, "Nova3D demo", FRAME_BUDGET));

    let renderer = Renderer::install(&world, window, driver.clone());

    let camera = Camera::create(&world);
    world
        .get_mut::<Transform>(camera)
        .expect("camera transform")
        .set_position(Vec3::new(0.0, 0.0, 5.0));
    renderer.borrow_mut().set_current_camera(&world, camera);

    let quad = spawn_quad(&world, &driver, &renderer.borrow());
    spawn_light(&world, Vec3::new(3.0, 2.0, 2.0), Vec3::new(1.0, 0.9, 0.8), 10.0);
    spawn_light(&world, Vec3::new(-3.0, -1.0, 2.0), Vec3::new(0.2, 0.4, 1.0), 6.0);

    // Game logic: one slow turn of the quad per run
    let frame = Rc::new(RefCell::new(0u32));
    let counter = frame.clone();
    world.add_system(Phase::Update, "Spin Quad", move |world| {
        let mut count = counter.borrow_mut();
        *count += 1;
        if let Some(mut transform) = world.get_mut::<Transform>(quad) {
            let angle = *count as f32 / FRAME_BUDGET as f32 * std::f32::consts::TAU;
            transform.set_rotation(Quat::from_rotation_y(angle));
        }
    });

    engine_info!("nova3d_demo", "Starting main loop ({}x{})", WIDTH, HEIGHT);
    while !renderer.borrow().window_should_close() {
        world.progress();
    }
    engine_info!("nova3d_demo", "Rendered {} frames", frame.borrow());
}
