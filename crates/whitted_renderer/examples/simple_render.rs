//! Simple ray tracer example.
//!
//! Renders a glossy sphere resting on a wooden floor and saves it as PPM.

use std::sync::Arc;

use whitted_core::Material;
use whitted_renderer::{
    render_parallel, Camera, Color, Light, Plane, PpmFormat, RenderConfig, Scene, Sphere, Vector3,
};

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let wood = Arc::new(
        Material::new("wood", Color::new(0.5, 0.25, 0.0)).with_specular(Color::splat(0.9), 10.0),
    );
    let glossy = Arc::new(
        Material::new("glossy", Color::splat(0.9)).with_specular(Color::splat(0.5), 10.0),
    );

    let floor = Plane::new(Vector3::ZERO, Vector3::Y, wood);
    let ball = Sphere::new(Vector3::new(6.0, 2.0, 0.0), 2.0, glossy);

    let mut scene = Scene::new().with_ambient_light(Color::new(0.1, 0.1, 0.4));
    scene.add(&floor);
    scene.add(&ball);
    scene.add_light(Light::new(Vector3::new(0.0, 8.0, -5.0)));

    let camera = Camera::new(Vector3::new(-2.0, 3.0, 0.0), Vector3::new(6.0, 2.0, 0.0))
        .expect("camera basis")
        .with_resolution(800, 450);

    let start = std::time::Instant::now();
    let image = render_parallel(&camera, &scene, &RenderConfig::default());
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    image
        .save_ppm(filename, PpmFormat::Ascii)
        .expect("Failed to save image");
    println!("Saved to {}", filename);
}
