use clap::Parser;
use glam::{Vec3, Vec3A};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

mod cli;
mod logger;
mod output;

use cli::Args;
use logger::init_logger;
use output::{normalize, save_image_as_exr, save_image_as_png, TevSink};
use wavepath::bounds::BoundingVolume;
use wavepath::camera::Camera;
use wavepath::cube::Cube;
use wavepath::geometry::Geometry;
use wavepath::material::Material;
use wavepath::sphere::Sphere;
use wavepath::triangle::Triangle;
use wavepath::{RenderSettings, Renderer, Scene};

/// Demo camera position and aim point; the CLI lens defaults focus here.
const DEMO_EYE: Vec3A = Vec3A::new(0.0, 5.0, 10.5);
const DEMO_TARGET: Vec3A = Vec3A::new(0.0, 5.0, 0.0);

/// Cornell box with an area light, three spheres, a tilted block and a
/// triangle-mesh pyramid behind a bounding volume.
fn create_scene(width: u32, height: u32) -> Scene {
    let camera = Camera::look_at(DEMO_EYE, DEMO_TARGET, Vec3A::Y, 45.0, width, height);
    let mut scene = Scene::new(camera);

    let light = scene.add_material(Material::light(Vec3A::ONE, 5.0));
    let white = scene.add_material(Material::diffuse(Vec3A::splat(0.85)));
    let red = scene.add_material(Material::diffuse(Vec3A::new(0.85, 0.35, 0.35)));
    let green = scene.add_material(Material::diffuse(Vec3A::new(0.35, 0.85, 0.35)));
    let mirror = scene.add_material(Material::mirror(Vec3A::splat(0.98)));
    let glass = scene.add_material(Material::glass(Vec3A::splat(0.98), 1.5));
    let glossy = scene.add_material(Material::glossy(
        Vec3A::new(0.2, 0.3, 0.8),
        Vec3A::splat(0.9),
        80.0,
        0.3,
    ));
    let gold = scene.add_material(Material::diffuse(Vec3A::new(0.9, 0.7, 0.3)));

    // Walls are thin boxes.
    let wall = |center: Vec3A, size: Vec3, material_id: usize| {
        Geometry::Cube(Cube::new(center, Vec3::ZERO, size, material_id))
    };
    scene.add(wall(Vec3A::new(0.0, 10.0, 0.0), Vec3::new(3.0, 0.3, 3.0), light));
    scene.add(wall(Vec3A::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.01, 10.0), white));
    scene.add(wall(Vec3A::new(0.0, 10.0, 0.0), Vec3::new(10.0, 0.01, 10.0), white));
    scene.add(wall(Vec3A::new(0.0, 5.0, -5.0), Vec3::new(10.0, 10.0, 0.01), white));
    scene.add(wall(Vec3A::new(-5.0, 5.0, 0.0), Vec3::new(0.01, 10.0, 10.0), red));
    scene.add(wall(Vec3A::new(5.0, 5.0, 0.0), Vec3::new(0.01, 10.0, 10.0), green));

    scene.add(Geometry::Sphere(Sphere::new(Vec3A::new(-2.5, 1.5, -1.5), 1.5, mirror)));
    scene.add(Geometry::Sphere(Sphere::new(Vec3A::new(1.0, 1.2, 1.5), 1.2, glass)));
    scene.add(Geometry::Sphere(Sphere::new(Vec3A::new(3.2, 4.5, -2.5), 0.9, glossy)));
    scene.add(Geometry::Cube(Cube::new(
        Vec3A::new(2.5, 1.5, -2.5),
        Vec3::new(0.0, 25.0, 0.0),
        Vec3::new(1.8, 3.0, 1.8),
        white,
    )));

    // Square pyramid, four sides plus base.
    let apex = Vec3A::new(-1.0, 3.5, -3.0);
    let base = [
        Vec3A::new(-2.2, 0.01, -4.2),
        Vec3A::new(0.2, 0.01, -4.2),
        Vec3A::new(0.2, 0.01, -1.8),
        Vec3A::new(-2.2, 0.01, -1.8),
    ];
    let mut faces: Vec<Triangle> = (0..4)
        .map(|i| Triangle::new([base[i], base[(i + 1) % 4], apex], gold))
        .collect();
    faces.push(Triangle::new([base[0], base[2], base[1]], gold));
    faces.push(Triangle::new([base[0], base[3], base[2]], gold));
    let range = scene.add_triangles(faces);
    if let Some(node) = BoundingVolume::enclosing(&scene.triangles, range) {
        scene.add(Geometry::BoundingVolume(node));
    }

    scene
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("Wavepath - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));
    info!(
        "Image resolution: {}x{}, iterations: {}, trace depth: {}",
        args.width, args.height, args.iterations, args.trace_depth
    );

    let scene = create_scene(args.width, args.height);
    let settings = RenderSettings::from(&args);
    let mut renderer = Renderer::new(&scene, settings)?;

    let should_send_to_tev = args.tev || args.tev_address.is_some();
    let mut tev = if should_send_to_tev {
        let tev_address = args.tev_address.as_deref().unwrap_or("localhost:14158");
        TevSink::connect(tev_address, args.width, args.height)
    } else {
        None
    };

    info!("Rendering using {} CPU cores...", rayon::current_num_threads());
    let generation_start = std::time::Instant::now();
    let pb = ProgressBar::new(args.iterations as u64);
    pb.set_style(
        ProgressStyle::default_bar().template("{bar:40} {pos}/{len} iterations ETA: {eta}")?,
    );

    for iteration in 1..=args.iterations {
        renderer.path_trace(0, iteration);
        pb.inc(1);

        if let Some(sink) = tev.as_mut() {
            if iteration % args.tev_every.max(1) == 0 || iteration == args.iterations {
                let iterations = renderer.iterations();
                sink.update(&normalize(renderer.image(), iterations, args.width, args.height));
            }
        }
    }

    pb.finish();
    info!("Image generated in {:.2?}", generation_start.elapsed());

    let image = normalize(
        renderer.image(),
        renderer.iterations(),
        renderer.width(),
        renderer.height(),
    );

    // Save image based on file extension
    if args.output.ends_with(".exr") {
        save_image_as_exr(&image, &args.output);
    } else if args.output.ends_with(".png") {
        save_image_as_png(&image, &args.output);
    } else {
        log::error!(
            "Unsupported file extension '{}'. Only .png and .exr formats are supported.",
            std::path::Path::new(&args.output).extension().unwrap_or_default().to_string_lossy()
        );
        std::process::exit(1);
    }
    Ok(())
}
