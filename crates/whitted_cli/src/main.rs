use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use whitted_core::{LightDescription, MaterialDescription, ObjectDescription, SceneDescription};
use whitted_renderer::{render, render_parallel, write_ppm, PpmFormat, SceneAssets};

#[derive(Debug, clap::Parser)]
#[command(name = "whitted", about = "Render a scene with a Whitted-style ray tracer")]
struct CommandLineArguments {
    #[arg(short, long, help = "JSON scene file (otherwise the built-in demo scene)")]
    scene: Option<PathBuf>,

    #[arg(short, long, help = "Output file (PPM to stdout when omitted)")]
    output: Option<PathBuf>,
    #[arg(short, long, value_enum, help = "Output format (otherwise inferred from the extension)")]
    format: Option<OutputFormat>,

    #[arg(short, long, help = "Maximum reflection/refraction depth")]
    depth: Option<u32>,
    #[arg(long, help = "Image width in pixels")]
    width: Option<u32>,
    #[arg(long, help = "Image height in pixels")]
    height: Option<u32>,

    #[arg(short, long, help = "Shade rows on all cores")]
    parallel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Ascii,
    Binary,
    Png,
}

impl OutputFormat {
    /// Explicit choice first, then the output extension, then ASCII PPM.
    fn resolve(explicit: Option<OutputFormat>, output: Option<&Path>) -> OutputFormat {
        explicit.unwrap_or_else(|| {
            match output
                .and_then(Path::extension)
                .and_then(|ext| ext.to_str())
                .map(str::to_ascii_lowercase)
                .as_deref()
            {
                Some("png") => OutputFormat::Png,
                _ => OutputFormat::Ascii,
            }
        })
    }
}

/// Wooden floor, glossy ball and one white light.
fn demo_scene() -> SceneDescription {
    let mut scene = SceneDescription {
        ambient_light: [0.1, 0.1, 0.4],
        ..Default::default()
    };
    scene.camera.position = [-2.0, 3.0, 0.0];
    scene.camera.target = [6.0, 2.0, 0.0];
    scene.lights.push(LightDescription {
        position: [0.0, 8.0, -5.0],
        color: [1.0, 1.0, 1.0],
    });
    scene.materials = vec![
        MaterialDescription {
            name: "wood".to_string(),
            diffuse: [0.5, 0.25, 0.0],
            specular: [0.9, 0.9, 0.9],
            shininess: 10.0,
            ..Default::default()
        },
        MaterialDescription {
            name: "ball".to_string(),
            diffuse: [0.9, 0.9, 0.9],
            specular: [0.5, 0.5, 0.5],
            shininess: 10.0,
            ..Default::default()
        },
    ];
    scene.objects = vec![
        ObjectDescription::Plane {
            point: [0.0, 0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            material: Some("wood".to_string()),
        },
        ObjectDescription::Sphere {
            center: [6.0, 2.0, 0.0],
            radius: 2.0,
            material: Some("ball".to_string()),
        },
    ];
    scene
}

fn load_scene(args: &CommandLineArguments) -> Result<SceneDescription> {
    let mut scene = match &args.scene {
        Some(path) => SceneDescription::load(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!("No scene given, using the built-in demo scene");
            demo_scene()
        }
    };

    if let Some(depth) = args.depth {
        scene.render.max_depth = depth;
    }
    if let Some(width) = args.width {
        scene.camera.width = width;
    }
    if let Some(height) = args.height {
        scene.camera.height = height;
    }
    Ok(scene)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = CommandLineArguments::parse();
    let format = OutputFormat::resolve(args.format, args.output.as_deref());
    if format == OutputFormat::Png && args.output.is_none() {
        bail!("PNG output needs --output <path>");
    }

    let description = load_scene(&args)?;
    let assets = SceneAssets::from_description(&description).context("Failed to assemble scene")?;
    let scene = assets.scene();

    let start = Instant::now();
    let image = if args.parallel {
        render_parallel(&assets.camera, &scene, &assets.config)
    } else {
        render(&assets.camera, &scene, &assets.config)
    };
    log::info!("Rendered in {:?}", start.elapsed());

    let ppm = match format {
        OutputFormat::Ascii => PpmFormat::Ascii,
        OutputFormat::Binary => PpmFormat::Binary,
        OutputFormat::Png => {
            if let Some(path) = &args.output {
                image
                    .save_png(path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            return Ok(());
        }
    };

    match &args.output {
        Some(path) => image
            .save_ppm(path, ppm)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_ppm(&mut writer, &image, ppm).context("Failed to write image to stdout")?;
        }
    }

    Ok(())
}
