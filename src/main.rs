use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use whitted::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, OUT_FILE };
use whitted::canvas::Canvas;
use whitted::config;
use whitted::demo::demo_scene;
use whitted::parallel::render_parallel;

/// Renders a scene with a recursive Whitted-style ray tracer.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// JSON scene file. The built-in demo scene is rendered if omitted.
    #[clap(short, long)]
    scene: Option<PathBuf>,

    /// Where to write the rendered PPM image.
    #[clap(short, long, default_value = OUT_FILE)]
    output: PathBuf,

    /// Image width in pixels, overriding the scene file.
    #[clap(long)]
    width: Option<usize>,

    /// Image height in pixels, overriding the scene file.
    #[clap(long)]
    height: Option<usize>,

    /// Number of render threads; 0 uses one per core.
    #[clap(short = 'j', long, default_value_t = 0)]
    threads: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default()
        .default_filter_or("info"))
        .init();

    let args = Args::parse();

    let (scene, width, height) = match args.scene {
        Some(ref path) => {
            let config = config::from_path(path)
                .with_context(|| format!("could not load scene {}", path.display()))?;
            (config.scene, config.width, config.height)
        },
        None => {
            info!("No scene file given, rendering the demo scene.");
            (demo_scene(), CANVAS_WIDTH, CANVAS_HEIGHT)
        },
    };

    let width = args.width.unwrap_or(width);
    let height = args.height.unwrap_or(height);
    anyhow::ensure!(width > 0 && height > 0,
        "image size must be positive, got {}x{}", width, height);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()
        .context("could not start render threads")?;

    let mut canvas = Canvas::new(width, height);
    pool.install(|| render_parallel(&scene, canvas.pixels_mut(), width, height));

    canvas.save(&args.output)
        .with_context(|| format!("could not save {}", args.output.display()))?;
    info!("Saved render to {}.", args.output.display());

    Ok(())
}
