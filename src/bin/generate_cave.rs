//! Cave generator binary: runs the full pipeline against in-memory
//! terrains and writes the placements to disk.
//!
//! Usage: cargo run --release --bin generate_cave -- [OPTIONS]
//!
//! Options:
//!   --seed <SEED>       Run seed (default: drawn at random, or from the config)
//!   --config <PATH>     JSON cave config (default: built-in cave)
//!   --size <METERS>     Terrain width and depth (default: 256)
//!   --height <H>        Terrain height (default: 100)
//!   --gap <G>           Ceiling terrain origin above the ground origin (default: 30)
//!   --resolution <N>    Heightmap samples per side (default: 129)
//!   --out <DIR>         Output directory (default: "cave")
//!   --preview           Also write ground.png / ceiling.png heightmaps
//!
//! Output structure:
//!   <out>/
//!     placements.json   # Seed, per-spawner summaries, every placed object
//!     ground.png        # With --preview
//!     ceiling.png

use std::path::{Path, PathBuf};
use std::time::Instant;

use glam::Vec3;
use image::{GrayImage, Luma};
use serde_json::json;

use cavern::core::Result;
use cavern::generation::{CaveConfig, CaveGenerator, LayerReport, SeededRandom};
use cavern::scene::ObjectScene;
use cavern::terrain::{GridTerrain, Heightmap};

fn main() -> Result<()> {
    cavern::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let seed = parse_u32_arg(&args, "--seed");
    let config_path = parse_str_arg(&args, "--config");
    let size = parse_f32_arg(&args, "--size").unwrap_or(256.0);
    let height = parse_f32_arg(&args, "--height").unwrap_or(100.0);
    let gap = parse_f32_arg(&args, "--gap").unwrap_or(30.0);
    let resolution = parse_usize_arg(&args, "--resolution").unwrap_or(129);
    let output_dir = PathBuf::from(parse_str_arg(&args, "--out").unwrap_or_else(|| "cave".to_string()));
    let preview = args.iter().any(|a| a == "--preview");

    let mut config = match &config_path {
        Some(path) => CaveConfig::load(path)?,
        None => CaveConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }

    println!("=== Cavern Cave Generator ===");
    println!("Size:       {}m x {}m, height {}", size, size, height);
    println!("Ceiling:    {} above ground", gap);
    println!("Resolution: {}", resolution);
    println!("Config:     {}", config_path.as_deref().unwrap_or("built-in"));
    println!("Output:     {}", output_dir.display());
    println!();

    let ground = GridTerrain::new(Vec3::ZERO, Vec3::new(size, height, size), resolution)?;
    let ceiling = GridTerrain::new(Vec3::new(0.0, gap, 0.0), Vec3::new(size, height, size), resolution)?;
    let rng = match config.seed {
        Some(seed) => SeededRandom::new(seed as u64),
        None => SeededRandom::from_entropy(),
    };

    let start = Instant::now();
    let mut generator = CaveGenerator::new(config, ground, ceiling, ObjectScene::default(), rng)?;
    let report = generator.generate()?;
    let elapsed = start.elapsed();

    std::fs::create_dir_all(&output_dir)?;
    let manifest = json!({
        "seed": report.seed,
        "elapsed_ms": elapsed.as_secs_f64() * 1000.0,
        "size": [size, height, size],
        "ceiling_origin": [0.0, gap, 0.0],
        "resolution": resolution,
        "layers": report.layers().iter().map(|layer| layer_summary(layer)).collect::<Vec<_>>(),
        "objects": generator.scene().objects(),
    });
    let manifest_path = output_dir.join("placements.json");
    std::fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;

    if preview {
        write_preview(generator.ground().heights(), &output_dir.join("ground.png"))?;
        write_preview(generator.ceiling().heights(), &output_dir.join("ceiling.png"))?;
    }

    println!();
    println!("=== Generation Complete ===");
    println!("Seed:    {}", report.seed);
    for layer in report.layers() {
        println!("{}:", layer.layer.name());
        for spawn in &layer.spawns {
            let tag = if spawn.is_exhausted() { " (exhausted)" } else { "" };
            println!(
                "  {:<14} {:>5} placed, {:>4} skipped{}",
                spawn.spawner,
                spawn.placed.len(),
                spawn.skipped,
                tag
            );
        }
        if let Some(err) = &layer.error {
            println!("  aborted: {}", err);
        }
    }
    println!("Objects: {}", report.placed_count());
    println!("Time:    {:.2}s", elapsed.as_secs_f64());
    println!("Manifest: {}", manifest_path.display());
    Ok(())
}

fn layer_summary(layer: &LayerReport) -> serde_json::Value {
    json!({
        "layer": layer.layer,
        "placed": layer.placed_count(),
        "error": layer.error.as_ref().map(|e| e.to_string()),
        "spawners": layer.spawns.iter().map(|s| json!({
            "name": s.spawner,
            "requested": s.requested,
            "anchors": s.anchors,
            "placed": s.placed.len(),
            "skipped": s.skipped,
            "attempts": s.attempts,
            "status": s.status,
        })).collect::<Vec<_>>(),
    })
}

fn write_preview(heights: &Heightmap, path: &Path) -> Result<()> {
    let res = heights.resolution() as u32;
    let image = GrayImage::from_fn(res, res, |x, z| {
        let h = heights.get(x as usize, z as usize);
        Luma([(h.clamp(0.0, 1.0) * 255.0).round() as u8])
    });
    image.save(path)?;
    println!("Preview: {}", path.display());
    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
