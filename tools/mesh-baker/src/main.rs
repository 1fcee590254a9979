//! mesh-baker - bakes posed glTF scenes into static mesh assets
//!
//! Combines every renderer of a scene into one mesh expressed in a chosen
//! target frame and writes it as a `.bakedmesh` (or OBJ) asset.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use bake_common::timing::DEFAULT_FRAME_RATE;
use bake_common::decode_baked_mesh;
use mesh_baker::manifest::{self, BakeJob, DEFAULT_MANIFEST};
use mesh_baker::{AssetFormat, FileAssetPersister, GltfScene};

#[derive(Parser)]
#[command(name = "mesh-baker")]
#[command(about = "Bake posed meshes into static mesh assets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bake a single glTF/GLB scene
    Bake {
        /// Input glTF/GLB scene
        scene: PathBuf,

        /// Save directory (default: next to the scene)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Asset name (default: "{first renderer}_Baked_F{frame}")
        #[arg(short, long)]
        name: Option<String>,

        /// Frame number to sample
        #[arg(long, default_value_t = 0)]
        frame: u32,

        /// Frames per second used to turn the frame into a sample time
        #[arg(long, default_value_t = DEFAULT_FRAME_RATE)]
        fps: f32,

        /// Bake into this node's local space (default: first renderer)
        #[arg(short, long, conflicts_with = "world")]
        target: Option<String>,

        /// Bake in world space
        #[arg(long)]
        world: bool,

        /// Renderers to include (repeatable, default: all)
        #[arg(short, long = "renderer")]
        renderers: Vec<String>,

        /// Output format (bakedmesh or obj)
        #[arg(short, long, default_value = "bakedmesh")]
        format: String,
    },

    /// Run every bake in a manifest file
    Build {
        /// Path to bake.toml manifest
        #[arg(default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without baking
    Check {
        /// Path to bake.toml manifest
        #[arg(default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,
    },

    /// List the renderers of a scene
    List {
        /// Input glTF/GLB scene
        scene: PathBuf,
    },

    /// Print the header of a baked mesh
    Inspect {
        /// Input .bakedmesh file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bake {
            scene,
            output,
            name,
            frame,
            fps,
            target,
            world,
            renderers,
            format,
        } => {
            let format = AssetFormat::parse(&format).with_context(|| {
                format!("Unknown output format '{}' (use bakedmesh or obj)", format)
            })?;
            let base_dir = parent_dir(&scene);
            let output = output.unwrap_or_else(|| base_dir.to_path_buf());

            let job = BakeJob {
                name,
                frame,
                fps,
                target,
                world,
                renderers,
                ..BakeJob::new(scene.to_string_lossy())
            };
            let persister = FileAssetPersister::new(output, format);
            // `scene` is already a usable path, so resolve against nothing
            let report = manifest::run_job(&job, Path::new(""), &persister)?;
            tracing::info!("Done! {:?}", report.path);
        }

        Commands::Build { manifest, output } => {
            tracing::info!("Building bakes from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let reports = manifest::build_all(&config, parent_dir(&manifest), output.as_deref())?;
            tracing::info!("Build complete! {} assets baked", reports.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::List { scene } => {
            let loaded = GltfScene::load(&scene)?;
            println!("Renderers in {:?}:", scene);
            for renderer in loaded.renderers() {
                println!(
                    "  {} ({} vertices, {} submeshes, normals: {}, uvs: {})",
                    renderer.name,
                    renderer.vertex_count(),
                    renderer.submeshes.len(),
                    if renderer.has_normals() { "yes" } else { "no" },
                    if renderer.has_uvs() { "yes" } else { "no" },
                );
            }
        }

        Commands::Inspect { input } => {
            let data =
                std::fs::read(&input).with_context(|| format!("Failed to read {:?}", input))?;
            let decoded = decode_baked_mesh(&data)
                .with_context(|| format!("Failed to decode {:?}", input))?;
            print_summary(&input, data.len(), &decoded.name, &decoded.mesh);
        }
    }

    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

fn print_summary(path: &Path, size: usize, name: &str, mesh: &mesh_baker::CombinedMesh) {
    println!("{:?} ({} bytes)", path, size);
    println!("  name:      {}", name);
    println!("  vertices:  {}", mesh.vertex_count());
    println!("  triangles: {}", mesh.triangle_count());
    println!("  bounds:    {:?} .. {:?}", mesh.bounds.min, mesh.bounds.max);
    println!(
        "  normals:   {}",
        if mesh.normals_recalculated {
            "recalculated"
        } else {
            "from sources"
        }
    );
}
