//! meshpick CLI - ray casting and picking on OFF/OBJ meshes.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use meshpick::{pick, Aabb3, BvhStats, Camera, Hit, Mesh, Ray, Vec3};
use serde::Serialize;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "meshpick")]
#[command(about = "Closest-hit ray casting on triangle meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with [bvh] and [camera] sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum faces per BVH leaf (overrides the config file)
    #[arg(long, global = true)]
    leaf_size: Option<usize>,

    /// Maximum BVH depth (overrides the config file)
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Skip the BVH and test every face
    #[arg(long, global = true)]
    brute_force: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Display counts, bounding box and BVH statistics of a mesh
    Info {
        /// Path to an .off or .obj file
        mesh: PathBuf,
    },
    /// Cast a single ray and report the closest hit
    Cast {
        /// Path to an .off or .obj file
        mesh: PathBuf,
        /// Ray origin as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        origin: Vec3,
        /// Ray direction as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        direction: Vec3,
    },
    /// Pick the surface under a pixel of the configured camera
    Pick {
        /// Path to an .off or .obj file
        mesh: PathBuf,
        /// Pixel column, from the left edge
        #[arg(long)]
        x: f64,
        /// Pixel row, from the top edge
        #[arg(long)]
        y: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.override_bvh(cli.leaf_size, cli.max_depth);

    match &cli.command {
        Commands::Info { mesh } => {
            let mesh = open_mesh(mesh, &config, cli.brute_force)?;
            print_info(&InfoReport::new(&mesh), cli.json)?;
        }
        Commands::Cast {
            mesh,
            origin,
            direction,
        } => {
            let mesh = open_mesh(mesh, &config, cli.brute_force)?;
            let ray = Ray::new((*origin).into(), *direction);
            let hit = mesh.cast(&ray);
            print_hit(hit.as_ref(), cli.json)?;
        }
        Commands::Pick { mesh, x, y } => {
            let mesh = open_mesh(mesh, &config, cli.brute_force)?;
            let camera = Camera::new(config.camera.clone());
            let hit = pick(&mesh, &camera, *x, *y);
            print_hit(hit.as_ref(), cli.json)?;
        }
    }

    Ok(())
}

fn open_mesh(path: &Path, config: &Config, brute_force: bool) -> Result<Mesh> {
    let store = meshpick::load(path).with_context(|| format!("failed to load {}", path.display()))?;
    if brute_force {
        return Ok(Mesh::new(store));
    }

    let start = Instant::now();
    let mesh = Mesh::with_bvh(store, &config.bvh).context("failed to build BVH")?;
    log::info!("BVH built in {:.1?}", start.elapsed());
    Ok(mesh)
}

/// Parse `x,y,z`.
fn parse_vec3(s: &str) -> std::result::Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected three comma-separated values, got '{s}'")),
    }
}

#[derive(Serialize)]
struct HitReport {
    face: usize,
    t: f64,
    point: [f64; 3],
    bary_coords: [f64; 3],
}

impl HitReport {
    fn new(hit: &Hit) -> Option<Self> {
        let p = hit.intersection_point();
        let w = hit.bary_coords();
        Some(Self {
            face: hit.face_id()?,
            t: hit.t(),
            point: [p.x, p.y, p.z],
            bary_coords: [w.x, w.y, w.z],
        })
    }
}

fn print_hit(hit: Option<&Hit>, json: bool) -> Result<()> {
    let report = hit.and_then(HitReport::new);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report {
        Some(r) => {
            println!("Hit face {} at t = {}", r.face, r.t);
            println!("  Point: ({}, {}, {})", r.point[0], r.point[1], r.point[2]);
            println!(
                "  Barycentric: ({}, {}, {})",
                r.bary_coords[0], r.bary_coords[1], r.bary_coords[2]
            );
        }
        None => println!("No hit"),
    }
    Ok(())
}

#[derive(Serialize)]
struct InfoReport {
    vertices: usize,
    faces: usize,
    bbox_min: Option<[f64; 3]>,
    bbox_max: Option<[f64; 3]>,
    bvh: Option<BvhStats>,
}

impl InfoReport {
    fn new(mesh: &Mesh) -> Self {
        let bbox: &Aabb3 = mesh.bounding_box();
        let corners = (!bbox.is_null()).then(|| {
            (
                [bbox.min.x, bbox.min.y, bbox.min.z],
                [bbox.max.x, bbox.max.y, bbox.max.z],
            )
        });
        Self {
            vertices: mesh.num_vertices(),
            faces: mesh.num_faces(),
            bbox_min: corners.map(|c| c.0),
            bbox_max: corners.map(|c| c.1),
            bvh: mesh.bvh().map(|b| b.stats()),
        }
    }
}

fn print_info(report: &InfoReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Vertices: {}", report.vertices);
    println!("Faces: {}", report.faces);
    if let (Some(min), Some(max)) = (report.bbox_min, report.bbox_max) {
        println!("Bounding box:");
        println!("  Min: ({}, {}, {})", min[0], min[1], min[2]);
        println!("  Max: ({}, {}, {})", max[0], max[1], max[2]);
    }
    match &report.bvh {
        Some(stats) => {
            println!("BVH:");
            println!("  Nodes: {}", stats.nodes);
            println!("  Leaves: {}", stats.leaves);
            println!("  Depth: {}", stats.depth);
            println!("  Largest leaf: {} faces", stats.max_leaf_faces);
        }
        None => println!("BVH: none (brute force)"),
    }
    Ok(())
}
