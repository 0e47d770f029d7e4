//! objbuf - inspect the buffers an OBJ file imports to
//!
//! Usage:
//!   objbuf model.obj                 Summary with normals
//!   objbuf model.obj --no-normals    Positions and indices only
//!   objbuf model.obj --json          Machine-readable summary

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use objbuf::{load_obj_file, ImportOptions, Model};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "objbuf")]
#[command(about = "Import a Wavefront OBJ file into vertex and index buffers")]
#[command(version)]
struct Cli {
    /// OBJ file to import
    path: PathBuf,

    /// Do not emit a normal per vertex
    #[arg(long = "no-normals")]
    no_normals: bool,

    /// Emit a texture coordinate per vertex
    #[arg(long = "tex-coords")]
    tex_coords: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary {
    path: PathBuf,
    vertices: usize,
    indices: usize,
    triangles: usize,
    dropped_faces: usize,
    normals: bool,
    tex_coords: bool,
    center: [f32; 3],
    radius: f32,
}

impl Summary {
    fn new(path: PathBuf, model: &Model) -> Self {
        let (center, radius) = model
            .bounds()
            .map_or(([0.0; 3], 0.0), |b| (b.center().to_array(), b.radius()));

        Summary {
            path,
            vertices: model.vertex_count(),
            indices: model.indices.len(),
            triangles: model.triangle_count(),
            dropped_faces: model.dropped_faces,
            normals: model.normals.is_some(),
            tex_coords: model.tex_coords.is_some(),
            center,
            radius,
        }
    }

    fn print(&self) {
        println!("{}", self.path.display());
        println!("  vertices:      {}", self.vertices);
        println!("  indices:       {}", self.indices);
        println!("  triangles:     {}", self.triangles);
        println!("  dropped faces: {}", self.dropped_faces);
        println!("  normals:       {}", if self.normals { "yes" } else { "no" });
        println!("  tex coords:    {}", if self.tex_coords { "yes" } else { "no" });
        println!(
            "  center:        ({:.4}, {:.4}, {:.4})",
            self.center[0], self.center[1], self.center[2]
        );
        println!("  radius:        {:.4}", self.radius);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let options = ImportOptions::default()
        .with_normals(!cli.no_normals)
        .with_tex_coords(cli.tex_coords);

    tracing::info!(path = %cli.path.display(), "importing");
    let model = load_obj_file(&cli.path, &options)
        .with_context(|| format!("Failed to import {}", cli.path.display()))?;

    if model.dropped_faces > 0 {
        tracing::warn!(
            dropped = model.dropped_faces,
            "skipped faces that reference undeclared vertices"
        );
    }

    let summary = Summary::new(cli.path, &model);
    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to encode summary")?;
        println!("{json}");
    } else {
        summary.print();
    }

    Ok(())
}
