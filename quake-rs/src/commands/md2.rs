//! MD2 model command implementations

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use std::path::{Path, PathBuf};

use quake_md2::types::Aabb;
use quake_md2::{Md2Model, SEQUENCES, SequenceId, validate_model};

#[derive(Subcommand)]
pub enum Md2Commands {
    /// Display information about an MD2 model file
    Info {
        /// Path to the MD2 file
        file: PathBuf,

        /// Show detailed information (frame names, texture coordinates)
        #[arg(short, long)]
        detailed: bool,
    },

    /// Validate an MD2 model file
    Validate {
        /// Path to the MD2 file
        file: PathBuf,
    },

    /// List the standard animation sequences
    Sequences,

    /// Resolve an animation sequence at a progress value
    Resolve {
        /// Path to the MD2 file
        file: PathBuf,

        /// Sequence name (e.g. "stand", "run", "crouch_walk")
        #[arg(short, long, default_value = "stand")]
        sequence: String,

        /// Progress through the sequence in [0, 1)
        #[arg(short, long, default_value_t = 0.0)]
        progress: f64,

        /// Anchor the reported bounding box at the origin
        #[arg(long)]
        origin_box: bool,
    },
}

pub fn execute(command: Md2Commands) -> Result<()> {
    match command {
        Md2Commands::Info { file, detailed } => execute_info(file, detailed),
        Md2Commands::Validate { file } => execute_validate(file),
        Md2Commands::Sequences => execute_sequences(),
        Md2Commands::Resolve {
            file,
            sequence,
            progress,
            origin_box,
        } => execute_resolve(file, &sequence, progress, origin_box),
    }
}

fn load(file: &Path) -> Result<Md2Model> {
    Md2Model::load(file).with_context(|| format!("Failed to load {}", file.display()))
}

fn execute_info(file: PathBuf, detailed: bool) -> Result<()> {
    let model = load(&file)?;
    let header = &model.header;

    println!("MD2 Model: {}", file.display());
    println!("Skin size         : {}x{}", header.skin_width, header.skin_height);
    println!("Frame record size : {} bytes", header.frame_size);
    println!("Skins             : {}", header.skin_count);
    println!("Vertices per frame: {}", header.vertex_count);
    println!("Texture coords    : {}", header.texcoord_count);
    println!("Faces             : {}", header.face_count);
    println!("Command words     : {}", header.command_count);
    println!("Frames            : {}", header.frame_count);

    for (i, name) in model.skin_names.iter().enumerate() {
        println!("Skin {i:3}          : {name}");
    }

    let runs = model.gl_commands().count();
    println!("Draw command runs : {runs}");

    if detailed {
        println!("\nFrames:");
        for (i, name) in model.frame_names.iter().enumerate() {
            println!("  {i:3}: {name}");
        }
        println!("\nTexture coordinates:");
        for (i, tc) in model.texcoords.iter().enumerate() {
            println!("  {i:4}: {},{}", tc.u, tc.v);
        }
    }

    Ok(())
}

fn execute_validate(file: PathBuf) -> Result<()> {
    let model = load(&file)?;
    validate_model(&model)
        .with_context(|| format!("{} failed validation", file.display()))?;
    println!("{} is valid", file.display());
    Ok(())
}

fn execute_sequences() -> Result<()> {
    println!(
        "{:<20} {:>6} {:>6} {:>5} {:>5} {:>8}",
        "name", "first", "last", "fps", "len", "seconds"
    );
    for sequence in &SEQUENCES {
        println!(
            "{:<20} {:>6} {:>6} {:>5} {:>5} {:>8.3}",
            sequence.name,
            sequence.first_frame,
            sequence.last_frame,
            sequence.fps,
            sequence.frame_len,
            sequence.duration()
        );
    }
    Ok(())
}

fn execute_resolve(file: PathBuf, sequence: &str, progress: f64, origin_box: bool) -> Result<()> {
    let Some(id) = SequenceId::from_name(sequence) else {
        bail!("unknown sequence '{sequence}' (try `quake-rs md2 sequences`)");
    };
    let model = load(&file)?;
    let blend = model
        .resolve_sequence(id, progress)
        .with_context(|| format!("cannot resolve '{sequence}' at progress {progress}"))?;

    println!(
        "{} @ {:.4} -> start frame {}, end frame {}, blend {:.4}",
        id, progress, blend.start, blend.end, blend.fraction
    );

    let bounds = if origin_box {
        let mut bounds = Aabb::anchored_at_origin();
        for position in model.blend_positions(blend) {
            bounds.update(position);
        }
        Some(bounds)
    } else {
        model.blended_bounds(blend)
    };
    if let Some(bounds) = bounds {
        println!(
            "pose bounds: min ({:.3}, {:.3}, {:.3}) max ({:.3}, {:.3}, {:.3})",
            bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
        );
    }

    Ok(())
}
