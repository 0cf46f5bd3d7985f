//! Example: Resolving an animation sequence over time
//!
//! Steps a sequence's progress the way a render loop would and prints the
//! keyframe pair, blend fraction, and pose bounds at each tick.
//!
//! Usage: cargo run --example animate_model -- <path_to_md2_file> [sequence]

use quake_md2::{Md2Model, SequenceId};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <path_to_md2_file> [sequence]", args[0]);
        std::process::exit(1);
    }

    let id = match args.get(2) {
        Some(name) => SequenceId::from_name(name).ok_or("unknown sequence name")?,
        None => SequenceId::Run,
    };
    let model = Md2Model::load(&args[1])?;
    let sequence = id.sequence();

    println!(
        "{}: frames {}..={}, {} fps, {:.3}s",
        sequence.name,
        sequence.first_frame,
        sequence.last_frame,
        sequence.fps,
        sequence.duration()
    );

    // sample ten ticks of one playback; a real caller would advance
    // progress by elapsed_time / duration and reset it before 1.0
    for tick in 0..10 {
        let progress = tick as f64 / 10.0;
        let blend = model.resolve_sequence(id, progress)?;
        let bounds = model.blended_bounds(blend);
        print!(
            "progress {progress:.2} -> frames {} -> {} blend {:.3}",
            blend.start, blend.end, blend.fraction
        );
        if let Some(bounds) = bounds {
            print!("  bounds {:?} .. {:?}", bounds.min, bounds.max);
        }
        println!();
    }

    Ok(())
}
