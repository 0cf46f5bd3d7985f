//! Example: Loading and inspecting an MD2 model
//!
//! Usage: cargo run --example load_model -- <path_to_md2_file>

use quake_md2::Md2Model;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <path_to_md2_file>", args[0]);
        std::process::exit(1);
    }

    let model = Md2Model::load(&args[1])?;

    println!("=== Model Information ===");
    println!("Skin size: {}x{}", model.header.skin_width, model.header.skin_height);
    println!("Frames:    {}", model.frame_count());
    println!("Vertices:  {}", model.vertex_count());
    println!("Faces:     {}", model.face_count());
    println!("Texcoords: {}", model.texcoords.len());

    if !model.skin_names.is_empty() {
        println!("\n=== Skins ===");
        for (i, name) in model.skin_names.iter().enumerate() {
            println!("Skin {i}: {name}");
        }
    }

    let runs = model.gl_commands().count();
    println!("\nDraw command runs: {runs}");

    Ok(())
}
