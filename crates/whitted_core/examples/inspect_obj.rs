//! Example: Load and inspect an OBJ mesh and its materials.
//!
//! Run with: cargo run --example inspect_obj -- assets/icosahedron.obj

use std::env;

use whitted_core::Mesh;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_obj <path-to-obj-file>");
        return;
    }

    let path = &args[1];
    println!("Loading OBJ file: {}", path);

    match Mesh::load_obj(path) {
        Ok((mesh, materials)) => {
            println!("\n=== Mesh ===");
            println!("Vertices: {}", mesh.vertex_count());
            println!("Triangles: {}", mesh.triangle_count());
            println!("Center: {:?}", mesh.center());
            println!("Diagonal: {:.4}", mesh.size());

            println!("\n--- Materials ---");
            for name in materials.names() {
                let faces = mesh
                    .faces()
                    .iter()
                    .filter(|f| f.material.as_deref() == Some(name))
                    .count();
                println!("  {} - {} faces", name, faces);
            }
            let unassigned = mesh.faces().iter().filter(|f| f.material.is_none()).count();
            if unassigned > 0 {
                println!("  (default) - {} faces", unassigned);
            }
        }
        Err(e) => {
            eprintln!("Error loading OBJ: {}", e);
            std::process::exit(1);
        }
    }
}
