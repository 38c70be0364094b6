//! Prints a summary of a scene directory.
//!
//! Usage: `cargo run --example scene_info -- <scene_dir> [--skip-bad-views]`
//!
//! Set `RUST_LOG=debug` to see what is read from disk.

use std::path::PathBuf;

use clap::Parser;
use mve::{Options, Scene, ViewErrorPolicy};

#[derive(Parser, Debug)]
#[command(name = "scene_info")]
#[command(about = "Print the views and bundle statistics of a scene directory")]
struct Args {
    /// Scene root containing `views/` and `synth_0.out`
    scene_dir: PathBuf,

    /// Leave out view directories that fail to load instead of aborting
    #[arg(long)]
    skip_bad_views: bool,
}

fn main() {
    mve::init_logging();
    let args = Args::parse();

    let options = Options {
        view_errors: if args.skip_bad_views {
            ViewErrorPolicy::Skip
        } else {
            ViewErrorPolicy::Fail
        },
        sort_views_by_id: true,
        ..Options::default()
    };

    let mut scene = match Scene::create_with_options(&args.scene_dir, options) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("failed to open '{}': {e}", args.scene_dir.display());
            std::process::exit(1);
        }
    };

    println!("scene: {}", scene.path().display());
    println!("views: {}", scene.views().len());
    for view in scene.views() {
        let embeddings: Vec<&str> = view.embedding_names().collect();
        let camera = match view.camera() {
            Some(camera) if camera.is_valid() => {
                let position = camera.camera_position();
                format!(
                    "at ({:.3}, {:.3}, {:.3})",
                    position.x, position.y, position.z
                )
            }
            _ => "no camera".to_string(),
        };
        println!(
            "  [{:4}] {:<24} {camera}, embeddings: {}",
            view.id(),
            view.name(),
            embeddings.join(", ")
        );
    }

    match scene.bundle() {
        Ok(bundle) => {
            println!(
                "bundle: {} cameras ({} valid), {} features",
                bundle.num_cameras(),
                bundle.num_valid_cameras(),
                bundle.num_features()
            );
        }
        Err(e) => println!("bundle: unavailable ({e})"),
    }
    println!(
        "memory: views {} bytes, bundle {} bytes",
        scene.views_mem_usage(),
        scene.bundle_mem_usage()
    );
}
