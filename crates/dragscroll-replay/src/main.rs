//! Replay a drag-to-scroll scene file and print the resulting scroll offsets.

use dragscroll_replay::{Scene, replay};

fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: dragscroll-replay <scene.json>");
        std::process::exit(2);
    };
    log::info!("Replaying {}", path);

    let offsets = match Scene::load(&path).and_then(|scene| replay(&scene)) {
        Ok(offsets) => offsets,
        Err(e) => {
            log::error!("Replay failed: {}", e);
            std::process::exit(1);
        }
    };

    for offset in offsets {
        println!("{}: left={} top={}", offset.name, offset.scroll.x, offset.scroll.y);
    }
}
