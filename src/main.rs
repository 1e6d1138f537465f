//! glyph_swarm — interactive entry point.

use glyph_swarm::app::{run, AppConfig};
use glyph_swarm::targets::ModeSpec;
use std::io::{self, Write};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║      Glyph Swarm — gesture-driven text particle cloud        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Hand input: keyboard simulation");
    println!("  (1–4 = fingers up, 0 = fist, hold Space = open palm, H = hand on/off)");
    println!();

    let cfg = if std::env::args().any(|a| a == "--quick") {
        println!("  Quick-start: HELLO / WORLD / RUST, 4000 particles\n");
        AppConfig::default()
    } else {
        configure_interactively()
    };

    println!();
    println!("  Opening visualizer window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    let defaults = AppConfig::default();

    let mut modes = defaults.modes;
    for (i, spec) in modes.iter_mut().enumerate() {
        let text = read_line(&format!(
            "  Mode {} text (default \"{}\"): ",
            i + 1,
            spec.text
        ));
        let text = text.trim();
        if !text.is_empty() {
            *spec = ModeSpec::new(text.to_uppercase(), spec.font_size);
        }
    }

    let particle_count: usize = {
        let n = read_line("  Particle count 500–20000 (default 4000): ")
            .trim()
            .parse()
            .unwrap_or(defaults.particle_count);
        n.clamp(500, 20_000)
    };

    AppConfig { modes, particle_count }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
