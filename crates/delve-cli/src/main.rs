//! Command-line front end: generate a dungeon and print it as ASCII art
//! or a JSON dump.

use std::process::ExitCode;

use clap::Parser;
use delve_core::{CellType, GenConfig, generate};

#[derive(Parser, Debug)]
#[command(name = "delve", version, about = "Procedural 2D dungeon layout generator")]
struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = 64)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 64)]
    height: usize,

    /// Target room count (0 fills within the attempt budget)
    #[arg(short = 'n', long, default_value_t = 30)]
    rooms: usize,

    /// Room placement attempt budget
    #[arg(long, default_value_t = 200)]
    attempts: usize,

    /// Minimum room width
    #[arg(long, default_value_t = 4)]
    min_room_width: usize,

    /// Maximum room width
    #[arg(long, default_value_t = 10)]
    max_room_width: usize,

    /// Minimum room height
    #[arg(long, default_value_t = 4)]
    min_room_height: usize,

    /// Maximum room height
    #[arg(long, default_value_t = 10)]
    max_room_height: usize,

    /// Corridor width in cells
    #[arg(short = 'w', long, default_value_t = 1)]
    corridor_width: usize,

    /// Extra loop edges as a ratio of the spanning tree size
    #[arg(long, default_value_t = 0.5)]
    extra_edge_ratio: f32,

    /// RNG seed (0 picks a random seed)
    #[arg(short = 's', long, default_value_t = 0)]
    seed: u64,

    /// Dump the full layout as JSON instead of ASCII
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn to_config(&self) -> GenConfig {
        GenConfig {
            width: self.width,
            height: self.height,
            room_count: self.rooms,
            attempts: self.attempts,
            min_room_width: self.min_room_width,
            max_room_width: self.max_room_width,
            min_room_height: self.min_room_height,
            max_room_height: self.max_room_height,
            corridor_width: self.corridor_width,
            extra_edge_ratio: self.extra_edge_ratio,
            seed: self.seed,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .default_filter_or(if args.verbose { "debug" } else { "warn" }),
    )
    .init();

    let dungeon = match generate(&args.to_config()) {
        Ok(d) => d,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&dungeon) {
            Ok(s) => println!("{s}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", dungeon.render_ascii());
        println!(
            "seed {}  rooms {}  corridor cells {}",
            dungeon.seed(),
            dungeon.rooms().len(),
            dungeon.grid().count(CellType::Corridor),
        );
    }
    ExitCode::SUCCESS
}
