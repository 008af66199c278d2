use std::error::Error;

use clap::Parser;

use gridmap_generator::ascii::{elevation_legend, export_ascii_file};
use gridmap_generator::config::{Algorithm, MapConfig};
use gridmap_generator::seeds::GeneratorSeeds;

#[derive(Parser, Debug)]
#[command(name = "gridmap_generator")]
#[command(about = "Generate procedural grid maps and print them as ASCII")]
struct Args {
    /// Width of the map in cells
    #[arg(short = 'W', long, default_value = "50")]
    width: usize,

    /// Height of the map in cells
    #[arg(short = 'H', long, default_value = "50")]
    height: usize,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run a single algorithm (runs all of them if not specified)
    #[arg(short, long, value_enum)]
    algorithm: Option<Algorithm>,

    /// Load the run configuration from a JSON file (overrides size and seed)
    #[arg(long)]
    config: Option<String>,

    /// Write the maps to a text file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Save the effective configuration as JSON (e.g., "run.json")
    #[arg(long)]
    write_config: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            println!("Loading config from {}", path);
            MapConfig::load_from_file(path)?
        }
        None => MapConfig {
            width: args.width,
            height: args.height,
            seed: args.seed,
            ..MapConfig::default()
        },
    };
    if let Some(algorithm) = args.algorithm {
        config = config.only(algorithm);
    }

    // Pin the seed so a saved config replays this exact run
    let master = config.seed.unwrap_or_else(rand::random);
    config.seed = Some(master);
    let seeds = GeneratorSeeds::from_master(master);

    if let Some(path) = &args.write_config {
        config.save_to_file(path)?;
        println!("Saved config to {}", path);
    }

    println!("Generating maps with seed: {}", master);
    println!("Map size: {}x{}", config.width, config.height);

    let maps = config.run_with_seeds(&seeds)?;

    match &args.output {
        Some(path) => {
            let legend = elevation_legend();
            let bodies: Vec<String> = maps
                .iter()
                .map(|map| {
                    if map.algorithm == Algorithm::Perlin {
                        format!("{}\n{}", map.ascii, legend)
                    } else {
                        map.ascii.clone()
                    }
                })
                .collect();
            let sections: Vec<(&str, &str)> = maps
                .iter()
                .zip(&bodies)
                .map(|(map, body)| (map.algorithm.title(), body.as_str()))
                .collect();

            export_ascii_file(path, master, &sections)?;
            println!("Exported {} maps to {}", maps.len(), path);
        }
        None => {
            for map in &maps {
                println!();
                println!("=== {} (seed {}) ===", map.algorithm.title(), map.seed);
                print!("{}", map.ascii);
                if map.algorithm == Algorithm::Perlin {
                    println!();
                    print!("{}", elevation_legend());
                }
            }
        }
    }

    Ok(())
}
