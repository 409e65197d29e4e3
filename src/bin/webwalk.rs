use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use web_walker::collision::{read_region_file, region_files, CollisionStore, RegionFormat};
use web_walker::config::{load_config, load_config_from, WalkerConfig};
use web_walker::errors::{WalkerError, WalkerResult};
use web_walker::pathfinding::{PlanningContext, SettingsContext, Skill};
use web_walker::walker::simulated::SimulatedWorld;
use web_walker::walker::{Environment, Walker};

mod webwalk {
    pub mod cli_utils;
}

use webwalk::cli_utils::*;

#[derive(Parser)]
#[command(name = "webwalk")]
#[command(about = "Plan and simulate routes over collision data")]
struct Args {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Plan a route and print its steps
    Route {
        #[command(flatten)]
        plan: PlanArgs,
    },
    /// Merge JSON region files into one bincode region file
    Pack {
        /// Directory holding *.json region files
        #[arg(long)]
        input: PathBuf,

        /// Output *.bin file
        #[arg(long)]
        output: PathBuf,
    },
    /// Plan a route and walk it in a simulated world
    Walk {
        #[command(flatten)]
        plan: PlanArgs,

        /// Seed for simulated movement failures
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Probability that a single move silently fails
        #[arg(long, default_value = "0.0")]
        flaky: f64,

        /// Stop within this many tiles of the destination
        #[arg(long, default_value = "0")]
        distance: i32,
    },
}

#[derive(clap::Args)]
struct PlanArgs {
    /// Collision data directory (overrides the config)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Start cell (format: X,Y,PLANE)
    #[arg(long)]
    from: String,

    /// Destination cell (format: X,Y,PLANE)
    #[arg(long)]
    to: String,

    /// Agility level used to gate shortcuts
    #[arg(long, default_value = "1")]
    agility: u32,

    /// Never use skill shortcuts
    #[arg(long)]
    no_shortcuts: bool,
}

impl PlanArgs {
    fn settings(&self) -> SettingsContext {
        SettingsContext {
            use_shortcuts: !self.no_shortcuts,
            ..SettingsContext::default().with_level(Skill::Agility, self.agility)
        }
    }

    fn context(&self, config: &WalkerConfig) -> WalkerResult<PlanningContext> {
        let mut config = config.clone();
        if let Some(data) = &self.data {
            config.collision_dir = data.clone();
        }
        PlanningContext::from_config(&config)
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> WalkerResult<()> {
    let args = Args::parse();
    init_logging(args.json);

    let config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };

    match args.command {
        Command::Route { plan } => {
            let (start, destination) = (parse_cell(&plan.from)?, parse_cell(&plan.to)?);
            let context = plan.context(&config)?;
            let route = context.find_route(start, destination, &plan.settings())?;

            println!(
                "Route {start} -> {destination}: {} steps, {} obstacles",
                route.len(),
                route.obstacle_count()
            );
            print!("{route}");
            Ok(())
        }
        Command::Pack { input, output } => pack(&input, &output),
        Command::Walk {
            plan,
            seed,
            flaky,
            distance,
        } => {
            let (start, destination) = (parse_cell(&plan.from)?, parse_cell(&plan.to)?);
            let context = plan.context(&config)?;

            let mut world = SimulatedWorld::new(context.collision().clone(), start);
            world.set_flaky(validate_probability(flaky), seed);

            let walker = Walker::new(&context, config.walker);
            let outcome = walker.travel(&mut world, destination, &plan.settings(), distance, || false)?;

            println!("Walk {start} -> {destination}: {outcome}");
            println!("  Moves issued: {}", world.move_count());
            println!("  Interactions: {}", world.interaction_count());
            if let Some(position) = world.agent_position() {
                println!("  Final position: {position}");
            }
            outcome.into_result()
        }
    }
}

fn pack(input: &Path, output: &Path) -> WalkerResult<()> {
    let files: Vec<PathBuf> = region_files(input)?
        .into_iter()
        .filter(|(_, format)| *format == RegionFormat::Json)
        .map(|(path, _)| path)
        .collect();
    if files.is_empty() {
        return Err(WalkerError::NoRegionFiles {
            path: input.to_path_buf(),
        });
    }

    let mut records = Vec::new();
    for path in &files {
        records.extend(read_region_file(path, RegionFormat::Json)?);
    }

    // Validates every record and resolves duplicates the same way loading does
    let store = CollisionStore::from_records(&records)?;
    CollisionStore::save_region(output, &store.records())?;

    info!(
        "Packed {} regions ({} cells) into {}",
        files.len(),
        store.len(),
        output.display()
    );
    Ok(())
}
