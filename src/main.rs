use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use arc_ptt::chart::{ChartCatalog, ChartEntry, SongCatalog};
use arc_ptt::config::Config;
use arc_ptt::output;
use arc_ptt::profile::{self, AddOutcome};
use arc_ptt::scoring::{self, ClearRank, PlayResult};
use arc_ptt::world::{self, CurrentProgress};

const EXIT_SUCCESS: i32 = 0;
/// Bad input or data files: unknown chart, unreadable profile, ...
const EXIT_DATA: i32 = 2;
/// The question has no answer (no bonus hypothesis fits, impossible boost)
const EXIT_UNSOLVABLE: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a starter config file
    Init {
        /// Chart catalog JSON
        #[arg(long)]
        catalog: PathBuf,
        /// World map chapters JSON
        #[arg(long)]
        world_maps: Option<PathBuf>,
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Compute score, grade, potential and clear for one play
    Score {
        #[command(flatten)]
        play: PlayArgs,
    },
    /// Search the catalog by song name or chart id
    Search { query: String },
    /// Best 30 report for a profile
    B30 {
        #[arg(short, long)]
        user: Option<String>,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Record a play in a profile
    Add {
        #[arg(short, long)]
        user: Option<String>,
        #[command(flatten)]
        play: PlayArgs,
        /// Overwrite the stored result even if it scores higher
        #[arg(long)]
        replace: bool,
        /// Overall potential as currently shown in game
        #[arg(long)]
        potential: Option<f64>,
    },
    /// Remove a chart's result from a profile
    Remove {
        #[arg(short, long)]
        user: Option<String>,
        #[arg(long)]
        chart: String,
    },
    /// Create a profile or update its in-game potential
    SetPotential {
        #[arg(short, long)]
        user: Option<String>,
        #[arg(long)]
        potential: f64,
    },
    /// List stored profiles
    Profiles,
    /// Potentials that land a play inside a progress window
    Progress {
        /// Partner step (defaults to world.step from config)
        #[arg(long)]
        step: Option<f64>,
        #[arg(long, requires = "high", conflicts_with = "map")]
        low: Option<f64>,
        #[arg(long, requires = "low")]
        high: Option<f64>,
        /// World map id
        #[arg(long, requires_all = ["level", "progress", "target"])]
        map: Option<String>,
        /// Current level (1-based)
        #[arg(long)]
        level: Option<usize>,
        /// Distance left on the current level
        #[arg(long)]
        progress: Option<f64>,
        /// Level to land on
        #[arg(long)]
        target: Option<usize>,
    },
    /// Chart constant implied by a beyond boost
    Boost {
        #[arg(long)]
        difference: f64,
        #[arg(long)]
        score: i64,
    },
    /// Distance to the next reward and to the end of a map
    Remaining {
        #[arg(long)]
        map: String,
        #[arg(long)]
        level: usize,
        #[arg(long)]
        progress: f64,
    },
}

/// What is known about a single play
#[derive(clap::Args, Debug)]
struct PlayArgs {
    /// Chart id, or a search term matching exactly one chart
    #[arg(long)]
    chart: String,
    #[arg(long)]
    score: Option<i64>,
    /// Shiny pure count
    #[arg(long)]
    perfect: Option<u32>,
    #[arg(long)]
    far: Option<u32>,
    #[arg(long)]
    lost: Option<u32>,
    /// Clear rank (TL, NC, HC, FR, PM, MAX, EC) or an exported clear type code (0-5)
    #[arg(long)]
    clear: Option<String>,
}

#[derive(Parser, Debug)]
#[command(name = "arc-ptt")]
#[command(about = "Score, potential and world map progress calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/arc-ptt/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Commands::Init {
        catalog,
        world_maps,
        force,
    } = &cli.command
    {
        match arc_ptt::config::write_default_config(
            cli.config.clone(),
            catalog,
            world_maps.as_deref(),
            *force,
        ) {
            Ok(path) => {
                println!("Config written to {}", path.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    let config = match arc_ptt::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = arc_ptt::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let catalog = match SongCatalog::load(&config.catalog) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Catalog error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let code = match run(cli.command, &config, &catalog) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_DATA
        }
    };
    std::process::exit(code);
}

fn run(command: Commands, config: &Config, catalog: &SongCatalog) -> Result<i32> {
    let use_colors = output::should_use_colors();

    match command {
        Commands::Init { .. } => bail!("init runs before the config is loaded"),
        Commands::Score { play } => {
            let entry = resolve_chart(catalog, &play.chart)?;
            let (record, note) = build_play(&play, &entry)?;
            let score = scoring::compute_play_score(&record, entry.chart);
            let result = scoring::compute_score_result(score, entry.chart);
            let report = output::format_score_report(
                &entry,
                &result,
                note.as_ref(),
                record.clear(),
                use_colors,
            );
            println!("{}", report);
        }
        Commands::Search { query } => {
            let found = catalog.search(&query);
            if found.is_empty() {
                println!("No charts match '{}'.", query);
            }
            for entry in found {
                println!(
                    "{:<12} {:<4} {:>5.1}  {}",
                    entry.chart.id,
                    entry.chart.level,
                    entry.chart.constant,
                    entry.song.display_name(entry.chart)
                );
            }
        }
        Commands::B30 { user, tsv } => {
            let user = resolve_user(user, config)?;
            let player = profile::load_profile(&config.profiles_dir(), &user)?;
            let best = player.best_n(catalog);

            if tsv {
                println!("{}", output::format_tsv(&best.ranked));
                return Ok(EXIT_SUCCESS);
            }

            println!("{}", output::format_best_table(best.top30(), use_colors));
            let overflow = best.ranks_31_to_39();
            if !overflow.is_empty() {
                println!();
                println!("Ranks 31-39:");
                println!("{}", output::format_best_table(overflow, use_colors));
            }
            println!();
            let reported = player.reported_potential()?;
            println!("Reported potential: {}", player.potential);
            println!(
                "{}",
                output::format_best_summary(&best, Some(reported), use_colors)
            );
        }
        Commands::Add {
            user,
            play,
            replace,
            potential,
        } => {
            let user = resolve_user(user, config)?;
            let dir = config.profiles_dir();
            let entry = resolve_chart(catalog, &play.chart)?;
            let (record, _) = build_play(&play, &entry)?;

            let mut player = profile::load_or_create_profile(&dir, &user)?;
            match player.add_result(record, entry.chart, replace)? {
                AddOutcome::Added => println!("Added {}", entry.chart.id),
                AddOutcome::Replaced { old, new } => println!(
                    "Replaced {}: {} -> {}",
                    entry.chart.id,
                    output::format_score(old),
                    output::format_score(new)
                ),
                AddOutcome::NotImproved { old, new } => println!(
                    "Kept {}: stored {} beats {} (use --replace to overwrite)",
                    entry.chart.id,
                    output::format_score(old),
                    output::format_score(new)
                ),
            }
            if let Some(potential) = potential {
                player.set_potential(potential);
            }
            profile::save_profile(&dir, &player)?;
        }
        Commands::Remove { user, chart } => {
            let user = resolve_user(user, config)?;
            let dir = config.profiles_dir();
            let mut player = profile::load_profile(&dir, &user)?;
            if !player.remove_result(&chart) {
                bail!("Profile {} has no result for {}", user, chart);
            }
            profile::save_profile(&dir, &player)?;
            println!("Removed {}", chart);
        }
        Commands::SetPotential { user, potential } => {
            let user = resolve_user(user, config)?;
            let player = profile::update_potential(&config.profiles_dir(), &user, potential)?;
            println!("{}: potential {}", player.username, player.potential);
        }
        Commands::Profiles => {
            let names = profile::list_profiles(&config.profiles_dir())?;
            if names.is_empty() {
                println!("No profiles found.");
            }
            for name in names {
                println!("{}", name);
            }
        }
        Commands::Progress {
            step,
            low,
            high,
            map,
            level,
            progress,
            target,
        } => {
            let step = step.unwrap_or(config.world.step);
            if step <= 0.0 || !step.is_finite() {
                bail!("Step must be positive, got {}", step);
            }
            let bounds = catalog
                .constant_bounds()
                .context("Chart catalog is empty")?;

            let solutions = match (map, low, high) {
                (Some(map_id), _, _) => {
                    let chapters = load_world_maps(config)?;
                    let map = world::find_map(&chapters, &map_id)
                        .with_context(|| format!("Unknown map {}", map_id))?;
                    // clap guarantees these accompany --map
                    let current = CurrentProgress {
                        level: level.unwrap_or(1),
                        progress: progress.unwrap_or(0.0),
                    };
                    world::solve_for_platform(map, &current, target.unwrap_or(1), step, &bounds)?
                }
                (None, Some(low), Some(high)) => {
                    if low > high {
                        bail!("--low {} is above --high {}", low, high);
                    }
                    world::inverse_progress(step, (low, high), &bounds)
                }
                _ => bail!("Give either --low/--high or --map/--level/--progress/--target"),
            };

            println!("{}", output::format_solutions(&solutions, use_colors));
            if !solutions.iter().any(|s| s.is_valid()) {
                return Ok(EXIT_UNSOLVABLE);
            }
        }
        Commands::Boost { difference, score } => {
            let constant = world::inverse_beyond_boost(difference, score);
            if constant.is_nan() {
                eprintln!(
                    "No potential gives a boost of {} (minimum is 27)",
                    difference
                );
                return Ok(EXIT_UNSOLVABLE);
            }
            println!("Chart constant: {:.1}", constant);
        }
        Commands::Remaining {
            map,
            level,
            progress,
        } => {
            let chapters = load_world_maps(config)?;
            let world_map = world::find_map(&chapters, &map)
                .with_context(|| format!("Unknown map {}", map))?;
            let current = CurrentProgress { level, progress };
            let remaining = world::compute_remaining_progress(world_map, &current)?;
            println!("{}", output::format_remaining(&remaining));
            println!();
            println!("{}", output::format_rewards(&world::map_rewards(world_map)));
        }
    }

    Ok(EXIT_SUCCESS)
}

fn resolve_user(user: Option<String>, config: &Config) -> Result<String> {
    match user.or_else(|| config.default_user.clone()) {
        Some(user) => Ok(user),
        None => bail!("No --user given and no default_user in config"),
    }
}

/// Exact chart id first, then a search that must match a single chart.
fn resolve_chart<'a>(catalog: &'a SongCatalog, query: &str) -> Result<ChartEntry<'a>> {
    if let Some(entry) = catalog.lookup(query) {
        return Ok(entry);
    }
    let found = catalog.search(query);
    match found.as_slice() {
        [] => bail!("Unknown chart '{}'", query),
        [entry] => Ok(*entry),
        many => {
            let ids: Vec<&str> = many.iter().map(|e| e.chart.id.as_str()).collect();
            bail!("'{}' matches several charts: {}", query, ids.join(", "))
        }
    }
}

fn load_world_maps(config: &Config) -> Result<Vec<world::Chapter>> {
    let path = config
        .world_maps
        .as_deref()
        .context("world_maps is not set in config")?;
    world::load_maps(path)
}

fn parse_clear(value: &str, play: &PlayArgs, entry: &ChartEntry) -> Result<ClearRank> {
    if let Ok(code) = value.parse::<u8>() {
        return scoring::map_clear_type(code, play.perfect.unwrap_or(0), entry.chart);
    }
    let rank = match value.to_uppercase().as_str() {
        "TL" => ClearRank::TrackLost,
        "NC" => ClearRank::NormalClear,
        "HC" => ClearRank::HardClear,
        "FR" => ClearRank::FullRecall,
        "PM" => ClearRank::PureMemory,
        "MAX" => ClearRank::Maximum,
        "EC" => ClearRank::EasyClear,
        other => bail!("Unknown clear rank '{}'", other),
    };
    Ok(rank)
}

/// Turn command line judgments into a stored record.
///
/// Judgments are kept when far and lost were given. A bare score stays a
/// score record, since any judgments for it would be guessed.
fn build_play(
    play: &PlayArgs,
    entry: &ChartEntry,
) -> Result<(PlayResult, Option<scoring::NoteResult>)> {
    let supplied = play
        .clear
        .as_deref()
        .map(|c| parse_clear(c, play, entry))
        .transpose()?;
    let inferred =
        scoring::infer_note_result(entry.chart, play.perfect, play.far, play.lost, play.score);
    let chart_id = entry.chart.id.clone();

    if play.far.is_some() && play.lost.is_some() {
        let Some(result) = inferred else {
            bail!(
                "Judgments do not fit chart {} ({} notes)",
                entry.chart.id,
                entry.chart.note
            );
        };
        let clear = scoring::compute_clear_rank(&result, entry.chart, supplied);
        let record = PlayResult::Note {
            chart_id,
            result,
            clear,
        };
        return Ok((record, Some(result)));
    }

    let Some(score) = play.score else {
        bail!("Give --score, or --far and --lost with --perfect or --score");
    };
    if let Some(guess) = inferred {
        log::debug!("Judgments consistent with score: {:?}", guess);
    }
    Ok((
        PlayResult::Score {
            chart_id,
            score,
            clear: supplied,
        },
        None,
    ))
}
