//! Command-line harness for the timetabling cut library.

mod synthetic;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use timetable_cuts::patterns::generate_all;
use timetable_cuts::{
    cut_patterns, validate_patterns, CliqueStrategy, ConflictGraph, CutFamily, CutManager,
    SeparationSettings, ValidationReport,
};

use crate::synthetic::{generate_instance, generate_relaxation, InstanceShape};

#[derive(Parser)]
#[command(name = "timetable-bench", about = "Cut separation harness for course timetabling")]
struct Cli {
    /// Log debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the isolated-lecture patterns of a day length.
    Patterns {
        #[arg(long)]
        day_length: usize,

        /// Include zero-penalty patterns.
        #[arg(long)]
        all: bool,
    },

    /// Check every cut pattern of a day length against all schedules.
    Validate {
        #[arg(long)]
        day_length: usize,

        /// Write the report as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Export the conflict graph of a random instance in DIMACS format.
    Graph {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Output file (stdout when omitted).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run separation rounds on random relaxations of a random instance.
    Separate {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Cut level 0-5.
        #[arg(long, default_value_t = 5)]
        level: u8,

        #[arg(long, value_enum, default_value_t = StrategyChoice::Auto)]
        cliques: StrategyChoice,

        /// Relaxations to separate, one round each.
        #[arg(long, default_value_t = 5)]
        rounds: u64,
    },
}

#[derive(Args, Clone, Copy)]
struct ShapeArgs {
    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[arg(long, default_value_t = 30)]
    courses: usize,

    #[arg(long, default_value_t = 4)]
    rooms: usize,

    #[arg(long, default_value_t = 5)]
    days: usize,

    #[arg(long, default_value_t = 6)]
    periods_per_day: usize,

    #[arg(long, default_value_t = 12)]
    curricula: usize,
}

impl ShapeArgs {
    fn shape(&self) -> InstanceShape {
        InstanceShape {
            courses: self.courses,
            rooms: self.rooms,
            days: self.days,
            periods_per_day: self.periods_per_day,
            curricula: self.curricula,
            ..InstanceShape::default()
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyChoice {
    Exact,
    Greedy,
    Auto,
}

impl From<StrategyChoice> for CliqueStrategy {
    fn from(choice: StrategyChoice) -> Self {
        match choice {
            StrategyChoice::Exact => CliqueStrategy::Exact,
            StrategyChoice::Greedy => CliqueStrategy::Greedy,
            StrategyChoice::Auto => CliqueStrategy::default(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Command::Patterns { day_length, all } => print_patterns(day_length, all),
        Command::Validate { day_length, json } => validate(day_length, json.as_deref()),
        Command::Graph { shape, output } => export_graph(&shape, output.as_deref()),
        Command::Separate {
            shape,
            level,
            cliques,
            rounds,
        } => separate(&shape, level, cliques, rounds, cli.verbose),
    }
}

fn print_patterns(day_length: usize, all: bool) -> Result<()> {
    let patterns = if all {
        generate_all(day_length)?
    } else {
        cut_patterns(day_length)?.to_vec()
    };

    println!("{:<width$}  penalty  rhs", "pattern", width = 3 * day_length + 2);
    for p in &patterns {
        let coefs: Vec<String> = p.coefs().iter().map(|c| format!("{:+}", c)).collect();
        println!(
            "{:<width$}  {:>7}  {:>3}",
            coefs.join(" "),
            p.penalty(),
            p.rhs(),
            width = 3 * day_length + 2
        );
    }
    println!("{} patterns", patterns.len());
    Ok(())
}

fn validate(day_length: usize, json: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    let report = validate_patterns(day_length)?;
    let elapsed = start.elapsed();

    println!("Day length:       {}", report.day_length);
    println!("Cut patterns:     {}", report.checks.len());
    println!("Unsound:          {}", report.failures().count());
    println!("Time:             {:.3} ms", elapsed.as_secs_f64() * 1000.0);

    if let Some(path) = json {
        save_json(&report, path)?;
        println!("Report written to {}", path.display());
    }

    report.ensure_sound()?;
    Ok(())
}

fn save_json(report: &ValidationReport, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    Ok(())
}

fn export_graph(shape: &ShapeArgs, output: Option<&Path>) -> Result<()> {
    let instance = generate_instance(&shape.shape(), shape.seed)?;
    let graph = ConflictGraph::build(&instance)?;
    let comment = format!(
        "conflict graph of {}\n{} curricula ({} declared)",
        instance.name(),
        instance.curriculum_count(),
        instance.proper_curriculum_count()
    );

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create file {}", path.display()))?;
            graph.write_dimacs(BufWriter::new(file), &comment)?;
            log::info!(
                "Wrote {} vertices and {} edges to {}",
                graph.n(),
                graph.distinct_edge_count(),
                path.display()
            );
        }
        None => graph.write_dimacs(io::stdout().lock(), &comment)?,
    }
    Ok(())
}

fn separation_settings(level: u8, cliques: StrategyChoice, verbose: bool) -> SeparationSettings {
    let base = if verbose {
        SeparationSettings::verbose()
    } else {
        SeparationSettings::default()
    };
    base.with_level(level).with_clique_strategy(cliques.into())
}

fn separate(
    shape: &ShapeArgs,
    level: u8,
    cliques: StrategyChoice,
    rounds: u64,
    verbose: bool,
) -> Result<()> {
    let instance = generate_instance(&shape.shape(), shape.seed)?;

    let start = Instant::now();
    let manager = CutManager::new(instance, separation_settings(level, cliques, verbose))?;
    let setup = start.elapsed();

    println!("\n{}", "=".repeat(60));
    println!("{}", manager.instance().name());
    println!("{}", "=".repeat(60));
    println!("Courses:          {}", manager.instance().course_count());
    println!("Periods:          {}", manager.instance().period_count());
    println!("Curricula:        {}", manager.instance().curriculum_count());
    println!("Conflict edges:   {}", manager.graph().distinct_edge_count());
    println!("Cliques:          {}", manager.cliques().len());
    println!("Patterns:         {}", manager.patterns().len());
    println!("Setup time:       {:.3} ms", setup.as_secs_f64() * 1000.0);
    println!();

    let mut per_family = vec![0usize; CutFamily::ALL.len()];
    let start = Instant::now();
    for r in 0..rounds {
        let mut host = generate_relaxation(manager.instance(), shape.seed.wrapping_add(r + 1));
        let round = manager.separate(&mut host)?;
        for (i, family) in CutFamily::ALL.iter().enumerate() {
            per_family[i] += round.count(*family);
        }
        if round.cutoff_reached {
            break;
        }
    }
    let elapsed = start.elapsed();

    let mut out = io::stdout().lock();
    for (family, count) in CutFamily::ALL.iter().zip(&per_family) {
        writeln!(out, "{:<22}{}", format!("{}:", family.name()), count)?;
    }
    let stats = manager.stats();
    writeln!(out, "Rounds:               {}", stats.rounds)?;
    writeln!(out, "Total cuts:           {}", stats.total_cuts)?;
    writeln!(out, "Clique ids:           {}", stats.clique_cuts_registered)?;
    writeln!(
        out,
        "Time/round:           {:.3} ms",
        elapsed.as_secs_f64() * 1000.0 / stats.rounds.max(1) as f64
    )?;
    Ok(())
}
