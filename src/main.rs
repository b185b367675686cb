use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pivotgen::config::{AppConfig, ConfigManager, DataSource};
use pivotgen::data::{BinanceConnector, CsvConnector, KlineCache, PriceSource};
use pivotgen::engines::agent::PivotModel;
use pivotgen::engines::evaluation::Backtester;
use pivotgen::engines::generation::{
    EliteIndividual, EvolutionEngine, EvolutionReport, GeneCodec, GeneConfig, LogProgressCallback,
};
use pivotgen::engines::metrics::ProfitabilityMetrics;
use pivotgen::viz::{ChartData, ChartSink, JsonChartSink};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pivotgen", about = "Evolve pivot-breakout trading agents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the genetic search and print the best gene found.
    Run {
        /// TOML config file. Environment variables PIVOTGEN__<SECTION>__<FIELD> override it.
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        generations: Option<usize>,

        #[arg(long)]
        symbol: Option<String>,

        /// Read closes from {DIR}/{SYMBOL}_{TF}.csv instead of the configured source.
        #[arg(long)]
        csv_dir: Option<PathBuf>,

        #[arg(long)]
        seed: Option<u64>,

        /// Evaluate individuals one at a time.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Write the best agent's chart record as JSON.
        #[arg(long)]
        chart_out: Option<PathBuf>,

        /// Hall of fame entries to print.
        #[arg(long, default_value_t = 10)]
        top: usize,

        #[arg(long, short, default_value_t = false)]
        verbose: bool,
    },
    /// Print the parameters a gene encodes.
    Decode { gene: String },
    /// Print the gene for raw parameter numerals.
    Encode {
        pivots: u32,
        time_frame: u32,
        diff_major: u32,
        diff_minor: u32,
        batch: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            generations,
            symbol,
            csv_dir,
            seed,
            sequential,
            chart_out,
            top,
            verbose,
        } => {
            init_logging(verbose);

            let manager = ConfigManager::new();
            manager
                .load(config.as_ref())
                .context("Failed to load configuration")?;
            manager
                .update(|app| {
                    if let Some(generations) = generations {
                        app.evolution.target_generations = generations;
                    }
                    if let Some(symbol) = symbol {
                        app.evolution.symbol = symbol;
                    }
                    if let Some(directory) = csv_dir {
                        app.data.source = DataSource::Csv { directory };
                    }
                    if seed.is_some() {
                        app.evolution.seed = seed;
                    }
                    if sequential {
                        app.evolution.parallel = false;
                    }
                })
                .context("Invalid command line overrides")?;

            run(manager.get(), chart_out, top)
        }
        Commands::Decode { gene } => {
            let config = GeneCodec::decode_str(&gene)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Encode {
            pivots,
            time_frame,
            diff_major,
            diff_minor,
            batch,
        } => {
            let gene = GeneCodec::encode(&GeneConfig {
                pivots,
                time_frame,
                diff_major,
                diff_minor,
                batch,
            })?;
            println!("{}", gene);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn build_source(app: &AppConfig) -> Result<Box<dyn PriceSource>> {
    let source: Box<dyn PriceSource> = match &app.data.source {
        DataSource::Binance { base_url } => Box::new(BinanceConnector::new(base_url)?),
        DataSource::Csv { directory } => Box::new(CsvConnector::new(directory.clone())),
    };
    log::info!("Using {} price source", source.name());
    Ok(source)
}

fn run(app: AppConfig, chart_out: Option<PathBuf>, top: usize) -> Result<()> {
    let cache = Arc::new(KlineCache::new(build_source(&app)?));
    let model = PivotModel::from(app.clustering.clone());
    let backtester = Backtester::new(cache.clone(), &app.evolution, model.clone());

    let mut engine = EvolutionEngine::new(app.evolution.clone(), backtester)?;
    let report = engine.run(LogProgressCallback)?;
    print_report(&report, engine.get_hall_of_fame().get_top_n(top));

    let replay = Backtester::new(cache, &app.evolution, model);
    let agent = replay
        .run(&report.best.individual.gene)
        .context("Best gene could not be replayed")?;
    print_trades(&agent.chart_data(), &ProfitabilityMetrics::details(agent.position_history()));

    if let Some(path) = chart_out {
        JsonChartSink::new(path).render(&agent.chart_data())?;
    }

    Ok(())
}

fn print_report(report: &EvolutionReport, top: &[EliteIndividual]) {
    let best = &report.best;
    println!(
        "best gene {} | id {} | generation {} | fitness {:.6}",
        best.individual.gene, best.individual.id, best.individual.generation, best.fitness
    );
    println!("{:?}", GeneCodec::decode(&best.individual.gene));

    println!("hall of fame:");
    for (rank, elite) in top.iter().enumerate() {
        let trades = elite.report.map(|r| r.trades()).unwrap_or(0);
        println!(
            "  {:>2}. {} fitness {:>10.6} trades {:>4} (id {}, generation {})",
            rank + 1,
            elite.individual.gene,
            elite.fitness,
            trades,
            elite.individual.id,
            elite.individual.generation
        );
    }
    println!(
        "{} generations in {:.1}s",
        report.generations_run,
        (report.finished_at - report.started_at).num_milliseconds() as f64 / 1000.0
    );
}

fn print_trades(chart: &ChartData, details: &HashMap<String, f64>) {
    println!("best agent trades:");
    for ((entry_index, entry), (exit_index, exit)) in chart.buys().iter().zip(chart.sells()) {
        println!(
            "  buy {:.6} @ {} -> sell {:.6} @ {} ({:+.3}%)",
            entry,
            entry_index,
            exit,
            exit_index,
            (exit - entry) / entry * 100.0
        );
    }
    if chart.buys().len() > chart.sells().len() {
        println!("  position still open");
    }

    let mut names: Vec<&String> = details.keys().collect();
    names.sort();
    for name in names {
        println!("  {:<14} {:.4}", name, details[name]);
    }
}
