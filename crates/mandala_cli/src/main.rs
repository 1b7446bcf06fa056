use std::fmt::Display;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mandala_base::{
    ClassificationRule, GATE_SPAN, GateSet, gate_arc_start, gate_from_longitude, is_gate,
    resolve_channels,
};
use mandala_config::{ConfigFile, load_config};
use mandala_core::{CelestialBody, LongitudeContext, MeanElementsProvider};
use mandala_search::{
    BirthInput, ChartAssembler, ChartConfig, ChartProfile, Cycle, DesignStrategy, Location,
    personality_utc, resolve_design_epoch,
};
use mandala_time::{FixedOffset, NaiveDate, NaiveTime, UtcEpoch, parse_offset};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mandala", version, about = "Mandala chart engine CLI")]
struct Cli {
    /// Config file (default: $MANDALA_CONFIG, else built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Gate and line for an ecliptic longitude
    Gate {
        /// Ecliptic longitude in degrees (any real value)
        #[arg(allow_hyphen_values = true)]
        lon: f64,
    },
    /// Active channels, defined centers and type for a set of gates
    Channels {
        /// Gate numbers (1-64)
        #[arg(required = true)]
        gates: Vec<u8>,
    },
    /// Resolve the design instant for a birth
    Design {
        /// Local birth date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Local wall-clock time (HH:MM or HH:MM:SS)
        #[arg(long)]
        time: String,
        /// Fixed UTC offset, e.g. +08:00 (default from config)
        #[arg(long, allow_hyphen_values = true)]
        utc_offset: Option<String>,
        /// root-find or fixed-offset (default from config)
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Full chart for a birth
    Chart {
        /// Local birth date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Local wall-clock time (HH:MM or HH:MM:SS)
        #[arg(long)]
        time: String,
        /// Fixed UTC offset, e.g. +08:00 (default from config)
        #[arg(long, allow_hyphen_values = true)]
        utc_offset: Option<String>,
        /// Birth latitude in degrees (echoed back, not used in the calculation)
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Birth longitude in degrees (echoed back, not used in the calculation)
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        /// root-find or fixed-offset (default from config)
        #[arg(long)]
        strategy: Option<String>,
        /// simplified or full (default from config)
        #[arg(long)]
        rule: Option<String>,
        /// Print the chart as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(config = ?cli.config, "starting");
    let file = load_config(cli.config.as_deref()).unwrap_or_else(|e| fail(e));

    match cli.command {
        Commands::Gate { lon } => match gate_from_longitude(lon) {
            Some(gl) => {
                let start = gate_arc_start(gl.gate).unwrap_or(0.0);
                println!(
                    "Gate {} line {} ({:.4} deg in gate, arc {:.4}-{:.4} deg, wheel index {})",
                    gl.gate,
                    gl.line,
                    gl.degrees_in_gate,
                    start,
                    start + GATE_SPAN,
                    gl.wheel_index
                );
            }
            None => fail(format!("longitude {lon} is not finite")),
        },

        Commands::Channels { gates } => {
            if let Some(bad) = gates.iter().find(|g| !is_gate(**g)) {
                fail(format!("invalid gate number: {bad} (1-64)"));
            }
            let set: GateSet = gates.into_iter().collect();
            let resolution = resolve_channels(&set);
            println!("Gates:    {}", join(set.iter()));
            if resolution.active_channels.is_empty() {
                println!("Channels: none");
            } else {
                for c in &resolution.active_channels {
                    println!("Channel:  {:<6} {} - {}", c.label(), c.centers[0], c.centers[1]);
                }
            }
            println!("Centers:  {}", join_or_none(resolution.defined_centers.iter()));
            for rule in [ClassificationRule::Simplified, ClassificationRule::Full] {
                let classifier = rule.classifier();
                println!(
                    "Type ({}): {}",
                    classifier.name(),
                    classifier.classify(&resolution)
                );
            }
        }

        Commands::Design {
            date,
            time,
            utc_offset,
            strategy,
        } => {
            let mut config = file.chart_config();
            if let Some(s) = strategy {
                config.design.strategy = parse_strategy(&s).unwrap_or_else(|e| fail(e));
            }
            let input = birth_input(&file, &date, &time, utc_offset.as_deref());
            let utc = personality_utc(&input, &config.range).unwrap_or_else(|e| fail(e));
            let personality = UtcEpoch::from_utc(&utc);

            let provider = MeanElementsProvider::new();
            let mut ctx = LongitudeContext::new(&provider);
            let design = resolve_design_epoch(&mut ctx, personality, &config.design)
                .unwrap_or_else(|e| fail(e));

            println!("Personality: {utc}");
            println!(
                "Design:      {} ({})",
                design.epoch.to_utc(),
                strategy_label(design.strategy)
            );
            println!("Days before: {:.4}", personality.days_since(design.epoch));
            if let Some(arc) = design.achieved_arc_deg {
                println!("Solar arc:   {arc:.6} deg ({} iterations)", design.iterations);
            }
            for (label, epoch) in [("Personality", personality), ("Design", design.epoch)] {
                if let Ok(sun) = ctx.longitude(CelestialBody::Sun, epoch) {
                    let gate = gate_from_longitude(sun)
                        .map_or_else(|| "unknown".to_string(), |g| g.to_string());
                    println!("{label} Sun: {sun:.4} deg -> {gate}");
                }
            }
        }

        Commands::Chart {
            date,
            time,
            utc_offset,
            lat,
            lon,
            strategy,
            rule,
            json,
        } => {
            let mut config = file.chart_config();
            if let Some(s) = strategy {
                config.design.strategy = parse_strategy(&s).unwrap_or_else(|e| fail(e));
            }
            if let Some(r) = rule {
                config.classification = parse_rule(&r).unwrap_or_else(|e| fail(e));
            }
            let mut input = birth_input(&file, &date, &time, utc_offset.as_deref());
            if lat.is_some() || lon.is_some() {
                input = input.with_location(Location::new(lat, lon).unwrap_or_else(|e| fail(e)));
            }

            let chart = assemble(config, &input);
            if json {
                match serde_json::to_string_pretty(&chart) {
                    Ok(text) => println!("{text}"),
                    Err(e) => fail(e),
                }
            } else {
                print_chart(&chart);
            }
        }

        Commands::Config => match file.to_toml_string() {
            Ok(text) => print!("{text}"),
            Err(e) => fail(e),
        },
    }
}

fn fail(msg: impl Display) -> ! {
    eprintln!("error: {msg}");
    std::process::exit(1);
}

fn assemble(config: ChartConfig, input: &BirthInput) -> ChartProfile {
    let assembler = ChartAssembler::with_config(MeanElementsProvider::new(), config)
        .unwrap_or_else(|e| fail(e));
    assembler.assemble(input).unwrap_or_else(|e| fail(e))
}

fn birth_input(file: &ConfigFile, date: &str, time: &str, offset: Option<&str>) -> BirthInput {
    let date = parse_date(date).unwrap_or_else(|e| fail(e));
    let time = parse_time(time).unwrap_or_else(|e| fail(e));
    let offset: FixedOffset = match offset {
        Some(text) => parse_offset(text).unwrap_or_else(|e| fail(e)),
        None => file.utc_offset().unwrap_or_else(|e| fail(e)),
    };
    BirthInput::new(date, time, offset)
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("bad date {s:?}: {e}"))
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| format!("bad time {s:?}: {e}"))
}

fn parse_strategy(s: &str) -> Result<DesignStrategy, String> {
    match s.to_lowercase().as_str() {
        "root-find" | "rootfind" | "exact" => Ok(DesignStrategy::RootFind),
        "fixed-offset" | "fixed" | "88-days" => Ok(DesignStrategy::FixedOffset),
        _ => Err(format!("invalid strategy: {s} (root-find, fixed-offset)")),
    }
}

fn parse_rule(s: &str) -> Result<ClassificationRule, String> {
    match s.to_lowercase().as_str() {
        "simplified" | "sacral" => Ok(ClassificationRule::Simplified),
        "full" => Ok(ClassificationRule::Full),
        _ => Err(format!("invalid rule: {s} (simplified, full)")),
    }
}

fn strategy_label(strategy: DesignStrategy) -> String {
    if strategy.is_approximation() {
        format!("{strategy}, approximation")
    } else {
        strategy.to_string()
    }
}

fn join<T: Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}

fn join_or_none<T: Display>(items: impl Iterator<Item = T>) -> String {
    let s = join(items);
    if s.is_empty() { "none".to_string() } else { s }
}

fn print_chart(chart: &ChartProfile) {
    println!("Type:     {}", chart.aura_type());
    println!("Profile:  {}", chart.profile());
    if let Some(loc) = chart.location() {
        let side = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |d| format!("{d:.4}"));
        println!(
            "Location: {}, {}",
            side(loc.latitude_deg()),
            side(loc.longitude_deg())
        );
    }

    for cycle in [Cycle::Personality, Cycle::Design] {
        let instant = match cycle {
            Cycle::Personality => chart.personality_utc().to_string(),
            Cycle::Design => chart
                .design_utc()
                .map_or_else(|| "unresolved".to_string(), |t| t.to_string()),
        };
        println!();
        match cycle {
            Cycle::Personality => println!("{cycle} ({instant})"),
            Cycle::Design => println!(
                "{cycle} ({instant}, {})",
                strategy_label(chart.design_strategy())
            ),
        }
        for a in chart.cycle(cycle) {
            match a.longitude_deg() {
                Some(lon) => println!("  {:<8} {:>5}  {lon:>9.4}", a.body.name(), a.text()),
                None => println!("  {:<8} {:>5}", a.body.name(), a.text()),
            }
        }
    }

    println!();
    println!("Centers:  {}", join_or_none(chart.defined_centers().iter()));
    let channels: Vec<String> = chart
        .active_channels()
        .iter()
        .map(|c| format!("{} ({}-{})", c.label(), c.centers[0], c.centers[1]))
        .collect();
    println!("Channels: {}", join_or_none(channels.iter()));
    println!("Gates:    {}", join_or_none(chart.activated_gates().iter()));
    if chart.unknown_count() > 0 {
        println!("Unknown:  {} activation(s)", chart.unknown_count());
    }
}
