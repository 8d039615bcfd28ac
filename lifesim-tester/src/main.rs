mod policy;
mod reports;
mod runner;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use lifesim_game::LifeConfig;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use runner::{RunConfig, SeedSummary, run_all};
use util::parse_seeds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored summary for humans
    Console,
    /// Machine-readable summary
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "lifesim-tester", version = "0.1.0")]
#[command(about = "Headless QA for Lifesim - autoplays seeded lives and reports the outcomes")]
struct Args {
    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Lives to play per seed; legacy carries over between them
    #[arg(long, default_value_t = 3)]
    lives: u32,

    /// Stop a life after this many years if it has not ended
    #[arg(long, default_value_t = 120)]
    max_years: u32,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Directory for saves, archives, highscores and legacy progress
    #[arg(long, default_value = "target/lifesim-data")]
    data_dir: PathBuf,

    /// Optional JSON file overriding the life configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.report == ReportFormat::Console && args.output.is_none() {
        announce_banner();
    }

    let start_time = Instant::now();
    let config = build_run_config(&args)?;
    let summaries = run_all(&config)?;
    write_reports(&args, &summaries, start_time)
}

fn announce_banner() {
    println!("{}", "🧬 Lifesim Automated Tester".bright_cyan().bold());
    println!("{}", "===========================".cyan());
}

fn load_life_config(path: Option<&PathBuf>) -> Result<LifeConfig> {
    let Some(path) = path else {
        return Ok(LifeConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    LifeConfig::from_json(&json).with_context(|| format!("failed to parse {}", path.display()))
}

fn build_run_config(args: &Args) -> Result<RunConfig> {
    Ok(RunConfig {
        seeds: parse_seeds(&args.seeds)?,
        lives: args.lives,
        max_years: args.max_years,
        data_dir: args.data_dir.clone(),
        life: load_life_config(args.config.as_ref())?,
    })
}

fn write_reports(args: &Args, summaries: &[SeedSummary], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut output_target, summaries)?,
        ReportFormat::Console => {
            reports::generate_console_report(&mut output_target, summaries, start_time.elapsed())?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            seeds: "7".to_string(),
            lives: 1,
            max_years: 30,
            report: ReportFormat::Json,
            data_dir: std::env::temp_dir().join("lifesim-main-tests"),
            config: None,
            output: None,
        }
    }

    #[test]
    fn run_config_carries_cli_options() {
        let args = Args {
            seeds: "1, 2,3".to_string(),
            ..base_args()
        };
        let config = build_run_config(&args).unwrap();
        assert_eq!(config.seeds, vec![1, 2, 3]);
        assert_eq!(config.lives, 1);
        assert_eq!(config.max_years, 30);
        assert_eq!(config.life, LifeConfig::default());
    }

    #[test]
    fn life_config_loads_from_file() {
        let path = std::env::temp_dir().join("lifesim-tester-config.json");
        std::fs::write(&path, r#"{"archive_capacity": 5, "event_chance": 0.0}"#).unwrap();
        let config = load_life_config(Some(&path)).unwrap();
        assert_eq!(config.archive_capacity, 5);
        assert!(config.event_chance.abs() < f64::EPSILON);
        let missing = std::env::temp_dir().join("lifesim-missing.json");
        assert!(load_life_config(Some(&missing)).is_err());
    }

    #[test]
    fn write_reports_emits_json_output() {
        let temp = std::env::temp_dir().join("lifesim-test-report.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("\"total_lives\": 0"));
    }

    #[test]
    fn invalid_seeds_are_rejected() {
        let args = Args {
            seeds: "abc".to_string(),
            ..base_args()
        };
        assert!(build_run_config(&args).is_err());
    }
}
