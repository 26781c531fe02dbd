use anyhow::{Context, bail};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;
use uwsgi_latency_profiler::{Result, config, logging, pipeline, remap, render};

#[derive(Parser)]
#[command(name = "uwsgi-latency-profiler")]
#[command(about = "Rank request paths in a uWSGI access log by latency", long_about = None)]
struct Cli {
    /// Access log to analyze.
    #[arg(required_unless_present = "list_path_maps")]
    log: Option<PathBuf>,

    #[command(flatten)]
    options: config::Options,

    /// Print the built-in --path-map functions and exit.
    #[arg(long)]
    list_path_maps: bool,

    /// Log progress at info level (RUST_LOG overrides).
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, value_enum, default_value_t = logging::LogFormat::Pretty)]
    log_format: logging::LogFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format, cli.verbose);

    if cli.list_path_maps {
        for (name, description) in remap::describe() {
            println!("{name:<16}{description}");
        }
        return Ok(());
    }

    // 1) Validate configuration before touching the log.
    let settings = cli.options.resolve()?;

    let Some(path) = cli.log else {
        bail!("no access log given");
    };

    // 2) Parse + aggregate in one pass.
    let file = File::open(&path).with_context(|| format!("open log file {}", path.display()))?;
    info!(path = %path.display(), "opened log file");

    let report = pipeline::run(pipeline::lossy_lines(BufReader::new(file)), &settings.run)
        .with_context(|| format!("process log file {}", path.display()))?;
    info!(
        accepted = report.summary.accepted,
        malformed = report.summary.malformed,
        outside_window = report.summary.outside_window,
        paths = report.summary.distinct_paths,
        "log processed"
    );

    // 3) Render.
    match settings.format {
        config::OutputFormat::Text => {
            print!("{}", render::render_text_report(&report, settings.numbers));
        }
        config::OutputFormat::Json => {
            println!("{}", render::render_json_report(&report)?);
        }
    }

    Ok(())
}
