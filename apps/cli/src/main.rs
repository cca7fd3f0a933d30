use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use framelens_core::{
    AnalysisClient, AnalysisReport, AnalysisSession, AnalysisState, Config, describe_error,
    encode_file, format_analysis_readable, load_raw_text, load_report, save_report,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

#[derive(Parser)]
#[command(name = "framelens")]
#[command(
    about = "Send a video to a multimodal model and get a cohesion block, scene table and style analysis",
    long_about = "Send a video to a multimodal model and get a cohesion block, scene table and style analysis.\n\nVideos up to roughly 15 minutes work best; longer videos can take several minutes to analyze."
)]
struct Cli {
    /// Video file (or a saved model answer with --from-text)
    input: PathBuf,

    /// Override the detected MIME type (e.g. "video/mp4")
    #[arg(long)]
    mime: Option<String>,

    /// Model name. Defaults to FRAMELENS_MODEL or gemini-2.5-pro.
    #[arg(short, long)]
    model: Option<String>,

    /// Print the model answer as-is, without extracting sections
    #[arg(long)]
    raw: bool,

    /// Print the full report as JSON
    #[arg(long, conflicts_with = "raw")]
    json: bool,

    /// Save the report as JSON to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treat INPUT as a saved answer (text, or a report JSON) and only render it
    #[arg(long)]
    from_text: bool,

    /// Verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "framelens=debug,framelens_core=debug"
    } else {
        "framelens=warn,framelens_core=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("{}", style(message).red().bold());
    std::process::exit(1);
}

async fn print_report(report: &AnalysisReport, cli: &Cli) -> Result<()> {
    if let Some(output) = &cli.output {
        save_report(report, output).await?;
        eprintln!(
            "{} {}\n",
            style("Saved:").dim(),
            style(output.display()).cyan()
        );
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    match (&report.parsed, cli.raw) {
        (Some(parsed), false) => println!("{}", format_analysis_readable(parsed)),
        _ => println!("{}", report.raw),
    }

    Ok(())
}

async fn render_saved(cli: &Cli) -> Result<()> {
    let is_json = cli
        .input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let report = if is_json {
        load_report(&cli.input).await?
    } else {
        let raw = load_raw_text(&cli.input).await?;
        AnalysisReport::new(display_name(&cli.input), "", "", raw)
    };
    debug!(structured = report.parsed.is_some(), "rendering saved answer");

    print_report(&report, cli).await
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.from_text {
        return render_saved(&cli).await;
    }

    // Validate API key early
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => exit_with_error(&describe_error(&e)),
    };
    let config = match &cli.model {
        Some(model) => config.with_model(model),
        None => config,
    };
    let model = config.model.clone();
    let client = AnalysisClient::new(config);

    if !cli.json {
        println!(
            "\n{}  {}\n",
            style("framelens").cyan().bold(),
            style("Video Scene Analyzer").dim()
        );
    }

    let source = display_name(&cli.input);
    let mut session = AnalysisSession::new();
    session.begin(&source)?;

    let total_start = Instant::now();

    // Step 1: Encode
    let spinner = create_spinner("Encoding video...");
    let encoded = encode_file(&cli.input, cli.mime.as_deref()).await;
    let mime_type = match &encoded {
        Ok(media) => {
            spinner.finish_with_message(format!(
                "{} Encoded: {} {}",
                style("✓").green().bold(),
                style(&source).dim(),
                style(format!("[{}]", media.mime_type)).yellow()
            ));
            media.mime_type.clone()
        }
        Err(_) => {
            spinner.finish_and_clear();
            String::new()
        }
    };

    // Step 2: Analyze
    let outcome = match encoded {
        Ok(media) => {
            let step_start = Instant::now();
            let spinner = create_spinner(&format!(
                "Analyzing with {} (longer videos can take several minutes)...",
                model
            ));
            let outcome = client.analyze(&media).await;
            match &outcome {
                Ok(_) => spinner.finish_with_message(format!(
                    "{} Analysis received {}",
                    style("✓").green().bold(),
                    style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
                )),
                Err(_) => spinner.finish_and_clear(),
            }
            outcome
        }
        Err(err) => Err(err),
    };

    let report = match session.complete(outcome)? {
        AnalysisState::Succeeded {
            source,
            text,
            parsed,
        } => AnalysisReport {
            source: source.clone(),
            mime_type,
            model,
            raw: text.clone(),
            parsed: parsed.clone(),
        },
        AnalysisState::Failed { error, .. } => exit_with_error(error),
        other => unreachable!("analysis finished in state {}", other.name()),
    };

    if !cli.json {
        println!(
            "\n{} {}\n",
            style("Total time:").dim(),
            style(format_duration(total_start.elapsed())).cyan().bold()
        );
    }

    print_report(&report, &cli).await
}
