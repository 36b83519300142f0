use anyhow::{Context, Result};
use benchgate::analyzer::{AnalysisInputs, Analyzer, RunOutcome};
use benchgate::cli::Cli;
use benchgate::observer::TracingObserver;
use benchgate::path_guard;
use benchgate::regression::RegressionConfig;
use benchgate::report::{self, JsonReport};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; warnings always reach stderr
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Cli) -> Result<RegressionConfig> {
    let base = match &args.config {
        Some(path) => RegressionConfig::from_toml_file(path)?,
        None => RegressionConfig::default(),
    };
    Ok(args.apply_overrides(base))
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let config = load_config(&args)?;
    let observer = TracingObserver;
    let analyzer = Analyzer::new(config, &observer).context("Invalid analysis configuration")?;

    // Validate output paths before any input is read
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let output = path_guard::authorize_output(&args.output, &cwd)
        .context("Refusing to write the Markdown report")?;
    let json_output = args
        .json_output
        .as_deref()
        .map(|path| path_guard::authorize_output(path, &cwd))
        .transpose()
        .context("Refusing to write the JSON report")?;

    let outcome = analyzer.run(&AnalysisInputs {
        results_dir: args.results_dir.clone(),
        history_dir: args.history_dir.clone(),
        today: chrono::Local::now().date_naive(),
    });

    if matches!(outcome, RunOutcome::NoData) {
        tracing::warn!("No benchmark results found in {}", args.results_dir.display());
    }

    let markdown = report::render_markdown(&outcome, analyzer.config());
    std::fs::write(&output, markdown)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Report written to {}", output.display());

    if let Some(json_output) = json_output {
        let json = JsonReport::new(&outcome, analyzer.config(), chrono::Local::now().to_rfc3339())
            .to_json()
            .context("Failed to serialize JSON report")?;
        std::fs::write(&json_output, json)
            .with_context(|| format!("Failed to write {}", json_output.display()))?;
        println!("JSON output written to {}", json_output.display());
    }

    if args.fail_on_regression && outcome.has_regressions() {
        anyhow::bail!("Performance regressions detected");
    }

    Ok(())
}
