use std::io::{self, IsTerminal};
use std::process;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use orgchart::cli::{output, run_session, Cli, CliResult};
use orgchart::config::Settings;
use orgchart::infrastructure::di::ServiceContainer;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    if let Err(e) = run(&cli) {
        output::error(&e);
        process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }
    if cli.config_template {
        output::info(&Settings::template());
        return Ok(());
    }

    let services = ServiceContainer::new(Settings::load(cli.config.as_deref())?);
    if cli.show_config {
        output::info(&services.settings.to_toml()?);
        return Ok(());
    }

    let mut ctx = services.chart.new_context();
    if let Some(path) = &cli.chart {
        services.chart.import_file(&mut ctx, path)?;
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    run_session(stdin.lock(), &mut ctx, &services, interactive)
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
