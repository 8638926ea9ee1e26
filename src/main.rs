//! CLI entry point for `algebraix-fetch`.

use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use algebraix_fetch::config::{self, Config};
use algebraix_fetch::download::HttpTransport;
use algebraix_fetch::page::chrome::{BrowserOptions, ChromePage};
use algebraix_fetch::roster::Roster;
use algebraix_fetch::session::SessionController;

#[derive(Parser)]
#[command(name = "algebraix-fetch", version, about = "Download every message and attachment from the Algebraix web inbox into per-student directories")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the inbox and download every message (default)
    Run {
        /// Identities TOML file
        #[arg(long, value_name = "FILE")]
        roster: Option<PathBuf>,
        /// Downloads root directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
        /// Inbox URL to open
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        /// Run the browser without a visible window
        #[arg(long)]
        headless: bool,
        /// Wait for Enter after the browser opens (manual login)
        #[arg(long)]
        pause: bool,
    },
    /// Parse and print the identities table
    Roster {
        /// Identities TOML file (defaults to the configured path)
        path: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::load_config();

    // Configure logging: stderr + optional log file
    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Some(Commands::Run {
            roster,
            output,
            url,
            headless,
            pause,
        }) => cmd_run(&config, roster, output, url, headless, pause),
        None => cmd_run(&config, None, None, None, false, false),
        Some(Commands::Roster { path, json }) => cmd_roster(&config, path, json),
        Some(Commands::Completions { shell }) => cmd_completions(shell),
        Some(Commands::Manpage) => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // Try to set up file logging
    let log_dir = config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "algebraix-fetch.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "algebraix-fetch", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Walk the inbox and download everything.
fn cmd_run(
    config: &Config,
    roster_flag: Option<PathBuf>,
    output_flag: Option<PathBuf>,
    url_flag: Option<String>,
    headless_flag: bool,
    pause_flag: bool,
) -> anyhow::Result<()> {
    let roster_path = roster_flag
        .or_else(|| config::roster_path(config))
        .context("Could not determine the identities file path; pass --roster")?;
    let roster = Roster::load(&roster_path).with_context(|| {
        format!(
            "Could not load the identities file at {}",
            roster_path.display()
        )
    })?;

    let downloads_root = output_flag
        .or_else(|| config::downloads_root(config))
        .context("Could not determine a downloads directory; pass --output")?;

    let options = BrowserOptions {
        inbox_url: url_flag.unwrap_or_else(|| config.browser.inbox_url.clone()),
        chrome_binary: config.browser.chrome_binary.clone(),
        headless: headless_flag || config.browser.headless,
    };

    println!("  Opening inbox at {}", options.inbox_url);
    let page = ChromePage::launch(&options)?;

    if pause_flag || config.browser.pause_for_login {
        println!("  Log in in the browser window, then press Enter to start.");
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
    }

    // Traversal starts at whatever message the page is showing.
    page.wait_for_message(Duration::from_secs(60))?;

    let transport = HttpTransport::new()?;
    let controller = SessionController::new(page, transport, roster, downloads_root.clone());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = controller.run(&|count| {
        pb.set_message(format!("Downloaded {count} message(s)"));
    });
    pb.finish_and_clear();

    let summary = result?;

    use humansize::{format_size, BINARY};
    println!();
    println!("  {:<20} {}", "Messages", summary.messages);
    println!("  {:<20} {}", "Attachments", summary.attachments);
    println!(
        "  {:<20} {}",
        "Bytes written",
        format_size(summary.bytes, BINARY)
    );
    println!(
        "  {:<20} {}",
        "Output",
        downloads_root
            .join(algebraix_fetch::download::INBOX_DIR_NAME)
            .display()
    );
    println!();

    Ok(())
}

/// Parse and print the identities table.
fn cmd_roster(config: &Config, path_flag: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let path = path_flag
        .or_else(|| config::roster_path(config))
        .context("Could not determine the identities file path; pass one as an argument")?;
    let roster = Roster::load(&path)?;

    if json {
        let entries: Vec<serde_json::Value> = roster
            .students
            .iter()
            .map(|(name, record)| {
                serde_json::json!({
                    "canonical_name": name,
                    "group": record.group,
                    "aliases": record.aliases,
                })
            })
            .collect();
        let output = serde_json::json!({
            "path": path.to_string_lossy(),
            "entry_count": roster.len(),
            "identities": entries,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("  {} identit(ies) in {}", roster.len(), path.display());
    println!();
    println!("  {:<8} {:<30} {}", "Group", "Canonical name", "Aliases");
    println!("  {}", "-".repeat(72));
    for (name, record) in &roster.students {
        println!(
            "  {:<8} {:<30} {}",
            record.group,
            name,
            record.aliases.join(", ")
        );
    }
    println!();

    Ok(())
}
