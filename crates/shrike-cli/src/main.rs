use anyhow::Result;
use clap::Parser;
use shrike_cli::{OutputFormat, commands};
use shrike_core::{LoadWaitPolicy, SmokeConfig, Viewport};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "shrike")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Smoke-test a page in headless Chrome",
    long_about = "Shrike loads a page in headless Chrome, captures full-page screenshots at \
                  desktop and mobile viewports, counts links, buttons, navigation and article \
                  elements, and records console messages into a structured report."
)]
struct Cli {
    /// Target URL to smoke-test
    #[arg(value_name = "URL", default_value = "http://localhost:3000")]
    url: String,

    /// Directory screenshots are written to (created if absent)
    #[arg(
        long,
        env = "SHRIKE_SCREENSHOT_DIR",
        default_value = "/tmp/webapp_test"
    )]
    screenshot_dir: PathBuf,

    /// Desktop viewport as WIDTHxHEIGHT
    #[arg(long, default_value = "1280x800")]
    desktop_viewport: Viewport,

    /// Mobile viewport as WIDTHxHEIGHT
    #[arg(long, default_value = "375x667")]
    mobile_viewport: Viewport,

    /// Load wait policy: networkidle, domready, or delay:<ms>
    #[arg(long, default_value = "networkidle")]
    wait: LoadWaitPolicy,

    /// Navigation timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Settle delay after the mobile resize, in milliseconds
    #[arg(long, default_value_t = 500)]
    settle_ms: u64,

    /// Maximum console messages shown in pretty output
    #[arg(long, default_value_t = 10)]
    max_console: usize,

    /// Path to the Chrome binary (auto-detected when omitted)
    #[arg(long, env = "SHRIKE_CHROME_PATH")]
    chrome_path: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = SmokeConfig::new()
        .with_screenshot_dir(cli.screenshot_dir)
        .with_desktop_viewport(cli.desktop_viewport)
        .with_mobile_viewport(cli.mobile_viewport)
        .with_load_wait(cli.wait)
        .with_navigation_timeout(Duration::from_secs(cli.timeout))
        .with_settle_delay(Duration::from_millis(cli.settle_ms))
        .with_max_console_reported(cli.max_console);
    if let Some(chrome_path) = cli.chrome_path {
        config = config.with_chrome_path(chrome_path);
    }

    commands::run::execute(&cli.url, config, cli.format)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("shrike=debug,shrike_core=debug,shrike_browser=debug")
    } else {
        EnvFilter::new("shrike=info,shrike_browser=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
