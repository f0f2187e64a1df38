use crate::OutputFormat;
use anyhow::Result;
use shrike_browser::SmokeTester;
use shrike_core::{SmokeConfig, SmokeReport};

pub fn execute(url: &str, config: SmokeConfig, format: OutputFormat) -> Result<()> {
    tracing::info!("Running smoke test against {}", url);

    // Create tokio runtime for async browser operations
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let max_console = config.max_console_reported;

    let result = runtime.block_on(async {
        let tester = SmokeTester::new(config);
        tester.run(url).await
    });

    // Stop waiting on any lingering blocking tasks before exiting
    runtime.shutdown_timeout(std::time::Duration::from_millis(100));

    let report = result?;

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Pretty => output_pretty(&report, max_console),
    }

    // Console errors on the page are informational, not fatal: the run
    // completed, so the exit status is 0.
    Ok(())
}

fn output_json(report: &SmokeReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn output_pretty(report: &SmokeReport, max_console: usize) {
    use console::style;

    println!("\n{}", style("Page Smoke Test").bold().cyan());
    println!("{}", style("===============").cyan());

    println!("\n{}", style("Page:").bold());
    println!("  Target: {}", report.target_url);
    println!("  Title:  {}", report.title);

    println!("\n{}", style("Elements:").bold());
    for summary in &report.element_summaries {
        println!("  {:<14} {}", format!("{}:", summary.group), summary.count);
    }

    if let Some(link) = &report.first_link {
        println!("\n{}", style("First link:").bold());
        println!(
            "  '{}' -> {}",
            link.text,
            link.href.as_deref().unwrap_or("(no href)")
        );
    }

    println!("\n{}", style("Screenshots:").bold());
    for path in &report.screenshot_paths {
        println!("  {}", path.display());
    }

    if report.console_messages.is_empty() {
        println!("\n{}", style("No console messages").bold());
    } else {
        println!(
            "\n{} ({} total)",
            style("Console messages:").bold(),
            report.console_messages.len()
        );
        for message in report.console_messages.iter().take(max_console) {
            println!("  [{}] {}", message.level.as_str(), message.text);
        }
        if report.console_messages.len() > max_console {
            println!(
                "  ... {} more not shown",
                report.console_messages.len() - max_console
            );
        }
    }

    if report.has_console_errors() {
        println!(
            "\n{}",
            style(format!(
                "⚠ {} console error message(s) found",
                report.error_count
            ))
            .yellow()
        );
    } else {
        println!("\n{}", style("✓ No console errors").green());
    }
}
