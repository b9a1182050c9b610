use anyhow::Result;
use caption_overlay::cli::Cli;
use caption_overlay::component::CaptionOverlay;
use caption_overlay::init;
use caption_overlay::signal::setup_shutdown_signal;
use clap::Parser;
use console::style;
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("執行失敗: {e:#}");
            eprintln!("{} {e:#}", style("錯誤:").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let shutdown_signal = setup_shutdown_signal()?;
    let settings = cli.settings()?;

    let overlay = CaptionOverlay::new(settings, shutdown_signal);
    let result = overlay.run(&cli.request())?;
    overlay.print_summary(&result);

    Ok(())
}
