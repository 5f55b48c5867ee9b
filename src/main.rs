use std::process::ExitCode;

use clap::Parser;
use eframe::egui;
use log::LevelFilter;

use doodlepad::app::DoodleApp;
use doodlepad::cli::{self, CliArgs};
use doodlepad::logger;
use doodlepad::settings::CanvasSettings;

fn main() -> ExitCode {
    // -- CLI / headless mode ---------------------------------------------
    if CliArgs::is_cli_mode() {
        let args = CliArgs::parse();
        logger::init(if args.verbose { LevelFilter::Debug } else { LevelFilter::Info });
        return cli::run(args);
    }

    // -- GUI mode -----------------------------------------------------

    // Initialize session log (overwrites previous session log)
    logger::init(LevelFilter::Info);

    let settings = CanvasSettings::load();
    // First launch: write the defaults out so they can be edited
    if CanvasSettings::settings_path().is_some_and(|p| !p.exists())
        && let Err(e) = settings.save()
    {
        log::warn!("could not write default settings: {e}");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([480.0, 360.0])
            .with_title("DoodlePad"),
        ..Default::default()
    };

    match eframe::run_native(
        "DoodlePad",
        options,
        Box::new(move |cc| Box::new(DoodleApp::new(cc, settings))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("window failed: {e}");
            ExitCode::FAILURE
        }
    }
}
