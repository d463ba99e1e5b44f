pub mod activity;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod editor;
pub mod install;
pub mod lifecycle;
pub mod logging;
pub mod notify;
pub mod paths;
pub mod playback;
pub mod voice;

#[cfg(test)]
mod tests;

use clap::Parser;

pub fn run() {
    let cli = cli::Cli::parse();

    if let Err(err) = cli::execute(cli) {
        log::error!("{}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
