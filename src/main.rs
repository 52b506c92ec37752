mod app;
mod audio;
mod config;
mod error;
mod import;
mod logging;
mod playlist;
mod runtime;
mod transport;
mod ui;
mod view;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
