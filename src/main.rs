use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::init();

    let cfg = skyline_visualizer::config::Config::parse();
    if cfg.list_devices {
        skyline_visualizer::audio::list_input_devices()?;
        return Ok(());
    }

    skyline_visualizer::app::run(cfg)
}
