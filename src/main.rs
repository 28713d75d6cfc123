//! stroller-rental - Simulated Stroller Rental Terminal Demo
//!
//! Runs the interactive demo, or a single scripted rent/return cycle with `--headless`.

use anyhow::Result;
use clap::Parser;
#[cfg(feature = "config")]
use std::path::PathBuf;
use stroller_rental::config::{DemoConfig, ThemeName};
use stroller_rental::render::ui::TerminalUI;
use stroller_rental::Application;

#[derive(Debug, Parser)]
#[command(name = "stroller-rental", version = stroller_rental::VERSION)]
#[command(about = "A terminal demo of a simulated stroller rental flow")]
struct Args {
    /// Delay of each simulated hardware phase, in milliseconds
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Make every rent and return fail at its first checkpoint
    #[arg(long)]
    force_fail: bool,

    /// Path to a TOML config file (defaults to the user config directory)
    #[cfg(feature = "config")]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Color theme
    #[arg(long, value_enum)]
    theme: Option<ThemeName>,

    /// Run one rent/return cycle, print each state and exit
    #[arg(long)]
    headless: bool,
}

impl Args {
    /// Base config from file, then command-line overrides
    fn resolve_config(&self) -> Result<DemoConfig> {
        let mut config = self.base_config()?;
        if let Some(delay) = self.delay {
            config.step_delay_ms = delay;
        }
        if self.force_fail {
            config.force_fail = true;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Err(err) = config.validate() {
            anyhow::bail!("Invalid configuration: {}", err);
        }
        Ok(config)
    }

    #[cfg(feature = "config")]
    fn base_config(&self) -> Result<DemoConfig> {
        let config = match &self.config {
            Some(path) => {
                if !path.is_file() {
                    anyhow::bail!("Config file does not exist: {}", path.display());
                }
                DemoConfig::load_from_file(path)?
            }
            None => DemoConfig::load_default()?,
        };
        Ok(config)
    }

    #[cfg(not(feature = "config"))]
    fn base_config(&self) -> Result<DemoConfig> {
        Ok(DemoConfig::default())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging for development
    env_logger::init();

    let args = Args::parse();
    let config = args.resolve_config()?;

    if args.headless {
        let mut stdout = std::io::stdout();
        stroller_rental::app::headless::run_headless(&config, &mut stdout).await?;
        return Ok(());
    }

    let ui_renderer = Box::new(TerminalUI::with_theme(config.theme.theme())?);
    let mut app = Application::new(config, ui_renderer)?;

    app.run().await?;

    Ok(())
}
