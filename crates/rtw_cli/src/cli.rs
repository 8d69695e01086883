use clap::{Parser, ValueEnum};
use log::LevelFilter;
use rtw_renderer::RenderSettings;
use std::path::PathBuf;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Render the random-spheres scene to a PPM image
#[derive(Debug, Parser)]
#[command(name = "rtw")]
#[command(about = "Parallel CPU path tracer")]
pub struct Args {
    /// JSON settings file; command-line flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Samples per pixel
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(short, long)]
    pub depth: Option<u32>,

    /// Worker threads (defaults to available parallelism)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Seed for scene generation; random if omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output PPM path
    #[arg(short, long, default_value = "output.ppm")]
    pub output: PathBuf,

    /// Logging level (RUST_LOG overrides)
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command-line overrides on top of file or default settings.
    pub fn apply(&self, mut settings: RenderSettings) -> RenderSettings {
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(samples) = self.samples {
            settings.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            settings.max_depth = depth;
        }
        if let Some(threads) = self.threads {
            settings.threads = threads;
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_settings() {
        let args = Args::parse_from(["rtw", "--width", "64", "-s", "4", "--threads", "2"]);
        let settings = args.apply(RenderSettings::default());

        assert_eq!(settings.width, 64);
        assert_eq!(settings.height, 225);
        assert_eq!(settings.samples_per_pixel, 4);
        assert_eq!(settings.threads, 2);
        assert_eq!(args.output, PathBuf::from("output.ppm"));
    }

    #[test]
    fn test_args_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
