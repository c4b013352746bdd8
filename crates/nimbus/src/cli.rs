//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use nimbus_config::Config;
use nimbus_core::Scene;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "nimbus",
    version,
    about = "Become a cloud, a rainstorm or the wind in your terminal"
)]
pub struct Args {
    /// Read configuration from this file instead of the default location
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seed for particle randomness (overrides the config file)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Target frames per second (overrides the config file)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=240))]
    pub fps: Option<u16>,

    /// Scene to switch to once the intro has started (cloud, rain or wind)
    #[arg(long, value_name = "SCENE")]
    pub scene: Option<Scene>,

    /// Write logs to this file (default: nimbus.log in the data directory)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Apply command line overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.engine.seed = Some(seed);
        }
        if let Some(fps) = self.fps {
            config.display.fps = fps;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let args = Args::parse_from(["nimbus", "--seed", "5", "--fps", "12"]);
        let mut config = Config::default();
        config.engine.seed = Some(1);
        args.apply(&mut config);
        assert_eq!(config.engine.seed, Some(5));
        assert_eq!(config.display.fps, 12);
    }

    #[test]
    fn test_absent_flags_keep_file_values() {
        let args = Args::parse_from(["nimbus"]);
        let mut config = Config::default();
        config.engine.seed = Some(1);
        args.apply(&mut config);
        assert_eq!(config.engine.seed, Some(1));
        assert_eq!(config.display.fps, 30);
        assert!(!args.print_config);
    }

    #[test]
    fn test_scene_names_parse() {
        let args = Args::parse_from(["nimbus", "--scene", "Rainy"]);
        assert_eq!(args.scene, Some(Scene::Rain));
        assert!(Args::try_parse_from(["nimbus", "--scene", "snow"]).is_err());
    }

    #[test]
    fn test_fps_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["nimbus", "--fps", "0"]).is_err());
    }
}
