use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Deployment environment. Decides which RPCs are open and whether the
/// background stepper runs.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Dev,
    /// Agents pay their living cost per action, no background stepper
    Training,
    /// No food is spawned at startup or reset
    Testing,
    /// Debug RPCs (reset, step, observation, delete) are refused
    Prod,
}

// Gather the command line arguments into a struct
#[derive(Parser, Debug)]
#[command(about = "Olamai Simulation Server")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 50051)]
    pub port: u16,

    #[arg(long, default_value_t = 50052)]
    pub health_check_port: u16,

    #[arg(long, value_enum, default_value_t = Environment::Dev)]
    pub env: Environment,

    /// Width and height of a spectator region, in cells
    #[arg(long, default_value_t = 16)]
    pub region_size: i32,

    /// World steps per second
    #[arg(long, default_value_t = 5)]
    pub fps: u32,

    #[arg(long, default_value_t = 200)]
    pub initial_food: usize,

    /// Food is respawned when the count drops below this
    #[arg(long, default_value_t = 200)]
    pub min_food: usize,

    /// Delay between checks for a spectator that has not connected yet
    #[arg(long, default_value_t = 2000)]
    pub spectator_wait_ms: u64,

    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[arg(long)]
    pub json_logs: bool,
}

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub env: Environment,
    pub region_size: i32,
    pub fps: u32,
    pub initial_food: usize,
    pub min_food: usize,
    pub spectator_wait: Duration,
    pub spectator_retries: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            env: Environment::Dev,
            region_size: 16,
            fps: 5,
            initial_food: 200,
            min_food: 200,
            spectator_wait: Duration::from_secs(2),
            spectator_retries: 3,
        }
    }
}

impl From<&Args> for ServiceConfig {
    fn from(args: &Args) -> Self {
        Self {
            env: args.env,
            // a zero region size would divide by zero
            region_size: args.region_size.max(1),
            fps: args.fps,
            initial_food: args.initial_food,
            min_food: args.min_food,
            spectator_wait: Duration::from_millis(args.spectator_wait_ms),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_config_defaults() {
        let args = Args::parse_from(["simulation-service"]);
        assert_eq!(args.port, 50051);
        assert_eq!(args.health_check_port, 50052);
        assert_eq!(args.log_level, "info");
        assert!(!args.json_logs);

        let config = ServiceConfig::from(&args);
        let default = ServiceConfig::default();
        assert_eq!(config.env, default.env);
        assert_eq!(config.region_size, default.region_size);
        assert_eq!(config.fps, default.fps);
        assert_eq!(config.initial_food, default.initial_food);
        assert_eq!(config.min_food, default.min_food);
        assert_eq!(config.spectator_wait, default.spectator_wait);
    }

    #[test]
    fn parses_environment() {
        let args = Args::parse_from(["simulation-service", "--env", "training", "--fps", "10"]);
        assert_eq!(args.env, Environment::Training);
        assert_eq!(args.fps, 10);
    }

    #[test]
    fn rejects_unknown_environment() {
        assert!(Args::try_parse_from(["simulation-service", "--env", "staging"]).is_err());
    }
}
