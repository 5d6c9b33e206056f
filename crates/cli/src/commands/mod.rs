use clap::Subcommand;

pub mod simulate;
pub mod strategy;

use self::simulate::{Pattern, SimulateArgs};
use lumen_config::EvictionPolicyKind;

#[derive(Subcommand)]
pub enum Commands {
    /// Navigate a synthetic item list and report cache and prefetch statistics
    #[command(visible_alias = "sim")]
    Simulate {
        /// Number of items in the list
        #[arg(long, default_value_t = 50)]
        items: usize,

        /// Number of navigation steps
        #[arg(long, default_value_t = 40)]
        steps: usize,

        /// Navigation pattern
        #[arg(long, value_enum, default_value_t = Pattern::Forward)]
        pattern: Pattern,

        /// Pause between steps in milliseconds
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,

        /// Eviction policy (lru, lfu or arc)
        #[arg(long, default_value = "lru")]
        policy: EvictionPolicyKind,

        /// Cache memory budget in megabytes
        #[arg(long, default_value_t = 512.0)]
        memory_mb: f64,

        /// Simulated decode latency in milliseconds
        #[arg(long, default_value_t = 20)]
        latency_ms: u64,

        /// Probability that a synthetic decode fails
        #[arg(long, default_value_t = 0.0)]
        failure_rate: f64,

        /// Seed for the navigation pattern and decode failures
        #[arg(long, default_value_t = 7)]
        seed: u64,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the load strategy chosen for a source size
    Strategy {
        /// Encoded source size in megabytes
        #[arg(long)]
        size_mb: f64,

        /// Select for a preview instead of full display
        #[arg(long)]
        preview: bool,
    },
}

impl Commands {
    pub async fn execute(self) -> anyhow::Result<()> {
        match self {
            Commands::Simulate {
                items,
                steps,
                pattern,
                interval_ms,
                policy,
                memory_mb,
                latency_ms,
                failure_rate,
                seed,
                json,
            } => {
                let args = SimulateArgs {
                    items,
                    steps,
                    pattern,
                    interval_ms,
                    policy,
                    memory_mb,
                    latency_ms,
                    failure_rate,
                    seed,
                };
                simulate::execute(args, json).await
            }
            Commands::Strategy { size_mb, preview } => strategy::execute(size_mb, preview),
        }
    }
}
