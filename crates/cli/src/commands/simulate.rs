//! Navigation simulation

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use lumen_config::{CacheConfig, EvictionPolicyKind, ViewerConfig};
use lumen_core::Direction;
use lumen_viewer::{ViewerBuilder, ViewerStats};
use serde::Serialize;
use tracing::{info, warn};

use crate::synthetic::SyntheticDecoder;

/// Share of forward steps in the erratic pattern
const ERRATIC_FORWARD_BIAS: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    Forward,
    Backward,
    Erratic,
}

impl Pattern {
    fn start(self, items: usize) -> usize {
        match self {
            Pattern::Backward => items.saturating_sub(1),
            Pattern::Forward | Pattern::Erratic => 0,
        }
    }

    fn next_step(self, rng: &mut fastrand::Rng) -> Direction {
        match self {
            Pattern::Forward => Direction::Forward,
            Pattern::Backward => Direction::Backward,
            Pattern::Erratic if rng.f64() < ERRATIC_FORWARD_BIAS => Direction::Forward,
            Pattern::Erratic => Direction::Backward,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulateArgs {
    pub items: usize,
    pub steps: usize,
    pub pattern: Pattern,
    pub interval_ms: u64,
    pub policy: EvictionPolicyKind,
    pub memory_mb: f64,
    pub latency_ms: u64,
    pub failure_rate: f64,
    pub seed: u64,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub pattern: Pattern,
    pub steps: usize,
    pub failed_shows: usize,
    pub elapsed_ms: u128,
    pub stats: ViewerStats,
}

pub async fn execute(args: SimulateArgs, json: bool) -> anyhow::Result<()> {
    let report = run(&args).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

pub async fn run(args: &SimulateArgs) -> anyhow::Result<SimulationReport> {
    let cache = CacheConfig::builder()
        .max_memory_mb(args.memory_mb)
        .eviction_policy(args.policy)
        .build()?;
    let config = ViewerConfig::default().with_cache(cache);
    let decoder = Arc::new(SyntheticDecoder::new(
        Duration::from_millis(args.latency_ms),
        args.failure_rate,
        args.seed,
    ));
    let items: Vec<String> = (0..args.items).map(|i| format!("item-{i:04}")).collect();

    let viewer = ViewerBuilder::new(decoder)
        .config(config)
        .items(items)
        .start(args.pattern.start(args.items))
        .build()?;

    info!(
        items = args.items,
        steps = args.steps,
        pattern = ?args.pattern,
        policy = %args.policy,
        "Starting simulation"
    );

    let started = Instant::now();
    let mut rng = fastrand::Rng::with_seed(args.seed);
    let mut failed_shows = 0;
    for step in 0..args.steps {
        let direction = args.pattern.next_step(&mut rng);
        if let Err(e) = viewer.navigate(direction).await {
            failed_shows += 1;
            warn!(step, error = %e, "Could not show item");
        }
        if args.interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(args.interval_ms)).await;
        }
    }
    viewer.settle().await;
    let elapsed_ms = started.elapsed().as_millis();
    let stats = viewer.stats();
    viewer.shutdown().await;

    Ok(SimulationReport {
        pattern: args.pattern,
        steps: args.steps,
        failed_shows,
        elapsed_ms,
        stats,
    })
}

fn print_report(report: &SimulationReport) {
    let cache = &report.stats.cache;
    let prefetch = &report.stats.prefetch;

    println!(
        "position      {}/{} after {} steps ({:?}, {} ms)",
        report.stats.position, report.stats.item_count, report.steps, report.pattern, report.elapsed_ms
    );
    println!(
        "cache         {} active, {} nearby, {:.1}/{:.1} MB ({:.1}%), policy {}",
        cache.active_size,
        cache.nearby_size,
        cache.current_memory_mb,
        cache.max_memory_mb,
        cache.memory_usage_pct,
        cache.policy
    );
    println!(
        "lookups       {} hits ({} active, {} nearby), {} misses, hit rate {:.1}%",
        cache.hits,
        cache.active_hits,
        cache.nearby_hits,
        cache.misses,
        cache.hit_rate * 100.0
    );
    println!(
        "churn         {} puts, {} rejected, {} evictions, {} promotions, {} demotions",
        cache.puts, cache.rejected_puts, cache.evictions, cache.promotions, cache.demotions
    );
    println!(
        "prefetch      {} launched, {} completed, {} failed, {} stale, {} written, {} rejected",
        prefetch.launched,
        prefetch.completed,
        prefetch.failed,
        prefetch.stale_discarded,
        prefetch.written,
        prefetch.rejected
    );
    println!(
        "gate          capacity {} ({} rebuilds), last window {}",
        prefetch.gate_capacity, prefetch.gate_rebuilds, prefetch.window
    );
    if report.failed_shows > 0 {
        println!("failed shows  {}", report.failed_shows);
    }
}
