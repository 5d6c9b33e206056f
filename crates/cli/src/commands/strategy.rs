use anyhow::ensure;
use lumen_config::StrategyConfig;
use lumen_prefetch::{select_strategy, LoadIntent};

pub fn execute(size_mb: f64, preview: bool) -> anyhow::Result<()> {
    ensure!(
        size_mb.is_finite() && size_mb >= 0.0,
        "size must be a non-negative number of megabytes, got {size_mb}"
    );
    let intent = if preview {
        LoadIntent::Preview
    } else {
        LoadIntent::Display
    };
    let strategy = select_strategy(size_mb, intent, &StrategyConfig::default());
    println!("{strategy}");
    Ok(())
}
