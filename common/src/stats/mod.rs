mod player_stats;
mod stats_store;

pub use player_stats::PlayerStats;
pub use stats_store::StatsStore;
