const LEVEL_BASE_SCORE: f64 = 3.0;
const LEVEL_MULTIPLIER: f64 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub struct LevelProgress {
    pub value: f64,
    pub label: String,
}

/// Score needed to reach `level`: a geometric series over the level index,
/// so every level asks for more food than the last.
pub fn required_score_for_level(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    let steps = (level - 1).min(i32::MAX as u32) as i32;
    let required =
        LEVEL_BASE_SCORE * (LEVEL_MULTIPLIER.powi(steps) - 1.0) / (LEVEL_MULTIPLIER - 1.0);
    required.floor() as u64
}

pub fn level_from_score(score: u32) -> u32 {
    let mut level = 1;
    while u64::from(score) >= required_score_for_level(level + 1) {
        level += 1;
    }
    level
}

pub fn level_progress(score: u32, level: u32) -> LevelProgress {
    let current = required_score_for_level(level);
    let next = required_score_for_level(level + 1);
    let gained = i64::from(score) - current as i64;
    let needed = next as i64 - current as i64;

    let value = if needed > 0 {
        (gained as f64 / needed as f64).clamp(0.0, 1.0)
    } else {
        1.0
    };

    LevelProgress {
        value,
        label: format!("{}/{}", gained, needed),
    }
}

/// Tick interval in ms for `level`, never below `min_speed`.
pub fn speed_for_level(level: u32, initial_speed: u32, min_speed: u32, speed_step: u32) -> u32 {
    let reduction = level.saturating_sub(1).saturating_mul(speed_step);
    initial_speed.saturating_sub(reduction).max(min_speed)
}
