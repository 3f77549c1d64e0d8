//! # Game Mathematics
//!
//! Wave-scaled formulas shared by requirements, hooks and the money ledger.

use crate::config::WAVES_PER_SEGMENT;

/// Money value of a wave, scaled by `multiplier`.
///
/// Grows with the wave's position inside its ten-wave segment and, more
/// slowly, with the segment index. Always a multiple of 10.
///
/// # Examples
///
/// ```
/// use wavebound::wave_money_amount;
///
/// assert_eq!(wave_money_amount(1, 1.0), 180);
/// assert!(wave_money_amount(42, 2.5) > wave_money_amount(41, 2.5));
/// assert_eq!(wave_money_amount(42, 2.5) % 10, 0);
/// ```
pub fn wave_money_amount(wave: u32, multiplier: f64) -> u64 {
    let wave = wave.max(1);
    let segment = wave.div_ceil(WAVES_PER_SEGMENT) - 1;
    let position = ((wave - 1) % WAVES_PER_SEGMENT + 1) as f64 / 10.0;
    let base = (segment as f64 + 1.0 + (0.75 + position)) * 100.0;
    let value = base.powf(1.0 + 0.005 * segment as f64) * multiplier.max(0.0);
    ((value / 10.0).floor() as u64) * 10
}

/// Level of a wild monster met during an encounter.
///
/// Starts from the wave's scheduled enemy level (or the wave number when
/// none is scheduled) and adds one level per ten waves.
pub fn encounter_enemy_level(wave: u32, scheduled_level: Option<u32>) -> u32 {
    let bonus = (wave as f64 / WAVES_PER_SEGMENT as f64).round().max(0.0) as u32;
    scheduled_level.unwrap_or(wave) + bonus
}
