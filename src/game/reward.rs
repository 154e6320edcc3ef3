//! Session currency and player health.

use crate::storage::config::RewardSettings;

/// Currency collected during one run.
#[derive(Debug, Clone)]
pub struct CurrencyCounter {
    count: i64,
    base: i32,
    mult_pos: f32,
    mult_revive: f32,
    mult_dead: f32,
}

impl Default for CurrencyCounter {
    fn default() -> Self {
        Self::new(&RewardSettings::default())
    }
}

impl CurrencyCounter {
    pub fn new(settings: &RewardSettings) -> Self {
        Self {
            count: 0,
            base: settings.currency_base,
            mult_pos: settings.currency_mult_pos,
            mult_revive: settings.currency_mult_revive,
            mult_dead: settings.currency_mult_dead,
        }
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    /// Gain or lose currency. Losses never take the count below zero.
    ///
    /// Returns the applied change.
    pub fn award(&mut self, positive: bool, multiplier: i32) -> i64 {
        let delta = if positive {
            self.scaled(multiplier, self.mult_pos)
        } else {
            -self.scaled(multiplier, self.mult_dead).min(self.count)
        };
        self.count += delta;
        tracing::debug!("Currency {:+} -> {}", delta, self.count);
        delta
    }

    /// Cost of reviving with the given multiplier.
    pub fn revive_cost(&self, multiplier: i32) -> i64 {
        self.scaled(multiplier, self.mult_revive)
    }

    /// Spend the revive cost if affordable.
    pub fn try_revive(&mut self, multiplier: i32) -> bool {
        let cost = self.revive_cost(multiplier);
        if cost > self.count {
            return false;
        }
        self.count -= cost;
        true
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    fn scaled(&self, multiplier: i32, factor: f32) -> i64 {
        let value = f64::from(self.base) * f64::from(multiplier) * f64::from(factor);
        (value.round() as i64).max(0)
    }
}

/// Hit points of the player during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerHealth {
    current: u32,
    max: u32,
}

impl PlayerHealth {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }

    /// Take a hit. Falling off screen costs all remaining health.
    pub fn hit(&mut self, off_screen: bool) {
        self.current = if off_screen {
            0
        } else {
            self.current.saturating_sub(1)
        };
        tracing::debug!("Player hit, health {}/{}", self.current, self.max);
    }

    /// Restore one point, or all of them.
    pub fn heal(&mut self, to_max: bool) {
        self.current = if to_max {
            self.max
        } else {
            (self.current + 1).min(self.max)
        };
    }
}
