//! Platform field: generation, streaming and retirement
//!
//! The field owns every platform and coin. Each tick it scrolls them down,
//! prunes the ones that fell below the screen or finished breaking, and tops
//! the active set back up by spawning above the highest platform. Which kinds
//! get spawned is decided by an injectable [`KindPolicy`].

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::coin::Coin;
use super::platform::{Platform, PlatformId, PlatformKind};
use crate::Rect;
use crate::consts::*;
use crate::error::SimError;

/// Score needed to raise difficulty by 1.0
pub const DIFFICULTY_SCORE_SCALE: f32 = 500.0;
/// Spacing grows by `SPACING_STEP` every `SPACING_SCORE_STEP` points
pub const SPACING_SCORE_STEP: u64 = 100;
pub const SPACING_STEP: f32 = 5.0;

/// Difficulty scalar for a score: `1 + score / 500`, uncapped
pub fn difficulty_for_score(score: u64) -> f32 {
    1.0 + score as f32 / DIFFICULTY_SCORE_SCALE
}

/// Spawn spacing for a score, capped at twice the base spacing
pub fn spacing_for_score(base_spacing: f32, score: u64) -> f32 {
    let steps = (score / SPACING_SCORE_STEP) as f32;
    (base_spacing + steps * SPACING_STEP).min(base_spacing * 2.0)
}

/// One descending threshold of the tiered policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    /// Value at difficulty 1.0
    pub base: f32,
    /// Decrease per unit of difficulty above 1.0
    pub slope: f32,
    /// Lowest value the threshold can shrink to
    pub floor: f32,
}

impl Threshold {
    pub const fn new(base: f32, slope: f32, floor: f32) -> Self {
        Self { base, slope, floor }
    }

    pub fn at(&self, difficulty: f32) -> f32 {
        (self.base - (difficulty - 1.0) * self.slope).max(self.floor)
    }
}

/// Thresholds of the difficulty-scaled ladder (ice > moving > breakable)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub ice: Threshold,
    pub moving: Threshold,
    pub breakable: Threshold,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            ice: Threshold::new(0.85, 0.15, 0.7),
            moving: Threshold::new(0.7, 0.2, 0.5),
            breakable: Threshold::new(0.55, 0.25, 0.3),
        }
    }
}

/// How the field chooses the kind of each new platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KindPolicy {
    /// `chance = uniform(0,1) * difficulty` walked down the ladder:
    /// above ice -> Ice, above moving -> Moving, above breakable -> Breakable,
    /// otherwise Normal
    Tiered(TierThresholds),
    /// Fixed relative weights over an allowed set, independent of difficulty
    Weighted(Vec<(PlatformKind, f32)>),
}

impl Default for KindPolicy {
    fn default() -> Self {
        KindPolicy::Tiered(TierThresholds::default())
    }
}

impl KindPolicy {
    /// Policy that only ever produces `kind`
    pub fn only(kind: PlatformKind) -> Self {
        KindPolicy::Weighted(vec![(kind, 1.0)])
    }

    pub fn validate(&self) -> Result<(), SimError> {
        match self {
            KindPolicy::Tiered(t) => {
                for (name, th) in [("ice", t.ice), ("moving", t.moving), ("breakable", t.breakable)]
                {
                    if !th.base.is_finite() || !th.slope.is_finite() || !th.floor.is_finite() {
                        return Err(SimError::invalid(
                            "policy",
                            format!("{name} threshold must be finite"),
                        ));
                    }
                }
                Ok(())
            }
            KindPolicy::Weighted(weights) => {
                if weights.is_empty() {
                    return Err(SimError::invalid("policy", "weighted policy has no kinds"));
                }
                if weights.iter().any(|(_, w)| !w.is_finite() || *w < 0.0) {
                    return Err(SimError::invalid(
                        "policy",
                        "weights must be finite and non-negative",
                    ));
                }
                if weights.iter().map(|(_, w)| w).sum::<f32>() <= 0.0 {
                    return Err(SimError::invalid("policy", "weights sum to zero"));
                }
                Ok(())
            }
        }
    }

    /// Draw a platform kind
    pub fn choose(&self, difficulty: f32, rng: &mut impl Rng) -> PlatformKind {
        match self {
            KindPolicy::Tiered(t) => {
                let chance = rng.random::<f32>() * difficulty;
                if chance > t.ice.at(difficulty) {
                    PlatformKind::Ice
                } else if chance > t.moving.at(difficulty) {
                    PlatformKind::Moving
                } else if chance > t.breakable.at(difficulty) {
                    PlatformKind::Breakable
                } else {
                    PlatformKind::Normal
                }
            }
            KindPolicy::Weighted(weights) => {
                let total: f32 = weights.iter().map(|(_, w)| w).sum();
                let mut roll = rng.random::<f32>() * total;
                for &(kind, weight) in weights {
                    if roll < weight {
                        return kind;
                    }
                    roll -= weight;
                }
                // Rounding can leave a sliver past the last bucket
                weights
                    .iter()
                    .rev()
                    .find(|(_, w)| *w > 0.0)
                    .map(|(k, _)| *k)
                    .unwrap_or(PlatformKind::Normal)
            }
        }
    }
}

/// Field geometry and streaming parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub platform_width: f32,
    /// Vertical gap between rows at score 0
    pub base_spacing: f32,
    /// Platforms generated above the start platform
    pub initial_count: usize,
    /// The field is topped up to this many platforms every step
    pub min_active: usize,
    /// Platforms are retired once their top passes `screen_height + despawn_margin`
    pub despawn_margin: f32,
    /// Leading initial platforms forced to Normal regardless of policy
    pub safe_start_rows: usize,
    /// Probability that a streamed-in platform carries a coin
    pub coin_chance: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            platform_width: PLATFORM_WIDTH,
            base_spacing: PLATFORM_SPACING,
            initial_count: INITIAL_PLATFORMS,
            min_active: MIN_ACTIVE_PLATFORMS,
            despawn_margin: DESPAWN_MARGIN,
            safe_start_rows: SAFE_START_ROWS,
            coin_chance: COIN_SPAWN_CHANCE,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.screen_width > 0.0) || !(self.screen_height > 0.0) {
            return Err(SimError::invalid("screen", "dimensions must be positive"));
        }
        if !(self.platform_width > 0.0) {
            return Err(SimError::invalid("platform_width", "must be positive"));
        }
        if self.platform_width + PLATFORM_EDGE_MARGIN > self.screen_width {
            return Err(SimError::invalid(
                "platform_width",
                format!(
                    "{} plus edge margin does not fit in screen width {}",
                    self.platform_width, self.screen_width
                ),
            ));
        }
        if !(self.base_spacing > 0.0) {
            return Err(SimError::invalid("base_spacing", "must be positive"));
        }
        if self.initial_count == 0 {
            return Err(SimError::invalid("initial_count", "must be at least 1"));
        }
        if self.min_active == 0 {
            return Err(SimError::invalid("min_active", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.coin_chance) {
            return Err(SimError::invalid("coin_chance", "must be within [0, 1]"));
        }
        Ok(())
    }
}

/// What happened during one field step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Breakable platforms removed because their countdown finished
    pub broken: Vec<PlatformId>,
    /// Platforms retired below the screen
    pub retired: usize,
    pub spawned: usize,
}

/// Owns every platform and coin of a run
#[derive(Debug, Clone)]
pub struct PlatformField {
    config: FieldConfig,
    policy: KindPolicy,
    rng: Pcg32,
    platforms: Vec<Platform>,
    coins: Vec<Coin>,
    difficulty: f32,
    spacing: f32,
    next_id: u32,
}

impl PlatformField {
    /// Validate the configuration and generate the initial field
    pub fn new(config: FieldConfig, policy: KindPolicy, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        policy.validate()?;

        let spacing = config.base_spacing;
        let mut field = Self {
            config,
            policy,
            rng: Pcg32::seed_from_u64(seed),
            platforms: Vec::new(),
            coins: Vec::new(),
            difficulty: 1.0,
            spacing,
            next_id: 1,
        };
        field.generate_initial();
        Ok(field)
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn random_x(&mut self) -> f32 {
        let max_x = self.config.screen_width - self.config.platform_width;
        self.rng.random_range(PLATFORM_EDGE_MARGIN..=max_x)
    }

    /// Reset to a fresh field: one Normal start platform under the spawn
    /// point, then `initial_count` rows at fixed spacing going up.
    ///
    /// The RNG stream continues, so a restarted run gets a new layout.
    pub fn generate_initial(&mut self) {
        self.platforms.clear();
        self.coins.clear();
        self.difficulty = 1.0;
        self.spacing = self.config.base_spacing;

        let width = self.config.platform_width;
        let start_y = self.config.screen_height - 100.0;
        let start_id = self.next_entity_id();
        self.platforms.push(Platform::normal(
            start_id,
            (self.config.screen_width - width) / 2.0,
            start_y,
            width,
        ));

        for i in 0..self.config.initial_count {
            let x = self.random_x();
            let y = start_y - 100.0 - i as f32 * self.config.base_spacing;
            let kind = if i < self.config.safe_start_rows {
                PlatformKind::Normal
            } else {
                self.policy.choose(self.difficulty, &mut self.rng)
            };
            let id = self.next_entity_id();
            self.platforms
                .push(Platform::spawn(kind, id, x, y, width, &mut self.rng));
        }

        log::debug!(
            "Generated initial field: {} platforms",
            self.platforms.len()
        );
    }

    /// Update score-derived parameters (difficulty and spawn spacing)
    pub fn set_score(&mut self, score: u64) {
        self.difficulty = difficulty_for_score(score);
        self.spacing = spacing_for_score(self.config.base_spacing, score);
    }

    /// Advance every platform one tick, retire and refill
    pub fn step(&mut self, scroll: f32) -> StepReport {
        let mut report = StepReport::default();

        for platform in &mut self.platforms {
            platform.update(scroll);
        }
        for coin in &mut self.coins {
            coin.update(scroll);
        }

        let limit = self.config.screen_height + self.config.despawn_margin;
        self.platforms.retain(|p| {
            if p.should_remove() {
                report.broken.push(p.id);
                false
            } else if p.y() >= limit {
                report.retired += 1;
                false
            } else {
                true
            }
        });
        self.coins.retain(|c| c.pos.y < limit);

        for id in &report.broken {
            log::debug!("Platform {} broke", id);
        }

        while self.platforms.len() < self.config.min_active {
            self.spawn_above();
            report.spawned += 1;
        }

        report
    }

    /// Spawn one platform `spacing` above the current highest one
    pub fn spawn_above(&mut self) -> PlatformId {
        let highest_y = self
            .highest_y()
            .unwrap_or(self.config.screen_height - 100.0);
        let y = highest_y - self.spacing;
        let x = self.random_x();
        let width = self.config.platform_width;
        let kind = self.policy.choose(self.difficulty, &mut self.rng);
        let id = self.next_entity_id();
        let platform = Platform::spawn(kind, id, x, y, width, &mut self.rng);

        // Moving platforms would leave their coin floating
        if kind != PlatformKind::Moving && self.rng.random::<f32>() < self.config.coin_chance {
            let coin_id = self.next_entity_id();
            self.coins.push(Coin::above(coin_id, x, y, width));
        }

        log::debug!(
            "Spawned {} platform {} at ({:.0}, {:.0})",
            kind.as_str(),
            id,
            x,
            y
        );
        self.platforms.push(platform);
        id
    }

    /// Remove and count coins overlapping `body`
    pub fn collect_coins(&mut self, body: &Rect) -> u32 {
        let before = self.coins.len();
        self.coins.retain(|c| !c.rect().overlaps(body));
        (before - self.coins.len()) as u32
    }

    /// Smallest y (highest on screen) of any platform
    pub fn highest_y(&self) -> Option<f32> {
        self.platforms.iter().map(|p| p.y()).reduce(f32::min)
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn platforms_mut(&mut self) -> &mut [Platform] {
        &mut self.platforms
    }

    pub fn get(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn policy(&self) -> &KindPolicy {
        &self.policy
    }

    /// Test hook: replace the platform set
    #[cfg(test)]
    pub(crate) fn set_platforms(&mut self, platforms: Vec<Platform>) {
        self.platforms = platforms;
    }
}
