//! Obstacle pool and pair placement
//!
//! A fixed set of members is created once per session and recycled forever:
//! when a pair scrolls off the left edge it is re-placed beyond the rightmost
//! member using the ranges of the active difficulty tier.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, Rect};
use super::difficulty::{DifficultyProfile, DifficultyTable};
use super::progression::{ClearOutcome, Progression};
use crate::settings::GameConfig;

/// Which half of a pair a member is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Hangs from above; `y` is its bottom edge
    Upper,
    /// Rises from below; `y` is its top edge
    Lower,
}

/// One obstacle member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleMember {
    pub role: Role,
    /// Anchor x (left edge) and y (facing edge)
    pub anchor: Vec2,
    pub body: Body,
}

impl ObstacleMember {
    fn new(role: Role, size: Vec2) -> Self {
        let mut member = Self {
            role,
            anchor: Vec2::ZERO,
            body: Body::solid(Vec2::ZERO, size),
        };
        member.set_anchor(Vec2::ZERO);
        member
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.anchor.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.anchor.y
    }

    /// Move the member so its facing edge sits at `anchor`
    fn set_anchor(&mut self, anchor: Vec2) {
        self.anchor = anchor;
        self.body.pos = match self.role {
            Role::Upper => Vec2::new(anchor.x, anchor.y - self.body.size.y),
            Role::Lower => anchor,
        };
    }

    pub fn bounds(&self) -> Rect {
        self.body.bounds()
    }

    fn integrate(&mut self, dt: f32) {
        self.body.integrate(dt);
        self.anchor.x = self.body.pos.x;
    }
}

/// A placed pair, for readers that want pairs rather than members
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairView {
    pub x: f32,
    /// Bottom edge of the upper member
    pub upper_y: f32,
    /// Top edge of the lower member
    pub lower_y: f32,
}

impl PairView {
    #[inline]
    pub fn gap(&self) -> f32 {
        self.lower_y - self.upper_y
    }
}

/// Placement parameters that do not depend on the tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Placement {
    height: f32,
    margin_top: u32,
    margin_bottom: u32,
    velocity: f32,
}

/// Fixed-size pool of obstacle members, stored as (upper, lower) pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstaclePool {
    members: Vec<ObstacleMember>,
    placement: Placement,
}

impl ObstaclePool {
    /// Create and place every pair in order
    pub fn new<R: Rng>(
        config: &GameConfig,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) -> Self {
        let size = Vec2::new(config.obstacle_width, config.obstacle_height);
        let mut pool = Self {
            members: Vec::with_capacity(config.obstacle_count),
            placement: Placement {
                height: config.height,
                margin_top: config.margin_top,
                margin_bottom: config.margin_bottom,
                velocity: config.obstacle_velocity,
            },
        };

        for _ in 0..config.obstacle_count / 2 {
            let upper = pool.members.len();
            pool.members.push(ObstacleMember::new(Role::Upper, size));
            pool.members.push(ObstacleMember::new(Role::Lower, size));
            pool.place_pair(upper, upper + 1, profile, rng);
        }
        pool
    }

    pub fn members(&self) -> &[ObstacleMember] {
        &self.members
    }

    /// Pairs in pool order (members at 2i, 2i+1)
    pub fn pairs(&self) -> impl Iterator<Item = PairView> + '_ {
        self.members.chunks_exact(2).map(|pair| {
            let (upper, lower) = match pair[0].role {
                Role::Upper => (&pair[0], &pair[1]),
                Role::Lower => (&pair[1], &pair[0]),
            };
            PairView {
                x: upper.x(),
                upper_y: upper.y(),
                lower_y: lower.y(),
            }
        })
    }

    /// Largest member x, never below 0
    pub fn rightmost_x(&self) -> f32 {
        self.members.iter().map(|m| m.x()).fold(0.0, f32::max)
    }

    /// Scroll every member
    pub fn advance(&mut self, dt: f32) {
        for member in &mut self.members {
            member.integrate(dt);
        }
    }

    /// True when any member overlaps `rect`
    pub fn collides(&self, rect: &Rect) -> bool {
        self.members.iter().any(|m| m.bounds().intersects(rect))
    }

    /// Put pair `index` at an exact position
    #[cfg(test)]
    pub(crate) fn set_pair(&mut self, index: usize, x: f32, upper_y: f32, lower_y: f32) {
        self.members[2 * index].set_anchor(Vec2::new(x, upper_y));
        self.members[2 * index + 1].set_anchor(Vec2::new(x, lower_y));
    }

    /// Re-place the members at `upper` and `lower` as a new pair beyond the
    /// rightmost member.
    pub fn place_pair<R: Rng>(
        &mut self,
        upper: usize,
        lower: usize,
        profile: &DifficultyProfile,
        rng: &mut R,
    ) {
        let rightmost_x = self.rightmost_x();
        let gap = profile.gap.sample(rng);

        let top = self.placement.margin_top;
        let bottom = (self.placement.height as u32)
            .saturating_sub(self.placement.margin_bottom)
            .saturating_sub(gap)
            .max(top);
        let vertical = rng.random_range(top..=bottom);
        let spacing = profile.spacing.sample(rng);

        let x = rightmost_x + spacing as f32;
        let velocity = Vec2::new(self.placement.velocity, 0.0);

        let upper_member = &mut self.members[upper];
        upper_member.role = Role::Upper;
        upper_member.set_anchor(Vec2::new(x, vertical as f32));
        upper_member.body.vel = velocity;

        let lower_member = &mut self.members[lower];
        lower_member.role = Role::Lower;
        lower_member.set_anchor(Vec2::new(x, (vertical + gap) as f32));
        lower_member.body.vel = velocity;

        log::debug!(
            "Placed pair at x={x} gap={gap} y={vertical} ({})",
            profile.tier.as_str()
        );
    }

    /// Recycle members that scrolled past the left edge.
    ///
    /// A pair slot (members 2i, 2i+1) is re-placed once both of its members
    /// are off screen, using the currently active tier, then counted as
    /// cleared. A member whose partner is still visible waits for it.
    pub fn recycle_step<R: Rng>(
        &mut self,
        progression: &mut Progression,
        table: &DifficultyTable,
        rng: &mut R,
    ) -> Vec<ClearOutcome> {
        let offscreen: Vec<usize> = (0..self.members.len() / 2)
            .filter(|&i| {
                self.members[2 * i..2 * i + 2]
                    .iter()
                    .all(|m| m.bounds().right() <= 0.0)
            })
            .collect();

        let mut outcomes = Vec::new();
        for index in offscreen {
            let profile = *table.profile_for(progression.tier());
            self.place_pair(2 * index, 2 * index + 1, &profile, rng);
            outcomes.push(progression.on_pair_cleared(table));
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::difficulty::Tier;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pool(seed: u64) -> (ObstaclePool, GameConfig, Pcg32) {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let profile = *config.difficulty.profile_for(Tier::Easy);
        let pool = ObstaclePool::new(&config, &profile, &mut rng);
        (pool, config, rng)
    }

    fn assert_pair_valid(pair: &PairView, profile: &DifficultyProfile, config: &GameConfig) {
        let gap = pair.gap();
        assert!(gap >= profile.gap.min as f32 && gap <= profile.gap.max as f32, "gap {gap}");
        assert!(pair.upper_y >= config.margin_top as f32);
        assert!(pair.lower_y <= config.height - config.margin_bottom as f32);
    }

    #[test]
    fn test_initial_layout() {
        let (pool, config, _) = pool(1);
        assert_eq!(pool.members().len(), 10);
        let easy = config.difficulty.profile_for(Tier::Easy);

        let pairs: Vec<PairView> = pool.pairs().collect();
        assert_eq!(pairs.len(), 5);
        let mut prev_x = 0.0;
        for pair in &pairs {
            assert_pair_valid(pair, easy, &config);
            let spacing = pair.x - prev_x;
            assert!(spacing >= 300.0 && spacing <= 350.0, "spacing {spacing}");
            prev_x = pair.x;
        }
        for member in pool.members() {
            assert_eq!(member.body.vel.x, config.obstacle_velocity);
        }
    }

    #[test]
    fn test_member_edges_follow_role() {
        let (pool, config, _) = pool(2);
        let upper = &pool.members()[0];
        let lower = &pool.members()[1];
        assert_eq!(upper.role, Role::Upper);
        assert_eq!(upper.bounds().bottom(), upper.y());
        assert_eq!(upper.bounds().size.y, config.obstacle_height);
        assert_eq!(lower.role, Role::Lower);
        assert_eq!(lower.bounds().top(), lower.y());
        assert_eq!(upper.x(), lower.x());
    }

    #[test]
    fn test_advance_scrolls_left() {
        let (mut pool, _, _) = pool(3);
        let before = pool.members()[0].x();
        pool.advance(0.5);
        assert_eq!(pool.members()[0].x(), before - 100.0);
        assert_eq!(pool.members()[0].bounds().left(), before - 100.0);
    }

    #[test]
    fn test_recycle_places_beyond_rightmost() {
        let (mut pool, config, mut rng) = pool(4);
        let mut progression = Progression::new(0);

        // Push the first pair just past the left edge
        let offset = -(config.obstacle_width + 1.0) - pool.members()[0].x();
        for member in &mut pool.members[0..2] {
            let anchor = member.anchor + Vec2::new(offset, 0.0);
            member.set_anchor(anchor);
        }
        let rightmost = pool.rightmost_x();

        let outcomes = pool.recycle_step(&mut progression, &config.difficulty, &mut rng);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].score, 1);
        assert_eq!(progression.score(), 1);

        let recycled = pool.pairs().next().unwrap();
        assert!(recycled.x >= rightmost + 300.0 && recycled.x <= rightmost + 350.0);
        assert_eq!(pool.members()[0].x(), pool.members()[1].x());
    }

    #[test]
    fn test_two_pairs_offscreen_same_tick() {
        let (mut pool, config, mut rng) = pool(5);
        let mut progression = Progression::new(0);
        for member in &mut pool.members[0..4] {
            let anchor = Vec2::new(-100.0, member.anchor.y);
            member.set_anchor(anchor);
        }

        let outcomes = pool.recycle_step(&mut progression, &config.difficulty, &mut rng);
        assert_eq!(outcomes.len(), 2);
        assert!(pool.members().iter().all(|m| m.bounds().right() > 0.0));

        // Second recycled pair lands beyond the first one
        let pairs: Vec<PairView> = pool.pairs().collect();
        assert!(pairs[1].x > pairs[0].x);
        assert_eq!(progression.score(), 2);
    }

    #[test]
    fn test_odd_member_waits_for_partner() {
        let (mut pool, config, mut rng) = pool(6);
        let mut progression = Progression::new(0);
        let anchor = Vec2::new(-100.0, pool.members[0].anchor.y);
        pool.members[0].set_anchor(anchor);

        let outcomes = pool.recycle_step(&mut progression, &config.difficulty, &mut rng);
        assert!(outcomes.is_empty());
        assert_eq!(pool.members()[0].x(), -100.0);

        let anchor = Vec2::new(-100.0, pool.members[1].anchor.y);
        pool.members[1].set_anchor(anchor);
        let outcomes = pool.recycle_step(&mut progression, &config.difficulty, &mut rng);
        assert_eq!(outcomes.len(), 1);
    }

    #[test]
    fn test_stray_members_of_different_pairs_stay_apart() {
        let (mut pool, config, mut rng) = pool(9);
        let mut progression = Progression::new(0);
        for index in [0, 3] {
            let anchor = Vec2::new(-100.0, pool.members[index].anchor.y);
            pool.members[index].set_anchor(anchor);
        }

        let outcomes = pool.recycle_step(&mut progression, &config.difficulty, &mut rng);
        assert!(outcomes.is_empty());
        assert_eq!(pool.members()[0].x(), -100.0);
        assert_eq!(pool.members()[3].x(), -100.0);

        let anchor = Vec2::new(-100.0, pool.members[1].anchor.y);
        pool.members[1].set_anchor(anchor);
        let outcomes = pool.recycle_step(&mut progression, &config.difficulty, &mut rng);
        assert_eq!(outcomes.len(), 1);

        // Slot 0 is a proper pair again; slot 1 still waits on member 2
        assert_eq!(pool.members()[0].role, Role::Upper);
        assert_eq!(pool.members()[1].role, Role::Lower);
        assert_eq!(pool.members()[0].x(), pool.members()[1].x());
        assert_eq!(pool.members()[3].x(), -100.0);
        let easy = config.difficulty.profile_for(Tier::Easy);
        let first = pool.pairs().next().unwrap();
        assert_pair_valid(&first, easy, &config);
    }

    #[test]
    fn test_tier_change_applies_to_next_placement() {
        let (mut pool, config, mut rng) = pool(7);
        let mut progression = Progression::new(0);
        for _ in 0..19 {
            progression.on_pair_cleared(&config.difficulty);
        }
        for member in &mut pool.members[0..4] {
            let anchor = Vec2::new(-100.0, member.anchor.y);
            member.set_anchor(anchor);
        }

        let outcomes = pool.recycle_step(&mut progression, &config.difficulty, &mut rng);
        // First pair was placed while still easy and moved the score to 20
        assert_eq!(outcomes[0].new_tier, Some(Tier::Normal));
        assert_eq!(outcomes[1].new_tier, None);

        let pairs: Vec<PairView> = pool.pairs().collect();
        let normal = config.difficulty.profile_for(Tier::Normal);
        assert_pair_valid(&pairs[1], normal, &config);
    }

    #[test]
    fn test_long_run_keeps_pool_bounded() {
        let (mut pool, config, mut rng) = pool(8);
        let mut progression = Progression::new(0);
        for _ in 0..120 * 60 {
            pool.advance(SIM_DT);
            pool.recycle_step(&mut progression, &config.difficulty, &mut rng);
            assert_eq!(pool.members().len(), 10);
            // No member lingers more than a tick past the edge
            assert!(
                pool.members()
                    .iter()
                    .all(|m| m.bounds().right() > config.obstacle_velocity * SIM_DT)
            );
        }
        assert!(progression.score() > 0);
    }

    proptest! {
        #[test]
        fn prop_placement_invariants(seed in any::<u64>(), tier_index in 0usize..3) {
            let config = GameConfig::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let easy = *config.difficulty.profile_for(Tier::Easy);
            let mut pool = ObstaclePool::new(&config, &easy, &mut rng);
            let profile = *config.difficulty.profile_for(Tier::ALL[tier_index]);

            for i in 0..5 {
                let rightmost = pool.rightmost_x();
                pool.place_pair(2 * i, 2 * i + 1, &profile, &mut rng);
                let upper = &pool.members()[2 * i];
                let lower = &pool.members()[2 * i + 1];
                prop_assert_eq!(upper.x(), lower.x());
                prop_assert!(upper.x() >= rightmost + profile.spacing.min as f32);
                prop_assert!(upper.x() <= rightmost + profile.spacing.max as f32);
                let gap = lower.y() - upper.y();
                prop_assert!(profile.gap.contains(gap as u32));
                prop_assert!(upper.y() >= config.margin_top as f32);
                prop_assert!(lower.y() <= config.height - config.margin_bottom as f32);
                // No way around the pair
                prop_assert!(upper.bounds().top() <= 0.0);
                prop_assert!(lower.bounds().bottom() >= config.height);
            }
        }
    }
}
