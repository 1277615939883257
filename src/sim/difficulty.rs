//! Difficulty tiers and the placement ranges each one uses
//!
//! Tiers escalate with score. Every tier narrows the horizontal spacing and
//! the vertical gap between obstacle members.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Named difficulty level
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl Tier {
    /// All tiers, lowest first
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Normal, Tier::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Normal => "normal",
            Tier::Hard => "hard",
        }
    }
}

/// Inclusive integer range, sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: u32,
    pub max: u32,
}

impl ValueRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Uniform draw from `[min, max]`
    pub fn sample<R: Rng>(&self, rng: &mut R) -> u32 {
        rng.random_range(self.min..=self.max)
    }
}

/// Placement ranges for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub tier: Tier,
    /// Horizontal distance from the rightmost obstacle to a new pair
    pub spacing: ValueRange,
    /// Vertical distance between the facing edges of a pair
    pub gap: ValueRange,
    /// Score at which this tier becomes active
    pub threshold: u32,
}

/// Problems found by [`DifficultyTable::validate`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DifficultyError {
    #[error("{tier:?}: {which} range has min {min} > max {max}")]
    InvertedRange {
        tier: Tier,
        which: &'static str,
        min: u32,
        max: u32,
    },
    #[error("{tier:?}: {which} range widens compared to the previous tier")]
    NotNarrowing { tier: Tier, which: &'static str },
    #[error("profile {index} is labelled {found:?}, expected {expected:?}")]
    Mislabelled {
        index: usize,
        found: Tier,
        expected: Tier,
    },
    #[error("{tier:?}: threshold {threshold} does not follow the previous tier")]
    BadThreshold { tier: Tier, threshold: u32 },
}

/// Static mapping from tier to placement ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyTable {
    /// One profile per tier, ordered `Easy`, `Normal`, `Hard`
    profiles: [DifficultyProfile; 3],
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            profiles: [
                DifficultyProfile {
                    tier: Tier::Easy,
                    spacing: ValueRange::new(300, 350),
                    gap: ValueRange::new(150, 200),
                    threshold: 0,
                },
                DifficultyProfile {
                    tier: Tier::Normal,
                    spacing: ValueRange::new(280, 330),
                    gap: ValueRange::new(140, 190),
                    threshold: 20,
                },
                DifficultyProfile {
                    tier: Tier::Hard,
                    spacing: ValueRange::new(250, 310),
                    gap: ValueRange::new(120, 160),
                    threshold: 50,
                },
            ],
        }
    }
}

impl DifficultyTable {
    /// Build a table from per-tier profiles (tiers are re-labelled in order)
    pub fn new(mut profiles: [DifficultyProfile; 3]) -> Result<Self, DifficultyError> {
        for (profile, tier) in profiles.iter_mut().zip(Tier::ALL) {
            profile.tier = tier;
        }
        let table = Self { profiles };
        table.validate()?;
        Ok(table)
    }

    /// Placement ranges for a tier
    #[inline]
    pub fn profile_for(&self, tier: Tier) -> &DifficultyProfile {
        &self.profiles[tier as usize]
    }

    pub fn profiles(&self) -> &[DifficultyProfile] {
        &self.profiles
    }

    /// Highest tier whose threshold is at or below `score`
    pub fn tier_for_score(&self, score: u32) -> Tier {
        self.profiles
            .iter()
            .rev()
            .find(|p| p.threshold <= score)
            .map(|p| p.tier)
            .unwrap_or_default()
    }

    /// Check ordering and narrowing invariants
    pub fn validate(&self) -> Result<(), DifficultyError> {
        let mut prev: Option<&DifficultyProfile> = None;
        for (index, (profile, expected)) in self.profiles.iter().zip(Tier::ALL).enumerate() {
            if profile.tier != expected {
                return Err(DifficultyError::Mislabelled {
                    index,
                    found: profile.tier,
                    expected,
                });
            }
            for (which, range) in [("spacing", profile.spacing), ("gap", profile.gap)] {
                if range.min > range.max {
                    return Err(DifficultyError::InvertedRange {
                        tier: profile.tier,
                        which,
                        min: range.min,
                        max: range.max,
                    });
                }
            }

            match prev {
                None if profile.threshold != 0 => {
                    return Err(DifficultyError::BadThreshold {
                        tier: profile.tier,
                        threshold: profile.threshold,
                    });
                }
                Some(p) => {
                    if profile.threshold <= p.threshold {
                        return Err(DifficultyError::BadThreshold {
                            tier: profile.tier,
                            threshold: profile.threshold,
                        });
                    }
                    let pairs = [
                        ("spacing", p.spacing, profile.spacing),
                        ("gap", p.gap, profile.gap),
                    ];
                    for (which, before, after) in pairs {
                        if after.min > before.min || after.max > before.max {
                            return Err(DifficultyError::NotNarrowing {
                                tier: profile.tier,
                                which,
                            });
                        }
                    }
                }
                None => {}
            }
            prev = Some(profile);
        }
        Ok(())
    }
}
