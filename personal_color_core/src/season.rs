//! Seasonal personal-color categories.
//!
//! Four seasons, each split into three sub-tones. The descriptive profile of
//! a season is fixed metadata used for filtering and display; it is never
//! computed from a color.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four canonical personal-color seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Canonical ordering, also used to break ties between seasons.
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }

    /// Position in [`Season::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn profile(&self) -> SeasonProfile {
        match self {
            Season::Spring => SeasonProfile {
                temperature: Temperature::Warm,
                clarity: Clarity::Clear,
                depth: Depth::Light,
            },
            Season::Summer => SeasonProfile {
                temperature: Temperature::Cool,
                clarity: Clarity::Soft,
                depth: Depth::Light,
            },
            Season::Autumn => SeasonProfile {
                temperature: Temperature::Warm,
                clarity: Clarity::Muted,
                depth: Depth::Deep,
            },
            Season::Winter => SeasonProfile {
                temperature: Temperature::Cool,
                clarity: Clarity::Clear,
                depth: Depth::Deep,
            },
        }
    }

    /// The three sub-tones belonging to this season.
    pub fn subtypes(&self) -> [SeasonSubtype; 3] {
        use SeasonSubtype::*;
        match self {
            Season::Spring => [LightSpring, TrueSpring, BrightSpring],
            Season::Summer => [LightSummer, TrueSummer, SoftSummer],
            Season::Autumn => [SoftAutumn, TrueAutumn, DarkAutumn],
            Season::Winter => [DarkWinter, TrueWinter, BrightWinter],
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            _ => Err(format!("unknown season '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Warm,
    Cool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clarity {
    Clear,
    Soft,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    Light,
    Deep,
}

/// Fixed descriptive profile of a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonProfile {
    pub temperature: Temperature,
    pub clarity: Clarity,
    pub depth: Depth,
}

/// The twelve seasonal sub-tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonSubtype {
    LightSpring,
    TrueSpring,
    BrightSpring,
    LightSummer,
    TrueSummer,
    SoftSummer,
    SoftAutumn,
    TrueAutumn,
    DarkAutumn,
    DarkWinter,
    TrueWinter,
    BrightWinter,
}

impl SeasonSubtype {
    pub fn season(&self) -> Season {
        use SeasonSubtype::*;
        match self {
            LightSpring | TrueSpring | BrightSpring => Season::Spring,
            LightSummer | TrueSummer | SoftSummer => Season::Summer,
            SoftAutumn | TrueAutumn | DarkAutumn => Season::Autumn,
            DarkWinter | TrueWinter | BrightWinter => Season::Winter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use SeasonSubtype::*;
        match self {
            LightSpring => "light_spring",
            TrueSpring => "true_spring",
            BrightSpring => "bright_spring",
            LightSummer => "light_summer",
            TrueSummer => "true_summer",
            SoftSummer => "soft_summer",
            SoftAutumn => "soft_autumn",
            TrueAutumn => "true_autumn",
            DarkAutumn => "dark_autumn",
            DarkWinter => "dark_winter",
            TrueWinter => "true_winter",
            BrightWinter => "bright_winter",
        }
    }
}

impl fmt::Display for SeasonSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
