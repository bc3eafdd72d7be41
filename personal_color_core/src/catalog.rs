//! Reference color catalogs.
//!
//! A [`Catalog`] is loaded once (from JSON product data or the built-in
//! palette) and is read-only afterwards. Entries keep their insertion order,
//! which is what ranking falls back on when two entries tie on ΔE.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{hex_to_rgb, Color, Lab, Rgb};
use crate::error::{ColorError, ColorResult};
use crate::season::{Season, SeasonSubtype};

/// Category name for a season's primary palette colors.
pub const PRIMARY_CATEGORY: &str = "primary";

/// Catalog entries grouped by season, iterated in canonical season order.
pub type SeasonalCatalog = BTreeMap<Season, Vec<ReferenceColor>>;

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceColor {
    pub color: Color,
    pub label: String,
    pub season: Season,
    pub category: String,
    pub subtype: Option<SeasonSubtype>,
    pub source_product_id: Option<String>,
    /// UI-only extras (brand, expert notes, ...). Never read by the matcher.
    pub metadata: BTreeMap<String, Value>,
    lab: Lab,
}

impl ReferenceColor {
    pub fn new(
        color: impl Into<Color>,
        label: impl Into<String>,
        season: Season,
        category: impl Into<String>,
    ) -> Self {
        let color = color.into();
        Self {
            lab: color.to_lab(),
            color,
            label: label.into(),
            season,
            category: category.into(),
            subtype: None,
            source_product_id: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Build an entry from a hex string.
    pub fn from_hex(
        hex: &str,
        label: impl Into<String>,
        season: Season,
        category: impl Into<String>,
    ) -> ColorResult<Self> {
        Ok(Self::new(hex_to_rgb(hex)?, label, season, category))
    }

    pub fn with_subtype(mut self, subtype: SeasonSubtype) -> Self {
        self.subtype = Some(subtype);
        self
    }

    pub fn with_product_id(mut self, id: impl Into<String>) -> Self {
        self.source_product_id = Some(id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Precomputed Lab coordinates of [`ReferenceColor::color`].
    pub fn lab(&self) -> Lab {
        self.lab
    }
}

/// Immutable, ordered collection of reference colors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    entries: Vec<ReferenceColor>,
}

impl Catalog {
    pub fn new(entries: Vec<ReferenceColor>) -> Self {
        Self { entries }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ColorResult<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|err| {
            ColorError::catalog(format!("{}: {}", path.as_ref().display(), err))
        })?;
        Self::from_json(&contents)
    }

    /// Parse a JSON array of `{hex, label, season, category, ...}` records.
    pub fn from_json(json: &str) -> ColorResult<Self> {
        let raw: Vec<RawReferenceColor> =
            serde_json::from_str(json).map_err(|err| ColorError::catalog(err.to_string()))?;

        let entries = raw
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                record.try_into_reference().map_err(|err| {
                    tracing::warn!("rejecting catalog record {}: {}", index, err);
                    err
                })
            })
            .collect::<ColorResult<Vec<_>>>()?;

        tracing::debug!(entries = entries.len(), "catalog loaded");
        Ok(Self { entries })
    }

    /// Compact reference palette: a few primary colors per sub-tone plus
    /// one neutral per season.
    pub fn builtin() -> Self {
        let entries = BUILTIN_PALETTE
            .iter()
            .map(|&(rgb, label, subtype, category)| {
                ReferenceColor::new(rgb, label, subtype.season(), category).with_subtype(subtype)
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ReferenceColor] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReferenceColor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Group every entry by season, preserving catalog order within a season.
    pub fn by_season(&self) -> SeasonalCatalog {
        group_by_season(self.entries.iter())
    }

    /// Group only [`PRIMARY_CATEGORY`] entries by season.
    pub fn primary_by_season(&self) -> SeasonalCatalog {
        group_by_season(
            self.entries
                .iter()
                .filter(|entry| entry.category == PRIMARY_CATEGORY),
        )
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.category.as_str()) {
                seen.push(entry.category.as_str());
            }
        }
        seen
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ReferenceColor;
    type IntoIter = std::slice::Iter<'a, ReferenceColor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<ReferenceColor> for Catalog {
    fn from_iter<I: IntoIterator<Item = ReferenceColor>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn group_by_season<'a>(entries: impl Iterator<Item = &'a ReferenceColor>) -> SeasonalCatalog {
    let mut grouped = SeasonalCatalog::new();
    for entry in entries {
        grouped.entry(entry.season).or_default().push(entry.clone());
    }
    grouped
}

#[derive(Debug, Deserialize)]
struct RawReferenceColor {
    hex: String,
    label: String,
    season: Season,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default)]
    subtype: Option<SeasonSubtype>,
    #[serde(default)]
    source_product_id: Option<Value>,
    #[serde(default)]
    metadata: BTreeMap<String, Value>,
}

impl RawReferenceColor {
    fn try_into_reference(self) -> ColorResult<ReferenceColor> {
        if let Some(subtype) = self.subtype {
            if subtype.season() != self.season {
                return Err(ColorError::catalog(format!(
                    "entry '{}' has subtype {} outside season {}",
                    self.label, subtype, self.season
                )));
            }
        }

        let mut entry =
            ReferenceColor::from_hex(&self.hex, self.label, self.season, self.category)?;
        entry.subtype = self.subtype;
        entry.metadata = self.metadata;
        // Product ids are opaque: numbers and strings are both accepted.
        entry.source_product_id = match self.source_product_id {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id),
            Some(other) => Some(other.to_string()),
        };
        Ok(entry)
    }
}

fn default_category() -> String {
    PRIMARY_CATEGORY.to_string()
}

const BUILTIN_PALETTE: &[(Rgb, &str, SeasonSubtype, &str)] = &[
    (Rgb::new(0xFF, 0xDA, 0xB9), "peach", SeasonSubtype::LightSpring, PRIMARY_CATEGORY),
    (Rgb::new(0xFF, 0xE4, 0xB5), "warm_cream", SeasonSubtype::LightSpring, PRIMARY_CATEGORY),
    (Rgb::new(0x98, 0xFB, 0x98), "mint_green", SeasonSubtype::LightSpring, PRIMARY_CATEGORY),
    (Rgb::new(0xFF, 0xD7, 0x00), "golden_yellow", SeasonSubtype::TrueSpring, PRIMARY_CATEGORY),
    (Rgb::new(0xFF, 0x7F, 0x50), "coral", SeasonSubtype::TrueSpring, PRIMARY_CATEGORY),
    (Rgb::new(0x3C, 0xB3, 0x71), "grass_green", SeasonSubtype::TrueSpring, PRIMARY_CATEGORY),
    (Rgb::new(0xFF, 0x63, 0x47), "tomato_red", SeasonSubtype::BrightSpring, PRIMARY_CATEGORY),
    (Rgb::new(0x00, 0xCE, 0xD1), "turquoise", SeasonSubtype::BrightSpring, PRIMARY_CATEGORY),
    (Rgb::new(0xFF, 0xA5, 0x00), "bright_orange", SeasonSubtype::BrightSpring, PRIMARY_CATEGORY),
    (Rgb::new(0xFF, 0xFF, 0xF0), "ivory", SeasonSubtype::TrueSpring, "neutral"),
    (Rgb::new(0xE6, 0xE6, 0xFA), "lavender", SeasonSubtype::LightSummer, PRIMARY_CATEGORY),
    (Rgb::new(0xB0, 0xE0, 0xE6), "powder_blue", SeasonSubtype::LightSummer, PRIMARY_CATEGORY),
    (Rgb::new(0xFF, 0xB6, 0xC1), "light_pink", SeasonSubtype::LightSummer, PRIMARY_CATEGORY),
    (Rgb::new(0x6A, 0x5A, 0xCD), "periwinkle", SeasonSubtype::TrueSummer, PRIMARY_CATEGORY),
    (Rgb::new(0xDB, 0x70, 0x93), "rose", SeasonSubtype::TrueSummer, PRIMARY_CATEGORY),
    (Rgb::new(0x5F, 0x9E, 0xA0), "cadet_blue", SeasonSubtype::TrueSummer, PRIMARY_CATEGORY),
    (Rgb::new(0xB0, 0xA8, 0xB9), "mauve_gray", SeasonSubtype::SoftSummer, PRIMARY_CATEGORY),
    (Rgb::new(0x8F, 0xBC, 0x8F), "sage", SeasonSubtype::SoftSummer, PRIMARY_CATEGORY),
    (Rgb::new(0xC8, 0xA2, 0xC8), "lilac", SeasonSubtype::SoftSummer, PRIMARY_CATEGORY),
    (Rgb::new(0x70, 0x80, 0x90), "slate_gray", SeasonSubtype::TrueSummer, "neutral"),
    (Rgb::new(0xC1, 0x9A, 0x6B), "camel", SeasonSubtype::SoftAutumn, PRIMARY_CATEGORY),
    (Rgb::new(0xBC, 0x8F, 0x8F), "dusty_rose", SeasonSubtype::SoftAutumn, PRIMARY_CATEGORY),
    (Rgb::new(0x8A, 0x9A, 0x5B), "moss", SeasonSubtype::SoftAutumn, PRIMARY_CATEGORY),
    (Rgb::new(0xD2, 0x69, 0x1E), "pumpkin", SeasonSubtype::TrueAutumn, PRIMARY_CATEGORY),
    (Rgb::new(0xB8, 0x86, 0x0B), "mustard", SeasonSubtype::TrueAutumn, PRIMARY_CATEGORY),
    (Rgb::new(0x80, 0x80, 0x00), "olive", SeasonSubtype::TrueAutumn, PRIMARY_CATEGORY),
    (Rgb::new(0x6B, 0x42, 0x26), "dark_chocolate", SeasonSubtype::DarkAutumn, PRIMARY_CATEGORY),
    (Rgb::new(0x55, 0x6B, 0x2F), "dark_olive", SeasonSubtype::DarkAutumn, PRIMARY_CATEGORY),
    (Rgb::new(0xA0, 0x52, 0x2D), "sienna", SeasonSubtype::DarkAutumn, PRIMARY_CATEGORY),
    (Rgb::new(0x8B, 0x73, 0x55), "warm_taupe", SeasonSubtype::TrueAutumn, "neutral"),
    (Rgb::new(0x19, 0x19, 0x70), "midnight_blue", SeasonSubtype::DarkWinter, PRIMARY_CATEGORY),
    (Rgb::new(0x80, 0x00, 0x20), "burgundy", SeasonSubtype::DarkWinter, PRIMARY_CATEGORY),
    (Rgb::new(0x01, 0x32, 0x20), "forest_green", SeasonSubtype::DarkWinter, PRIMARY_CATEGORY),
    (Rgb::new(0xFF, 0x00, 0x00), "true_red", SeasonSubtype::TrueWinter, PRIMARY_CATEGORY),
    (Rgb::new(0x00, 0x00, 0xFF), "royal_blue", SeasonSubtype::TrueWinter, PRIMARY_CATEGORY),
    (Rgb::new(0xFF, 0xFF, 0xFF), "pure_white", SeasonSubtype::TrueWinter, PRIMARY_CATEGORY),
    (Rgb::new(0xFF, 0x00, 0xFF), "fuchsia", SeasonSubtype::BrightWinter, PRIMARY_CATEGORY),
    (Rgb::new(0x00, 0xA8, 0x6B), "jade", SeasonSubtype::BrightWinter, PRIMARY_CATEGORY),
    (Rgb::new(0x00, 0xFF, 0xFF), "icy_cyan", SeasonSubtype::BrightWinter, PRIMARY_CATEGORY),
    (Rgb::new(0x00, 0x00, 0x00), "black", SeasonSubtype::TrueWinter, "neutral"),
];
