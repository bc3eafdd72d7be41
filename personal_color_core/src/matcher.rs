//! Catalog ranking and season estimation.
//!
//! The free functions ([`find_matches`], [`estimate_season_from_color`]) are
//! pure and take their catalog explicitly. [`PaletteMatcher`] bundles an
//! injected catalog with configuration, an sRGB → Lab cache and the optional
//! audit log for callers that issue many queries against one catalog.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::{Catalog, ReferenceColor, SeasonalCatalog};
use crate::color::{
    delta_e, hex_to_rgb, matching_score, rgb_to_lab, Color, Lab, MatchQuality, Rgb,
};
use crate::config::MatcherConfig;
use crate::error::{ColorError, ColorResult};
use crate::harmony::{self, HarmonyAnalysis};
use crate::logging;
use crate::query_cache::QueryCache;
use crate::season::Season;

/// Catalogs at least this large are scored with rayon by [`find_matches`].
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Filters and limits applied by [`find_matches`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOptions {
    /// Return at most this many results
    pub limit: Option<usize>,
    /// Drop entries whose ΔE exceeds this value
    pub max_delta_e: Option<f64>,
    /// Only consider entries of this season
    pub season: Option<Season>,
    /// Only consider entries of this category
    pub category: Option<String>,
}

impl MatchOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_max_delta_e(mut self, max_delta_e: f64) -> Self {
        self.max_delta_e = Some(max_delta_e);
        self
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    fn accepts(&self, entry: &ReferenceColor) -> bool {
        self.season.map_or(true, |season| entry.season == season)
            && self
                .category
                .as_deref()
                .map_or(true, |category| entry.category == category)
    }
}

/// One ranked catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub reference: ReferenceColor,
    pub delta_e: f64,
    pub score: f64,
    pub quality: MatchQuality,
}

impl MatchResult {
    fn new(reference: &ReferenceColor, delta_e: f64) -> Self {
        Self {
            reference: reference.clone(),
            delta_e,
            score: matching_score(delta_e),
            quality: MatchQuality::from_delta_e(delta_e),
        }
    }
}

/// Outcome of [`estimate_season_from_color`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonEstimate {
    pub season: Season,
    /// Best matching score of the winning season, in [0, 100]
    pub confidence: f64,
    /// ΔE of the winning season's closest entry
    pub delta_e: f64,
    /// Label of the winning season's closest entry
    pub best_label: String,
    /// Best matching score of every season that had entries
    pub all_scores: BTreeMap<Season, f64>,
}

/// Aggregate of the results that share a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub count: usize,
    pub best_delta_e: f64,
    pub best_score: f64,
    pub mean_score: f64,
}

/// Rank catalog entries by ascending ΔE against `query`.
///
/// Ties keep catalog order. Fails with `InsufficientInput` on an empty catalog.
pub fn find_matches(
    query: Color,
    catalog: &Catalog,
    opts: &MatchOptions,
) -> ColorResult<Vec<MatchResult>> {
    rank_catalog(query.to_lab(), catalog, opts, DEFAULT_PARALLEL_THRESHOLD)
}

fn rank_catalog(
    query: Lab,
    catalog: &Catalog,
    opts: &MatchOptions,
    parallel_threshold: usize,
) -> ColorResult<Vec<MatchResult>> {
    if catalog.is_empty() {
        return Err(ColorError::insufficient_input("catalog matching", 1, 0));
    }

    let start = Instant::now();
    let candidates: Vec<&ReferenceColor> = catalog.iter().filter(|e| opts.accepts(e)).collect();

    let score = |entry: &&ReferenceColor| {
        let distance = delta_e(query, entry.lab());
        match opts.max_delta_e {
            Some(max) if distance > max => None,
            _ => Some(MatchResult::new(entry, distance)),
        }
    };

    // Collecting Options keeps the indexed order on both paths.
    let scored: Vec<Option<MatchResult>> = if candidates.len() >= parallel_threshold {
        candidates.par_iter().map(score).collect()
    } else {
        candidates.iter().map(score).collect()
    };
    let mut results: Vec<MatchResult> = scored.into_iter().flatten().collect();

    // Vec::sort_by is stable.
    results.sort_by(|a, b| a.delta_e.total_cmp(&b.delta_e));
    if let Some(limit) = opts.limit {
        results.truncate(limit);
    }

    if results.is_empty() {
        tracing::warn!(
            candidates = candidates.len(),
            max_delta_e = ?opts.max_delta_e,
            "no catalog entries survived the match filters"
        );
    }
    tracing::debug!(
        catalog = catalog.len(),
        returned = results.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "ranked catalog"
    );

    Ok(results)
}

/// Pick the season whose catalog contains the closest color to `query`.
///
/// Seasons tie-break in [`Season::ALL`] order. Seasons without entries do not
/// compete; a map with no entries at all is `InsufficientInput`.
pub fn estimate_season_from_color(
    query: Color,
    seasonal_catalogs: &SeasonalCatalog,
) -> ColorResult<SeasonEstimate> {
    estimate_from_lab(query.to_lab(), seasonal_catalogs)
}

fn estimate_from_lab(
    query: Lab,
    seasonal_catalogs: &SeasonalCatalog,
) -> ColorResult<SeasonEstimate> {
    let mut all_scores = BTreeMap::new();
    let mut winner: Option<(Season, f64, f64, &str)> = None;

    for season in Season::ALL {
        let Some(entries) = seasonal_catalogs.get(&season) else {
            continue;
        };
        let best = entries
            .iter()
            .map(|entry| (delta_e(query, entry.lab()), entry.label.as_str()))
            .min_by(|a, b| a.0.total_cmp(&b.0));
        let Some((best_delta_e, label)) = best else {
            continue;
        };

        let score = matching_score(best_delta_e);
        all_scores.insert(season, score);

        // Strictly greater: an exact tie keeps the earlier season.
        if winner.map_or(true, |(_, best_score, _, _)| score > best_score) {
            winner = Some((season, score, best_delta_e, label));
        }
    }

    let (season, confidence, delta_e, label) = winner.ok_or_else(|| {
        ColorError::insufficient_input("season estimation", 1, 0)
    })?;

    Ok(SeasonEstimate {
        season,
        confidence,
        delta_e,
        best_label: label.to_string(),
        all_scores,
    })
}

/// Summarize ranked results per category, in order of first appearance.
pub fn summarize_by_category(results: &[MatchResult]) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = Vec::new();
    let mut score_sums: Vec<f64> = Vec::new();

    for result in results {
        let category = &result.reference.category;
        match summaries.iter().position(|s| &s.category == category) {
            Some(idx) => {
                let summary = &mut summaries[idx];
                summary.count += 1;
                summary.best_delta_e = summary.best_delta_e.min(result.delta_e);
                summary.best_score = summary.best_score.max(result.score);
                score_sums[idx] += result.score;
            }
            None => {
                summaries.push(CategorySummary {
                    category: category.clone(),
                    count: 1,
                    best_delta_e: result.delta_e,
                    best_score: result.score,
                    mean_score: 0.0,
                });
                score_sums.push(result.score);
            }
        }
    }

    for (summary, sum) in summaries.iter_mut().zip(score_sums) {
        summary.mean_score = sum / summary.count as f64;
    }
    summaries
}

/// Average several skin samples into one query color.
pub fn average_samples(samples: &[Rgb]) -> ColorResult<Rgb> {
    if samples.is_empty() {
        return Err(ColorError::insufficient_input("skin sample averaging", 1, 0));
    }

    let n = samples.len() as f64;
    let (r, g, b) = samples.iter().fold((0.0, 0.0, 0.0), |acc, s| {
        (acc.0 + s.r as f64, acc.1 + s.g as f64, acc.2 + s.b as f64)
    });
    let mean = |sum: f64| (sum / n).round().clamp(0.0, 255.0) as u8;
    Ok(Rgb::new(mean(r), mean(g), mean(b)))
}

/// Matcher bound to one catalog for the lifetime of a session.
pub struct PaletteMatcher {
    catalog: Catalog,
    primary: SeasonalCatalog,
    config: MatcherConfig,
    cache: QueryCache,
}

impl PaletteMatcher {
    pub fn new(catalog: Catalog, config: MatcherConfig) -> Self {
        Self {
            primary: catalog.primary_by_season(),
            cache: QueryCache::new(config.cache_capacity),
            catalog,
            config,
        }
    }

    pub fn builtin() -> Self {
        Self::new(Catalog::builtin(), MatcherConfig::default())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn query_lab(&mut self, query: Color) -> Lab {
        match query {
            Color::Rgb(rgb) => self.cache.get_or_compute(rgb, rgb_to_lab),
            Color::Lab(lab) => lab,
        }
    }

    /// Rank the catalog; unset options fall back to the configured defaults.
    pub fn find_matches(
        &mut self,
        query: Color,
        opts: &MatchOptions,
    ) -> ColorResult<Vec<MatchResult>> {
        let mut opts = opts.clone();
        opts.limit = opts.limit.or(self.config.default_limit);
        opts.max_delta_e = opts.max_delta_e.or(self.config.max_delta_e);

        let lab = self.query_lab(query);
        let results = rank_catalog(lab, &self.catalog, &opts, self.config.parallel_threshold)?;

        if self.config.logging.enabled {
            if let Err(err) =
                logging::log_match_query(&self.config.logging.directory, query, &results)
            {
                tracing::warn!("failed to write match log: {}", err);
            }
        }
        Ok(results)
    }

    pub fn find_matches_hex(
        &mut self,
        hex: &str,
        opts: &MatchOptions,
    ) -> ColorResult<Vec<MatchResult>> {
        self.find_matches(Color::Rgb(hex_to_rgb(hex)?), opts)
    }

    /// Estimate the season against the catalog's primary colors.
    pub fn estimate_season(&mut self, query: Color) -> ColorResult<SeasonEstimate> {
        let lab = self.query_lab(query);
        let estimate = estimate_from_lab(lab, &self.primary)?;

        if self.config.logging.enabled {
            if let Err(err) =
                logging::log_season_estimate(&self.config.logging.directory, query, &estimate)
            {
                tracing::warn!("failed to write season log: {}", err);
            }
        }
        Ok(estimate)
    }

    pub fn estimate_season_hex(&mut self, hex: &str) -> ColorResult<SeasonEstimate> {
        self.estimate_season(Color::Rgb(hex_to_rgb(hex)?))
    }

    /// Average the skin samples, then estimate the season of the mean.
    pub fn estimate_season_from_samples(
        &mut self,
        samples: &[Rgb],
    ) -> ColorResult<SeasonEstimate> {
        let mean = average_samples(samples)?;
        self.estimate_season(Color::Rgb(mean))
    }

    pub fn analyze_combination(&self, colors: &[Color]) -> ColorResult<HarmonyAnalysis> {
        harmony::analyze_combination(colors, &self.catalog)
    }

    pub fn analyze_combination_hex(&self, hexes: &[&str]) -> ColorResult<HarmonyAnalysis> {
        let colors = hexes
            .iter()
            .map(|hex| Color::from_hex(hex))
            .collect::<ColorResult<Vec<_>>>()?;
        self.analyze_combination(&colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PRIMARY_CATEGORY;

    fn entry(hex: &str, label: &str, season: Season) -> ReferenceColor {
        ReferenceColor::from_hex(hex, label, season, PRIMARY_CATEGORY).unwrap()
    }

    fn small_catalog() -> Catalog {
        Catalog::new(vec![
            entry("#FFD700", "gold", Season::Spring),
            entry("#FF0000", "red", Season::Winter),
            entry("#0000FF", "blue", Season::Winter),
            entry("#FFDAB9", "peach", Season::Spring),
        ])
    }

    #[test]
    fn ranks_ascending_by_delta_e() {
        let results = find_matches(
            Color::from_hex("#FE0101").unwrap(),
            &small_catalog(),
            &MatchOptions::default(),
        )
        .unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].reference.label, "red");
        assert!(results.windows(2).all(|w| w[0].delta_e <= w[1].delta_e));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn ties_keep_catalog_order() {
        let catalog = Catalog::new(vec![
            entry("#336699", "first", Season::Summer),
            entry("#336699", "second", Season::Winter),
            entry("#336699", "third", Season::Autumn),
        ]);
        let results =
            find_matches(Color::from_hex("#000000").unwrap(), &catalog, &MatchOptions::default())
                .unwrap();
        let labels: Vec<_> = results.iter().map(|r| r.reference.label.as_str()).collect();
        assert_eq!(labels, vec!["first", "second", "third"]);
    }

    #[test]
    fn parallel_path_matches_sequential_order() {
        let entries: Vec<ReferenceColor> = (0..600)
            .map(|i| {
                let v = (i % 40) as u8 * 6;
                ReferenceColor::new(
                    Rgb::new(v, v, v),
                    format!("gray-{i}"),
                    Season::Summer,
                    "neutral",
                )
            })
            .collect();
        let catalog = Catalog::new(entries);
        let query = rgb_to_lab(Rgb::new(100, 100, 100));

        let sequential =
            rank_catalog(query, &catalog, &MatchOptions::default(), usize::MAX).unwrap();
        let parallel = rank_catalog(query, &catalog, &MatchOptions::default(), 1).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn filters_and_limit() {
        let catalog = small_catalog();
        let query = Color::from_hex("#FFD700").unwrap();

        let spring = find_matches(
            query,
            &catalog,
            &MatchOptions::default().with_season(Season::Spring),
        )
        .unwrap();
        assert!(spring.iter().all(|r| r.reference.season == Season::Spring));

        let close = find_matches(query, &catalog, &MatchOptions::default().with_max_delta_e(40.0))
            .unwrap();
        assert!(close.iter().all(|r| r.delta_e <= 40.0));
        assert_eq!(close[0].reference.label, "gold");

        let top = find_matches(query, &catalog, &MatchOptions::default().with_limit(2)).unwrap();
        assert_eq!(top.len(), 2);

        let none = find_matches(query, &catalog, &MatchOptions::default().with_category("lipstick"))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = find_matches(
            Color::Rgb(Rgb::new(1, 1, 1)),
            &Catalog::default(),
            &MatchOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ColorError::InsufficientInput { .. }));

        let err = estimate_season_from_color(Color::Rgb(Rgb::new(1, 1, 1)), &SeasonalCatalog::new())
            .unwrap_err();
        assert!(matches!(err, ColorError::InsufficientInput { .. }));
    }

    #[test]
    fn season_tie_prefers_canonical_order() {
        let mut seasonal = SeasonalCatalog::new();
        seasonal.insert(Season::Winter, vec![entry("#808080", "winter gray", Season::Winter)]);
        seasonal.insert(Season::Summer, vec![entry("#808080", "summer gray", Season::Summer)]);

        let estimate =
            estimate_season_from_color(Color::from_hex("#808080").unwrap(), &seasonal).unwrap();
        assert_eq!(estimate.season, Season::Summer);
        assert_eq!(estimate.confidence, 100.0);
        assert_eq!(estimate.all_scores.len(), 2);
        assert_eq!(estimate.all_scores[&Season::Winter], 100.0);
    }

    #[test]
    fn category_summaries() {
        let catalog = Catalog::new(vec![
            ReferenceColor::from_hex("#FF0000", "red lip", Season::Winter, "lipstick").unwrap(),
            ReferenceColor::from_hex("#0000FF", "blue shadow", Season::Winter, "eyeshadow")
                .unwrap(),
            ReferenceColor::from_hex("#FF1010", "red lip 2", Season::Winter, "lipstick").unwrap(),
        ]);
        let results =
            find_matches(Color::from_hex("#FF0000").unwrap(), &catalog, &MatchOptions::default())
                .unwrap();
        let summaries = summarize_by_category(&results);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].category, "lipstick");
        assert_eq!(summaries[0].count, 2);
        assert_eq!(summaries[0].best_delta_e, 0.0);
        assert_eq!(summaries[0].best_score, 100.0);
        assert!(summaries[0].mean_score < 100.0);
        assert_eq!(summaries[1].category, "eyeshadow");
    }

    #[test]
    fn averages_samples() {
        let mean = average_samples(&[Rgb::new(200, 150, 120), Rgb::new(210, 160, 131)]).unwrap();
        assert_eq!(mean, Rgb::new(205, 155, 126));
        assert!(average_samples(&[]).is_err());
    }

    #[test]
    fn matcher_caches_and_applies_config_defaults() {
        let config = MatcherConfig {
            default_limit: Some(3),
            ..MatcherConfig::default()
        };
        let mut matcher = PaletteMatcher::new(Catalog::builtin(), config);

        let first = matcher.find_matches_hex("#FF0000", &MatchOptions::default()).unwrap();
        let second = matcher.find_matches_hex("#ff0000", &MatchOptions::default()).unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert_eq!(matcher.cache().hits(), 1);
        assert_eq!(matcher.cache().misses(), 1);

        let all = matcher
            .find_matches_hex("#FF0000", &MatchOptions::default().with_limit(100))
            .unwrap();
        assert_eq!(all.len(), matcher.catalog().len());
    }

    #[test]
    fn matcher_rejects_bad_hex() {
        let mut matcher = PaletteMatcher::builtin();
        assert!(matches!(
            matcher.estimate_season_hex("#XYZXYZ"),
            Err(ColorError::InvalidFormat { .. })
        ));
    }
}
