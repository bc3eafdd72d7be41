//! Consultation Demo - one seasonal color session end to end
//!
//! Run with: cargo run --example consultation_demo

use personal_color_core::{
    summarize_by_category, Catalog, ColorResult, MatchOptions, MatcherConfig, PaletteMatcher, Rgb,
};

fn main() -> ColorResult<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = MatcherConfig::load_from_file("config/matcher.toml").unwrap_or_else(|err| {
        tracing::warn!("using default matcher config: {}", err);
        MatcherConfig::default()
    });

    let mut matcher = PaletteMatcher::new(Catalog::builtin(), config);
    println!("Catalog: {} reference colors", matcher.catalog().len());
    println!("Categories: {:?}\n", matcher.catalog().categories());

    // Three cheek/forehead/jaw samples from a photo
    let samples = [Rgb::new(224, 172, 138), Rgb::new(230, 180, 146), Rgb::new(218, 166, 132)];
    let estimate = matcher.estimate_season_from_samples(&samples)?;
    println!(
        "Season: {} ({:.1}% confidence, closest '{}', ΔE {:.2})",
        estimate.season, estimate.confidence, estimate.best_label, estimate.delta_e
    );
    let profile = estimate.season.profile();
    println!(
        "Profile: {:?} / {:?} / {:?}",
        profile.temperature, profile.clarity, profile.depth
    );
    for (season, score) in &estimate.all_scores {
        println!("  {:<7} {:>6.1}", season, score);
    }

    println!("\nSwatch #FFDB58 against the {} palette:", estimate.season);
    let palette = MatchOptions::default()
        .with_season(estimate.season)
        .with_limit(5);
    let matches = matcher.find_matches_hex("#FFDB58", &palette)?;
    for m in &matches {
        println!(
            "  {:<16} {:<7} ΔE {:>6.2}  score {:>5.1}  {}",
            m.reference.label,
            m.reference.season,
            m.delta_e,
            m.score,
            m.quality.label()
        );
    }

    println!("\nBy category:");
    for summary in summarize_by_category(&matches) {
        println!(
            "  {:<8} n={} best ΔE {:.2} mean score {:.1}",
            summary.category, summary.count, summary.best_delta_e, summary.mean_score
        );
    }

    let outfit = ["#800020", "#F5F5DC", "#2E8B57"];
    let analysis = matcher.analyze_combination_hex(&outfit)?;
    println!("\nOutfit {:?}:", outfit);
    for harmony in &analysis.harmonies {
        println!("  {:<14} {:.1}", harmony.harmony.as_str(), harmony.confidence);
    }
    println!(
        "  palette {:.1}, diversity {:.1}, overall {:.1}",
        analysis.palette_score, analysis.diversity_score, analysis.overall_score
    );

    let cache = matcher.cache();
    println!(
        "\nLab cache: {} entries, hit rate {:.0}%",
        cache.len(),
        cache.hit_rate() * 100.0
    );

    Ok(())
}
