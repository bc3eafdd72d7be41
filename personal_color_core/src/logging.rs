//! JSON line-delimited audit log of matcher queries.
//!
//! Report generation replays these lines, so each entry carries the exact
//! ΔE and score numbers that were shown to the user.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::color::{Color, MatchQuality};
use crate::matcher::{MatchResult, SeasonEstimate};
use crate::season::Season;

/// File name of match query entries inside the log directory.
pub const MATCH_LOG: &str = "matches.jsonl";
/// File name of season estimate entries inside the log directory.
pub const SEASON_LOG: &str = "seasons.jsonl";

fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

fn append_json_line<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    serde_json::to_writer(&mut file, value)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    file.write_all(b"\n")
}

#[derive(Debug, Serialize)]
pub struct MatchLogEntry {
    pub timestamp_ms: u128,
    pub query_hex: String,
    pub results: Vec<MatchLogResult>,
}

#[derive(Debug, Serialize)]
pub struct MatchLogResult {
    pub label: String,
    pub season: Season,
    pub category: String,
    pub delta_e: f64,
    pub score: f64,
    pub quality: MatchQuality,
}

pub fn log_match_query<P: AsRef<Path>>(
    dir: P,
    query: Color,
    results: &[MatchResult],
) -> io::Result<()> {
    fs::create_dir_all(&dir)?;
    let entry = MatchLogEntry {
        timestamp_ms: timestamp_ms(),
        query_hex: query.to_rgb().to_hex(),
        results: results
            .iter()
            .map(|r| MatchLogResult {
                label: r.reference.label.clone(),
                season: r.reference.season,
                category: r.reference.category.clone(),
                delta_e: r.delta_e,
                score: r.score,
                quality: r.quality,
            })
            .collect(),
    };
    append_json_line(dir.as_ref().join(MATCH_LOG), &entry)
}

#[derive(Debug, Serialize)]
pub struct SeasonLogEntry<'a> {
    pub timestamp_ms: u128,
    pub query_hex: String,
    pub estimate: &'a SeasonEstimate,
}

pub fn log_season_estimate<P: AsRef<Path>>(
    dir: P,
    query: Color,
    estimate: &SeasonEstimate,
) -> io::Result<()> {
    fs::create_dir_all(&dir)?;
    let entry = SeasonLogEntry {
        timestamp_ms: timestamp_ms(),
        query_hex: query.to_rgb().to_hex(),
        estimate,
    };
    append_json_line(dir.as_ref().join(SEASON_LOG), &entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::color::Rgb;
    use crate::matcher::{find_matches, MatchOptions};

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "personal_color_core-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn match_log_appends_json_lines() {
        let dir = scratch_dir("match-log");
        let query = Color::Rgb(Rgb::new(255, 0, 0));
        let results = find_matches(
            query,
            &Catalog::builtin(),
            &MatchOptions::default().with_limit(2),
        )
        .unwrap();

        log_match_query(&dir, query, &results).unwrap();
        log_match_query(&dir, query, &results).unwrap();

        let contents = fs::read_to_string(dir.join(MATCH_LOG)).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["query_hex"], "#FF0000");
        assert_eq!(parsed["results"][0]["label"], "true_red");
        assert_eq!(parsed["results"][0]["quality"], "excellent");

        let _ = fs::remove_dir_all(&dir);
    }
}
