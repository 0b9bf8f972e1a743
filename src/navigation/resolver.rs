//! Fuzzy matching of free-text location mentions to waypoint names

use super::Waypoint;

/// Points for a candidate word equal to one of the waypoint's words
const EXACT_WORD_SCORE: u32 = 2;
/// Points for a candidate word contained in one of the waypoint's words
const PARTIAL_WORD_SCORE: u32 = 1;
/// Lowest score still accepted as a match
const MIN_SCORE: u32 = 1;

/// Resolve `candidate` to the best-matching waypoint.
///
/// An exact case-insensitive name match always wins. Otherwise every waypoint
/// is scored word by word and the strictly highest score wins; ties keep the
/// waypoint that comes first in `waypoints`.
pub fn resolve<'a>(waypoints: &'a [Waypoint], candidate: &str) -> Option<&'a Waypoint> {
    let candidate = candidate.trim().to_lowercase();

    if let Some(exact) = waypoints.iter().find(|w| w.key() == candidate) {
        return Some(exact);
    }

    let words: Vec<&str> = candidate.split_whitespace().collect();
    let mut best: Option<&Waypoint> = None;
    let mut best_score = 0;

    for waypoint in waypoints {
        let points = score(&words, waypoint.key());
        if points > best_score {
            best_score = points;
            best = Some(waypoint);
        }
    }

    if best_score >= MIN_SCORE {
        best
    } else {
        None
    }
}

fn score(candidate_words: &[&str], waypoint_name: &str) -> u32 {
    let name_words: Vec<&str> = waypoint_name.split_whitespace().collect();

    candidate_words
        .iter()
        .map(|word| {
            if name_words.contains(word) {
                EXACT_WORD_SCORE
            } else if name_words.iter().any(|nw| nw.contains(word)) {
                PARTIAL_WORD_SCORE
            } else {
                0
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{Coord, Facility};

    fn waypoints() -> Vec<Waypoint> {
        Facility::sample().unwrap().waypoints().to_vec()
    }

    fn name(w: Option<&Waypoint>) -> Option<&str> {
        w.map(Waypoint::name)
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let wps = waypoints();
        assert_eq!(name(resolve(&wps, "Parking Lot")), Some("parking lot"));
        assert_eq!(
            resolve(&wps, "cafeteria").map(Waypoint::coord),
            Some(Coord::new(1, 0))
        );
    }

    #[test]
    fn test_exact_match_beats_higher_word_overlap() {
        // "recycling zone" shares "recycling" with four other waypoints
        let wps = waypoints();
        assert_eq!(name(resolve(&wps, "recycling zone")), Some("recycling zone"));
    }

    #[test]
    fn test_word_scoring() {
        let wps = waypoints();
        assert_eq!(name(resolve(&wps, "the compost")), Some("compost area"));
        assert_eq!(name(resolve(&wps, "metal")), Some("metal recycling"));
        // partial word
        assert_eq!(name(resolve(&wps, "electro")), Some("electronics recycling"));
    }

    #[test]
    fn test_tie_keeps_first_declared() {
        // "recycling" scores 2 against every recycling waypoint; paper is declared first
        let wps = waypoints();
        assert_eq!(name(resolve(&wps, "recycling")), Some("paper recycling"));
    }

    #[test]
    fn test_no_match() {
        let wps = waypoints();
        assert!(resolve(&wps, "nowhere").is_none());
        assert!(resolve(&wps, "").is_none());
        assert!(resolve(&wps, "   ").is_none());
    }
}
