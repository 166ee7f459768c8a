use super::types::{Medal, RankedEntry, TrendCandidate};

const TIE_EPSILON: f64 = 1e-9;

/// Top-two selection with ties, by ascending pre-relaxation distance.
///
/// The closest place is always included. Every following place whose distance
/// is within `1e-9` of the second-closest one is included too, so ties at the
/// top or at second place can make the list longer than two. Entries tied with
/// the best distance get rank 1 and a gold medal, the rest rank 2 and silver.
pub fn rank_top_trends(candidates: &[TrendCandidate]) -> Vec<RankedEntry> {
    let mut sorted: Vec<&TrendCandidate> = candidates.iter().collect();
    sorted.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let Some(best) = sorted.first() else {
        return Vec::new();
    };
    let best_distance = best.distance;

    let mut selected = vec![*best];
    if let Some(second) = sorted.get(1) {
        let cutoff = second.distance + TIE_EPSILON;
        selected.extend(
            sorted[1..]
                .iter()
                .take_while(|candidate| candidate.distance <= cutoff),
        );
    }

    selected
        .into_iter()
        .map(|candidate| {
            let (rank, medal) = if (candidate.distance - best_distance).abs() < TIE_EPSILON {
                (1, Medal::Gold)
            } else {
                (2, Medal::Silver)
            };
            RankedEntry {
                place: candidate.place.clone(),
                distance: candidate.distance,
                rank,
                medal,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::rank_top_trends;
    use crate::trend::types::{Medal, TrendCandidate};

    fn candidates(distances: &[f64]) -> Vec<TrendCandidate> {
        distances
            .iter()
            .enumerate()
            .map(|(i, d)| TrendCandidate {
                place: format!("p{i}"),
                distance: *d,
            })
            .collect()
    }

    #[test]
    fn empty_input_ranks_nothing() {
        assert!(rank_top_trends(&[]).is_empty());
    }

    #[test]
    fn single_entry_is_rank_one() {
        let ranked = rank_top_trends(&candidates(&[4.0]));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].medal, Medal::Gold);
    }

    #[test]
    fn tie_at_the_top_returns_whole_block() {
        let ranked = rank_top_trends(&candidates(&[2.0, 2.0, 2.0, 5.0]));
        let places: Vec<&str> = ranked.iter().map(|e| e.place.as_str()).collect();
        assert_eq!(places, ["p0", "p1", "p2"]);
        assert!(ranked.iter().all(|e| e.medal == Medal::Gold));
    }

    #[test]
    fn tie_at_second_place_is_kept() {
        let ranked = rank_top_trends(&candidates(&[9.0, 3.0, 1.0, 3.0]));
        let summary: Vec<(&str, u8)> = ranked.iter().map(|e| (e.place.as_str(), e.rank)).collect();
        assert_eq!(summary, [("p2", 1), ("p1", 2), ("p3", 2)]);
        assert_eq!(ranked[1].medal, Medal::Silver);
    }

    #[test]
    fn plain_top_two() {
        let ranked = rank_top_trends(&candidates(&[7.0, 2.5, 4.0, 3.0]));
        let places: Vec<&str> = ranked.iter().map(|e| e.place.as_str()).collect();
        assert_eq!(places, ["p1", "p3"]);
    }

    #[test]
    fn float_noise_counts_as_a_tie() {
        let ranked = rank_top_trends(&candidates(&[1.0, 3.0, 3.0 + 1e-12, 3.1]));
        assert_eq!(ranked.len(), 3);
    }
}
