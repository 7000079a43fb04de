use log::debug;
use rand_core::RngCore;
use snafu::ensure;

use crate::ballots::Choice;
use crate::config::*;

/// The result of picking the top or bottom entries of a tally.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Selection<K> {
    /// Exactly the requested number of keys.
    Chosen(Vec<K>),
    /// More keys than requested because of a tie at the boundary.
    Tie(Vec<K>),
}

/// Anything that can be ranked by a tally and named in a tie report.
pub trait TieKey: Clone {
    fn label(&self) -> String;
}

impl TieKey for String {
    fn label(&self) -> String {
        self.clone()
    }
}

impl TieKey for &str {
    fn label(&self) -> String {
        self.to_string()
    }
}

impl TieKey for Choice {
    fn label(&self) -> String {
        self.to_string()
    }
}

impl TieKey for Vec<String> {
    fn label(&self) -> String {
        self.join(" > ")
    }
}

/// Returns the `number` entries with the highest values.
///
/// Keys are returned in the order of `entries`. When several entries share
/// the boundary value, the tie is handled according to `policy`; entries
/// strictly above the boundary are always kept.
pub fn top_choices<K: TieKey>(
    entries: &[(K, f64)],
    number: usize,
    policy: TiePolicy,
    rng: &mut dyn RngCore,
) -> Result<Selection<K>, DecideError> {
    extreme_choices(entries, number, policy, rng, true)
}

/// Returns the `number` entries with the lowest values. See [`top_choices`].
pub fn bottom_choices<K: TieKey>(
    entries: &[(K, f64)],
    number: usize,
    policy: TiePolicy,
    rng: &mut dyn RngCore,
) -> Result<Selection<K>, DecideError> {
    extreme_choices(entries, number, policy, rng, false)
}

fn extreme_choices<K: TieKey>(
    entries: &[(K, f64)],
    number: usize,
    policy: TiePolicy,
    rng: &mut dyn RngCore,
    highest: bool,
) -> Result<Selection<K>, DecideError> {
    let available = entries.len();
    ensure!(
        number >= 1 && number <= available,
        InvalidRequestSnafu {
            requested: number,
            available
        }
    );

    let mut ordered: Vec<f64> = entries.iter().map(|(_, v)| *v).collect();
    if highest {
        ordered.sort_by(|a, b| b.total_cmp(a));
    } else {
        ordered.sort_by(|a, b| a.total_cmp(b));
    }
    let boundary = ordered[number - 1];
    let passes = |v: f64| {
        if highest {
            v >= boundary
        } else {
            v <= boundary
        }
    };

    let mut selected: Vec<usize> = (0..available).filter(|&i| passes(entries[i].1)).collect();
    if selected.len() == number {
        return Ok(Selection::Chosen(keys_at(entries, &selected)));
    }

    let tied: Vec<usize> = selected
        .iter()
        .copied()
        .filter(|&i| entries[i].1 == boundary)
        .collect();
    match policy {
        TiePolicy::BreakRandomly => {
            let excess = selected.len() - number;
            let mut candidates = tied;
            let mut trashbin: Vec<usize> = Vec::new();
            for _ in 0..excess {
                let idx = pick_index(rng, candidates.len());
                trashbin.push(candidates.remove(idx));
            }
            debug!(
                "extreme_choices: to break a tie, removed {:?}",
                trashbin
                    .iter()
                    .map(|&i| entries[i].0.label())
                    .collect::<Vec<String>>()
            );
            selected.retain(|i| !trashbin.contains(i));
            Ok(Selection::Chosen(keys_at(entries, &selected)))
        }
        TiePolicy::RaiseError => TieSnafu {
            stage: format!(
                "selecting the {} {}",
                if highest { "top" } else { "bottom" },
                number
            ),
            contenders: tied
                .iter()
                .map(|&i| entries[i].0.label())
                .collect::<Vec<String>>(),
        }
        .fail(),
        TiePolicy::ReturnIfTie => Ok(Selection::Tie(keys_at(entries, &selected))),
    }
}

fn keys_at<K: TieKey>(entries: &[(K, f64)], indices: &[usize]) -> Vec<K> {
    indices.iter().map(|&i| entries[i].0.clone()).collect()
}

/// Uniform index in [0, n), without modulo bias. `n` must be positive.
fn pick_index(rng: &mut dyn RngCore, n: usize) -> usize {
    let n = n as u64;
    let threshold = n.wrapping_neg() % n;
    loop {
        let x = rng.next_u64();
        if x >= threshold {
            return (x % n) as usize;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(7)
    }

    fn known_knowns() -> Vec<(&'static str, f64)> {
        vec![("Write Zen koans", 0.51), ("Invade Iraq", 0.49)]
    }

    fn known_unknowns() -> Vec<(&'static str, f64)> {
        vec![("Ignore advice", 0.5), ("Disregard advice", 0.5)]
    }

    #[test]
    fn top_and_bottom_without_tie() {
        let mut r = rng();
        let top = top_choices(&known_knowns(), 1, TiePolicy::BreakRandomly, &mut r).unwrap();
        assert_eq!(top, Selection::Chosen(vec!["Write Zen koans"]));
        let bottom = bottom_choices(&known_knowns(), 1, TiePolicy::BreakRandomly, &mut r).unwrap();
        assert_eq!(bottom, Selection::Chosen(vec!["Invade Iraq"]));
        let both = bottom_choices(&known_knowns(), 2, TiePolicy::BreakRandomly, &mut r).unwrap();
        assert_eq!(
            both,
            Selection::Chosen(vec!["Write Zen koans", "Invade Iraq"])
        );
    }

    #[test]
    fn reports_ties() {
        let mut r = rng();
        let top = top_choices(&known_unknowns(), 1, TiePolicy::ReturnIfTie, &mut r).unwrap();
        assert_eq!(
            top,
            Selection::Tie(vec!["Ignore advice", "Disregard advice"])
        );
        let bottom = bottom_choices(&known_unknowns(), 1, TiePolicy::ReturnIfTie, &mut r).unwrap();
        assert!(matches!(bottom, Selection::Tie(_)));
        let err = top_choices(&known_unknowns(), 1, TiePolicy::RaiseError, &mut r);
        assert!(matches!(err, Err(DecideError::Tie { contenders, .. }) if contenders.len() == 2));
    }

    #[test]
    fn tied_pair_fits_in_two() {
        let mut r = rng();
        let top = top_choices(&known_unknowns(), 2, TiePolicy::ReturnIfTie, &mut r).unwrap();
        assert_eq!(
            top,
            Selection::Chosen(vec!["Ignore advice", "Disregard advice"])
        );
    }

    #[test]
    fn random_break_only_drops_boundary_members() {
        let entries = vec![("a", 0.6), ("b", 0.6), ("c", 0.3), ("d", 0.3), ("e", 0.1)];
        for seed in 0..20 {
            let mut r = ChaCha20Rng::seed_from_u64(seed);
            match top_choices(&entries, 3, TiePolicy::BreakRandomly, &mut r).unwrap() {
                Selection::Chosen(keys) => {
                    assert_eq!(keys.len(), 3);
                    assert!(keys.contains(&"a"));
                    assert!(keys.contains(&"b"));
                }
                Selection::Tie(_) => panic!("random policy never reports a tie"),
            }
        }
    }

    #[test]
    fn rejects_out_of_range_requests() {
        let mut r = rng();
        assert!(matches!(
            top_choices(&known_knowns(), 0, TiePolicy::BreakRandomly, &mut r),
            Err(DecideError::InvalidRequest { .. })
        ));
        assert!(matches!(
            bottom_choices(&known_knowns(), 3, TiePolicy::BreakRandomly, &mut r),
            Err(DecideError::InvalidRequest {
                requested: 3,
                available: 2
            })
        ));
    }

    #[test]
    fn seeded_breaks_are_reproducible() {
        let entries = vec![("a", 1.0), ("b", 1.0), ("c", 1.0), ("d", 1.0)];
        let first = top_choices(
            &entries,
            2,
            TiePolicy::BreakRandomly,
            &mut ChaCha20Rng::seed_from_u64(42),
        )
        .unwrap();
        let second = top_choices(
            &entries,
            2,
            TiePolicy::BreakRandomly,
            &mut ChaCha20Rng::seed_from_u64(42),
        )
        .unwrap();
        assert_eq!(first, second);
    }
}
