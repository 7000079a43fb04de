use proptest::prelude::*;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use social_choice::builder::Builder;
use social_choice::tiebreak::{bottom_choices, top_choices, Selection};
use social_choice::*;

const OPTIONS: [&str; 5] = ["A", "B", "C", "D", "E"];

fn entries_of(values: &[u8]) -> Vec<(String, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (format!("c{}", i), *v as f64))
        .collect()
}

fn tally_with_count() -> impl Strategy<Value = (Vec<u8>, usize)> {
    prop::collection::vec(0u8..5, 1..9).prop_flat_map(|values| {
        let n = values.len();
        (Just(values), 1..=n)
    })
}

/// Complete ballots over the first `n` options, with vote counts.
fn full_ballots() -> impl Strategy<Value = (usize, Vec<(Vec<String>, u32)>)> {
    (2usize..=5).prop_flat_map(|n| {
        let options: Vec<String> = OPTIONS[..n].iter().map(|s| s.to_string()).collect();
        (
            Just(n),
            prop::collection::vec((Just(options).prop_shuffle(), 1u32..20), 1..12),
        )
    })
}

fn electorate_of(n: usize, ballots: &[(Vec<String>, u32)]) -> Electorate {
    let mut builder = Builder::new("letters", &OPTIONS[..n]).unwrap();
    for (idx, (ballot, count)) in ballots.iter().enumerate() {
        builder
            .add_voter(&format!("v{}", idx), &ballot[..], *count as f64)
            .unwrap();
    }
    builder.build().unwrap()
}

fn decider(unranked_policy: UnrankedPolicy) -> Decider {
    Decider::new(DeciderRules {
        tie_policy: TiePolicy::ReturnIfTie,
        unranked_policy,
        ..DeciderRules::DEFAULT_RULES
    })
}

proptest! {
    #[test]
    fn selections_have_the_requested_size((values, k) in tally_with_count()) {
        let entries = entries_of(&values);
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for selection in [
            top_choices(&entries, k, TiePolicy::ReturnIfTie, &mut rng).unwrap(),
            bottom_choices(&entries, k, TiePolicy::ReturnIfTie, &mut rng).unwrap(),
        ] {
            match selection {
                Selection::Chosen(keys) => prop_assert_eq!(keys.len(), k),
                Selection::Tie(keys) => prop_assert!(keys.len() > k),
            }
        }
        let broken = top_choices(&entries, k, TiePolicy::BreakRandomly, &mut rng).unwrap();
        prop_assert!(matches!(broken, Selection::Chosen(keys) if keys.len() == k));
    }

    #[test]
    fn top_choices_are_extremal((values, k) in tally_with_count()) {
        let entries = entries_of(&values);
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let keys = match top_choices(&entries, k, TiePolicy::BreakRandomly, &mut rng).unwrap() {
            Selection::Chosen(keys) | Selection::Tie(keys) => keys,
        };
        let (kept, dropped): (Vec<&(String, f64)>, Vec<&(String, f64)>) =
            entries.iter().partition(|(name, _)| keys.contains(name));
        for (_, low) in dropped.iter() {
            for (_, high) in kept.iter() {
                prop_assert!(high >= low);
            }
        }
    }

    #[test]
    fn top_and_bottom_are_disjoint(values in prop::collection::hash_set(0u8..50, 2..10)) {
        let values: Vec<u8> = values.into_iter().collect();
        let entries = entries_of(&values);
        let k = values.len() / 2;
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let top = top_choices(&entries, k, TiePolicy::RaiseError, &mut rng).unwrap();
        let bottom = bottom_choices(&entries, k, TiePolicy::RaiseError, &mut rng).unwrap();
        match (top, bottom) {
            (Selection::Chosen(top), Selection::Chosen(bottom)) => {
                prop_assert!(top.iter().all(|t| !bottom.contains(t)));
            }
            other => prop_assert!(false, "distinct values cannot tie: {:?}", other),
        }
    }

    #[test]
    fn condorcet_winner_is_kept_by_every_pairwise_method((n, ballots) in full_ballots()) {
        let electorate = electorate_of(n, &ballots);
        let mut decider = decider(UnrankedPolicy::ZeroWeight);
        let condorcet = decider.decide_with(&electorate, VotingMethod::Condorcet).unwrap();
        if let Decision::Winner(winner) = &condorcet.decision {
            let table = condorcet.victory_table().unwrap();
            for rival in OPTIONS[..n].iter().filter(|o| **o != winner.as_str()) {
                let m = table.matchup(winner, rival).unwrap();
                prop_assert!(m.support(winner) > m.support(rival));
                prop_assert!(m.support(winner) > m.summary.total() / 2.0);
            }
            for method in [VotingMethod::Copeland, VotingMethod::Minimax, VotingMethod::RankedPairs] {
                let outcome = decider.decide_with(&electorate, method).unwrap();
                prop_assert_eq!(outcome.winner(), Some(winner.as_str()));
            }
        }
    }

    #[test]
    fn unranked_policies_agree_on_complete_ballots((n, ballots) in full_ballots()) {
        let electorate = electorate_of(n, &ballots);
        let reference = decider(UnrankedPolicy::ZeroWeight)
            .decide_with(&electorate, VotingMethod::Condorcet)
            .unwrap();
        for policy in [
            UnrankedPolicy::SpoiledBallot,
            UnrankedPolicy::RankedLast,
            UnrankedPolicy::RaiseError,
        ] {
            let outcome = decider(policy)
                .decide_with(&electorate, VotingMethod::Condorcet)
                .unwrap();
            prop_assert_eq!(&outcome, &reference);
        }
    }
}
