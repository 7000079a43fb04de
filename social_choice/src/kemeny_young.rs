// ********* Kemeny-Young **********

use itertools::Itertools;
use log::{debug, info};
use snafu::ensure;

use crate::config::*;
use crate::electorate::Contest;
use crate::matchups::{tabulate_matchups, VictoryTable};
use crate::tally::round_to;
use crate::tiebreak::{top_choices, Selection};
use crate::Context;

/// Fails if there are too many options to enumerate their orderings.
pub(crate) fn check_tractable(num_options: usize, limit: usize) -> Result<(), DecideError> {
    ensure!(
        num_options <= limit,
        IntractableInputSnafu {
            candidates: num_options,
            limit
        }
    );
    Ok(())
}

/// A matchup as option indices, with the weight credited to each side.
struct Credit {
    first: usize,
    second: usize,
    first_weight: f64,
    second_weight: f64,
}

fn credits(table: &VictoryTable) -> Vec<Credit> {
    let index_of = |name: &str| table.options().iter().position(|o| o == name);
    table
        .matchups()
        .iter()
        .filter_map(|m| {
            Some(Credit {
                first: index_of(&m.first)?,
                second: index_of(&m.second)?,
                first_weight: m.support(&m.first),
                second_weight: m.support(&m.second),
            })
        })
        .collect()
}

/// The weight agreeing with the ordering, summed over all the matchups.
///
/// `position[i]` is the rank of option `i`. A candidate without any support
/// in a matchup always counts as ranked second in it, so the supported side
/// is credited whatever the ordering says.
fn ranking_score(position: &[usize], credits: &[Credit]) -> f64 {
    credits
        .iter()
        .map(|c| {
            if c.first_weight == 0.0 {
                c.second_weight
            } else if c.second_weight == 0.0 {
                c.first_weight
            } else if position[c.first] < position[c.second] {
                c.first_weight
            } else {
                c.second_weight
            }
        })
        .sum()
}

/// The score of every ordering of the options, in lexicographic order of
/// the canonical option indices.
pub fn ranking_scores(table: &VictoryTable, precision: u32) -> Vec<(Vec<String>, f64)> {
    let n = table.options().len();
    let credits = credits(table);
    let mut position = vec![0usize; n];
    (0..n)
        .permutations(n)
        .map(|order| {
            for (rank, &idx) in order.iter().enumerate() {
                position[idx] = rank;
            }
            let score = round_to(ranking_score(&position, &credits), precision);
            let names: Vec<String> = order
                .iter()
                .map(|&idx| table.options()[idx].clone())
                .collect();
            (names, score)
        })
        .collect()
}

pub(crate) fn kemeny_young(
    contest: &Contest<'_>,
    ctx: &mut Context<'_>,
) -> Result<Outcome, DecideError> {
    check_tractable(contest.options().len(), ctx.rules.max_kemeny_candidates)?;
    let table = tabulate_matchups(contest, ctx)?;
    let scores = ranking_scores(&table, ctx.rules.precision);
    debug!("kemeny_young: scored {} rankings", scores.len());
    let decision = match top_choices(
        &scores,
        1,
        ctx.rules.tie_policy.without_random(),
        &mut *ctx.rng,
    )? {
        Selection::Chosen(mut best) if best.len() == 1 => Decision::Ranking(best.remove(0)),
        Selection::Chosen(best) | Selection::Tie(best) => {
            info!("kemeny_young: {} rankings share the best score", best.len());
            Decision::TiedRankings(best)
        }
    };
    Ok(Outcome {
        method: VotingMethod::KemenyYoung,
        decision,
        audit: Audit::RankingScores(scores),
        rounds: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_too_many_options() {
        assert!(check_tractable(8, 8).is_ok());
        assert!(matches!(
            check_tractable(9, 8),
            Err(DecideError::IntractableInput {
                candidates: 9,
                limit: 8
            })
        ));
    }

    #[test]
    fn unsupported_side_never_earns_credit() {
        let credits = vec![Credit {
            first: 0,
            second: 1,
            first_weight: 0.0,
            second_weight: 0.4,
        }];
        assert_eq!(ranking_score(&[0, 1], &credits), 0.4);
        assert_eq!(ranking_score(&[1, 0], &credits), 0.4);
        let contested = vec![Credit {
            first: 0,
            second: 1,
            first_weight: 0.3,
            second_weight: 0.4,
        }];
        assert_eq!(ranking_score(&[0, 1], &contested), 0.3);
        assert_eq!(ranking_score(&[1, 0], &contested), 0.4);
    }
}
