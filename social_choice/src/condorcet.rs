// ********* Condorcet methods **********
//
// All of these start from the victory table. Copeland, minimax and ranked
// pairs only differ when there is no Condorcet winner.

use log::debug;

use crate::config::*;
use crate::electorate::Contest;
use crate::matchups::{tabulate_matchups, VictoryTable};
use crate::tiebreak::{bottom_choices, top_choices, Selection};
use crate::Context;

fn selection_decision(selection: Selection<String>) -> Decision {
    match selection {
        Selection::Chosen(mut winners) if winners.len() == 1 => Decision::Winner(winners.remove(0)),
        Selection::Chosen(contenders) | Selection::Tie(contenders) => Decision::Tie(contenders),
    }
}

fn pairwise_outcome(
    method: VotingMethod,
    decision: Decision,
    table: VictoryTable,
    scores: Vec<(String, f64)>,
) -> Outcome {
    Outcome {
        method,
        decision,
        audit: Audit::Pairwise { table, scores },
        rounds: Vec::new(),
    }
}

pub(crate) fn condorcet(
    contest: &Contest<'_>,
    ctx: &mut Context<'_>,
) -> Result<Outcome, DecideError> {
    let table = tabulate_matchups(contest, ctx)?;
    let decision = match table.condorcet_winner() {
        Some(w) => Decision::Winner(w.to_string()),
        None => Decision::NoWinner,
    };
    Ok(pairwise_outcome(
        VotingMethod::Condorcet,
        decision,
        table,
        Vec::new(),
    ))
}

/// The number of matchups won by every candidate.
pub fn copeland_scores(table: &VictoryTable) -> Vec<(String, f64)> {
    table
        .options()
        .iter()
        .map(|c| (c.clone(), table.wins(c) as f64))
        .collect()
}

pub(crate) fn copeland(
    contest: &Contest<'_>,
    ctx: &mut Context<'_>,
) -> Result<Outcome, DecideError> {
    let table = tabulate_matchups(contest, ctx)?;
    let scores = copeland_scores(&table);
    let decision = match table.condorcet_winner() {
        Some(w) => Decision::Winner(w.to_string()),
        None => selection_decision(top_choices(
            &scores,
            1,
            ctx.rules.tie_policy.without_random(),
            &mut *ctx.rng,
        )?),
    };
    Ok(pairwise_outcome(
        VotingMethod::Copeland,
        decision,
        table,
        scores,
    ))
}

/// The greatest weight that beat or opposed every candidate in a matchup.
pub fn minimax_scores(table: &VictoryTable) -> Vec<(String, f64)> {
    table
        .options()
        .iter()
        .map(|c| {
            let worst = table
                .matchups_of(c)
                .map(|m| m.opposition(c))
                .fold(0.0, f64::max);
            (c.clone(), worst)
        })
        .collect()
}

pub(crate) fn minimax(
    contest: &Contest<'_>,
    ctx: &mut Context<'_>,
) -> Result<Outcome, DecideError> {
    let table = tabulate_matchups(contest, ctx)?;
    let scores = minimax_scores(&table);
    let decision = match table.condorcet_winner() {
        Some(w) => Decision::Winner(w.to_string()),
        None => selection_decision(bottom_choices(
            &scores,
            1,
            ctx.rules.tie_policy,
            &mut *ctx.rng,
        )?),
    };
    Ok(pairwise_outcome(VotingMethod::Minimax, decision, table, scores))
}

/// A majority defeat of `loser` by `winner`, as indices into the options.
#[derive(PartialEq, Debug, Clone, Copy)]
struct Defeat {
    winner: usize,
    loser: usize,
    margin: f64,
}

/// The majority defeats of the table, strongest first.
///
/// A defeat needs strictly more than half of the matchup's weight. Defeats
/// are ordered by margin of victory, then by the order of the matchups in the
/// table.
fn sorted_defeats(table: &VictoryTable) -> Vec<Defeat> {
    let index_of = |name: &str| table.options().iter().position(|o| o == name);
    let mut defeats: Vec<Defeat> = Vec::new();
    for m in table.matchups() {
        let total = m.summary.total();
        for (w, l) in [(&m.first, &m.second), (&m.second, &m.first)] {
            if m.support(w) > total / 2.0 {
                if let (Some(winner), Some(loser)) = (index_of(w), index_of(l)) {
                    defeats.push(Defeat {
                        winner,
                        loser,
                        margin: m.margin(),
                    });
                }
            }
        }
    }
    // Stable sort: equal defeats keep the table order.
    defeats.sort_by(|a, b| b.margin.total_cmp(&a.margin));
    defeats
}

/// Locks the defeats in order, skipping the ones that would close a cycle.
///
/// `reach[i][j]` is the transitive closure of the locked graph, kept up to
/// date after every lock.
fn lock_defeats(defeats: &[Defeat], num_options: usize) -> Vec<Defeat> {
    let mut reach = vec![vec![false; num_options]; num_options];
    let mut locked: Vec<Defeat> = Vec::new();
    for d in defeats.iter() {
        if reach[d.loser][d.winner] {
            debug!("lock_defeats: skipping {:?}", d);
            continue;
        }
        for i in 0..num_options {
            if i != d.winner && !reach[i][d.winner] {
                continue;
            }
            for j in 0..num_options {
                if j == d.loser || reach[d.loser][j] {
                    reach[i][j] = true;
                }
            }
        }
        locked.push(*d);
    }
    locked
}

/// The number of locked defeats suffered by every candidate.
pub fn ranked_pairs_scores(table: &VictoryTable) -> Vec<(String, f64)> {
    let n = table.options().len();
    let locked = lock_defeats(&sorted_defeats(table), n);
    let mut defeats = vec![0usize; n];
    for d in locked.iter() {
        defeats[d.loser] += 1;
    }
    table
        .options()
        .iter()
        .cloned()
        .zip(defeats.into_iter().map(|c| c as f64))
        .collect()
}

pub(crate) fn ranked_pairs(
    contest: &Contest<'_>,
    ctx: &mut Context<'_>,
) -> Result<Outcome, DecideError> {
    let table = tabulate_matchups(contest, ctx)?;
    let scores = ranked_pairs_scores(&table);
    let decision = match table.condorcet_winner() {
        Some(w) => Decision::Winner(w.to_string()),
        None => selection_decision(bottom_choices(
            &scores,
            1,
            ctx.rules.tie_policy,
            &mut *ctx.rng,
        )?),
    };
    Ok(pairwise_outcome(
        VotingMethod::RankedPairs,
        decision,
        table,
        scores,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defeat(winner: usize, loser: usize, margin: f64) -> Defeat {
        Defeat {
            winner,
            loser,
            margin,
        }
    }

    #[test]
    fn skips_defeats_closing_a_cycle() {
        // 0 > 1 > 2 > 0: the weakest defeat is dropped.
        let defeats = vec![defeat(0, 1, 0.7), defeat(1, 2, 0.6), defeat(2, 0, 0.55)];
        let locked = lock_defeats(&defeats, 3);
        assert_eq!(locked, defeats[..2].to_vec());
    }

    #[test]
    fn closure_spans_chains() {
        // 0 > 1, 2 > 3, 1 > 2 then 3 > 0 would close a four-cycle.
        let defeats = vec![
            defeat(0, 1, 0.9),
            defeat(2, 3, 0.8),
            defeat(1, 2, 0.7),
            defeat(3, 0, 0.6),
        ];
        let locked = lock_defeats(&defeats, 4);
        assert_eq!(locked.len(), 3);
        assert!(!locked.contains(&defeats[3]));
    }
}
