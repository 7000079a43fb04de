// ********* First-choice methods **********
//
// Plurality, the two-round runoff and the exhaustive ballot only look at the
// first choice of every ballot. The multi-round methods shrink the contest
// between rounds.

use log::debug;

use crate::ballots::{first_choices, validate_ballots};
use crate::config::*;
use crate::electorate::Contest;
use crate::tally::{summarize_results, Summary};
use crate::tiebreak::{bottom_choices, top_choices, Selection};
use crate::Context;

/// Where a runoff stands after counting a round.
#[derive(Eq, PartialEq, Debug, Clone)]
enum RunoffState {
    /// An option holds more than half of the weight.
    MajorityFound(String),
    /// At most two options remain: the plurality of this round is final.
    FinalRound,
    /// Options must be eliminated before the next round.
    RunoffRound,
}

fn assess_round(summary: &Summary, remaining: usize) -> RunoffState {
    if let Some(leader) = majority_winner(summary) {
        RunoffState::MajorityFound(leader)
    } else if remaining <= 2 {
        RunoffState::FinalRound
    } else {
        RunoffState::RunoffRound
    }
}

/// The option holding strictly more than half of the summary total, if any.
pub fn majority_winner(summary: &Summary) -> Option<String> {
    summary
        .candidates()
        .into_iter()
        .find(|(name, _)| summary.has_majority(name))
        .map(|(name, _)| name)
}

/// Counts the first choices of the contest.
pub(crate) fn summarize_contest(contest: &Contest<'_>, ctx: &Context<'_>) -> Summary {
    let validated = validate_ballots(contest);
    let firsts = first_choices(&validated, contest.options(), ctx.rules.unranked_policy);
    summarize_results(&firsts, contest.options(), ctx.rules.precision)
}

/// Picks the leader of a summary. The unranked weight never wins.
pub(crate) fn plurality_pick(
    summary: &Summary,
    policy: TiePolicy,
    ctx: &mut Context<'_>,
) -> Result<Selection<String>, DecideError> {
    top_choices(&summary.candidates(), 1, policy, &mut *ctx.rng)
}

fn selection_decision(selection: Selection<String>) -> Decision {
    match selection {
        Selection::Chosen(mut winners) if winners.len() == 1 => Decision::Winner(winners.remove(0)),
        Selection::Chosen(contenders) | Selection::Tie(contenders) => Decision::Tie(contenders),
    }
}

fn report_round(
    ctx: &Context<'_>,
    rounds: &mut Vec<RoundStats>,
    summary: &Summary,
    eliminated: Vec<String>,
    finalists: Vec<String>,
) {
    let stats = RoundStats {
        round: rounds.len() as u32 + 1,
        summary: summary.clone(),
        eliminated,
        finalists,
    };
    ctx.observer.round_completed(&stats);
    rounds.push(stats);
}

pub(crate) fn plurality(
    contest: &Contest<'_>,
    ctx: &mut Context<'_>,
) -> Result<Outcome, DecideError> {
    let summary = summarize_contest(contest, ctx);
    let selection = plurality_pick(&summary, ctx.rules.tie_policy, ctx)?;
    Ok(Outcome {
        method: VotingMethod::Plurality,
        decision: selection_decision(selection),
        audit: Audit::Summary(summary),
        rounds: Vec::new(),
    })
}

pub(crate) fn two_round(
    contest: &Contest<'_>,
    ctx: &mut Context<'_>,
) -> Result<Outcome, DecideError> {
    let policy = ctx.rules.tie_policy;
    let mut rounds: Vec<RoundStats> = Vec::new();
    let summary = summarize_contest(contest, ctx);

    let finalists = match assess_round(&summary, contest.options().len()) {
        RunoffState::MajorityFound(winner) => {
            report_round(ctx, &mut rounds, &summary, vec![], vec![]);
            return Ok(Outcome {
                method: VotingMethod::TwoRound,
                decision: Decision::Winner(winner),
                audit: Audit::Summary(summary),
                rounds,
            });
        }
        RunoffState::FinalRound => {
            report_round(ctx, &mut rounds, &summary, vec![], vec![]);
            let selection = plurality_pick(&summary, policy, ctx)?;
            return Ok(Outcome {
                method: VotingMethod::TwoRound,
                decision: selection_decision(selection),
                audit: Audit::Summary(summary),
                rounds,
            });
        }
        RunoffState::RunoffRound => {
            match top_choices(&summary.candidates(), 2, policy, &mut *ctx.rng)? {
                Selection::Chosen(finalists) => finalists,
                Selection::Tie(contenders) => {
                    debug!("two_round: no clear finalists among {:?}", contenders);
                    report_round(ctx, &mut rounds, &summary, vec![], vec![]);
                    return Ok(Outcome {
                        method: VotingMethod::TwoRound,
                        decision: Decision::Tie(contenders),
                        audit: Audit::Summary(summary),
                        rounds,
                    });
                }
            }
        }
    };
    report_round(ctx, &mut rounds, &summary, vec![], finalists.clone());

    let runoff = contest.restricted_to(&finalists);
    let final_summary = summarize_contest(&runoff, ctx);
    report_round(ctx, &mut rounds, &final_summary, vec![], vec![]);
    let selection = plurality_pick(&final_summary, policy, ctx)?;
    Ok(Outcome {
        method: VotingMethod::TwoRound,
        decision: selection_decision(selection),
        audit: Audit::Summary(final_summary),
        rounds,
    })
}

pub(crate) fn exhaustive_ballot(
    contest: &Contest<'_>,
    ctx: &mut Context<'_>,
) -> Result<Outcome, DecideError> {
    let policy = ctx.rules.tie_policy;
    let mut rounds: Vec<RoundStats> = Vec::new();
    let mut current = contest.clone();

    // Every round either decides or removes one option, so there are at most
    // as many rounds as options.
    for _ in 0..contest.options().len() {
        let summary = summarize_contest(&current, ctx);
        let decision = match assess_round(&summary, current.options().len()) {
            RunoffState::MajorityFound(winner) => Decision::Winner(winner),
            RunoffState::FinalRound => selection_decision(plurality_pick(&summary, policy, ctx)?),
            RunoffState::RunoffRound => {
                // Ties for last place are broken at random whatever the policy.
                let losers = match bottom_choices(
                    &summary.candidates(),
                    1,
                    TiePolicy::BreakRandomly,
                    &mut *ctx.rng,
                )? {
                    Selection::Chosen(losers) | Selection::Tie(losers) => losers,
                };
                debug!("exhaustive_ballot: eliminating {:?}", losers);
                report_round(ctx, &mut rounds, &summary, losers.clone(), vec![]);
                for loser in losers.iter() {
                    current = current.without(loser);
                }
                continue;
            }
        };
        report_round(ctx, &mut rounds, &summary, vec![], vec![]);
        return Ok(Outcome {
            method: VotingMethod::ExhaustiveBallot,
            decision,
            audit: Audit::Summary(summary),
            rounds,
        });
    }
    // Only reached if the contest had no option at all.
    let summary = summarize_contest(&current, ctx);
    Ok(Outcome {
        method: VotingMethod::ExhaustiveBallot,
        decision: Decision::NoWinner,
        audit: Audit::Summary(summary),
        rounds,
    })
}
