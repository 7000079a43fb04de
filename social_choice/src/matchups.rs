// ********* Pairwise matchups **********

use itertools::Itertools;
use log::debug;

use crate::config::*;
use crate::electorate::Contest;
use crate::runoff::{plurality_pick, summarize_contest};
use crate::tally::Summary;
use crate::tiebreak::Selection;
use crate::Context;

/// The two-candidate plurality between `first` and `second`.
#[derive(PartialEq, Debug, Clone)]
pub struct Matchup {
    pub first: String,
    pub second: String,
    /// Includes the weight of the voters who ranked neither candidate.
    pub summary: Summary,
    /// `None` when the pair is drawn.
    pub winner: Option<String>,
}

impl Matchup {
    pub fn involves(&self, candidate: &str) -> bool {
        self.first == candidate || self.second == candidate
    }

    pub fn opponent(&self, candidate: &str) -> Option<&str> {
        if self.first == candidate {
            Some(&self.second)
        } else if self.second == candidate {
            Some(&self.first)
        } else {
            None
        }
    }

    pub fn support(&self, candidate: &str) -> f64 {
        self.summary.weight(candidate)
    }

    /// The weight of the opponent of `candidate` in this matchup.
    pub fn opposition(&self, candidate: &str) -> f64 {
        self.opponent(candidate)
            .map(|o| self.summary.weight(o))
            .unwrap_or(0.0)
    }

    pub fn margin(&self) -> f64 {
        (self.support(&self.first) - self.support(&self.second)).abs()
    }

    pub fn is_won_by(&self, candidate: &str) -> bool {
        self.winner.as_deref() == Some(candidate)
    }
}

/// Every matchup between the options of a contest, also known as the
/// Condorcet matrix.
#[derive(PartialEq, Debug, Clone)]
pub struct VictoryTable {
    options: Vec<String>,
    matchups: Vec<Matchup>,
}

impl VictoryTable {
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// In the order of [`candidate_pairs`].
    pub fn matchups(&self) -> &[Matchup] {
        &self.matchups
    }

    /// The matchup between two candidates, whatever their order.
    pub fn matchup(&self, a: &str, b: &str) -> Option<&Matchup> {
        self.matchups
            .iter()
            .find(|m| m.involves(a) && m.opponent(a) == Some(b))
    }

    pub fn matchups_of<'t>(&'t self, candidate: &'t str) -> impl Iterator<Item = &'t Matchup> {
        self.matchups.iter().filter(move |m| m.involves(candidate))
    }

    pub fn wins(&self, candidate: &str) -> usize {
        self.matchups_of(candidate)
            .filter(|m| m.is_won_by(candidate))
            .count()
    }

    /// The candidate that wins every matchup it is part of.
    pub fn condorcet_winner(&self) -> Option<&str> {
        let rivals = self.options.len().saturating_sub(1);
        self.options
            .iter()
            .find(|c| self.wins(c) == rivals)
            .map(|c| c.as_str())
    }
}

/// Every unordered pair of options, in canonical order.
pub fn candidate_pairs(options: &[String]) -> Vec<(String, String)> {
    options
        .iter()
        .cloned()
        .tuple_combinations::<(String, String)>()
        .collect()
}

/// Runs a two-candidate plurality for every pair of options of the contest.
///
/// A drawn pair is recorded without a winner: the random tie breaking is
/// never applied to a pair. A draw still fails under the raise-error policy.
pub(crate) fn tabulate_matchups(
    contest: &Contest<'_>,
    ctx: &mut Context<'_>,
) -> Result<VictoryTable, DecideError> {
    let policy = ctx.rules.tie_policy.without_random();
    let mut matchups: Vec<Matchup> = Vec::new();
    for (first, second) in candidate_pairs(contest.options()) {
        let pair = contest.restricted_to(&[&first, &second]);
        let summary = summarize_contest(&pair, ctx);
        let winner = match plurality_pick(&summary, policy, ctx)? {
            Selection::Chosen(mut w) if w.len() == 1 => Some(w.remove(0)),
            _ => None,
        };
        let matchup = Matchup {
            first,
            second,
            summary,
            winner,
        };
        ctx.observer.matchup_decided(&matchup);
        matchups.push(matchup);
    }
    debug!(
        "tabulate_matchups: {} matchups over {:?}",
        matchups.len(),
        contest.options()
    );
    Ok(VictoryTable {
        options: contest.options().to_vec(),
        matchups,
    })
}
