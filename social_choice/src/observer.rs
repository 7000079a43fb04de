use log::{debug, info};

use crate::config::*;
use crate::electorate::Electorate;
use crate::matchups::Matchup;

/// Receives the progress of a decision.
///
/// Every hook has an empty default, so an implementation only overrides what
/// it cares about.
pub trait Observer {
    fn scenario_started(&self, _electorate: &Electorate, _method: VotingMethod) {}

    fn round_completed(&self, _stats: &RoundStats) {}

    fn matchup_decided(&self, _matchup: &Matchup) {}

    fn decided(&self, _outcome: &Outcome) {}
}

/// Forwards the progress of a decision to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn scenario_started(&self, electorate: &Electorate, method: VotingMethod) {
        info!(
            "decide: issue {:?} with {} options and {} voters, method {}",
            electorate.issue().name(),
            electorate.issue().options().len(),
            electorate.voters().len(),
            method
        );
    }

    fn round_completed(&self, stats: &RoundStats) {
        debug!(
            "round {}: {:?} eliminated: {:?} finalists: {:?}",
            stats.round,
            stats.summary.entries(),
            stats.eliminated,
            stats.finalists
        );
    }

    fn matchup_decided(&self, matchup: &Matchup) {
        debug!(
            "matchup {} vs {}: {:?} winner: {:?}",
            matchup.first,
            matchup.second,
            matchup.summary.entries(),
            matchup.winner
        );
    }

    fn decided(&self, outcome: &Outcome) {
        info!("decide: {}: {:?}", outcome.method, outcome.decision);
    }
}
