/*!
Decides single-issue elections where every voter ranks the options.

Eight methods are available, see [`VotingMethod`]. They all share the same
treatment of incomplete ballots ([`UnrankedPolicy`]) and of ties
([`TiePolicy`]). The [`manual`] describes the methods in more detail.

```
use social_choice::builder::Builder;
use social_choice::{Decider, DeciderRules, VotingMethod};
# use social_choice::DecideError;

let mut builder = Builder::new("capital", &["Memphis", "Nashville", "Chattanooga", "Knoxville"])?;
builder.add_voter("Memphis", &["Memphis", "Nashville", "Chattanooga", "Knoxville"], 0.42)?;
builder.add_voter("Nashville", &["Nashville", "Chattanooga", "Knoxville", "Memphis"], 0.26)?;
builder.add_voter("Chattanooga", &["Chattanooga", "Knoxville", "Nashville", "Memphis"], 0.15)?;
builder.add_voter("Knoxville", &["Knoxville", "Chattanooga", "Nashville", "Memphis"], 0.17)?;
let electorate = builder.build()?;

let mut decider = Decider::new(DeciderRules::DEFAULT_RULES);
let plurality = decider.decide_with(&electorate, VotingMethod::Plurality)?;
assert_eq!(plurality.winner(), Some("Memphis"));
let condorcet = decider.decide_with(&electorate, VotingMethod::Condorcet)?;
assert_eq!(condorcet.winner(), Some("Nashville"));
# Ok::<(), DecideError>(())
```
*/

mod config;

pub mod ballots;
pub mod builder;
pub mod condorcet;
pub mod electorate;
pub mod kemeny_young;
pub mod manual;
pub mod matchups;
pub mod observer;
pub mod runoff;
pub mod tally;
pub mod tiebreak;

use log::{debug, info};
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};
use snafu::ensure;

pub use crate::config::*;
pub use crate::electorate::{Ballot, Contest, Electorate, Issue, Voter};
pub use crate::observer::{LogObserver, Observer};

/// What a method needs besides the contest.
pub(crate) struct Context<'a> {
    pub(crate) rules: &'a DeciderRules,
    pub(crate) rng: &'a mut dyn RngCore,
    pub(crate) observer: &'a dyn Observer,
}

/// Runs the voting methods over electorates.
///
/// The decider owns the random source used to break ties. The default one is
/// a ChaCha20 generator seeded from [`DeciderRules::random_seed`], so two
/// deciders built from the same rules make the same choices.
pub struct Decider<R: RngCore = ChaCha20Rng> {
    rules: DeciderRules,
    rng: R,
    observer: Box<dyn Observer>,
}

impl Decider<ChaCha20Rng> {
    pub fn new(rules: DeciderRules) -> Decider<ChaCha20Rng> {
        let rng = ChaCha20Rng::seed_from_u64(rules.random_seed);
        Decider::with_rng(rules, rng)
    }
}

impl<R: RngCore> Decider<R> {
    pub fn with_rng(rules: DeciderRules, rng: R) -> Decider<R> {
        Decider {
            rules,
            rng,
            observer: Box::new(LogObserver),
        }
    }

    /// Replaces the default [`LogObserver`].
    pub fn with_observer<O: Observer + 'static>(self, observer: O) -> Decider<R> {
        Decider {
            observer: Box::new(observer),
            ..self
        }
    }

    /// Runs the method selected by the electorate.
    pub fn decide(&mut self, electorate: &Electorate) -> Result<Outcome, DecideError> {
        self.decide_with(electorate, electorate.method())
    }

    /// Runs the given method, whatever the electorate selected.
    pub fn decide_with(
        &mut self,
        electorate: &Electorate,
        method: VotingMethod,
    ) -> Result<Outcome, DecideError> {
        self.observer.scenario_started(electorate, method);
        let contest = screen(electorate, method, &self.rules)?;
        let mut ctx = Context {
            rules: &self.rules,
            rng: &mut self.rng,
            observer: self.observer.as_ref(),
        };
        let outcome = match method {
            VotingMethod::Plurality => runoff::plurality(&contest, &mut ctx)?,
            VotingMethod::TwoRound => runoff::two_round(&contest, &mut ctx)?,
            VotingMethod::ExhaustiveBallot => runoff::exhaustive_ballot(&contest, &mut ctx)?,
            VotingMethod::Condorcet => condorcet::condorcet(&contest, &mut ctx)?,
            VotingMethod::Copeland => condorcet::copeland(&contest, &mut ctx)?,
            VotingMethod::KemenyYoung => kemeny_young::kemeny_young(&contest, &mut ctx)?,
            VotingMethod::Minimax => condorcet::minimax(&contest, &mut ctx)?,
            VotingMethod::RankedPairs => condorcet::ranked_pairs(&contest, &mut ctx)?,
        };
        self.observer.decided(&outcome);
        Ok(outcome)
    }
}

/// Checks the electorate against the rules and builds the contest to count.
///
/// Nothing is computed if any check fails.
fn screen<'e>(
    electorate: &'e Electorate,
    method: VotingMethod,
    rules: &DeciderRules,
) -> Result<Contest<'e>, DecideError> {
    for voter in electorate.voters() {
        ensure!(
            voter.weight.is_finite() && voter.weight >= 0.0,
            InvalidWeightSnafu {
                voter: voter.name.as_str(),
                weight: voter.weight
            }
        );
    }

    let options = electorate.issue().options();
    let missing_option =
        |voter: &Voter| options.iter().find(|o| !voter.ballot.ranks(o.as_str()));

    let contest = electorate.contest();
    let contest = match rules.unranked_policy {
        UnrankedPolicy::RaiseError => {
            for voter in electorate.voters() {
                if let Some(option) = missing_option(voter) {
                    return UnrankedChoiceSnafu {
                        voter: voter.name.as_str(),
                        option: option.as_str(),
                    }
                    .fail();
                }
            }
            contest
        }
        UnrankedPolicy::SpoiledBallot => {
            let (complete, spoiled): (Vec<&Voter>, Vec<&Voter>) = electorate
                .voters()
                .iter()
                .partition(|v| missing_option(*v).is_none());
            if !spoiled.is_empty() {
                info!(
                    "screen: discarding {} spoiled ballots: {:?}",
                    spoiled.len(),
                    spoiled.iter().map(|v| &v.name).collect::<Vec<&String>>()
                );
            }
            contest.with_voters(complete)
        }
        UnrankedPolicy::RankedLast => {
            ensure!(
                method.allows_equal_rankings(),
                IncompatibleMethodSnafu {
                    method,
                    reason: "unranked options cannot be ranked last by a first-choice method"
                }
            );
            contest
        }
        UnrankedPolicy::ZeroWeight => contest,
    };

    if method == VotingMethod::KemenyYoung {
        kemeny_young::check_tractable(contest.options().len(), rules.max_kemeny_candidates)?;
    }
    debug!(
        "screen: {} voters, {} options",
        contest.voters().len(),
        contest.options().len()
    );
    Ok(contest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(voters: Vec<Voter>) -> Electorate {
        let issue = Issue::new("letters", &["A", "B", "C"]).unwrap();
        Electorate::new(issue, voters, VotingMethod::Plurality)
    }

    #[test]
    fn screen_rejects_negative_weights() {
        let electorate = letters(vec![Voter::new("v", Ballot::new(&["A"]), -0.5)]);
        let res = screen(&electorate, VotingMethod::Plurality, &DeciderRules::DEFAULT_RULES);
        assert!(matches!(res, Err(DecideError::InvalidWeight { .. })));
        let nan = letters(vec![Voter::new("v", Ballot::new(&["A"]), f64::NAN)]);
        let res = screen(&nan, VotingMethod::Plurality, &DeciderRules::DEFAULT_RULES);
        assert!(matches!(res, Err(DecideError::InvalidWeight { .. })));
    }

    #[test]
    fn screen_discards_spoiled_ballots() {
        let electorate = letters(vec![
            Voter::new("complete", Ballot::new(&["A", "B", "C"]), 0.5),
            Voter::new("partial", Ballot::new(&["B"]), 0.5),
        ]);
        let rules = DeciderRules {
            unranked_policy: UnrankedPolicy::SpoiledBallot,
            ..DeciderRules::DEFAULT_RULES
        };
        let contest = screen(&electorate, VotingMethod::Plurality, &rules).unwrap();
        assert_eq!(contest.voters().len(), 1);
        assert_eq!(contest.voters()[0].name, "complete");
    }

    #[test]
    fn screen_reports_the_first_unranked_option() {
        let electorate = letters(vec![Voter::new("v", Ballot::new(&["A", "C"]), 1.0)]);
        let rules = DeciderRules {
            unranked_policy: UnrankedPolicy::RaiseError,
            ..DeciderRules::DEFAULT_RULES
        };
        let res = screen(&electorate, VotingMethod::Condorcet, &rules);
        assert!(matches!(
            res,
            Err(DecideError::UnrankedChoice { voter, option }) if voter == "v" && option == "B"
        ));
    }

    #[test]
    fn ranked_last_needs_equal_rankings() {
        let electorate = letters(vec![Voter::new("v", Ballot::new(&["A"]), 1.0)]);
        let rules = DeciderRules {
            unranked_policy: UnrankedPolicy::RankedLast,
            ..DeciderRules::DEFAULT_RULES
        };
        assert!(matches!(
            screen(&electorate, VotingMethod::TwoRound, &rules),
            Err(DecideError::IncompatibleMethod {
                method: VotingMethod::TwoRound,
                ..
            })
        ));
        assert!(screen(&electorate, VotingMethod::Minimax, &rules).is_ok());
    }
}
