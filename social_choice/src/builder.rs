pub use crate::config::*;
use crate::electorate::{Ballot, Electorate, Issue, Voter};

use log::debug;
use snafu::ensure;

/// A builder for assembling an electorate.
///
/// Voters can be added one by one with their own weight, or as preference
/// groups: a ballot shared by `count` voters. The weight of a group is its
/// count divided by the total number of votes, which is either declared with
/// [`Builder::total_votes`] or, by default, the sum of all the group counts.
///
/// ```
/// use social_choice::builder::Builder;
/// use social_choice::{Decider, DeciderRules, VotingMethod};
/// # use social_choice::DecideError;
///
/// let mut builder = Builder::new("lunch", &["Pizza", "Tacos", "Sushi"])?
///     .method(VotingMethod::Condorcet);
///
/// builder.add_preference_group(&["Pizza", "Sushi"], 40)?;
/// builder.add_preference_group(&["Tacos", "Sushi", "Pizza"], 35)?;
/// builder.add_preference_group(&["Sushi", "Tacos"], 25)?;
/// let electorate = builder.build()?;
///
/// let outcome = Decider::new(DeciderRules::DEFAULT_RULES).decide(&electorate)?;
/// assert_eq!(outcome.winner(), Some("Sushi"));
/// # Ok::<(), DecideError>(())
/// ```
pub struct Builder {
    pub(crate) _issue: Issue,
    pub(crate) _method: VotingMethod,
    pub(crate) _total_votes: Option<f64>,
    pub(crate) _voters: Vec<Voter>,
    // Preference groups, weighted when the electorate is built.
    pub(crate) _groups: Vec<(Ballot, u64)>,
}

impl Builder {
    pub fn new<S: AsRef<str>>(issue_name: &str, options: &[S]) -> Result<Builder, DecideError> {
        Ok(Builder {
            _issue: Issue::new(issue_name, options)?,
            _method: VotingMethod::Plurality,
            _total_votes: None,
            _voters: Vec::new(),
            _groups: Vec::new(),
        })
    }

    pub fn method(self, method: VotingMethod) -> Builder {
        Builder {
            _method: method,
            ..self
        }
    }

    /// Declares the number of votes the preference group counts refer to.
    pub fn total_votes(self, total: f64) -> Result<Builder, DecideError> {
        ensure!(
            total.is_finite() && total > 0.0,
            InvalidTotalVotesSnafu { total }
        );
        Ok(Builder {
            _total_votes: Some(total),
            ..self
        })
    }

    /// Adds a single voter with an explicit weight.
    pub fn add_voter<S: AsRef<str>>(
        &mut self,
        name: &str,
        choices: &[S],
        weight: f64,
    ) -> Result<(), DecideError> {
        ensure!(
            weight.is_finite() && weight >= 0.0,
            InvalidWeightSnafu {
                voter: name,
                weight
            }
        );
        self._voters
            .push(Voter::new(name, Ballot::new(choices), weight));
        Ok(())
    }

    /// Adds `count` voters sharing the same ranking.
    pub fn add_preference_group<S: AsRef<str>>(
        &mut self,
        choices: &[S],
        count: u64,
    ) -> Result<(), DecideError> {
        self._groups.push((Ballot::new(choices), count));
        Ok(())
    }

    pub fn build(self) -> Result<Electorate, DecideError> {
        let mut voters = self._voters;
        let declared_total = self._total_votes;
        if !self._groups.is_empty() {
            let total = match declared_total {
                Some(t) => t,
                None => self._groups.iter().map(|(_, c)| *c as f64).sum(),
            };
            ensure!(total > 0.0, InvalidTotalVotesSnafu { total });
            debug!(
                "build: {} preference groups over {} votes",
                self._groups.len(),
                total
            );
            for (ballot, count) in self._groups {
                let name = format!("Preference group {}", ballot.choices().join(" > "));
                voters.push(Voter::new(&name, ballot, count as f64 / total));
            }
        }
        Ok(Electorate::new(self._issue, voters, self._method).with_total_votes(declared_total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_weights_use_declared_total() {
        let mut builder = Builder::new("letters", &["A", "B"])
            .unwrap()
            .total_votes(200.0)
            .unwrap();
        builder.add_preference_group(&["A", "B"], 50).unwrap();
        builder.add_preference_group(&["B"], 100).unwrap();
        let electorate = builder.build().unwrap();
        let weights: Vec<f64> = electorate.voters().iter().map(|v| v.weight).collect();
        assert_eq!(weights, vec![0.25, 0.5]);
        assert_eq!(electorate.total_votes(), Some(200.0));
    }

    #[test]
    fn group_weights_default_to_group_sum() {
        let mut builder = Builder::new("letters", &["A", "B"]).unwrap();
        builder.add_preference_group(&["A"], 3).unwrap();
        builder.add_preference_group(&["B"], 1).unwrap();
        let electorate = builder.build().unwrap();
        assert_eq!(electorate.voters()[0].weight, 0.75);
        assert_eq!(electorate.voters()[1].name, "Preference group B");
    }

    #[test]
    fn rejects_bad_weights() {
        let mut builder = Builder::new("letters", &["A", "B"]).unwrap();
        assert!(matches!(
            builder.add_voter("v", &["A"], -1.0),
            Err(DecideError::InvalidWeight { .. })
        ));
        assert!(Builder::new("letters", &["A"])
            .unwrap()
            .total_votes(0.0)
            .is_err());
    }
}
