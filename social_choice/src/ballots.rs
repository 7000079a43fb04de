use std::fmt::Display;

use log::debug;

use crate::config::UnrankedPolicy;
use crate::electorate::{Contest, Voter};

/// One position of a validated ballot.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub enum Choice {
    Candidate(String),
    /// Stands for an eligible option the voter did not rank.
    Unranked,
}

impl Choice {
    pub fn candidate(&self) -> Option<&str> {
        match self {
            Choice::Candidate(name) => Some(name.as_str()),
            Choice::Unranked => None,
        }
    }
}

impl Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Choice::Candidate(name) => write!(f, "{}", name),
            Choice::Unranked => write!(f, "(unranked)"),
        }
    }
}

/// The ballot of a voter, filtered against the options of a contest.
#[derive(PartialEq, Debug, Clone)]
pub struct ValidatedBallot<'a> {
    pub voter: &'a Voter,
    /// Eligible options in ballot order, then one `Unranked` per eligible
    /// option the ballot does not mention.
    pub choices: Vec<Choice>,
}

/// Validates the ballot of every voter of the contest.
///
/// Entries naming an option that is not eligible (eliminated, or not an
/// option at all) are dropped. Repeated entries only count once. Every
/// eligible option missing from the ballot is appended as an `Unranked`
/// token, so the validated ballots of a contest all have the same length.
pub fn validate_ballots<'a>(contest: &Contest<'a>) -> Vec<ValidatedBallot<'a>> {
    contest
        .voters()
        .iter()
        .map(|voter| {
            let mut choices: Vec<Choice> = Vec::new();
            for c in voter.ballot.choices() {
                if !contest.is_eligible(c) {
                    debug!("validate_ballots: {}: discarded {:?}", voter.name, c);
                    continue;
                }
                let choice = Choice::Candidate(c.clone());
                if !choices.contains(&choice) {
                    choices.push(choice);
                }
            }
            let num_unranked = contest.options().len() - choices.len();
            choices.extend(std::iter::repeat(Choice::Unranked).take(num_unranked));
            ValidatedBallot { voter, choices }
        })
        .collect()
}

/// The first choice of every validated ballot, with the weight of its voter.
///
/// Under the ranked-last policy, a voter who ranked none of the eligible
/// options considers them all tied: the weight is split evenly between them.
pub fn first_choices(
    validated: &[ValidatedBallot<'_>],
    eligible: &[String],
    policy: UnrankedPolicy,
) -> Vec<(Choice, f64)> {
    let mut res: Vec<(Choice, f64)> = Vec::new();
    for vb in validated.iter() {
        let weight = vb.voter.weight;
        match vb.choices.first() {
            Some(Choice::Unranked) if policy == UnrankedPolicy::RankedLast => {
                let share = weight / eligible.len() as f64;
                for option in eligible.iter() {
                    res.push((Choice::Candidate(option.clone()), share));
                }
            }
            Some(choice) => res.push((choice.clone(), weight)),
            // Only happens for a contest without options.
            None => res.push((Choice::Unranked, weight)),
        }
    }
    debug!("first_choices: {:?}", res);
    res
}
