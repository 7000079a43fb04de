// ********* Input data structures ***********

use log::debug;
use snafu::ensure;

use crate::config::*;

/// Returns the first item that appears more than once, if any.
pub fn first_duplicate<S: AsRef<str>>(items: &[S]) -> Option<&str> {
    items.iter().enumerate().find_map(|(idx, item)| {
        let s = item.as_ref();
        if items[..idx].iter().any(|prev| prev.as_ref() == s) {
            Some(s)
        } else {
            None
        }
    })
}

/// A question put to the voters, and the options they may rank.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Issue {
    name: String,
    options: Vec<String>,
}

impl Issue {
    pub fn new<S: AsRef<str>>(name: &str, options: &[S]) -> Result<Issue, DecideError> {
        ensure!(!options.is_empty(), EmptyIssueSnafu { issue: name });
        if let Some(dup) = first_duplicate(options) {
            return DuplicateOptionSnafu {
                issue: name,
                option: dup,
            }
            .fail();
        }
        Ok(Issue {
            name: name.to_string(),
            options: options.iter().map(|o| o.as_ref().to_string()).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The options in their canonical order.
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

/// The ranking expressed by one voter, most preferred first.
///
/// A ballot may omit options, and may even mention names that are not
/// options of the issue: these are dropped when the ballot is validated.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Ballot {
    choices: Vec<String>,
}

impl Ballot {
    pub fn new<S: AsRef<str>>(choices: &[S]) -> Ballot {
        Ballot {
            choices: choices.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn ranks(&self, option: &str) -> bool {
        self.choices.iter().any(|c| c == option)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Voter {
    pub name: String,
    pub ballot: Ballot,
    /// A share of the voting power, or an absolute count. Weights do not
    /// need to sum to one.
    pub weight: f64,
}

impl Voter {
    pub fn new(name: &str, ballot: Ballot, weight: f64) -> Voter {
        Voter {
            name: name.to_string(),
            ballot,
            weight,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Electorate {
    issue: Issue,
    voters: Vec<Voter>,
    method: VotingMethod,
    total_votes: Option<f64>,
}

impl Electorate {
    pub fn new(issue: Issue, voters: Vec<Voter>, method: VotingMethod) -> Electorate {
        Electorate {
            issue,
            voters,
            method,
            total_votes: None,
        }
    }

    pub(crate) fn with_total_votes(mut self, total_votes: Option<f64>) -> Electorate {
        self.total_votes = total_votes;
        self
    }

    pub fn issue(&self) -> &Issue {
        &self.issue
    }

    pub fn voters(&self) -> &[Voter] {
        &self.voters
    }

    pub fn method(&self) -> VotingMethod {
        self.method
    }

    /// The vote count the preference group weights were derived from.
    pub fn total_votes(&self) -> Option<f64> {
        self.total_votes
    }

    pub fn contest(&self) -> Contest<'_> {
        Contest::new(self)
    }
}

/// A view of an electorate restricted to some of its options and voters.
///
/// Multi-round methods shrink the contest from one round to the next by
/// building new views: the electorate itself is never modified.
#[derive(PartialEq, Debug, Clone)]
pub struct Contest<'a> {
    issue: &'a Issue,
    voters: Vec<&'a Voter>,
    // Invariant: a subsequence of the issue options.
    options: Vec<String>,
}

impl<'a> Contest<'a> {
    pub fn new(electorate: &'a Electorate) -> Contest<'a> {
        Contest {
            issue: &electorate.issue,
            voters: electorate.voters.iter().collect(),
            options: electorate.issue.options.clone(),
        }
    }

    pub fn issue(&self) -> &'a Issue {
        self.issue
    }

    /// The options still eligible, in canonical order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn voters(&self) -> &[&'a Voter] {
        &self.voters
    }

    pub fn is_eligible(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Only keeps the given options. Names that are not eligible are ignored.
    pub fn restricted_to<S: AsRef<str>>(&self, keep: &[S]) -> Contest<'a> {
        let options: Vec<String> = self
            .options
            .iter()
            .filter(|o| keep.iter().any(|k| k.as_ref() == o.as_str()))
            .cloned()
            .collect();
        debug!("restricted_to: {:?} -> {:?}", self.options, options);
        Contest {
            issue: self.issue,
            voters: self.voters.clone(),
            options,
        }
    }

    pub fn without(&self, option: &str) -> Contest<'a> {
        Contest {
            issue: self.issue,
            voters: self.voters.clone(),
            options: self
                .options
                .iter()
                .filter(|o| o.as_str() != option)
                .cloned()
                .collect(),
        }
    }

    pub fn with_voters(&self, voters: Vec<&'a Voter>) -> Contest<'a> {
        Contest {
            issue: self.issue,
            voters,
            options: self.options.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_options() {
        let res = Issue::new("capital", &["Memphis", "Nashville", "Memphis"]);
        assert!(matches!(
            res,
            Err(DecideError::DuplicateOption { option, .. }) if option == "Memphis"
        ));
    }

    #[test]
    fn rejects_empty_issue() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            Issue::new("nothing", &empty),
            Err(DecideError::EmptyIssue { .. })
        ));
    }

    #[test]
    fn first_duplicate_finds_repeats() {
        assert_eq!(first_duplicate(&["a", "b", "c"]), None);
        assert_eq!(first_duplicate(&["a", "b", "a", "b"]), Some("a"));
    }

    #[test]
    fn contest_views_keep_the_electorate_intact() {
        let issue = Issue::new("letters", &["A", "B", "C", "D"]).unwrap();
        let voters = vec![Voter::new("v", Ballot::new(&["A", "B"]), 1.0)];
        let electorate = Electorate::new(issue, voters, VotingMethod::Plurality);
        let contest = electorate.contest();
        let pair = contest.restricted_to(&["D", "B", "Z"]);
        assert_eq!(pair.options(), &["B".to_string(), "D".to_string()]);
        let smaller = contest.without("A");
        assert_eq!(smaller.options().len(), 3);
        assert_eq!(contest.options().len(), 4);
        assert_eq!(electorate.issue().options().len(), 4);
    }
}
