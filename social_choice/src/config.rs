// ********* Voting methods **********

use std::fmt::Display;
use std::str::FromStr;

use snafu::Snafu;

use crate::matchups::VictoryTable;
use crate::tally::Summary;

/// The voting methods understood by the decider.
///
/// The identifiers accepted by [`VotingMethod::from_str`] are the snake case
/// names returned by [`VotingMethod::name`]. Unknown identifiers are rejected
/// when the configuration is read, never at decision time.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum VotingMethod {
    Plurality,
    TwoRound,
    ExhaustiveBallot,
    Condorcet,
    Copeland,
    KemenyYoung,
    Minimax,
    RankedPairs,
}

impl VotingMethod {
    pub const ALL: [VotingMethod; 8] = [
        VotingMethod::Plurality,
        VotingMethod::TwoRound,
        VotingMethod::ExhaustiveBallot,
        VotingMethod::Condorcet,
        VotingMethod::Copeland,
        VotingMethod::KemenyYoung,
        VotingMethod::Minimax,
        VotingMethod::RankedPairs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            VotingMethod::Plurality => "plurality",
            VotingMethod::TwoRound => "two_round",
            VotingMethod::ExhaustiveBallot => "exhaustive_ballot",
            VotingMethod::Condorcet => "condorcet",
            VotingMethod::Copeland => "copeland",
            VotingMethod::KemenyYoung => "kemeny_young",
            VotingMethod::Minimax => "minimax",
            VotingMethod::RankedPairs => "ranked_pairs",
        }
    }

    /// Whether the method can treat several options as equally ranked.
    ///
    /// The first-choice methods only ever look at the head of a ballot, so a
    /// ballot ending in a block of options tied for last means nothing to them.
    pub fn allows_equal_rankings(&self) -> bool {
        match self {
            VotingMethod::Plurality | VotingMethod::TwoRound | VotingMethod::ExhaustiveBallot => {
                false
            }
            VotingMethod::Condorcet
            | VotingMethod::Copeland
            | VotingMethod::KemenyYoung
            | VotingMethod::Minimax
            | VotingMethod::RankedPairs => true,
        }
    }
}

impl Display for VotingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for VotingMethod {
    type Err = DecideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        VotingMethod::ALL
            .iter()
            .find(|m| m.name() == normalized)
            .copied()
            .ok_or_else(|| DecideError::UnsupportedMethod {
                name: s.to_string(),
            })
    }
}

// ********* Configuration **********

/// What to do when a decision point ends on equal weights.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TiePolicy {
    /// Drop random members of the tied group until the requested count remains.
    BreakRandomly,
    /// Fail with [`DecideError::Tie`].
    RaiseError,
    /// Report the tie as the outcome.
    ReturnIfTie,
}

impl TiePolicy {
    /// The policy used where a random pick would invent a result: drawn
    /// matchups, the Copeland tally and the Kemeny-Young ranking.
    pub fn without_random(self) -> TiePolicy {
        match self {
            TiePolicy::BreakRandomly => TiePolicy::ReturnIfTie,
            p => p,
        }
    }
}

impl FromStr for TiePolicy {
    type Err = DecideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "break_randomly" | "breakRandomly" => Ok(TiePolicy::BreakRandomly),
            "raise_error" | "raiseError" => Ok(TiePolicy::RaiseError),
            "return_if_tie" | "returnIfTie" => Ok(TiePolicy::ReturnIfTie),
            x => UnknownPolicySnafu {
                kind: "tie",
                name: x,
            }
            .fail(),
        }
    }
}

/// How ballots that leave some options unranked are treated.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum UnrankedPolicy {
    /// Incomplete ballots are discarded before counting.
    SpoiledBallot,
    /// Unranked options are tied for last place. Only valid for the methods
    /// that allow equal rankings.
    RankedLast,
    /// Incomplete ballots are rejected.
    RaiseError,
    /// Unranked options are represented by an explicit token that never
    /// credits a candidate.
    ZeroWeight,
}

impl FromStr for UnrankedPolicy {
    type Err = DecideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "spoiled_ballot" | "spoiledBallot" => Ok(UnrankedPolicy::SpoiledBallot),
            "ranked_last" | "rankedLast" => Ok(UnrankedPolicy::RankedLast),
            "raise_error" | "raiseError" => Ok(UnrankedPolicy::RaiseError),
            "zero_weight" | "zeroWeight" => Ok(UnrankedPolicy::ZeroWeight),
            x => UnknownPolicySnafu {
                kind: "unranked",
                name: x,
            }
            .fail(),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct DeciderRules {
    /// Digits kept after the decimal point when summarizing weights.
    pub precision: u32,
    pub tie_policy: TiePolicy,
    pub unranked_policy: UnrankedPolicy,
    /// Seed of the default tie-breaking generator.
    pub random_seed: u64,
    /// Kemeny-Young enumerates every ordering: refuse beyond this many options.
    pub max_kemeny_candidates: usize,
}

impl DeciderRules {
    pub const DEFAULT_RULES: DeciderRules = DeciderRules {
        precision: 2,
        tie_policy: TiePolicy::BreakRandomly,
        unranked_policy: UnrankedPolicy::ZeroWeight,
        random_seed: 0,
        max_kemeny_candidates: 8,
    };
}

impl Default for DeciderRules {
    fn default() -> Self {
        DeciderRules::DEFAULT_RULES
    }
}

// ******** Output data structures *********

/// The verdict of a voting method.
#[derive(PartialEq, Debug, Clone)]
pub enum Decision {
    Winner(String),
    /// A full preference order, best first (Kemeny-Young).
    Ranking(Vec<String>),
    /// The contenders that could not be separated.
    Tie(Vec<String>),
    /// Several orderings share the best Kemeny-Young score.
    TiedRankings(Vec<Vec<String>>),
    /// No candidate beats all the others (Condorcet).
    NoWinner,
}

/// The data supporting a decision.
#[derive(PartialEq, Debug, Clone)]
pub enum Audit {
    /// The summary of the deciding plurality round.
    Summary(Summary),
    /// The pairwise victory table, with the per-candidate scores of the
    /// method when it needed any (Copeland wins, minimax greatest losses,
    /// ranked pairs locked defeats).
    Pairwise {
        table: VictoryTable,
        scores: Vec<(String, f64)>,
    },
    /// The score of every ordering of the candidates.
    RankingScores(Vec<(Vec<String>, f64)>),
}

/// Statistics for one round of a runoff method.
#[derive(PartialEq, Debug, Clone)]
pub struct RoundStats {
    pub round: u32,
    pub summary: Summary,
    /// The option removed after this round (exhaustive ballot).
    pub eliminated: Vec<String>,
    /// The options kept for the next round (two-round runoff).
    pub finalists: Vec<String>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Outcome {
    pub method: VotingMethod,
    pub decision: Decision,
    pub audit: Audit,
    pub rounds: Vec<RoundStats>,
}

impl Outcome {
    /// The winning option, if the decision names one. For a ranking this is
    /// the head of the ranking.
    pub fn winner(&self) -> Option<&str> {
        match &self.decision {
            Decision::Winner(w) => Some(w.as_str()),
            Decision::Ranking(r) => r.first().map(|s| s.as_str()),
            Decision::Tie(_) | Decision::TiedRankings(_) | Decision::NoWinner => None,
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(
            self.decision,
            Decision::Tie(_) | Decision::TiedRankings(_)
        )
    }

    pub fn summary(&self) -> Option<&Summary> {
        match &self.audit {
            Audit::Summary(s) => Some(s),
            _ => None,
        }
    }

    pub fn victory_table(&self) -> Option<&VictoryTable> {
        match &self.audit {
            Audit::Pairwise { table, .. } => Some(table),
            _ => None,
        }
    }

    pub fn scores(&self) -> &[(String, f64)] {
        match &self.audit {
            Audit::Pairwise { scores, .. } => scores.as_slice(),
            _ => &[],
        }
    }

    /// The Kemeny-Young score of the given ordering.
    pub fn ranking_score<S: AsRef<str>>(&self, ranking: &[S]) -> Option<f64> {
        match &self.audit {
            Audit::RankingScores(scores) => scores
                .iter()
                .find(|(r, _)| {
                    r.len() == ranking.len()
                        && r.iter().zip(ranking.iter()).all(|(a, b)| a == b.as_ref())
                })
                .map(|(_, score)| *score),
            _ => None,
        }
    }
}

// ******** Errors *********

/// Errors that prevent a decision from being computed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DecideError {
    #[snafu(display("Duplicate option {option:?} in issue {issue:?}"))]
    DuplicateOption { issue: String, option: String },

    #[snafu(display("Issue {issue:?} has no options"))]
    EmptyIssue { issue: String },

    #[snafu(display("Voter {voter:?} has an invalid weight {weight}"))]
    InvalidWeight { voter: String, weight: f64 },

    #[snafu(display("Total vote count must be positive, got {total}"))]
    InvalidTotalVotes { total: f64 },

    #[snafu(display("Can't grab {requested} choices out of {available}"))]
    InvalidRequest { requested: usize, available: usize },

    #[snafu(display("Unknown {kind} policy {name:?}"))]
    UnknownPolicy { kind: String, name: String },

    #[snafu(display("Voting method {name:?} is not supported"))]
    UnsupportedMethod { name: String },

    #[snafu(display("Voting method {method} cannot be used: {reason}"))]
    IncompatibleMethod {
        method: VotingMethod,
        reason: String,
    },

    #[snafu(display("Tie between {contenders:?} while {stage}"))]
    Tie {
        stage: String,
        contenders: Vec<String>,
    },

    #[snafu(display(
        "Kemeny-Young over {candidates} candidates exceeds the limit of {limit}"
    ))]
    IntractableInput { candidates: usize, limit: usize },

    #[snafu(display("Voter {voter:?} did not rank option {option:?}"))]
    UnrankedChoice { voter: String, option: String },
}
