use clap::Parser;

/// This is a decider for single-issue ranked elections.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the election in JSON format: the issue, its options,
    /// the voters and the rules. Command line options override what this file specifies.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the outcome of an election in JSON format. If provided,
    /// decider will check that the computed outcome matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the outcome of the election will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, optional) A CSV file of preference groups, one per line: `count,choice 1,choice 2,...`.
    /// Setting this option overrides the groups file that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// The voting method: plurality, two_round, exhaustive_ballot, condorcet, copeland,
    /// kemeny_young, minimax or ranked_pairs.
    #[clap(short, long, value_parser)]
    pub method: Option<String>,

    /// (default break_randomly) What to do with ties: break_randomly, raise_error or return_if_tie.
    #[clap(long, value_parser)]
    pub tie_policy: Option<String>,

    /// (default zero_weight) What to do with options left unranked by a ballot: spoiled_ballot,
    /// ranked_last, raise_error or zero_weight.
    #[clap(long, value_parser)]
    pub unranked_policy: Option<String>,

    /// (default 2) The number of digits kept after the decimal point in the tallies.
    #[clap(long, value_parser)]
    pub precision: Option<u32>,

    /// (default 0) The seed of the random generator used to break ties.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
