use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use social_choice::builder::Builder;
use social_choice::tally::Summary;
use social_choice::*;

use crate::args::Args;
use crate::election::config_reader::*;
use crate::election::io_csv::*;

pub mod config_reader;
pub mod io_csv;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ElectionError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error parsing a CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Invalid count {value:?} on line {lineno}"))]
    CsvCount { value: String, lineno: usize },
    #[snafu(display("Error writing the outcome to {path}"))]
    WritingOutcome {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Decision failed: {source}"))]
    Deciding { source: DecideError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ElectionResult<T> = Result<T, ElectionError>;

fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The rules of the configuration file, overridden by the command line.
fn validate_rules(rules: &Option<RulesConfig>, args: &Args) -> ElectionResult<DeciderRules> {
    let rc = rules.clone().unwrap_or_default();
    let defaults = DeciderRules::DEFAULT_RULES;
    let tie_policy = match args.tie_policy.as_ref().or(rc.tie_policy.as_ref()) {
        Some(s) => s.parse::<TiePolicy>().context(DecidingSnafu {})?,
        None => defaults.tie_policy,
    };
    let unranked_policy = match args
        .unranked_policy
        .as_ref()
        .or(rc.unranked_policy.as_ref())
    {
        Some(s) => s.parse::<UnrankedPolicy>().context(DecidingSnafu {})?,
        None => defaults.unranked_policy,
    };
    Ok(DeciderRules {
        precision: args.precision.or(rc.precision).unwrap_or(defaults.precision),
        tie_policy,
        unranked_policy,
        random_seed: args.seed.or(rc.random_seed).unwrap_or(defaults.random_seed),
        max_kemeny_candidates: rc
            .max_kemeny_candidates
            .unwrap_or(defaults.max_kemeny_candidates),
    })
}

fn validate_method(config: &ElectionConfig, args: &Args) -> ElectionResult<VotingMethod> {
    match args.method.as_ref().or(config.method.as_ref()) {
        Some(s) => s.parse::<VotingMethod>().context(DecidingSnafu {}),
        None => whatever!("No voting method: use --method or set it in the configuration"),
    }
}

/// The options of the issue, or the names found on the ballots in order of
/// first appearance if the issue does not list any.
fn issue_options(config: &ElectionConfig, groups: &[ParsedGroup]) -> Vec<String> {
    if !config.issue.options.is_empty() {
        return config.issue.options.clone();
    }
    let mut options: Vec<String> = Vec::new();
    let ballots = config
        .voters
        .iter()
        .map(|v| &v.ballot)
        .chain(config.preference_groups.iter().map(|g| &g.ballot))
        .chain(groups.iter().map(|g| &g.choices));
    for ballot in ballots {
        for c in ballot.iter() {
            if !options.contains(c) {
                options.push(c.clone());
            }
        }
    }
    info!("Inferred options: {:?}", options);
    options
}

fn build_electorate(
    config: &ElectionConfig,
    groups: &[ParsedGroup],
    method: VotingMethod,
) -> ElectionResult<Electorate> {
    let options = issue_options(config, groups);
    let mut builder = Builder::new(&config.issue.name, &options)
        .context(DecidingSnafu {})?
        .method(method);
    if let Some(total) = config.total_votes {
        builder = builder.total_votes(total).context(DecidingSnafu {})?;
    }
    for v in config.voters.iter() {
        builder
            .add_voter(&v.name, &v.ballot, v.weight)
            .context(DecidingSnafu {})?;
    }
    for g in config.preference_groups.iter() {
        builder
            .add_preference_group(&g.ballot, g.count)
            .context(DecidingSnafu {})?;
    }
    for g in groups.iter() {
        builder
            .add_preference_group(&g.choices, g.count)
            .context(DecidingSnafu {})?;
    }
    builder.build().context(DecidingSnafu {})
}

fn tally_to_json(summary: &Summary) -> JSValue {
    let mut tally: JSMap<String, JSValue> = JSMap::new();
    for (choice, weight) in summary.entries() {
        tally.insert(choice.to_string(), json!(weight));
    }
    JSValue::Object(tally)
}

fn decision_to_json(decision: &Decision) -> JSValue {
    match decision {
        Decision::Winner(w) => json!({ "winner": w }),
        Decision::Ranking(r) => json!({ "ranking": r }),
        Decision::Tie(contenders) => json!({ "tie": contenders }),
        Decision::TiedRankings(rankings) => json!({ "tiedRankings": rankings }),
        Decision::NoWinner => json!({ "noWinner": true }),
    }
}

fn scores_to_json(scores: &[(String, f64)]) -> JSValue {
    let mut js: JSMap<String, JSValue> = JSMap::new();
    for (name, score) in scores {
        js.insert(name.clone(), json!(score));
    }
    JSValue::Object(js)
}

fn outcome_to_json(issue: &Issue, outcome: &Outcome) -> JSValue {
    let mut results: JSMap<String, JSValue> = JSMap::new();
    results.insert("decision".to_string(), decision_to_json(&outcome.decision));
    match &outcome.audit {
        Audit::Summary(summary) => {
            results.insert("tally".to_string(), tally_to_json(summary));
            results.insert("total".to_string(), json!(summary.total()));
        }
        Audit::Pairwise { table, scores } => {
            let matchups: Vec<JSValue> = table
                .matchups()
                .iter()
                .map(|m| {
                    json!({
                        "first": m.first,
                        "second": m.second,
                        "tally": tally_to_json(&m.summary),
                        "total": m.summary.total(),
                        "winner": m.winner,
                    })
                })
                .collect();
            results.insert("matchups".to_string(), JSValue::Array(matchups));
            if !scores.is_empty() {
                results.insert("scores".to_string(), scores_to_json(scores));
            }
        }
        Audit::RankingScores(scores) => {
            let rankings: Vec<JSValue> = scores
                .iter()
                .map(|(ranking, score)| json!({ "ranking": ranking, "score": score }))
                .collect();
            results.insert("rankingScores".to_string(), JSValue::Array(rankings));
        }
    }
    let rounds: Vec<JSValue> = outcome
        .rounds
        .iter()
        .map(|r| {
            json!({
                "round": r.round,
                "tally": tally_to_json(&r.summary),
                "total": r.summary.total(),
                "eliminated": r.eliminated,
                "finalists": r.finalists,
            })
        })
        .collect();
    results.insert("rounds".to_string(), JSValue::Array(rounds));

    json!({
        "config": {
            "issue": issue.name(),
            "options": issue.options(),
            "method": outcome.method.name(),
        },
        "results": results,
    })
}

fn write_outcome(out: &Option<String>, pretty_js: &str) -> ElectionResult<()> {
    match out.as_deref() {
        None | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("Writing outcome to {:?}", path);
            fs::write(path, pretty_js).context(WritingOutcomeSnafu { path })?;
        }
    }
    Ok(())
}

pub fn run_election(args: &Args) -> ElectionResult<()> {
    let config: ElectionConfig = match (&args.config, &args.input) {
        (Some(config_path), _) => read_election_config(config_path)?,
        (None, Some(input_path)) => ElectionConfig::from_issue_name(&simplify_file_name(input_path)),
        (None, None) => whatever!("No election data: use --config or --input"),
    };
    info!("config: {:?}", config);

    let rules = validate_rules(&config.rules, args)?;
    let method = validate_method(&config, args)?;

    // The groups file of the configuration is relative to the configuration.
    let groups_path: Option<String> = match (&args.input, &config.groups_file, &args.config) {
        (Some(input_path), _, _) => Some(input_path.clone()),
        (None, Some(groups_file), Some(config_path)) => {
            let root_p = Path::new(config_path.as_str())
                .parent()
                .unwrap_or_else(|| Path::new("."));
            let p: PathBuf = [root_p, Path::new(groups_file.as_str())].iter().collect();
            Some(p.as_path().display().to_string())
        }
        (None, Some(groups_file), None) => Some(groups_file.clone()),
        (None, None, _) => None,
    };
    let groups: Vec<ParsedGroup> = match groups_path {
        Some(p) => read_csv_groups_path(&p)?,
        None => Vec::new(),
    };
    debug!("run_election: {} groups from file", groups.len());

    let electorate = build_electorate(&config, &groups, method)?;
    let mut decider = Decider::new(rules);
    let outcome = decider.decide(&electorate).context(DecidingSnafu {})?;
    info!("outcome {:?}", outcome.decision);

    let result_js = outcome_to_json(electorate.issue(), &outcome);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_outcome(&args.out, &pretty_js_stats)?;

    // The reference outcome, if provided for comparison
    if let Some(reference_p) = &args.reference {
        let summary_ref = read_summary(reference_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated outcome and reference outcome")
        }
    }

    Ok(())
}
