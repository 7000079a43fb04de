use crate::election::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct IssueConfig {
    pub name: String,
    /// If empty, the options are inferred from the ballots.
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct VoterConfig {
    pub name: String,
    pub ballot: Vec<String>,
    pub weight: f64,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceGroupConfig {
    pub ballot: Vec<String>,
    pub count: u64,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    pub precision: Option<u32>,
    #[serde(rename = "tiePolicy")]
    pub tie_policy: Option<String>,
    #[serde(rename = "unrankedPolicy")]
    pub unranked_policy: Option<String>,
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<u64>,
    #[serde(rename = "maxKemenyCandidates")]
    pub max_kemeny_candidates: Option<usize>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ElectionConfig {
    pub issue: IssueConfig,
    pub method: Option<String>,
    pub rules: Option<RulesConfig>,
    #[serde(default)]
    pub voters: Vec<VoterConfig>,
    #[serde(rename = "preferenceGroups", default)]
    pub preference_groups: Vec<PreferenceGroupConfig>,
    #[serde(rename = "totalVotes")]
    pub total_votes: Option<f64>,
    /// A CSV file of preference groups, relative to the configuration file.
    #[serde(rename = "groupsFile")]
    pub groups_file: Option<String>,
}

impl ElectionConfig {
    /// The configuration used when only a groups file is provided.
    pub fn from_issue_name(name: &str) -> ElectionConfig {
        ElectionConfig {
            issue: IssueConfig {
                name: name.to_string(),
                options: Vec::new(),
            },
            method: None,
            rules: None,
            voters: Vec::new(),
            preference_groups: Vec::new(),
            total_votes: None,
            groups_file: None,
        }
    }
}

pub fn read_election_config(path: &str) -> ElectionResult<ElectionConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: ElectionConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_election_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> ElectionResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_camel_case_fields() {
        let js = r#"{
            "issue": {"name": "lunch", "options": ["Pizza", "Sushi"]},
            "method": "condorcet",
            "rules": {"tiePolicy": "returnIfTie", "randomSeed": 3},
            "preferenceGroups": [{"ballot": ["Sushi"], "count": 4}],
            "totalVotes": 10
        }"#;
        let config: ElectionConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.issue.options.len(), 2);
        assert!(config.voters.is_empty());
        assert_eq!(config.preference_groups[0].count, 4);
        assert_eq!(config.total_votes, Some(10.0));
        let rules = config.rules.unwrap();
        assert_eq!(rules.tie_policy.as_deref(), Some("returnIfTie"));
        assert_eq!(rules.random_seed, Some(3));
        assert_eq!(rules.precision, None);
    }
}
