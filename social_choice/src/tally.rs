use log::debug;

use crate::ballots::Choice;

/// Rounds to the given number of digits after the decimal point, halves
/// away from zero.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// The total weight received by each choice of a round.
///
/// Every eligible option has an entry, in canonical order, even when nobody
/// picked it. The `Unranked` entry comes last and only exists when some
/// voter ranked none of the eligible options.
#[derive(PartialEq, Debug, Clone)]
pub struct Summary {
    entries: Vec<(Choice, f64)>,
    total: f64,
}

impl Summary {
    pub fn entries(&self) -> &[(Choice, f64)] {
        &self.entries
    }

    /// The weight of an option, zero if it is not part of the summary.
    pub fn weight(&self, option: &str) -> f64 {
        self.entries
            .iter()
            .find(|(c, _)| c.candidate() == Some(option))
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    pub fn unranked(&self) -> f64 {
        self.entries
            .iter()
            .find(|(c, _)| *c == Choice::Unranked)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    /// The weight of all the voters of the round, unranked included.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// The entries of the candidates only.
    pub fn candidates(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .filter_map(|(c, w)| c.candidate().map(|name| (name.to_string(), *w)))
            .collect()
    }

    /// Strictly more than half of the round's weight.
    pub fn has_majority(&self, option: &str) -> bool {
        self.weight(option) > self.total / 2.0
    }
}

/// Sums the weights of the first choices, rounding every total.
pub fn summarize_results(
    first_choices: &[(Choice, f64)],
    eligible: &[String],
    precision: u32,
) -> Summary {
    let mut entries: Vec<(Choice, f64)> = eligible
        .iter()
        .map(|o| (Choice::Candidate(o.clone()), 0.0))
        .collect();
    for (choice, weight) in first_choices.iter() {
        match entries.iter_mut().find(|(c, _)| c == choice) {
            Some(entry) => entry.1 += *weight,
            None => entries.push((choice.clone(), *weight)),
        }
    }
    for entry in entries.iter_mut() {
        entry.1 = round_to(entry.1, precision);
    }
    let total = round_to(entries.iter().map(|(_, w)| *w).sum(), precision);
    debug!("summarize_results: {:?} total: {:?}", entries, total);
    Summary { entries, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(s: &str) -> Choice {
        Choice::Candidate(s.to_string())
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(0.26 + 0.15 + 0.17, 2), 0.58);
    }

    #[test]
    fn summary_keeps_unsupported_options() {
        let eligible = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let firsts = vec![(cand("B"), 0.3), (cand("A"), 0.2), (cand("B"), 0.1)];
        let summary = summarize_results(&firsts, &eligible, 2);
        assert_eq!(
            summary.candidates(),
            vec![
                ("A".to_string(), 0.2),
                ("B".to_string(), 0.4),
                ("C".to_string(), 0.0)
            ]
        );
        assert_eq!(summary.unranked(), 0.0);
        assert_eq!(summary.entries().len(), 3);
    }

    #[test]
    fn unranked_weight_counts_in_total() {
        let eligible = vec!["A".to_string(), "B".to_string()];
        let firsts = vec![
            (cand("A"), 0.45),
            (Choice::Unranked, 0.2),
            (cand("B"), 0.35),
        ];
        let summary = summarize_results(&firsts, &eligible, 2);
        assert_eq!(summary.entries().last(), Some(&(Choice::Unranked, 0.2)));
        assert_eq!(summary.total(), 1.0);
        assert!(!summary.has_majority("A"));
    }
}
