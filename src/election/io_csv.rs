// Primitives for reading CSV files.

use std::fs::File;
use std::io::Read;

use crate::election::*;

/// A ballot shared by `count` voters, as read from a file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedGroup {
    pub count: u64,
    pub choices: Vec<String>,
}

/// Reads preference groups, one per line: `count,choice 1,choice 2,...`.
///
/// Empty cells are skipped. A first line whose count is not a number is
/// taken as a header.
pub fn read_csv_groups<R: Read>(rdr: R) -> ElectionResult<Vec<ParsedGroup>> {
    let records = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr)
        .into_records();

    let mut res: Vec<ParsedGroup> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu {})?;
        let count_s = line.get(0).unwrap_or("");
        if count_s.is_empty() && line.iter().all(|s| s.is_empty()) {
            continue;
        }
        let count = match count_s.parse::<u64>() {
            Ok(c) => c,
            Err(_) if lineno == 1 => {
                debug!("read_csv_groups: skipping header {:?}", line);
                continue;
            }
            Err(_) => {
                return CsvCountSnafu {
                    value: count_s,
                    lineno,
                }
                .fail()
            }
        };
        let choices: Vec<String> = line
            .iter()
            .skip(1)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        debug!(
            "read_csv_groups: lineno: {:?} count: {:?} choices: {:?}",
            lineno, count, &choices
        );
        res.push(ParsedGroup { count, choices });
    }
    Ok(res)
}

pub fn read_csv_groups_path(path: &str) -> ElectionResult<Vec<ParsedGroup>> {
    info!("Attempting to read groups file {:?}", path);
    let file = File::open(path).context(OpeningFileSnafu { path })?;
    read_csv_groups(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_groups_with_header() {
        let data = "count,first,second,third\n3,A,C,B\n8, A ,C,\n";
        let groups = read_csv_groups(data.as_bytes()).unwrap();
        assert_eq!(
            groups,
            vec![
                ParsedGroup {
                    count: 3,
                    choices: vec!["A".to_string(), "C".to_string(), "B".to_string()]
                },
                ParsedGroup {
                    count: 8,
                    choices: vec!["A".to_string(), "C".to_string()]
                },
            ]
        );
    }

    #[test]
    fn rejects_bad_counts() {
        let data = "3,A,B\nmany,B,A\n";
        assert!(matches!(
            read_csv_groups(data.as_bytes()),
            Err(ElectionError::CsvCount { lineno: 2, .. })
        ));
    }
}
