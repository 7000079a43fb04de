/*!

This is the long-form manual for `social_choice` and `decider`.

## Voting methods

All the methods count the same validated ballots: options that are not
eligible are dropped, repeated entries count once, and every eligible option
the voter did not rank becomes an `(unranked)` entry at the end of the ballot.
Tallies are rounded to the configured number of digits after the decimal
point (2 by default).

### `plurality`

The option with the greatest weight of first choices wins.

### `two_round`

If an option holds strictly more than half of the first round, it wins.
Otherwise the two leading options go to a second round, counted again from
the ballots, and the plurality of that round wins. With two options or fewer
the first round is final.

### `exhaustive_ballot`

Rounds of plurality. After every round without a majority, the weakest option
is eliminated and its voters move to their next eligible choice. A tie for
last place is always broken at random, whatever the tie policy. The last
round is the one with a majority, or with two options left.

### `condorcet`

Every pair of options is counted as a two-option plurality (a *matchup*). The
option winning all its matchups wins. If there is none, the outcome has no
winner. A drawn matchup has no winner: random tie breaking never applies to a
pair.

### `copeland`

The Condorcet winner if there is one, otherwise the option winning the most
matchups. Ties are reported, never broken at random.

### `kemeny_young`

Every ordering of the options is scored with the weight of the matchups it
agrees with. The best ordering is the outcome. If the best score is shared,
all the best orderings are reported. The number of orderings grows with the
factorial of the number of options, so contests larger than
`max_kemeny_candidates` (8 by default) are refused.

### `minimax`

The Condorcet winner if there is one, otherwise the option whose greatest
opposition over all its matchups is the smallest.

### `ranked_pairs`

The Condorcet winner if there is one. Otherwise every defeat won with more
than half of the matchup weight is weighted by its margin of victory. The
defeats are locked in descending order of margin unless they would close a
cycle. The option with the fewest locked defeats wins.

## Policies

Ties (`tiePolicy`):
- `break_randomly` (default): a seeded ChaCha20 generator removes tied
  options until the requested number remains
- `raise_error`: the decision fails
- `return_if_tie`: the tied options are reported as the outcome

Unranked options (`unrankedPolicy`):
- `zero_weight` (default): a ballot that ranks none of the options of a round
  is counted as `(unranked)`, which adds to the total but never wins
- `spoiled_ballot`: incomplete ballots are discarded
- `ranked_last`: unranked options are tied last. A ballot ranking none of
  the options of a round splits its weight evenly between them. Only valid
  for the pairwise methods.
- `raise_error`: an incomplete ballot fails the decision

## Input formats

### Configuration

The election is described by a JSON file:

```text
{
  "issue": {"name": "capital", "options": ["Memphis", "Nashville"]},
  "method": "condorcet",
  "rules": {"precision": 2, "tiePolicy": "return_if_tie", "randomSeed": 3},
  "voters": [{"name": "People of Memphis", "ballot": ["Memphis"], "weight": 0.42}],
  "preferenceGroups": [{"ballot": ["Nashville", "Memphis"], "count": 58}],
  "totalVotes": 100,
  "groupsFile": "groups.csv"
}
```

Only `issue.name` is mandatory. When the options are omitted, they are the
names found in the ballots, in order of first appearance. The weight of a
preference group is its count divided by `totalVotes`, or by the sum of the
counts when `totalVotes` is not given. `groupsFile` is resolved relative to
the configuration file.

### csv

Preference groups, one per line. The first column is the count:

```text
count,choice 1,choice 2,choice 3
20,A,B,C
12,C,A
```

Empty cells are skipped. A first row whose count is not a number is taken as
a header.

## Output format

The outcome is written as JSON:

```text
{
  "config": {"issue": "capital", "options": [...], "method": "exhaustive_ballot"},
  "results": {
    "decision": {"winner": "Knoxville"},
    "tally": {"Memphis": 0.42, "Knoxville": 0.58},
    "total": 1.0,
    "rounds": [{"round": 1, "tally": {...}, "total": 1.0, "eliminated": ["Chattanooga"], "finalists": []}]
  }
}
```

The decision is one of `winner`, `ranking`, `tie`, `tiedRankings` or
`noWinner`. The pairwise methods list their `matchups` (and their `scores`
when they use any) instead of a tally, Kemeny-Young lists its
`rankingScores`. When a reference file is given, both documents are compared
after normalizing their formatting, and the differences are printed.

 */
