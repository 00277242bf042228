//! Parsing of tournament results and rendering of the HTML report.
//!
//! The runner's results file carries one ranking line per strategy, in the
//! shape `"<rank>. <name> with <N> wins"`, followed by a `Win rates:`
//! marker and one comma-separated row of floats per strategy. The report
//! template uses `{%RANKINGS%}`, `{%TIMESTAMP%}`, `{%TEAMS%}`, and
//! `{%WINRATE_MATRIX%}` substitution markers.
//!
//! The staff's reference strategy competes but is kept out of the student
//! ranking: it is rendered unranked (`-.`) immediately above the first
//! team it outscored. Teams with equal win counts share a rank number.

use anyhow::{bail, Context};

/// Display name of the staff reference entry, as it appears after escaping.
pub const STAFF_NAME: &str = "&lt;staff solution&gt;";

/// One ranking line from the results file.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingEntry {
    /// HTML-escaped team name.
    pub name: String,
    /// Total wins across the tournament.
    pub wins: u64,
}

/// Everything parsed out of a results file.
#[derive(Debug, Default, PartialEq)]
pub struct TournamentResults {
    /// Ranking entries in file order (the runner writes them best-first).
    pub entries: Vec<RankingEntry>,
    /// Pairwise win-rate matrix, one row per strategy.
    pub win_rates: Vec<Vec<f64>>,
}

/// Parse the runner's results text.
pub fn parse_results(text: &str) -> anyhow::Result<TournamentResults> {
    let mut results = TournamentResults::default();
    let mut in_win_rates = false;

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if line.trim() == "Win rates:" {
            in_win_rates = true;
        } else if in_win_rates {
            let row = line
                .split(',')
                .map(|v| v.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("line {}: bad win-rate row", i + 1))?;
            results.win_rates.push(row);
        } else if line.contains('.') {
            results.entries.push(
                parse_ranking_line(line).with_context(|| format!("line {}: bad ranking", i + 1))?,
            );
        }
    }

    Ok(results)
}

fn parse_ranking_line(line: &str) -> anyhow::Result<RankingEntry> {
    let st = escape(line.trim());
    let Some(dot_idx) = st.find(". ") else {
        bail!("missing rank number");
    };
    let (Some(with_idx), Some(wins_idx)) = (st.rfind(" with"), st.rfind(" wins")) else {
        bail!("missing win count");
    };
    if with_idx + 5 > wins_idx {
        bail!("missing win count");
    }
    let name = st[dot_idx + 2..with_idx].trim().to_owned();
    let wins = st[with_idx + 5..wins_idx]
        .trim()
        .parse::<u64>()
        .context("bad win count")?;
    Ok(RankingEntry { name, wins })
}

/// Escape `&`, `<`, and `>` for embedding in HTML.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Substitute the parsed results and `timestamp` into `template`.
pub fn render_report(template: &str, results: &TournamentResults, timestamp: &str) -> String {
    let names: Vec<&str> = results.entries.iter().map(|e| e.name.as_str()).collect();
    template
        .replace("{%RANKINGS%}", &build_rankings(results))
        .replace("{%TIMESTAMP%}", timestamp)
        .replace("{%TEAMS%}", &name_list(&names))
        .replace("{%WINRATE_MATRIX%}", &format!("{:?}", results.win_rates))
}

fn build_rankings(results: &TournamentResults) -> String {
    // (wins, name, file index), ordered best first
    let mut staff: Option<(u64, &str, usize)> = None;
    let mut teams: Vec<(u64, &str, usize)> = Vec::new();
    for (idx, entry) in results.entries.iter().enumerate() {
        if entry.name == STAFF_NAME {
            staff = Some((entry.wins, &entry.name, idx));
        } else {
            teams.push((entry.wins, &entry.name, idx));
        }
    }
    teams.sort();
    teams.reverse();

    let mut items: Vec<String> = Vec::with_capacity(teams.len() + 1);
    let mut rank = 0usize;
    let mut equiv = 0usize;

    for (i, &(wins, name, idx)) in teams.iter().enumerate() {
        if let Some((staff_wins, staff_name, staff_idx)) = staff {
            if wins <= staff_wins {
                items.push(staff_item(staff_idx, staff_name, staff_wins));
                staff = None;
            }
        }

        if i > 0 && teams[i - 1].0 > wins {
            rank += equiv;
            equiv = 0;
        }
        equiv += 1;

        items.push(format!(
            "<li id=\"team-{idx}\" class=\"rank rank-{rank}\">{}. <strong>{name}</strong> \
             with {wins} wins</li>",
            rank + 1
        ));
    }

    // staff outscored nobody: still shown, at the bottom
    if let Some((staff_wins, staff_name, staff_idx)) = staff {
        items.push(staff_item(staff_idx, staff_name, staff_wins));
    }

    items.join("\n")
}

fn staff_item(idx: usize, name: &str, wins: u64) -> String {
    format!(
        "<li id=\"team-{idx}\" class=\"rank rank-staff\">-. <strong>{name}</strong> \
         with {wins} wins</li>"
    )
}

fn name_list(names: &[&str]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = "\
1. Alpha with 10 wins
2. <staff solution> with 8 wins
3. Beta with 8 wins
4. Gamma with 5 wins

Win rates:
1.0, 0.75, 0.6, 0.9
0.25, 1.0, 0.5, 0.8
0.4, 0.5, 1.0, 0.7
0.1, 0.2, 0.3, 1.0
";

    #[test]
    fn parses_entries_and_win_rates() {
        let results = parse_results(RESULTS).unwrap();
        assert_eq!(results.entries.len(), 4);
        assert_eq!(results.entries[0], RankingEntry { name: "Alpha".into(), wins: 10 });
        assert_eq!(results.entries[1].name, STAFF_NAME);
        assert_eq!(results.win_rates.len(), 4);
        assert_eq!(results.win_rates[1], vec![0.25, 1.0, 0.5, 0.8]);
    }

    #[test]
    fn escapes_names() {
        let results = parse_results("1. A<B&C with 3 wins\n").unwrap();
        assert_eq!(results.entries[0].name, "A&lt;B&amp;C");
    }

    #[test]
    fn rejects_garbled_ranking_line() {
        assert!(parse_results("1. no win count here.\n").is_err());
    }

    #[test]
    fn staff_is_unranked_and_pinned_above_first_team_it_outscores() {
        let results = parse_results(RESULTS).unwrap();
        let rankings = build_rankings(&results);
        let lines: Vec<&str> = rankings.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("1. <strong>Alpha</strong> with 10 wins"));
        assert!(lines[1].contains("rank-staff"));
        assert!(lines[1].contains("-. <strong>&lt;staff solution&gt;</strong>"));
        assert!(lines[2].contains("2. <strong>Beta</strong> with 8 wins"));
        assert!(lines[3].contains("3. <strong>Gamma</strong> with 5 wins"));
    }

    #[test]
    fn equal_wins_share_a_rank() {
        let results = parse_results(
            "1. Alpha with 9 wins\n2. Beta with 9 wins\n3. Gamma with 2 wins\n",
        )
        .unwrap();
        let rankings = build_rankings(&results);
        let lines: Vec<&str> = rankings.lines().collect();
        assert!(lines[0].contains("class=\"rank rank-0\">1. "));
        assert!(lines[1].contains("class=\"rank rank-0\">1. "));
        assert!(lines[2].contains("class=\"rank rank-2\">3. "));
    }

    #[test]
    fn last_place_staff_still_rendered() {
        let results =
            parse_results("1. Alpha with 9 wins\n2. <staff solution> with 1 wins\n").unwrap();
        let rankings = build_rankings(&results);
        assert!(rankings.lines().last().unwrap().contains("rank-staff"));
    }

    #[test]
    fn render_substitutes_all_markers() {
        let results = parse_results(RESULTS).unwrap();
        let html = render_report(
            "<ol>{%RANKINGS%}</ol>|{%TIMESTAMP%}|{%TEAMS%}|{%WINRATE_MATRIX%}",
            &results,
            "2018-11-02 12:00:00",
        );
        assert!(html.contains("<strong>Alpha</strong>"));
        assert!(html.contains("|2018-11-02 12:00:00|"));
        assert!(html.contains("['Alpha', '&lt;staff solution&gt;', 'Beta', 'Gamma']"));
        assert!(html.contains("[0.25, 1.0, 0.5, 0.8]"));
    }
}
