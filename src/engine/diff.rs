/// Above this many LCS cells the middle section is reported as one
/// removed/added pair instead of a minimal script.
const MAX_TABLE_CELLS: usize = 4_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffKind {
    Equal,
    /// Present in the reference but missing from the attempt.
    Added,
    /// Typed in the attempt but not part of the reference.
    Removed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffRun {
    pub kind: DiffKind,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DiffOp {
    Equal,
    Insert,
    Delete,
}

/// Character-level edit script turning `attempt` into `reference`.
///
/// Runs are maximal: no two neighbours share a kind, and inside a change
/// block the removed text comes before the added text.
pub fn highlight(attempt: &str, reference: &str) -> Vec<DiffRun> {
    let old: Vec<char> = attempt.chars().collect();
    let new: Vec<char> = reference.chars().collect();

    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut ops = vec![DiffOp::Equal; prefix];
    if (old_mid.len() + 1).saturating_mul(new_mid.len() + 1) > MAX_TABLE_CELLS {
        tracing::warn!(
            old_len = old_mid.len(),
            new_len = new_mid.len(),
            "diff input too large, reporting a single replacement"
        );
        ops.extend(std::iter::repeat_n(DiffOp::Delete, old_mid.len()));
        ops.extend(std::iter::repeat_n(DiffOp::Insert, new_mid.len()));
    } else {
        let table = lcs_table(old_mid, new_mid);
        ops.extend(build_ops(old_mid, new_mid, &table));
    }
    ops.extend(std::iter::repeat_n(DiffOp::Equal, suffix));

    collect_runs(&old, &new, &ops)
}

/// `table[i][j]` is the LCS length of `old[i..]` and `new[j..]`.
fn lcs_table(old: &[char], new: &[char]) -> Vec<Vec<u32>> {
    let mut table = vec![vec![0u32; new.len() + 1]; old.len() + 1];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            table[i][j] = if old[i] == new[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }
    table
}

fn build_ops(old: &[char], new: &[char], table: &[Vec<u32>]) -> Vec<DiffOp> {
    let mut ops = Vec::with_capacity(old.len() + new.len());
    let (mut i, mut j) = (0, 0);
    while i < old.len() && j < new.len() {
        if old[i] == new[j] {
            ops.push(DiffOp::Equal);
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            ops.push(DiffOp::Delete);
            i += 1;
        } else {
            ops.push(DiffOp::Insert);
            j += 1;
        }
    }
    ops.extend(std::iter::repeat_n(DiffOp::Delete, old.len() - i));
    ops.extend(std::iter::repeat_n(DiffOp::Insert, new.len() - j));
    ops
}

fn collect_runs(old: &[char], new: &[char], ops: &[DiffOp]) -> Vec<DiffRun> {
    let mut runs = Vec::new();
    let mut equal = String::new();
    let mut removed = String::new();
    let mut added = String::new();
    let (mut i, mut j) = (0, 0);

    for op in ops {
        match op {
            DiffOp::Equal => {
                flush_change(&mut runs, &mut removed, &mut added);
                equal.push(old[i]);
                i += 1;
                j += 1;
            }
            DiffOp::Delete => {
                flush_equal(&mut runs, &mut equal);
                removed.push(old[i]);
                i += 1;
            }
            DiffOp::Insert => {
                flush_equal(&mut runs, &mut equal);
                added.push(new[j]);
                j += 1;
            }
        }
    }
    flush_equal(&mut runs, &mut equal);
    flush_change(&mut runs, &mut removed, &mut added);
    runs
}

fn flush_equal(runs: &mut Vec<DiffRun>, equal: &mut String) {
    if !equal.is_empty() {
        runs.push(DiffRun {
            kind: DiffKind::Equal,
            text: std::mem::take(equal),
        });
    }
}

fn flush_change(runs: &mut Vec<DiffRun>, removed: &mut String, added: &mut String) {
    if !removed.is_empty() {
        runs.push(DiffRun {
            kind: DiffKind::Removed,
            text: std::mem::take(removed),
        });
    }
    if !added.is_empty() {
        runs.push(DiffRun {
            kind: DiffKind::Added,
            text: std::mem::take(added),
        });
    }
}

/// Concatenate the runs of the given kinds, in order.
pub fn reconstruct(runs: &[DiffRun], keep: &[DiffKind]) -> String {
    runs.iter()
        .filter(|r| keep.contains(&r.kind))
        .map(|r| r.text.as_str())
        .collect()
}

/// Plain-text rendering: `[-removed-]` and `{+added+}`.
pub fn render_marked(runs: &[DiffRun]) -> String {
    let mut out = String::new();
    for run in runs {
        match run.kind {
            DiffKind::Equal => out.push_str(&run.text),
            DiffKind::Removed => {
                out.push_str("[-");
                out.push_str(&run.text);
                out.push_str("-]");
            }
            DiffKind::Added => {
                out.push_str("{+");
                out.push_str(&run.text);
                out.push_str("+}");
            }
        }
    }
    out
}

/// Number of characters inserted or deleted by the script.
pub fn edit_distance(runs: &[DiffRun]) -> usize {
    runs.iter()
        .filter(|r| r.kind != DiffKind::Equal)
        .map(|r| r.text.chars().count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(kind: DiffKind, text: &str) -> DiffRun {
        DiffRun {
            kind,
            text: text.to_string(),
        }
    }

    fn assert_round_trip(attempt: &str, reference: &str) {
        let runs = highlight(attempt, reference);
        assert_eq!(
            reconstruct(&runs, &[DiffKind::Equal, DiffKind::Removed]),
            attempt
        );
        assert_eq!(
            reconstruct(&runs, &[DiffKind::Equal, DiffKind::Added]),
            reference
        );
        for pair in runs.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind, "runs not coalesced: {runs:?}");
        }
    }

    #[test]
    fn test_identical_strings_are_one_equal_run() {
        assert_eq!(
            highlight("Tu manges", "Tu manges"),
            vec![run(DiffKind::Equal, "Tu manges")]
        );
        assert!(highlight("", "").is_empty());
    }

    #[test]
    fn test_pomme_poire() {
        let runs = highlight("Je mange une poire", "Je mange une pomme");
        assert_eq!(
            runs,
            vec![
                run(DiffKind::Equal, "Je mange une po"),
                run(DiffKind::Removed, "ir"),
                run(DiffKind::Added, "mm"),
                run(DiffKind::Equal, "e"),
            ]
        );
        assert!(runs[0].text.starts_with("Je mange une "));
    }

    #[test]
    fn test_empty_sides() {
        assert_eq!(highlight("", "abc"), vec![run(DiffKind::Added, "abc")]);
        assert_eq!(highlight("abc", ""), vec![run(DiffKind::Removed, "abc")]);
    }

    #[test]
    fn test_missing_word_is_added() {
        assert_eq!(
            highlight("I eat apples", "I often eat apples"),
            vec![
                run(DiffKind::Equal, "I "),
                run(DiffKind::Added, "often "),
                run(DiffKind::Equal, "eat apples"),
            ]
        );
    }

    #[test]
    fn test_extra_characters_are_removed() {
        assert_eq!(
            highlight("helllo", "hello"),
            vec![run(DiffKind::Equal, "hell"), run(DiffKind::Removed, "l"), run(DiffKind::Equal, "o")]
        );
    }

    #[test]
    fn test_edit_script_is_minimal() {
        // LCS("kitten", "sitting") = "ittn" (4): 2 deletions + 3 insertions
        let runs = highlight("kitten", "sitting");
        assert_eq!(edit_distance(&runs), 5);
        assert_round_trip("kitten", "sitting");
    }

    #[test]
    fn test_round_trip_on_assorted_pairs() {
        let pairs = [
            ("", ""),
            ("a", "b"),
            ("abcabba", "cbabac"),
            ("Où est la gare", "Où es la gare?"),
            ("naïve café", "naive cafe"),
            ("das ist gut", "Das ist sehr gut"),
            ("    ", " "),
        ];
        for (a, b) in pairs {
            assert_round_trip(a, b);
            assert_round_trip(b, a);
        }
    }

    #[test]
    fn test_multibyte_characters_are_atomic() {
        assert_eq!(
            highlight("日本語", "日本人"),
            vec![
                run(DiffKind::Equal, "日本"),
                run(DiffKind::Removed, "語"),
                run(DiffKind::Added, "人"),
            ]
        );
    }

    #[test]
    fn test_render_marked() {
        let runs = highlight("Je mange une poire", "Je mange une pomme");
        assert_eq!(render_marked(&runs), "Je mange une po[-ir-]{+mm+}e");
    }
}
