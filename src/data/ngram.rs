use std::collections::HashMap;
use std::fmt::Write;
use std::path::Path;

/// Occurrences of one n-gram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgramCount {
    pub gram: Vec<String>,
    pub count: usize,
}

impl NgramCount {
    pub fn joined(&self) -> String {
        self.gram.join(" ")
    }
}

/// Frequencies of all n-grams of one order, most common first.
///
/// Ties keep the order in which the n-grams first appear.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    pub order: usize,
    pub total: usize,
    entries: Vec<NgramCount>,
}

impl FrequencyTable {
    pub fn build(tokens: &[String], order: usize) -> Self {
        if order == 0 || tokens.len() < order {
            return Self {
                order,
                total: 0,
                entries: Vec::new(),
            };
        }

        let mut counts: HashMap<&[String], (usize, usize)> = HashMap::new();
        let windows = tokens.windows(order);
        let total = windows.len();
        for (position, window) in windows.enumerate() {
            counts.entry(window).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(&[String], usize, usize)> = counts
            .into_iter()
            .map(|(gram, (count, first))| (gram, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let entries = ranked
            .into_iter()
            .map(|(gram, count, _)| NgramCount {
                gram: gram.to_vec(),
                count,
            })
            .collect();

        Self {
            order,
            total,
            entries,
        }
    }

    pub fn unique(&self) -> usize {
        self.entries.len()
    }

    pub fn top(&self, n: usize) -> &[NgramCount] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Share of all n-grams, in percent.
    pub fn probability(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }
}

struct Section {
    title: &'static str,
    total_label: &'static str,
    top_label: &'static str,
    column: &'static str,
    width: usize,
    rule: usize,
}

const SECTIONS: [Section; 3] = [
    Section {
        title: "UNIGRAM ANALYSIS",
        total_label: "Total words (tokens)",
        top_label: "Most Common Words",
        column: "Word",
        width: 20,
        rule: 60,
    },
    Section {
        title: "BIGRAM ANALYSIS",
        total_label: "Total bigrams",
        top_label: "Most Common Word Pairs",
        column: "Bigram",
        width: 30,
        rule: 70,
    },
    Section {
        title: "TRIGRAM ANALYSIS",
        total_label: "Total trigrams",
        top_label: "Most Common Word Sequences",
        column: "Trigram",
        width: 40,
        rule: 80,
    },
];

fn render_section(out: &mut String, section: &Section, table: &FrequencyTable, top_n: usize) {
    let bar = "=".repeat(20);
    let _ = writeln!(out, "{} {} {}", bar, section.title, bar);
    let _ = writeln!(out, "{}: {}", section.total_label, table.total);
    if table.order == 1 {
        let _ = writeln!(out, "Unique words (vocabulary): {}", table.unique());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "--- Top {} {} ---", top_n, section.top_label);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<5} {:<width$} {:<10} {:<15}",
        "Rank",
        section.column,
        "Count",
        "Probability (%)",
        width = section.width
    );
    let _ = writeln!(out, "{}", "-".repeat(section.rule));

    for (rank, entry) in table.top(top_n).iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<5} {:<width$} {:<10} {:.4}%",
            rank + 1,
            entry.joined(),
            entry.count,
            table.probability(entry.count),
            width = section.width
        );
    }
}

/// Ranked unigram, bigram and trigram tables over a token stream.
pub fn render_report(tokens: &[String], top_n: usize, dataset: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "N-GRAM ANALYSIS REPORT");
    let _ = writeln!(out, "=======================");
    let _ = writeln!(out, "Dataset Folder: {}", dataset.display());

    for (order, section) in SECTIONS.iter().enumerate() {
        let table = FrequencyTable::build(tokens, order + 1);
        let _ = writeln!(out);
        render_section(&mut out, section, &table, top_n);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_unigram_counts_and_tie_order() {
        let table = FrequencyTable::build(&tokens("કોષ એકમ કોષ રુધિર એકમ કોષ વનસ્પતિ"), 1);
        assert_eq!(table.total, 7);
        assert_eq!(table.unique(), 4);

        let top = table.top(3);
        assert_eq!(top[0].joined(), "કોષ");
        assert_eq!(top[0].count, 3);
        assert_eq!(top[1].joined(), "એકમ");
        // રુધિર and વનસ્પતિ tie; રુધિર appears first.
        assert_eq!(top[2].joined(), "રુધિર");
    }

    #[test]
    fn test_bigram_and_trigram_totals() {
        let stream = tokens("a b a b a");
        let bigrams = FrequencyTable::build(&stream, 2);
        assert_eq!(bigrams.total, 4);
        assert_eq!(bigrams.top(1)[0].joined(), "a b");
        assert_eq!(bigrams.top(1)[0].count, 2);
        assert!((bigrams.probability(2) - 50.0).abs() < 1e-9);

        let trigrams = FrequencyTable::build(&stream, 3);
        assert_eq!(trigrams.total, 3);
        assert_eq!(trigrams.top(1)[0].joined(), "a b a");
    }

    #[test]
    fn test_short_stream_has_no_trigrams() {
        let table = FrequencyTable::build(&tokens("a b"), 3);
        assert_eq!(table.total, 0);
        assert!(table.top(10).is_empty());
        assert_eq!(table.probability(1), 0.0);
    }

    #[test]
    fn test_render_report_sections() {
        let report = render_report(&tokens("કોષ એકમ કોષ"), 5, Path::new("data/next"));
        assert!(report.starts_with("N-GRAM ANALYSIS REPORT\n"));
        assert!(report.contains("UNIGRAM ANALYSIS"));
        assert!(report.contains("Unique words (vocabulary): 2"));
        assert!(report.contains("Total bigrams: 2"));
        assert!(report.contains("Total trigrams: 1"));
        assert!(report.contains("66.6667%"));
    }
}
