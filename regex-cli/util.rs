use std::{
    fmt::Debug,
    io::{self, Write},
    time::{Duration, Instant},
};

use {
    regex_graph::{
        graph::{Graph, TagTracker},
        Span,
    },
    tabwriter::{Alignment, TabWriter},
    unicode_width::UnicodeWidthStr,
};

/// Run `build` and report how long it took along with its result.
pub fn timed_build<T, E>(
    build: impl FnOnce() -> Result<T, E>,
) -> Result<(T, Duration), E> {
    let (result, time) = timed(build);
    Ok((result?, time))
}

pub fn timed<T>(run: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let t = run();
    (t, start.elapsed())
}

/// Print `input` and, below it, a line that marks each span with `^`.
///
/// Spans are byte offsets into `input` and must be sorted and disjoint, as
/// the spans yielded by a left to right search are. An empty span is drawn
/// as a single `|` in the column where it occurs. An empty input is shown
/// as `<empty>`.
pub fn print_marked<W: io::Write>(
    mut wtr: W,
    input: &str,
    spans: &[Span<usize>],
) -> io::Result<()> {
    let shown = if input.is_empty() { "<empty>" } else { input };
    writeln!(wtr, "{}", shown)?;
    let mut marks = String::new();
    let mut at = 0;
    for span in spans {
        let gap = input.get(at..span.start).map_or(0, |s| s.width());
        marks.push_str(&" ".repeat(gap));
        if span.is_empty() {
            let rest = &input[span.start..];
            let len = rest.chars().next().map_or(0, char::len_utf8);
            marks.push('|');
            marks.push_str(&" ".repeat(rest[..len].width().saturating_sub(1)));
            at = span.start + len;
        } else {
            let width = input[span.range()].width().max(1);
            marks.push_str(&"^".repeat(width));
            at = span.end;
        }
    }
    writeln!(wtr, "{}", marks.trim_end())
}

/// Print the span and text captured by every tag of `graph`, in tag order.
///
/// Tags that did not participate are listed as `NONE` only if `verbose` is
/// set.
pub fn print_tags<W: io::Write>(
    wtr: W,
    graph: &Graph,
    tags: &[TagTracker<usize>],
    input: &str,
    verbose: bool,
) -> io::Result<()> {
    let mut wtr = TabWriter::new(wtr);
    for (name, tracker) in graph.tags().names().zip(tags) {
        match tracker.span() {
            Some(span) => {
                let text = &input[span.range()];
                writeln!(wtr, "  {}:\t{:?}\t{:?}", name, span, text)?;
            }
            None if verbose => writeln!(wtr, "  {}:\tNONE", name)?,
            None => {}
        }
    }
    wtr.flush()
}

/// The right aligned `label: value` summary each command prints before its
/// per-input results.
#[derive(Debug, Default)]
pub struct Report {
    rows: Vec<(&'static str, String)>,
}

impl Report {
    pub fn new() -> Report {
        Report::default()
    }

    pub fn add<D: Debug>(&mut self, label: &'static str, value: D) {
        self.rows.push((label, format!("{:?}", value)));
    }

    /// Add rows describing the size and shape of a compiled graph.
    pub fn add_graph(&mut self, graph: &Graph) {
        self.add("states", graph.states().len());
        self.add("tags", graph.tags().len());
        self.add("traps", graph.trap_len());
        let prefix = graph
            .literal_prefix()
            .map(|chars| chars.iter().collect::<String>());
        self.add("literal prefix", prefix);
    }

    pub fn print<W: io::Write>(&self, wtr: W) -> io::Result<()> {
        let mut wtr = TabWriter::new(wtr).alignment(Alignment::Right);
        for &(label, ref value) in self.rows.iter() {
            writeln!(wtr, "{}:\t{}", label, value)?;
        }
        wtr.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(input: &str, spans: &[(usize, usize)]) -> String {
        let spans: Vec<Span<usize>> = spans
            .iter()
            .map(|&(start, end)| Span { start, end })
            .collect();
        let mut out = vec![];
        print_marked(&mut out, input, &spans).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn marks_spans_by_column() {
        assert_eq!("xabyab\n ^^ ^^\n", marked("xabyab", &[(1, 3), (4, 6)]));
        assert_eq!("éab\n ^^\n", marked("éab", &[(2, 4)]));
        assert_eq!("ab\n| |\n", marked("ab", &[(0, 0), (2, 2)]));
        assert_eq!("<empty>\n|\n", marked("", &[(0, 0)]));
        assert_eq!("ab\n\n", marked("ab", &[]));
    }
}
