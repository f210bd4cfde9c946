//! Plain-text export of a comeback plan, and the matching reader.
//!
//! Layout (one value per line, sections separated by blank lines):
//!
//! ```text
//! 🎯 COMEBACK PLAN
//!
//! 🔥 ROAST:
//! <roast>
//!
//! 🪞 REALITY CHECK:
//! <realityCheck>
//!
//! 📅 DAILY PLAN:
//! Day 1: <task>
//! Resource: <resource>
//! <motivation>
//!
//! 💬 FINAL QUOTE:
//! <finalQuote>
//! ```
//!
//! Backslashes and line breaks inside values are escaped (`\\`, `\n`,
//! `\r`) so that [`parse_text`] reproduces every field exactly.

use thiserror::Error;

use crate::plan::{ComebackPlan, DayTask};

/// Suggested file name for exported plans.
pub const DEFAULT_FILE_NAME: &str = "comeback-plan.txt";

const TITLE: &str = "🎯 COMEBACK PLAN";
const ROAST_HEADER: &str = "🔥 ROAST:";
const REALITY_HEADER: &str = "🪞 REALITY CHECK:";
const DAILY_HEADER: &str = "📅 DAILY PLAN:";
const QUOTE_HEADER: &str = "💬 FINAL QUOTE:";
const RESOURCE_PREFIX: &str = "Resource: ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportParseError {
    #[error("line {line}: expected {expected:?}, found {found:?}")]
    UnexpectedLine {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("unexpected end of file, expected {0}")]
    UnexpectedEnd(String),

    #[error("line {line}: expected day {expected}")]
    BadDayNumber { line: usize, expected: u32 },

    #[error("line {line}: trailing content after final quote")]
    TrailingContent { line: usize },
}

/// Render `plan` in the export layout.
pub fn render_text(plan: &ComebackPlan) -> String {
    let mut out = String::new();
    push_section(&mut out, TITLE, None);
    push_section(&mut out, ROAST_HEADER, Some(&plan.roast));
    push_section(&mut out, REALITY_HEADER, Some(&plan.reality_check));

    out.push_str(DAILY_HEADER);
    out.push('\n');
    for task in &plan.daily_plan {
        out.push_str(&format!("Day {}: {}\n", task.day, escape(&task.task)));
        out.push_str(&format!("{RESOURCE_PREFIX}{}\n", escape(&task.resource)));
        out.push_str(&escape(&task.motivation));
        out.push_str("\n\n");
    }

    out.push_str(QUOTE_HEADER);
    out.push('\n');
    out.push_str(&escape(&plan.final_quote));
    out.push('\n');
    out
}

fn push_section(out: &mut String, header: &str, body: Option<&str>) {
    out.push_str(header);
    out.push('\n');
    if let Some(body) = body {
        out.push_str(&escape(body));
        out.push('\n');
    }
    out.push('\n');
}

/// Parse text produced by [`render_text`].
pub fn parse_text(text: &str) -> Result<ComebackPlan, ExportParseError> {
    let mut cursor = Cursor::new(text);

    cursor.expect_exact(TITLE)?;
    cursor.expect_exact("")?;

    cursor.expect_exact(ROAST_HEADER)?;
    let roast = unescape(cursor.next_line("roast")?);
    cursor.expect_exact("")?;

    cursor.expect_exact(REALITY_HEADER)?;
    let reality_check = unescape(cursor.next_line("reality check")?);
    cursor.expect_exact("")?;

    cursor.expect_exact(DAILY_HEADER)?;
    let mut daily_plan = Vec::new();
    loop {
        let line_no = cursor.line_no();
        let line = cursor.next_line("day entry or final quote header")?;
        if line == QUOTE_HEADER {
            break;
        }

        let expected = daily_plan.len() as u32 + 1;
        let prefix = format!("Day {expected}: ");
        let task = line
            .strip_prefix(&prefix)
            .ok_or(ExportParseError::BadDayNumber {
                line: line_no,
                expected,
            })?;

        let resource_no = cursor.line_no();
        let resource_line = cursor.next_line("resource line")?;
        let resource = resource_line.strip_prefix(RESOURCE_PREFIX).ok_or_else(|| {
            ExportParseError::UnexpectedLine {
                line: resource_no,
                expected: format!("{RESOURCE_PREFIX}..."),
                found: resource_line.to_string(),
            }
        })?;

        let motivation = cursor.next_line("motivation")?;
        cursor.expect_exact("")?;

        daily_plan.push(DayTask {
            day: expected,
            task: unescape(task),
            resource: unescape(resource),
            motivation: unescape(motivation),
        });
    }

    let final_quote = unescape(cursor.next_line("final quote")?);
    cursor.expect_end()?;

    Ok(ComebackPlan {
        roast,
        reality_check,
        daily_plan,
        final_quote,
    })
}

struct Cursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.split('\n').collect(),
            pos: 0,
        }
    }

    /// 1-based number of the next line.
    fn line_no(&self) -> usize {
        self.pos + 1
    }

    fn next_line(&mut self, what: &str) -> Result<&'a str, ExportParseError> {
        let line = self
            .lines
            .get(self.pos)
            .copied()
            .ok_or_else(|| ExportParseError::UnexpectedEnd(what.to_string()))?;
        self.pos += 1;
        Ok(line)
    }

    fn expect_exact(&mut self, expected: &str) -> Result<(), ExportParseError> {
        let line_no = self.line_no();
        let what = if expected.is_empty() { "blank line" } else { expected };
        let line = self.next_line(what)?;
        if line != expected {
            return Err(ExportParseError::UnexpectedLine {
                line: line_no,
                expected: expected.to_string(),
                found: line.to_string(),
            });
        }
        Ok(())
    }

    /// Only blank lines may follow the final quote.
    fn expect_end(&self) -> Result<(), ExportParseError> {
        match self.lines[self.pos..].iter().position(|l| !l.is_empty()) {
            Some(offset) => Err(ExportParseError::TrailingContent {
                line: self.pos + offset + 1,
            }),
            None => Ok(()),
        }
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            // Not produced by `escape`; keep hand-edited text as written.
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> ComebackPlan {
        ComebackPlan {
            roast: "You binged 40 episodes.".to_string(),
            reality_check: "Seven days won't make you an athlete.\nBut it's a start.".to_string(),
            daily_plan: (1..=7)
                .map(|d| DayTask {
                    day: d,
                    task: format!("Walk {d} km"),
                    resource: if d == 2 {
                        String::new()
                    } else {
                        "https://example.com/run".to_string()
                    },
                    motivation: format!("Day {d}\\{d}: keep going"),
                })
                .collect(),
            final_quote: "The best time is now.".to_string(),
        }
    }

    #[test]
    fn round_trip_is_lossless() {
        let plan = sample_plan();
        let text = render_text(&plan);
        let parsed = parse_text(&text).expect("export should parse back");
        assert_eq!(parsed, plan);
    }

    #[test]
    fn layout_is_human_readable() {
        let text = render_text(&sample_plan());
        assert!(text.starts_with("🎯 COMEBACK PLAN\n\n🔥 ROAST:\nYou binged 40 episodes.\n"));
        assert!(text.contains("📅 DAILY PLAN:\nDay 1: Walk 1 km\nResource: https://example.com/run\n"));
        assert!(text.ends_with("💬 FINAL QUOTE:\nThe best time is now.\n"));
    }

    #[test]
    fn newlines_in_values_are_escaped() {
        let text = render_text(&sample_plan());
        assert!(text.contains("athlete.\\nBut"));
    }

    #[test]
    fn round_trip_with_tricky_text() {
        let mut plan = sample_plan();
        plan.roast = "Day 1: not a day line\n\n💬 FINAL QUOTE:".to_string();
        plan.daily_plan[0].motivation = String::new();
        plan.daily_plan[3].task = "ends with backslash \\".to_string();
        plan.final_quote = "\\n is not a newline".to_string();
        assert_eq!(parse_text(&render_text(&plan)).unwrap(), plan);
    }

    #[test]
    fn tolerates_missing_final_newline() {
        let plan = sample_plan();
        let text = render_text(&plan);
        assert_eq!(parse_text(text.trim_end()).unwrap(), plan);
    }

    #[test]
    fn rejects_out_of_order_days() {
        let text = render_text(&sample_plan()).replace("Day 3: ", "Day 4: ");
        let err = parse_text(&text).unwrap_err();
        assert!(
            matches!(err, ExportParseError::BadDayNumber { expected: 3, .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn rejects_truncated_file() {
        let text = render_text(&sample_plan());
        let day_line = "Day 5: Walk 5 km";
        let cut = &text[..text.find(day_line).unwrap() + day_line.len()];
        assert!(matches!(
            parse_text(cut).unwrap_err(),
            ExportParseError::UnexpectedEnd(_)
        ));
    }

    #[test]
    fn rejects_trailing_content() {
        let text = format!("{}\nextra\n", render_text(&sample_plan()));
        assert!(matches!(
            parse_text(&text).unwrap_err(),
            ExportParseError::TrailingContent { .. }
        ));
    }

    #[test]
    fn rejects_wrong_title() {
        let err = parse_text("PLAN\n").unwrap_err();
        assert!(matches!(err, ExportParseError::UnexpectedLine { line: 1, .. }));
    }
}
