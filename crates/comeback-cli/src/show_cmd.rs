use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use comeback_core::ComebackPlan;
use comeback_core::export::parse_text;
use comeback_core::progress::CompletionTracker;

/// Plan summary with a checkbox per day and the progress line.
pub fn render_progress(plan: &ComebackPlan, tracker: &CompletionTracker) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ROAST: {}", plan.roast);
    let _ = writeln!(out, "REALITY CHECK: {}", plan.reality_check);
    let _ = writeln!(out);
    for task in &plan.daily_plan {
        let mark = if tracker.is_completed(task.day) { "x" } else { " " };
        let _ = writeln!(out, "[{mark}] Day {}: {}", task.day, task.task);
        if !task.resource.is_empty() {
            let _ = writeln!(out, "      {}", task.resource);
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "\"{}\"", plan.final_quote);
    let _ = writeln!(out, "{}", tracker.progress_label());
    out
}

/// Load an exported plan and mark `done` days as completed.
pub fn load_with_progress(path: &Path, done: &[u32]) -> Result<(ComebackPlan, CompletionTracker)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read plan file {}", path.display()))?;
    let plan = parse_text(&text).with_context(|| format!("failed to parse plan file {}", path.display()))?;

    let mut tracker = CompletionTracker::new(plan.days());
    for &day in done {
        if !tracker.is_completed(day) {
            tracker.toggle(day)?;
        }
    }
    Ok((plan, tracker))
}

pub fn run_show(path: &Path, done: &[u32]) -> Result<()> {
    let (plan, tracker) = load_with_progress(path, done)?;
    print!("{}", render_progress(&plan, &tracker));
    Ok(())
}

#[cfg(test)]
mod tests {
    use comeback_core::export::render_text;
    use comeback_core::plan::DayTask;

    use super::*;

    fn plan() -> ComebackPlan {
        ComebackPlan {
            roast: "Couch, meet champion.".to_string(),
            reality_check: "A week is short.".to_string(),
            daily_plan: (1..=7)
                .map(|day| DayTask {
                    day,
                    task: format!("Walk {day} km"),
                    resource: if day == 1 { "https://example.com".to_string() } else { String::new() },
                    motivation: "Keep going".to_string(),
                })
                .collect(),
            final_quote: "Start where you are.".to_string(),
        }
    }

    fn write_plan(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("plan.txt");
        std::fs::write(&path, render_text(&plan())).unwrap();
        path
    }

    #[test]
    fn marks_completed_days() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_plan(&tmp);

        let (loaded, tracker) = load_with_progress(&path, &[2, 5, 5]).unwrap();
        assert_eq!(loaded, plan());
        assert_eq!(tracker.completed_days(), vec![2, 5]);

        let out = render_progress(&loaded, &tracker);
        assert!(out.contains("[x] Day 2: Walk 2 km"));
        assert!(out.contains("[ ] Day 3: Walk 3 km"));
        assert!(out.contains("      https://example.com"));
        assert!(out.ends_with("Progress: 2/7 days completed\n"));
    }

    #[test]
    fn unknown_day_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_plan(&tmp);
        assert!(load_with_progress(&path, &[8]).is_err());
    }

    #[test]
    fn non_plan_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "shopping list\n").unwrap();
        let err = load_with_progress(&path, &[]).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse plan file"));
    }
}
