//! The `adaptest report` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use adaptest_core::report::SessionReport;

pub fn execute(report_path: PathBuf) -> Result<()> {
    let report = SessionReport::load_json(&report_path)?;
    print_report(&report);
    Ok(())
}

/// Render a session report to stdout. Shared with `adaptest run`.
pub fn print_report(report: &SessionReport) {
    let mut summary = Table::new();
    summary.set_header(vec!["Metric", "Value"]);
    summary.add_row(vec![
        Cell::new("Total points"),
        Cell::new(report.total_points),
    ]);
    summary.add_row(vec![
        Cell::new("Answered"),
        Cell::new(format!("{}/{}", report.correct, report.attempted)),
    ]);
    summary.add_row(vec![
        Cell::new("Accuracy"),
        Cell::new(format!("{:.1}%", report.accuracy_pct)),
    ]);
    summary.add_row(vec![
        Cell::new("Average difficulty"),
        Cell::new(format!("{:.2}", report.avg_difficulty)),
    ]);
    summary.add_row(vec![
        Cell::new("Fastest answer"),
        Cell::new(format!("{:.1}s", report.fastest_time_secs)),
    ]);
    summary.add_row(vec![
        Cell::new("Slowest answer"),
        Cell::new(format!("{:.1}s", report.slowest_time_secs)),
    ]);
    summary.add_row(vec![
        Cell::new("Final ability"),
        Cell::new(format!("{:.2}", report.final_ability)),
    ]);
    println!("{summary}");

    if report.weak_topics.is_empty() {
        println!("\nNo weak topics — every answer was correct.");
    } else {
        println!("\nTopics to review:");
        for topic in &report.weak_topics {
            println!("  - {topic}");
        }
    }

    let mut history = Table::new();
    history.set_header(vec!["#", "Topic", "Difficulty", "Correct", "Time", "Points"]);
    for r in &report.history {
        history.add_row(vec![
            Cell::new(r.sequence),
            Cell::new(&r.topic),
            Cell::new(format!("{:.2}", r.difficulty)),
            Cell::new(if r.is_correct { "yes" } else { "no" }),
            Cell::new(format!("{:.1}s", r.time_taken_secs)),
            Cell::new(r.points_earned),
        ]);
    }
    println!("\n{history}");
}
