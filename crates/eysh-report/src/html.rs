//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use eysh_core::model::{topic_display_name, Level, Locale};
use eysh_core::report::StudyReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn topic_list(topics: &[String], locale: Locale) -> String {
    topics
        .iter()
        .map(|t| html_escape(&topic_display_name(t, locale)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Generate an HTML report for one student.
pub fn generate_html(report: &StudyReport, locale: Locale) -> String {
    let outcome = &report.outcome;
    let roadmap = &report.roadmap;
    let student_name = if report.student.name.is_empty() {
        &report.student.user_id
    } else {
        &report.student.name
    };

    let mut html = String::new();

    html.push_str(&format!("<!DOCTYPE html>\n<html lang=\"{locale}\">\n<head>\n"));
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>eysh study plan: {}</title>\n",
        html_escape(student_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>eysh study plan</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Student: <strong>{}</strong> | target {} | {}</p>\n",
        html_escape(student_name),
        roadmap.target_score,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Assessment
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Assessment</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Score</th><th>Correct</th><th>Level</th><th>Hours / week</th><th>Weeks</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{:.1}%</td><td>{}/{}</td><td>{}</td><td>{:.1}</td><td>{}</td></tr></tbody>\n",
        outcome.score,
        outcome.correct_count,
        outcome.total_questions,
        outcome.predicted_level,
        roadmap.recommended_hours_per_week,
        roadmap.weeks.len(),
    ));
    html.push_str("</table>\n");
    html.push_str(&level_meter(outcome.predicted_level));

    if outcome.weak_topics.is_empty() {
        html.push_str("<p>No weak topics detected.</p>\n");
    } else {
        html.push_str(&format!(
            "<p>Weak topics: <strong>{}</strong></p>\n",
            topic_list(&outcome.weak_topics, locale)
        ));
    }
    html.push_str("</section>\n");

    // Roadmap
    html.push_str("<section class=\"roadmap\">\n");
    html.push_str("<h2>Roadmap</h2>\n");
    html.push_str(&format!(
        "<div class=\"progress\"><div class=\"bar\" style=\"width: {:.0}%\"></div></div>\n<p>{:.0}% complete ({}/{} weeks)</p>\n",
        roadmap.progress.clamp(0.0, 100.0),
        roadmap.progress,
        roadmap.completed_weeks(),
        roadmap.weeks.len()
    ));
    html.push_str("<table class=\"weeks\">\n");
    html.push_str("<thead><tr><th>Week</th><th>Topic</th><th>Goals</th><th>Resources</th><th>Done</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for week in &roadmap.weeks {
        let class = if week.completed { "done" } else { "todo" };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            week.week_number,
            topic_list(&week.topics, locale),
            bullet_list(&week.goals),
            bullet_list(&week.resources),
            if week.completed { "✓" } else { "" },
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Mentors
    if !report.mentors.is_empty() {
        html.push_str("<section class=\"mentors\">\n");
        html.push_str("<h2>Recommended mentors</h2>\n");
        html.push_str("<table>\n");
        html.push_str("<thead><tr><th>Mentor</th><th>University</th><th>Shared subjects</th><th>Rating</th><th>Match</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for ranked in &report.mentors {
            let m = &ranked.mentor;
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.1} ({})</td><td>{:.1}</td></tr>\n",
                html_escape(&m.user_name),
                html_escape(&m.university),
                html_escape(&ranked.shared_subjects.join(", ")),
                m.rating,
                m.review_count,
                ranked.score,
            ));
        }
        html.push_str("</tbody></table>\n");
        html.push_str("</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut ul = String::from("<ul>");
    for item in items {
        ul.push_str(&format!("<li>{}</li>", html_escape(item)));
    }
    ul.push_str("</ul>");
    ul
}

/// Ten-segment SVG meter with the first `level` segments filled.
fn level_meter(level: Level) -> String {
    let segment = 32;
    let gap = 4;
    let height = 20;
    let max = usize::from(Level::MAX.get());
    let filled = usize::from(level.get()).min(max);

    let color = if filled >= 8 {
        "#22c55e"
    } else if filled >= 5 {
        "#eab308"
    } else {
        "#ef4444"
    };

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        max * (segment + gap),
        height
    );
    for i in 0..max {
        let fill = if i < filled { color } else { "var(--border)" };
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"3\"/>\n",
            i * (segment + gap),
            segment,
            height,
            fill
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &StudyReport, locale: Locale, path: &Path) -> Result<()> {
    let html = generate_html(report, locale);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --done: #dcfce7; --accent: #2563eb; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --done: #064e3b; --accent: #60a5fa; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); }
td ul { margin: 0; padding-left: 1.2rem; }
.done { background: var(--done); }
.progress { width: 100%; max-width: 480px; height: 14px; background: var(--border); border-radius: 7px; overflow: hidden; }
.progress .bar { height: 100%; background: var(--accent); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
