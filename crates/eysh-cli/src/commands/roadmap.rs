//! The `eysh roadmap` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use eysh_core::model::{topic_display_name, Locale, MentorProfile, StudentProfile};
use eysh_core::report::{load_json, StudyReport};
use eysh_core::roadmap::RoadmapRequest;
use eysh_models::config::load_config_from;
use eysh_report::{write_html_report, write_markdown_report};

use crate::commands::build_engine;
use crate::session::SessionFile;

pub struct RoadmapArgs {
    pub session: PathBuf,
    pub bank: Option<PathBuf>,
    pub student: Option<PathBuf>,
    pub mentors: Option<PathBuf>,
    pub weeks: Option<u32>,
    pub target_score: Option<u32>,
    pub locale: Option<String>,
    pub output: Option<PathBuf>,
    pub format: String,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: RoadmapArgs) -> Result<()> {
    if let Some(weeks) = args.weeks {
        anyhow::ensure!(weeks >= 1, "weeks must be at least 1");
    }

    let config = load_config_from(args.config.as_deref())?;
    let locale = match &args.locale {
        Some(l) => l.parse::<Locale>().map_err(anyhow::Error::msg)?,
        None => config.locale,
    };

    let session = SessionFile::load(&args.session)?;
    let graded = session.grade(args.bank.as_deref())?;

    let student = match &args.student {
        Some(path) => load_json::<StudentProfile>(path).context("failed to load student")?,
        None => StudentProfile {
            user_id: session.user_id.clone(),
            name: String::new(),
            subjects: vec![],
            target_score: None,
            grade: None,
        },
    };

    let engine = build_engine(&config, locale).await?;
    let outcome = engine.assess(&graded);

    let request = RoadmapRequest::new(outcome.predicted_level, outcome.weak_topics.clone())
        .with_target_score(
            args.target_score
                .or(student.target_score)
                .unwrap_or(config.default_target_score),
        )
        .with_weeks_available(args.weeks.unwrap_or(config.default_weeks_available));
    let roadmap = engine.build_roadmap(&student.user_id, &request);

    let mentors = match &args.mentors {
        Some(path) => {
            let list: Vec<MentorProfile> = load_json(path).context("failed to load mentors")?;
            engine.rank_mentors(&student, &list)
        }
        None => vec![],
    };

    let report = StudyReport::new(student, outcome, roadmap, mentors);
    print_summary(&report, locale);

    let output = args.output.unwrap_or_else(|| config.output_dir.clone());
    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let stem = if report.student.user_id.is_empty() {
        format!("plan-{timestamp}")
    } else {
        format!("plan-{}-{timestamp}", report.student.user_id)
    };

    let formats: Vec<&str> = if args.format == "all" {
        vec!["json", "html", "markdown"]
    } else {
        args.format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("{stem}.json"));
                report.save_json(&path)?;
                eprintln!("Roadmap saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("{stem}.html"));
                write_html_report(&report, locale, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("{stem}.md"));
                write_markdown_report(&report, locale, &path)?;
                eprintln!("Markdown report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

fn print_summary(report: &StudyReport, locale: Locale) {
    use comfy_table::{Cell, Table};

    let outcome = &report.outcome;
    let roadmap = &report.roadmap;
    eprintln!(
        "Level {} | score {:.1}% | {} weeks | {:.1} h/week",
        outcome.predicted_level,
        outcome.score,
        roadmap.weeks.len(),
        roadmap.recommended_hours_per_week
    );

    let mut table = Table::new();
    table.set_header(vec!["Week", "Topic", "Goals"]);
    for week in &roadmap.weeks {
        let topics: Vec<String> = week
            .topics
            .iter()
            .map(|t| topic_display_name(t, locale))
            .collect();
        table.add_row(vec![
            Cell::new(week.week_number),
            Cell::new(topics.join(", ")),
            Cell::new(week.goals.join("\n")),
        ]);
    }

    eprintln!("\n{table}");
}
