//! The `eysh mentors` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use eysh_core::mentor::rank_mentors;
use eysh_core::model::{MentorProfile, StudentProfile};
use eysh_core::report::load_json;

pub fn execute(
    student_path: PathBuf,
    mentors_path: PathBuf,
    subject: Option<String>,
    top: usize,
) -> Result<()> {
    use comfy_table::{Cell, Table};

    anyhow::ensure!(top >= 1, "top must be at least 1");

    let student: StudentProfile = load_json(&student_path).context("failed to load student")?;
    let mut mentors: Vec<MentorProfile> =
        load_json(&mentors_path).context("failed to load mentors")?;

    if let Some(subject) = &subject {
        mentors.retain(|m| m.subjects.iter().any(|s| s == subject));
    }

    if mentors.is_empty() {
        println!("No matching mentors.");
        return Ok(());
    }

    let ranked = rank_mentors(&student, &mentors);

    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "Mentor",
        "University",
        "Shared subjects",
        "Rating",
        "Score",
    ]);
    for (i, r) in ranked.iter().take(top).enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&r.mentor.user_name),
            Cell::new(&r.mentor.university),
            Cell::new(r.shared_subjects.join(", ")),
            Cell::new(format!("{:.1} ({})", r.mentor.rating, r.mentor.review_count)),
            Cell::new(format!("{:.1}", r.score)),
        ]);
    }

    println!("{table}");
    Ok(())
}
