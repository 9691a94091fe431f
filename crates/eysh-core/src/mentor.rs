//! Mentor matching.

use serde::{Deserialize, Serialize};

use crate::model::{MentorProfile, StudentProfile};

/// Weight of each shared subject relative to one rating point.
pub const SUBJECT_OVERLAP_WEIGHT: f64 = 10.0;

/// A mentor together with its match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMentor {
    pub score: f64,
    pub shared_subjects: Vec<String>,
    pub mentor: MentorProfile,
}

/// Subjects the student and mentor have in common, in the mentor's order.
pub fn shared_subjects(student: &StudentProfile, mentor: &MentorProfile) -> Vec<String> {
    let mut shared: Vec<String> = Vec::new();
    for subject in &mentor.subjects {
        if student.subjects.contains(subject) && !shared.contains(subject) {
            shared.push(subject.clone());
        }
    }
    shared
}

/// `10 × |shared subjects| + rating`.
pub fn match_score(student: &StudentProfile, mentor: &MentorProfile) -> f64 {
    shared_subjects(student, mentor).len() as f64 * SUBJECT_OVERLAP_WEIGHT + mentor.rating
}

/// Score every mentor and order best-first. Equal scores keep roster order.
pub fn rank_mentors(student: &StudentProfile, mentors: &[MentorProfile]) -> Vec<RankedMentor> {
    let mut ranked: Vec<RankedMentor> = mentors
        .iter()
        .map(|mentor| {
            let shared = shared_subjects(student, mentor);
            RankedMentor {
                score: shared.len() as f64 * SUBJECT_OVERLAP_WEIGHT + mentor.rating,
                shared_subjects: shared,
                mentor: mentor.clone(),
            }
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
