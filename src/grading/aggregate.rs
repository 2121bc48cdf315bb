use crate::grading::types::{EnrollmentRecord, GradePair, SLOT_COUNT, StudentAggregate};
use anyhow::{Result, bail};
use std::collections::HashMap;
use tracing::debug;

/// Per-student grade map built course by course.
///
/// Students are kept in the order they first appear across the course
/// sequence, and that order is the row order of the final acta.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Roster {
    students: Vec<StudentAggregate>,
    index: HashMap<String, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one course's enrollments into the roster under `slot` (1-based).
    ///
    /// Names and email come from the course that first introduced the student.
    /// A repeated identity within the same course overwrites that slot.
    pub fn add_course(&mut self, slot: usize, records: &[EnrollmentRecord]) -> Result<()> {
        if !(1..=SLOT_COUNT).contains(&slot) {
            bail!("course slot {slot} out of range 1..={SLOT_COUNT}");
        }

        let mut added = 0usize;
        for record in records {
            let position = match self.index.get(&record.identity) {
                Some(&position) => position,
                None => {
                    self.students.push(StudentAggregate::from_record(record));
                    self.index
                        .insert(record.identity.clone(), self.students.len() - 1);
                    added += 1;
                    self.students.len() - 1
                }
            };

            self.students[position].slots[slot - 1] = Some(GradePair {
                final_grade: record.final_grade,
                current_grade: record.current_grade,
            });
        }

        debug!(
            slot,
            records = records.len(),
            new_students = added,
            "Course folded into roster"
        );
        Ok(())
    }

    pub fn get(&self, identity: &str) -> Option<&StudentAggregate> {
        self.index.get(identity).map(|&i| &self.students[i])
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StudentAggregate> {
        self.students.iter()
    }
}

/// Builds a roster from the course enrollment lists given in slot order.
///
/// Fails when more than [`SLOT_COUNT`] lists are given.
pub fn aggregate_courses(courses: &[Vec<EnrollmentRecord>]) -> Result<Roster> {
    let mut roster = Roster::new();
    for (i, records) in courses.iter().enumerate() {
        roster.add_course(i + 1, records)?;
    }
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(identity: &str, given: &str, final_grade: Option<f64>) -> EnrollmentRecord {
        EnrollmentRecord {
            identity: identity.to_string(),
            given_name: given.to_string(),
            family_name: "Rojas".to_string(),
            email: format!("{given}@example.com").to_lowercase(),
            final_grade,
            current_grade: final_grade,
        }
    }

    #[test]
    fn test_students_keep_first_seen_order() {
        let roster = aggregate_courses(&[
            vec![record("2", "Bea", Some(5.0))],
            vec![record("1", "Ana", Some(6.0)), record("2", "Bea", Some(4.5))],
        ])
        .unwrap();

        let ids: Vec<_> = roster.iter().map(|s| s.identity.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_first_course_wins_for_names() {
        let mut later = record("7", "Renamed", Some(5.0));
        later.email = "other@example.com".to_string();

        let roster =
            aggregate_courses(&[vec![record("7", "Carla", Some(6.0))], vec![later]]).unwrap();

        let student = roster.get("7").unwrap();
        assert_eq!(student.given_name, "Carla");
        assert_eq!(student.email, "carla@example.com");
        assert_eq!(student.slots[1].unwrap().final_grade, Some(5.0));
    }

    #[test]
    fn test_absent_slot_differs_from_null_grades() {
        let roster = aggregate_courses(&[
            vec![record("9", "Dana", None)],
            vec![],
            vec![record("9", "Dana", Some(4.0))],
        ])
        .unwrap();

        let student = roster.get("9").unwrap();
        assert_eq!(student.slots[0], Some(GradePair::default()));
        assert_eq!(student.slots[1], None);
        assert!(student.slots[2].is_some());
        assert_eq!(student.slots[3], None);
        assert_eq!(student.slots[4], None);
    }

    #[test]
    fn test_duplicate_in_same_course_overwrites_slot() {
        let mut roster = Roster::new();
        roster
            .add_course(
                1,
                &[record("3", "Eva", Some(3.0)), record("3", "Eva", Some(6.5))],
            )
            .unwrap();

        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get("3").unwrap().slots[0].unwrap().final_grade, Some(6.5));
    }

    #[test]
    fn test_out_of_range_slot_rejected() {
        let mut roster = Roster::new();
        assert!(roster.add_course(0, &[record("1", "Ana", Some(5.0))]).is_err());
        assert!(roster.add_course(SLOT_COUNT + 1, &[]).is_err());
        assert!(roster.is_empty());

        let six = vec![Vec::new(); SLOT_COUNT + 1];
        assert!(aggregate_courses(&six).is_err());
    }
}
