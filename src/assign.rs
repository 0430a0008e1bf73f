//! Peer grader assignment.
//!
//! Every student grades [`GRADERS_PER_STUDENT`] others and is graded by the
//! same number of peers. The roster is shuffled once and each student is
//! given the next three students of the shuffled ring, which always
//! terminates and never assigns anyone to themself.

use anyhow::{Result, bail};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use tracing::debug;

pub const GRADERS_PER_STUDENT: usize = 3;

/// The students one grader has been asked to review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub grader: u32,
    pub gradees: [u32; GRADERS_PER_STUDENT],
}

/// Builds the grader map for `ids`, returned in roster order.
///
/// Ids must be unique; they are not deduplicated here.
///
/// # Errors
///
/// Returns an error when the roster has fewer than
/// `GRADERS_PER_STUDENT + 1` students, since no valid map exists.
pub fn assign_graders<R: Rng + ?Sized>(ids: &[u32], rng: &mut R) -> Result<Vec<Assignment>> {
    let n = ids.len();
    if n <= GRADERS_PER_STUDENT {
        bail!(
            "peer grading needs at least {} students, roster has {n}",
            GRADERS_PER_STUDENT + 1
        );
    }

    let mut ring = ids.to_vec();
    ring.shuffle(rng);
    let position: HashMap<u32, usize> = ring.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let assignments: Vec<Assignment> = ids
        .iter()
        .map(|&grader| {
            let at = position[&grader];
            Assignment {
                grader,
                gradees: std::array::from_fn(|k| ring[(at + k + 1) % n]),
            }
        })
        .collect();

    debug!(students = n, "Graders assigned");
    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn gradee_counts(assignments: &[Assignment]) -> HashMap<u32, usize> {
        let mut counts = HashMap::new();
        for a in assignments {
            for &g in &a.gradees {
                *counts.entry(g).or_insert(0) += 1;
            }
        }
        counts
    }

    #[test]
    fn test_every_student_graded_exactly_three_times() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 4..40u32 {
            let ids: Vec<u32> = (1..=n).collect();
            let assignments = assign_graders(&ids, &mut rng).unwrap();

            assert_eq!(assignments.len(), ids.len());
            let counts = gradee_counts(&assignments);
            assert_eq!(counts.len(), ids.len());
            assert!(counts.values().all(|&c| c == GRADERS_PER_STUDENT));
        }
    }

    #[test]
    fn test_no_self_grading_and_distinct_gradees() {
        let mut rng = StdRng::seed_from_u64(11);
        let ids: Vec<u32> = (100..130).collect();
        let assignments = assign_graders(&ids, &mut rng).unwrap();

        for a in &assignments {
            assert!(!a.gradees.contains(&a.grader));
            assert_ne!(a.gradees[0], a.gradees[1]);
            assert_ne!(a.gradees[0], a.gradees[2]);
            assert_ne!(a.gradees[1], a.gradees[2]);
        }
    }

    #[test]
    fn test_keys_follow_roster_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let ids = vec![9, 2, 14, 5, 7, 30];
        let assignments = assign_graders(&ids, &mut rng).unwrap();

        let keys: Vec<u32> = assignments.iter().map(|a| a.grader).collect();
        assert_eq!(keys, ids);
    }

    #[test]
    fn test_same_seed_same_assignment() {
        let ids: Vec<u32> = (1..=12).collect();
        let a = assign_graders(&ids, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = assign_graders(&ids, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_four_students_grade_everyone_else() {
        let ids = vec![1, 2, 3, 4];
        let assignments = assign_graders(&ids, &mut StdRng::seed_from_u64(0)).unwrap();

        for a in &assignments {
            let mut expected: Vec<u32> = ids.iter().copied().filter(|&i| i != a.grader).collect();
            let mut got = a.gradees.to_vec();
            expected.sort();
            got.sort();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_small_roster_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(assign_graders(&[], &mut rng).is_err());
        assert!(assign_graders(&[1], &mut rng).is_err());
        assert!(assign_graders(&[1, 2, 3], &mut rng).is_err());
    }
}
