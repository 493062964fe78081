//! Picking the next quiz question.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use super::error::ApiError;

/// Category type the client sends when the quiz runs over every category.
pub const ALL_CATEGORIES: &str = "click";

/// Uniformly picks one of `candidates` that is not in `previous`.
/// `None` once every candidate has been seen.
pub fn pick_question<R>(candidates: &[i64], previous: &[i64], rng: &mut R) -> Option<i64>
where
    R: Rng + ?Sized,
{
    let seen: HashSet<i64> = previous.iter().copied().collect();
    let unseen: Vec<i64> = candidates
        .iter()
        .copied()
        .filter(|id| !seen.contains(id))
        .collect();
    unseen.choose(rng).copied()
}

/// Shared generator for quiz picks. Locked only for the duration of a pick.
#[derive(Clone)]
pub struct QuizRng(Arc<Mutex<StdRng>>);

impl QuizRng {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self(Arc::new(Mutex::new(rng)))
    }

    pub fn pick(&self, candidates: &[i64], previous: &[i64]) -> Result<Option<i64>, ApiError> {
        let mut rng = self
            .0
            .lock()
            .map_err(|_| ApiError::Internal("quiz rng lock poisoned".to_owned()))?;
        Ok(pick_question(candidates, previous, &mut *rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_returns_previous_questions() {
        let mut rng = StdRng::seed_from_u64(7);
        let candidates: Vec<i64> = (1..=20).collect();
        let previous: Vec<i64> = (1..=20).filter(|id| id % 3 != 0).collect();
        for _ in 0..200 {
            let id = pick_question(&candidates, &previous, &mut rng).unwrap();
            assert_eq!(id % 3, 0);
        }
    }

    #[test]
    fn exhausted_pool_yields_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_question(&[4, 5], &[5, 4, 9], &mut rng), None);
        assert_eq!(pick_question(&[], &[], &mut rng), None);
    }

    #[test]
    fn playing_through_visits_every_question_once() {
        let quiz = QuizRng::new(Some(42));
        let candidates = [10, 11, 12, 13, 14];
        let mut previous = Vec::new();
        while let Some(id) = quiz.pick(&candidates, &previous).unwrap() {
            assert!(!previous.contains(&id));
            previous.push(id);
        }
        previous.sort();
        assert_eq!(previous, candidates);
    }

    #[test]
    fn same_seed_same_sequence() {
        let candidates: Vec<i64> = (1..=50).collect();
        let a = QuizRng::new(Some(3));
        let b = QuizRng::new(Some(3));
        for _ in 0..10 {
            assert_eq!(
                a.pick(&candidates, &[]).unwrap(),
                b.pick(&candidates, &[]).unwrap()
            );
        }
    }
}
