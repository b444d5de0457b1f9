//! Learner grades: evaluation responses and ratings kept between runs.
//!
//! Grades are stored as session entries under `evaluation.<id>.text` and
//! `evaluation.<id>.rating`, so resetting the notebook clears them too.

use crate::model::{EvaluationId, Rating};
use crate::timeline::Timeline;

use super::{Result, SessionStore, key};

impl SessionStore {
    pub fn save_text(&mut self, id: EvaluationId, text: &str) -> Result<()> {
        self.set(&key::evaluation_text(id), text, None)
    }

    pub fn save_rating(&mut self, id: EvaluationId, rating: Rating) -> Result<()> {
        self.set(&key::evaluation_rating(id), rating.value().to_string(), None)
    }

    /// Copies stored grades onto the timeline's evaluations.
    ///
    /// Stored ratings that no longer parse or fall outside the scale are
    /// skipped with a warning. Returns the number of evaluations touched.
    pub fn apply_grades(&self, timeline: &mut Timeline) -> usize {
        let ids: Vec<EvaluationId> = timeline.all_evaluations().map(|e| e.id).collect();

        let mut applied = 0;
        for id in ids {
            let text = self.get(&key::evaluation_text(id));
            let rating = self.get(&key::evaluation_rating(id));
            if text.is_none() && rating.is_none() {
                continue;
            }
            let Some(evaluation) = timeline.evaluation_mut(id) else {
                continue;
            };

            if let Some(text) = text {
                evaluation.record_text(text);
            }
            if let Some(rating) = rating {
                let recorded = rating
                    .trim()
                    .parse::<u8>()
                    .map_err(|e| e.to_string())
                    .and_then(|value| evaluation.record_rating(value).map_err(|e| e.to_string()));
                if let Err(e) = recorded {
                    log::warn!("ignoring stored rating for evaluation {id}: {e}");
                }
            }
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::model::{EvaluationId, Rating};
    use crate::script::Script;
    use crate::storage::{SessionStore, key};

    fn test_store() -> (TempDir, SessionStore) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("session.json")).unwrap();
        (dir, store)
    }

    fn first_evaluation(script: &Script) -> EvaluationId {
        script.timeline.all_evaluations().next().unwrap().id
    }

    #[test]
    fn saved_grades_are_applied_on_load() {
        let (_dir, mut store) = test_store();
        let mut script = Script::embedded().unwrap();
        let id = first_evaluation(&script);

        store.save_text(id, "Viewed camera 55/405").unwrap();
        store.save_rating(id, Rating::new(2).unwrap()).unwrap();

        let reopened = SessionStore::open(store.path()).unwrap();
        assert_eq!(reopened.apply_grades(&mut script.timeline), 1);

        let evaluation = script.timeline.evaluation(id).unwrap();
        assert_eq!(evaluation.text, "Viewed camera 55/405");
        assert_eq!(evaluation.rating, Some(Rating::new(2).unwrap()));
    }

    #[test]
    fn bad_stored_rating_is_skipped() {
        let (_dir, mut store) = test_store();
        let mut script = Script::embedded().unwrap();
        let id = first_evaluation(&script);

        store.set(&key::evaluation_rating(id), "9", None).unwrap();
        store.save_text(id, "kept").unwrap();

        store.apply_grades(&mut script.timeline);
        let evaluation = script.timeline.evaluation(id).unwrap();
        assert_eq!(evaluation.rating, None);
        assert_eq!(evaluation.text, "kept");
    }

    #[test]
    fn reset_clears_grades() {
        let (_dir, mut store) = test_store();
        let mut script = Script::embedded().unwrap();
        let id = first_evaluation(&script);

        store.save_text(id, "gone").unwrap();
        store.reset().unwrap();
        assert_eq!(store.apply_grades(&mut script.timeline), 0);
    }
}
