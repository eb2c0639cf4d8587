//! The read path the engine assembles from.
//!
//! The engine never talks to a database directly; everything it needs is
//! behind [`ContentStore`], which returns fully eager-loaded entity graphs
//! (exercises arrive with their media links attached, parents with all of
//! their children). [`MemoryStore`] is the in-crate reference backend, used
//! by the test suite and handy for demos.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::assembly_engine::error::StoreError;
use crate::assembly_engine::models::{Exercise, LessonContext, ParentGroup, Word};

/// Read-only query capability over the exercise catalog.
///
/// Implementations apply the lesson/word/type filters themselves and return
/// complete graphs; the engine performs no per-row follow-up queries.
pub trait ContentStore {
    fn resolve_lesson(&self, id: Uuid) -> Result<Option<LessonContext>, StoreError>;

    /// All exercises whose word is linked to `lesson_id` and whose type name
    /// is in `type_names`, eager-loaded with media links.
    fn find_candidate_exercises(
        &self,
        lesson_id: Uuid,
        type_names: &[String],
    ) -> Result<Vec<Exercise>, StoreError>;

    /// The parent exercise together with **all** of its children (not just
    /// the ones that happened to be sampled), or `None` if the parent does
    /// not exist.
    fn find_parent_with_children(
        &self,
        parent_id: Uuid,
    ) -> Result<Option<ParentGroup>, StoreError>;
}

/// In-memory [`ContentStore`] backed by hash maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    lessons: HashMap<Uuid, LessonContext>,
    words: HashMap<Uuid, Word>,
    /// lesson id → linked word ids.
    lesson_words: HashMap<Uuid, Vec<Uuid>>,
    exercises: HashMap<Uuid, Exercise>,
    /// Insertion order, so candidate queries are deterministic.
    exercise_order: Vec<Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn insert_lesson(&mut self, lesson: LessonContext) {
        self.lessons.insert(lesson.lesson_id, lesson);
    }

    pub fn insert_word(&mut self, word: Word) {
        self.words.insert(word.id, word);
    }

    pub fn link_word_to_lesson(&mut self, lesson_id: Uuid, word_id: Uuid) {
        self.lesson_words.entry(lesson_id).or_default().push(word_id);
    }

    /// Inserting an id twice replaces the stored exercise.
    pub fn insert_exercise(&mut self, exercise: Exercise) {
        if !self.exercises.contains_key(&exercise.id) {
            self.exercise_order.push(exercise.id);
        }
        self.exercises.insert(exercise.id, exercise);
    }

    fn word_ids_for(&self, lesson_id: Uuid) -> HashSet<Uuid> {
        self.lesson_words
            .get(&lesson_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl ContentStore for MemoryStore {
    fn resolve_lesson(&self, id: Uuid) -> Result<Option<LessonContext>, StoreError> {
        Ok(self.lessons.get(&id).cloned())
    }

    fn find_candidate_exercises(
        &self,
        lesson_id: Uuid,
        type_names: &[String],
    ) -> Result<Vec<Exercise>, StoreError> {
        let word_ids = self.word_ids_for(lesson_id);
        if word_ids.is_empty() {
            return Ok(Vec::new());
        }
        let wanted: HashSet<&str> = type_names.iter().map(String::as_str).collect();
        let candidates = self
            .exercise_order
            .iter()
            .filter_map(|id| self.exercises.get(id))
            .filter(|ex| {
                ex.word_id.map_or(false, |wid| word_ids.contains(&wid))
                    && wanted.contains(ex.type_name.as_str())
            })
            .cloned()
            .collect();
        Ok(candidates)
    }

    fn find_parent_with_children(
        &self,
        parent_id: Uuid,
    ) -> Result<Option<ParentGroup>, StoreError> {
        let Some(parent) = self.exercises.get(&parent_id).cloned() else {
            return Ok(None);
        };
        let children = self
            .exercise_order
            .iter()
            .filter_map(|id| self.exercises.get(id))
            .filter(|ex| ex.parent_exercise_id == Some(parent_id))
            .cloned()
            .collect();
        Ok(Some(ParentGroup { parent, children }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly_engine::models::AttrMap;

    fn lesson(id: Uuid) -> LessonContext {
        LessonContext {
            lesson_id: id,
            lesson_name: "Lesson 1".into(),
            topic_id: Uuid::new_v4(),
            topic_name: "Greetings".into(),
            phase_id: Uuid::new_v4(),
            phase_name: "Phase 1".into(),
        }
    }

    fn exercise(word_id: Option<Uuid>, type_name: &str) -> Exercise {
        Exercise {
            id: Uuid::new_v4(),
            parent_exercise_id: None,
            word_id,
            type_name: type_name.into(),
            prompt: None,
            meta: AttrMap::new(),
            display_order: 0,
            media_links: Vec::new(),
        }
    }

    #[test]
    fn candidates_filter_by_lesson_word_and_type() {
        let mut store = MemoryStore::new();
        let lesson_id = Uuid::new_v4();
        store.insert_lesson(lesson(lesson_id));

        let linked = Uuid::new_v4();
        let unlinked = Uuid::new_v4();
        store.link_word_to_lesson(lesson_id, linked);

        store.insert_exercise(exercise(Some(linked), "READ_SENTENCE_TF"));
        store.insert_exercise(exercise(Some(linked), "READ_WORD_ORDER"));
        store.insert_exercise(exercise(Some(unlinked), "READ_SENTENCE_TF"));
        store.insert_exercise(exercise(None, "READ_SENTENCE_TF"));

        let found = store
            .find_candidate_exercises(lesson_id, &["READ_SENTENCE_TF".into()])
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].word_id, Some(linked));
    }

    #[test]
    fn parent_group_collects_every_child() {
        let mut store = MemoryStore::new();
        let mut parent = exercise(None, "LISTEN_IMAGE_MATCH");
        let parent_id = parent.id;
        parent.word_id = None;
        store.insert_exercise(parent);

        for order in [2, 0, 1] {
            let mut child = exercise(Some(Uuid::new_v4()), "LISTEN_IMAGE_MATCH");
            child.parent_exercise_id = Some(parent_id);
            child.display_order = order;
            store.insert_exercise(child);
        }

        let group = store.find_parent_with_children(parent_id).unwrap().unwrap();
        assert_eq!(group.parent.id, parent_id);
        assert_eq!(group.children.len(), 3);

        assert!(store
            .find_parent_with_children(Uuid::new_v4())
            .unwrap()
            .is_none());
    }
}
