use std::collections::HashSet;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use regex::Regex;
use tempfile::TempDir;
use tokio::runtime::Handle;

use lexdrill::engine::{ProgressModel, WeightedPolicy};
use lexdrill::session::{EducationEvent, EducationSession, EducationSettings, GameMode};
use lexdrill::sets::{SetSelection, WordSet, resolve_target_set_id};
use lexdrill::store::{
    JsonProgressStore, ProgressStore, ProgressWriter, SetLibrary, load_set_progress,
    load_set_stats,
};

const USER: &str = "alice";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A library holding exactly two sets, "Animals" and "Colors".
fn make_library(dir: &TempDir) -> (SetLibrary, String, String) {
    let library = SetLibrary::with_base_dir(dir.path().join("library")).unwrap();
    for set in library.list_sets().unwrap() {
        library.delete_set(&set.id).unwrap();
    }
    let animals = library.create_set("Animals").unwrap();
    for (hint, answer) in [("cat", "кіт"), ("dog", "пес"), ("owl", "сова")] {
        library.add_word(&animals.id, hint, &strings(&[answer])).unwrap();
    }
    let colors = library.create_set("Colors").unwrap();
    for (hint, answer) in [("red", "червоний"), ("blue", "синій")] {
        library.add_word(&colors.id, hint, &strings(&[answer])).unwrap();
    }
    (library, animals.id, colors.id)
}

fn settings(threshold: u32) -> EducationSettings {
    EducationSettings {
        model: ProgressModel::new(threshold),
        ..EducationSettings::default()
    }
}

async fn open_session(
    store: &dyn ProgressStore,
    set: &WordSet,
    user: Option<&str>,
    threshold: u32,
    seed: u64,
) -> EducationSession {
    let stored = load_set_progress(store, user, set).await;
    let stats = load_set_stats(store, user, set).await;
    EducationSession::new(
        set,
        &stored,
        stats,
        user.map(str::to_string),
        settings(threshold),
        Box::new(WeightedPolicy),
        Box::new(SmallRng::seed_from_u64(seed)),
    )
}

/// Answers every prompt correctly until the set is learned.
fn answer_until_learned(session: &mut EducationSession, writer: &ProgressWriter) -> u32 {
    let mut answers = 0;
    while session.progress() < 100 {
        let answer = session.current_word().unwrap().answers[0].clone();
        let update = session.apply(EducationEvent::Submit(answer));
        assert_eq!(update.correct, Some(true));
        writer.submit(update.effects);
        answers += 1;
        assert!(answers < 500, "session never converged");
    }
    answers
}

#[test]
fn composite_selection_has_sorted_id() {
    let dir = TempDir::new().unwrap();
    let (library, animals, colors) = make_library(&dir);
    let sets = library.list_sets().unwrap();

    let mut selection = SetSelection::default();
    selection.toggle(&colors, GameMode::Education);
    selection.toggle(&animals, GameMode::Education);
    let combined = selection.resolve(&sets, GameMode::Education).unwrap();

    let pattern = Regex::new(r"^combined:[0-9a-f-]{36}\+[0-9a-f-]{36}$").unwrap();
    assert!(pattern.is_match(&combined.id), "unexpected id {}", combined.id);

    let mut sorted = vec![animals.clone(), colors.clone()];
    sorted.sort();
    assert_eq!(combined.id, format!("combined:{}+{}", sorted[0], sorted[1]));
    assert_eq!(resolve_target_set_id(&combined).as_deref(), Some(sorted[0].as_str()));
    assert_eq!(combined.words.len(), 5);

    let ids: HashSet<&str> = combined.words.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids.len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn composite_progress_lands_in_origin_sets() {
    let dir = TempDir::new().unwrap();
    let (library, animals, colors) = make_library(&dir);
    let sets = library.list_sets().unwrap();
    let store: Arc<dyn ProgressStore> =
        Arc::new(JsonProgressStore::with_base_dir(dir.path().join("progress")).unwrap());

    let selection = SetSelection::new(vec![animals.clone(), colors.clone()]);
    let combined = selection.resolve(&sets, GameMode::Education).unwrap();

    let writer = ProgressWriter::spawn(store.clone(), &Handle::current());
    let mut session = open_session(store.as_ref(), &combined, Some(USER), 2, 7).await;
    assert_eq!(session.progress(), 0);
    let answers = answer_until_learned(&mut session, &writer);
    writer.shutdown().await;

    let animal_progress = store.get_progress(Some(USER), &animals).await.unwrap();
    let color_progress = store.get_progress(Some(USER), &colors).await.unwrap();
    assert_eq!(animal_progress.len(), 3);
    assert_eq!(color_progress.len(), 2);
    assert!(
        animal_progress
            .values()
            .chain(color_progress.values())
            .all(|p| p.progress_counter >= 2)
    );

    let target = resolve_target_set_id(&combined).unwrap();
    let stats = store.get_set_stats(Some(USER), &target).await.unwrap();
    assert_eq!(stats.attempts, answers);
    assert_eq!(stats.correct, answers);

    // Each constituent on its own picks up the stored counters.
    let animal_set = library.get_set(&animals).unwrap();
    let reopened = open_session(store.as_ref(), &animal_set, Some(USER), 2, 8).await;
    assert_eq!(reopened.progress(), 100);

    // Another user starts from scratch.
    let fresh = open_session(store.as_ref(), &animal_set, Some("bob"), 2, 9).await;
    assert_eq!(fresh.progress(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn guest_progress_is_scoped_by_set() {
    let dir = TempDir::new().unwrap();
    let (library, animals, colors) = make_library(&dir);
    let store: Arc<dyn ProgressStore> =
        Arc::new(JsonProgressStore::with_base_dir(dir.path().join("progress")).unwrap());
    let writer = ProgressWriter::spawn(store.clone(), &Handle::current());

    let animal_set = library.get_set(&animals).unwrap();
    let mut session = open_session(store.as_ref(), &animal_set, None, 1, 3).await;
    answer_until_learned(&mut session, &writer);
    writer.shutdown().await;

    let guest = store.get_progress(None, &animals).await.unwrap();
    assert_eq!(guest.len(), 3);
    assert!(store.get_progress(None, &colors).await.unwrap().is_empty());
    assert!(store.get_progress(Some(USER), &animals).await.unwrap().is_empty());

    let color_set = library.get_set(&colors).unwrap();
    let colors_session = open_session(store.as_ref(), &color_set, None, 1, 4).await;
    assert_eq!(colors_session.progress(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn wrong_answers_reset_stored_counter() {
    let dir = TempDir::new().unwrap();
    let (library, animals, _) = make_library(&dir);
    let store: Arc<dyn ProgressStore> =
        Arc::new(JsonProgressStore::with_base_dir(dir.path().join("progress")).unwrap());
    let writer = ProgressWriter::spawn(store.clone(), &Handle::current());

    let set = library.get_set(&animals).unwrap();
    let mut session = open_session(store.as_ref(), &set, Some(USER), 15, 11).await;
    let first = session.current_word().unwrap().clone();
    let update = session.apply(EducationEvent::Submit(first.answers[0].clone()));
    writer.submit(update.effects);

    let word = session.current_word().unwrap().clone();
    let update = session.apply(EducationEvent::Submit("зовсім не те".to_string()));
    assert_eq!(update.correct, Some(false));
    writer.submit(update.effects);
    writer.shutdown().await;

    let stored = store.get_progress(Some(USER), &animals).await.unwrap();
    assert_eq!(stored[&word.id].progress_counter, 0);
    if word.id != first.id {
        assert_eq!(stored[&first.id].progress_counter, 1);
    }
    assert!(session.feedback().iter().any(|f| f.word_id == word.id));
}
