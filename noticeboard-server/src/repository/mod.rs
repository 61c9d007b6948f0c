use std::sync::Arc;

use crate::models::{Author, Note};

/// Read-only, ordered collection of every note the server knows about.
///
/// The contents are frozen at construction. Cloning is cheap and shares the
/// same underlying slice, so the store can be handed to every request task.
#[derive(Debug, Clone)]
pub struct NoteStore {
    notes: Arc<[Note]>,
}

impl NoteStore {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes: notes.into(),
        }
    }

    /// Store holding the three example notes.
    pub fn seeded() -> Self {
        let hans = Author::new("Hans", "hans@gmail.com");
        let lisa = Author::new("Lisa", "lisa@gmail.com");

        Self::new(vec![
            Note::new("Hello", "This note says hello.", hans.clone()),
            Note::new("Goodbye", "This note says goodbye.", hans),
            Note::new("What up", "This note says what up.", lisa),
        ])
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// First note whose title matches exactly, in stored order.
    pub fn find_by_title(&self, title: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.title == title)
    }

    /// Notes written by the given mail address, in stored order.
    pub fn filter_by_author_mail<'a>(&'a self, mail: &'a str) -> impl Iterator<Item = &'a Note> {
        self.notes.iter().filter(move |note| note.author.mail == mail)
    }
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::seeded()
    }
}
