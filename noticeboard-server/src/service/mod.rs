use crate::{
    dto::{AuthorFilter, TitleRequest},
    error::{Result, ServiceError},
    models::Note,
    repository::NoteStore,
};

use std::time::Duration;

use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct NoticeboardService {
    store: NoteStore,
}

impl NoticeboardService {
    pub const fn new(store: NoteStore) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn get_note_by_title(&self, request: &TitleRequest) -> Result<Note> {
        match self.store.find_by_title(&request.title) {
            Some(note) => {
                tracing::debug!("Found note titled {:?}", request.title);
                Ok(note.clone())
            }
            None => {
                tracing::info!("No note titled {:?}", request.title);
                Err(ServiceError::NoteNotFound {
                    title: request.title.clone(),
                })
            }
        }
    }

    /// Sends every note written by `filter.mail` into `sink`, in store order.
    ///
    /// `filter.nickname` does not take part in matching. Each send waits for channel capacity. Returns the number of notes sent,
    /// or `StreamClosed` as soon as the receiver is gone; nothing is resent.
    pub async fn list_notes_by_author<T, E>(
        &self,
        filter: &AuthorFilter,
        sink: &mpsc::Sender<core::result::Result<T, E>>,
        delay: Duration,
    ) -> Result<usize>
    where
        T: From<Note>,
    {
        if !filter.nickname.is_empty() {
            tracing::debug!(
                "Ignoring nickname {:?} in author filter, matching on mail only",
                filter.nickname
            );
        }

        let mut sent = 0;

        for note in self.store.filter_by_author_mail(&filter.mail) {
            if sink.send(Ok(T::from(note.clone()))).await.is_err() {
                return Err(ServiceError::StreamClosed { sent });
            }
            sent += 1;

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(sent)
    }
}
