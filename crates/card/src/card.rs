//! The generic resource card.

use std::sync::Arc;

use millwright_api::{decode_record, decode_records, encode_body, ApiError, ResourceApi};
use millwright_core::{
    filter_records, to_csv, CsvExport, LocalStore, ReferenceOption, ReferenceSet, Resource,
    ResourceKind,
};

use crate::confirm::Confirm;
use crate::notice::Notice;

/// Where the card is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Not loaded yet.
    Idle,
    Loaded,
    /// The last load failed; the store and references are empty.
    Failed,
}

/// Result of [`ResourceCard::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Confirmation was refused; no request was made.
    Declined,
    Failed,
}

/// One collection's list, filter, form and mutation state.
///
/// The store only ever changes after the server confirms a change, and it
/// then holds exactly what the server returned. API failures never escape:
/// they become the card's [`Notice`].
///
/// Mutations borrow the card mutably, so operations on one card are applied
/// one at a time in call order. Separate cards share nothing but the API
/// client.
pub struct ResourceCard<R: Resource, A: ResourceApi> {
    api: Arc<A>,
    store: LocalStore<R>,
    references: ReferenceSet,
    local_search: String,
    global_search: String,
    draft: R::Draft,
    form_open: bool,
    editing: Option<R>,
    notice: Option<Notice>,
    load_state: LoadState,
}

impl<R: Resource, A: ResourceApi> ResourceCard<R, A> {
    pub fn new(api: Arc<A>) -> Self {
        ResourceCard {
            api,
            store: LocalStore::new(),
            references: ReferenceSet::new(),
            local_search: String::new(),
            global_search: String::new(),
            draft: R::Draft::default(),
            form_open: false,
            editing: None,
            notice: None,
            load_state: LoadState::Idle,
        }
    }

    /// A card that has already run [`load`](Self::load).
    pub async fn mount(api: Arc<A>) -> Self {
        let mut card = Self::new(api);
        card.load().await;
        card
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    // ── Fetcher ──────────────────────────────────────────────────────────────

    /// Fetch the collection and every reference collection concurrently.
    ///
    /// Commits only when all requests succeed and decode. On any failure the
    /// store and references are emptied and an error notice is set. Returns
    /// whether the load committed.
    pub async fn load(&mut self) -> bool {
        let kind = R::KIND;
        tracing::debug!(%kind, references = ?kind.references(), "loading");

        match self.fetch_all().await {
            Ok((records, references)) => {
                tracing::debug!(%kind, records = records.len(), "loaded");
                self.store.replace_all(records);
                self.references = references;
                self.load_state = LoadState::Loaded;
                true
            }
            Err(e) => {
                tracing::warn!(%kind, error = %e, "load failed");
                self.store.clear();
                self.references.clear();
                self.load_state = LoadState::Failed;
                self.notice = Some(Notice::error(format!("Failed to load data: {e}")));
                false
            }
        }
    }

    async fn fetch_all(&self) -> Result<(Vec<R>, ReferenceSet), ApiError> {
        let api = self.api.as_ref();
        let primary = api.list(R::KIND);
        let secondary = futures::future::try_join_all(
            R::KIND
                .references()
                .iter()
                .map(|&kind| async move { api.list(kind).await.map(|values| (kind, values)) }),
        );
        let (primary, secondary) = tokio::try_join!(primary, secondary)?;

        let records = decode_records::<R>(primary)?;
        let mut references = ReferenceSet::new();
        for (kind, values) in secondary {
            let options = values
                .iter()
                .map(|value| {
                    ReferenceOption::from_json(kind, value).ok_or_else(|| {
                        ApiError::decode(format!("{} record without {}", kind, kind.key_field()))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            references.insert(kind, options);
        }
        Ok((records, references))
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    // ── Store and filter ─────────────────────────────────────────────────────

    /// Every record, in store order.
    pub fn records(&self) -> &[R] {
        self.store.records()
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.store.get(id)
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    /// Selectable targets for a foreign key into `kind`.
    pub fn options(&self, kind: ResourceKind) -> &[ReferenceOption] {
        self.references.options(kind)
    }

    /// This card's own records as reference options, for a parent view
    /// feeding another card's pickers.
    pub fn as_options(&self) -> Vec<ReferenceOption> {
        self.store
            .records()
            .iter()
            .map(ReferenceOption::from_record)
            .collect()
    }

    pub fn set_local_search(&mut self, term: impl Into<String>) {
        self.local_search = term.into();
    }

    pub fn set_global_search(&mut self, term: impl Into<String>) {
        self.global_search = term.into();
    }

    pub fn local_search(&self) -> &str {
        &self.local_search
    }

    pub fn global_search(&self) -> &str {
        &self.global_search
    }

    /// The filtered projection: records matching both search terms.
    pub fn visible(&self) -> Vec<&R> {
        filter_records(
            self.store.records(),
            &self.local_search,
            &self.global_search,
        )
    }

    // ── Exporter ─────────────────────────────────────────────────────────────

    /// CSV of the filtered projection. No network I/O.
    pub fn export(&self) -> CsvExport {
        to_csv(&self.visible(), &self.references)
    }

    // ── Creation form ────────────────────────────────────────────────────────

    pub fn open_form(&mut self) {
        self.form_open = true;
    }

    /// Close the creation form and discard the draft.
    pub fn cancel_form(&mut self) {
        self.form_open = false;
        self.draft = R::Draft::default();
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut R::Draft {
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: R::Draft) {
        self.draft = draft;
    }

    // ── Edit form ────────────────────────────────────────────────────────────

    /// Start editing a copy of record `id`. Returns `false` when unknown.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        self.editing = self.store.get(id).cloned();
        self.editing.is_some()
    }

    pub fn editing(&self) -> Option<&R> {
        self.editing.as_ref()
    }

    pub fn editing_mut(&mut self) -> Option<&mut R> {
        self.editing.as_mut()
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Send the record being edited. `None` when nothing is being edited.
    pub async fn save_edit(&mut self) -> Option<R> {
        let record = self.editing.clone()?;
        self.update(record).await
    }

    // ── Mutation controller ──────────────────────────────────────────────────

    /// Send the draft. On success the server's record is appended, the form
    /// closes and the draft resets.
    pub async fn create(&mut self) -> Option<R> {
        let kind = R::KIND;
        let result = match encode_body(&self.draft) {
            Ok(body) => self.api.create(kind, body).await.and_then(decode_record::<R>),
            Err(e) => Err(e),
        };
        match result {
            Ok(record) => {
                if !self.store.push_created(record.clone()) {
                    tracing::warn!(%kind, id = record.id(), "server returned an existing key on create");
                }
                tracing::info!(%kind, id = record.id(), "created");
                self.form_open = false;
                self.draft = R::Draft::default();
                self.notice = Some(Notice::success(format!("{} added successfully!", kind.title())));
                Some(record)
            }
            Err(e) => {
                self.fail("add", e);
                None
            }
        }
    }

    /// Send `record` in full. On success the entry with the same key is
    /// replaced in place by the server's representation.
    pub async fn update(&mut self, record: R) -> Option<R> {
        let kind = R::KIND;
        let id = record.id().to_string();
        let result = match encode_body(&record) {
            Ok(body) => self
                .api
                .update(kind, &id, body)
                .await
                .and_then(decode_record::<R>),
            Err(e) => Err(e),
        };
        match result {
            Ok(updated) => {
                if !self.store.replace(updated.clone()) {
                    tracing::warn!(%kind, %id, "updated record is no longer in the store");
                }
                tracing::info!(%kind, %id, "updated");
                if self.editing.as_ref().is_some_and(|r| r.id() == id) {
                    self.editing = None;
                }
                self.notice = Some(Notice::success(format!(
                    "{} updated successfully!",
                    kind.title()
                )));
                Some(updated)
            }
            Err(e) => {
                self.fail("update", e);
                None
            }
        }
    }

    /// Ask `confirm`, then delete record `id`.
    pub async fn delete(&mut self, id: &str, confirm: &mut impl Confirm) -> DeleteOutcome {
        let kind = R::KIND;
        let prompt = format!("Are you sure you want to delete this {}?", kind.label());
        if !confirm.confirm(&prompt) {
            tracing::debug!(%kind, %id, "delete declined");
            return DeleteOutcome::Declined;
        }
        match self.api.delete(kind, id).await {
            Ok(()) => {
                self.store.remove(id);
                tracing::info!(%kind, %id, "deleted");
                self.notice = Some(Notice::success(format!(
                    "{} deleted successfully!",
                    kind.title()
                )));
                DeleteOutcome::Deleted
            }
            Err(e) => {
                self.fail("delete", e);
                DeleteOutcome::Failed
            }
        }
    }

    fn fail(&mut self, verb: &str, err: ApiError) {
        let kind = R::KIND;
        tracing::warn!(%kind, error = %err, "{verb} failed");
        let fallback = format!("Failed to {verb} {}", kind.label());
        self.notice = Some(Notice::error(err.user_message(&fallback)));
    }

    // ── Notifications ────────────────────────────────────────────────────────

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use millwright_api::MemoryApi;
    use millwright_core::Plant;
    use serde_json::json;

    #[tokio::test]
    async fn new_card_is_idle_and_empty() {
        let card: ResourceCard<Plant, MemoryApi> = ResourceCard::new(Arc::new(MemoryApi::new()));
        assert_eq!(card.load_state(), LoadState::Idle);
        assert!(card.records().is_empty());
        assert!(card.notice().is_none());
        assert!(!card.is_form_open());
    }

    #[tokio::test]
    async fn as_options_uses_display_names() {
        let api = MemoryApi::new();
        api.seed(
            ResourceKind::Plants,
            vec![json!({"plant_id": "1", "name": "North"})],
        );
        let card: ResourceCard<Plant, _> = ResourceCard::mount(Arc::new(api)).await;
        assert_eq!(
            card.as_options(),
            vec![ReferenceOption {
                id: "1".into(),
                label: "North".into()
            }]
        );
    }
}
