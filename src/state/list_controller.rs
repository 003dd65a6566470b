//! Resource list controller
//!
//! One instance per managed collection (guests, rent records, reviews). It
//! owns the loaded items for the session and moves between list, detail and
//! form modes:
//!
//! ```text
//! Listing --begin_create--> Editing(none)
//! Listing --view(id)------> Viewing(x)      (re-fetched by id)
//! Listing/Viewing --begin_edit(id)--> Editing(x)
//! Editing --submit ok / cancel--> Listing
//! Viewing --back--> Listing
//! ```
//!
//! Every method takes `&mut self`, so an operation whose future is dropped
//! before completion never writes into the controller afterwards.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::models::{Resource, Validate};
use crate::services::api::ResourceApi;
use crate::utils::errors::{FieldErrors, PgAdminError, Result};
use crate::utils::helpers::{calculate_offset, total_pages};
use crate::utils::logging::log_resource_action;

/// Progress of the most recent collection load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Failed,
}

/// Create/edit form state
#[derive(Debug, Clone)]
pub struct EditForm<R: Resource> {
    /// Record being edited, `None` when creating
    pub target: Option<R>,
    pub draft: R::Draft,
    pub field_errors: FieldErrors,
    /// Message from the last failed submit
    pub submit_error: Option<String>,
}

impl<R: Resource> EditForm<R> {
    fn new(target: Option<R>) -> Self {
        let draft = target.as_ref().map(R::to_draft).unwrap_or_default();
        Self {
            target,
            draft,
            field_errors: FieldErrors::new(),
            submit_error: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.target.is_none()
    }
}

#[derive(Debug, Clone)]
pub enum ViewMode<R: Resource> {
    Listing,
    Viewing(R),
    Editing(EditForm<R>),
}

impl<R: Resource> ViewMode<R> {
    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Listing => "listing",
            ViewMode::Viewing(_) => "viewing",
            ViewMode::Editing(_) => "editing",
        }
    }

    pub fn is_listing(&self) -> bool {
        matches!(self, ViewMode::Listing)
    }
}

/// Resets a status left at `Loading` when the load future is dropped
struct PendingLoad<'a> {
    status: &'a watch::Sender<LoadStatus>,
    finished: bool,
}

impl<'a> PendingLoad<'a> {
    fn start(status: &'a watch::Sender<LoadStatus>) -> Self {
        status.send_replace(LoadStatus::Loading);
        Self { status, finished: false }
    }

    fn finish(mut self, outcome: LoadStatus) {
        self.finished = true;
        self.status.send_replace(outcome);
    }
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.status.send_if_modified(|status| {
                let was_loading = *status == LoadStatus::Loading;
                if was_loading {
                    *status = LoadStatus::Idle;
                }
                was_loading
            });
        }
    }
}

/// List/detail/form controller for one resource type
pub struct ListController<R: Resource> {
    api: Arc<dyn ResourceApi<R>>,
    items: Vec<R>,
    mode: ViewMode<R>,
    search: String,
    page: usize,
    page_size: Option<usize>,
    banner: Option<String>,
    status: watch::Sender<LoadStatus>,
    loaded: bool,
}

impl<R: Resource> ListController<R> {
    /// Unpaginated controller
    pub fn new(api: Arc<dyn ResourceApi<R>>) -> Self {
        let (status, _) = watch::channel(LoadStatus::Idle);
        Self {
            api,
            items: Vec::new(),
            mode: ViewMode::Listing,
            search: String::new(),
            page: 1,
            page_size: None,
            banner: None,
            status,
            loaded: false,
        }
    }

    /// Controller showing `page_size` filtered items per page
    pub fn paginated(api: Arc<dyn ResourceApi<R>>, page_size: usize) -> Self {
        let mut controller = Self::new(api);
        controller.page_size = Some(page_size.max(1));
        controller
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn mode(&self) -> &ViewMode<R> {
        &self.mode
    }

    /// Page-level message from the last failed operation
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Whether any load has succeeded yet
    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    pub fn load_status(&self) -> LoadStatus {
        *self.status.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<LoadStatus> {
        self.status.subscribe()
    }

    /// Fetch the whole collection. On failure the previous items stay.
    pub async fn load(&mut self) -> Result<()> {
        let pending = PendingLoad::start(&self.status);
        let result = self.api.list().await;

        match result {
            Ok(items) => {
                pending.finish(LoadStatus::Idle);
                debug!(kind = R::KIND, count = items.len(), "Loaded collection");
                self.items = items;
                self.loaded = true;
                self.banner = None;
                self.clamp_page();
                Ok(())
            }
            Err(e) => {
                pending.finish(LoadStatus::Failed);
                error!(kind = R::KIND, error = %e, "Failed to load collection");
                self.banner = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Items whose searchable fields contain `term`, ignoring case.
    ///
    /// The term is matched as typed, surrounding whitespace included.
    pub fn filter(&self, term: &str) -> Vec<&R> {
        let term = term.to_lowercase();
        self.items.iter().filter(|item| item.matches(&term)).collect()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Change the search term, returning to the first page
    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.page = 1;
    }

    /// Items matching the current search term
    pub fn filtered(&self) -> Vec<&R> {
        self.filter(&self.search)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        match self.page_size {
            Some(size) => total_pages(self.filtered().len(), size),
            None => 1,
        }
    }

    /// Filtered items on the current page (all of them when unpaginated)
    pub fn page_items(&self) -> Vec<&R> {
        let filtered = self.filtered();
        match self.page_size {
            Some(size) => filtered
                .into_iter()
                .skip(calculate_offset(self.page, size))
                .take(size)
                .collect(),
            None => filtered,
        }
    }

    /// Jump to `page`; out-of-range requests are ignored
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_sub(1))
    }

    fn clamp_page(&mut self) {
        let total = self.total_pages().max(1);
        if self.page > total {
            self.page = total;
        }
    }

    fn transition_error(&self, to: &str) -> PgAdminError {
        PgAdminError::InvalidStateTransition {
            from: self.mode.name().to_string(),
            to: to.to_string(),
        }
    }

    /// Open an empty form
    pub fn begin_create(&mut self) -> Result<()> {
        if !self.mode.is_listing() {
            return Err(self.transition_error("editing"));
        }
        self.mode = ViewMode::Editing(EditForm::new(None));
        Ok(())
    }

    /// Show one record, re-fetched from the backend
    pub async fn view(&mut self, id: &str) -> Result<()> {
        if !self.mode.is_listing() {
            return Err(self.transition_error("viewing"));
        }

        match self.api.get(id).await {
            Ok(Some(item)) => {
                self.mode = ViewMode::Viewing(item);
                Ok(())
            }
            Ok(None) => {
                let e = PgAdminError::NotFound {
                    kind: R::KIND,
                    id: id.to_string(),
                };
                self.banner = Some(e.user_message());
                Err(e)
            }
            Err(e) => {
                error!(kind = R::KIND, id = %id, error = %e, "Failed to fetch record");
                self.banner = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Open the form prefilled from an existing record
    pub fn begin_edit(&mut self, id: &str) -> Result<()> {
        let target = match &self.mode {
            ViewMode::Viewing(item) if item.id() == id => item.clone(),
            ViewMode::Listing | ViewMode::Viewing(_) => self
                .items
                .iter()
                .find(|item| item.id() == id)
                .cloned()
                .ok_or_else(|| PgAdminError::NotFound {
                    kind: R::KIND,
                    id: id.to_string(),
                })?,
            ViewMode::Editing(_) => return Err(self.transition_error("editing")),
        };

        self.mode = ViewMode::Editing(EditForm::new(Some(target)));
        Ok(())
    }

    /// Current form, when editing
    pub fn form(&self) -> Option<&EditForm<R>> {
        match &self.mode {
            ViewMode::Editing(form) => Some(form),
            _ => None,
        }
    }

    /// Mutable access to the form draft, when editing
    pub fn draft_mut(&mut self) -> Option<&mut R::Draft> {
        match &mut self.mode {
            ViewMode::Editing(form) => Some(&mut form.draft),
            _ => None,
        }
    }

    /// Replace the whole draft
    pub fn set_draft(&mut self, draft: R::Draft) -> Result<()> {
        match &mut self.mode {
            ViewMode::Editing(form) => {
                form.draft = draft;
                form.field_errors.clear();
                Ok(())
            }
            _ => Err(self.transition_error("editing")),
        }
    }

    /// Validate and send the form.
    ///
    /// Validation errors never reach the network. Remote failures keep the
    /// form open with the entered values intact.
    pub async fn submit(&mut self) -> Result<()> {
        let (target, mut payload) = match &mut self.mode {
            ViewMode::Editing(form) => {
                form.submit_error = None;
                form.field_errors = form.draft.validate();
                if !form.field_errors.is_empty() {
                    debug!(kind = R::KIND, errors = form.field_errors.len(), "Form rejected locally");
                    return Err(PgAdminError::Validation(form.field_errors.clone()));
                }
                (form.target.clone(), form.draft.clone())
            }
            _ => return Err(self.transition_error("listing")),
        };

        let result = match &target {
            Some(existing) => {
                existing.prepare_update(&mut payload);
                self.api.update(existing.id(), &payload).await
            }
            None => self.api.create(&payload).await,
        };

        let action = if target.is_some() { "update" } else { "create" };
        let id = target.as_ref().map(|t| t.id());

        if let Err(e) = result {
            log_resource_action(R::KIND, action, id, false);
            error!(kind = R::KIND, action, error = %e, "Failed to save record");
            if let ViewMode::Editing(form) = &mut self.mode {
                form.submit_error = Some(e.user_message());
            }
            return Err(e);
        }

        log_resource_action(R::KIND, action, id, true);
        self.mode = ViewMode::Listing;
        if target.is_none() {
            self.page = 1;
        }

        // The save went through; a failed reload only shows in the banner
        if self.load().await.is_err() {
            info!(kind = R::KIND, "Saved, but the collection reload failed");
        }
        Ok(())
    }

    /// Leave the form without saving
    pub fn cancel(&mut self) -> Result<()> {
        if !matches!(self.mode, ViewMode::Editing(_)) {
            return Err(self.transition_error("listing"));
        }
        self.mode = ViewMode::Listing;
        Ok(())
    }

    /// Leave the detail view
    pub fn back(&mut self) -> Result<()> {
        if !matches!(self.mode, ViewMode::Viewing(_)) {
            return Err(self.transition_error("listing"));
        }
        self.mode = ViewMode::Listing;
        Ok(())
    }

    /// Delete a record and drop it from the loaded items
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        if matches!(self.mode, ViewMode::Editing(_)) {
            return Err(self.transition_error("listing"));
        }

        if let Err(e) = self.api.delete(id).await {
            log_resource_action(R::KIND, "delete", Some(id), false);
            error!(kind = R::KIND, id = %id, error = %e, "Failed to delete record");
            self.banner = Some(e.user_message());
            return Err(e);
        }

        log_resource_action(R::KIND, "delete", Some(id), true);
        self.items.retain(|item| item.id() != id);
        if matches!(&self.mode, ViewMode::Viewing(item) if item.id() == id) {
            self.mode = ViewMode::Listing;
        }
        self.clamp_page();
        Ok(())
    }
}

impl<R: Resource> std::fmt::Debug for ListController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("kind", &R::KIND)
            .field("items", &self.items.len())
            .field("mode", &self.mode.name())
            .field("page", &self.page)
            .finish_non_exhaustive()
    }
}
