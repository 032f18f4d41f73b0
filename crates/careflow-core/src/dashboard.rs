//! The dashboard controller: store, form, quick-edit and filter state around
//! one record service.

use tracing::{debug, info, warn};

use crate::form::{PatientForm, QuickEdit, QuickEditDraft};
use crate::models::{Patient, PatientFields, PatientId, Role};
use crate::service::RecordService;
use crate::store::{PatientStore, StoreError};
use crate::view::{DoctorFilter, Metrics, ViewFilter};
use crate::{DashboardError, DashboardResult};

/// What a successful form submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(PatientId),
    Updated(PatientId),
}

/// Single-page patient dashboard state.
///
/// Mutations are optimistic: the local collection changes first, then the
/// record service is called. Failed creates and deletes are rolled back; failed
/// updates are not.
pub struct Dashboard<S> {
    service: S,
    store: PatientStore,
    form: PatientForm,
    quick_edit: QuickEdit,
    filter: ViewFilter,
    loading: bool,
}

impl<S: RecordService> Dashboard<S> {
    /// Create an empty dashboard. It stays in the loading state until [`load`](Self::load).
    pub fn new(service: S) -> Self {
        Self {
            service,
            store: PatientStore::new(),
            form: PatientForm::new(),
            quick_edit: QuickEdit::new(),
            filter: ViewFilter::new(),
            loading: true,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn store(&self) -> &PatientStore {
        &self.store
    }

    /// The unfiltered collection.
    pub fn patients(&self) -> &[Patient] {
        self.store.patients()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // =========================================================================
    // Load
    // =========================================================================

    /// Fetch the collection. A failed fetch shows an empty collection.
    pub async fn load(&mut self) {
        match self.service.list().await {
            Ok(records) => {
                let dropped = self.store.replace_all(records);
                info!(count = self.store.len(), dropped, "patients loaded");
            }
            Err(error) => {
                warn!(%error, "patient list unavailable; showing empty collection");
                self.store.replace_all(Vec::new());
            }
        }
        self.loading = false;
    }

    // =========================================================================
    // Filters
    // =========================================================================

    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    pub fn role(&self) -> Role {
        self.filter.role()
    }

    /// Switch between admin and doctor views. Clears the name search.
    pub fn set_role(&mut self, role: Role) {
        self.filter.set_role(role);
    }

    pub fn set_doctor_filter(&mut self, filter: DoctorFilter) {
        self.filter.set_doctor_filter(filter);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.set_search(search);
    }

    /// Records passing the active filters, most recent visit first.
    pub fn visible_patients(&self) -> Vec<&Patient> {
        self.filter.apply(self.store.patients())
    }

    /// Counts over the whole collection, ignoring filters.
    pub fn metrics(&self) -> Metrics {
        Metrics::compute(self.store.patients())
    }

    // =========================================================================
    // Add / Edit form
    // =========================================================================

    pub fn form(&self) -> &PatientForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PatientForm {
        &mut self.form
    }

    fn ensure_can_edit(&self) -> DashboardResult<()> {
        let role = self.filter.role();
        if role.can_edit() {
            Ok(())
        } else {
            Err(DashboardError::ReadOnlyRole(role))
        }
    }

    /// Look up a record that already has a service-assigned id.
    fn existing(&self, id: &PatientId) -> DashboardResult<&Patient> {
        if id.is_pending() {
            return Err(DashboardError::PendingRecord(id.clone()));
        }
        self.store
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()).into())
    }

    /// Load a record into the form for a full edit.
    pub fn start_edit(&mut self, id: &PatientId) -> DashboardResult<()> {
        self.ensure_can_edit()?;
        let patient = self.existing(id)?.clone();
        self.form.load(&patient);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.form.cancel_edit();
    }

    /// Validate the form, then create or update depending on edit mode.
    pub async fn submit_form(&mut self) -> DashboardResult<SubmitOutcome> {
        self.ensure_can_edit()?;
        if self.loading {
            return Err(DashboardError::Loading);
        }

        let fields = self.form.validate()?;
        match self.form.editing().cloned() {
            Some(id) => self.save_edit(id, fields).await,
            None => self.save_new(fields).await,
        }
    }

    async fn save_new(&mut self, fields: PatientFields) -> DashboardResult<SubmitOutcome> {
        let pending = self.store.stage_create(fields);
        debug!(placeholder = %pending.placeholder_id(), "optimistic insert");

        let result = self.service.create(pending.request()).await;
        self.form.reset();

        match result {
            Ok(saved) => {
                let id = saved.id.clone();
                self.store.commit_create(pending, saved)?;
                info!(%id, "patient created");
                Ok(SubmitOutcome::Created(id))
            }
            Err(error) => {
                warn!(%error, "create failed; rolling back");
                self.store.rollback_create(pending);
                Err(error.into())
            }
        }
    }

    async fn save_edit(
        &mut self,
        id: PatientId,
        fields: PatientFields,
    ) -> DashboardResult<SubmitOutcome> {
        let mut updated = self.existing(&id)?.clone();
        updated.apply_fields(fields);
        updated.touch();
        self.store.apply_update(updated.clone())?;

        if let Err(error) = self.service.update(&id, &updated).await {
            warn!(%id, %error, "update failed; local change kept");
            return Err(error.into());
        }

        self.form.cancel_edit();
        info!(%id, "patient updated");
        Ok(SubmitOutcome::Updated(id))
    }

    // =========================================================================
    // Quick edit
    // =========================================================================

    pub fn quick_edit(&self) -> &QuickEdit {
        &self.quick_edit
    }

    /// Mutable access to the open quick-edit draft.
    pub fn quick_edit_draft_mut(&mut self) -> Option<&mut QuickEditDraft> {
        self.quick_edit.draft_mut()
    }

    /// Open the inline editor for a record.
    pub fn start_quick_edit(&mut self, id: &PatientId) -> DashboardResult<()> {
        self.ensure_can_edit()?;
        let patient = self.existing(id)?.clone();
        self.quick_edit.start(&patient);
        Ok(())
    }

    /// Ask for confirmation before saving the quick edit.
    pub fn request_quick_save(&mut self) -> DashboardResult<()> {
        if self.quick_edit.request_confirm() {
            Ok(())
        } else {
            Err(DashboardError::NoQuickEdit)
        }
    }

    /// Dismiss the confirmation prompt; the draft stays open.
    pub fn cancel_quick_save(&mut self) {
        self.quick_edit.cancel_confirm();
    }

    pub fn cancel_quick_edit(&mut self) {
        self.quick_edit.cancel();
    }

    /// Save a confirmed quick edit.
    ///
    /// On failure the local change is kept, the prompt is dismissed and the
    /// draft stays open.
    pub async fn confirm_quick_save(&mut self) -> DashboardResult<()> {
        self.ensure_can_edit()?;
        let draft = self
            .quick_edit
            .draft()
            .cloned()
            .ok_or(DashboardError::NoQuickEdit)?;
        if !self.quick_edit.confirm_pending() {
            return Err(DashboardError::ConfirmationRequired);
        }

        let updated = draft.apply_to(self.existing(&draft.id)?);
        self.store.apply_update(updated.clone())?;

        match self.service.update(&draft.id, &updated).await {
            Ok(()) => {
                self.quick_edit.cancel();
                info!(id = %draft.id, "quick edit saved");
                Ok(())
            }
            Err(error) => {
                warn!(id = %draft.id, %error, "quick edit failed; local change kept");
                self.quick_edit.cancel_confirm();
                Err(error.into())
            }
        }
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Remove a record, restoring it if the service refuses.
    pub async fn delete(&mut self, id: &PatientId) -> DashboardResult<()> {
        self.ensure_can_edit()?;
        self.existing(id)?;

        let pending = self.store.stage_delete(id)?;
        if let Err(error) = self.service.delete(id).await {
            warn!(%id, %error, "delete failed; restoring record");
            self.store.rollback_delete(pending);
            return Err(error.into());
        }

        info!(%id, "patient deleted");
        Ok(())
    }
}
