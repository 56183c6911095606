// --- File: crates/termin_form/src/wizard.rs ---
//! The booking form as a linear wizard: details -> review -> done.
//!
//! The wizard owns all mutable form state. Every field change is mirrored to
//! the draft cache; a successful submission clears it.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use termin_config::FormConfig;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::draft::{DraftCache, DraftError, DraftStore, FileDraftStore, MemoryDraftStore};
use crate::models::{BookingRequest, Field, FieldErrors, FormFields};
use crate::slots::{self, SlotError, SlotTable};
use crate::submission::{ParentMessage, SubmissionClient, SubmissionError};
use crate::toast::{self, Toast};
use crate::validation;

/// Shown in place of slot buttons before a date is picked.
pub const HINT_PICK_DATE: &str = "Bitte wählen Sie zuerst ein Datum";
/// Shown when the picked date has no slots.
pub const HINT_NO_SLOTS: &str = "Keine Termine an diesem Tag verfügbar";

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Date, time and contact inputs.
    Details,
    /// Read-only summary with confirm and back buttons.
    Review,
    /// Booking accepted by the endpoint.
    Done,
}

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("{0} lies in the past")]
    PastDate(NaiveDate),
    #[error("no date selected")]
    NoDateSelected,
    #[error("slot {slot} is not offered on {date}")]
    SlotNotOffered { date: NaiveDate, slot: String },
    #[error("{0} field(s) failed validation")]
    Invalid(usize),
    #[error("booking was already submitted")]
    AlreadySubmitted,
    #[error("form can only be edited on the details step, wizard is on {0:?}")]
    Locked(Step),
    #[error("booking must be reviewed before it is sent")]
    NotReviewed,
    #[error("submission failed: {0}")]
    Submission(#[from] SubmissionError),
    #[error("draft storage: {0}")]
    Draft(#[from] DraftError),
    #[error("slot table: {0}")]
    Slots(#[from] SlotError),
}

pub struct BookingWizard {
    fields: FormFields,
    errors: FieldErrors,
    step: Step,
    toast: Option<Toast>,
    summary: Option<BookingRequest>,
    slots: Arc<SlotTable>,
    drafts: DraftCache,
    time_zone: Tz,
    clock: Clock,
}

impl BookingWizard {
    /// Creates the wizard and restores a fresh draft, if any.
    pub fn new(slots: Arc<SlotTable>, drafts: DraftCache) -> Self {
        Self::with_clock(slots, drafts, Arc::new(Utc::now))
    }

    /// Like [`BookingWizard::new`] with an injected clock.
    pub fn with_clock(slots: Arc<SlotTable>, drafts: DraftCache, clock: Clock) -> Self {
        let mut wizard = Self {
            fields: FormFields::default(),
            errors: FieldErrors::new(),
            step: Step::Details,
            toast: None,
            summary: None,
            slots,
            drafts,
            time_zone: slots::DEFAULT_TIME_ZONE,
            clock,
        };
        match wizard.drafts.restore(wizard.now()) {
            Ok(Some(fields)) => {
                info!("Restored booking draft");
                wizard.fields = fields;
            }
            Ok(None) => {}
            Err(e) => warn!("Could not restore booking draft: {}", e),
        }
        wizard
    }

    /// Builds a wizard from the `form` config section: slot overrides, time
    /// zone, draft TTL, and a file draft store when `draft_dir` is set.
    pub fn from_config(config: &FormConfig) -> Result<Self, WizardError> {
        let slots = Arc::new(SlotTable::from_config(config.slots.as_ref())?);
        let store: Arc<dyn DraftStore> = match config.draft_dir.as_deref() {
            Some(dir) => Arc::new(FileDraftStore::new(dir)?),
            None => Arc::new(MemoryDraftStore::new()),
        };
        let drafts = match config.draft_ttl_secs {
            Some(ttl) => DraftCache::with_ttl(store, ttl),
            None => DraftCache::new(store),
        };
        Ok(Self::new(slots, drafts)
            .in_time_zone(slots::parse_time_zone(config.time_zone.as_deref())))
    }

    /// Sets the zone that decides which day is "today".
    pub fn in_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = time_zone;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn today(&self) -> NaiveDate {
        slots::today_in(self.time_zone, self.now())
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The current toast, unless it has timed out.
    pub fn toast(&self) -> Option<&Toast> {
        let now = self.now();
        self.toast.as_ref().filter(|t| !t.is_expired(now))
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    /// Values shown on the review and success screens.
    pub fn summary(&self) -> Option<&BookingRequest> {
        self.summary.as_ref()
    }

    /// Slots for the selected date; empty without a date.
    pub fn available_slots(&self) -> &[String] {
        match self.fields.date {
            Some(date) => self.slots.slots_for(date),
            None => &[],
        }
    }

    /// Hint displayed under the slot grid, if any.
    pub fn slot_hint(&self) -> Option<&'static str> {
        match self.fields.date {
            None => Some(HINT_PICK_DATE),
            Some(_) if self.available_slots().is_empty() => Some(HINT_NO_SLOTS),
            Some(_) => None,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.fields.name = name.into();
        self.mirror_draft();
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.fields.email = email.into();
        self.mirror_draft();
        Ok(())
    }

    /// Stores the phone number with the country prefix enforced.
    pub fn set_phone(&mut self, phone: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.fields.phone = validation::normalize_phone(phone);
        self.mirror_draft();
        Ok(())
    }

    pub fn set_message(&mut self, message: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.fields.message = message.into();
        self.mirror_draft();
        Ok(())
    }

    /// Picks a day. The previously chosen slot and its error are cleared.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if !slots::is_selectable(date, self.today()) {
            return Err(WizardError::PastDate(date));
        }
        self.fields.date = Some(date);
        self.fields.time = None;
        self.errors.remove(Field::Time);
        self.mirror_draft();
        Ok(())
    }

    /// Picks one of the slots offered on the selected date.
    pub fn select_time(&mut self, slot: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let date = self.fields.date.ok_or(WizardError::NoDateSelected)?;
        if !self.slots.offers(date, slot) {
            return Err(WizardError::SlotNotOffered {
                date,
                slot: slot.to_string(),
            });
        }
        self.fields.time = Some(slot.to_string());
        self.mirror_draft();
        Ok(())
    }

    /// Field lost focus.
    pub fn blur(&mut self, field: Field) {
        validation::check_on_blur(&mut self.errors, field, &self.fields);
    }

    /// Validates the details step and moves to review.
    pub fn next(&mut self) -> Result<&BookingRequest, WizardError> {
        self.ensure_editable()?;
        self.check_all()?;
        self.step = Step::Review;
        Ok(self.summary.insert(BookingRequest::from_fields(&self.fields)))
    }

    /// Returns from review to the details step with all values kept.
    pub fn back(&mut self) {
        if self.step == Step::Review {
            self.step = Step::Details;
        }
    }

    /// Sends the booking through `client`. Only the review step can submit.
    ///
    /// An invalid form still gets the error toast. On success the draft is cleared, the wizard moves to [`Step::Done`] and
    /// the message for the embedding page is returned. On failure everything
    /// stays in place so the user can retry.
    pub async fn submit(
        &mut self,
        client: &dyn SubmissionClient,
    ) -> Result<ParentMessage, WizardError> {
        if self.step == Step::Done {
            return Err(WizardError::AlreadySubmitted);
        }
        if let Err(e) = self.check_all() {
            self.toast = Some(Toast::error(toast::MSG_FIX_FIELDS, self.now()));
            return Err(e);
        }
        if self.step != Step::Review {
            return Err(WizardError::NotReviewed);
        }

        self.toast = Some(Toast::info(toast::MSG_PROCESSING, self.now()));
        let request = BookingRequest::from_fields(&self.fields);

        match client.submit(&request).await {
            Ok(data) => {
                info!("Booking submitted for {} at {}", request.date, request.time);
                if let Err(e) = self.drafts.clear() {
                    warn!("Could not clear booking draft: {}", e);
                }
                self.errors.clear();
                self.summary = Some(request);
                self.step = Step::Done;
                self.toast = Some(Toast::success(toast::MSG_BOOKED, self.now()));
                Ok(ParentMessage::quiz_submission(data))
            }
            Err(e) => {
                error!("Error submitting form: {}", e);
                self.toast = Some(Toast::error(toast::MSG_BOOKING_FAILED, self.now()));
                Err(e.into())
            }
        }
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        match self.step {
            Step::Details => Ok(()),
            step => Err(WizardError::Locked(step)),
        }
    }

    fn check_all(&mut self) -> Result<(), WizardError> {
        let errors = validation::validate(&self.fields);
        if errors.is_empty() {
            self.errors.clear();
            return Ok(());
        }
        debug!(
            "Validation failed for: {:?}",
            errors.fields().collect::<Vec<_>>()
        );
        let count = errors.len();
        self.errors = errors;
        Err(WizardError::Invalid(count))
    }

    fn mirror_draft(&self) {
        if let Err(e) = self.drafts.mirror(&self.fields, self.now()) {
            warn!("Could not save booking draft: {}", e);
        }
    }
}
