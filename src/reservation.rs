//! Reservation workflow
//!
//! A short-lived wizard turning a service selection into a confirmed
//! appointment: pick a barber, pick a month/day/time inside a bounded
//! window, pass the availability check, confirm. One instance per booking
//! attempt; a successful confirmation is terminal and a new attempt starts
//! a fresh workflow.

use jiff::{Span, Zoned, civil::Date};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    absences::AbsenceRegistry,
    appointments::{Appointment, AppointmentStore, NewAppointment},
    barbers::Barber,
    dates,
    services::Service,
    sessions::CustomerIdentity,
    store::StoreError,
};

/// Offered time-of-day slots.
pub const TIME_SLOTS: [&str; 8] = [
    "09:00", "09:45", "10:30", "11:15", "14:00", "15:00", "16:30", "17:00",
];

/// Preselected slot when the wizard opens.
const DEFAULT_SLOT: &str = "09:45";

/// How far ahead of the current month the calendar may navigate.
const MAX_MONTHS_AHEAD: i64 = 12;

/// Customer name used when no customer session is active.
const PLACEHOLDER_CUSTOMER: &str = "Cliente";

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStep {
    /// Choosing which barber to book.
    SelectingBarber,

    /// Choosing month, day and time slot.
    SelectingDateTime,

    /// Appointment created; terminal.
    Confirmed,
}

/// Why a confirmation was refused.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// No barber has been selected yet.
    #[error("no barber selected")]
    MissingBarber,

    /// No day has been selected yet.
    #[error("no day selected")]
    MissingDay,

    /// The selected barber is away on the selected date.
    #[error("barber is away on the selected date")]
    BarberUnavailable,

    /// The workflow already confirmed; start a new reservation instead.
    #[error("reservation was already confirmed")]
    AlreadyConfirmed,

    /// The appointment store refused or failed the write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Barber id and display name snapshotted at selection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarberChoice {
    /// Barber id.
    pub id: String,

    /// Barber display name.
    pub name: String,
}

/// The wizard state machine.
#[derive(Debug)]
pub struct ReservationWorkflow {
    service_name: String,
    price: Decimal,
    today: Date,
    step: ReservationStep,
    barber: Option<BarberChoice>,
    /// First day of the month the calendar currently shows.
    cursor: Date,
    day: Option<i8>,
    time: String,
}

impl ReservationWorkflow {
    /// Start a reservation for `service`, with `today` as the calendar
    /// anchor. The month cursor opens on the current month and the default
    /// time slot is preselected.
    pub fn new(service: &Service, today: Date) -> Self {
        Self {
            service_name: service.name.clone(),
            price: service.price,
            today,
            step: ReservationStep::SelectingBarber,
            barber: None,
            cursor: today.first_of_month(),
            day: None,
            time: DEFAULT_SLOT.to_owned(),
        }
    }

    /// Start a reservation anchored on the local wall-clock date.
    pub fn start_today(service: &Service) -> Self {
        Self::new(service, Zoned::now().date())
    }

    /// The current step.
    #[must_use]
    pub fn step(&self) -> ReservationStep {
        self.step
    }

    /// The selected barber, if any.
    #[must_use]
    pub fn barber(&self) -> Option<&BarberChoice> {
        self.barber.as_ref()
    }

    /// The selected time slot.
    #[must_use]
    pub fn time(&self) -> &str {
        &self.time
    }

    /// Year of the month the calendar shows.
    #[must_use]
    pub fn year(&self) -> i16 {
        self.cursor.year()
    }

    /// One-based month the calendar shows.
    #[must_use]
    pub fn month(&self) -> i8 {
        self.cursor.month()
    }

    /// Select (or change) the barber. Allowed until confirmation.
    pub fn select_barber(&mut self, barber: &Barber) {
        if self.step == ReservationStep::Confirmed {
            return;
        }
        self.barber = Some(BarberChoice {
            id: barber.id.clone(),
            name: barber.name.clone(),
        });
    }

    /// Advance from barber selection to date/time selection.
    ///
    /// A guard, not an error: returns `false` and stays put when no barber
    /// is selected or the workflow is not on the barber step.
    pub fn advance(&mut self) -> bool {
        if self.step == ReservationStep::SelectingBarber && self.barber.is_some() {
            self.step = ReservationStep::SelectingDateTime;
            return true;
        }
        false
    }

    /// Return from date/time selection to barber selection, keeping the
    /// current barber. No-op on any other step.
    pub fn back(&mut self) {
        if self.step == ReservationStep::SelectingDateTime {
            self.step = ReservationStep::SelectingBarber;
        }
    }

    fn forward_limit(&self) -> Date {
        self.today
            .first_of_month()
            .saturating_add(Span::new().months(MAX_MONTHS_AHEAD))
    }

    /// Whether the calendar may navigate to the next month.
    #[must_use]
    pub fn can_advance_month(&self) -> bool {
        self.cursor < self.forward_limit()
    }

    /// Whether the calendar may navigate to the previous month.
    #[must_use]
    pub fn can_rewind_month(&self) -> bool {
        self.cursor > self.today.first_of_month()
    }

    /// Show the next month. Clears any day selection so a day number can
    /// never carry over into a month where it does not exist.
    pub fn next_month(&mut self) {
        if self.can_advance_month() {
            self.cursor = self.cursor.saturating_add(Span::new().months(1));
            self.day = None;
        }
    }

    /// Show the previous month. Clears any day selection.
    pub fn previous_month(&mut self) {
        if self.can_rewind_month() {
            self.cursor = self.cursor.saturating_sub(Span::new().months(1));
            self.day = None;
        }
    }

    /// The day cells of the calendar grid, Sunday-first: leading `None`
    /// cells pad to the weekday the month starts on, then the day numbers.
    #[must_use]
    pub fn day_grid(&self) -> Vec<Option<i8>> {
        let offset = self.cursor.weekday().to_sunday_zero_offset();
        let blanks = (0..offset).map(|_| None);
        let days = (1..=self.cursor.days_in_month()).map(Some);
        blanks.chain(days).collect()
    }

    /// Whether `day` exists in the shown month and is not in the past.
    #[must_use]
    pub fn day_selectable(&self, day: i8) -> bool {
        Date::new(self.cursor.year(), self.cursor.month(), day)
            .is_ok_and(|date| date >= self.today)
    }

    /// Select a day in the shown month. Returns `false` (leaving the
    /// selection unchanged) for past or nonexistent days, or off-step calls.
    pub fn select_day(&mut self, day: i8) -> bool {
        if self.step != ReservationStep::SelectingDateTime || !self.day_selectable(day) {
            return false;
        }
        self.day = Some(day);
        true
    }

    /// Select a time slot. Returns `false` for slots not on offer.
    pub fn select_time(&mut self, slot: &str) -> bool {
        if TIME_SLOTS.contains(&slot) {
            self.time = slot.to_owned();
            return true;
        }
        false
    }

    /// The selected calendar date, once a day is chosen.
    #[must_use]
    pub fn selected_date(&self) -> Option<Date> {
        let day = self.day?;
        Date::new(self.cursor.year(), self.cursor.month(), day).ok()
    }

    /// Whether the current barber/date pair is blocked by an absence.
    ///
    /// `false` while either selection is missing; the advisory only appears
    /// once there is a concrete pair to check.
    pub fn blocked(&self, absences: &AbsenceRegistry) -> bool {
        match (&self.barber, self.selected_date()) {
            (Some(barber), Some(date)) => absences.is_unavailable(&barber.id, date),
            _ => false,
        }
    }

    /// Confirm the reservation: validate the selections, re-check
    /// availability, snapshot the service and barber, and create the
    /// appointment. Moves to [`ReservationStep::Confirmed`] on success.
    ///
    /// Customer fields come from the active customer identity when present,
    /// else placeholder values.
    ///
    /// # Errors
    ///
    /// Returns a [`ReservationError`] when the workflow already confirmed, a
    /// selection is missing, the barber is away on the chosen date, or the
    /// appointment store rejects the write.
    pub fn confirm(
        &mut self,
        absences: &AbsenceRegistry,
        appointments: &AppointmentStore,
        customer: Option<&CustomerIdentity>,
    ) -> Result<Appointment, ReservationError> {
        if self.step == ReservationStep::Confirmed {
            return Err(ReservationError::AlreadyConfirmed);
        }

        let barber = self.barber.clone().ok_or(ReservationError::MissingBarber)?;
        let date = self.selected_date().ok_or(ReservationError::MissingDay)?;

        if absences.is_unavailable(&barber.id, date) {
            return Err(ReservationError::BarberUnavailable);
        }

        let customer_name = customer
            .map(|c| c.name.clone())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_CUSTOMER.to_owned());

        let appointment = appointments.add(NewAppointment {
            service_name: self.service_name.clone(),
            barber_id: barber.id,
            barber_name: barber.name,
            customer_name,
            customer_phone: String::new(),
            date,
            time: self.time.clone(),
            price: self.price,
            date_label: dates::short_label(date),
            date_label_long: dates::long_label(date),
        })?;

        self.step = ReservationStep::Confirmed;
        Ok(appointment)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use testresult::TestResult;

    use crate::{catalog::FALLBACK_IMAGE, storage::MemoryBackend};

    use super::*;

    fn service() -> Service {
        Service {
            id: "s1".to_owned(),
            name: "Corte de Cabelo".to_owned(),
            description: String::new(),
            price: Decimal::from(50),
            duration_minutes: 45,
            image_url: FALLBACK_IMAGE.to_owned(),
        }
    }

    fn barber() -> Barber {
        Barber {
            id: "b1".to_owned(),
            name: "João Silva".to_owned(),
            avatar: String::new(),
            login: "joao".to_owned(),
            password: "123456".to_owned(),
        }
    }

    /// Anchored on a Friday, 2025-03-14.
    fn workflow() -> ReservationWorkflow {
        ReservationWorkflow::new(&service(), date(2025, 3, 14))
    }

    #[test]
    fn advance_requires_a_barber() {
        let mut wf = workflow();

        assert!(!wf.advance(), "no barber selected yet");
        assert_eq!(wf.step(), ReservationStep::SelectingBarber);

        wf.select_barber(&barber());

        assert!(wf.advance());
        assert_eq!(wf.step(), ReservationStep::SelectingDateTime);
    }

    #[test]
    fn back_keeps_the_barber() {
        let mut wf = workflow();
        wf.select_barber(&barber());
        wf.advance();

        wf.back();

        assert_eq!(wf.step(), ReservationStep::SelectingBarber);
        assert_eq!(wf.barber().map(|b| b.id.as_str()), Some("b1"));
    }

    #[test]
    fn month_navigation_is_bounded() {
        let mut wf = workflow();
        wf.select_barber(&barber());
        wf.advance();

        assert!(!wf.can_rewind_month(), "cannot navigate before this month");

        for _ in 0..20 {
            wf.next_month();
        }

        assert_eq!((wf.year(), wf.month()), (2026, 3), "capped at +12 months");
        assert!(!wf.can_advance_month());

        for _ in 0..20 {
            wf.previous_month();
        }

        assert_eq!((wf.year(), wf.month()), (2025, 3), "back at this month");
    }

    #[test]
    fn changing_month_clears_the_day() {
        let mut wf = workflow();
        wf.select_barber(&barber());
        wf.advance();

        assert!(wf.select_day(31), "March has 31 days");
        wf.next_month();

        assert_eq!(wf.selected_date(), None, "day cleared on month change");
        assert!(!wf.select_day(31), "April has no day 31");
    }

    #[test]
    fn past_days_are_not_selectable() {
        let mut wf = workflow();
        wf.select_barber(&barber());
        wf.advance();

        assert!(!wf.select_day(13), "yesterday");
        assert!(wf.select_day(14), "today is allowed");
        assert!(wf.select_day(15));
    }

    #[test]
    fn day_grid_starts_on_the_right_weekday() {
        // March 2025 starts on a Saturday: six leading blanks, 31 days.
        let wf = workflow();

        let grid = wf.day_grid();

        assert_eq!(grid.len(), 6 + 31);
        assert_eq!(grid.iter().take(6).flatten().count(), 0);
        assert_eq!(grid.get(6).copied(), Some(Some(1)));
        assert_eq!(grid.last().copied(), Some(Some(31)));
    }

    #[test]
    fn unknown_time_slot_is_refused() {
        let mut wf = workflow();

        assert!(!wf.select_time("03:00"));
        assert_eq!(wf.time(), "09:45", "default slot stands");
        assert!(wf.select_time("16:30"));
        assert_eq!(wf.time(), "16:30");
    }

    #[test]
    fn absence_blocks_confirmation_until_the_date_changes() -> TestResult {
        let backend = MemoryBackend::shared();
        let absences = AbsenceRegistry::new(backend.clone());
        let appointments = AppointmentStore::new(Vec::new(), backend);
        absences.add("b1", date(2025, 3, 10), date(2025, 3, 12), None)?;

        let mut wf = ReservationWorkflow::new(&service(), date(2025, 3, 1));
        wf.select_barber(&barber());
        wf.advance();
        wf.select_day(11);

        assert!(wf.blocked(&absences));
        let refused = wf.confirm(&absences, &appointments, None);
        assert!(
            matches!(refused, Err(ReservationError::BarberUnavailable)),
            "confirmation must be blocked inside the absence range"
        );
        assert_eq!(wf.step(), ReservationStep::SelectingDateTime);
        assert!(appointments.all().is_empty(), "nothing was written");

        wf.select_day(13);

        assert!(!wf.blocked(&absences));
        let confirmed = wf.confirm(&absences, &appointments, None)?;
        assert_eq!(confirmed.date, date(2025, 3, 13));

        Ok(())
    }

    #[test]
    fn confirm_snapshots_service_barber_and_labels() -> TestResult {
        let backend = MemoryBackend::shared();
        let absences = AbsenceRegistry::new(backend.clone());
        let appointments = AppointmentStore::new(Vec::new(), backend);

        let mut wf = workflow();
        wf.select_barber(&barber());
        wf.advance();
        wf.select_day(20);
        wf.select_time("14:00");

        let customer = CustomerIdentity {
            name: "Maria Souza".to_owned(),
            email: "maria@example.com".to_owned(),
        };
        let created = wf.confirm(&absences, &appointments, Some(&customer))?;

        assert_eq!(created.service_name, "Corte de Cabelo");
        assert_eq!(created.price, Decimal::from(50));
        assert_eq!(created.barber_id, "b1");
        assert_eq!(created.barber_name, "João Silva");
        assert_eq!(created.customer_name, "Maria Souza");
        assert_eq!(created.time, "14:00");
        assert_eq!(created.date_label, "20 de Março");
        assert_eq!(created.date_label_long, "20 de Março de 2025");
        assert_eq!(wf.step(), ReservationStep::Confirmed);

        Ok(())
    }

    #[test]
    fn confirmed_is_terminal() -> TestResult {
        let backend = MemoryBackend::shared();
        let absences = AbsenceRegistry::new(backend.clone());
        let appointments = AppointmentStore::new(Vec::new(), backend);

        let mut wf = workflow();
        wf.select_barber(&barber());
        wf.advance();
        wf.select_day(20);
        wf.confirm(&absences, &appointments, None)?;

        let again = wf.confirm(&absences, &appointments, None);

        assert!(
            matches!(again, Err(ReservationError::AlreadyConfirmed)),
            "a confirmed workflow cannot confirm again"
        );
        assert_eq!(appointments.all().len(), 1, "no duplicate appointment");

        wf.back();
        assert_eq!(
            wf.step(),
            ReservationStep::Confirmed,
            "no backward transition out of Confirmed"
        );

        Ok(())
    }

    #[test]
    fn confirm_without_customer_uses_placeholders() -> TestResult {
        let backend = MemoryBackend::shared();
        let absences = AbsenceRegistry::new(backend.clone());
        let appointments = AppointmentStore::new(Vec::new(), backend);

        let mut wf = workflow();
        wf.select_barber(&barber());
        wf.advance();
        wf.select_day(20);

        let created = wf.confirm(&absences, &appointments, None)?;

        assert_eq!(created.customer_name, "Cliente");
        assert_eq!(created.customer_phone, "");

        Ok(())
    }

    #[test]
    fn confirm_requires_a_day() {
        let backend = MemoryBackend::shared();
        let absences = AbsenceRegistry::new(backend.clone());
        let appointments = AppointmentStore::new(Vec::new(), backend);

        let mut wf = workflow();
        wf.select_barber(&barber());
        wf.advance();

        let refused = wf.confirm(&absences, &appointments, None);

        assert!(
            matches!(refused, Err(ReservationError::MissingDay)),
            "a day must be selected before confirming"
        );
    }
}
