//! Revenue aggregation
//!
//! Pure functions over the merged appointments view; nothing is cached.
//! Only completed appointments count: confirmed ones have not happened yet
//! and canceled ones never will.

use rust_decimal::Decimal;

use crate::appointments::{Appointment, AppointmentStatus};

/// Sum of completed-appointment prices for `barber_id` in the given
/// calendar month (`month` is one-based).
#[must_use]
pub fn monthly_revenue(
    barber_id: &str,
    year: i16,
    month: i8,
    appointments: &[Appointment],
) -> Decimal {
    appointments
        .iter()
        .filter(|a| {
            a.barber_id == barber_id
                && a.status == AppointmentStatus::Completed
                && a.date.year() == year
                && a.date.month() == month
        })
        .map(|a| a.price)
        .sum()
}

/// The calendar month before `(year, month)`, rolling December back into
/// the previous year.
#[must_use]
pub fn previous_month(year: i16, month: i8) -> (i16, i8) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}
