//! Calendar labels
//!
//! Display strings follow the product's pt-BR copy: month and weekday names,
//! the short (`"06 de Fevereiro"`) and long (`"06 de Fevereiro de 2025"`)
//! date labels stamped onto appointments, and the opening-hours label shown
//! on the shop card.

use jiff::civil::Date;

/// Month names, January first.
pub const MONTHS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Weekday names, Sunday first.
pub const WEEKDAYS: [&str; 7] = [
    "Domingo",
    "Segunda",
    "Terça-Feira",
    "Quarta-Feira",
    "Quinta-Feira",
    "Sexta-Feira",
    "Sábado",
];

/// Name of a one-based calendar month, or `""` when out of range.
#[must_use]
pub fn month_name(month: i8) -> &'static str {
    usize::try_from(month)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|m| MONTHS.get(m))
        .copied()
        .unwrap_or_default()
}

/// Name of a Sunday-zero weekday index, or `""` when out of range.
#[must_use]
pub fn weekday_name(weekday: i8) -> &'static str {
    usize::try_from(weekday)
        .ok()
        .and_then(|w| WEEKDAYS.get(w))
        .copied()
        .unwrap_or_default()
}

/// Short display label: `"06 de Fevereiro"`.
#[must_use]
pub fn short_label(date: Date) -> String {
    format!("{:02} de {}", date.day(), month_name(date.month()))
}

/// Long display label: `"06 de Fevereiro de 2025"`.
#[must_use]
pub fn long_label(date: Date) -> String {
    format!(
        "{:02} de {} de {}",
        date.day(),
        month_name(date.month()),
        date.year()
    )
}

/// Opening-hours label: `"09:00 - 21:00"`, or `"Fechado"` for a closed day.
#[must_use]
pub fn hours_label(opens: Option<&str>, closes: Option<&str>) -> String {
    match (opens, closes) {
        (Some(opens), Some(closes)) => format!("{opens} - {closes}"),
        _ => "Fechado".to_owned(),
    }
}
