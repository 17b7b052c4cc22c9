use std::collections::HashMap;

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use uuid::Uuid;

use crate::database::models::{CompensationType, Employee, EntryInput};

/// Result of pricing a single entered line. `has_data` decides whether the
/// row is included at save/submit time; invalid measures price to zero and
/// are excluded rather than clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct LineAmount {
    pub amount: BigDecimal,
    pub has_data: bool,
}

impl LineAmount {
    fn empty() -> Self {
        Self {
            amount: BigDecimal::zero(),
            has_data: false,
        }
    }
}

/// An entry that priced with data, ready to persist.
#[derive(Debug, Clone)]
pub struct PricedEntry {
    pub entry: EntryInput,
    pub amount: BigDecimal,
}

fn round_money(amount: BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

/// Prices one entry against the employee's compensation profile.
///
/// - hourly: hours × hourly rate, valid only for 0 < hours ≤ 80
/// - production: units × piece rate, valid only for units > 0
/// - fixed: pay count × fixed pay + adjustment; count defaults to 1 and the
///   adjustment is unbounded in either direction
///
/// Invoked on every edit, so it must stay cheap and side-effect-free.
pub fn compute_line(employee: &Employee, entry: &EntryInput) -> LineAmount {
    match employee.compensation_type {
        CompensationType::Hourly => {
            let hours = match &entry.hours {
                Some(h) => h.clone(),
                None => return LineAmount::empty(),
            };
            if hours <= BigDecimal::zero() || hours > BigDecimal::from(80) {
                return LineAmount::empty();
            }
            let rate = employee.hourly_rate.clone().unwrap_or_else(BigDecimal::zero);
            LineAmount {
                amount: round_money(hours * rate),
                has_data: true,
            }
        }
        CompensationType::Production => {
            let units = match &entry.units {
                Some(u) => u.clone(),
                None => return LineAmount::empty(),
            };
            if units <= BigDecimal::zero() {
                return LineAmount::empty();
            }
            let rate = employee.piece_rate.clone().unwrap_or_else(BigDecimal::zero);
            LineAmount {
                amount: round_money(units * rate),
                has_data: true,
            }
        }
        CompensationType::Fixed => {
            let count = entry.pay_count.unwrap_or(1);
            if count <= 0 {
                return LineAmount::empty();
            }
            let fixed = employee.fixed_pay.clone().unwrap_or_else(BigDecimal::zero);
            let adjustment = entry.adjustment.clone().unwrap_or_else(BigDecimal::zero);
            LineAmount {
                amount: round_money(fixed * BigDecimal::from(count) + adjustment),
                has_data: true,
            }
        }
    }
}

/// Prices a batch of entered lines against the location's employees, keeping
/// only the ones with data. Entries referencing employees outside the given
/// roster (unknown, archived, or the other payroll group) are dropped.
pub fn price_entries(employees: &[Employee], entries: &[EntryInput]) -> Vec<PricedEntry> {
    let by_id: HashMap<Uuid, &Employee> = employees.iter().map(|e| (e.id, e)).collect();

    entries
        .iter()
        .filter_map(|entry| {
            let employee = by_id.get(&entry.employee_id)?;
            let line = compute_line(employee, entry);
            line.has_data.then(|| PricedEntry {
                entry: entry.clone(),
                amount: line.amount,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use crate::payroll::PayrollGroup;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    fn employee(compensation_type: CompensationType) -> Employee {
        let now = Utc::now();
        Employee {
            id: Uuid::new_v4(),
            location_id: Uuid::new_v4(),
            name: "Maria Alvarez".to_string(),
            payroll_group: PayrollGroup::A,
            compensation_type,
            hourly_rate: Some(dec("20.00")),
            piece_rate: Some(dec("0.55")),
            fixed_pay: Some(dec("750.00")),
            archived_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn entry_for(employee: &Employee) -> EntryInput {
        EntryInput {
            employee_id: employee.id,
            hours: None,
            units: None,
            pay_count: None,
            adjustment: None,
            notes: None,
        }
    }

    #[test]
    fn hourly_forty_hours_at_twenty() {
        let emp = employee(CompensationType::Hourly);
        let mut entry = entry_for(&emp);
        entry.hours = Some(dec("40"));

        let line = compute_line(&emp, &entry);
        assert!(line.has_data);
        assert_eq!(line.amount, dec("800.00"));
    }

    #[test]
    fn hourly_above_eighty_is_excluded_not_clamped() {
        let emp = employee(CompensationType::Hourly);
        let mut entry = entry_for(&emp);
        entry.hours = Some(dec("81"));

        let line = compute_line(&emp, &entry);
        assert!(!line.has_data);
        assert_eq!(line.amount, BigDecimal::zero());
    }

    #[test]
    fn hourly_boundary_and_zero() {
        let emp = employee(CompensationType::Hourly);

        let mut at_cap = entry_for(&emp);
        at_cap.hours = Some(dec("80"));
        assert!(compute_line(&emp, &at_cap).has_data);
        assert_eq!(compute_line(&emp, &at_cap).amount, dec("1600.00"));

        let mut zero = entry_for(&emp);
        zero.hours = Some(dec("0"));
        assert!(!compute_line(&emp, &zero).has_data);

        let mut negative = entry_for(&emp);
        negative.hours = Some(dec("-4"));
        assert!(!compute_line(&emp, &negative).has_data);
    }

    #[test]
    fn hourly_fractional_hours_round_half_up() {
        let emp = Employee {
            hourly_rate: Some(dec("21.37")),
            ..employee(CompensationType::Hourly)
        };
        let mut entry = entry_for(&emp);
        entry.hours = Some(dec("37.5"));

        // 37.5 * 21.37 = 801.375 -> 801.38
        assert_eq!(compute_line(&emp, &entry).amount, dec("801.38"));
    }

    #[test]
    fn production_requires_positive_units() {
        let emp = employee(CompensationType::Production);

        let mut entry = entry_for(&emp);
        entry.units = Some(dec("200"));
        let line = compute_line(&emp, &entry);
        assert!(line.has_data);
        assert_eq!(line.amount, dec("110.00"));

        entry.units = Some(dec("0"));
        assert!(!compute_line(&emp, &entry).has_data);

        entry.units = Some(dec("-5"));
        assert!(!compute_line(&emp, &entry).has_data);
    }

    #[test]
    fn fixed_count_defaults_to_one_with_negative_adjustment() {
        let emp = employee(CompensationType::Fixed);
        let mut entry = entry_for(&emp);
        entry.adjustment = Some(dec("-100"));

        let line = compute_line(&emp, &entry);
        assert!(line.has_data);
        assert_eq!(line.amount, dec("650.00"));
    }

    #[test]
    fn fixed_count_multiplies_and_zero_count_excludes() {
        let emp = employee(CompensationType::Fixed);

        let mut entry = entry_for(&emp);
        entry.pay_count = Some(2);
        entry.adjustment = Some(dec("50"));
        assert_eq!(compute_line(&emp, &entry).amount, dec("1550.00"));

        entry.pay_count = Some(0);
        assert!(!compute_line(&emp, &entry).has_data);
    }

    #[test]
    fn hourly_entry_without_hours_has_no_data() {
        let emp = employee(CompensationType::Hourly);
        let entry = entry_for(&emp);
        assert!(!compute_line(&emp, &entry).has_data);
    }

    #[test]
    fn price_entries_drops_unknown_employees_and_empty_lines() {
        let hourly = employee(CompensationType::Hourly);
        let fixed = employee(CompensationType::Fixed);

        let mut worked = entry_for(&hourly);
        worked.hours = Some(dec("10"));

        let salaried = entry_for(&fixed);

        let mut stranger = entry_for(&hourly);
        stranger.employee_id = Uuid::new_v4();
        stranger.hours = Some(dec("10"));

        let mut empty = entry_for(&hourly);
        empty.employee_id = hourly.id;

        let roster = vec![hourly.clone(), fixed.clone()];
        let priced = price_entries(&roster, &[worked, salaried, stranger, empty]);

        // hourly line with hours + fixed line (count defaults to 1)
        assert_eq!(priced.len(), 2);
        assert_eq!(priced[0].entry.employee_id, hourly.id);
        assert_eq!(priced[0].amount, dec("200.00"));
        assert_eq!(priced[1].entry.employee_id, fixed.id);
        assert_eq!(priced[1].amount, dec("750.00"));
    }
}
