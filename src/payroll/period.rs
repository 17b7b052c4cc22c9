use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Two alternating payroll cohorts whose pay periods are offset by one week.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PayrollGroup {
    A,
    B,
}

impl PayrollGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayrollGroup::A => "A",
            PayrollGroup::B => "B",
        }
    }

    pub fn other(&self) -> PayrollGroup {
        match self {
            PayrollGroup::A => PayrollGroup::B,
            PayrollGroup::B => PayrollGroup::A,
        }
    }
}

impl std::fmt::Display for PayrollGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PayrollGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(PayrollGroup::A),
            "B" => Ok(PayrollGroup::B),
            _ => Err(format!("Invalid PayrollGroup: {}", s)),
        }
    }
}

/// The pay period derived from a pay date: a 14-day window, inclusive of both
/// ends, plus the cohort paid on that date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PayPeriod {
    pub payroll_group: PayrollGroup,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

// Group A pays on the anchor date; groups alternate weekly from there.
fn anchor_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()
}

/// Derives the pay period and payroll group for a pay date.
///
/// All arithmetic is on naive calendar dates; no timezone conversion happens
/// anywhere in the pipeline. The period ends 9 days before the pay date and
/// spans 14 days. Must be re-evaluated on every pay-date change and never
/// memoized across dates.
pub fn period_for_pay_date(pay_date: NaiveDate) -> PayPeriod {
    let period_end = pay_date - Duration::days(9);
    let period_start = period_end - Duration::days(13);

    // Euclidean division keeps the alternation consistent for pay dates
    // before the anchor as well.
    let weeks_since_anchor = (pay_date - anchor_date()).num_days().div_euclid(7);
    let payroll_group = if weeks_since_anchor.rem_euclid(2) == 0 {
        PayrollGroup::A
    } else {
        PayrollGroup::B
    };

    PayPeriod {
        payroll_group,
        period_start,
        period_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn anchor_pay_date_yields_group_a_and_documented_period() {
        let period = period_for_pay_date(date(2025, 1, 3));
        assert_eq!(period.payroll_group, PayrollGroup::A);
        assert_eq!(period.period_end, date(2024, 12, 25));
        assert_eq!(period.period_start, date(2024, 12, 12));
    }

    #[test]
    fn one_week_after_anchor_flips_to_group_b() {
        let period = period_for_pay_date(date(2025, 1, 10));
        assert_eq!(period.payroll_group, PayrollGroup::B);
    }

    #[test]
    fn groups_alternate_every_seven_days() {
        let mut expected = PayrollGroup::A;
        for week in 0..8 {
            let pay_date = date(2025, 1, 3) + Duration::days(7 * week);
            assert_eq!(
                period_for_pay_date(pay_date).payroll_group,
                expected,
                "week {}",
                week
            );
            expected = expected.other();
        }
    }

    #[test]
    fn group_is_stable_within_a_week() {
        for offset in 0..7 {
            let pay_date = date(2025, 1, 3) + Duration::days(offset);
            assert_eq!(period_for_pay_date(pay_date).payroll_group, PayrollGroup::A);
        }
        assert_eq!(
            period_for_pay_date(date(2025, 1, 10)).payroll_group,
            PayrollGroup::B
        );
    }

    #[test]
    fn pay_dates_before_the_anchor_alternate_correctly() {
        // 2024-12-27 is exactly one week before the anchor
        assert_eq!(
            period_for_pay_date(date(2024, 12, 27)).payroll_group,
            PayrollGroup::B
        );
        assert_eq!(
            period_for_pay_date(date(2024, 12, 20)).payroll_group,
            PayrollGroup::A
        );
        // one day before the anchor falls in the previous week
        assert_eq!(
            period_for_pay_date(date(2025, 1, 2)).payroll_group,
            PayrollGroup::B
        );
    }

    #[test]
    fn period_is_always_fourteen_days_inclusive() {
        for offset in [-400, -1, 0, 1, 90, 365] {
            let pay_date = date(2025, 1, 3) + Duration::days(offset);
            let period = period_for_pay_date(pay_date);
            assert_eq!(period.period_end, pay_date - Duration::days(9));
            assert_eq!((period.period_end - period.period_start).num_days(), 13);
        }
    }

    #[test]
    fn period_crosses_month_and_year_boundaries() {
        let period = period_for_pay_date(date(2025, 1, 8));
        assert_eq!(period.period_end, date(2024, 12, 30));
        assert_eq!(period.period_start, date(2024, 12, 17));
    }

    #[test]
    fn payroll_group_parses_case_insensitively() {
        assert_eq!("a".parse::<PayrollGroup>().unwrap(), PayrollGroup::A);
        assert_eq!("B".parse::<PayrollGroup>().unwrap(), PayrollGroup::B);
        assert!("c".parse::<PayrollGroup>().is_err());
    }
}
