pub mod compensation;
pub mod period;

pub use compensation::{LineAmount, PricedEntry, compute_line, price_entries};
pub use period::{PayPeriod, PayrollGroup, period_for_pay_date};
