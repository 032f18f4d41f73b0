//! Derived views of the collection. Everything here is pure.

mod filter;
mod metrics;

pub use filter::*;
pub use metrics::*;

use chrono::NaiveDate;

/// Format a date the way the dashboard cards show it, e.g. `05 Mar 2024`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(display_date(date), "05 Mar 2024");
    }
}
