//! # Sale History Filtering
//!
//! Pure filtering over a loaded sale history: free-text search on the
//! customer name or invoice number, plus a date-range filter. The result
//! is ordered newest first, which is how the history screen lists it.
//!
//! The caller supplies "now" so the filter stays a pure function and the
//! boundary cases (a sale at 23:59 yesterday) are testable.

use chrono::{DateTime, Datelike, Utc};

use crate::sale::Sale;

/// The date ranges offered by the history screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    /// Same calendar date as `now`.
    Today,
    /// The last seven calendar days, including today.
    ThisWeek,
    /// Same calendar month as `now`.
    ThisMonth,
}

impl DateFilter {
    fn matches(&self, sale_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let sale_date = sale_at.date_naive();
        let today = now.date_naive();

        match self {
            DateFilter::All => true,
            DateFilter::Today => sale_date == today,
            DateFilter::ThisWeek => {
                let days = (today - sale_date).num_days();
                (0..=6).contains(&days)
            }
            DateFilter::ThisMonth => {
                sale_date.year() == today.year() && sale_date.month() == today.month()
            }
        }
    }
}

/// Filters and orders a sale history for display.
///
/// An empty query matches everything; otherwise the query must appear
/// (case-insensitively) in the customer name or the invoice number.
pub fn filter_sales<'a>(
    sales: &'a [Sale],
    query: &str,
    date_filter: DateFilter,
    now: DateTime<Utc>,
) -> Vec<&'a Sale> {
    let query = query.trim().to_lowercase();

    let mut matched: Vec<&Sale> = sales
        .iter()
        .filter(|sale| {
            if query.is_empty() {
                return true;
            }
            let customer_hit = sale
                .customer
                .as_ref()
                .map(|c| c.name.to_lowercase().contains(&query))
                .unwrap_or(false);
            customer_hit || sale.invoice_number.to_lowercase().contains(&query)
        })
        .filter(|sale| date_filter.matches(sale.timestamp, now))
        .collect();

    matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    matched
}

// =============================================================================
// Unit Tests
// =============================================================================
