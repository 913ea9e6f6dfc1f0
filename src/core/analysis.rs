//! Expense analytics - weekly and monthly spend comparisons.
//!
//! The analyzer sums a user's expenses over four calendar windows anchored on a
//! reference date and derives how much less was spent than in the prior period.
//! That derived "saved" figure is a spending-reduction signal only; it is unrelated
//! to `saving_goals.saved_amount`, which users set by hand.
//!
//! Window boundaries (all inclusive):
//! - this week: most recent Monday on or before the reference date, through the reference date
//! - last week: the Monday-to-Sunday before that
//! - this month: the 1st of the reference month, through the reference date
//! - last month: the whole previous calendar month

use crate::errors::{Error, Result};
use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Source of per-user expense totals.
///
/// Implementations return the sum of `amount` over every expense owned by
/// `user_id` dated within `[start, end]` inclusive, and `0.0` (not an error) when
/// nothing matches.
pub trait ExpenseStore {
    /// Sums expense amounts for a user within an inclusive date range.
    fn sum_amount_in_range(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<f64>> + Send;
}

/// The four calendar windows derived from a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindows {
    /// The "now" anchor; closes both current-period windows
    pub reference: NaiveDate,
    /// Monday of the reference week
    pub start_of_week: NaiveDate,
    /// Monday of the previous week
    pub start_of_last_week: NaiveDate,
    /// Sunday of the previous week
    pub end_of_last_week: NaiveDate,
    /// First day of the reference month
    pub start_of_month: NaiveDate,
    /// First day of the previous month
    pub start_of_last_month: NaiveDate,
    /// Last day of the previous month
    pub end_of_last_month: NaiveDate,
}

impl AnalysisWindows {
    /// Computes the window boundaries for `reference`.
    ///
    /// # Errors
    /// Returns `Error::Validation` when a window would start before the earliest
    /// representable date.
    pub fn for_date(reference: NaiveDate) -> Result<Self> {
        let days_back = |date: NaiveDate, days: u32| {
            date.checked_sub_days(Days::new(u64::from(days)))
                .ok_or_else(|| Error::Validation {
                    message: format!("reference date {reference} is out of range"),
                })
        };

        let start_of_week = days_back(reference, reference.weekday().num_days_from_monday())?;
        let start_of_last_week = days_back(start_of_week, 7)?;
        let end_of_last_week = days_back(start_of_week, 1)?;

        let start_of_month = days_back(reference, reference.day0())?;
        let end_of_last_month = days_back(start_of_month, 1)?;
        let start_of_last_month = days_back(end_of_last_month, end_of_last_month.day0())?;

        Ok(Self {
            reference,
            start_of_week,
            start_of_last_week,
            end_of_last_week,
            start_of_month,
            start_of_last_month,
            end_of_last_month,
        })
    }
}

/// Spend totals for the four windows plus the derived savings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Spent from Monday of this week through the reference date
    pub this_week_spent: f64,
    /// Spent during the previous Monday-to-Sunday week
    pub last_week_spent: f64,
    /// Spent from the 1st of this month through the reference date
    pub this_month_spent: f64,
    /// Spent during the whole previous calendar month
    pub last_month_spent: f64,
    /// `max(last_week_spent - this_week_spent, 0)`
    pub saved_this_week: f64,
    /// `max(last_month_spent - this_month_spent, 0)`
    pub saved_this_month: f64,
}

impl AnalysisResult {
    /// Builds a result from the four window totals, deriving the savings.
    ///
    /// Overspending yields zero saved, never a negative figure.
    #[must_use]
    pub fn from_totals(
        this_week_spent: f64,
        last_week_spent: f64,
        this_month_spent: f64,
        last_month_spent: f64,
    ) -> Self {
        Self {
            this_week_spent,
            last_week_spent,
            this_month_spent,
            last_month_spent,
            saved_this_week: (last_week_spent - this_week_spent).max(0.0),
            saved_this_month: (last_month_spent - this_month_spent).max(0.0),
        }
    }
}

/// Computes [`AnalysisResult`]s from an [`ExpenseStore`].
///
/// Read-only; safe to call concurrently and to retry. It does not check that the
/// user exists: an unknown user simply has no expenses and gets all zeros.
#[derive(Debug, Clone, Copy)]
pub struct ExpenseAnalyzer<'a, S> {
    store: &'a S,
}

impl<'a, S> ExpenseAnalyzer<'a, S>
where
    S: ExpenseStore + Sync,
{
    /// Creates an analyzer reading from `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Analyzes `user_id`'s spending relative to `reference_date`.
    ///
    /// # Errors
    /// Store failures are returned unchanged; no partial result is produced. A
    /// reference date too close to the start of the calendar is a validation error.
    #[instrument(skip(self))]
    pub async fn analyze(
        &self,
        user_id: i64,
        reference_date: NaiveDate,
    ) -> Result<AnalysisResult> {
        let windows = AnalysisWindows::for_date(reference_date)?;

        let this_week_spent = self
            .store
            .sum_amount_in_range(user_id, windows.start_of_week, windows.reference)
            .await?;
        let last_week_spent = self
            .store
            .sum_amount_in_range(user_id, windows.start_of_last_week, windows.end_of_last_week)
            .await?;
        let this_month_spent = self
            .store
            .sum_amount_in_range(user_id, windows.start_of_month, windows.reference)
            .await?;
        let last_month_spent = self
            .store
            .sum_amount_in_range(
                user_id,
                windows.start_of_last_month,
                windows.end_of_last_month,
            )
            .await?;

        let result = AnalysisResult::from_totals(
            this_week_spent,
            last_week_spent,
            this_month_spent,
            last_month_spent,
        );
        debug!(?result, "Expense analysis complete");
        Ok(result)
    }

    /// Analyzes relative to today's local calendar date.
    pub async fn analyze_today(&self, user_id: i64) -> Result<AnalysisResult> {
        self.analyze(user_id, Local::now().date_naive()).await
    }
}
