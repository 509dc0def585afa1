use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::{
    app::AppError,
    database::{models::comment::CommentAnalytics, Store},
};

/// Inclusive range of calendar days, `?date_from=YYYY-MM-DD&date_to=YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DateRange {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// Last representable instant of `day`
fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    match day.succ_opt() {
        Some(next) => start_of_day(next) - Duration::microseconds(1),
        None => NaiveDateTime::MAX,
    }
}

/// Counts unblocked and blocked comments per calendar day of their creation
/// timestamp. Days without any comment are left out; an inverted range is
/// simply empty.
pub async fn daily_breakdown(
    store: &dyn Store,
    range: DateRange,
) -> Result<Vec<CommentAnalytics>, AppError> {
    if range.date_from > range.date_to {
        return Ok(Vec::new());
    }

    let mut rows = store
        .daily_comment_counts(start_of_day(range.date_from), end_of_day(range.date_to))
        .await?;
    rows.retain(|row| row.created_comments + row.blocked_comments > 0);
    rows.sort_by_key(|row| row.day);

    log::debug!(
        "comment breakdown {} to {}: {} day(s)",
        range.date_from,
        range.date_to,
        rows.len()
    );
    Ok(rows)
}
