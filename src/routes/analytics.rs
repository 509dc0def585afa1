use actix_web::{
    get,
    web::{Data, Query},
    HttpResponse,
};

use crate::{
    app::{AppError, AppState},
    auth::CurrentUser,
    blogs::analytics::{self, DateRange},
};

/// Pipe for the daily comment breakdown
/// - url: `{domain}/api/comments-daily-breakdown?date_from=2023-06-25&date_to=2023-06-26`
///
/// # Response
/// ## Ok
/// ```
/// [
///     { "date": "2023-06-25", "created_comments": 1, "blocked_comments": 1 },
///     { "date": "2023-06-26", "created_comments": 1, "blocked_comments": 0 }
/// ]
/// ```
/// ## Error
/// - Unauthorized
/// - Bad request, for a missing or malformed date
#[get("/api/comments-daily-breakdown")]
pub async fn comments_daily_breakdown(
    _user: CurrentUser,
    range: Query<DateRange>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let breakdown =
        analytics::daily_breakdown(app_state.store.as_ref(), range.into_inner()).await?;

    Ok(HttpResponse::Ok().json(breakdown))
}
