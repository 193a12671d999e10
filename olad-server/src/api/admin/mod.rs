//! Admin API handlers.
//!
//! These endpoints are called by the admin dashboard frontend and require
//! the `Olad-Admin-Authorization` header with the plaintext admin secret.
//!
//! Every list endpoint takes the same query-string shape: `search`,
//! per-resource filter params, `date_from`/`date_to`, `sort_by`/`order`,
//! `limit`/`offset`. List responses carry data, pagination and stats in one
//! envelope; the stats block is computed over the unfiltered table, matching
//! the dashboard's headline numbers.

use std::collections::HashMap;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{delete, get, put},
};
use serde::Serialize;

use olad_core::query::{
    FilterSpec, OrderBy, PageRequest, SortSpec, WhereClause, compile,
};
use olad_sdk::objects::envelope::Envelope;

use crate::api::error::ApiError;
use crate::state::AppState;

mod coupons;
mod faqs;
mod reward_history;
mod rewards;
mod settlements;
mod stores;
mod surveys;
mod terms;
mod top_stores;
mod transactions;
mod users;
mod videos;

/// Build the Admin API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::detail)
                .put(users::update)
                .patch(users::toggle_active)
                .delete(users::remove),
        )
        .route("/stores", get(stores::list).post(stores::create))
        .route(
            "/stores/{id}",
            get(stores::detail)
                .put(stores::update)
                .patch(stores::toggle_active)
                .delete(stores::remove),
        )
        .route("/transactions", get(transactions::list))
        .route(
            "/transactions/{id}",
            get(transactions::detail).patch(transactions::update_status),
        )
        .route("/settlements", get(settlements::list))
        .route(
            "/settlements/{id}",
            get(settlements::detail)
                .patch(settlements::update_status)
                .delete(settlements::remove),
        )
        .route("/coupons", get(coupons::list).post(coupons::create))
        .route(
            "/coupons/{id}",
            get(coupons::detail)
                .put(coupons::update)
                .patch(coupons::toggle_active)
                .delete(coupons::remove),
        )
        .route("/rewards", get(rewards::list).post(rewards::create))
        .route(
            "/rewards/{id}",
            get(rewards::detail)
                .put(rewards::update)
                .patch(rewards::toggle_active)
                .delete(rewards::remove),
        )
        .route("/reward-history", get(reward_history::list))
        .route("/reward-history/{id}", get(reward_history::detail))
        .route("/surveys", get(surveys::list).post(surveys::create))
        .route(
            "/surveys/{id}",
            get(surveys::detail)
                .put(surveys::update)
                .patch(surveys::toggle_active)
                .delete(surveys::remove),
        )
        .route("/faqs", get(faqs::list).post(faqs::create))
        .route(
            "/faqs/{id}",
            get(faqs::detail)
                .put(faqs::update)
                .patch(faqs::toggle_active)
                .delete(faqs::remove),
        )
        .route("/terms", get(terms::list).post(terms::create))
        .route(
            "/terms/{id}",
            get(terms::detail)
                .put(terms::update)
                .patch(terms::toggle_active)
                .delete(terms::remove),
        )
        .route("/videos", get(videos::list).post(videos::create))
        .route(
            "/videos/{id}",
            get(videos::detail)
                .put(videos::update)
                .patch(videos::toggle_active)
                .delete(videos::remove),
        )
        .route(
            "/top-stores",
            get(top_stores::list).post(top_stores::add),
        )
        .route("/top-stores/sequence", put(top_stores::reorder))
        .route("/top-stores/{id}", delete(top_stores::remove))
}

/// Raw query-string parameters of a list request.
pub(crate) type ListParams = HashMap<String, String>;

/// Compile the shared list inputs: filter, sort and clamped page.
pub(crate) async fn list_inputs(
    state: &AppState,
    params: &ListParams,
    filters: &FilterSpec,
    sort: &SortSpec,
) -> Result<(WhereClause, OrderBy, PageRequest), ApiError> {
    let filter = compile(filters, params)?;
    let order = sort.resolve(
        params.get("sort_by").map(String::as_str),
        params.get("order").map(String::as_str),
    )?;
    let pagination = state.config.pagination.read().await;
    let page = PageRequest::from_params(params, pagination.default_limit, pagination.max_limit);
    Ok((filter, order, page))
}

/// Database timestamps are stored without zone and read back as UTC.
pub(crate) fn unix(t: time::PrimitiveDateTime) -> i64 {
    t.assume_utc().unix_timestamp()
}

/// Successful create: 201 plus the created entity in the envelope.
pub(crate) fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, Json(Envelope::ok(data)))
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn create_responses_answer_201_with_envelope() {
        let response = created(serde_json::json!({"id": 7})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
