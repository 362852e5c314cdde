//! HTTP handlers for the bucket-list surface
//!
//! Browser-facing flows answer with redirects the way a server-rendered
//! app would, carrying their status message in a `notice` query
//! parameter. Fetch calls marked `X-Requested-With: XMLHttpRequest` and
//! the API routes get JSON instead.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use chrono::Local;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::Error;
use crate::export;
use crate::place::{Category, Continent, Place, PlaceForm, Priority};
use crate::query::{PER_PAGE, PlaceFilter, PlaceQuery, SortOrder, page_from_param};
use crate::server::AppState;
use crate::server::error::ApiResult;
use crate::server::extractors::RequestedWith;
use crate::storage::{BucketStats, SqliteStore};

/// Raw listing parameters as they arrive on the query string. Page is
/// kept as text so junk values coerce to page 1 instead of rejecting
/// the request.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub continent: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl ListParams {
    fn to_query(&self) -> PlaceQuery {
        PlaceQuery {
            filter: PlaceFilter::from_params(
                self.continent.as_deref(),
                self.category.as_deref(),
                self.status.as_deref(),
                self.search.as_deref(),
            ),
            sort: SortOrder::from_param(self.sort.as_deref()),
            page: page_from_param(self.page.as_deref()),
        }
    }
}

/// One page of the listing plus the count across all pages
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub places: Vec<Place>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

fn open_store(state: &AppState) -> ApiResult<SqliteStore> {
    SqliteStore::open(&state.database_path)
}

fn redirect_with_notice(path: &str, notice: &str) -> Response {
    Redirect::to(&format!("{path}?notice={}", urlencoding::encode(notice))).into_response()
}

fn invalid_form(form: &PlaceForm, err: &Error) -> Response {
    let message = match err {
        Error::Validation(msg) => msg.clone(),
        other => other.to_string(),
    };
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "ok": false, "error": message, "values": form })),
    )
        .into_response()
}

/// GET / - summary counts for the home view
pub async fn home(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    let store = open_store(&state)?;
    let total = store.count_places()?;
    let visited = store.count_visited()?;
    Ok(Json(json!({
        "total": total,
        "visited": visited,
        "remaining": total - visited,
    })))
}

/// GET /add - the fixed choice lists the add form is built from
pub async fn add_form() -> Json<serde_json::Value> {
    Json(json!({
        "continents": Continent::all().iter().map(|c| c.as_str()).collect::<Vec<_>>(),
        "categories": Category::all().iter().map(|c| c.as_str()).collect::<Vec<_>>(),
        "priorities": Priority::all().iter().map(|p| p.as_str()).collect::<Vec<_>>(),
    }))
}

/// POST /add - validate and insert, then bounce to the listing
pub async fn add_place(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PlaceForm>,
) -> ApiResult<Response> {
    let place = match form.validate() {
        Ok(place) => place,
        Err(err) => return Ok(invalid_form(&form, &err)),
    };

    let store = open_store(&state)?;
    let id = store.insert_place(&place)?;
    tracing::info!(id, name = %place.name, "place added");

    Ok(redirect_with_notice(
        "/places",
        "Place added to your bucket list!",
    ))
}

/// GET /places - filtered, sorted, paginated listing
pub async fn list_places(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<ListResponse>> {
    let query = params.to_query();
    let store = open_store(&state)?;
    let (places, total) = store.list_places(&query)?;

    Ok(Json(ListResponse {
        places,
        total,
        page: query.page,
        per_page: PER_PAGE,
    }))
}

/// GET /edit/{id} - the stored place, or a notice redirect when gone
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let store = open_store(&state)?;
    match store.get_place(id)? {
        Some(place) => Ok(Json(place).into_response()),
        None => Ok(redirect_with_notice("/places", "Place not found.")),
    }
}

/// POST /edit/{id} - validate and update the editable fields
pub async fn edit_place(
    State(state): State<Arc<AppState>>,
    requested_with: RequestedWith,
    Path(id): Path<i64>,
    Form(form): Form<PlaceForm>,
) -> ApiResult<Response> {
    let place = match form.validate() {
        Ok(place) => place,
        Err(err) => return Ok(invalid_form(&form, &err)),
    };

    let store = open_store(&state)?;
    if !store.update_place(id, &place)? {
        if requested_with.is_ajax() {
            return Err(Error::NotFound(id));
        }
        return Ok(redirect_with_notice("/places", "Place not found."));
    }

    tracing::info!(id, "place updated");
    Ok(redirect_with_notice("/places", "Place updated."))
}

/// POST /delete/{id} - unconditional delete; absent ids succeed too
pub async fn delete_place(
    State(state): State<Arc<AppState>>,
    requested_with: RequestedWith,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let store = open_store(&state)?;
    store.delete_place(id)?;
    tracing::info!(id, "place deleted");

    if requested_with.is_ajax() {
        Ok(Json(json!({ "ok": true })).into_response())
    } else {
        Ok(redirect_with_notice("/places", "Place deleted."))
    }
}

/// POST /toggle_visited/{id} - flip the flag, stamping or clearing the
/// visited date
pub async fn toggle_visited(
    State(state): State<Arc<AppState>>,
    requested_with: RequestedWith,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let store = open_store(&state)?;
    let today = Local::now().date_naive();
    let Some(place) = store.toggle_visited(id, today)? else {
        return Err(Error::NotFound(id));
    };

    tracing::debug!(id, visited = place.visited, "visited flag toggled");
    if requested_with.is_ajax() {
        Ok(Json(json!({
            "ok": true,
            "visited": place.visited,
            "visited_date": place.visited_date,
        }))
        .into_response())
    } else {
        Ok(Redirect::to("/places").into_response())
    }
}

/// GET /api/stats and GET /stats - aggregate counts
pub async fn stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<BucketStats>> {
    let store = open_store(&state)?;
    Ok(Json(store.stats()?))
}

/// GET /export.csv - the whole list as a CSV attachment
pub async fn export_csv(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let store = open_store(&state)?;
    let csv = export::to_csv(&store.all_places()?);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"places.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

/// GET /random - pick something to plan next and show it in the listing
pub async fn random_place(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let store = open_store(&state)?;
    let places = store.all_places()?;

    let Some(pick) = places.choose(&mut rand::thread_rng()) else {
        return Ok(redirect_with_notice(
            "/add",
            "Your list is empty. Add a place first!",
        ));
    };

    let notice = format!("Random pick: {} in {} ({})", pick.name, pick.country, pick.continent);
    let target = format!(
        "/places?search={}&notice={}",
        urlencoding::encode(&pick.name),
        urlencoding::encode(&notice)
    );
    Ok(Redirect::to(&target).into_response())
}

/// GET /timeline - visited places with a date, newest first
pub async fn timeline(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Place>>> {
    let store = open_store(&state)?;
    Ok(Json(store.visited_timeline()?))
}
