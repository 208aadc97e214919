use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State as AxumState,
    response::{Html, IntoResponse},
};

use crate::{error::AppError, results::results, state::State, survey::submit, utils::current_year};

const LANDING_PAGE: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Survey</title>
  </head>
  <body>
    <h1>Survey</h1>
    <p>Submit a survey with <code>POST /api/submit</code>.</p>
    <p>View the <a href="/api/results">survey results</a>.</p>
  </body>
</html>
"#;

pub async fn index_handler() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

pub async fn submit_handler(
    AxumState(state): AxumState<Arc<State>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let response = submit(state.store.as_ref(), &body, current_year()).await?;

    Ok(Json(response))
}

pub async fn results_handler(
    AxumState(state): AxumState<Arc<State>>,
) -> Result<impl IntoResponse, AppError> {
    let response = results(state.store.as_ref(), current_year()).await?;

    Ok(Json(response))
}
