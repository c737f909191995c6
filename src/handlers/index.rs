//! Landing page
//!
//! Serves a static page with a small review form. Each hit counts toward
//! `sentiment_app_requests_total`.

use axum::{extract::State, response::Html};

use crate::handlers::AppState;

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Review Sentiment</title>
</head>
<body>
  <h1>Review Sentiment</h1>
  <form id="review-form">
    <textarea id="review" rows="6" cols="60" placeholder="Write a review..."></textarea>
    <br>
    <button type="submit">Analyze</button>
  </form>
  <pre id="result"></pre>
  <script>
    document.getElementById("review-form").addEventListener("submit", async (event) => {
      event.preventDefault();
      const review = document.getElementById("review").value;
      const response = await fetch("/predict", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ review }),
      });
      document.getElementById("result").textContent =
        JSON.stringify(await response.json(), null, 2);
    });
  </script>
</body>
</html>
"#;

/// GET / handler
pub async fn handler(State(state): State<AppState>) -> Html<&'static str> {
    state.metrics().record_landing_request();
    tracing::debug!(
        requests_total = state.metrics().requests_total(),
        "Served landing page"
    );
    Html(LANDING_PAGE)
}
