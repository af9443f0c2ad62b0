use axum::response::Html;

// axum handler for the landing page
pub async fn root() -> Html<&'static str> {
    Html("<h1>Bakery GET API</h1>")
}
