//! Static informational pages.

use axum::response::Html;

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(
        "<!doctype html>\
         <html><head><meta charset=\"utf-8\"><title>QR Mapper</title></head>\
         <body><main>\
         <h1>QR Mapper</h1>\
         <p>Links printed event badges to attendee ticket QR codes.</p>\
         <p>Staff: open a scan session with <code>POST /api/scan-sessions</code>.</p>\
         </main></body></html>",
    )
}

/// GET /unlinked
pub async fn unlinked() -> Html<&'static str> {
    Html(
        "<!doctype html>\
         <html><head><meta charset=\"utf-8\"><title>Badge Not Linked | QR Mapper</title></head>\
         <body><main>\
         <h1>Badge Not Linked</h1>\
         <p>This badge hasn't been linked to a QR ticket yet. Please visit the \
         registration desk and ask a staff member to scan your badge.</p>\
         <p><a href=\"/\">Back to Home</a></p>\
         </main></body></html>",
    )
}
