/// Wraps every table in a scrollable container so wide tables get a
/// horizontal scrollbar instead of breaking the page layout. Tables cannot
/// carry overflow properties themselves.
///
/// `<table>…</table>` becomes
/// `<div class="table-wrapper"><table>…</table></div>`.
///
/// Wrapping is not idempotent: running the pass twice double-wraps. The
/// pipeline runs it exactly once, after HTML serialization.
pub fn transform(html: &str) -> String {
    if !html.contains("<table") {
        return html.to_string();
    }

    html.replace("<table>", "<div class=\"table-wrapper\"><table>")
        .replace("</table>", "</table></div>")
}
