//! Renders the store landing page

use crate::gateway::store::Review;
use crate::gateway::StoreDetails;
use std::fmt::Write;

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full HTML document for one store; absent sections are left out
pub fn render_store_page(store: &StoreDetails) -> String {
    let name = escape_html(&store.name);
    let mut html = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html lang=\"id\">");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "<meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>{name}</title>");
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");
    let _ = writeln!(html, "<header>");
    let _ = writeln!(html, "<p class=\"category\">{}</p>", escape_html(&store.category));
    let _ = writeln!(html, "<h1>{name}</h1>");
    if let Some(rating) = rating_line(store.rating, store.review_count) {
        let _ = writeln!(html, "<p class=\"rating\">{rating}</p>");
    }
    let _ = writeln!(html, "<p class=\"summary\">{}</p>", escape_html(&store.summary));
    let _ = writeln!(html, "</header>");

    let _ = writeln!(html, "<section class=\"contact\">");
    let _ = writeln!(html, "<p class=\"address\">{}</p>", escape_html(&store.address));
    if let Some(phone) = &store.phone {
        let phone = escape_html(phone);
        let _ = writeln!(html, "<p class=\"phone\"><a href=\"tel:{phone}\">{phone}</a></p>");
    }
    if let Some(website) = &store.website {
        let escaped = escape_html(website);
        // Only web links become anchors; model output is untrusted
        if website.starts_with("https://") || website.starts_with("http://") {
            let _ = writeln!(html, "<p class=\"website\"><a href=\"{escaped}\">{escaped}</a></p>");
        } else {
            let _ = writeln!(html, "<p class=\"website\">{escaped}</p>");
        }
    }
    let _ = writeln!(
        html,
        "<p class=\"map\"><a href=\"{}\">Lihat di Google Maps</a></p>",
        escape_html(&store.map_uri)
    );
    let _ = writeln!(html, "</section>");

    if let Some(hours) = store.opening_hours.as_ref().filter(|h| !h.is_empty()) {
        let _ = writeln!(html, "<section class=\"hours\">");
        let _ = writeln!(html, "<h2>Jam Operasional</h2>");
        let _ = writeln!(html, "<ul>");
        for line in hours {
            let _ = writeln!(html, "<li>{}</li>", escape_html(line));
        }
        let _ = writeln!(html, "</ul>");
        let _ = writeln!(html, "</section>");
    }

    if let Some(reviews) = store.reviews.as_ref().filter(|r| !r.is_empty()) {
        let _ = writeln!(html, "<section class=\"reviews\">");
        let _ = writeln!(html, "<h2>Ulasan</h2>");
        for review in reviews {
            render_review(&mut html, review);
        }
        let _ = writeln!(html, "</section>");
    }

    let _ = writeln!(html, "</body>");
    let _ = writeln!(html, "</html>");
    html
}

fn rating_line(rating: Option<f64>, review_count: Option<u64>) -> Option<String> {
    match (rating, review_count) {
        (Some(rating), Some(count)) => Some(format!("{rating:.1} ({count} ulasan)")),
        (Some(rating), None) => Some(format!("{rating:.1}")),
        (None, Some(count)) => Some(format!("{count} ulasan")),
        (None, None) => None,
    }
}

fn render_review(html: &mut String, review: &Review) {
    let _ = writeln!(html, "<blockquote>");
    if let Some(text) = &review.text {
        let _ = writeln!(html, "<p>{}</p>", escape_html(text));
    }
    let footer: Vec<String> = review
        .author
        .as_deref()
        .map(escape_html)
        .into_iter()
        .chain(review.rating.map(|rating| format!("{rating:.1}")))
        .collect();
    if !footer.is_empty() {
        let _ = writeln!(html, "<footer>{}</footer>", footer.join(" &middot; "));
    }
    let _ = writeln!(html, "</blockquote>");
}
