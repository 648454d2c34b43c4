//! CSS-selector access to page markup, used to cut fragments out of a page
//! before linting them.

use scraper::{ElementRef, Html, Selector};

use crate::errors::{HarnessError, Result};

/// Parse an HTML string into a document.
pub fn parse(html: &str) -> Html {
    Html::parse_document(html)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| HarnessError::Application(format!("Invalid CSS selector '{}': {:?}", css, e)))
}

/// Select the first element matching a CSS selector.
pub fn select_one<'a>(document: &'a Html, css: &str) -> Result<Option<ElementRef<'a>>> {
    let sel = selector(css)?;
    Ok(document.select(&sel).next())
}

/// Inner markup of the first element matching `css`, the way jQuery's
/// `.html()` reads it.
pub fn inner_html(document: &Html, css: &str) -> Result<Option<String>> {
    Ok(select_one(document, css)?.map(|el| el.inner_html()))
}
