//! Footer copyright year.

use chrono::Datelike;
use tracing::debug;

use crate::context::PageContext;
use crate::error::PageError;

/// Write `year` (or the current calendar year) into `#year`.
pub fn init_year(ctx: &mut PageContext, year: Option<i32>) -> Result<(), PageError> {
    let Some(node) = ctx.doc.element_by_id("year") else {
        debug!("no #year element, footer year skipped");
        return Ok(());
    };
    let year = year.unwrap_or_else(|| chrono::Local::now().year());
    ctx.doc.set_text_content(node, &year.to_string());
    Ok(())
}
