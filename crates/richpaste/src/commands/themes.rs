//! Theme catalog listing.

use richpaste_pipeline::available_themes;

use crate::output::Output;

/// Print the catalog. With `current`, the selected theme is checked off;
/// without it every entry gets a bullet and a usage hint follows.
pub(crate) fn list(output: &Output, current: Option<&str>) {
    output.heading("Available themes:");
    for name in available_themes() {
        let marker = match current {
            Some(current) if current == name => output.check_mark(),
            Some(_) => " ".to_owned(),
            None => "•".to_owned(),
        };
        output.plain(&format!("  {marker} {name}"));
    }
    if current.is_none() {
        output.hint("Use with: richpaste input.md -t <theme-name>");
    }
}
