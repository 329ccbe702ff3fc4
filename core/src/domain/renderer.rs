// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Directive Renderer
//!
//! Turns an [`OptionSet`] into config lines. Lines follow catalog order, not
//! the order values were supplied in, so identical inputs always render
//! byte-identical output.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pure parameter -> directive text mapping

use super::catalog::{Catalog, LineStyle};
use super::option::{Directive, OptionSet, OptionValue};

/// Render every set option of `values`, one line per option, in catalog order.
///
/// Options absent from `values` produce no line. Values are written verbatim
/// (the daemon grammar has no quoting) and sensitive values are revealed.
pub fn render(catalog: &Catalog, values: &OptionSet) -> Vec<String> {
    let style = catalog.line_style();
    catalog
        .options()
        .iter()
        .filter_map(|spec| {
            values
                .get(spec.name)
                .map(|value| render_line(style, spec.directive, value))
        })
        .collect()
}

/// Format a single `TOKEN<pad> value<terminator>` line.
pub fn render_line(style: LineStyle, directive: Directive, value: &OptionValue) -> String {
    format!(
        "{:<width$} {}{}",
        directive.token(),
        value.render(),
        style.terminator,
        width = style.keyword_width
    )
}
