//! Text rendering of the widget.

use rupeeconv_common::{format_grouped, RateOrigin, Unit};

use crate::state::WidgetState;

pub const TITLE: &str = "INR to USD Converter";
pub const LOADING_NOTICE: &str = "Fetching latest exchange rate...";

/// Render the whole widget.
pub fn render(state: &WidgetState) -> String {
    let mut lines = Vec::new();

    if state.rate.is_loading() {
        lines.push(LOADING_NOTICE.to_string());
    }
    if let Some(diagnostic) = state.rate_diagnostic() {
        lines.push(diagnostic.to_string());
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }

    lines.push(TITLE.to_string());
    lines.push(format!("  Enter amount:   {}", state.amount_text));
    lines.push(format!(
        "  Currency Type:  {}   [{}]",
        unit_display(&state.unit_text),
        Unit::ALL.map(|u| u.display_name()).join(" | ")
    ));
    lines.push("  [ Convert to USD ]".to_string());

    if let Some(conversion) = &state.result {
        lines.push(String::new());
        lines.push(format!("  {}", conversion.message()));
    }
    if let Some(notice) = &state.notice {
        lines.push(String::new());
        lines.push(format!("  ! {}", notice));
    }

    if let Some(footer) = footer(state) {
        lines.push(String::new());
        lines.push(footer);
    }

    lines.join("\n")
}

/// Rate footer, shown once a fetched or fallback rate is held.
pub fn footer(state: &WidgetState) -> Option<String> {
    let resolution = state.resolution()?;
    if resolution.origin() == RateOrigin::Fixed {
        return None;
    }

    let rate = &resolution.rate;
    Some(format!(
        "Exchange rate used is {} INR to 1 USD. Current as of {}",
        format_grouped(rate.inr_per_usd(), 2, 2),
        rate.as_of().format("%Y-%m-%d %H:%M:%S UTC")
    ))
}

fn unit_display(unit_text: &str) -> String {
    match unit_text.parse::<Unit>() {
        Ok(unit) => unit.display_name().to_string(),
        Err(_) => unit_text.to_string(),
    }
}
