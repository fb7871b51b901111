use colored::*;
use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ])
}

/// A span whose progress bar is drawn as the spinner for as long as it is entered.
pub fn scan_span(total: usize) -> Span {
    let span = info_span!("scanning", indicatif.pb_show = true);
    span.pb_set_style(&spinner_style());
    span.pb_set_message(&format!("Starting {} scans...", total.to_string().bold()));
    span
}

pub fn report_scan_progress(span: &Span, active: usize, finished: usize) {
    span.pb_set_message(&format!(
        "{} running, {} finished",
        active.to_string().yellow().bold(),
        finished.to_string().green().bold()
    ));
}

