//! Plain-text renderer over the client view-model.

use std::io::{self, Write};

use client_core::{
    presentation::{ResultsView, TitleMeter, TitleStatus},
    view::{Panel, RenderInstruction, Renderer, ViewModel},
    Locale,
};

const CHART_WIDTH: usize = 20;

pub struct TerminalRenderer<W: Write> {
    out: W,
    view: ViewModel,
    locale: Locale,
    color: bool,
    io_error: Option<io::Error>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, locale: Locale) -> Self {
        Self {
            out,
            view: ViewModel::new(),
            locale,
            color: false,
            io_error: None,
        }
    }

    /// Colours the accuracy badge with its tier colour.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    /// Returns the writer, or the first write error hit while rendering.
    pub fn finish(self) -> io::Result<W> {
        match self.io_error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    pub fn show_title_meter(&mut self, meter: TitleMeter) {
        let status = match meter.status {
            TitleStatus::Short => "short",
            TitleStatus::Optimal => "optimal",
            TitleStatus::TooLong => "too long",
        };
        let line = format!(
            "Title: {} chars ({status}, {:.0}% of 60)",
            meter.length, meter.progress_percent
        );
        self.emit(&[line]);
    }

    fn emit(&mut self, lines: &[String]) {
        if self.io_error.is_some() {
            return;
        }
        for line in lines {
            if let Err(err) = writeln!(self.out, "{line}") {
                self.io_error = Some(err);
                return;
            }
        }
    }
}

fn chart_bar(fill: f64) -> String {
    let filled = ((fill * CHART_WIDTH as f64).round() as usize).min(CHART_WIDTH);
    format!(
        "[{}{}] {:.0}%",
        "#".repeat(filled),
        "-".repeat(CHART_WIDTH - filled),
        fill * 100.0
    )
}

/// 24-bit foreground escape for a `#RRGGBB` colour.
fn ansi_foreground(hex: &str) -> Option<String> {
    let hex = hex.strip_prefix('#')?;
    let channel = |at: usize| {
        hex.get(at..at + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };
    Some(format!(
        "\x1b[38;2;{};{};{}m",
        channel(0)?,
        channel(2)?,
        channel(4)?
    ))
}

fn badge_line(results: &ResultsView, color: bool) -> String {
    let badge = format!("{} [{}]", results.badge.text, results.badge.tier.name());
    let (start, _end) = results.badge.tier.gradient();
    match ansi_foreground(start).filter(|_| color) {
        Some(escape) => format!("{escape}{badge}\x1b[0m"),
        None => badge,
    }
}

fn results_lines(results: &ResultsView, color: bool) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Stats: {} | {} | {}",
            results.stats.predicted_views, results.stats.accuracy, results.stats.features
        ),
        format!("First-week views: {}", results.predicted_views),
        format!("Range: {}", results.range_line),
        format!(
            "Min / Expected / Max: {} / {} / {}",
            results.metrics.min, results.metrics.expected, results.metrics.max
        ),
        badge_line(results, color),
        format!("Chart: {}", chart_bar(results.chart_fill)),
        "Recommendations:".to_string(),
    ];
    for entry in &results.recommendations {
        lines.push(format!("  [{}] {}", entry.label, entry.message));
        lines.push(format!("      -> {}", entry.suggestion));
    }
    lines.extend(
        [
            &results.footer.powered_by,
            &results.footer.features,
            &results.footer.accuracy,
        ]
        .into_iter()
        .flatten()
        .cloned(),
    );
    lines
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn enter_loading(&mut self) {
        let already_loading = self.view.is_loading();
        self.view.enter_loading();
        if !already_loading {
            let busy = self.locale.busy_label().to_string();
            self.emit(&[busy]);
        }
    }

    fn leave_loading(&mut self) {
        self.view.leave_loading();
    }

    fn clear_panels(&mut self) {
        self.view.clear_panels();
    }

    fn render(&mut self, instruction: RenderInstruction) {
        self.view.render(instruction);
        let lines = match &self.view.panel {
            Panel::Results(results) => results_lines(results, self.color),
            Panel::Error(error) => vec![format!("Error: {}", error.message)],
            Panel::Hidden => Vec::new(),
        };
        self.emit(&lines);
    }

    fn prefill_publish_date(&mut self, value: String) {
        self.view.prefill_publish_date(value);
    }

    fn mark_model_unavailable(&mut self) {
        self.view.mark_model_unavailable();
        let badge = format!("! {}", self.locale.model_not_loaded());
        self.emit(&[badge]);
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
