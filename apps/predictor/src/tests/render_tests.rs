use super::*;
use client_core::presentation::title_meter;
use shared::protocol::{Prediction, PredictionRange, PredictionResponse};

fn output(renderer: TerminalRenderer<Vec<u8>>) -> String {
    String::from_utf8(renderer.finish().expect("no io errors")).expect("utf8")
}

fn results_instruction(locale: Locale) -> RenderInstruction {
    let prediction = Prediction {
        first_week_views: 4500.0,
        confidence: 0.78,
        accuracy: None,
        margin: None,
        range: PredictionRange {
            min: 4000.0,
            max: 5000.0,
        },
    };
    let response = PredictionResponse {
        success: true,
        prediction: Some(prediction.clone()),
        features_used: 12,
        ..PredictionResponse::default()
    };
    RenderInstruction::ShowResults(Box::new(ResultsView::build(
        &response,
        &prediction,
        locale,
    )))
}

#[test]
fn busy_indicator_is_printed_once_per_loading_phase() {
    let mut renderer = TerminalRenderer::new(Vec::new(), Locale::En);
    renderer.enter_loading();
    renderer.enter_loading();
    assert!(renderer.view().trigger.disabled);
    renderer.leave_loading();
    assert!(!renderer.view().trigger.disabled);

    let text = output(renderer);
    assert_eq!(text.matches("Predicting...").count(), 1);
}

#[test]
fn results_are_printed_with_locale_grouping() {
    let mut renderer = TerminalRenderer::new(Vec::new(), Locale::En);
    renderer.render(results_instruction(Locale::En));

    let text = output(renderer);
    assert!(text.contains("First-week views: 4,500"));
    assert!(text.contains("Range: 4,000 - 5,000 views (±500)"));
    assert!(text.contains("78% Accuracy [good]"));
    assert!(text.contains("Chart: [##################--] 90%"));
    assert!(text.contains("[Excellent!]"));
    assert!(text.contains("12+ Features Analyzed"));
}

#[test]
fn badge_takes_tier_colour_when_enabled() {
    let mut renderer = TerminalRenderer::new(Vec::new(), Locale::En).with_color(true);
    renderer.render(results_instruction(Locale::En));

    let text = output(renderer);
    assert!(text.contains("\x1b[38;2;62;166;255m78% Accuracy [good]\x1b[0m"));
    assert_eq!(ansi_foreground("#00D084").as_deref(), Some("\x1b[38;2;0;208;132m"));
    assert_eq!(ansi_foreground("00D084"), None);
}

#[test]
fn error_replaces_results_in_view() {
    let mut renderer = TerminalRenderer::new(Vec::new(), Locale::Tr);
    renderer.render(results_instruction(Locale::Tr));
    renderer.render(RenderInstruction::transport_error(Locale::Tr));

    assert!(renderer.view().results().is_none());
    let text = output(renderer);
    assert!(text.ends_with(&format!("Error: {}\n", Locale::Tr.generic_error())));
}

#[test]
fn model_badge_and_title_meter_lines() {
    let mut renderer = TerminalRenderer::new(Vec::new(), Locale::En);
    renderer.mark_model_unavailable();
    renderer.show_title_meter(title_meter("Short title"));

    let text = output(renderer);
    assert!(text.contains("! Model Not Loaded"));
    assert!(text.contains("Title: 11 chars (short, 18% of 60)"));
}

#[test]
fn chart_bar_is_clamped_to_width() {
    assert_eq!(chart_bar(0.0), "[--------------------] 0%");
    assert_eq!(chart_bar(1.0), "[####################] 100%");
}
