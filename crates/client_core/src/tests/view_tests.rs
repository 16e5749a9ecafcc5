use super::*;

#[test]
fn entering_loading_twice_nests_nothing() {
    let mut view = ViewModel::new();
    view.enter_loading();
    view.enter_loading();
    assert!(view.trigger.disabled);
    assert_eq!(view.trigger.label, TriggerLabel::Busy);

    view.leave_loading();
    assert_eq!(view.trigger, TriggerControl::default());
    assert!(!view.is_loading());
}

#[test]
fn error_replaces_results_and_scrolls_into_view() {
    let mut view = ViewModel::new();
    view.render(RenderInstruction::application_error(
        Some("model offline".to_string()),
        Locale::En,
    ));
    assert_eq!(view.scrolled_to, Some(PanelKind::Error));
    assert_eq!(view.error().map(|e| e.message.as_str()), Some("model offline"));
    assert!(view.results().is_none());

    view.clear_panels();
    assert_eq!(view.panel, Panel::Hidden);
}

#[test]
fn empty_server_message_uses_generic_fallback() {
    let instruction = RenderInstruction::application_error(Some(String::new()), Locale::Tr);
    let RenderInstruction::ShowError(error) = instruction else {
        panic!("expected error instruction");
    };
    assert_eq!(error.kind, ErrorKind::Application);
    assert_eq!(error.message, Locale::Tr.generic_error());

    let RenderInstruction::ShowError(error) = RenderInstruction::application_error(None, Locale::En)
    else {
        panic!("expected error instruction");
    };
    assert_eq!(error.message, Locale::En.generic_error());
}

#[test]
fn model_badge_is_sticky() {
    let mut view = ViewModel::new();
    view.mark_model_unavailable();
    view.clear_panels();
    view.leave_loading();
    assert_eq!(view.model_badge, ModelBadge::NotLoaded);
}
