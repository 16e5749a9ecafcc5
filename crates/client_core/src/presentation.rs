//! Pure computations behind the results panel.

use shared::{
    domain::Priority,
    protocol::{Prediction, PredictionResponse, Recommendation},
};

use crate::locale::Locale;

const TITLE_METER_MAX: usize = 60;
const TITLE_OPTIMAL_MIN: usize = 50;

/// Accuracy band used for the confidence badge. Lower edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Strong,
    Good,
    Fair,
    Weak,
}

impl Tier {
    pub fn from_accuracy(percent: i64) -> Self {
        match percent {
            p if p >= 85 => Self::Strong,
            p if p >= 75 => Self::Good,
            p if p >= 70 => Self::Fair,
            _ => Self::Weak,
        }
    }

    /// Badge gradient as `(start, end)` hex colours.
    pub fn gradient(self) -> (&'static str, &'static str) {
        match self {
            Self::Strong => ("#00D084", "#00A869"),
            Self::Good => ("#3EA6FF", "#1E88E5"),
            Self::Fair => ("#FFB800", "#FF9800"),
            Self::Weak => ("#FF4444", "#CC0000"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Weak => "weak",
        }
    }
}

pub fn confidence_percent(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}

/// The service's accuracy figure; zero counts as not reported.
pub fn reported_accuracy(prediction: &Prediction) -> Option<f64> {
    prediction.accuracy.filter(|accuracy| *accuracy != 0.0)
}

/// Accuracy shown in the stats bar: the service's own figure when it sent
/// one, otherwise the confidence percentage.
pub fn accuracy_stat(prediction: &Prediction) -> i64 {
    reported_accuracy(prediction)
        .map(|accuracy| accuracy.round() as i64)
        .unwrap_or_else(|| confidence_percent(prediction.confidence))
}

/// Accuracy shown on the badge and used for tiering.
pub fn displayed_accuracy(prediction: &Prediction) -> i64 {
    confidence_percent(prediction.confidence).max(accuracy_stat(prediction))
}

/// A zero margin from the service is treated as absent.
pub fn margin(prediction: &Prediction) -> f64 {
    prediction
        .margin
        .filter(|margin| *margin != 0.0)
        .unwrap_or_else(|| ((prediction.range.max - prediction.range.min) / 2.0).round())
}

/// Share of the chart bar filled by the expected value, in `0.0..=1.0`.
pub fn chart_fill(expected: f64, max: f64) -> f64 {
    if max == 0.0 {
        return 0.0;
    }
    let fill = expected / max;
    if fill.is_finite() {
        fill.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Truncates to whole units and groups thousands with the locale separator.
pub fn format_count(value: f64, locale: Locale) -> String {
    let whole = if value.is_finite() { value.trunc() } else { 0.0 };
    let digits = (whole.abs() as u64).to_string();
    let separator = locale.thousands_separator();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0.0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationEntry {
    pub priority: Priority,
    pub label: String,
    pub message: String,
    pub suggestion: String,
}

/// One entry per recommendation in received order, or the canned
/// "all optimal" notice when there are none.
pub fn recommendation_entries(
    recommendations: &[Recommendation],
    locale: Locale,
) -> Vec<RecommendationEntry> {
    if recommendations.is_empty() {
        let canned = locale.all_optimal();
        return vec![RecommendationEntry {
            priority: Priority::Low,
            label: canned.label.to_string(),
            message: canned.message.to_string(),
            suggestion: canned.suggestion.to_string(),
        }];
    }

    recommendations
        .iter()
        .map(|rec| RecommendationEntry {
            priority: rec.priority,
            label: locale.priority_label(rec.priority).to_string(),
            message: rec.message.clone(),
            suggestion: rec.suggestion.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsBar {
    pub predicted_views: String,
    pub accuracy: String,
    pub features: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCards {
    pub min: String,
    pub expected: String,
    pub max: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfidenceBadge {
    pub tier: Tier,
    pub displayed_accuracy: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelFooter {
    pub powered_by: Option<String>,
    pub features: Option<String>,
    pub accuracy: Option<String>,
}

/// Everything the results panel shows for one successful prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub stats: StatsBar,
    pub predicted_views: String,
    pub range_line: String,
    pub margin: f64,
    pub metrics: MetricCards,
    pub badge: ConfidenceBadge,
    pub chart_fill: f64,
    pub recommendations: Vec<RecommendationEntry>,
    pub footer: ModelFooter,
}

impl ResultsView {
    pub fn build(response: &PredictionResponse, prediction: &Prediction, locale: Locale) -> Self {
        let count = |value: f64| format_count(value, locale);
        let range = prediction.range;
        let expected = prediction.first_week_views;
        let margin = margin(prediction);
        let displayed = displayed_accuracy(prediction);

        let powered_by = response
            .model_info
            .as_ref()
            .and_then(|info| info.model_name.as_ref())
            .map(|name| format!("Powered by {name}"));
        let footer = ModelFooter {
            powered_by,
            features: (response.features_used > 0)
                .then(|| format!("{}+ Features Analyzed", response.features_used)),
            accuracy: reported_accuracy(prediction)
                .map(|accuracy| format!("{}% Prediction Accuracy", accuracy.round() as i64)),
        };

        Self {
            stats: StatsBar {
                predicted_views: count(expected),
                accuracy: format!("{}%", accuracy_stat(prediction)),
                features: format!("{}+", response.features_used),
            },
            predicted_views: count(expected),
            range_line: format!(
                "{} - {} {} (±{})",
                count(range.min),
                count(range.max),
                locale.views_noun(),
                count(margin)
            ),
            margin,
            metrics: MetricCards {
                min: count(range.min),
                expected: count(expected),
                max: count(range.max),
            },
            badge: ConfidenceBadge {
                tier: Tier::from_accuracy(displayed),
                displayed_accuracy: displayed,
                text: format!("{displayed}% Accuracy"),
            },
            chart_fill: chart_fill(expected, range.max),
            recommendations: recommendation_entries(
                response.recommendations.as_deref().unwrap_or_default(),
                locale,
            ),
            footer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStatus {
    Short,
    Optimal,
    TooLong,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleMeter {
    pub length: usize,
    pub progress_percent: f64,
    pub status: TitleStatus,
}

/// Live length meter for the title field; 50 to 60 characters is optimal.
pub fn title_meter(title: &str) -> TitleMeter {
    let length = title.chars().count();
    let progress_percent = (length as f64 / TITLE_METER_MAX as f64 * 100.0).min(100.0);
    let status = if length < TITLE_OPTIMAL_MIN {
        TitleStatus::Short
    } else if length <= TITLE_METER_MAX {
        TitleStatus::Optimal
    } else {
        TitleStatus::TooLong
    };

    TitleMeter {
        length,
        progress_percent,
        status,
    }
}

#[cfg(test)]
#[path = "tests/presentation_tests.rs"]
mod tests;
