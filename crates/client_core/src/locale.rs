use std::{fmt, str::FromStr};

use shared::domain::Priority;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Tr,
    En,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported locale '{0}' (expected tr or en)")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lower = raw.trim().to_ascii_lowercase();
        match lower.split(['-', '_']).next().unwrap_or_default() {
            "tr" => Ok(Self::Tr),
            "en" => Ok(Self::En),
            _ => Err(UnknownLocale(raw.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tr => "tr-TR",
            Self::En => "en-US",
        })
    }
}

/// Canned entry shown when the service has nothing to recommend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannedRecommendation {
    pub label: &'static str,
    pub message: &'static str,
    pub suggestion: &'static str,
}

impl Locale {
    pub fn thousands_separator(self) -> char {
        match self {
            Self::Tr => '.',
            Self::En => ',',
        }
    }

    /// Shown for transport failures and for rejections without a message.
    pub fn generic_error(self) -> &'static str {
        match self {
            Self::Tr => "Sunucuya bağlanılamadı. Lütfen tekrar deneyin.",
            Self::En => "Could not reach the server. Please try again.",
        }
    }

    pub fn views_noun(self) -> &'static str {
        match self {
            Self::Tr => "görüntülenme",
            Self::En => "views",
        }
    }

    pub fn priority_label(self, priority: Priority) -> &'static str {
        match (self, priority) {
            (Self::Tr, Priority::High) => "Yüksek Öncelik",
            (Self::Tr, Priority::Medium) => "Orta Öncelik",
            (Self::Tr, Priority::Low) => "Düşük Öncelik",
            (Self::Tr, Priority::Other) => "Öneri",
            (Self::En, Priority::High) => "High Priority",
            (Self::En, Priority::Medium) => "Medium Priority",
            (Self::En, Priority::Low) => "Low Priority",
            (Self::En, Priority::Other) => "Suggestion",
        }
    }

    pub fn all_optimal(self) -> CannedRecommendation {
        match self {
            Self::Tr => CannedRecommendation {
                label: "Mükemmel!",
                message: "Videonuz optimal ayarlara sahip görünüyor. Harika iş!",
                suggestion: "Tüm öneriler uygulanmış durumda.",
            },
            Self::En => CannedRecommendation {
                label: "Excellent!",
                message: "Your video already looks optimally configured. Great job!",
                suggestion: "Every recommendation is already applied.",
            },
        }
    }

    pub fn busy_label(self) -> &'static str {
        match self {
            Self::Tr => "Tahmin ediliyor...",
            Self::En => "Predicting...",
        }
    }

    pub fn model_not_loaded(self) -> &'static str {
        match self {
            Self::Tr => "Model Yüklenmedi",
            Self::En => "Model Not Loaded",
        }
    }
}
