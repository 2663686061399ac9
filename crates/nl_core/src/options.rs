//! The knobs a reader picks before a newsletter run: how far back to search,
//! which kind of results to search, and the voice of the final text.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Counts offered for every time unit.
pub const ALLOWED_COUNTS: [u8; 3] = [1, 2, 6];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 5] = [
        TimeUnit::Hour,
        TimeUnit::Day,
        TimeUnit::Week,
        TimeUnit::Month,
        TimeUnit::Year,
    ];

    /// Single-letter code used by the search provider's `qdr:` filter.
    pub fn code(&self) -> char {
        match self {
            TimeUnit::Hour => 'h',
            TimeUnit::Day => 'd',
            TimeUnit::Week => 'w',
            TimeUnit::Month => 'm',
            TimeUnit::Year => 'y',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    unit: TimeUnit,
    count: u8,
}

#[derive(Deserialize)]
struct RawTimeWindow {
    unit: TimeUnit,
    count: u8,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = Error;

    fn try_from(raw: RawTimeWindow) -> Result<Self> {
        TimeWindow::new(raw.unit, raw.count)
    }
}

impl TimeWindow {
    pub fn new(unit: TimeUnit, count: u8) -> Result<Self> {
        if !ALLOWED_COUNTS.contains(&count) {
            return Err(Error::InvalidInput(format!(
                "time window count must be one of {:?}, got {}",
                ALLOWED_COUNTS, count
            )));
        }
        Ok(Self { unit, count })
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    /// The `tbs` value sent to the search provider, e.g. `qdr:d2`.
    pub fn filter(&self) -> String {
        format!("qdr:{}{}", self.unit.code(), self.count)
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            unit: TimeUnit::Hour,
            count: 1,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.unit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    News,
    #[default]
    General,
}

impl Genre {
    pub fn label(&self) -> &'static str {
        match self {
            Genre::News => "NEWS",
            Genre::General => "GENERAL",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Informative,
    Professional,
    Friendly,
    Educational,
    Inspiring,
    Humorous,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Informative,
        Tone::Professional,
        Tone::Friendly,
        Tone::Educational,
        Tone::Inspiring,
        Tone::Humorous,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Informative => "Informative / Neutral Tone",
            Tone::Professional => "Professional / Business Tone",
            Tone::Friendly => "Friendly / Conversational Tone",
            Tone::Educational => "Educational / Instructive Tone",
            Tone::Inspiring => "Inspiring / Motivational Tone",
            Tone::Humorous => "Humorous / Lighthearted Tone",
        }
    }

    /// Sentence injected verbatim into the newsletter prompt.
    pub fn description(&self) -> &'static str {
        match self {
            Tone::Informative => "Provides factual information without bias or emotion. Focuses on delivering content in a straightforward manner.",
            Tone::Professional => "Conveys professionalism and credibility. Uses formal language and business terminology. Emphasizes achievements, milestones, and business-related topics.",
            Tone::Friendly => "Engages readers with a warm and approachable style. Uses conversational language, anecdotes, and personal stories. Encourages interaction and feedback from readers.",
            Tone::Educational => "Focuses on educating and informing readers about specific topics or skills. Provides tutorials, guides, tips, and how-to content. Uses clear explanations and step-by-step instructions.",
            Tone::Inspiring => "Aims to inspire, motivate, and uplift readers. Shares success stories, inspirational quotes, and positive messages. Encourages personal growth, resilience, and positivity.",
            Tone::Humorous => "Adds humor, wit, and light-heartedness to engage readers. Uses jokes, puns, and humorous anecdotes. Creates a friendly and entertaining atmosphere.",
        }
    }

    /// Looks a tone up by its display label, e.g. `"Informative / Neutral Tone"`.
    pub fn from_label(label: &str) -> Option<Tone> {
        Tone::ALL.into_iter().find(|tone| tone.label() == label.trim())
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_filter_for_every_selection() {
        for unit in TimeUnit::ALL {
            for count in ALLOWED_COUNTS {
                let window = TimeWindow::new(unit, count).unwrap();
                assert_eq!(window.filter(), format!("qdr:{}{}", unit.code(), count));
            }
        }
        let window = TimeWindow::new(TimeUnit::Day, 2).unwrap();
        assert_eq!(window.filter(), "qdr:d2");
    }

    #[test]
    fn test_time_window_rejects_unknown_count() {
        assert!(TimeWindow::new(TimeUnit::Week, 3).is_err());
        assert!(TimeWindow::new(TimeUnit::Week, 0).is_err());
    }

    #[test]
    fn test_time_window_deserialize_validates() {
        let window: TimeWindow = serde_json::from_str(r#"{"unit":"month","count":6}"#).unwrap();
        assert_eq!(window.filter(), "qdr:m6");
        assert!(serde_json::from_str::<TimeWindow>(r#"{"unit":"month","count":5}"#).is_err());
    }

    #[test]
    fn test_tone_labels_roundtrip() {
        for tone in Tone::ALL {
            assert_eq!(Tone::from_label(tone.label()), Some(tone));
        }
        assert_eq!(Tone::from_label("Sarcastic Tone"), None);
        assert_eq!(Tone::ALL.len(), 6);
    }

    #[test]
    fn test_genre_serde_keys() {
        assert_eq!(serde_json::to_string(&Genre::News).unwrap(), "\"news\"");
        assert_eq!(Genre::default(), Genre::General);
        assert_eq!(Genre::General.to_string(), "GENERAL");
    }
}
