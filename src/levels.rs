/// Severity threshold tables and crossing evaluation.
///
/// Each metric has one table per language, ordered from the highest level
/// down. Tables are static configuration; the only runtime state is the
/// last level a metric crossed, which the monitor owns and passes in.

use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One severity level and the notification text sent when it is crossed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub level: f64,
    pub message: &'static str,
}

/// Thresholds sorted descending by level.
pub type ThresholdTable = &'static [Threshold];

/// Metrics the monitor tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// OVATION aurora intensity at the observer's grid point (0-100).
    Aurora,
    /// Planetary K-index (0-9).
    KIndex,
}

/// Notification languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Pl,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Pl => "pl",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pl" => Ok(Language::Pl),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language '{}' (expected 'pl' or 'en')", other)),
        }
    }
}

/// A level newly crossed by a check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub level: f64,
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Message tables
// ---------------------------------------------------------------------------

const fn t(level: f64, message: &'static str) -> Threshold {
    Threshold { level, message }
}

pub static AURORA_LEVELS_PL: &[Threshold] = &[
    t(90.0, "Lokalnie: 90. Masz ją nad głową!"),
    t(80.0, "Lokalnie: 80. Ogromna szansa!"),
    t(70.0, "Lokalnie: 70. Bardzo duża szansa."),
    t(50.0, "Lokalnie: 50. Może coś się pojawi. Wypatruj."),
    t(30.0, "Lokalnie: 30. Jeżeli będziesz mieć bardzo dużo szczęścia"),
];

pub static AURORA_LEVELS_EN: &[Threshold] = &[
    t(90.0, "Locally: 90. You have it on your head!"),
    t(80.0, "Locally: 80. Very likely!"),
    t(70.0, "Locally: 70. Very likely."),
    t(50.0, "Locally: 50. Something might happen. Take a break."),
    t(30.0, "Locally: 30. If you have a lot of happiness"),
];

pub static K_INDEX_LEVELS_PL: &[Threshold] = &[
    t(9.0, "Globalnie: 9. Musisz ją widzieć!"),
    t(8.0, "Globalnie: 8. Duża szansa!"),
    t(7.0, "Globalnie: 7. Dzisiaj jest spora szansa."),
    t(6.0, "Globalnie: 6. Dzisiaj jest szansa."),
    t(5.0, "Globalnie: 5. Jakaś tam szansa dzisiaj jest."),
];

pub static K_INDEX_LEVELS_EN: &[Threshold] = &[
    t(9.0, "Globally: 9. You have to see it!"),
    t(8.0, "Globally: 8. Very likely!"),
    t(7.0, "Globally: 7. There is a lot of chance today."),
    t(6.0, "Globally: 6. There is a chance today."),
    t(5.0, "Globally: 5. There might be a chance today."),
];

/// Table for `metric` in `language`.
pub fn table(metric: Metric, language: Language) -> ThresholdTable {
    match (metric, language) {
        (Metric::Aurora, Language::Pl) => AURORA_LEVELS_PL,
        (Metric::Aurora, Language::En) => AURORA_LEVELS_EN,
        (Metric::KIndex, Language::Pl) => K_INDEX_LEVELS_PL,
        (Metric::KIndex, Language::En) => K_INDEX_LEVELS_EN,
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Finds the highest level that `value` reaches and that lies above
/// `last_level`.
///
/// Returns `None` when nothing new was crossed, so a metric never notifies
/// twice for the same or a lower level until its `last_level` is reset.
pub fn evaluate(value: f64, thresholds: ThresholdTable, last_level: f64) -> Option<Crossing> {
    thresholds
        .iter()
        .find(|th| th.level <= value && th.level > last_level)
        .map(|th| Crossing {
            level: th.level,
            message: th.message,
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tables() -> [ThresholdTable; 4] {
        [AURORA_LEVELS_PL, AURORA_LEVELS_EN, K_INDEX_LEVELS_PL, K_INDEX_LEVELS_EN]
    }

    #[test]
    fn test_tables_sorted_descending() {
        for levels in all_tables() {
            for pair in levels.windows(2) {
                assert!(
                    pair[0].level > pair[1].level,
                    "{} must come before {}",
                    pair[0].level,
                    pair[1].level
                );
            }
        }
    }

    fn entries(levels: ThresholdTable) -> Vec<(f64, &'static str)> {
        levels.iter().map(|th| (th.level, th.message)).collect()
    }

    #[test]
    fn test_aurora_messages_per_language() {
        assert_eq!(
            entries(AURORA_LEVELS_PL),
            vec![
                (90.0, "Lokalnie: 90. Masz ją nad głową!"),
                (80.0, "Lokalnie: 80. Ogromna szansa!"),
                (70.0, "Lokalnie: 70. Bardzo duża szansa."),
                (50.0, "Lokalnie: 50. Może coś się pojawi. Wypatruj."),
                (30.0, "Lokalnie: 30. Jeżeli będziesz mieć bardzo dużo szczęścia"),
            ]
        );
        assert_eq!(
            entries(AURORA_LEVELS_EN),
            vec![
                (90.0, "Locally: 90. You have it on your head!"),
                (80.0, "Locally: 80. Very likely!"),
                (70.0, "Locally: 70. Very likely."),
                (50.0, "Locally: 50. Something might happen. Take a break."),
                (30.0, "Locally: 30. If you have a lot of happiness"),
            ]
        );
    }

    #[test]
    fn test_k_index_messages_per_language() {
        assert_eq!(
            entries(K_INDEX_LEVELS_PL),
            vec![
                (9.0, "Globalnie: 9. Musisz ją widzieć!"),
                (8.0, "Globalnie: 8. Duża szansa!"),
                (7.0, "Globalnie: 7. Dzisiaj jest spora szansa."),
                (6.0, "Globalnie: 6. Dzisiaj jest szansa."),
                (5.0, "Globalnie: 5. Jakaś tam szansa dzisiaj jest."),
            ]
        );
        assert_eq!(
            entries(K_INDEX_LEVELS_EN),
            vec![
                (9.0, "Globally: 9. You have to see it!"),
                (8.0, "Globally: 8. Very likely!"),
                (7.0, "Globally: 7. There is a lot of chance today."),
                (6.0, "Globally: 6. There is a chance today."),
                (5.0, "Globally: 5. There might be a chance today."),
            ]
        );
    }

    #[test]
    fn test_languages_share_levels() {
        for metric in [Metric::Aurora, Metric::KIndex] {
            let pl: Vec<f64> = table(metric, Language::Pl).iter().map(|t| t.level).collect();
            let en: Vec<f64> = table(metric, Language::En).iter().map(|t| t.level).collect();
            assert_eq!(pl, en, "{:?} levels differ between languages", metric);
        }
    }

    #[test]
    fn test_value_between_levels_yields_lower_level() {
        // 55 reaches 50 but not 70.
        let crossing = evaluate(55.0, AURORA_LEVELS_EN, 0.0).expect("50 is crossed");
        assert_eq!(crossing.level, 50.0);
        assert!(crossing.message.starts_with("Locally: 50."));
    }

    #[test]
    fn test_same_value_after_crossing_yields_nothing() {
        assert_eq!(evaluate(55.0, AURORA_LEVELS_EN, 50.0), None);
    }

    #[test]
    fn test_value_exactly_at_level_crosses() {
        let crossing = evaluate(70.0, AURORA_LEVELS_EN, 50.0).unwrap();
        assert_eq!(crossing.level, 70.0);
    }

    #[test]
    fn test_drop_below_last_level_never_refires() {
        for value in [0.0, 29.9, 30.0, 49.0, 69.9] {
            assert_eq!(
                evaluate(value, AURORA_LEVELS_EN, 70.0),
                None,
                "value {} must not refire at or below last level 70",
                value
            );
        }
    }

    #[test]
    fn test_jump_reports_only_highest_crossed_level() {
        let crossing = evaluate(95.0, AURORA_LEVELS_PL, 0.0).unwrap();
        assert_eq!(crossing.level, 90.0);
        assert_eq!(crossing.message, "Lokalnie: 90. Masz ją nad głową!");
    }

    #[test]
    fn test_below_lowest_level_yields_nothing() {
        assert_eq!(evaluate(29.0, AURORA_LEVELS_EN, 0.0), None);
        assert_eq!(evaluate(4.67, K_INDEX_LEVELS_EN, 0.0), None);
    }

    #[test]
    fn test_fractional_kp_crosses_integer_level() {
        let crossing = evaluate(6.33, K_INDEX_LEVELS_EN, 5.0).unwrap();
        assert_eq!(crossing.level, 6.0);
    }

    #[test]
    fn test_ascending_values_emit_each_level_once() {
        let mut last = 0.0;
        let mut emitted = Vec::new();
        for value in [10.0, 31.0, 31.0, 52.0, 60.0, 71.0, 85.0, 85.0, 99.0, 99.0] {
            if let Some(c) = evaluate(value, AURORA_LEVELS_EN, last) {
                last = c.level;
                emitted.push(c.level);
            }
        }
        assert_eq!(emitted, vec![30.0, 50.0, 70.0, 80.0, 90.0]);
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("pl".parse::<Language>(), Ok(Language::Pl));
        assert_eq!(" EN ".parse::<Language>(), Ok(Language::En));
        assert!("de".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::Pl);
        assert_eq!(Language::En.to_string(), "en");
    }
}
