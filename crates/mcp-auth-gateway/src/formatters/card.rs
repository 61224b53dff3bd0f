//! Plain-text result cards.
//!
//! Every tool answers with the same layout: a title, a rule, labelled lines and a
//! wall-clock timestamp.

use chrono::Local;

const RULE: &str = "----------------------------------";

/// Builder for a text result card.
#[derive(Debug, Clone)]
pub struct ResultCard {
    title: String,
    lines: Vec<String>,
}

impl ResultCard {
    /// Start a card with a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), lines: Vec::new() }
    }

    /// Add a `Label: value` line.
    #[must_use]
    pub fn line(mut self, label: &str, value: impl std::fmt::Display) -> Self {
        self.lines.push(format!("{label}: {value}"));
        self
    }

    /// Add a free-form line.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    /// Add a `Label: <now>` line with date and time.
    #[must_use]
    pub fn timestamp(self, label: &str) -> Self {
        let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.line(label, now)
    }

    /// Add a `Label: <today>` line.
    #[must_use]
    pub fn date(self, label: &str) -> Self {
        let today = Local::now().format("%Y-%m-%d").to_string();
        self.line(label, today)
    }

    /// Render the card.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = format!("{}\n{RULE}\n", self.title);
        for line in &self.lines {
            output.push_str(line);
            output.push('\n');
        }
        output
    }
}

/// Format a float the way a person writes it: `5` not `5.0`, `2.5` stays `2.5`.
#[must_use]
pub fn display_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_layout() {
        let card = ResultCard::new("Calculation: Addition").line("Operation", "2 + 3").line("Result", 5).render();
        let lines: Vec<&str> = card.lines().collect();
        assert_eq!(lines[0], "Calculation: Addition");
        assert_eq!(lines[1], RULE);
        assert_eq!(lines[2], "Operation: 2 + 3");
        assert_eq!(lines[3], "Result: 5");
    }

    #[test]
    fn test_timestamp_line() {
        let card = ResultCard::new("t").timestamp("Computed at").render();
        let stamp = card.lines().last().unwrap().trim_start_matches("Computed at: ");
        assert_eq!(stamp.len(), "2024-01-01 00:00:00".len());
    }

    #[test]
    fn test_display_number() {
        assert_eq!(display_number(5.0), "5");
        assert_eq!(display_number(-3.0), "-3");
        assert_eq!(display_number(2.5), "2.5");
        assert_eq!(display_number(f64::INFINITY), "inf");
        assert_eq!(display_number(f64::NAN), "NaN");
    }
}
