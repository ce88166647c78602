use super::PredictiveAlert;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftChannel {
    Email,
    Sms,
}

impl DraftChannel {
    /// Pause before the first character appears.
    pub fn lead_in(self) -> Duration {
        match self {
            DraftChannel::Email => Duration::from_millis(1500),
            DraftChannel::Sms => Duration::from_millis(1200),
        }
    }

    /// Pause between revealed characters.
    pub fn frame_delay(self) -> Duration {
        match self {
            DraftChannel::Email => Duration::from_millis(5),
            DraftChannel::Sms => Duration::from_millis(8),
        }
    }
}

/// Rendered notification text for one alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertDraft {
    pub channel: DraftChannel,
    pub body: String,
}

impl AlertDraft {
    pub fn render(channel: DraftChannel, alert: &PredictiveAlert, county_name: Option<&str>) -> Self {
        match channel {
            DraftChannel::Email => Self::email(alert, county_name),
            DraftChannel::Sms => Self::sms(alert, county_name),
        }
    }

    pub fn email(alert: &PredictiveAlert, county_name: Option<&str>) -> Self {
        let county = county_name.unwrap_or("Unknown County");
        let hazard = alert.alert_type.label();
        let hazard_upper = hazard.to_uppercase();
        let date = display_date(alert);
        let severity = alert.severity.label().to_uppercase();
        let confidence = confidence_pct(alert);

        let body = format!(
            "Subject: URGENT: {hazard_upper} Alert - {county}\n\
\n\
Dear Emergency Response Team,\n\
\n\
Our AI monitoring system has detected a HIGH RISK {hazard} event predicted for {county} on {date}.\n\
\n\
⚠️ ALERT DETAILS:\n\
• Location: {county}\n\
• Risk Type: {hazard_upper}\n\
• Severity: {severity}\n\
• Predicted Date: {date}\n\
• Confidence Level: {confidence}%\n\
\n\
IMMEDIATE ACTIONS REQUIRED:\n\
• Activate emergency response protocols\n\
• Pre-position resources and equipment\n\
• Issue public safety warnings\n\
• Coordinate with local emergency services\n\
\n\
This alert was generated using advanced AI analysis of environmental data, weather patterns, and historical risk factors.\n\
\n\
Please confirm receipt and action status.\n\
\n\
Best regards,\n\
AidVantage AI Alert System"
        );

        Self {
            channel: DraftChannel::Email,
            body,
        }
    }

    pub fn sms(alert: &PredictiveAlert, county_name: Option<&str>) -> Self {
        let county = county_name.unwrap_or("Unknown County");
        let hazard_upper = alert.alert_type.label().to_uppercase();
        let date = display_date(alert);
        let severity = alert.severity.label().to_uppercase();
        let confidence = confidence_pct(alert);

        let body = format!(
            "🚨 URGENT ALERT - {county}\n\
\n\
{hazard_upper} risk detected for {date}\n\
\n\
Severity: {severity}\n\
Confidence: {confidence}%\n\
\n\
Activate emergency protocols immediately.\n\
\n\
- AidVantage AI"
        );

        Self {
            channel: DraftChannel::Sms,
            body,
        }
    }

    pub fn frames(&self) -> RevealFrames {
        RevealFrames::new(self.body.clone())
    }
}

fn display_date(alert: &PredictiveAlert) -> String {
    alert.predicted_date.format("%-m/%-d/%Y").to_string()
}

fn confidence_pct(alert: &PredictiveAlert) -> i64 {
    (alert.confidence * 100.0).round() as i64
}

/// Growing prefixes of a text, one character at a time, from the empty string
/// to the full text. Finite, and `restart` rewinds it.
#[derive(Debug, Clone)]
pub struct RevealFrames {
    text: String,
    boundaries: Vec<usize>,
    next: usize,
}

impl RevealFrames {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let boundaries = text
            .char_indices()
            .map(|(index, _)| index)
            .skip(1)
            .chain(std::iter::once(text.len()))
            .collect::<Vec<_>>();
        let mut all = Vec::with_capacity(boundaries.len() + 1);
        all.push(0);
        if !text.is_empty() {
            all.extend(boundaries);
        }
        Self {
            text,
            boundaries: all,
            next: 0,
        }
    }

    pub fn restart(&mut self) {
        self.next = 0;
    }

    pub fn full_text(&self) -> &str {
        &self.text
    }
}

impl Iterator for RevealFrames {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let end = *self.boundaries.get(self.next)?;
        self.next += 1;
        Some(self.text[..end].to_string())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.boundaries.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RevealFrames {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    #[test]
    fn email_fills_alert_details() {
        let alert = fixtures::alerts().remove(0);
        let draft = AlertDraft::email(&alert, Some("Maricopa"));

        assert!(draft
            .body
            .starts_with("Subject: URGENT: EXTREME HEAT Alert - Maricopa\n"));
        assert!(draft.body.contains("• Severity: CRITICAL\n"));
        assert!(draft.body.contains("• Predicted Date: 9/22/2024\n"));
        assert!(draft.body.contains("• Confidence Level: 92%\n"));
        assert!(draft.body.ends_with("AidVantage AI Alert System"));
    }

    #[test]
    fn sms_uses_unknown_county_when_missing() {
        let alert = fixtures::alerts().remove(1);
        let draft = AlertDraft::render(DraftChannel::Sms, &alert, None);

        assert_eq!(draft.channel, DraftChannel::Sms);
        assert!(draft.body.starts_with("🚨 URGENT ALERT - Unknown County\n"));
        assert!(draft.body.contains("AIR QUALITY risk detected for 9/20/2024"));
        assert!(draft.body.contains("Confidence: 87%"));
    }

    #[test]
    fn frames_reveal_by_character_and_restart() {
        let mut frames = RevealFrames::new("hé!");
        assert_eq!(frames.len(), 4);

        let collected: Vec<String> = frames.by_ref().collect();
        assert_eq!(collected, vec!["", "h", "hé", "hé!"]);
        assert!(frames.next().is_none());

        frames.restart();
        assert_eq!(frames.next().as_deref(), Some(""));
        assert_eq!(frames.last().as_deref(), Some("hé!"));
    }

    #[test]
    fn empty_text_yields_single_empty_frame() {
        let frames: Vec<String> = RevealFrames::new("").collect();
        assert_eq!(frames, vec![String::new()]);
    }

    #[test]
    fn draft_frames_end_with_full_body() {
        let alert = fixtures::alerts().remove(2);
        let draft = AlertDraft::sms(&alert, Some("Miami-Dade"));
        let frames = draft.frames();

        assert_eq!(frames.len(), draft.body.chars().count() + 1);
        assert_eq!(frames.last(), Some(draft.body.clone()));
        assert!(DraftChannel::Sms.frame_delay() > DraftChannel::Email.frame_delay());
    }
}
