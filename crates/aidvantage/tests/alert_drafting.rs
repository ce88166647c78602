use aidvantage::alerts::{AlertDraft, AlertPredictor, DraftChannel};
use aidvantage::data::{fixtures, Dataset};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn predicted_alerts_can_be_drafted_for_their_county() {
    let dataset = Dataset::builtin();
    let today = NaiveDate::from_ymd_opt(2025, 8, 1).expect("valid date");
    let mut rng = StdRng::seed_from_u64(7);

    let alerts = AlertPredictor::default().predict(&dataset.counties, today, &mut rng);

    for alert in &alerts {
        let county = dataset.county_name(&alert.county_id);
        assert!(county.is_some());
        let draft = AlertDraft::render(DraftChannel::Email, alert, county);
        assert!(draft.body.contains("• Predicted Date: 8/8/2025"));
        assert!(draft.body.contains(county.unwrap_or_default()));
    }
}

#[test]
fn draft_animation_is_restartable() {
    let alert = fixtures::alerts().remove(0);
    let draft = AlertDraft::sms(&alert, Some("Maricopa"));
    let mut frames = draft.frames();

    let first_pass: Vec<String> = frames.by_ref().collect();
    frames.restart();
    let second_pass: Vec<String> = frames.collect();

    assert_eq!(first_pass, second_pass);
    assert_eq!(first_pass.first().map(String::as_str), Some(""));
    assert_eq!(first_pass.last(), Some(&draft.body));
}
