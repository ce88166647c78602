use crate::infra::{parse_date, InMemoryScenarioStore};
use aidvantage::alerts::{
    AlertDraft, AlertPredictor, DashboardOverview, DraftChannel, PredictiveAlert,
};
use aidvantage::allocation::{
    AllocationConfig, AllocationService, RunRequest, ScenarioReport, SessionId,
};
use aidvantage::config::AppConfig;
use aidvantage::data::{fixtures, Dataset};
use aidvantage::error::AppError;
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct AllocateArgs {
    /// County CSV replacing the built-in counties
    #[arg(long)]
    pub(crate) counties_csv: Option<PathBuf>,
    /// Resource CSV replacing the built-in stockpiles
    #[arg(long)]
    pub(crate) resources_csv: Option<PathBuf>,
    /// Freeform inventory file appended to the resources (one item per line)
    #[arg(long)]
    pub(crate) inventory: Option<PathBuf>,
    /// Label for the scenario instead of the generated run name
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Percentage of a resource's starting stock one county may receive
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=100))]
    pub(crate) max_share: Option<u64>,
    /// Print the scenario report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AlertPredictArgs {
    /// Seed for reproducible predictions
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Prediction date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub(crate) enum ChannelArg {
    #[default]
    Email,
    Sms,
}

impl From<ChannelArg> for DraftChannel {
    fn from(value: ChannelArg) -> Self {
        match value {
            ChannelArg::Email => DraftChannel::Email,
            ChannelArg::Sms => DraftChannel::Sms,
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct AlertDraftArgs {
    /// Seeded alert to draft for. Defaults to the first one.
    #[arg(long)]
    pub(crate) alert_id: Option<String>,
    #[arg(long, value_enum, default_value_t = ChannelArg::Email)]
    pub(crate) channel: ChannelArg,
    /// Type the draft out character by character
    #[arg(long)]
    pub(crate) animate: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed for the prediction step
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Animate the alert draft
    #[arg(long)]
    pub(crate) animate: bool,
}

pub(crate) fn run_allocate(args: AllocateArgs) -> Result<(), AppError> {
    let AllocateArgs {
        counties_csv,
        resources_csv,
        inventory,
        name,
        max_share,
        json,
    } = args;

    let config = AppConfig::load()?;
    let counties_csv = counties_csv.or(config.data.counties_csv);
    let resources_csv = resources_csv.or(config.data.resources_csv);
    let mut allocation = config.allocation;
    if let Some(pct) = max_share {
        allocation = allocation.with_max_county_share_pct(pct);
    }

    let dataset = Dataset::from_csv_paths(counties_csv.as_deref(), resources_csv.as_deref())?;
    let inventory = inventory.map(std::fs::read_to_string).transpose()?;

    let service = AllocationService::new(
        Arc::new(InMemoryScenarioStore::default()),
        dataset,
        allocation,
    );
    let report = service.run(&SessionId("cli".to_string()), RunRequest { name, inventory })?;

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|err| {
                AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
            })?;
        println!("{rendered}");
    } else {
        render_scenario_report(&report);
    }
    Ok(())
}

pub(crate) fn run_alert_predict(args: AlertPredictArgs) -> Result<(), AppError> {
    let AlertPredictArgs { seed, today } = args;
    let dataset = Dataset::builtin();
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let alerts = predict(&dataset, today, seed);
    render_alerts(&dataset, &alerts, today);
    Ok(())
}

pub(crate) fn run_alert_draft(args: AlertDraftArgs) -> Result<(), AppError> {
    let AlertDraftArgs {
        alert_id,
        channel,
        animate,
    } = args;
    let dataset = Dataset::builtin();
    let alerts = fixtures::alerts();

    let alert = match &alert_id {
        Some(id) => alerts.iter().find(|alert| &alert.id.0 == id),
        None => alerts.first(),
    };
    let Some(alert) = alert else {
        println!(
            "No seeded alert with id {}",
            alert_id.as_deref().unwrap_or_default()
        );
        return Ok(());
    };

    let draft = AlertDraft::render(
        channel.into(),
        alert,
        dataset.county_name(&alert.county_id),
    );
    present_draft(&draft, animate)?;
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { seed, animate } = args;
    let dataset = Dataset::builtin();
    let today = Local::now().date_naive();

    println!("AidVantage dashboard demo");
    println!(
        "{} counties | {} resource lines | {} units in stock",
        dataset.counties.len(),
        dataset.resources.len(),
        dataset
            .resources
            .iter()
            .map(|resource| resource.available_qty)
            .sum::<u64>()
    );

    let seed_scenario = fixtures::seed_scenario();
    println!(
        "Previous scenario: {} ({} units, {} counties)",
        seed_scenario.name, seed_scenario.total_resources, seed_scenario.counties_served
    );

    let service = AllocationService::new(
        Arc::new(InMemoryScenarioStore::default()),
        dataset.clone(),
        AllocationConfig::default(),
    );
    let report = service.run(&SessionId("demo".to_string()), RunRequest::default())?;
    println!();
    render_scenario_report(&report);

    println!();
    let alerts = predict(&dataset, today, seed);
    render_alerts(&dataset, &alerts, today);

    let mut feed = fixtures::alerts();
    feed.extend(alerts.iter().cloned());
    let overview = DashboardOverview::compute(&dataset.counties, &dataset.resources, &feed);
    println!(
        "\nOverview: {} units on hand | {} counties | {} critical of {} alerts | average risk {:.1}",
        overview.total_resources,
        overview.total_counties,
        overview.critical_alerts,
        feed.len(),
        overview.average_risk_score
    );

    let featured = alerts
        .iter()
        .find(|alert| alert.is_active())
        .cloned()
        .or_else(|| fixtures::alerts().into_iter().next());
    if let Some(alert) = featured {
        println!("\nEmail draft");
        let draft = AlertDraft::email(&alert, dataset.county_name(&alert.county_id));
        present_draft(&draft, animate)?;
    }

    Ok(())
}

fn predict(dataset: &Dataset, today: NaiveDate, seed: Option<u64>) -> Vec<PredictiveAlert> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    AlertPredictor::default().predict(&dataset.counties, today, &mut rng)
}

pub(crate) fn render_scenario_report(report: &ScenarioReport) {
    let ScenarioReport { scenario, summary } = report;

    println!("{} ({})", scenario.name, scenario.id);
    println!(
        "Objective: {} | created {}",
        scenario.optimization_objective,
        scenario.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "{} units across {} allocations to {} counties | average need met {:.1}%",
        summary.total_allocated,
        summary.allocation_count,
        summary.counties_served,
        summary.average_need_met
    );

    if summary.per_county.is_empty() {
        println!("\nNo county qualified for any resource");
        return;
    }

    println!("\nCounties (priority order)");
    for entry in &summary.per_county {
        println!(
            "- {}: {} units from {} resources, {:.1}% need met",
            entry.county_name.as_deref().unwrap_or(&entry.county_id.0),
            entry.total_quantity,
            entry.resources_received,
            entry.average_need_met
        );
    }

    println!("\nResource usage");
    for entry in &summary.per_resource {
        let name = entry.resource_name.as_deref().unwrap_or(&entry.resource_id.0);
        match (entry.remaining, entry.utilization_pct) {
            (Some(remaining), Some(pct)) => println!(
                "- {}: {} allocated, {} remaining ({:.0}% used)",
                name, entry.allocated, remaining, pct
            ),
            _ => println!("- {}: {} allocated", name, entry.allocated),
        }
    }
}

pub(crate) fn render_alerts(dataset: &Dataset, alerts: &[PredictiveAlert], today: NaiveDate) {
    if alerts.is_empty() {
        println!("Predictive alerts for {today}: none");
        return;
    }

    let active = alerts.iter().filter(|alert| alert.is_active()).count();
    println!(
        "Predictive alerts for {today}: {} total, {} active",
        alerts.len(),
        active
    );
    for alert in alerts {
        println!(
            "- [{}] {} in {} on {} ({:.0}% confidence): {}",
            alert.severity.label(),
            alert.alert_type.label(),
            dataset
                .county_name(&alert.county_id)
                .unwrap_or("Unknown County"),
            alert.predicted_date,
            alert.confidence * 100.0,
            alert.message
        );
        for recommendation in &alert.recommendations {
            println!("    * {recommendation}");
        }
    }
}

fn present_draft(draft: &AlertDraft, animate: bool) -> Result<(), AppError> {
    if !animate {
        println!("{}", draft.body);
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    std::thread::sleep(draft.channel.lead_in());
    let mut shown = 0;
    for frame in draft.frames() {
        stdout.write_all(frame[shown..].as_bytes())?;
        stdout.flush()?;
        shown = frame.len();
        std::thread::sleep(draft.channel.frame_delay());
    }
    writeln!(stdout)?;
    Ok(())
}
