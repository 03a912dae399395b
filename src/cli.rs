use appointmentReminder::clients::webhook_client::WebhookClient;
use appointmentReminder::config::{self, AppConfig, ReminderSettings};
use appointmentReminder::service::card_service::CardService;
use appointmentReminder::service::notifier::Notifier;
use appointmentReminder::tasks::clock::SystemClock;
use appointmentReminder::tasks::reminder_loop::run_reminder_loop;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use inquire::Text;
use std::collections::HashMap;
use std::env;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Parser)]
#[command(about = "Posts appointment reminder cards to a webhook at fixed lead times")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait for the appointment and send every reminder
    Run {
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Ask for the appointment details, then run
    Prompt {
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Print the card that would be sent right now
    Card {
        #[command(flatten)]
        overrides: Overrides,
    },
}

#[derive(Args, Default, Clone)]
struct Overrides {
    #[arg(long)]
    webhook_url: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    message: Option<String>,
    /// RFC 3339 or local YYYY-MM-DDTHH:MM[:SS]
    #[arg(long)]
    begin: Option<String>,
    #[arg(long)]
    end: Option<String>,
    #[arg(long)]
    link: Option<String>,
    /// Comma separated, e.g. 1d,1h,10m,30s
    #[arg(long)]
    lead_times: Option<String>,
    #[arg(long)]
    locale: Option<String>,
    #[arg(long)]
    timezone: Option<String>,
    #[arg(long)]
    poll_interval: Option<String>,
    #[arg(long)]
    location: Option<String>,
}

impl Overrides {
    fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            config::WEBHOOK_URL => &self.webhook_url,
            config::APPOINTMENT_TITLE => &self.title,
            config::APPOINTMENT_MESSAGE => &self.message,
            config::APPOINTMENT_BEGIN => &self.begin,
            config::APPOINTMENT_END => &self.end,
            config::APPOINTMENT_LINK => &self.link,
            config::REMINDER_LEAD_TIMES => &self.lead_times,
            config::REMINDER_LOCALE => &self.locale,
            config::TIMEZONE => &self.timezone,
            config::POLL_INTERVAL_SECS => &self.poll_interval,
            config::LOCATION_LABEL => &self.location,
            _ => return None,
        };
        value.clone()
    }
}

const PROMPTED_KEYS: [(&str, &str); 6] = [
    (config::APPOINTMENT_TITLE, "Title"),
    (config::APPOINTMENT_MESSAGE, "Message (%t = time remaining)"),
    (config::APPOINTMENT_BEGIN, "Begin (YYYY-MM-DDTHH:MM)"),
    (config::APPOINTMENT_END, "End (YYYY-MM-DDTHH:MM)"),
    (config::APPOINTMENT_LINK, "Channel link"),
    (config::REMINDER_LEAD_TIMES, "Lead times"),
];

pub async fn cli(app_config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Fine to exit here on bad arguments
    let cli = Cli::parse();
    let base = |key: &str| -> Option<String> {
        app_config.get(key).or_else(|| env::var(key).ok())
    };

    match &cli.command {
        Commands::Run { overrides } => {
            let settings = ReminderSettings::resolve(|key| overrides.get(key).or_else(|| base(key)))?;
            run(settings).await;
        }
        Commands::Prompt { overrides } => {
            let answers = prompt_appointment(|key| overrides.get(key).or_else(|| base(key)))?;
            let settings = ReminderSettings::resolve(|key| {
                answers
                    .get(key)
                    .cloned()
                    .or_else(|| overrides.get(key))
                    .or_else(|| base(key))
            })?;
            run(settings).await;
        }
        Commands::Card { overrides } => {
            let settings = ReminderSettings::resolve(|key| overrides.get(key).or_else(|| base(key)))?;
            let card = CardService::build_card(&settings.appointment, &settings.card, Utc::now());
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
    }
    Ok(())
}

fn prompt_appointment<F>(current: F) -> Result<HashMap<String, String>, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut answers = HashMap::new();
    for (key, label) in PROMPTED_KEYS {
        let existing = current(key).unwrap_or_default();
        let answer = Text::new(label).with_default(&existing).prompt()?;
        answers.insert(key.to_string(), answer);
    }
    Ok(answers)
}

async fn run(settings: ReminderSettings) {
    info!(
        host = settings.webhook_url.host_str().unwrap_or_default(),
        "will send reminders to webhook"
    );
    let notifier = Notifier::new(
        Box::new(WebhookClient::new(settings.webhook_url.clone())),
        settings.card.clone(),
    );

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown requested");
                let _ = shutdown_tx.send(true);
            }
            Err(err) => warn!(error = %err, "unable to listen for shutdown signal"),
        }
    });

    let report = run_reminder_loop(
        &settings.appointment,
        settings.lead_times.clone(),
        &notifier,
        &SystemClock,
        settings.poll_interval,
        &mut shutdown_rx,
    )
    .await;

    let delivered = report.fired.iter().filter(|r| r.outcome.is_delivered()).count();
    info!(
        fired = report.fired.len(),
        delivered,
        cancelled = report.cancelled,
        "reminder run finished"
    );
}
