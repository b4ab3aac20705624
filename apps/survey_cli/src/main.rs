use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::{LikedOption, SurveyId};
use survey_client::HttpSurveyClient;
use survey_form::{
    results::{self, COLUMNS},
    DeleteOutcome, Field, FormController, FormSnapshot, ResultsView,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, normalize_api_url};

#[derive(Parser, Debug)]
#[command(name = "survey", about = "Student survey intake client")]
struct Args {
    /// Survey collection url, overriding the settings file and environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true, default_value = "survey.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every stored survey.
    List,
    /// Print one survey.
    Show { id: i64 },
    /// Fill in a new survey and submit it.
    Create(FieldArgs),
    /// Load a survey, apply changes, and submit the update.
    Edit {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a survey after confirmation.
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Args, Debug)]
struct FieldArgs {
    /// Field assignment such as `stu_first=Ann` or `zip=22030`.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    set: Vec<(Field, String)>,
    /// Liked-most option to check.
    #[arg(long = "like", value_name = "OPTION")]
    like: Vec<String>,
    /// Liked-most option to uncheck.
    #[arg(long = "unlike", value_name = "OPTION")]
    unlike: Vec<String>,
}

fn parse_assignment(raw: &str) -> Result<(Field, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = name.parse::<Field>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    let api_url = normalize_api_url(&settings.api_url)?;
    info!(api_url = %api_url, "survey: using collection");

    let transport = Arc::new(
        HttpSurveyClient::with_timeout(
            &api_url,
            Duration::from_secs(settings.request_timeout_secs),
        )
        .context("failed to build survey client")?,
    );
    let form = FormController::new(transport.clone());

    match args.command {
        Command::List => {
            let mut view = ResultsView::new(transport);
            let rows = view.load().await.context("failed to fetch survey results")?;
            print!("{}", render_table(rows));
        }
        Command::Show { id } => {
            form.enter_edit(SurveyId(id))
                .await
                .with_context(|| format!("failed to load survey {id}"))?;
            print!("{}", render_record(&form.snapshot().await));
        }
        Command::Create(fields) => {
            apply_fields(&form, fields).await?;
            let saved = form.submit().await.context("failed to submit survey")?;
            println!(
                "Saved survey ID {}",
                saved.id.map(|id| id.to_string()).unwrap_or_else(|| "?".into())
            );
        }
        Command::Edit { id, fields } => {
            form.enter_edit(SurveyId(id))
                .await
                .with_context(|| format!("failed to load survey {id}"))?;
            apply_fields(&form, fields).await?;
            form.submit()
                .await
                .with_context(|| format!("failed to update survey {id}"))?;
            println!("Updated survey ID {id}");
        }
        Command::Delete { id, yes } => {
            form.enter_edit(SurveyId(id))
                .await
                .with_context(|| format!("failed to load survey {id}"))?;
            let confirmed = yes
                || tokio::task::spawn_blocking(move || {
                    prompt_yes_no(SurveyId(id), &mut io::stdin().lock(), &mut io::stdout())
                })
                .await
                .context("confirmation prompt failed")?;
            let confirm = move |_: SurveyId| confirmed;
            match form.delete(&confirm).await.context("failed to delete survey")? {
                DeleteOutcome::Deleted => println!("Deleted survey ID {id}"),
                DeleteOutcome::Declined => println!("Kept survey ID {id}"),
            }
        }
    }

    Ok(())
}

async fn apply_fields(form: &FormController, fields: FieldArgs) -> Result<()> {
    for (field, value) in fields.set {
        form.set_field(field, &value)
            .await
            .with_context(|| format!("cannot set {field}"))?;
    }
    for (raw, checked) in fields
        .like
        .iter()
        .map(|raw| (raw, true))
        .chain(fields.unlike.iter().map(|raw| (raw, false)))
    {
        let option = raw
            .parse::<LikedOption>()
            .map_err(|e| anyhow!("{e}"))?;
        form.toggle_liked(option, checked).await;
    }
    Ok(())
}

fn prompt_yes_no(id: SurveyId, input: &mut impl BufRead, output: &mut impl Write) -> bool {
    if write!(output, "Delete survey ID {id}? [y/N] ")
        .and_then(|_| output.flush())
        .is_err()
    {
        return false;
    }
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn render_table(rows: &[shared::protocol::SurveyRecord]) -> String {
    let body: Vec<[String; 16]> = rows.iter().map(results::cells).collect();
    let mut widths = COLUMNS.map(str::len);
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = COLUMNS.map(String::from);
    for row in std::iter::once(&header).chain(&body) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn render_record(snapshot: &FormSnapshot) -> String {
    let cells = results::cells(&snapshot.record);
    COLUMNS
        .iter()
        .zip(cells)
        .map(|(column, cell)| format!("{column:>19}: {cell}\n"))
        .collect()
}
