//! CLI entry point for the openload tool.

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use openload_core::{ApiClient, CaptchaChallenge, Credentials};
use tracing::{debug, info, warn};

mod app_config;
mod cli;
mod exit_codes;
mod output;
mod settings;

use cli::{Args, Command};
use exit_codes::ProcessExit;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs).
    // Usage errors exit with 1; 2..=4 are reserved for API failure kinds.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ProcessExit::Failure.into()
            } else {
                ProcessExit::Success.into()
            };
        }
    };

    init_tracing(&args);

    match run(args).await {
        Ok(()) => ProcessExit::Success.into(),
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_codes::exit_for_error(&err).into()
        }
    }
}

/// Priority: `RUST_LOG` env var > quiet flag > verbose flag > default (info).
fn init_tracing(args: &Args) {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init();
}

async fn run(args: Args) -> Result<()> {
    let loaded = app_config::load_default_file_config()?;
    if let Some(path) = loaded.path.as_deref()
        && loaded.config.is_some()
    {
        debug!(path = %path.display(), "Loaded config file");
    }

    let resolved = settings::resolve_settings(&args, loaded.config.as_ref());
    let credentials = resolved.credentials;
    let client = ApiClient::new(resolved.client).context("Failed to set up API client")?;
    debug!(
        base_url = %client.base_url(),
        authenticated = credentials.is_some(),
        "API client ready"
    );

    match args.command {
        Command::Ticket { file_id } => {
            let ticket = client
                .request_ticket(&file_id, credentials.as_ref())
                .await
                .with_context(|| format!("Ticket request for '{file_id}' failed"))?;
            if args.json {
                print_out(&output::to_json(&ticket)?);
            } else {
                print_lines(&output::ticket_lines(&ticket));
            }
        }
        Command::Download {
            file_id,
            ticket,
            captcha,
        } => {
            let grant = client
                .resolve_download(&file_id, &ticket, captcha.as_deref())
                .await
                .with_context(|| format!("Download request for '{file_id}' failed"))?;
            print_grant(&grant, args.json)?;
        }
        Command::Link { file_id, no_wait } => {
            run_link(&client, &file_id, credentials.as_ref(), no_wait, args.json).await?;
        }
        Command::Info { file_ids } => {
            let records = client
                .fetch_info(&file_ids, credentials.as_ref())
                .await
                .context("File info request failed")?;
            for missing in output::missing_ids(&file_ids, &records) {
                warn!(file_id = %missing, "No record returned");
            }
            if args.json {
                print_out(&output::info_json(&records)?);
            } else {
                print_lines(&output::info_lines(&records));
            }
        }
    }

    Ok(())
}

/// Full flow: ticket, optional captcha prompt, wait, redeem.
async fn run_link(
    client: &ApiClient,
    file_id: &str,
    credentials: Option<&Credentials>,
    no_wait: bool,
    json: bool,
) -> Result<()> {
    let ticket = client
        .request_ticket(file_id, credentials)
        .await
        .with_context(|| format!("Ticket request for '{file_id}' failed"))?;
    let issued_at = Instant::now();

    let answer = match &ticket.captcha {
        Some(challenge) => Some(prompt_captcha_answer(challenge.clone()).await?),
        None => None,
    };

    // Time spent on the captcha counts toward the wait.
    let remaining = ticket.wait_time().saturating_sub(issued_at.elapsed());
    if no_wait {
        debug!(skipped_secs = remaining.as_secs(), "Skipping ticket wait");
    } else if !remaining.is_zero() {
        info!(secs = remaining.as_secs(), "Waiting before redeeming ticket");
        tokio::time::sleep(remaining).await;
    }

    let grant = client
        .resolve_download(file_id, &ticket.ticket, answer.as_deref())
        .await
        .with_context(|| format!("Download request for '{file_id}' failed"))?;
    print_grant(&grant, json)
}

async fn prompt_captcha_answer(challenge: CaptchaChallenge) -> Result<String> {
    tokio::task::spawn_blocking(move || -> Result<String> {
        let mut stderr = io::stderr();
        writeln!(stderr, "Captcha required: {}", challenge.url)?;
        write!(stderr, "Answer: ")?;
        stderr.flush()?;

        let mut line = String::new();
        io::stdin()
            .read_line(&mut line)
            .context("Failed to read captcha answer from stdin")?;
        let answer = line.trim();
        if answer.is_empty() {
            bail!("No captcha answer given");
        }
        Ok(answer.to_string())
    })
    .await
    .context("Captcha prompt task failed")?
}

fn print_grant(grant: &openload_core::DownloadGrant, json: bool) -> Result<()> {
    if json {
        print_out(&output::to_json(grant)?);
    } else {
        print_lines(&output::grant_lines(grant));
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

fn print_out(text: &str) {
    println!("{text}");
}
