use std::{
    io::{self, IsTerminal, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    load_settings, ChatSettings, HttpResponder, Session, SubmitOutcome, SuggestionVisibility,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod input;
mod render;

use input::{parse_line, UserAction};
use render::TerminalRenderer;

#[derive(Parser, Debug)]
#[command(name = "halsa-chat", about = "Terminal chat client for the health answering service")]
struct Args {
    /// TOML config file; defaults to ./chat.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    backend_url: Option<String>,
    #[arg(long)]
    query_path: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// `always` or `until-first-turn`.
    #[arg(long)]
    suggestions: Option<SuggestionVisibility>,
    /// Ask these questions in order, print the transcript and exit.
    #[arg(long = "ask", value_name = "QUESTION")]
    ask: Vec<String>,
}

impl Args {
    fn apply(&self, settings: &mut ChatSettings) {
        if let Some(v) = &self.backend_url {
            settings.backend_url = v.clone();
        }
        if let Some(v) = &self.query_path {
            settings.query_path = v.clone();
        }
        if let Some(v) = self.timeout_secs {
            settings.request_timeout_secs = v;
        }
        if let Some(v) = self.suggestions {
            settings.suggestion_visibility = v;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Continue,
    Quit,
}

/// Keeps library `info` lines off the terminal unless `RUST_LOG` asks for them.
const DEFAULT_LOG_FILTER: &str = "warn";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_session(settings: &ChatSettings) -> Result<Session> {
    let endpoint = settings.endpoint().context("invalid answering service url")?;
    let responder = HttpResponder::new(endpoint.clone(), settings.request_timeout())
        .context("failed to build answering service client")?;
    info!(%endpoint, visibility = %settings.suggestion_visibility, "chat session configured");

    let mut session = Session::new(
        Arc::new(responder),
        settings.suggestion_catalog(),
        settings.suggestion_visibility,
    );
    session.initialise();
    Ok(session)
}

async fn handle_action<W: Write>(
    session: &mut Session,
    renderer: &mut TerminalRenderer<W>,
    settings: &ChatSettings,
    action: UserAction,
) -> io::Result<Control> {
    let outcome = match action {
        UserAction::Quit => return Ok(Control::Quit),
        UserAction::Help => {
            renderer.render_help()?;
            return Ok(Control::Continue);
        }
        UserAction::Unknown(command) => {
            renderer.render_notice(&format!("Unknown command '/{command}'; try /help"))?;
            return Ok(Control::Continue);
        }
        UserAction::Ask(text) => {
            if !text.trim().is_empty() {
                renderer.render_pending(&text)?;
            }
            session.submit(&text).await
        }
        UserAction::Suggestion(number) => {
            if !session.suggestions_offered() {
                debug!(number, "suggestions hidden; ignoring shortcut");
                SubmitOutcome::Ignored
            } else {
                session.handle_suggestion_number(number).await
            }
        }
    };

    if outcome == SubmitOutcome::Rerender {
        renderer.render(&settings.page, session)?;
    }
    Ok(Control::Continue)
}

async fn run_interactive(settings: &ChatSettings, mut session: Session) -> Result<()> {
    let stdout = io::stdout();
    let clear_screen = stdout.is_terminal();
    let mut renderer = TerminalRenderer::new(stdout, clear_screen);
    renderer.render(&settings.page, &session)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        session.initialise();
        let control =
            handle_action(&mut session, &mut renderer, settings, parse_line(&line)).await?;
        if control == Control::Quit {
            break;
        }
    }

    info!(session_id = %session.id(), turns = session.transcript().len(), "chat session ended");
    Ok(())
}

async fn run_one_shot<W: Write>(
    settings: &ChatSettings,
    session: &mut Session,
    questions: &[String],
    out: W,
) -> Result<()> {
    for question in questions {
        let _ = session.submit(question).await;
    }
    let mut renderer = TerminalRenderer::new(out, false);
    renderer.render(&settings.page, session)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    args.apply(&mut settings);
    settings.validate()?;

    let mut session = build_session(&settings)?;
    if args.ask.is_empty() {
        run_interactive(&settings, session).await
    } else {
        run_one_shot(&settings, &mut session, &args.ask, io::stdout()).await
    }
}
