use crate::{
    libs::{
        config::Config,
        focus::{TerminalHost, WindowHost},
        messages::Message,
        session::SessionStore,
    },
    msg_bail_anyhow, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Select};

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Production line, e.g. "Line 3"
    #[arg(short, long)]
    line: Option<String>,
    /// Line lead running the shift
    #[arg(short = 'L', long)]
    lead: Option<String>,
}

pub fn cmd(login_args: LoginArgs) -> Result<()> {
    let roster = Config::read()?.roster;

    let line = match login_args.line {
        Some(line) => line,
        None => select(&roster.lines, Message::PromptSelectLine)?,
    };
    let line_lead = match login_args.lead {
        Some(lead) => lead,
        None => select(&roster.line_leads, Message::PromptSelectLineLead)?,
    };

    let session = SessionStore::new()?.create(&line, &line_lead)?;
    TerminalHost.request_focus();

    msg_success!(Message::LoggedIn {
        line: session.line,
        line_lead: session.line_lead,
    });
    Ok(())
}

fn select(options: &[String], prompt: Message) -> Result<String> {
    if options.is_empty() {
        msg_bail_anyhow!(Message::RosterEmpty);
    }
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .items(options)
        .default(0)
        .interact()?;
    Ok(options[selection].clone())
}
