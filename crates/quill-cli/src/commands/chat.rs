use super::AppContext;
use anyhow::{Context, Result};
use quill_application::{ChangeNotifier, ChatReply, ChatSession, DocumentPatchService};
use quill_core::secret::SecretService;
use quill_infrastructure::SecretServiceImpl;
use quill_interaction::{MistralApiAgent, StreamUpdate};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  :select <text>  set the selection (rendered text)
  :clear          clear the live selection
  :accept         apply the proposed edit
  :reject         discard the proposed edit
  :undo / :redo   step through applied edits
  :new            start a new chat
  :quit           exit
Anything else is sent to the assistant.";

enum Input<'a> {
    Select(&'a str),
    Clear,
    Accept,
    Reject,
    Undo,
    Redo,
    NewChat,
    Help,
    Quit,
    Message(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    match line {
        ":clear" => Input::Clear,
        ":accept" => Input::Accept,
        ":reject" => Input::Reject,
        ":undo" => Input::Undo,
        ":redo" => Input::Redo,
        ":new" => Input::NewChat,
        ":help" => Input::Help,
        ":quit" | ":q" => Input::Quit,
        _ => match line.strip_prefix(":select") {
            Some(rest) => Input::Select(rest.trim()),
            None => Input::Message(line),
        },
    }
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    let secrets = SecretServiceImpl::new()?
        .load_secrets()
        .await
        .context("Failed to load secrets")?;
    let transport = Arc::new(MistralApiAgent::try_from_secrets(&secrets, &ctx.config.provider)?);

    let notifier = Arc::new(ChangeNotifier::new());
    let mut events = notifier.subscribe();
    let applier = Arc::new(DocumentPatchService::new(ctx.repository.clone(), notifier));

    let mut session = ChatSession::start(transport, applier, ctx.repository.clone(), &ctx.config).await?;
    println!("Editing {}. Type :help for commands.", ctx.repository.path().display());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        while let Ok(event) = events.try_recv() {
            session.handle_event(event).await?;
        }

        match parse_input(&line) {
            Input::Select(text) => match session.select(text) {
                Some(anchor) if anchor.is_degraded() => {
                    println!("Selection not found in source; edits may fail to apply.")
                }
                Some(anchor) => println!("Selected:\n{}", anchor.text),
                None => println!("Selection cleared."),
            },
            Input::Clear => {
                session.clear_selection();
                println!("Selection cleared.");
            }
            Input::Accept => match session.accept().await {
                Ok(_) => println!("Changes applied successfully."),
                Err(err) => println!("Error: {err}"),
            },
            Input::Reject => {
                if session.reject() {
                    println!("Changes rejected.");
                } else {
                    println!("No pending edit.");
                }
            }
            Input::Undo => report_step(session.undo().await, "Undone.", "Nothing to undo."),
            Input::Redo => report_step(session.redo().await, "Redone.", "Nothing to redo."),
            Input::NewChat => {
                session.new_chat();
                println!("Started a new chat.");
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
            Input::Message("") => {}
            Input::Message(text) => send(&mut session, text).await,
        }
    }

    Ok(())
}

async fn send(session: &mut ChatSession, text: &str) {
    let mut printed = 0;
    let mut suppressed = false;
    let result = session
        .send_message(text, |update| match update {
            StreamUpdate::Render(full) => {
                print!("{}", &full[printed..]);
                let _ = std::io::stdout().flush();
                printed = full.len();
            }
            StreamUpdate::Suppress => {
                suppressed = true;
                println!();
                println!("Preparing changes for your review...");
            }
            StreamUpdate::Silent => {}
        })
        .await;
    println!();

    if let Ok(reply) = &result
        && let Some(text) = unrendered_text(reply, suppressed)
    {
        println!("{text}");
    }

    match result {
        Ok(ChatReply::Message(_)) => {}
        Ok(ChatReply::Proposed(edit)) => {
            println!("--- current ---\n{}", edit.old_text);
            println!("--- proposed ---\n{}", edit.new_text);
            println!("Type :accept or :reject.");
        }
        Ok(ChatReply::ToolFailed(err)) => println!("Function execution failed: {err}"),
        Err(err) => println!("Error: Failed to get response from the model. {err}"),
    }
}

/// A plain reply whose live rendering was cut off by a tool-call marker that
/// did not parse.
fn unrendered_text(reply: &ChatReply, suppressed: bool) -> Option<&str> {
    match reply {
        ChatReply::Message(text) if suppressed => Some(text),
        _ => None,
    }
}

fn report_step(result: quill_core::Result<bool>, moved: &str, idle: &str) {
    match result {
        Ok(true) => println!("{moved}"),
        Ok(false) => println!("{idle}"),
        Err(err) => println!("Error: {err}"),
    }
}
