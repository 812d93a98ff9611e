//! The advisory chat REPL: intake wizard, question loop and MCQ handling.

use anyhow::{Result, bail};
use colored::Colorize;
use rustyline::history::History;
use rustyline::{DefaultEditor, Editor, Helper};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use frigo_api::GeminiChat;
use frigo_application::ChatService;
use frigo_core::FrigoError;
use frigo_core::backend::StoredIntake;
use frigo_core::intake::{
    AnswerValue, InputKind, IntakeSubmission, IntakeWizard, StepAdvance, StepBack, UserChoice,
};
use frigo_core::task::ChatOutcome;

use crate::app::AppContext;
use crate::input::{parse_multi_selection, parse_selection, read_line, read_required};
use crate::repl::{COMMANDS, ChatEditor, chat_editor};

pub async fn run(ctx: &AppContext, session: Option<&str>, direct: bool) -> Result<()> {
    if direct {
        return run_direct(ctx).await;
    }

    if !ctx.auth.is_authenticated() {
        bail!("Not logged in. Run `frigo login` first.");
    }

    let mut editor = chat_editor()?;

    let mut service = match session {
        Some(session_id) => {
            let service = ctx.resume_chat(session_id).await?;
            println!(
                "Resumed session with {} messages.",
                service.conversation().messages.len()
            );
            for message in &service.conversation().messages {
                print_transcript_line(&message.message_text, message.sender);
            }
            service
        }
        None => {
            let Some((suggestions, session_id)) = intake_flow(ctx, &mut editor).await? else {
                return Ok(());
            };

            let mut service = ctx.new_chat();
            service.attach_session(&session_id);
            if !suggestions.is_empty() {
                println!("{}", "You could start with:".dimmed());
                for question in &suggestions {
                    println!("  {}", question.dimmed());
                }
            }
            service
        }
    };

    chat_loop(ctx, &mut service, &mut editor).await
}

/// Runs the role selection and intake wizard, submits the result and returns
/// the suggested questions and the opened session id.
async fn intake_flow(
    ctx: &AppContext,
    editor: &mut ChatEditor,
) -> Result<Option<(Vec<String>, String)>> {
    println!("{}", "Tell us about your situation.".bold());
    println!("  1. I already operate a cold storage");
    println!("  2. I plan to build one");

    let user_choice = loop {
        let Some(line) = read_required(editor, "> ")? else {
            return Ok(None);
        };
        match parse_selection(&line, 2) {
            Some(0) => break UserChoice::Existing,
            Some(1) => break UserChoice::Build,
            _ => println!("Enter 1 or 2."),
        }
    };

    let mut wizard = ctx.intake.start_wizard(user_choice);
    let Some(submission) = run_wizard(&mut wizard, editor)? else {
        return Ok(None);
    };

    // The wizard stays on its final step, so a failed submission can be
    // retried without re-entering answers.
    loop {
        match ctx.intake.submit(&submission).await {
            Ok(receipt) => {
                println!("{}", "Thanks! Your advisory session is ready.".green());
                return Ok(Some((receipt.suggested_questions, receipt.session_id)));
            }
            Err(err) => {
                warn!(error = %err, "Intake submission failed");
                println!("{}", format!("Submission failed: {}", err).red());
                let Some(answer) = read_required(editor, "Retry? [y/n] ")? else {
                    return Ok(None);
                };
                if !answer.eq_ignore_ascii_case("y") {
                    return Ok(None);
                }
            }
        }
    }
}

/// Walks the wizard step by step. `back` moves to the previous step; backing
/// out of the first step exits. Returns `None` when the user leaves.
fn run_wizard<H: Helper, I: History>(
    wizard: &mut IntakeWizard,
    editor: &mut Editor<H, I>,
) -> Result<Option<IntakeSubmission>> {
    loop {
        let field = wizard.current_field().clone();
        let options = wizard.current_options();

        println!();
        println!(
            "{} {}",
            format!("[{}/{}]", wizard.step_index() + 1, wizard.step_count()).dimmed(),
            field.question.bold()
        );
        if let Some(subtext) = field.subtext {
            println!("  {}", subtext.dimmed());
        }
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }
        if field.kind == InputKind::MultiSelect {
            println!("{}", "  (comma-separated, e.g. 1,3)".dimmed());
        }

        let Some(line) = read_required(editor, "> ")? else {
            return Ok(None);
        };

        if line.eq_ignore_ascii_case("back") {
            match wizard.back() {
                StepBack::Moved => continue,
                StepBack::Exited => return Ok(None),
            }
        }

        let answer = match field.kind {
            InputKind::Text => AnswerValue::Text(line),
            InputKind::SingleSelect => match parse_selection(&line, options.len()) {
                Some(index) => AnswerValue::Choice(options[index].clone()),
                None => {
                    println!("Pick one of the numbered options.");
                    continue;
                }
            },
            InputKind::MultiSelect => match parse_multi_selection(&line, options.len()) {
                Some(indices) => {
                    AnswerValue::MultiChoice(indices.iter().map(|&i| options[i].clone()).collect())
                }
                None => {
                    println!("Pick at least one of the numbered options.");
                    continue;
                }
            },
        };

        if let Err(err) = wizard.set_answer(answer) {
            println!("{}", err.to_string().red());
            continue;
        }

        match wizard.next() {
            StepAdvance::Invalid => println!("That answer is not valid here."),
            StepAdvance::Moved => {}
            StepAdvance::Completed(submission) => return Ok(Some(submission)),
        }
    }
}

async fn chat_loop(
    ctx: &AppContext,
    service: &mut ChatService,
    editor: &mut ChatEditor,
) -> Result<()> {
    println!(
        "{}",
        "Ask away. /help lists commands; Ctrl-C cancels a pending answer; Ctrl-D exits.".dimmed()
    );

    loop {
        if service.conversation().pending_mcq.is_some() {
            if !answer_pending_mcq(service, editor).await? {
                return Ok(());
            }
            continue;
        }

        if service.conversation().limit_reached {
            println!(
                "{}",
                "This session has reached its question limit.".yellow()
            );
            return Ok(());
        }

        let Some(question) = read_line(editor, "you> ")? else {
            return Ok(());
        };
        if question.is_empty() {
            continue;
        }

        if let Some(command) = question.strip_prefix('/') {
            if !handle_command(ctx, service, command).await? {
                return Ok(());
            }
            continue;
        }

        match submit_cancellable(service, &question).await {
            Ok(outcome) => print_outcome(service, &outcome),
            Err(FrigoError::Cancelled) => {
                println!("{}", "Cancelled.".yellow());
            }
            Err(err) => println!("{}", err.to_string().red()),
        }
    }
}

/// Executes a slash command. Returns false when the user asked to leave.
async fn handle_command(
    ctx: &AppContext,
    service: &mut ChatService,
    command: &str,
) -> Result<bool> {
    let (name, arg) = match command.split_once(' ') {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "help" => {
            for (cmd, help) in COMMANDS {
                println!("  {:<12} {}", cmd.bright_cyan(), help);
            }
        }
        "sessions" => super::sessions::list(ctx).await?,
        "rename" => {
            if arg.is_empty() {
                println!("Usage: /rename <title>");
            } else if let Some(session_id) = service.conversation().session_id.clone() {
                service.rename_session(&session_id, arg).await?;
                println!("{}", "Session renamed.".green());
            } else {
                println!("No session yet. Ask a question first.");
            }
        }
        "intake" => {
            if let Some(session_id) = service.conversation().session_id.clone() {
                match ctx.intake.session_intake(&session_id).await {
                    Ok(intake) => print_intake(&intake),
                    Err(err) => println!("{}", err.to_string().red()),
                }
            } else {
                println!("No session yet. Ask a question first.");
            }
        }
        "quit" => return Ok(false),
        _ => println!("Unknown command. /help lists the available ones."),
    }
    Ok(true)
}

fn print_intake(intake: &StoredIntake) {
    println!("{} {}", "Advisory path:".bold(), intake.user_choice);
    if let Some(answers) = intake.intake_data.as_object() {
        for (key, value) in answers {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Array(items) => items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                other => other.to_string(),
            };
            println!("  {}: {}", key, rendered);
        }
    }
    if !intake.is_active {
        println!("{}", "(this intake is no longer active)".dimmed());
    }
}

/// Prompts for the pending MCQ. Returns false when the user exits.
async fn answer_pending_mcq(service: &mut ChatService, editor: &mut ChatEditor) -> Result<bool> {
    let Some(mcq_id) = service.conversation().pending_mcq.clone() else {
        return Ok(true);
    };
    let Some(prompt) = service
        .conversation()
        .messages
        .iter()
        .find(|m| m.id == mcq_id)
        .and_then(|m| m.mcq_options.clone())
    else {
        return Ok(true);
    };

    println!("{}", prompt.question.bold());
    for (i, option) in prompt.options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }

    loop {
        let Some(line) = read_required(editor, "choice> ")? else {
            return Ok(false);
        };
        let Some(index) = parse_selection(&line, prompt.options.len()) else {
            println!("Pick one of the numbered options.");
            continue;
        };

        let option = prompt.options[index].clone();
        let cancel = CancellationToken::new();
        let watcher = ctrl_c_watcher(cancel.clone());
        let result = service.answer_mcq(&option, &cancel).await;
        watcher.abort();

        match result {
            Ok(outcome) => {
                print_outcome(service, &outcome);
                return Ok(true);
            }
            Err(FrigoError::Cancelled) => {
                println!("{}", "Cancelled.".yellow());
                return Ok(true);
            }
            Err(err) => {
                println!("{}", err.to_string().red());
                return Ok(true);
            }
        }
    }
}

async fn submit_cancellable(
    service: &mut ChatService,
    question: &str,
) -> frigo_core::Result<ChatOutcome> {
    let cancel = CancellationToken::new();
    let watcher = ctrl_c_watcher(cancel.clone());
    let result = service.ask(question, &cancel).await;
    watcher.abort();
    result
}

/// Cancels the token when Ctrl-C fires, so an in-flight poll stops cleanly.
fn ctrl_c_watcher(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    })
}

fn print_outcome(service: &ChatService, outcome: &ChatOutcome) {
    match outcome {
        ChatOutcome::Success(reply) => {
            println!("{}", reply.message.green());
            if !reply.suggestions.is_empty() {
                println!("{}", "You could ask next:".dimmed());
                for suggestion in &reply.suggestions {
                    println!("  {}", suggestion.dimmed());
                }
            }
            if let Some(remaining) = service.conversation().remaining_questions {
                println!("{}", format!("({} questions left today)", remaining).dimmed());
            }
        }
        ChatOutcome::Failure { message, .. } => {
            println!("{}", message.red());
        }
    }
}

fn print_transcript_line(text: &str, sender: frigo_core::chat::Sender) {
    match sender {
        frigo_core::chat::Sender::User => println!("{} {}", "you>".bold(), text),
        frigo_core::chat::Sender::Bot => println!("{}", text.green()),
    }
}

/// The direct variant: the intake primes a Gemini conversation with Google
/// Search grounding, and replies cite their web sources.
async fn run_direct(ctx: &AppContext) -> Result<()> {
    ctx.secrets.ensure_exists()?;
    let Some(gemini) = ctx.secrets.gemini()? else {
        bail!(
            "No Gemini API key configured. Add one to {}.",
            ctx.paths.secret_file().display()
        );
    };

    let mut editor = DefaultEditor::new()?;

    println!("{}", "Tell us about your situation.".bold());
    println!("  1. I already operate a cold storage");
    println!("  2. I plan to build one");
    let user_choice = loop {
        let Some(line) = read_required(&mut editor, "> ")? else {
            return Ok(());
        };
        match parse_selection(&line, 2) {
            Some(0) => break UserChoice::Existing,
            Some(1) => break UserChoice::Build,
            _ => println!("Enter 1 or 2."),
        }
    };

    let mut wizard = IntakeWizard::new(user_choice);
    let Some(submission) = run_wizard(&mut wizard, &mut editor)? else {
        return Ok(());
    };

    let mut chat = GeminiChat::new(gemini.api_key, gemini.model_name, &submission);
    println!("{}", "Connected to Gemini. Ctrl-D exits.".dimmed());

    loop {
        let Some(question) = read_line(&mut editor, "you> ")? else {
            return Ok(());
        };
        if question.is_empty() {
            continue;
        }

        match chat.send(&question).await {
            Ok(reply) => {
                println!("{}", reply.text.green());
                if !reply.sources.is_empty() {
                    println!("{}", "Sources:".dimmed());
                    for source in &reply.sources {
                        if source.title.is_empty() {
                            println!("  {}", source.uri.dimmed());
                        } else {
                            println!("  {} - {}", source.title.dimmed(), source.uri.dimmed());
                        }
                    }
                }
            }
            Err(err) => println!("{}", err.to_string().red()),
        }
    }
}
