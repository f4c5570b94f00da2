//! Line-oriented terminal front-end.
//!
//! Stands in for the app's screens: onboarding, coach list, coach detail,
//! chat, custom coach form, profile and paywall.

use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};

use pocket_shared::catalog::categories;
use pocket_shared::constants::{APP_NAME, FREE_DAILY_MESSAGES};
use pocket_shared::{CoachCategory, CoachDraft, OnboardingState};

use crate::commands::chat::{QuickPrompt, SendOutcome};
use crate::error::{ClientError, PurchaseError};
use crate::state::AppState;

const HELP: &str = "\
Commands:
  /coaches [category] list coaches, optionally one category
  /use <coach-id>     open a chat with a coach
  /quick <1-4>        send a quick prompt (1 Summarize, 2 Next step, 3 Make it smaller, 4 One question)
  /history            show the current transcript
  /new                create a custom coach
  /profile            edit your profile
  /paywall            show Pro packages
  /buy <package-id>   buy a package
  /restore            restore purchases
  /status             show plan and today's usage
  /help               show this help
  /quit               exit
Anything else is sent to the current coach.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Coaches(Option<CoachCategory>),
    Use(String),
    Quick(QuickPrompt),
    History,
    New,
    Profile,
    Paywall,
    Buy(String),
    Restore,
    Status,
    Help,
    Quit,
    Say(String),
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Say(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match (name, arg) {
            ("coaches", "") => Command::Coaches(None),
            ("coaches", key) => match key.parse::<CoachCategory>() {
                Ok(category) => Command::Coaches(Some(category)),
                Err(e) => Command::Invalid(format!("{e}; pick one of: {}", category_keys())),
            },
            ("use", id) if !id.is_empty() => Command::Use(id.to_string()),
            ("quick", n) => match n.parse::<usize>() {
                Ok(n) if (1..=QuickPrompt::ALL.len()).contains(&n) => {
                    Command::Quick(QuickPrompt::ALL[n - 1])
                }
                _ => Command::Invalid("usage: /quick <1-4>".into()),
            },
            ("history", _) => Command::History,
            ("new", _) => Command::New,
            ("profile", _) => Command::Profile,
            ("paywall", _) => Command::Paywall,
            ("buy", id) if !id.is_empty() => Command::Buy(id.to_string()),
            ("restore", _) => Command::Restore,
            ("status", _) => Command::Status,
            ("help", _) => Command::Help,
            ("quit" | "exit", _) => Command::Quit,
            ("use", _) => Command::Invalid("usage: /use <coach-id>".into()),
            ("buy", _) => Command::Invalid("usage: /buy <package-id>".into()),
            _ => Command::Invalid(format!("unknown command /{name}, try /help")),
        }
    }
}

struct Input {
    lines: Lines<BufReader<Stdin>>,
}

impl Input {
    /// `None` at end of input.
    async fn ask(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        println!("{label}");
        Ok(self.lines.next_line().await?)
    }
}

/// Run the interactive loop until `/quit` or end of input.
pub async fn run(state: &mut AppState) -> anyhow::Result<()> {
    let mut input = Input {
        lines: BufReader::new(io::stdin()).lines(),
    };

    println!("Welcome to {APP_NAME}.");
    if state.onboarding() == OnboardingState::NotDone && !onboard(state, &mut input).await? {
        return Ok(());
    }

    println!("{HELP}");
    let mut current: Option<String> = None;

    loop {
        let prompt = match &current {
            Some(id) => format!("[{id}]>"),
            None => ">".to_string(),
        };
        let Some(line) = input.ask(&prompt).await? else {
            break;
        };

        match Command::parse(&line) {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Invalid(message) => println!("{message}"),
            Command::Coaches(category) => list_coaches(state, category),
            Command::Use(id) => match state.start_chat(&id) {
                Ok(true) => {
                    if let Ok(view) = state.view_coach(&id) {
                        println!("{}: {}", view.coach.name, view.coach.long_description);
                        for prompt in view.coach.starter_prompts.iter().take(3) {
                            println!("  try: {prompt}");
                        }
                    }
                    current = Some(id);
                }
                Ok(false) => println!("That coach is part of Pro. See /paywall."),
                Err(e) => println!("{e}"),
            },
            Command::History => match current.as_deref().and_then(|id| state.chat_session(id)) {
                Some(session) => {
                    for m in &session.messages {
                        println!("{:>9}: {}", m.role.as_str(), m.content);
                    }
                }
                None => println!("No messages yet."),
            },
            Command::Quick(prompt) => match &current {
                Some(id) => {
                    let id = id.clone();
                    let outcome = state.send_quick_prompt(&id, prompt).await;
                    report(state, outcome);
                }
                None => println!("Pick a coach first with /use <coach-id>."),
            },
            Command::Say(text) => match &current {
                Some(id) => {
                    let id = id.clone();
                    let outcome = state.send_message(&id, &text).await;
                    report(state, outcome);
                }
                None if text.is_empty() => {}
                None => println!("Pick a coach first with /use <coach-id>."),
            },
            Command::New => {
                if let Some(draft) = coach_form(&mut input).await? {
                    match state.create_custom_coach(draft).await {
                        Ok(coach) => println!("Created {} ({}).", coach.name, coach.id),
                        Err(e) => println!("{e}"),
                    }
                }
            }
            Command::Profile => {
                if !profile_form(state, &mut input).await? {
                    break;
                }
            }
            Command::Paywall => match state.load_paywall().await {
                Ok(packages) if packages.is_empty() => println!("No packages on offer."),
                Ok(packages) => {
                    for p in packages {
                        println!("  {}  {}  {}", p.identifier, p.product_title, p.price_string);
                    }
                }
                Err(e) => println!("Purchases unavailable: {e}"),
            },
            Command::Buy(id) => match state.purchase(&id).await {
                Ok(true) => println!("You're Pro. Enjoy every coach."),
                Ok(false) => println!("Purchase finished but Pro is not active yet."),
                Err(ClientError::Purchase(PurchaseError::Cancelled)) => println!("Purchase cancelled."),
                Err(e) => println!("Purchase failed: {e}"),
            },
            Command::Restore => match state.restore_purchases().await {
                Ok(true) => println!("Pro restored."),
                Ok(false) => println!("No active Pro subscription found."),
                Err(e) => println!("Restore failed: {e}"),
            },
            Command::Status => {
                if let Err(e) = state.refresh_daily_count().await {
                    println!("{e}");
                }
                if state.is_pro() {
                    println!("Plan: Pro (unlimited messages)");
                } else {
                    println!(
                        "Plan: Free ({}/{} messages today)",
                        state.daily_message_count(),
                        FREE_DAILY_MESSAGES
                    );
                }
            }
        }
    }

    println!("Bye.");
    Ok(())
}

fn report(state: &AppState, outcome: Result<SendOutcome, ClientError>) {
    match outcome {
        Ok(SendOutcome::Ignored) => {}
        Ok(SendOutcome::Blocked) => println!(
            "You've used your {FREE_DAILY_MESSAGES} free messages today. See /paywall."
        ),
        Ok(SendOutcome::Delivered(reply)) | Ok(SendOutcome::Failed(reply)) => {
            println!("coach: {}", reply.content);
            if !state.is_pro() {
                println!(
                    "({}/{} free messages used today)",
                    state.daily_message_count(),
                    FREE_DAILY_MESSAGES
                );
            }
        }
        Err(e) => println!("{e}"),
    }
}

fn category_keys() -> String {
    categories().map(|(key, _)| key).collect::<Vec<_>>().join(", ")
}

fn list_coaches(state: &AppState, category: Option<CoachCategory>) {
    let chips: Vec<_> = categories().map(|(_, label)| label).collect();
    println!("All | {}", chips.join(" | "));

    let coaches: Vec<_> = state
        .all_coaches()
        .into_iter()
        .filter(|c| category.map_or(true, |wanted| c.category == wanted))
        .collect();
    if coaches.is_empty() {
        println!("  No coaches in this category yet.");
    }

    for coach in coaches {
        let badge = if state.needs_pro(&coach) {
            " [Pro]"
        } else if coach.is_custom {
            " [Custom]"
        } else {
            ""
        };
        println!(
            "  {:<22} {:<20} {}{badge}",
            coach.id,
            coach.category.label(),
            coach.tagline
        );
    }
}

/// Returns `false` when input ended before onboarding finished.
async fn onboard(state: &mut AppState, input: &mut Input) -> anyhow::Result<bool> {
    println!("Pick a coach, talk it through, leave with a next step.");
    println!("Tell us a little about yourself. Leave any answer blank to skip.");
    if !profile_form(state, input).await? {
        return Ok(false);
    }
    state.complete_onboarding().await?;
    Ok(true)
}

/// Returns `false` when input ended mid-form.
async fn profile_form(state: &mut AppState, input: &mut Input) -> anyhow::Result<bool> {
    let Some(values) = input.ask("What do you value most?").await? else {
        return Ok(false);
    };
    let Some(goals) = input.ask("What are you working towards?").await? else {
        return Ok(false);
    };
    let Some(constraints) = input.ask("Anything that limits you right now?").await? else {
        return Ok(false);
    };

    if [&values, &goals, &constraints].iter().any(|v| !v.trim().is_empty()) {
        state.save_profile(&values, &goals, &constraints).await?;
        println!("Profile saved.");
    }
    Ok(true)
}

async fn coach_form(input: &mut Input) -> anyhow::Result<Option<CoachDraft>> {
    let Some(name) = input.ask("Coach name:").await? else {
        return Ok(None);
    };
    let Some(tone) = input.ask("Tone (e.g. warm, blunt):").await? else {
        return Ok(None);
    };
    let Some(purpose) = input.ask("What should this coach help with?").await? else {
        return Ok(None);
    };
    let Some(rules) = input.ask("Style rules, separated by ';':").await? else {
        return Ok(None);
    };

    Ok(Some(CoachDraft {
        name,
        tone,
        purpose,
        rules: rules.replace(';', "\n"),
    }))
}
