//! Scripted restaurant receptionist
//!
//! Answers questions from the business profile, takes simple takeaway
//! orders and decides when the call is over.

use super::intent::{self, Intent, ItemMention};
use super::{AgentReply, AgentStateView, DialogueCollaborator, DialogueError, ENDED_MODE};
use crate::profile::BusinessProfile;
use async_trait::async_trait;

/// Consecutive unrecognised turns before the receptionist hangs up
const MAX_UNCLEAR_TURNS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Listening,
    Ordering,
    Confirming,
    Ended,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Mode::Listening => "listening",
            Mode::Ordering => "ordering",
            Mode::Confirming => "confirming",
            Mode::Ended => ENDED_MODE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OrderLine {
    item_id: String,
    quantity: u32,
}

/// Conversation state owned by the receptionist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceptionistState {
    mode: Mode,
    order: Vec<OrderLine>,
    unclear_turns: u32,
}

impl AgentStateView for ReceptionistState {
    fn mode(&self) -> &str {
        self.mode.as_str()
    }
}

impl ReceptionistState {
    fn add_items(&mut self, mentions: &[ItemMention<'_>]) {
        for mention in mentions {
            match self
                .order
                .iter_mut()
                .find(|line| line.item_id == mention.item.id)
            {
                Some(line) => line.quantity += mention.quantity,
                None => self.order.push(OrderLine {
                    item_id: mention.item.id.clone(),
                    quantity: mention.quantity,
                }),
            }
        }
    }
}

/// Collaborator that answers from the profile with scripted replies
#[derive(Debug, Default, Clone)]
pub struct Receptionist;

impl Receptionist {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DialogueCollaborator for Receptionist {
    type State = ReceptionistState;

    fn opening_line(&self, profile: &BusinessProfile) -> String {
        format!(
            "Thank you for calling {}! This is the automated assistant. How can I help you today?",
            profile.name
        )
    }

    fn initial_state(&self) -> ReceptionistState {
        ReceptionistState {
            mode: Mode::Listening,
            order: Vec::new(),
            unclear_turns: 0,
        }
    }

    async fn agent_reply(
        &self,
        utterance: &str,
        state: &ReceptionistState,
        profile: &BusinessProfile,
    ) -> Result<AgentReply<ReceptionistState>, DialogueError> {
        if state.mode == Mode::Ended {
            return Err(DialogueError::invalid_state("call has already ended"));
        }
        let mut next = state.clone();
        let replies = respond(utterance, &mut next, profile);
        tracing::debug!(
            mode = next.mode.as_str(),
            replies = replies.len(),
            order_lines = next.order.len(),
            "Receptionist replied"
        );
        Ok(AgentReply::new(replies, next))
    }
}

fn respond(utterance: &str, state: &mut ReceptionistState, profile: &BusinessProfile) -> Vec<String> {
    let intents = intent::detect(utterance);
    let mentions = intent::mentioned_items(utterance, profile);

    if intents.is_empty() && mentions.is_empty() {
        state.unclear_turns += 1;
        if state.unclear_turns >= MAX_UNCLEAR_TURNS {
            state.mode = Mode::Ended;
            return vec![format!(
                "I'm sorry, I'm having trouble understanding. Please call {} back any time. Goodbye!",
                profile.name
            )];
        }
        return vec![
            "Sorry, I didn't catch that. I can help with our opening hours, location, menu, allergens or takeaway orders."
                .to_string(),
        ];
    }
    state.unclear_turns = 0;

    let mut replies = Vec::new();
    let asks_about_items = intents
        .iter()
        .any(|i| matches!(i, Intent::Allergens | Intent::Price));
    let wants_order = intents.contains(&Intent::Order)
        || (!mentions.is_empty() && !asks_about_items && state.mode != Mode::Confirming);

    // Items go on the order first so "..., that's all" can confirm them
    if wants_order {
        replies.push(order_reply(&mentions, state, profile));
    }

    for intent in &intents {
        match intent {
            Intent::Greeting => {
                if intents.len() == 1 && mentions.is_empty() {
                    replies.push("Hello! What can I do for you?".to_string());
                }
            }
            Intent::Hours => replies.push(hours_reply(profile)),
            Intent::Location => {
                replies.push(or_unknown(&profile.address, |a| format!("You'll find us at {a}.")));
            }
            Intent::Phone => {
                replies.push(or_unknown(&profile.phone, |p| format!("Our phone number is {p}.")));
            }
            Intent::Menu => replies.push(menu_reply(profile)),
            Intent::Takeaway if !wants_order => replies.push(takeaway_reply(profile)),
            Intent::Allergens => replies.push(allergen_reply(&mentions)),
            Intent::Price => replies.push(price_reply(&mentions, profile)),
            Intent::Finish => replies.extend(finish_reply(state, profile)),
            Intent::Affirm if state.mode == Mode::Confirming => {
                replies.push(confirm_order(state, profile));
            }
            Intent::Deny if state.mode == Mode::Confirming => {
                state.order.clear();
                state.mode = Mode::Listening;
                replies.push("No problem, I've cancelled that order. Is there anything else I can help with?".to_string());
            }
            Intent::Deny if state.mode == Mode::Listening && intents.len() == 1 => {
                replies.push(farewell(profile));
                state.mode = Mode::Ended;
            }
            _ => {}
        }
    }

    if intents.contains(&Intent::Goodbye) && state.mode != Mode::Ended {
        if state.order.is_empty() {
            replies.push(farewell(profile));
        } else {
            replies.push(format!(
                "I haven't placed your unconfirmed order. {}",
                farewell(profile)
            ));
            state.order.clear();
        }
        state.mode = Mode::Ended;
    }

    if replies.is_empty() {
        replies.push("Is there anything else I can help you with?".to_string());
    }
    replies
}

fn or_unknown(value: &str, render: impl FnOnce(&str) -> String) -> String {
    if value.trim().is_empty() {
        "I'm afraid I don't have that information to hand.".to_string()
    } else {
        render(value.trim())
    }
}

fn hours_reply(profile: &BusinessProfile) -> String {
    let mut reply = or_unknown(&profile.opening_hours, |h| format!("We're open {h}."));
    if !profile.closed_days.trim().is_empty() {
        reply.push(' ');
        reply.push_str(profile.closed_days.trim());
    }
    reply
}

fn menu_reply(profile: &BusinessProfile) -> String {
    if profile.menu.is_empty() {
        return "Our menu is being updated at the moment.".to_string();
    }
    let lines: Vec<String> = profile
        .menu
        .iter()
        .map(|item| {
            let mut line = format!("- {} ({})", item.name, profile.format_price(item.price_cents));
            if !item.description.is_empty() {
                line.push_str(": ");
                line.push_str(&item.description);
            }
            line
        })
        .collect();
    format!("Here's what we serve:\n{}", lines.join("\n"))
}

fn takeaway_reply(profile: &BusinessProfile) -> String {
    if profile.takeaway_available {
        let mut reply = "Yes, we do takeaway.".to_string();
        if !profile.fulfillment_notes.trim().is_empty() {
            reply.push(' ');
            reply.push_str(profile.fulfillment_notes.trim());
        }
        reply
    } else {
        "Sorry, we don't offer takeaway at the moment.".to_string()
    }
}

fn allergen_reply(mentions: &[ItemMention<'_>]) -> String {
    if mentions.is_empty() {
        return "Which dish would you like allergen information for?".to_string();
    }
    mentions
        .iter()
        .map(|m| {
            if m.item.allergen_note.trim().is_empty() {
                format!("I don't have allergen details for the {}; please ask staff when you arrive.", m.item.name)
            } else {
                format!("The {}: {}", m.item.name, m.item.allergen_note.trim())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn price_reply(mentions: &[ItemMention<'_>], profile: &BusinessProfile) -> String {
    if mentions.is_empty() {
        return "Which dish would you like the price of?".to_string();
    }
    mentions
        .iter()
        .map(|m| format!("The {} is {}.", m.item.name, profile.format_price(m.item.price_cents)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn order_reply(mentions: &[ItemMention<'_>], state: &mut ReceptionistState, profile: &BusinessProfile) -> String {
    if !profile.takeaway_available {
        return "Sorry, we can't take orders over the phone because takeaway isn't available at the moment.".to_string();
    }
    if mentions.is_empty() {
        state.mode = Mode::Ordering;
        return "Of course. What would you like to order?".to_string();
    }
    state.add_items(mentions);
    state.mode = Mode::Ordering;
    let added: Vec<String> = mentions
        .iter()
        .map(|m| format!("{} x {}", m.quantity, m.item.name))
        .collect();
    format!("I've added {} to your order. Anything else?", added.join(" and "))
}

fn finish_reply(state: &mut ReceptionistState, profile: &BusinessProfile) -> Option<String> {
    match state.mode {
        Mode::Ordering if !state.order.is_empty() => {
            state.mode = Mode::Confirming;
            Some(format!(
                "So that's {}. Shall I confirm the order?",
                order_summary(state, profile)
            ))
        }
        Mode::Ordering => {
            state.mode = Mode::Listening;
            Some("Alright, no order then. Is there anything else I can help with?".to_string())
        }
        Mode::Listening => {
            state.mode = Mode::Ended;
            Some(farewell(profile))
        }
        Mode::Confirming | Mode::Ended => None,
    }
}

fn confirm_order(state: &mut ReceptionistState, profile: &BusinessProfile) -> String {
    let summary = order_summary(state, profile);
    state.order.clear();
    state.mode = Mode::Listening;
    let mut reply = format!("Your order of {summary} is confirmed.");
    if !profile.fulfillment_notes.trim().is_empty() {
        reply.push(' ');
        reply.push_str(profile.fulfillment_notes.trim());
    }
    reply.push_str(" Is there anything else I can help with?");
    reply
}

fn order_summary(state: &ReceptionistState, profile: &BusinessProfile) -> String {
    let mut total: u32 = 0;
    let lines: Vec<String> = state
        .order
        .iter()
        .filter_map(|line| {
            let item = profile.menu_item(&line.item_id)?;
            total = total.saturating_add(item.price_cents.saturating_mul(line.quantity));
            Some(format!("{} x {}", line.quantity, item.name))
        })
        .collect();
    format!("{}, for a total of {}", lines.join(", "), profile.format_price(total))
}

fn farewell(profile: &BusinessProfile) -> String {
    format!("Thanks for calling {}, goodbye!", profile.name)
}
