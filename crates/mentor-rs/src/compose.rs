//! Prompt templates.
//!
//! One template shape per [`ConversationType`]:
//!
//! - **Question** embeds the full persona and the student's words verbatim.
//! - **Greeting** reuses the question template with a fixed
//!   "introduce yourself" request, prefixed by what the student said.
//! - **Farewell** is a short persona-specific template with an example tone;
//!   personas without a tailored farewell get the generic one.
//!
//! Length and formatting limits in the text are instructions to the model.
//! The composer does not enforce them.

use crate::classify::ConversationType;
use crate::persona::{MentorKind, Persona};

/// Fixed request substituted for the student's words on a greeting.
pub const GREETING_INSTRUCTION: &str =
    "Please introduce yourself and ask how you can help me today.";

/// Inputs for one prompt render.
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub persona: &'a Persona,
    pub message: &'a str,
    pub conversation_type: ConversationType,
}

impl<'a> PromptRequest<'a> {
    pub fn new(persona: &'a Persona, message: &'a str, conversation_type: ConversationType) -> Self {
        Self {
            persona,
            message,
            conversation_type,
        }
    }

    pub fn render(&self) -> String {
        compose(self.persona, self.message, self.conversation_type)
    }
}

/// Render the prompt for `message` addressed to `persona`.
pub fn compose(persona: &Persona, message: &str, conversation_type: ConversationType) -> String {
    match conversation_type {
        ConversationType::Question => question_prompt(persona, message),
        ConversationType::Greeting => greeting_prompt(persona, message),
        ConversationType::Farewell => farewell_prompt(persona, message),
    }
}

/// The in-character answer template.
pub fn question_prompt(persona: &Persona, question: &str) -> String {
    format!(
        "You are {name}, a wise mentor and guide.\n\
         Age: {age}\n\
         Your characteristics: {characteristics}\n\
         Your knowledge and experience: {memory}\n\n\
         Your teaching approach: {motive}\n\n\
         Adjust your response style based on these triggers: {trigger}\n\n\
         A student asks: \"{question}\"\n\n\
         Respond directly as {name} with wisdom and guidance. \
         Keep your response conversational and natural (maximum 4 lines). \
         Do not use any formatting like 'Q:' or 'A:' - just speak directly to the student.",
        name = persona.name,
        age = persona.age,
        characteristics = persona.characteristics,
        memory = persona.memory,
        motive = persona.motive,
        trigger = persona.trigger,
    )
}

fn greeting_prompt(persona: &Persona, greeting: &str) -> String {
    format!(
        "The student greets you with: \"{greeting}\"\n\n{}",
        question_prompt(persona, GREETING_INSTRUCTION)
    )
}

/// Per-persona farewell flavor: how the mentor is addressed, the adjective
/// for the farewell, what the goodbye should offer, and an example tone.
struct FarewellStyle {
    addressed_as: &'static str,
    adjective: &'static str,
    acknowledge: &'static str,
    offer: &'static str,
    nature: &'static str,
    register: &'static str,
    example: &'static str,
}

fn farewell_style(kind: MentorKind) -> Option<FarewellStyle> {
    match kind {
        MentorKind::Musashi => Some(FarewellStyle {
            addressed_as: "Miyamoto Musashi",
            adjective: "wise",
            acknowledge: "Acknowledges their departure respectfully",
            offer: "Offers a final piece of wisdom or encouragement",
            nature: "Stays true to Musashi's disciplined, philosophical nature",
            register: "Is warm but concise",
            example: "Until we meet again on the path of mastery. Remember, true strength comes \
                from within. Walk forward with purpose.",
        }),
        MentorKind::Rumi => Some(FarewellStyle {
            addressed_as: "Rumi",
            adjective: "heartfelt",
            acknowledge: "Acknowledges their departure with love",
            offer: "Offers blessing or spiritual encouragement",
            nature: "Stays true to Rumi's mystical, compassionate nature",
            register: "Is warm and poetic but concise",
            example: "May love light your path, dear soul. Until our hearts meet again in the \
                garden of wisdom. Go with peace.",
        }),
        MentorKind::Chanakya => Some(FarewellStyle {
            addressed_as: "Chanakya",
            adjective: "strategic",
            acknowledge: "Acknowledges their departure with respect",
            offer: "Offers practical final wisdom",
            nature: "Stays true to Chanakya's authoritative, pragmatic nature",
            register: "Is respectful but concise",
            example: "Go forth with the wisdom we have shared. Apply these principles with \
                discipline and you shall prosper. Until we speak again.",
        }),
        MentorKind::Custom => None,
    }
}

fn farewell_prompt(persona: &Persona, farewell: &str) -> String {
    match farewell_style(persona.kind) {
        Some(style) => format!(
            "You are {}. The student is saying goodbye: \"{farewell}\"\n\n\
             Respond with a brief, {} farewell that:\n\
             - {}\n\
             - {}\n\
             - {}\n\
             - {} (2-3 sentences maximum)\n\n\
             Example tone: \"{}\"",
            style.addressed_as,
            style.adjective,
            style.acknowledge,
            style.offer,
            style.nature,
            style.register,
            style.example,
        ),
        None => format!(
            "You are {name}, a wise mentor and guide. The student is saying goodbye: \"{farewell}\"\n\n\
             Respond with a brief, warm farewell that:\n\
             - Acknowledges their departure respectfully\n\
             - Offers a final piece of encouragement\n\
             - Stays true to {name}'s character: {characteristics}\n\
             - Is concise (2-3 sentences maximum)",
            name = persona.name,
            characteristics = persona.characteristics,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::get_persona;

    fn seneca() -> Persona {
        Persona::custom(
            "Seneca",
            64,
            "stoic, measured",
            "advisor to Nero",
            "teach tranquility",
            "none",
        )
    }

    #[test]
    fn question_embeds_persona_and_message() {
        let p = get_persona(0).unwrap();
        let prompt = compose(p, "What should I do about fear?", ConversationType::Question);
        assert!(prompt.starts_with("You are Miyamoto Musashi, a wise mentor and guide."));
        assert!(prompt.contains("Age: 60"));
        assert!(prompt.contains(&p.memory));
        assert!(prompt.contains(&p.trigger));
        assert!(prompt.contains("A student asks: \"What should I do about fear?\""));
        assert!(prompt.contains("maximum 4 lines"));
    }

    #[test]
    fn greeting_substitutes_introduction_request() {
        let p = get_persona(1).unwrap();
        let prompt = compose(p, "hi there", ConversationType::Greeting);
        assert!(prompt.starts_with("The student greets you with: \"hi there\""));
        assert!(prompt.contains(&format!("A student asks: \"{GREETING_INSTRUCTION}\"")));
        assert!(!prompt.contains("A student asks: \"hi there\""));
    }

    #[test]
    fn farewell_is_persona_specific() {
        let rumi = compose(get_persona(1).unwrap(), "bye", ConversationType::Farewell);
        assert!(rumi.starts_with("You are Rumi."));
        assert!(rumi.contains("garden of wisdom"));

        let chanakya = compose(get_persona(2).unwrap(), "bye", ConversationType::Farewell);
        assert!(chanakya.contains("brief, strategic farewell"));
        assert!(chanakya.contains("2-3 sentences maximum"));
    }

    #[test]
    fn farewell_for_unknown_persona_uses_generic_template() {
        let prompt = compose(&seneca(), "farewell", ConversationType::Farewell);
        assert!(prompt.starts_with("You are Seneca, a wise mentor and guide."));
        assert!(prompt.contains("stoic, measured"));
        assert!(!prompt.contains("Example tone"));
    }

    #[test]
    fn prompts_are_never_empty() {
        let personas = [get_persona(0).unwrap().clone(), seneca()];
        for p in &personas {
            for kind in [
                ConversationType::Greeting,
                ConversationType::Farewell,
                ConversationType::Question,
            ] {
                assert!(!compose(p, "", kind).trim().is_empty());
            }
        }
    }

    #[test]
    fn prompt_request_renders_same_as_compose() {
        let p = get_persona(2).unwrap();
        let req = PromptRequest::new(p, "How do I plan?", ConversationType::Question);
        assert_eq!(req.render(), compose(p, "How do I plan?", ConversationType::Question));
    }
}
