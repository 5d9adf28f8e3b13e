//! Prompt composition from the current widget selections.

use crate::study::catalog::{Domain, StudyMode, EXAM_NAME};
use serde::{Deserialize, Serialize};

/// Everything the user has picked on the page that shapes a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySelection {
    pub mode: StudyMode,
    pub domain: Domain,
    /// Only consulted in [`StudyMode::ServiceDeepDive`].
    pub service: String,
}

impl Default for StudySelection {
    fn default() -> Self {
        Self {
            mode: StudyMode::default(),
            domain: Domain::default(),
            service: crate::study::catalog::AWS_SERVICES[0].to_string(),
        }
    }
}

/// Build the system instruction sent ahead of the transcript.
pub fn system_instructions(user_name: &str, selection: &StudySelection) -> String {
    let domains = Domain::ALL.iter().map(|d| d.name()).collect::<Vec<_>>().join(", ");

    let mut instructions = format!(
        "You are an AWS Certification expert, specifically for the {exam} exam. \
Your role is to help {user_name} prepare for their exam by providing comprehensive information, \
asking relevant questions, and offering explanations across all exam domains.

Your knowledge spans:
{domains}

The student is currently focusing on the {domain} domain.

For each domain, you should be able to:
1. Provide detailed explanations of key concepts
2. Ask challenging questions that mimic the style and difficulty of SAA-C03 exam
3. Offer mnemonics and memory aids to help students retain information
4. Explain complex processes step-by-step
5. Highlight common misconceptions and how to avoid them
6. Discuss real-world applications of the knowledge
7. Create flashcards with concise questions on the front and detailed answers on the back

When interacting:
- Tailor your responses to the student's level of understanding
- Use clear, concise language while maintaining technical accuracy
- Encourage critical thinking by asking follow-up questions
- Provide positive reinforcement and motivation
- Offer study strategies and time management tips for SAA-C03 exam preparation

Current study mode: {mode}
",
        exam = EXAM_NAME,
        domain = selection.domain,
        mode = selection.mode,
    );

    if selection.mode.uses_service() {
        instructions.push_str(&format!(
            "\nThe student wants to deep dive into the {} service. Provide comprehensive \
information about its features, use cases, and how it relates to the SAA-C03 exam.",
            selection.service
        ));
    }

    instructions
}

/// User-role prompt behind a mode's generate button, if the mode has one.
pub fn action_prompt(mode: StudyMode, domain: Domain) -> Option<String> {
    match mode {
        StudyMode::QuickQuiz => Some(format!(
            "Generate a multiple-choice question related to the {domain} domain for the {EXAM_NAME} exam. \
Provide 4 options and indicate the correct answer."
        )),
        StudyMode::PracticeQuestion => Some(format!(
            "Generate a scenario-based question related to the {domain} domain for the {EXAM_NAME} exam. \
The question should mimic the actual exam style. Provide a detailed explanation of the correct answer \
and why the other options are incorrect."
        )),
        StudyMode::Flashcards => Some(format!(
            "Create a flashcard for a key concept in the {domain} domain. \
Provide a concise question for the front of the card and a detailed explanation for the back."
        )),
        StudyMode::ConceptExplanation | StudyMode::ServiceDeepDive => None,
    }
}

/// Free-text chat entry, attributed to the student.
pub fn chat_prompt(user_name: &str, text: &str) -> String {
    format!("{}: {}", user_name, text)
}

/// Placeholder shown in the chat box.
pub fn chat_placeholder(domain: Domain) -> String {
    format!("Ask a question about {}:", domain)
}
