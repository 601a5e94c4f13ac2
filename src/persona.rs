//! Persona assembly on top of a finished harvest.
//!
//! The language model is an external collaborator behind [`Summarizer`];
//! this module only builds prompts and splits replies into statements.

use crate::results::Harvest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on statements kept per dimension
pub const MAX_STATEMENTS: usize = 10;

/// Generic message shown to end users when persona building fails
pub const GENERIC_ERROR: &str = "An error occurred while building the persona";

/// One axis of the persona
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Goals,
    Frustrations,
    Interests,
    Motivations,
    Fears,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Goals,
        Dimension::Frustrations,
        Dimension::Interests,
        Dimension::Motivations,
        Dimension::Fears,
    ];

    pub fn question(self) -> &'static str {
        match self {
            Dimension::Goals => {
                "Give me a list of the goals and aspirations of the user based on the posts and comments."
            }
            Dimension::Frustrations => {
                "Give me a list of the frustrations and challenges of the user based on the posts and comments."
            }
            Dimension::Interests => {
                "Give me a list of the interests and hobbies of the user based on the posts and comments."
            }
            Dimension::Motivations => {
                "Give me a list of the motivations along with the percentage of motivations of the user based on the posts and comments."
            }
            Dimension::Fears => {
                "Give me a list of the fears and concerns of the user based on the posts and comments."
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("summarizer failed: {0}")]
    Summarizer(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// External language model. Takes a prompt, returns plain text.
#[allow(async_fn_in_trait)]
pub trait Summarizer {
    async fn summarize(
        &self,
        prompt: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// What the presentation layer renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub goals: Vec<String>,
    pub frustrations: Vec<String>,
    pub interests: Vec<String>,
    pub motivations: Vec<String>,
    pub fears: Vec<String>,
}

impl Persona {
    fn slot(&mut self, dimension: Dimension) -> &mut Vec<String> {
        match dimension {
            Dimension::Goals => &mut self.goals,
            Dimension::Frustrations => &mut self.frustrations,
            Dimension::Interests => &mut self.interests,
            Dimension::Motivations => &mut self.motivations,
            Dimension::Fears => &mut self.fears,
        }
    }
}

/// Full prompt for one question, with the serialized records embedded
pub fn build_prompt(harvest: &Harvest, question: &str) -> Result<String, PersonaError> {
    let posts = harvest.posts_json()?;
    let comments = harvest.comments_json()?;
    Ok(format!(
        "You are a helpful assistant, your task is first to study the following text \
and then answer the question based on the text.
The text is the posts and comments of one user of Reddit, as JSON arrays of objects.
Each object contains the fields of a post or comment.
If the value of a field is Unknown it means that the field is not available.

Posts:
{posts}

Comments:
{comments}

{question}
Return the response as a list, one element per line, without any explanation or additional text.
Each element should be a single behavior or habit of the user, one or two lines at most.
Do not include numbers or bullet points.
Give at most {MAX_STATEMENTS} elements."
    ))
}

/// Splits a summarizer reply into trimmed, non-empty statements
pub fn parse_statements(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_STATEMENTS)
        .map(str::to_string)
        .collect()
}

/// Asks the summarizer one question per dimension
pub async fn build_persona<S: Summarizer>(
    summarizer: &S,
    harvest: &Harvest,
) -> Result<Persona, PersonaError> {
    let mut persona = Persona::default();
    for dimension in Dimension::ALL {
        let prompt = build_prompt(harvest, dimension.question())?;
        ::log::debug!("Asking summarizer about {:?}", dimension);
        let reply = summarizer
            .summarize(&prompt)
            .await
            .map_err(PersonaError::Summarizer)?;
        *persona.slot(dimension) = parse_statements(&reply);
    }
    Ok(persona)
}

/// Renders a persona for display, or a single generic error message
pub fn present<E: std::fmt::Display>(result: Result<Persona, E>) -> String {
    match result.map(|persona| serde_json::to_string_pretty(&persona)) {
        Ok(Ok(json)) => json,
        Ok(Err(e)) => {
            ::log::error!("Failed to render persona: {}", e);
            GENERIC_ERROR.to_string()
        }
        Err(e) => {
            ::log::error!("Failed to build persona: {}", e);
            GENERIC_ERROR.to_string()
        }
    }
}
