//! Prompt construction and response parsing for school recommendations.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::RecommendError;
use crate::form::ProfileField;

use super::catalog::SchoolCatalog;
use super::model::{School, UserProfile};

/// Placeholder for fields the student left blank.
const UNSPECIFIED: &str = "(sin especificar)";

/// Build the system prompt for the recommender.
pub fn recommendation_system_prompt(max_results: usize, catalog: Option<&SchoolCatalog>) -> String {
    let mut prompt = format!(
        "Sos un orientador vocacional que ayuda a estudiantes a elegir una escuela. \
         A partir del perfil del estudiante, recomendá hasta {max_results} escuelas.\n\n\
         Reglas:\n\
         - Tené en cuenta la edad y el nivel educativo actual\n\
         - Priorizá escuelas cercanas al barrio o accesibles con las líneas de colectivo indicadas\n\
         - Relacioná las especialidades con las habilidades y los gustos del estudiante\n\
         - Evitá orientaciones vinculadas a lo que no le gusta\n\
         - Escribí en español, en un tono cercano\n\n\
         Respondé con un array JSON de objetos, cada uno con:\n\
         - \"name\": nombre de la escuela\n\
         - \"description\": breve descripción de la escuela\n\
         - \"reason\": por qué encaja con este estudiante\n\
         - \"specialties\": array de especialidades u orientaciones\n\n\
         Si ninguna escuela encaja, respondé con un array vacío: []\n\n\
         SOLO respondé con el array JSON. Nada más."
    );

    if let Some(catalog) = catalog.filter(|c| !c.is_empty()) {
        prompt.push_str(
            "\n\nElegí únicamente entre las siguientes escuelas y usá sus nombres tal cual:\n",
        );
        prompt.push_str(&catalog.to_prompt_section());
    }

    prompt
}

/// Render the profile as the user message.
pub fn recommendation_user_prompt(profile: &UserProfile) -> String {
    let mut lines = vec!["Perfil del estudiante:".to_string()];
    for field in ProfileField::ALL {
        let value = field.value_in(profile).trim();
        let value = if value.is_empty() { UNSPECIFIED } else { value };
        lines.push(format!("- {}: {}", field.label(), value));
    }
    lines.join("\n")
}

/// Accepted shapes of the model's answer.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecommendationPayload {
    List(Vec<School>),
    Wrapped { schools: Vec<School> },
}

/// Parse the model's answer into schools.
///
/// Unparseable output is an error, never an empty list: an empty list means
/// the model found no match.
pub fn parse_schools(llm_response: &str, max_results: usize) -> Result<Vec<School>, RecommendError> {
    let json_str = extract_json(llm_response);

    let payload: RecommendationPayload =
        serde_json::from_str(json_str).map_err(|e| RecommendError::MalformedResponse {
            reason: e.to_string(),
        })?;

    let schools = match payload {
        RecommendationPayload::List(schools) => schools,
        RecommendationPayload::Wrapped { schools } => schools,
    };

    let total = schools.len();
    let schools: Vec<School> = schools
        .into_iter()
        .filter(|s| !s.name.trim().is_empty())
        .take(max_results)
        .collect();

    if schools.len() < total {
        debug!(
            received = total,
            kept = schools.len(),
            "Dropped unnamed or surplus recommendations"
        );
    }

    Ok(schools)
}

/// Extract the JSON payload from LLM output that might contain markdown or
/// extra text.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return trimmed;
    }

    // Wrapped in markdown code block
    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('[') || inner.starts_with('{') {
                return inner;
            }
        }
    }

    // Try to find array bounds
    if let (Some(start), Some(end)) = (trimmed.find('['), trimmed.rfind(']')) {
        if end > start {
            return &trimmed[start..=end];
        }
    }

    warn!(text = trimmed, "Could not locate JSON in LLM response");
    trimmed
}
