use super::{scaled_hours, RecommendationBuilder, RecommendationGenerator};
use crate::config::AnalyzerConfig;
use crate::core::{AnalysisResult, ClassDefinition, Priority, Recommendation, RecommendationType};
use crate::errors::AnalysisError;

pub struct SecurityRecommendations;

const CREDENTIAL_MARKERS: &[&str] = &[
    "password",
    "secret",
    "apikey",
    "api_key",
    "token",
    "privatekey",
];

const BINARY_FORMATTER_NAMESPACE: &str = "System.Runtime.Serialization.Formatters.Binary";

fn looks_like_credential(field_name: &str) -> bool {
    let lower = field_name.to_ascii_lowercase();
    CREDENTIAL_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn uses_binary_formatter(class: &ClassDefinition) -> bool {
    class.usings.iter().any(|u| u == BINARY_FORMATTER_NAMESPACE)
        || class.fields.iter().any(|f| f.type_name.ends_with("BinaryFormatter"))
}

impl RecommendationGenerator for SecurityRecommendations {
    fn recommendation_type(&self) -> RecommendationType {
        RecommendationType::Security
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        _config: &AnalyzerConfig,
    ) -> Result<Vec<Recommendation>, AnalysisError> {
        let Some(scripts) = &result.scripts else {
            return Ok(Vec::new());
        };
        let mut items = Vec::new();

        let hardcoded: Vec<String> = scripts
            .classes
            .iter()
            .flat_map(|class| {
                class
                    .fields
                    .iter()
                    .filter(|f| f.has_literal_initializer && looks_like_credential(&f.name))
                    .map(move |f| format!("{}.{}", class.full_name(), f.name))
            })
            .collect();
        if !hardcoded.is_empty() {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Security,
                    Priority::High,
                    "Remove hardcoded credentials",
                )
                .description(format!(
                    "Credential-like fields initialised with literals: {}.",
                    hardcoded.join(", ")
                ))
                .rationale(
                    "Strings compiled into a player build can be extracted by anyone with the binary.",
                )
                .step("Rotate the exposed credentials", 1.0)
                .step(
                    "Load secrets from a server or platform keystore at runtime",
                    scaled_hours(1.0, hardcoded.len(), 8.0),
                )
                .benefit("Secrets no longer ship with the game")
                .risk("Existing builds keep the old credentials until they are rotated")
                .skills(&["Security", "C#"])
                .build(),
            );
        }

        let formatter_users: Vec<String> = scripts
            .classes
            .iter()
            .filter(|class| uses_binary_formatter(class))
            .map(ClassDefinition::full_name)
            .collect();
        if !formatter_users.is_empty() {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Security,
                    Priority::Medium,
                    "Stop using BinaryFormatter",
                )
                .description(format!("BinaryFormatter is used by {}.", formatter_users.join(", ")))
                .rationale(
                    "Deserializing untrusted data with BinaryFormatter allows arbitrary code execution.",
                )
                .step(
                    "Switch save data to JsonUtility or another schema-based serializer",
                    scaled_hours(2.0, formatter_users.len(), 12.0),
                )
                .step("Migrate existing save files", 2.0)
                .benefit("Save and network data that cannot execute code")
                .risk("Old save files need a one-time conversion")
                .skills(&["C#", "Serialization"])
                .build(),
            );
        }
        Ok(items)
    }
}
