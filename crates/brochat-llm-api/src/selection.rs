//! Model selection for a freshly supplied credential.
//!
//! Candidates are ranked by an ordered list of tiers. Each tier is a predicate
//! over the lowercase model identifier; a model lands in the first tier it
//! matches. Within a tier the provider's enumeration order is kept.

use brochat_types::PROBE_PROMPT;

use crate::client::{GenerativeBackend, ModelInfo};
use crate::error::GatewayError;

const MODEL_FAMILY: &str = "gemini";
const FAST_TIER_MARKER: &str = "flash";

type TierPredicate = fn(&str) -> bool;

fn is_fast_family_model(id: &str) -> bool {
    id.contains(MODEL_FAMILY) && id.contains(FAST_TIER_MARKER)
}

fn is_family_model(id: &str) -> bool {
    id.contains(MODEL_FAMILY)
}

fn is_any_model(_id: &str) -> bool {
    true
}

/// Preference order, most preferred first
const CANDIDATE_TIERS: [(&str, TierPredicate); 3] = [
    ("fast family", is_fast_family_model as TierPredicate),
    ("family", is_family_model as TierPredicate),
    ("any", is_any_model as TierPredicate),
];

/// Order generation-capable models by preference, without duplicates
pub fn order_candidates(models: &[ModelInfo]) -> Vec<String> {
    let usable: Vec<&ModelInfo> = models.iter().filter(|m| m.supports_generation()).collect();
    let mut ordered: Vec<String> = Vec::with_capacity(usable.len());

    for (tier_name, matches) in CANDIDATE_TIERS {
        for model in &usable {
            let id = model.name.to_lowercase();
            if matches(&id) && !ordered.contains(&model.name) {
                log::trace!("candidate {} matched tier '{}'", model.name, tier_name);
                ordered.push(model.name.clone());
            }
        }
    }

    ordered
}

/// Find a working model for `credential`.
///
/// Lists the provider's models, then sends one trivial generation to each
/// candidate in preference order and returns the first that answers. When
/// every candidate fails the last underlying error is reported.
pub async fn probe_backend(
    backend: &dyn GenerativeBackend,
    credential: &str,
) -> Result<String, GatewayError> {
    let credential = credential.trim();
    if credential.is_empty() {
        return Err(GatewayError::MissingCredential);
    }

    let models = backend.list_models(credential).await.map_err(|e| {
        if e.is_auth_failure() {
            GatewayError::CredentialRejected(e.to_string())
        } else {
            e
        }
    })?;

    let candidates = order_candidates(&models);
    if candidates.is_empty() {
        return Err(GatewayError::ProbeExhausted {
            last_error: "no available model supports generateContent".to_string(),
        });
    }

    let mut last_error = None;
    for model in candidates {
        log::info!("Probing model {}", model);
        match backend.generate_text(credential, &model, None, PROBE_PROMPT).await {
            Ok(_) => {
                log::info!("Selected model {}", model);
                return Ok(model);
            }
            Err(e) => {
                log::warn!("Model {} failed probe: {}", model, e);
                last_error = Some(e);
            }
        }
    }

    Err(GatewayError::ProbeExhausted {
        last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
    })
}
