use crate::core::contract::ScenarioFailure;
use crate::core::scenarios::{
    character_handling, determinism, functional_accuracy, input_validation, parameter_behavior,
    response_completeness,
};
use crate::constants::tolerance;
use crate::core::scenarios::response_completeness::FieldGroup;
use crate::services::RfqClient;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Stable scenario identifiers, as tracked in the defect backlog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScenarioId {
    A01,
    A02,
    A03,
    A04,
    A05,
    A06,
    A07,
    A08,
    A09,
    A10,
    A11,
    A12,
    A13,
    B01,
    B02,
    B03,
    B04,
    B05,
    B06,
    B07,
    B08,
    B09,
    B10,
    B11,
    B12,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 25] = [
        ScenarioId::A01, ScenarioId::A02, ScenarioId::A03, ScenarioId::A04, ScenarioId::A05,
        ScenarioId::A06, ScenarioId::A07, ScenarioId::A08, ScenarioId::A09, ScenarioId::A10,
        ScenarioId::A11, ScenarioId::A12, ScenarioId::A13, ScenarioId::B01, ScenarioId::B02,
        ScenarioId::B03, ScenarioId::B04, ScenarioId::B05, ScenarioId::B06, ScenarioId::B07,
        ScenarioId::B08, ScenarioId::B09, ScenarioId::B10, ScenarioId::B11, ScenarioId::B12,
    ];
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        ScenarioId::ALL
            .iter()
            .copied()
            .find(|id| id.to_string() == wanted)
            .ok_or_else(|| format!("unknown scenario id: {}", s))
    }
}

/// Scenario groups, one runner module each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Group {
    InputValidation,
    ParameterBehavior,
    CharacterHandling,
    FunctionalAccuracy,
    Determinism,
    ResponseCompleteness,
}

impl Group {
    pub fn title(&self) -> &'static str {
        match self {
            Group::InputValidation => "RFQ Input Validation (A01-A06)",
            Group::ParameterBehavior => "RFQ Parameter Behavior (A07-A12)",
            Group::CharacterHandling => "RFQ Character Handling (A13)",
            Group::FunctionalAccuracy => "RFQ Functional Accuracy (B01-B06)",
            Group::Determinism => "RFQ Determinism / Consistency (B07-B08)",
            Group::ResponseCompleteness => "RFQ Response Completeness (B09-B12)",
        }
    }
}

/// Last known state of the backlog defect a scenario reproduces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DefectState {
    Open,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Defect {
    pub tag: &'static str,
    pub state: DefectState,
}

/// One verification scenario.
///
/// Defect metadata is informational: a scenario reproducing an open defect
/// still runs and fails like any other.
#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub title: &'static str,
    pub group: Group,
    pub defect: Option<Defect>,
    /// Overrides the runner's default timeout
    #[serde(skip)]
    pub timeout: Option<Duration>,
}

impl Scenario {
    fn new(id: ScenarioId, group: Group, title: &'static str) -> Self {
        Self { id, title, group, defect: None, timeout: None }
    }

    /// Tag with a backlog defect that is still open
    fn open(mut self, tag: &'static str) -> Self {
        self.defect = Some(Defect { tag, state: DefectState::Open });
        self
    }

    fn fixed(mut self, tag: &'static str) -> Self {
        self.defect = Some(Defect { tag, state: DefectState::Fixed });
        self
    }

    fn slow(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Execute the scenario's call sequence and assertions
    pub async fn run(&self, client: &RfqClient) -> Result<(), ScenarioFailure> {
        use ScenarioId::*;

        match self.id {
            A01 => input_validation::empty_text(client).await,
            A02 => input_validation::whitespace_text(client).await,
            A03 => input_validation::missing_text(client).await,
            A04 => input_validation::malformed_url(client).await,
            A05 => input_validation::unreachable_url(client).await,
            A06 => input_validation::empty_url(client).await,
            A07 => parameter_behavior::threshold_filters(client, 0.8, 5, true).await,
            A08 => parameter_behavior::threshold_filters(client, 0.99, 5, false).await,
            A09 => parameter_behavior::threshold_filters(client, 0.0, 10, true).await,
            A10 => parameter_behavior::top_k_exact(client).await,
            A11 => parameter_behavior::top_k_upper_bound(client).await,
            A12 => parameter_behavior::top_k_zero_rejected(client).await,
            A13 => character_handling::special_characters(client).await,
            B01 => functional_accuracy::private_label_changes_order(client).await,
            B02 => functional_accuracy::private_label_field_present(client).await,
            B03 => functional_accuracy::relevant_products_rank_first(client).await,
            B04 => functional_accuracy::unrelated_products_score_low(client).await,
            B05 => functional_accuracy::url_extraction_on_target(client).await,
            B06 => functional_accuracy::url_matches_free_text(client).await,
            B07 => determinism::consistent_top_result(client, 3, tolerance::SHORT_RUN).await,
            B08 => determinism::consistent_top_result(client, 5, tolerance::LONG_RUN).await,
            B09 => response_completeness::verify(client, FieldGroup::Price).await,
            B10 => response_completeness::verify(client, FieldGroup::Sku).await,
            B11 => response_completeness::verify(client, FieldGroup::VendorStock).await,
            B12 => response_completeness::verify(client, FieldGroup::Images).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.title)?;
        if let Some(defect) = self.defect {
            write!(f, " [{}]", defect.tag)?;
        }
        Ok(())
    }
}

/// All scenarios in execution order
pub fn catalog() -> Vec<Scenario> {
    use Group::*;
    use ScenarioId::*;

    vec![
        Scenario::new(A01, InputValidation, "Empty text returns 400 instead of 200").open("Bug N1"),
        Scenario::new(A02, InputValidation, "Whitespace-only text returns 400")
            .open("Bug N1 variant"),
        Scenario::new(A03, InputValidation, "Missing text field returns 400")
            .open("Bug N1 variant"),
        Scenario::new(A04, InputValidation, "Invalid URL format returns 400, not 500")
            .open("Bug N2")
            .slow(120),
        Scenario::new(A05, InputValidation, "Unreachable URL returns 4xx, not 500")
            .open("Bug N2 variant")
            .slow(180),
        Scenario::new(A06, InputValidation, "Empty URL returns 400").open("Bug N2 variant"),
        Scenario::new(A07, ParameterBehavior, "Threshold 0.8 returns only products above 80%")
            .open("Bug N3"),
        Scenario::new(A08, ParameterBehavior, "Threshold 0.99 filters out products below 99%")
            .open("Bug N3 boundary"),
        Scenario::new(A09, ParameterBehavior, "Threshold 0.0 returns all matches (no filtering)")
            .open("Bug N3 boundary"),
        Scenario::new(A10, ParameterBehavior, "topK=1 returns exactly 1 result").open("Bug N4"),
        Scenario::new(A11, ParameterBehavior, "topK=10 returns up to 10 results")
            .open("Bug N4 variant"),
        Scenario::new(A12, ParameterBehavior, "topK=0 returns 400 error").open("Bug N4 boundary"),
        Scenario::new(A13, CharacterHandling, "Special characters do not break product matching")
            .open("Bug N5"),
        Scenario::new(
            B01,
            FunctionalAccuracy,
            "enablePrivateLabelRanking flag changes product ordering",
        )
        .open("Bug P1"),
        Scenario::new(
            B02,
            FunctionalAccuracy,
            "Private label products ranked first when flag is true",
        )
        .open("Bug P1 variant"),
        Scenario::new(B03, FunctionalAccuracy, "Relevant products score highest for specific query")
            .fixed("Bug P2"),
        Scenario::new(B04, FunctionalAccuracy, "Unrelated products score low for specific query")
            .fixed("Bug P2 variant"),
        Scenario::new(
            B05,
            FunctionalAccuracy,
            "URL upload extracts product content and matches relevant products",
        )
        .open("Bug P3")
        .slow(120),
        Scenario::new(
            B06,
            FunctionalAccuracy,
            "URL upload matches same category as free-text search",
        )
        .open("Bug P3 variant")
        .slow(120),
        Scenario::new(B07, Determinism, "Same input produces consistent scores -- 3 attempts")
            .open("Bug P4"),
        Scenario::new(B08, Determinism, "Score variance within bounds over 5 requests")
            .open("Bug P4 extended"),
        Scenario::new(B09, ResponseCompleteness, "matched products contain price field")
            .open("Bug P5"),
        Scenario::new(B10, ResponseCompleteness, "matched products contain sku field")
            .fixed("Bug P5"),
        Scenario::new(B11, ResponseCompleteness, "matched products contain vendor and stock fields")
            .fixed("Bug P5"),
        Scenario::new(B12, ResponseCompleteness, "matched products contain image field")
            .fixed("Bug P5"),
    ]
}

/// Narrow the catalog to the requested ids and groups; empty filters keep everything
pub fn select(scenarios: Vec<Scenario>, ids: &[ScenarioId], groups: &[Group]) -> Vec<Scenario> {
    scenarios
        .into_iter()
        .filter(|s| ids.is_empty() || ids.contains(&s.id))
        .filter(|s| groups.is_empty() || groups.contains(&s.group))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_id_once() {
        let scenarios = catalog();
        assert_eq!(scenarios.len(), ScenarioId::ALL.len());
        for (scenario, id) in scenarios.iter().zip(ScenarioId::ALL.iter()) {
            assert_eq!(scenario.id, *id);
        }
    }

    #[test]
    fn test_slow_scenarios_override_timeout() {
        let scenarios = catalog();
        let timeout_of = |id| scenarios.iter().find(|s| s.id == id).unwrap().timeout;
        assert_eq!(timeout_of(ScenarioId::A04), Some(Duration::from_secs(120)));
        assert_eq!(timeout_of(ScenarioId::A05), Some(Duration::from_secs(180)));
        assert_eq!(timeout_of(ScenarioId::B05), Some(Duration::from_secs(120)));
        assert_eq!(timeout_of(ScenarioId::A01), None);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!("b07".parse::<ScenarioId>().unwrap(), ScenarioId::B07);
        assert!("C01".parse::<ScenarioId>().is_err());
    }

    #[test]
    fn test_select_filters() {
        let only = select(catalog(), &[ScenarioId::A12, ScenarioId::B08], &[]);
        assert_eq!(only.len(), 2);

        let group = select(catalog(), &[], &[Group::Determinism]);
        assert!(group.iter().all(|s| s.group == Group::Determinism));
        assert_eq!(group.len(), 2);

        assert_eq!(select(catalog(), &[], &[]).len(), 25);
    }
}
