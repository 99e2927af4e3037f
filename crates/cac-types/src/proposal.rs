use serde::{Deserialize, Serialize};

use crate::domain::Domain;

/// A candidate climate-action item under evaluation.
///
/// Proposals arrive from the external generation step and are never mutated
/// by the core. Every field defaults when absent so that an incomplete
/// document still reaches the structural check and is reported there,
/// instead of failing at the serialization boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Proposal {
    /// Unique per domain.
    pub id: String,
    pub domain: Domain,
    pub title: String,
    pub description: String,
    /// Tonnes CO2 per year at full scale.
    pub co2_reduction_estimate: f64,
    /// Currency units (CHF).
    pub implementation_cost: f64,
    pub timeline_months: i64,
    pub stakeholders: Vec<String>,
    pub prerequisites: Vec<String>,
    pub risks: Vec<Risk>,
    pub scientific_references: Vec<ScientificReference>,
    pub interdependencies: Vec<Interdependency>,
    /// Optional implementation plan, in declared order.
    pub phases: Vec<ImplementationPhase>,
}

impl Proposal {
    pub fn builder(id: impl Into<String>, domain: Domain) -> ProposalBuilder {
        ProposalBuilder::new(id, domain)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityClass {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Risk {
    pub description: String,
    pub probability: ProbabilityClass,
    pub mitigation: String,
}

/// How much weight a cited source carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceQuality {
    PeerReviewed,
    /// Agency or intergovernmental reports (IPCC, IEA, national inventories).
    Institutional,
    Grey,
    #[default]
    Unknown,
}

/// What a reference is cited for. Data claims age faster than principles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    #[default]
    Data,
    Principle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScientificReference {
    pub title: String,
    pub year: i32,
    pub quality: SourceQuality,
    pub claim: ClaimKind,
}

/// Pointer to a proposal in another (or the same) domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interdependency {
    pub domain: Domain,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImplementationPhase {
    pub name: String,
    /// Month offset from project start, zero-based.
    pub start_month: u32,
    pub duration_months: u32,
}

impl ImplementationPhase {
    pub fn end_month(&self) -> u32 {
        self.start_month.saturating_add(self.duration_months)
    }
}

/// Builder for proposals, mostly used by fixtures.
#[derive(Debug, Clone)]
pub struct ProposalBuilder {
    proposal: Proposal,
}

impl ProposalBuilder {
    pub fn new(id: impl Into<String>, domain: Domain) -> Self {
        Self {
            proposal: Proposal {
                id: id.into(),
                domain,
                ..Default::default()
            },
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.proposal.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.proposal.description = description.into();
        self
    }

    pub fn co2_reduction(mut self, tonnes_per_year: f64) -> Self {
        self.proposal.co2_reduction_estimate = tonnes_per_year;
        self
    }

    pub fn cost(mut self, implementation_cost: f64) -> Self {
        self.proposal.implementation_cost = implementation_cost;
        self
    }

    pub fn timeline_months(mut self, months: i64) -> Self {
        self.proposal.timeline_months = months;
        self
    }

    pub fn stakeholder(mut self, stakeholder: impl Into<String>) -> Self {
        self.proposal.stakeholders.push(stakeholder.into());
        self
    }

    pub fn prerequisite(mut self, prerequisite: impl Into<String>) -> Self {
        self.proposal.prerequisites.push(prerequisite.into());
        self
    }

    pub fn risk(
        mut self,
        description: impl Into<String>,
        probability: ProbabilityClass,
        mitigation: impl Into<String>,
    ) -> Self {
        self.proposal.risks.push(Risk {
            description: description.into(),
            probability,
            mitigation: mitigation.into(),
        });
        self
    }

    pub fn reference(
        mut self,
        title: impl Into<String>,
        year: i32,
        quality: SourceQuality,
        claim: ClaimKind,
    ) -> Self {
        self.proposal.scientific_references.push(ScientificReference {
            title: title.into(),
            year,
            quality,
            claim,
        });
        self
    }

    pub fn interdependency(mut self, domain: Domain, id: impl Into<String>) -> Self {
        self.proposal.interdependencies.push(Interdependency {
            domain,
            id: id.into(),
        });
        self
    }

    pub fn phase(mut self, name: impl Into<String>, start_month: u32, duration_months: u32) -> Self {
        self.proposal.phases.push(ImplementationPhase {
            name: name.into(),
            start_month,
            duration_months,
        });
        self
    }

    pub fn build(self) -> Proposal {
        self.proposal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_document_still_deserializes() {
        let proposal: Proposal = serde_json::from_str(
            r#"{"id":"transport-001","domain":"transport","co2_reduction_estimate":5000}"#,
        )
        .unwrap();

        assert_eq!(proposal.domain, Domain::Transport);
        assert_eq!(proposal.implementation_cost, 0.0);
        assert!(proposal.scientific_references.is_empty());
    }

    #[test]
    fn interdependency_without_id_still_deserializes() {
        let proposal: Proposal = serde_json::from_str(
            r#"{"id":"energy-003","interdependencies":[{"domain":"transport"}]}"#,
        )
        .unwrap();

        assert_eq!(proposal.interdependencies.len(), 1);
        assert_eq!(proposal.interdependencies[0].domain, Domain::Transport);
        assert!(proposal.interdependencies[0].id.is_empty());
    }

    #[test]
    fn builder_keeps_declared_order() {
        let proposal = Proposal::builder("energy-007", Domain::Energy)
            .stakeholder("canton")
            .stakeholder("utility")
            .phase("permits", 0, 6)
            .phase("build", 6, 18)
            .build();

        assert_eq!(proposal.stakeholders, vec!["canton", "utility"]);
        assert_eq!(proposal.phases[1].end_month(), 24);
    }

    #[test]
    fn reference_enums_use_snake_case() {
        let reference: ScientificReference = serde_json::from_str(
            r#"{"title":"IPCC AR6 WGIII","year":2022,"quality":"institutional","claim":"principle"}"#,
        )
        .unwrap();
        assert_eq!(reference.quality, SourceQuality::Institutional);
        assert_eq!(reference.claim, ClaimKind::Principle);
    }
}
