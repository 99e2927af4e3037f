use serde::{Deserialize, Serialize};

/// Policy domain a proposal belongs to.
///
/// Unknown tags are kept as [`Domain::Unrecognized`] instead of failing
/// deserialization, so the structural check can report them as a blocking
/// issue rather than the proposal silently disappearing at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Domain {
    Transport,
    Energy,
    Building,
    Agriculture,
    Industry,
    CrossCutting,
    Unrecognized(String),
}

impl Domain {
    /// Every domain the evaluation core knows how to judge.
    pub const RECOGNIZED: [Domain; 6] = [
        Domain::Transport,
        Domain::Energy,
        Domain::Building,
        Domain::Agriculture,
        Domain::Industry,
        Domain::CrossCutting,
    ];

    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "transport" => Domain::Transport,
            "energy" => Domain::Energy,
            "building" => Domain::Building,
            "agriculture" => Domain::Agriculture,
            "industry" => Domain::Industry,
            "cross-cutting" | "cross_cutting" | "crosscutting" => Domain::CrossCutting,
            _ => Domain::Unrecognized(tag.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Domain::Transport => "transport",
            Domain::Energy => "energy",
            Domain::Building => "building",
            Domain::Agriculture => "agriculture",
            Domain::Industry => "industry",
            Domain::CrossCutting => "cross-cutting",
            Domain::Unrecognized(tag) => tag,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Domain::Unrecognized(_))
    }
}

impl Default for Domain {
    fn default() -> Self {
        Domain::Unrecognized(String::new())
    }
}

impl From<String> for Domain {
    fn from(tag: String) -> Self {
        Domain::parse(&tag)
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.as_str().to_string()
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags_case_insensitively() {
        assert_eq!(Domain::parse("Transport"), Domain::Transport);
        assert_eq!(Domain::parse(" energy "), Domain::Energy);
        assert_eq!(Domain::parse("cross_cutting"), Domain::CrossCutting);
    }

    #[test]
    fn unknown_tag_survives_round_trip() {
        let domain: Domain = serde_json::from_str("\"aviation\"").unwrap();
        assert_eq!(domain, Domain::Unrecognized("aviation".into()));
        assert!(!domain.is_recognized());
        assert_eq!(serde_json::to_string(&domain).unwrap(), "\"aviation\"");
    }

    #[test]
    fn recognized_domains_serialize_to_canonical_tags() {
        let tags: Vec<String> = Domain::RECOGNIZED
            .iter()
            .map(|d| serde_json::to_value(d).unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            tags,
            vec![
                "transport",
                "energy",
                "building",
                "agriculture",
                "industry",
                "cross-cutting"
            ]
        );
    }
}
