use serde::{Deserialize, Serialize};

/// The sporadic Johnson solids that no operation reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Elementary {
    SnubDisphenoid,
    SnubSquareAntiprism,
    Sphenocorona,
    AugmentedSphenocorona,
    Sphenomegacorona,
    Hebesphenomegacorona,
    Disphenocingulum,
    Bilunabirotunda,
    TriangularHebesphenorotunda,
}

impl Elementary {
    pub const ALL: [Elementary; 9] = [
        Elementary::SnubDisphenoid,
        Elementary::SnubSquareAntiprism,
        Elementary::Sphenocorona,
        Elementary::AugmentedSphenocorona,
        Elementary::Sphenomegacorona,
        Elementary::Hebesphenomegacorona,
        Elementary::Disphenocingulum,
        Elementary::Bilunabirotunda,
        Elementary::TriangularHebesphenorotunda,
    ];

    pub fn canonical_name(&self) -> String {
        match self {
            Elementary::SnubDisphenoid => "snub disphenoid",
            Elementary::SnubSquareAntiprism => "snub square antiprism",
            Elementary::Sphenocorona => "sphenocorona",
            Elementary::AugmentedSphenocorona => "augmented sphenocorona",
            Elementary::Sphenomegacorona => "sphenomegacorona",
            Elementary::Hebesphenomegacorona => "hebesphenomegacorona",
            Elementary::Disphenocingulum => "disphenocingulum",
            Elementary::Bilunabirotunda => "bilunabirotunda",
            Elementary::TriangularHebesphenorotunda => "triangular hebesphenorotunda",
        }
        .to_string()
    }

    pub fn universe() -> Vec<Elementary> {
        Self::ALL.to_vec()
    }
}
