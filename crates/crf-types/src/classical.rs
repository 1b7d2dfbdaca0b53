use serde::{Deserialize, Serialize};

use crate::common::{FacetKind, Family, Twist};
use crate::specs::PolyhedronSpecs;

/// Construction form of a classical (Platonic or Archimedean) solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassicalForm {
    Regular,
    Truncated,
    Rectified,
    Bevelled,
    Cantellated,
    Snub,
}

impl ClassicalForm {
    pub const ALL: [ClassicalForm; 6] = [
        ClassicalForm::Regular,
        ClassicalForm::Truncated,
        ClassicalForm::Rectified,
        ClassicalForm::Bevelled,
        ClassicalForm::Cantellated,
        ClassicalForm::Snub,
    ];
}

/// A Platonic or Archimedean solid, identified by family, form, and (where
/// the form distinguishes them) the facet it is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classical {
    pub family: Family,
    pub form: ClassicalForm,
    /// Face vs vertex form. `None` for the self-dual tetrahedral family and
    /// for forms that merge the two (rectified, bevelled, cantellated, snub).
    pub facet: Option<FacetKind>,
    /// Handedness, carried by snub forms only.
    pub twist: Option<Twist>,
}

impl Classical {
    pub fn regular(family: Family, facet: Option<FacetKind>) -> Self {
        Self {
            family,
            form: ClassicalForm::Regular,
            facet,
            twist: None,
        }
    }

    /// The five Platonic solids.
    pub fn platonic() -> Vec<Classical> {
        let mut out = vec![Classical::regular(Family::Tetrahedral, None)];
        for family in [Family::Octahedral, Family::Icosahedral] {
            for facet in FacetKind::ALL {
                out.push(Classical::regular(family, Some(facet)));
            }
        }
        out
    }

    /// Structural update producing a new spec with a different form.
    pub fn with_form(self, form: ClassicalForm) -> Self {
        let facet = if Self::form_keeps_facet(form) { self.facet } else { None };
        Self {
            form,
            facet,
            twist: None,
            ..self
        }
    }

    pub fn with_facet(self, facet: FacetKind) -> Self {
        Self {
            facet: Some(facet),
            ..self
        }
    }

    pub fn with_twist(self, twist: Twist) -> Self {
        Self {
            twist: Some(twist),
            ..self
        }
    }

    fn form_keeps_facet(form: ClassicalForm) -> bool {
        matches!(form, ClassicalForm::Regular | ClassicalForm::Truncated)
    }

    // ── Predicates ──────────────────────────────────────────────────────────

    pub fn is_regular(&self) -> bool {
        self.form == ClassicalForm::Regular
    }

    pub fn is_truncated(&self) -> bool {
        self.form == ClassicalForm::Truncated
    }

    pub fn is_rectified(&self) -> bool {
        self.form == ClassicalForm::Rectified
    }

    pub fn is_bevelled(&self) -> bool {
        self.form == ClassicalForm::Bevelled
    }

    pub fn is_cantellated(&self) -> bool {
        self.form == ClassicalForm::Cantellated
    }

    pub fn is_snub(&self) -> bool {
        self.form == ClassicalForm::Snub
    }

    pub fn is_chiral(&self) -> bool {
        self.twist.is_some()
    }

    /// Structural validity within the taxonomy.
    pub fn valid(&self) -> bool {
        let facet_ok = match (self.family, Self::form_keeps_facet(self.form)) {
            (Family::Tetrahedral, _) => self.facet.is_none(),
            (_, true) => self.facet.is_some(),
            (_, false) => self.facet.is_none(),
        };
        let twist_ok = match self.form {
            // Tetrahedral snub folds onto the icosahedron and is left out of
            // the universe entirely.
            ClassicalForm::Snub => {
                self.family != Family::Tetrahedral && self.twist.is_some()
            }
            _ => self.twist.is_none(),
        };
        facet_ok && twist_ok
    }

    /// Fold degenerate tetrahedral-family entries onto their catalog
    /// identity in another family.
    pub fn fold(&self) -> Option<PolyhedronSpecs> {
        if self.family != Family::Tetrahedral {
            return None;
        }
        let target = match self.form {
            ClassicalForm::Rectified => {
                Classical::regular(Family::Octahedral, Some(FacetKind::Vertex))
            }
            ClassicalForm::Bevelled => Classical {
                family: Family::Octahedral,
                form: ClassicalForm::Truncated,
                facet: Some(FacetKind::Vertex),
                twist: None,
            },
            ClassicalForm::Cantellated => Classical {
                family: Family::Octahedral,
                form: ClassicalForm::Rectified,
                facet: None,
                twist: None,
            },
            ClassicalForm::Snub => {
                Classical::regular(Family::Icosahedral, Some(FacetKind::Vertex))
            }
            _ => return None,
        };
        Some(PolyhedronSpecs::Classical(target))
    }

    /// Canonical reference-geometry name.
    pub fn canonical_name(&self) -> String {
        if let Some(folded) = self.fold() {
            return folded.canonical_name();
        }
        let base = |facet: Option<FacetKind>| match (self.family, facet) {
            (Family::Tetrahedral, _) => "tetrahedron",
            (Family::Octahedral, Some(FacetKind::Face)) => "cube",
            (Family::Octahedral, _) => "octahedron",
            (Family::Icosahedral, Some(FacetKind::Face)) => "dodecahedron",
            (Family::Icosahedral, _) => "icosahedron",
        };
        match self.form {
            ClassicalForm::Regular => base(self.facet).to_string(),
            ClassicalForm::Truncated => format!("truncated {}", base(self.facet)),
            ClassicalForm::Rectified => match self.family {
                Family::Octahedral => "cuboctahedron".to_string(),
                _ => "icosidodecahedron".to_string(),
            },
            ClassicalForm::Bevelled => match self.family {
                Family::Octahedral => "truncated cuboctahedron".to_string(),
                _ => "truncated icosidodecahedron".to_string(),
            },
            ClassicalForm::Cantellated => match self.family {
                Family::Octahedral => "rhombicuboctahedron".to_string(),
                _ => "rhombicosidodecahedron".to_string(),
            },
            ClassicalForm::Snub => match self.family {
                Family::Octahedral => "snub cube".to_string(),
                _ => "snub dodecahedron".to_string(),
            },
        }
    }

    /// Enumerate the full classical universe (valid entries only).
    pub fn universe() -> Vec<Classical> {
        let mut out = Vec::new();
        for family in Family::ALL {
            for form in ClassicalForm::ALL {
                let facets: Vec<Option<FacetKind>> =
                    if family == Family::Tetrahedral || !Self::form_keeps_facet(form) {
                        vec![None]
                    } else {
                        FacetKind::ALL.iter().copied().map(Some).collect()
                    };
                for facet in facets {
                    let twists: Vec<Option<Twist>> = if form == ClassicalForm::Snub {
                        Twist::ALL.iter().copied().map(Some).collect()
                    } else {
                        vec![None]
                    };
                    for twist in twists {
                        let spec = Classical {
                            family,
                            form,
                            facet,
                            twist,
                        };
                        if spec.valid() {
                            out.push(spec);
                        }
                    }
                }
            }
        }
        out
    }
}
