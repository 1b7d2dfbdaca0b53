use crf_types::PolyhedronSpecs;

use crate::catalog;
use crate::error::KernelResult;
use crate::mesh::polyhedron::Polyhedron;

/// A combinatorial spec paired with a concrete mesh realizing it.
///
/// Most of the operation engine works on formes rather than bare meshes:
/// the geometric algorithms need both the classification and the embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct Forme {
    pub specs: PolyhedronSpecs,
    pub geom: Polyhedron,
}

impl Forme {
    pub fn new(specs: PolyhedronSpecs, geom: Polyhedron) -> Self {
        Self { specs, geom }
    }

    /// Reference realization of a spec (catalog geometry, chirality
    /// applied).
    pub fn load(specs: &PolyhedronSpecs) -> KernelResult<Forme> {
        Ok(Forme {
            specs: *specs,
            geom: catalog::geometry_for(specs)?,
        })
    }

    /// Reference realization by canonical name.
    pub fn load_name(name: &str) -> KernelResult<Forme> {
        let specs = PolyhedronSpecs::from_name(name).ok_or_else(|| {
            crate::error::KernelError::NotFound {
                name: name.to_string(),
            }
        })?;
        Forme::load(&specs)
    }

    pub fn canonical_name(&self) -> String {
        self.specs.canonical_name()
    }

    pub fn edge_length(&self) -> f64 {
        self.geom.edge_length()
    }

    /// Same classification over a different realization.
    pub fn with_geometry(&self, geom: Polyhedron) -> Forme {
        Forme {
            specs: self.specs,
            geom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_by_name_round_trips() {
        let forme = Forme::load_name("cube").unwrap();
        assert_eq!(forme.canonical_name(), "cube");
        assert_eq!(forme.geom.vertex_count(), 8);
        assert!((forme.edge_length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_name_fails() {
        assert!(Forme::load_name("megacube").is_err());
    }
}
