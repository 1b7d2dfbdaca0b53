//! Structural mesh surgery shared by the reference catalog and the
//! cut-and-paste operations: welding a cap solid onto a face, removing a
//! detected cap, extracting a cap as a standalone solid.

use crate::error::{KernelError, KernelResult};
use crate::geometry::pose::Pose;

use super::cap::Cap;
use super::polyhedron::Polyhedron;

/// Weld `cap` onto `base` at `base_face`: the cap is scaled to the base
/// edge length, oriented so its mating face's normal is anti-parallel to the
/// target face's, rotated by `offset` ring steps, and the two mated faces
/// are deleted with their rings merged.
pub fn attach(
    base: &Polyhedron,
    base_face: usize,
    cap: &Polyhedron,
    cap_face: usize,
    offset: usize,
) -> KernelResult<Polyhedron> {
    let target = base.face(base_face);
    let mating = cap.face(cap_face);
    if target.sides() != mating.sides() {
        return Err(KernelError::UnsuitableFace {
            face: base_face,
            detail: format!(
                "cannot mate a {}-gon with a {}-gon",
                target.sides(),
                mating.sides()
            ),
        });
    }

    let mating_pose = Pose::new(
        mating.centroid(),
        mating.edge_length(),
        mating.normal(),
        cap.vertex_position(mating.vertex_indices()[0]) - mating.centroid(),
    );
    let anchor = target.vertex_indices()[offset % target.sides()];
    let target_pose = Pose::new(
        target.centroid(),
        target.edge_length(),
        -target.normal(),
        base.vertex_position(anchor) - target.centroid(),
    );

    let placed = cap.transformed(&Pose::align(&mating_pose, &target_pose)?);
    let merged = base.add_polyhedron(&placed);
    let welded = merged.without_faces(&[base_face, base.face_count() + cap_face]);
    Ok(welded.deduplicate(base.edge_length() * 1e-6))
}

/// Remove a detected cap, sealing the hole with the boundary ring.
pub fn remove_cap(poly: &Polyhedron, cap: &Cap<'_>) -> Polyhedron {
    let mut faces: Vec<Vec<usize>> = poly
        .face_lists()
        .iter()
        .enumerate()
        .filter(|(i, _)| !cap.contains_face(*i))
        .map(|(_, f)| f.clone())
        .collect();
    // The ring is wound counterclockwise from the cap side, which is the
    // outward side of the scar.
    faces.push(cap.boundary.clone());
    poly.with_faces(faces).deduplicate(poly.edge_length() * 1e-9)
}

/// Extract a cap as a standalone solid closed by its boundary ring.
pub fn cap_solid(poly: &Polyhedron, cap: &Cap<'_>) -> Polyhedron {
    let mut faces: Vec<Vec<usize>> = cap
        .faces
        .iter()
        .map(|&f| poly.face_vertices(f).to_vec())
        .collect();
    // Seen from below the cap, the ring winds the other way.
    let mut seal = cap.boundary.clone();
    seal.reverse();
    faces.push(seal);
    poly.with_faces(faces).deduplicate(poly.edge_length() * 1e-9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point3d;
    use crate::mesh::audit::euler_characteristic;
    use crate::mesh::cap::CapSearch;

    fn square_pyramid() -> Polyhedron {
        Polyhedron::new(
            vec![
                Point3d::new(-0.5, -0.5, 0.0),
                Point3d::new(0.5, -0.5, 0.0),
                Point3d::new(0.5, 0.5, 0.0),
                Point3d::new(-0.5, 0.5, 0.0),
                Point3d::new(0.0, 0.0, 0.70710678),
            ],
            vec![
                vec![3, 2, 1, 0],
                vec![0, 1, 4],
                vec![1, 2, 4],
                vec![2, 3, 4],
                vec![3, 0, 4],
            ],
        )
    }

    #[test]
    fn test_attach_two_pyramids_makes_bipyramid() {
        let pyramid = square_pyramid();
        let bipyramid = attach(&pyramid, 0, &pyramid, 0, 0).unwrap();
        assert_eq!(bipyramid.vertex_count(), 6);
        assert_eq!(bipyramid.face_count(), 8);
        assert_eq!(euler_characteristic(&bipyramid), 2);
        // Every face is a triangle with the original edge length.
        for face in bipyramid.faces() {
            assert_eq!(face.sides(), 3);
            assert!((face.edge_length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_remove_cap_restores_pyramid_base() {
        let pyramid = square_pyramid();
        let bipyramid = attach(&pyramid, 0, &pyramid, 0, 0).unwrap();
        let caps = Cap::find_all(&bipyramid, &CapSearch::primary()).unwrap();
        assert_eq!(caps.len(), 2);
        let removed = remove_cap(&bipyramid, &caps[0]);
        assert!(removed.is_same(&pyramid));
    }

    #[test]
    fn test_cap_solid_round_trip() {
        let pyramid = square_pyramid();
        let bipyramid = attach(&pyramid, 0, &pyramid, 0, 0).unwrap();
        let caps = Cap::find_all(&bipyramid, &CapSearch::primary()).unwrap();
        let extracted = cap_solid(&bipyramid, &caps[0]);
        assert!(extracted.is_same(&pyramid));
        assert_eq!(euler_characteristic(&extracted), 2);
    }
}
