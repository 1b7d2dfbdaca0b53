//! Face-class analysis over classical formes.
//!
//! The resize and truncation algorithms need to know which faces of a
//! merged form play the "face" role and which play the "vertex" role. For
//! most families the side counts decide; the tetrahedral family needs a
//! two-coloring because both roles are triangles.

use std::collections::{HashMap, HashSet, VecDeque};

use crf_kernel::error::KernelError;
use crf_kernel::geometry::point::Point3d;
use crf_kernel::geometry::pose::Pose;
use crf_kernel::mesh::polyhedron::Polyhedron;
use crf_types::FacetKind;

use crate::types::{OpError, OpsResult};

pub fn faces_with_sides(geom: &Polyhedron, sides: usize) -> Vec<usize> {
    geom.faces()
        .filter(|f| f.sides() == sides)
        .map(|f| f.index)
        .collect()
}

/// Faces with the largest side count (the truncation faces of a truncated
/// solid).
pub fn majority_faces(geom: &Polyhedron) -> Vec<usize> {
    let max = geom.faces().map(|f| f.sides()).max().unwrap_or(0);
    faces_with_sides(geom, max)
}

/// Faces with the smallest side count (the vertex figures of a truncated
/// solid).
pub fn minority_faces(geom: &Polyhedron) -> Vec<usize> {
    let min = geom.faces().map(|f| f.sides()).min().unwrap_or(0);
    faces_with_sides(geom, min)
}

/// Two-color a face set under a relation known to be bipartite. Returns
/// (class containing the lowest face index, the other class).
fn bipartition(
    faces: &[usize],
    related: impl Fn(usize, usize) -> bool,
) -> OpsResult<(Vec<usize>, Vec<usize>)> {
    let mut color: HashMap<usize, bool> = HashMap::new();
    let mut queue = VecDeque::new();
    for &start in faces {
        if color.contains_key(&start) {
            continue;
        }
        color.insert(start, start == faces[0]);
        queue.push_back(start);
        while let Some(f) = queue.pop_front() {
            let c = color[&f];
            for &g in faces {
                if g != f && related(f, g) {
                    match color.get(&g) {
                        None => {
                            color.insert(g, !c);
                            queue.push_back(g);
                        }
                        Some(&existing) if existing == c => {
                            return Err(OpError::Kernel(KernelError::invariant(
                                "face classes are not bipartite",
                            )));
                        }
                        _ => {}
                    }
                }
            }
        }
    }
    let mut a = Vec::new();
    let mut b = Vec::new();
    for &f in faces {
        if color[&f] { a.push(f) } else { b.push(f) }
    }
    Ok((a, b))
}

fn share_edge(geom: &Polyhedron, f: usize, g: usize) -> bool {
    geom.face(f).adjacent_face_indices().contains(&g)
}

fn share_vertex(geom: &Polyhedron, f: usize, g: usize) -> bool {
    let set: HashSet<usize> = geom.face_vertices(f).iter().copied().collect();
    geom.face_vertices(g).iter().any(|v| set.contains(v))
}

/// Face-role faces of a rectified solid.
pub fn rectified_class(
    geom: &Polyhedron,
    family_sides: usize,
    facet: FacetKind,
) -> OpsResult<Vec<usize>> {
    if family_sides == 3 {
        // The octahedron: triangles alternate roles across every edge.
        let all = faces_with_sides(geom, 3);
        let (a, b) = bipartition(&all, |f, g| share_edge(geom, f, g))?;
        return Ok(match facet {
            FacetKind::Face => a,
            FacetKind::Vertex => b,
        });
    }
    Ok(match facet {
        FacetKind::Face => faces_with_sides(geom, family_sides),
        FacetKind::Vertex => faces_with_sides(geom, 3),
    })
}

/// Face-role faces of a cantellated solid (edge squares excluded).
pub fn cantellated_class(
    geom: &Polyhedron,
    family_sides: usize,
    facet: FacetKind,
) -> OpsResult<Vec<usize>> {
    if family_sides == 3 {
        // The cuboctahedron: the two triangles at every vertex play
        // opposite roles.
        let all = faces_with_sides(geom, 3);
        let (a, b) = bipartition(&all, |f, g| share_vertex(geom, f, g))?;
        return Ok(match facet {
            FacetKind::Face => a,
            FacetKind::Vertex => b,
        });
    }
    match facet {
        FacetKind::Face => {
            // Axis n-gons have no triangle neighbor; edge squares do.
            Ok(faces_with_sides(geom, family_sides)
                .into_iter()
                .filter(|&f| {
                    geom.face(f)
                        .adjacent_face_indices()
                        .iter()
                        .all(|&g| geom.face_vertices(g).len() != 3)
                })
                .collect())
        }
        FacetKind::Vertex => Ok(faces_with_sides(geom, 3)),
    }
}

/// Face-role faces of a snub solid. Vertex-role triangles touch no
/// primary n-gon; the rest of the triangles fill edges.
pub fn snub_class(
    geom: &Polyhedron,
    family_sides: usize,
    facet: FacetKind,
) -> OpsResult<Vec<usize>> {
    match facet {
        FacetKind::Face => Ok(faces_with_sides(geom, family_sides)),
        FacetKind::Vertex => Ok(faces_with_sides(geom, 3)
            .into_iter()
            .filter(|&f| {
                geom.face(f)
                    .adjacent_face_indices()
                    .iter()
                    .all(|&g| geom.face_vertices(g).len() == 3)
            })
            .collect()),
    }
}

/// Canonical frame spanned by a face class: origin at the solid centroid,
/// axis along the first class face, cross toward its nearest class peer.
pub fn class_pose(geom: &Polyhedron, class: &[usize], scale: f64) -> OpsResult<Pose> {
    let first = *class
        .first()
        .ok_or_else(|| OpError::site("empty face class"))?;
    let f1 = geom.face(first);
    let c1 = f1.centroid();
    let peer = class
        .iter()
        .copied()
        .filter(|&f| f != first)
        .min_by(|&a, &b| {
            let da = geom.face(a).centroid().distance_to(&c1);
            let db = geom.face(b).centroid().distance_to(&c1);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or_else(|| OpError::site("face class needs two members"))?;
    Ok(Pose::new(
        geom.centroid(),
        scale,
        f1.normal(),
        geom.face(peer).normal(),
    ))
}

/// Collapse positions toward an aligned regular target: every vertex
/// belongs to exactly one class face, whose matched target face (nearest
/// normal) supplies the corner it lands on.
pub fn contract_positions(
    middle: &Polyhedron,
    class: &[usize],
    target: &Polyhedron,
) -> OpsResult<Vec<Point3d>> {
    let mut out: Vec<Option<Point3d>> = vec![None; middle.vertex_count()];
    for &f in class {
        let normal = middle.face(f).normal();
        let matched = target
            .faces()
            .max_by(|a, b| {
                a.normal()
                    .dot(&normal)
                    .partial_cmp(&b.normal().dot(&normal))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .ok_or_else(|| OpError::site("contract target has no faces"))?;
        let corners = matched.vertex_positions();
        for &v in middle.face_vertices(f) {
            let p = middle.vertex_position(v);
            let nearest = corners
                .iter()
                .min_by(|a, b| {
                    a.distance_to(&p)
                        .partial_cmp(&b.distance_to(&p))
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .copied()
                .ok_or_else(|| OpError::site("contract target face is empty"))?;
            out[v] = Some(nearest);
        }
    }
    out.into_iter()
        .enumerate()
        .map(|(v, p)| p.ok_or_else(|| OpError::site(format!("vertex {v} outside the face class"))))
        .collect()
}

/// Duplicate every vertex once per incident edge, producing the truncated
/// topology with all duplicates still at their original positions. Returns
/// the subdivided mesh plus, per new vertex, its (vertex, neighbor) origin.
pub fn truncation_subdivide(base: &Polyhedron) -> OpsResult<(Polyhedron, Vec<(usize, usize)>)> {
    let mut ids: HashMap<(usize, usize), usize> = HashMap::new();
    let mut origins: Vec<(usize, usize)> = Vec::new();
    let mut positions: Vec<Point3d> = Vec::new();
    let mut id = |v: usize, u: usize, positions: &mut Vec<Point3d>, origins: &mut Vec<(usize, usize)>| -> usize {
        *ids.entry((v, u)).or_insert_with(|| {
            positions.push(base.vertex_position(v));
            origins.push((v, u));
            positions.len() - 1
        })
    };

    let mut faces: Vec<Vec<usize>> = Vec::new();
    for face in base.face_lists() {
        let n = face.len();
        let mut cycle = Vec::with_capacity(2 * n);
        for i in 0..n {
            let v = face[i];
            let prev = face[(i + n - 1) % n];
            let next = face[(i + 1) % n];
            cycle.push(id(v, prev, &mut positions, &mut origins));
            cycle.push(id(v, next, &mut positions, &mut origins));
        }
        faces.push(cycle);
    }
    // Vertex figures: the walk yields neighbors counterclockwise seen from
    // outside, which is exactly the outward winding.
    for v in base.vertices() {
        let ring = v.adjacent_vertices().map_err(OpError::from)?;
        faces.push(
            ring.into_iter()
                .map(|u| id(v.index, u, &mut positions, &mut origins))
                .collect(),
        );
    }
    Ok((Polyhedron::new(positions, faces), origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crf_kernel::catalog;
    use crf_kernel::mesh::audit::euler_characteristic;

    #[test]
    fn test_cantellated_classes_of_rhombicuboctahedron() {
        let rco = catalog::get("rhombicuboctahedron").unwrap();
        let face_class = cantellated_class(&rco, 4, FacetKind::Face).unwrap();
        assert_eq!(face_class.len(), 6);
        let vertex_class = cantellated_class(&rco, 4, FacetKind::Vertex).unwrap();
        assert_eq!(vertex_class.len(), 8);
    }

    #[test]
    fn test_octahedron_bipartition() {
        let octa = catalog::get("octahedron").unwrap();
        let a = rectified_class(&octa, 3, FacetKind::Face).unwrap();
        let b = rectified_class(&octa, 3, FacetKind::Vertex).unwrap();
        assert_eq!(a.len(), 4);
        assert_eq!(b.len(), 4);
        assert!(a.iter().all(|f| !b.contains(f)));
    }

    #[test]
    fn test_snub_cube_vertex_class() {
        let sc = catalog::get("snub cube").unwrap();
        let vf = snub_class(&sc, 4, FacetKind::Vertex).unwrap();
        assert_eq!(vf.len(), 8);
        let squares = snub_class(&sc, 4, FacetKind::Face).unwrap();
        assert_eq!(squares.len(), 6);
    }

    #[test]
    fn test_subdivision_counts_and_euler() {
        let cube = catalog::get("cube").unwrap();
        let (sub, origins) = truncation_subdivide(&cube).unwrap();
        // One duplicate per (vertex, incident edge): 8 corners of degree 3.
        assert_eq!(sub.vertex_count(), 24);
        assert_eq!(origins.len(), 24);
        // 6 octagons + 8 vertex triangles.
        assert_eq!(sub.face_count(), 14);
        // Positions are degenerate but the topology is the truncated cube's.
        let spread = sub.with_vertices(
            origins
                .iter()
                .map(|&(v, u)| {
                    cube.vertex_position(v).lerp(&cube.vertex_position(u), 0.3)
                })
                .collect(),
        );
        assert_eq!(euler_characteristic(&spread), 2);
    }

    #[test]
    fn test_contract_rco_covers_every_vertex() {
        let rco = catalog::get("rhombicuboctahedron").unwrap();
        let cube = catalog::get("cube").unwrap();
        let class = cantellated_class(&rco, 4, FacetKind::Face).unwrap();
        let positions = contract_positions(&rco, &class, &cube).unwrap();
        assert_eq!(positions.len(), rco.vertex_count());
        // Every collapsed position is an actual cube corner.
        for p in positions {
            let on_cube = cube
                .vertex_positions()
                .iter()
                .any(|q| q.distance_to(&p) < 1e-6);
            assert!(on_cube);
        }
    }
}
