use std::collections::{HashMap, VecDeque};

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{GeometryError, Result};
use crate::math::Point2;

use super::{Border, PointLocation};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Parameters for interior point search.
#[derive(Debug, Clone, Copy)]
pub struct InteriorParams {
    /// Maximum chord deviation used when flattening arcs, as a fraction of the
    /// region's bounding diagonal.
    pub arc_tolerance: f64,
}

impl Default for InteriorParams {
    fn default() -> Self {
        Self {
            arc_tolerance: 1e-3,
        }
    }
}

/// Finds a point strictly inside the region bounded by `outline` minus `holes`.
///
/// The flattened loops are triangulated with a constrained Delaunay
/// triangulation; interior triangles are visited from largest to smallest and
/// the first centroid that lies inside the exact region is returned.
///
/// # Errors
///
/// Returns an error if the triangulation rejects a vertex (non-finite input).
pub fn interior_point(
    outline: &Border,
    holes: &[Border],
    params: &InteriorParams,
) -> Result<Option<Point2>> {
    let diagonal = outline.bounds().diagonal();
    let tolerance = params.arc_tolerance * diagonal;
    let eps = diagonal * 1e-9;

    let mut cdt = Cdt::new();
    insert_constraint_loop(&mut cdt, &outline.to_points(tolerance))?;
    for hole in holes {
        insert_constraint_loop(&mut cdt, &hole.to_points(tolerance))?;
    }

    let depths = constraint_depths(&cdt);
    let mut candidates: Vec<(f64, Point2)> = cdt
        .inner_faces()
        .filter(|f| depths.get(&f.fix().index()).is_some_and(|d| d % 2 == 1))
        .map(|f| {
            let [a, b, c] = f.positions();
            let area = 0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs();
            let centroid = Point2::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0);
            (area, centroid)
        })
        .collect();
    candidates.sort_by(|x, y| y.0.total_cmp(&x.0));

    Ok(candidates.into_iter().map(|(_, c)| c).find(|c| {
        outline.locate(c, eps) == PointLocation::Inside
            && holes.iter().all(|h| h.locate(c, eps) == PointLocation::Outside)
    }))
}

fn insert_constraint_loop(cdt: &mut Cdt, points: &[Point2]) -> Result<()> {
    if points.len() < 3 {
        // Two-arc loops flatten to at least three points; fewer means a sliver.
        return Ok(());
    }

    let mut handles = Vec::with_capacity(points.len());
    for p in points {
        let h = cdt
            .insert(SpadePoint2::new(p.x, p.y))
            .map_err(|e: InsertionError| GeometryError::Degenerate(format!("CDT insert: {e}")))?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from != to && cdt.can_add_constraint(from, to) {
            cdt.add_constraint(from, to);
        }
    }
    Ok(())
}

/// Number of constraint edges crossed to reach every inner face from the
/// outer face, by breadth-first flood fill.
fn constraint_depths(cdt: &Cdt) -> HashMap<usize, u32> {
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();
    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer_fix {
            continue;
        }
        if let Some(inner) = edge.rev().face().as_inner() {
            let idx = inner.fix().index();
            if depth_map.contains_key(&idx) {
                continue;
            }
            let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(idx, depth);
            queue.push_back((inner.fix(), depth));
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        for edge in cdt.face(face_fix).adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let n_idx = neighbor.fix().index();
            if depth_map.contains_key(&n_idx) {
                continue;
            }
            let next = depth + u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(n_idx, next);
            queue.push_back((neighbor.fix(), next));
        }
    }

    depth_map
}
