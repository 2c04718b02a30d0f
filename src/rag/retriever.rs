use super::chunker::Segment;

/// A retrieved segment paired with its distance to the query.
#[derive(Debug, Clone)]
pub struct Retrieved {
    pub segment: Segment,
    pub distance: f32,
}

/// Map raw index hits back to their segments, preserving the index's
/// ascending distance order.
pub fn resolve_hits(segments: &[Segment], hits: &[(usize, f32)]) -> Vec<Retrieved> {
    hits.iter()
        .filter_map(|(idx, distance)| {
            segments.get(*idx).map(|segment| Retrieved {
                segment: segment.clone(),
                distance: *distance,
            })
        })
        .collect()
}
