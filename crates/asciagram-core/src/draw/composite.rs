use serde::Serialize;

/// An open figure assembled from several traced polylines.
///
/// Members are indices into the owning diagram's flat shape arena, in
/// the order the polylines were traced. The member shapes share line
/// styling: if one traced segment was dashed, all members are dashed.
#[derive(Debug, Clone, Serialize)]
pub struct CompositeShape {
    members: Vec<usize>,
}

impl CompositeShape {
    pub fn new(members: Vec<usize>) -> Self {
        Self { members }
    }

    /// Arena indices of the member shapes.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
