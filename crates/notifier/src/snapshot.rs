use std::collections::HashMap;

use mentor_common::types::{MentorshipRequest, RequestStatus};

/// Last observed status of every request, per direction.
///
/// Immutable once built; a check-cycle replaces the whole snapshot instead of
/// editing it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    incoming: HashMap<i64, RequestStatus>,
    outgoing: HashMap<i64, RequestStatus>,
}

impl Snapshot {
    pub fn from_requests(incoming: &[MentorshipRequest], outgoing: &[MentorshipRequest]) -> Self {
        Self {
            incoming: status_map(incoming),
            outgoing: status_map(outgoing),
        }
    }

    pub fn incoming_status(&self, id: i64) -> Option<RequestStatus> {
        self.incoming.get(&id).copied()
    }

    pub fn outgoing_status(&self, id: i64) -> Option<RequestStatus> {
        self.outgoing.get(&id).copied()
    }

    /// Number of incoming requests still waiting for an answer.
    pub fn pending_incoming(&self) -> usize {
        self.incoming.values().filter(|s| s.is_pending()).count()
    }

    pub fn incoming_len(&self) -> usize {
        self.incoming.len()
    }

    pub fn outgoing_len(&self) -> usize {
        self.outgoing.len()
    }
}

fn status_map(requests: &[MentorshipRequest]) -> HashMap<i64, RequestStatus> {
    requests.iter().map(|r| (r.id, r.status)).collect()
}
