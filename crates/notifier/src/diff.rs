//! Transition detection between two polls.
//!
//! Only two shapes of change are observable:
//! - incoming: absent → pending (a new request arrived)
//! - outgoing: pending → accepted / pending → rejected
//!
//! Everything else (ids disappearing, non-pending → non-pending, brand new
//! outgoing requests) is ignored.

use mentor_common::types::{MentorshipRequest, RequestStatus};

use crate::snapshot::Snapshot;

/// A status transition worth telling the user about.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestEvent {
    NewIncoming(MentorshipRequest),
    Accepted(MentorshipRequest),
    Rejected(MentorshipRequest),
}

impl RequestEvent {
    pub fn request(&self) -> &MentorshipRequest {
        match self {
            RequestEvent::NewIncoming(r) | RequestEvent::Accepted(r) | RequestEvent::Rejected(r) => r,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            RequestEvent::NewIncoming(_) => "new_incoming",
            RequestEvent::Accepted(_) => "accepted",
            RequestEvent::Rejected(_) => "rejected",
        }
    }
}

/// Compare freshly fetched requests against the previous snapshot.
///
/// Events come out grouped: new incoming first, then accepted, then rejected,
/// each group in fetch order.
pub fn detect_transitions(
    previous: &Snapshot,
    incoming: &[MentorshipRequest],
    outgoing: &[MentorshipRequest],
) -> Vec<RequestEvent> {
    let new_incoming = incoming
        .iter()
        .filter(|r| previous.incoming_status(r.id).is_none() && r.status.is_pending())
        .cloned()
        .map(RequestEvent::NewIncoming);

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for request in outgoing {
        if previous.outgoing_status(request.id) != Some(RequestStatus::Pending) {
            continue;
        }
        match request.status {
            RequestStatus::Accepted => accepted.push(RequestEvent::Accepted(request.clone())),
            RequestStatus::Rejected => rejected.push(RequestEvent::Rejected(request.clone())),
            RequestStatus::Pending => {}
        }
    }

    new_incoming.chain(accepted).chain(rejected).collect()
}
