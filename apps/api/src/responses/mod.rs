// Candidate Response Management
// Implements: call view (details + analytics), response lookup, candidate status changes, deletion.
// Analytics are produced through generation::handlers::analytics_for_call, never computed here.

pub mod handlers;
