//! Wire types for the Open Loyalty Admin API.
//!
//! Everything a dashboard frontend (or a typed client) needs to talk to
//! `olad-server`: the uniform response envelope, the pagination block, and
//! the per-resource request/response objects.

pub mod objects;
