//! Response envelopes for the perk endpoints.
//!
//! Single records are wrapped as `{ "perk": ... }`, collections as
//! `{ "perks": [...] }`, and deletions acknowledge with `{ "ok": true }`.

use serde::Serialize;

/// `{ "perk": T }` envelope for a single record.
#[derive(Debug, Serialize)]
pub struct PerkResponse<T: Serialize> {
    pub perk: T,
}

/// `{ "perks": [T] }` envelope for a list of records.
#[derive(Debug, Serialize)]
pub struct PerkListResponse<T: Serialize> {
    pub perks: Vec<T>,
}

/// `{ "ok": true }` acknowledgment with no body.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub ok: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
