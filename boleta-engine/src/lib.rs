//! boleta-engine: charge-computation engine for a metered water utility.
//!
//! Turns a customer's metered consumption for a billing period into a fully
//! itemized, tax-correct boleta: tariff resolution over both rate schemas,
//! subsidy calculation under the legacy and revised formulas, discount
//! aggregation, tariff-derived reconnection charges, fine folding into the
//! taxable base, and the IVA net/tax split. Fines and reconnection events
//! are consumed exactly once across concurrent runs via conditional claims
//! at the repository boundary.

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod repository;
pub mod seed;
