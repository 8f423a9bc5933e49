//! The charge-computation pipeline.
//!
//! Each stage is a pure function over resolved records; `assembler` wires
//! them in the mandated order and owns the Draft -> Computed -> Finalized
//! lifecycle.

pub mod assembler;
pub mod base_charge;
pub mod discount;
pub mod fine;
pub mod interest;
pub mod iva;
pub mod reposicion;
pub mod rounding;
pub mod subsidy;
pub mod tariff;

pub use assembler::{
    compute_breakdown, BillingEngine, BoletaInputs, FinalizeOptions, DEFAULT_DUE_DAYS,
};
pub use base_charge::base_charges;
pub use discount::discount_total;
pub use fine::{split_pending, FineSplit};
pub use interest::late_payment_interest;
pub use iva::{iva_split, IvaSplit};
pub use reposicion::{
    select_eligible, select_from_cache, ReposicionCache, ReposicionSelection, SelectedReposicion,
};
pub use rounding::round_half_up;
pub use subsidy::{
    resolve_assignment, resolve_subsidy, subsidy_amount, subsidy_amount_for_tariff,
    uses_new_formula, NEW_FORMULA_EFFECTIVE,
};
pub use tariff::effective_on;
