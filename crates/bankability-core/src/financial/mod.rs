//! Multi-year pro forma and the summary metrics lenders screen on.

pub mod pro_forma;

pub use pro_forma::{
    build_pro_forma, run_financial_model, CashFlowYear, FinancialResult, DSCR_SENTINEL,
};
