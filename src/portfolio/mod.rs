//! Portfolio input model: allocations, deposits, withdrawals

mod data;
pub mod loader;

pub use data::{
    build_deposits, parse_withdrawals, term_with_duration, AllocationRow, Deposit,
    InitialTranches, ProjectionInput, ReinvestOption, Withdrawal, WithdrawalRow,
    DEFAULT_REINVEST_MONTHS, MONEY_TOLERANCE,
};
