pub mod display;
pub mod hints;
pub mod ledger;
pub mod toast;
