pub mod ledger;
pub mod scramble;
pub mod selection;
pub mod stats;
pub mod timer;
