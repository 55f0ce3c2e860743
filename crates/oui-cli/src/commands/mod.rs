pub mod lookup;
pub mod update;
