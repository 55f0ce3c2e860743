pub mod lookup;

#[cfg(test)]
pub mod test_helpers;

pub use lookup::LookupEngine;
