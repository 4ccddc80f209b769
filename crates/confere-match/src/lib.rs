pub mod engine;
pub mod error;
pub mod index;
pub mod key;
pub mod value;

pub use engine::{
    MatchOptions, PropagationPolicy, Reconciliation, ReconciledDataset, reconcile,
};
pub use error::{MatchError, Result};
pub use index::{KeyIndex, KeyTuple, key_tuple};
pub use key::KeyFieldSet;
pub use value::{Canonical, KeyValue, ParseOptions, canonicalize, parse_amount, parse_date};
