pub mod composer;
pub mod lookup;
pub mod notation;

pub use composer::full_path;
pub use lookup::{lookup, lookup_csv_record, lookup_path};
pub use notation::{to_access_expr, to_access_path};
