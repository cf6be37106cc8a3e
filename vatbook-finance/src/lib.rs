//! vatbook-finance: category rules, line apportionment, period reports, and the VAT return

pub mod apportion;
pub mod category_rules;
pub mod declaration;
pub mod payable;
pub mod report;
pub mod selection;
pub mod vat_math;

pub use apportion::{ResolvedLine, resolve_lines};
pub use category_rules::{Classification, classify, classify_parsed, explain};
pub use declaration::{Declaration, declare, derive_code};
pub use payable::{PayableStatus, PayableSummary};
pub use report::{VatReport, aggregate};
pub use selection::Coverage;
pub use vat_math::{VatAmount, VatCheck, calculate_vat, default_rate, validate_vat};
