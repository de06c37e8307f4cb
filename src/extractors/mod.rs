//! Request extractors whose rejections surface as `FormatError` envelopes.

mod json;
mod operator;

pub use json::{FormatJson, FormatPath, FormatQuery};
pub use operator::{Operator, OPERATOR_ID_HEADER};
