//! Form field model for quoteform.
//!
//! A product describes its quote form as an ordered list of
//! [`FormFieldConfig`]s. User input lives in a [`ValueMap`], and each field
//! validates its own value against the [`FieldConstraint`]s it carries.

pub mod config;
pub mod constraint;
pub mod error;
pub mod kind;
pub mod option;
pub mod values;

pub mod prelude {
    pub use crate::config::FormFieldConfig;
    pub use crate::constraint::FieldConstraint;
    pub use crate::error::FieldError;
    pub use crate::kind::FieldKind;
    pub use crate::option::SelectOption;
    pub use crate::values::ValueMap;
}
