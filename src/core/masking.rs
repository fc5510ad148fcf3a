//! Masking of sensitive context values
//!
//! A type declares itself sensitive by implementing [`MaskedValue`]. When such
//! a value reaches a [`Context`](super::context::Context), either directly or
//! through the [`ContextSerializer`](super::serializer::ContextSerializer),
//! only its mask text is kept.
//!
//! [`Masked`] wraps any value together with the mask strategy to apply:
//!
//! ```
//! use activity_feed::masking::{Masked, DEFAULT_MASK};
//! use activity_feed::MaskedValue;
//!
//! let card = Masked::new("4111 1111 1111 1111");
//! assert_eq!(card.masked_value(), DEFAULT_MASK);
//!
//! let token = Masked::with_literal("s3cr3t", "REDACTED");
//! assert_eq!(token.masked_value(), "REDACTED");
//!
//! let name = Masked::with("Jane Doe", |name: &&str, out: &mut String| {
//!     activity_feed::masking::reveal_edges(name, out)
//! });
//! assert_eq!(name.masked_value(), "J*****e");
//! ```

use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Mask written in place of a sensitive value when nothing else is configured
pub const DEFAULT_MASK: &str = "*****";

/// Newtype name the context serializer recognises as already-masked text
pub(crate) const MASKED_TOKEN: &str = "$activity_feed::private::Masked";

/// Capability of a value whose real content must never be serialized
pub trait MaskedValue {
    /// Text written instead of the real value
    fn masked_value(&self) -> String {
        DEFAULT_MASK.to_string()
    }
}

/// Function producing the mask for a value into an output buffer
pub type MaskFn<T> = Arc<dyn Fn(&T, &mut String) + Send + Sync>;

/// Strategy used by [`Masked`] to replace its value
pub enum Mask<T: ?Sized> {
    /// Replace with [`DEFAULT_MASK`]
    Default,
    /// Replace with a fixed literal
    Literal(String),
    /// Replace with whatever the function writes
    With(MaskFn<T>),
}

impl<T: ?Sized> Mask<T> {
    fn apply(&self, value: &T) -> String {
        match self {
            Mask::Default => DEFAULT_MASK.to_string(),
            Mask::Literal(literal) => literal.clone(),
            Mask::With(mask) => {
                let mut out = String::new();
                mask(value, &mut out);
                out
            }
        }
    }
}

impl<T: ?Sized> Clone for Mask<T> {
    fn clone(&self) -> Self {
        match self {
            Mask::Default => Mask::Default,
            Mask::Literal(literal) => Mask::Literal(literal.clone()),
            Mask::With(mask) => Mask::With(Arc::clone(mask)),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Mask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mask::Default => write!(f, "Default"),
            Mask::Literal(literal) => f.debug_tuple("Literal").field(literal).finish(),
            Mask::With(_) => write!(f, "With(..)"),
        }
    }
}

/// A value paired with the mask that replaces it on output
#[derive(Clone)]
pub struct Masked<T> {
    value: T,
    mask: Mask<T>,
}

impl<T> Masked<T> {
    /// Mask with [`DEFAULT_MASK`]
    pub fn new(value: T) -> Self {
        Self {
            value,
            mask: Mask::Default,
        }
    }

    /// Mask with a caller supplied literal
    pub fn with_literal(value: T, literal: impl Into<String>) -> Self {
        Self {
            value,
            mask: Mask::Literal(literal.into()),
        }
    }

    /// Mask with a function that writes the replacement text
    pub fn with<F>(value: T, mask: F) -> Self
    where
        F: Fn(&T, &mut String) + Send + Sync + 'static,
    {
        Self {
            value,
            mask: Mask::With(Arc::new(mask)),
        }
    }

    /// Borrow the real value, for application code only
    pub fn expose(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> MaskedValue for Masked<T> {
    fn masked_value(&self) -> String {
        self.mask.apply(&self.value)
    }
}

// Debug output goes to logs too, so it shows the mask rather than the value.
impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Masked").field(&self.masked_value()).finish()
    }
}

impl<T> Serialize for Masked<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize(self, serializer)
    }
}

/// Serialize any [`MaskedValue`] as its mask
///
/// Meant for `#[serde(serialize_with = "activity_feed::masking::serialize")]`
/// on fields whose type implements [`MaskedValue`]. To mask a type wherever
/// it appears (inside `Vec`, `Option`, map values) give it a masking
/// `Serialize` impl with [`impl_masked_serialize!`](crate::impl_masked_serialize).
pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: MaskedValue + ?Sized,
    S: Serializer,
{
    serializer.serialize_newtype_struct(MASKED_TOKEN, &value.masked_value())
}

#[doc(hidden)]
pub mod __private {
    pub use serde::{Serialize, Serializer};
}

/// Write `text` with everything but its first and last character replaced by
/// [`DEFAULT_MASK`]. Texts of two characters or fewer are fully masked.
pub fn reveal_edges(text: &str, out: &mut String) {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if text.chars().count() > 2 => {
            out.push(first);
            out.push_str(DEFAULT_MASK);
            out.push(last);
        }
        _ => out.push_str(DEFAULT_MASK),
    }
}
