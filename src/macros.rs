//! Macros for building contexts, activities and traced errors.
//!
//! # Examples
//!
//! ```
//! use activity_feed::{activity, context, ActivityLevel};
//!
//! let ctx = context! {
//!     "user_id" => 42,
//!     "action" => "login",
//! };
//! assert_eq!(ctx.len(), 2);
//!
//! let activity = activity!(ActivityLevel::Info, "user-login", "User logged in",
//!     "user_id" => 42,
//! )
//! .unwrap();
//! assert_eq!(activity.entries().len(), 1);
//! ```

/// Build a [`Context`](crate::Context) from `key => value` pairs, in order.
///
/// # Examples
///
/// ```
/// use activity_feed::context;
///
/// let empty = context! {};
/// assert!(empty.is_empty());
///
/// let ctx = context! { "filename" => "example.pdf", "size" => 1024 };
/// assert_eq!(ctx.keys().collect::<Vec<_>>(), vec!["filename", "size"]);
/// ```
#[macro_export]
macro_rules! context {
    () => {
        $crate::Context::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut context = $crate::Context::new();
        $(
            context.insert($key, $value);
        )+
        context
    }};
}

/// Build an activity, returning `Result<Activity>`.
///
/// # Examples
///
/// ```
/// use activity_feed::{activity, ActivityLevel};
///
/// let saved = activity!(ActivityLevel::Debug, "file-saved", "File saved").unwrap();
/// assert!(saved.entries().is_empty());
///
/// assert!(activity!(ActivityLevel::Debug, "", "File saved").is_err());
/// ```
#[macro_export]
macro_rules! activity {
    ($level:expr, $identifier:expr, $message:expr $(,)?) => {
        $crate::Activity::new($level, $identifier, $message, $crate::Context::new())
    };
    ($level:expr, $identifier:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        $crate::Activity::new(
            $level,
            $identifier,
            $message,
            $crate::context! { $($key => $value),+ },
        )
    };
}

/// Create a [`TracedError`](crate::TracedError) with a formatted message and
/// the current module, file and line as its first frame.
///
/// # Examples
///
/// ```
/// use activity_feed::traced_error;
///
/// let id = 7;
/// let error = traced_error!("Order {} could not be shipped", id);
/// assert_eq!(error.message(), Some("Order 7 could not be shipped"));
/// assert_eq!(error.frames().len(), 1);
/// ```
#[macro_export]
macro_rules! traced_error {
    ($($arg:tt)+) => {
        $crate::TracedError::new(format!($($arg)+)).at($crate::StackFrame::new(
            module_path!(),
            file!(),
            line!(),
        ))
    };
}

/// Implement `Serialize` for [`MaskedValue`](crate::MaskedValue) types so
/// they write their mask instead of their data, at any depth.
///
/// # Examples
///
/// ```
/// use activity_feed::{impl_masked_serialize, ContextSerializer, ContextValue, MaskedValue};
///
/// struct CardNumber(String);
///
/// impl MaskedValue for CardNumber {}
/// impl_masked_serialize!(CardNumber);
///
/// let cards = vec![CardNumber("4111111111111111".into())];
/// let value = ContextSerializer::new().to_context_value(&cards).unwrap();
/// assert_eq!(value, ContextValue::Sequence(vec![ContextValue::Masked("*****".into())]));
/// ```
#[macro_export]
macro_rules! impl_masked_serialize {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::masking::__private::Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
                where
                    S: $crate::masking::__private::Serializer,
                {
                    $crate::masking::serialize(self, serializer)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use crate::{ActivityLevel, ContextValue};

    #[test]
    fn test_context_macro_keeps_order() {
        let ctx = context! {
            "b" => 1,
            "a" => "two",
            "c" => true,
        };

        assert_eq!(ctx.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(ctx.get("c"), Some(&ContextValue::Bool(true)));
    }

    #[test]
    fn test_activity_macro_with_context() {
        let activity = activity!(ActivityLevel::Warn, "quota-near", "Quota nearly used",
            "used" => 95,
            "limit" => 100,
        )
        .unwrap();

        assert_eq!(activity.level(), ActivityLevel::Warn);
        assert_eq!(activity.entries().len(), 2);
    }

    #[test]
    fn test_traced_error_captures_location() {
        let error = traced_error!("boom");

        let frame = &error.frames()[0];
        assert_eq!(frame.module_path(), module_path!());
        assert_eq!(frame.file(), file!());
    }
}
