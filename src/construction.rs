//! How fixture objects come into existence before naming and declarations run.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{ForgeError, ForgeResult};

/// Creates the instances of a list.
///
/// A factory that [`requires_constructor_args`](Self::requires_constructor_args)
/// cannot build objects on its own; every position of a list using it must be
/// covered by a declaration that supplies a constructor.
pub trait ObjectFactory<T> {
    /// Whether instances can only be created from caller-supplied arguments.
    fn requires_constructor_args(&self) -> bool {
        false
    }

    /// Creates one instance.
    fn create_instance(&self) -> ForgeResult<T>;
}

/// Builds instances with [`Default`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultFactory;

impl<T: Default> ObjectFactory<T> for DefaultFactory {
    fn create_instance(&self) -> ForgeResult<T> {
        Ok(T::default())
    }
}

/// Marks a type that has no argument-free way to be built.
///
/// ```
/// use fixture_forge::construction::RequiresArguments;
/// use fixture_forge::{ForgeError, ListBuilder, Properties, PropertyVisitor};
///
/// struct Account {
///     owner: String,
/// }
///
/// impl Properties for Account {
///     fn visit_properties(&mut self, _visitor: &mut dyn PropertyVisitor) {}
/// }
///
/// let result = ListBuilder::<Account>::with_factory(2, RequiresArguments::new()).build();
/// assert!(matches!(result, Err(ForgeError::ConstructionNotSupported { .. })));
///
/// let accounts = ListBuilder::<Account>::with_factory(2, RequiresArguments::new())
///     .all()
///     .with_constructor(|| Account { owner: "root".to_owned() })
///     .build()?;
/// assert_eq!(accounts[1].owner, "root");
/// # Ok::<(), ForgeError>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RequiresArguments;

impl RequiresArguments {
    /// Creates the marker factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<T> ObjectFactory<T> for RequiresArguments {
    fn requires_constructor_args(&self) -> bool {
        true
    }

    fn create_instance(&self) -> ForgeResult<T> {
        Err(ForgeError::ConstructionNotSupported {
            type_name: std::any::type_name::<T>(),
        })
    }
}

/// Builds instances by calling a closure.
pub struct FnFactory<T, F> {
    constructor: F,
    _marker: PhantomData<fn() -> T>,
}

impl<T, F: Fn() -> T> FnFactory<T, F> {
    /// Wraps `constructor`.
    #[must_use]
    pub fn new(constructor: F) -> Self {
        Self {
            constructor,
            _marker: PhantomData,
        }
    }
}

impl<T, F: Fn() -> T> ObjectFactory<T> for FnFactory<T, F> {
    fn create_instance(&self) -> ForgeResult<T> {
        Ok((self.constructor)())
    }
}

impl<T, F> fmt::Debug for FnFactory<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFactory")
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn default_factory_uses_default() {
        let value: u32 = ObjectFactory::<u32>::create_instance(&DefaultFactory).unwrap();
        assert_eq!(value, 0);
        assert!(!ObjectFactory::<u32>::requires_constructor_args(&DefaultFactory));
    }

    #[test]
    fn requires_arguments_refuses_to_build() {
        let factory = RequiresArguments::new();
        assert!(ObjectFactory::<String>::requires_constructor_args(&factory));
        let err = ObjectFactory::<String>::create_instance(&factory).unwrap_err();
        assert_eq!(
            err,
            ForgeError::ConstructionNotSupported {
                type_name: "alloc::string::String"
            }
        );
    }

    #[test]
    fn fn_factory_calls_the_closure_each_time() {
        let calls = Cell::new(0);
        let factory = FnFactory::new(|| {
            calls.set(calls.get() + 1);
            calls.get() * 10
        });
        assert_eq!(factory.create_instance().unwrap(), 10);
        assert_eq!(factory.create_instance().unwrap(), 20);
        assert!(!factory.requires_constructor_args());
        assert!(format!("{factory:?}").contains("FnFactory"));
    }
}
