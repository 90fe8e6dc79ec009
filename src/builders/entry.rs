use std::sync::Arc;

use crate::builders::{ListBuilder, SingleObjectBuilder};
use crate::construction::ObjectFactory;
use crate::naming::Properties;
use crate::settings::BuilderSettings;

/// Entry point: hands out list and single-object builders sharing one set of
/// [`BuilderSettings`].
///
/// ```
/// use fixture_forge::Builder;
///
/// #[derive(Default)]
/// struct Product {
///     sku: String,
///     stock: u32,
/// }
/// fixture_forge::impl_properties!(Product { sku, stock });
///
/// let builder = Builder::new();
/// let products = builder
///     .create_list_of_size::<Product>(10)
///     .the_first(5)?
///     .with(|product| product.stock = 0)
///     .build()?;
/// assert_eq!(products[9].sku, "sku10");
/// assert_eq!(products[4].stock, 0);
///
/// let single = builder.create_new::<Product>().build()?;
/// assert_eq!(single.sku, "sku1");
/// # Ok::<(), fixture_forge::ForgeError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    settings: Arc<BuilderSettings>,
}

impl Builder {
    /// A builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder using `settings`.
    #[must_use]
    pub fn with_settings(settings: BuilderSettings) -> Self {
        Self::with_shared_settings(Arc::new(settings))
    }

    /// A builder using settings shared with other builders.
    #[must_use]
    pub fn with_shared_settings(settings: Arc<BuilderSettings>) -> Self {
        Self { settings }
    }

    /// The settings handed to every builder created here.
    #[must_use]
    pub fn settings(&self) -> &Arc<BuilderSettings> {
        &self.settings
    }

    /// Starts a list of `size` objects created with [`Default`].
    pub fn create_list_of_size<T: Properties + Default + 'static>(
        &self,
        size: usize,
    ) -> ListBuilder<T> {
        ListBuilder::new(size).with_settings(Arc::clone(&self.settings))
    }

    /// Starts a list of `size` objects created by `factory`.
    pub fn create_list_of_size_with_factory<T: Properties + 'static>(
        &self,
        size: usize,
        factory: impl ObjectFactory<T> + 'static,
    ) -> ListBuilder<T> {
        ListBuilder::with_factory(size, factory).with_settings(Arc::clone(&self.settings))
    }

    /// Starts a single object created with [`Default`].
    pub fn create_new<T: Properties + Default + 'static>(&self) -> SingleObjectBuilder<T> {
        SingleObjectBuilder::new().with_settings(Arc::clone(&self.settings))
    }

    /// Starts a single object created by `factory`.
    pub fn create_new_with_factory<T: Properties + 'static>(
        &self,
        factory: impl ObjectFactory<T> + 'static,
    ) -> SingleObjectBuilder<T> {
        SingleObjectBuilder::with_factory(factory).with_settings(Arc::clone(&self.settings))
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
    use crate::construction::RequiresArguments;
    use crate::ForgeError;

    #[derive(Debug, Default)]
    struct Part {
        name: String,
    }
    crate::impl_properties!(Part { name });

    #[test]
    fn builders_share_settings() {
        let mut settings = BuilderSettings::new();
        settings.auto_name_properties = false;
        let builder = Builder::with_settings(settings);
        let parts = builder.create_list_of_size::<Part>(2).build().unwrap();
        assert!(parts.iter().all(|part| part.name.is_empty()));
        let part = builder.create_new::<Part>().build().unwrap();
        assert!(part.name.is_empty());
        assert!(!builder.settings().auto_name_properties);
    }

    #[test]
    fn factory_variants_propagate_construction_errors() {
        let builder = Builder::new();
        let err = builder
            .create_list_of_size_with_factory::<Part>(2, RequiresArguments::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, ForgeError::ConstructionNotSupported { .. }));

        let err = builder
            .create_new_with_factory::<Part>(RequiresArguments::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, ForgeError::ConstructionNotSupported { .. }));
    }
}
