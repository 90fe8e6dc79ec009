use std::any::type_name;
use std::sync::Arc;

use crate::builders::declaration::Constructor;
use crate::construction::{DefaultFactory, ObjectFactory};
use crate::error::{ForgeError, ForgeResult};
use crate::naming::Properties;
use crate::settings::BuilderSettings;

type SingleAction<T> = Box<dyn FnMut(&mut T)>;

/// Builds one fixture object.
///
/// The object is named as the first of its type, then the [`with`](Self::with)
/// actions run, then the [`and_do`](Self::and_do) actions.
///
/// ```
/// use fixture_forge::SingleObjectBuilder;
///
/// #[derive(Default)]
/// struct Invoice {
///     number: u32,
///     note: String,
/// }
/// fixture_forge::impl_properties!(Invoice { number, note });
///
/// let invoice = SingleObjectBuilder::<Invoice>::new()
///     .with(|invoice| invoice.note = "rush".to_owned())
///     .build()?;
/// assert_eq!(invoice.number, 1);
/// assert_eq!(invoice.note, "rush");
/// # Ok::<(), fixture_forge::ForgeError>(())
/// ```
#[must_use = "SingleObjectBuilder produces nothing until build() is called"]
pub struct SingleObjectBuilder<T> {
    factory: Box<dyn ObjectFactory<T>>,
    settings: Arc<BuilderSettings>,
    mutate_actions: Vec<SingleAction<T>>,
    side_effect_actions: Vec<SingleAction<T>>,
    constructor: Option<Constructor<T>>,
}

impl<T> std::fmt::Debug for SingleObjectBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            factory,
            settings,
            mutate_actions,
            side_effect_actions,
            constructor,
        } = self;

        f.debug_struct("SingleObjectBuilder")
            .field("type", &type_name::<T>())
            .field("requires_constructor_args", &factory.requires_constructor_args())
            .field("settings", settings)
            .field("mutate_actions", &mutate_actions.len())
            .field("side_effect_actions", &side_effect_actions.len())
            .field("has_constructor", &constructor.is_some())
            .finish()
    }
}

impl<T: Properties + Default + 'static> SingleObjectBuilder<T> {
    /// A builder for an object created with [`Default`].
    pub fn new() -> Self {
        Self::with_factory(DefaultFactory)
    }
}

impl<T: Properties + Default + 'static> Default for SingleObjectBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Properties + 'static> SingleObjectBuilder<T> {
    /// A builder for an object created by `factory`.
    pub fn with_factory(factory: impl ObjectFactory<T> + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            settings: Arc::new(BuilderSettings::default()),
            mutate_actions: Vec::new(),
            side_effect_actions: Vec::new(),
            constructor: None,
        }
    }

    /// Uses `settings` for naming.
    pub fn with_settings(mut self, settings: Arc<BuilderSettings>) -> Self {
        self.settings = settings;
        self
    }

    /// Adds an action setting values on the object.
    pub fn with(mut self, action: impl FnMut(&mut T) + 'static) -> Self {
        self.mutate_actions.push(Box::new(action));
        self
    }

    /// Adds a side-effect action, run after every mutate action.
    pub fn and_do(mut self, action: impl FnMut(&mut T) + 'static) -> Self {
        self.side_effect_actions.push(Box::new(action));
        self
    }

    /// Creates the object with `constructor` instead of the factory.
    pub fn with_constructor(mut self, constructor: impl Fn() -> T + 'static) -> Self {
        self.constructor = Some(Box::new(constructor));
        self
    }

    /// Creates, names and decorates the object.
    ///
    /// # Errors
    /// Returns [`ConstructionNotSupported`] when the type needs constructor
    /// arguments and no constructor was supplied.
    ///
    /// [`ConstructionNotSupported`]: ForgeError::ConstructionNotSupported
    pub fn build(self) -> ForgeResult<T> {
        let Self {
            factory,
            settings,
            mut mutate_actions,
            mut side_effect_actions,
            constructor,
        } = self;

        let mut object = match constructor {
            Some(constructor) => constructor(),
            None if factory.requires_constructor_args() => {
                return Err(ForgeError::ConstructionNotSupported {
                    type_name: type_name::<T>(),
                });
            },
            None => factory.create_instance()?,
        };

        if let Some(namer) = settings.property_namer_for::<T>() {
            namer.set_values_of(&mut object);
        }
        for action in mutate_actions.iter_mut().chain(side_effect_actions.iter_mut()) {
            action(&mut object);
        }
        tracing::debug!(fixture = type_name::<T>(), "single object built");
        Ok(object)
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

    #[derive(Debug, Default, PartialEq)]
    struct Ticket {
        code: String,
        seat: u16,
        log: Vec<&'static str>,
    }
    crate::impl_properties!(Ticket { code, seat });

    #[test]
    fn single_object_is_named_first() {
        let ticket = SingleObjectBuilder::<Ticket>::new().build().unwrap();
        assert_eq!(ticket.code, "code1");
        assert_eq!(ticket.seat, 1);
    }

    #[test]
    fn mutations_run_before_side_effects() {
        let ticket = SingleObjectBuilder::<Ticket>::new()
            .and_do(|ticket| ticket.log.push("side"))
            .with(|ticket| ticket.log.push("mutate"))
            .build()
            .unwrap();
        assert_eq!(ticket.log, vec!["mutate", "side"]);
    }

    #[test]
    fn with_overrides_the_named_value() {
        let ticket = SingleObjectBuilder::<Ticket>::new()
            .with(|ticket| ticket.seat = 42)
            .build()
            .unwrap();
        assert_eq!(ticket.seat, 42);
        assert_eq!(ticket.code, "code1");
    }

    #[test]
    fn requires_arguments_needs_a_constructor() {
        let err = SingleObjectBuilder::<Ticket>::with_factory(RequiresArguments::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, ForgeError::ConstructionNotSupported { .. }));

        let ticket = SingleObjectBuilder::<Ticket>::with_factory(RequiresArguments::new())
            .with_constructor(|| Ticket {
                seat: 9,
                ..Ticket::default()
            })
            .build()
            .unwrap();
        assert_eq!(ticket.code, "code1");
    }

    #[test]
    fn auto_naming_can_be_disabled() {
        let mut settings = BuilderSettings::new();
        settings.auto_name_properties = false;
        let ticket = SingleObjectBuilder::<Ticket>::new()
            .with_settings(Arc::new(settings))
            .build()
            .unwrap();
        assert_eq!(ticket, Ticket::default());
    }
}
