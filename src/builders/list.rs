//! The list construction engine and its fluent surface.

use std::any::type_name;
use std::sync::Arc;

use crate::builders::declaration::{Declaration, ResolvedIndices, Section};
use crate::construction::{DefaultFactory, FnFactory, ObjectFactory};
use crate::error::{ForgeError, ForgeResult, InvalidRangeKind};
use crate::naming::Properties;
use crate::picking::{Constraint, UniqueRandomGenerator, UniqueSession};
use crate::settings::BuilderSettings;
use crate::telemetry::{
    report_to_observer, BuildViolation, ViolationKind, ViolationObserver, ViolationSeverity,
};

/// Builds a list of `capacity` fixture objects from declarations.
///
/// Declarations are registered through the section openers ([`all`],
/// [`the_first`], [`random`], ...) and applied by [`build`] in registration
/// order, so a later declaration wins where two of them set the same property
/// on the same object.
///
/// ```
/// use fixture_forge::ListBuilder;
///
/// #[derive(Default)]
/// struct Order {
///     reference: String,
///     paid: bool,
/// }
/// fixture_forge::impl_properties!(Order { reference });
///
/// let orders = ListBuilder::<Order>::new(4)
///     .the_first(2)?
///     .with(|order| order.paid = true)
///     .the_next(2)?
///     .with(|order| order.reference = "late".to_owned())
///     .build()?;
///
/// assert_eq!(orders[0].reference, "reference1");
/// assert!(orders[1].paid);
/// assert_eq!(orders[3].reference, "late");
/// assert!(!orders[3].paid);
/// # Ok::<(), fixture_forge::ForgeError>(())
/// ```
///
/// [`all`]: Self::all
/// [`the_first`]: Self::the_first
/// [`random`]: Self::random
/// [`build`]: Self::build
#[must_use = "ListBuilder produces nothing until build() is called"]
pub struct ListBuilder<T> {
    capacity: usize,
    declarations: Vec<Declaration<T>>,
    factory: Box<dyn ObjectFactory<T>>,
    settings: Arc<BuilderSettings>,
    /// Replaces the per-build [`UniqueSession`] when set.
    generator: Option<Box<dyn UniqueRandomGenerator>>,
    violation_observer: Option<Arc<dyn ViolationObserver>>,
}

impl<T> std::fmt::Debug for ListBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Destructure to ensure all fields are included when new fields are added.
        let Self {
            capacity,
            declarations,
            factory,
            settings,
            generator,
            violation_observer,
        } = self;

        f.debug_struct("ListBuilder")
            .field("type", &type_name::<T>())
            .field("capacity", capacity)
            .field("declarations", declarations)
            .field("requires_constructor_args", &factory.requires_constructor_args())
            .field("settings", settings)
            .field("has_custom_generator", &generator.is_some())
            .field("has_violation_observer", &violation_observer.is_some())
            .finish()
    }
}

impl<T: Properties + Default + 'static> ListBuilder<T> {
    /// A builder for `capacity` objects created with [`Default`].
    pub fn new(capacity: usize) -> Self {
        Self::with_factory(capacity, DefaultFactory)
    }
}

impl<T: Properties + 'static> ListBuilder<T> {
    /// A builder for `capacity` objects created by `factory`.
    pub fn with_factory(capacity: usize, factory: impl ObjectFactory<T> + 'static) -> Self {
        Self {
            capacity,
            declarations: Vec::new(),
            factory: Box::new(factory),
            settings: Arc::new(BuilderSettings::default()),
            generator: None,
            violation_observer: None,
        }
    }

    /// Uses `settings` for naming and seeding.
    pub fn with_settings(mut self, settings: Arc<BuilderSettings>) -> Self {
        self.settings = settings;
        self
    }

    /// Draws random sections from `generator` instead of a fresh session.
    ///
    /// The generator is reset once at the start of [`build`](Self::build).
    pub fn with_generator(mut self, generator: impl UniqueRandomGenerator + 'static) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    /// Sends build diagnostics to `observer` instead of the tracing log.
    pub fn with_violation_observer(mut self, observer: Arc<dyn ViolationObserver>) -> Self {
        self.violation_observer = Some(observer);
        self
    }

    /// Creates every object not covered by a declaration constructor with
    /// `constructor`.
    pub fn with_constructor(mut self, constructor: impl Fn() -> T + 'static) -> Self {
        self.factory = Box::new(FnFactory::new(constructor));
        self
    }

    /// Number of objects the list will hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Declarations registered so far.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration<T>] {
        &self.declarations
    }

    /// Registers a prepared declaration.
    ///
    /// # Errors
    /// Returns [`InvalidRange`] when a range section does not fit the list.
    ///
    /// [`InvalidRange`]: ForgeError::InvalidRange
    pub fn add_declaration(mut self, declaration: Declaration<T>) -> ForgeResult<Self> {
        if let Some((start, end)) = declaration.section().as_range() {
            self.check_range(start, end)?;
        }
        self.push_declaration(declaration);
        Ok(self)
    }

    /// Opens a declaration over every object.
    pub fn all(self) -> DeclarationBuilder<T> {
        self.open(Section::Global)
    }

    /// Opens a declaration over the first `count` objects.
    ///
    /// # Errors
    /// Returns [`InvalidRange`] when `count` exceeds the capacity.
    ///
    /// [`InvalidRange`]: ForgeError::InvalidRange
    pub fn the_first(self, count: usize) -> ForgeResult<DeclarationBuilder<T>> {
        self.check_range(0, count)?;
        Ok(self.open(Section::Range {
            start: 0,
            end: count,
        }))
    }

    /// Opens a declaration over the last `count` objects.
    ///
    /// # Errors
    /// Returns [`InvalidRange`] when `count` exceeds the capacity.
    ///
    /// [`InvalidRange`]: ForgeError::InvalidRange
    pub fn the_last(self, count: usize) -> ForgeResult<DeclarationBuilder<T>> {
        let capacity = self.capacity;
        let start = capacity
            .checked_sub(count)
            .ok_or(InvalidRangeKind::SectionOutOfBounds {
                start: 0,
                end: count,
                capacity,
            })?;
        Ok(self.open(Section::Range {
            start,
            end: capacity,
        }))
    }

    /// Opens a declaration over the `count` objects after the most recently
    /// declared range.
    ///
    /// # Errors
    /// Returns [`InvalidRange`] when no range was declared before, or when the
    /// section would run past the end of the list.
    ///
    /// [`InvalidRange`]: ForgeError::InvalidRange
    pub fn the_next(self, count: usize) -> ForgeResult<DeclarationBuilder<T>> {
        let (_, previous_end) = self.previous_range("the_next")?;
        let end = previous_end
            .checked_add(count)
            .ok_or(InvalidRangeKind::SectionOutOfBounds {
                start: previous_end,
                end: usize::MAX,
                capacity: self.capacity,
            })?;
        self.check_range(previous_end, end)?;
        Ok(self.open(Section::Range {
            start: previous_end,
            end,
        }))
    }

    /// Opens a declaration over the `count` objects before the most recently
    /// declared range.
    ///
    /// # Errors
    /// Returns [`InvalidRange`] when no range was declared before, or when the
    /// section would start before the first object.
    ///
    /// [`InvalidRange`]: ForgeError::InvalidRange
    pub fn the_previous(self, count: usize) -> ForgeResult<DeclarationBuilder<T>> {
        let (previous_start, _) = self.previous_range("the_previous")?;
        let start = previous_start
            .checked_sub(count)
            .ok_or(InvalidRangeKind::BeforeFirstPosition {
                count,
                end: previous_start,
            })?;
        Ok(self.open(Section::Range {
            start,
            end: previous_start,
        }))
    }

    /// Opens a declaration over `count` objects starting at position `start`.
    ///
    /// # Errors
    /// Returns [`InvalidRange`] when the section does not fit the list.
    ///
    /// [`InvalidRange`]: ForgeError::InvalidRange
    pub fn section(self, start: usize, count: usize) -> ForgeResult<DeclarationBuilder<T>> {
        let end = start
            .checked_add(count)
            .ok_or(InvalidRangeKind::SectionOutOfBounds {
                start,
                end: usize::MAX,
                capacity: self.capacity,
            })?;
        self.check_range(start, end)?;
        Ok(self.open(Section::Range { start, end }))
    }

    /// Opens a declaration over `count` distinct objects chosen at build time.
    ///
    /// Random declarations of one build never share an object. Asking for
    /// more objects than remain makes [`build`](Self::build) fail with
    /// [`ExhaustedSequence`](ForgeError::ExhaustedSequence).
    pub fn random(self, count: usize) -> DeclarationBuilder<T> {
        self.open(Section::Random {
            constraint: Constraint::UpTo(count),
        })
    }

    /// Opens a declaration over between `min` and `max` distinct objects
    /// chosen at build time.
    ///
    /// # Errors
    /// Returns [`InvalidRange`] when `min > max`.
    ///
    /// [`InvalidRange`]: ForgeError::InvalidRange
    pub fn random_between(self, min: usize, max: usize) -> ForgeResult<DeclarationBuilder<T>> {
        let constraint = Constraint::between(min, max)?;
        Ok(self.open(Section::Random { constraint }))
    }

    /// Creates, names and decorates the objects.
    ///
    /// 1. Resolves every declaration to positions; all random sections share
    ///    one session.
    /// 2. Adds an implicit catch-all when no `all()` declaration exists and
    ///    some position is not covered.
    /// 3. Creates every object, using the constructor of the last covering
    ///    declaration that has one, otherwise the list's factory.
    /// 4. Names the whole list once.
    /// 5. Applies declarations in registration order.
    ///
    /// # Errors
    /// - [`ConstructionNotSupported`] when the type needs constructor arguments
    ///   and some position has no constructor. Nothing is created in that case.
    /// - [`ExhaustedSequence`] when random sections ask for more objects than
    ///   remain.
    /// - [`InvalidRange`] for unusable sections.
    ///
    /// [`ConstructionNotSupported`]: ForgeError::ConstructionNotSupported
    /// [`ExhaustedSequence`]: ForgeError::ExhaustedSequence
    /// [`InvalidRange`]: ForgeError::InvalidRange
    pub fn build(self) -> ForgeResult<Vec<T>> {
        let Self {
            capacity,
            mut declarations,
            factory,
            settings,
            generator,
            violation_observer,
        } = self;
        let fixture = type_name::<T>();

        if factory.requires_constructor_args()
            && declarations.iter().all(|d| d.constructor().is_none())
        {
            return Err(ForgeError::ConstructionNotSupported { type_name: fixture });
        }

        let mut generator = generator
            .unwrap_or_else(|| Box::new(UniqueSession::for_build(settings.seed, fixture, capacity)));
        let mut resolved = resolve_declarations(&declarations, capacity, generator.as_mut())?;

        let mut covered = vec![false; capacity];
        for position in resolved.iter().flat_map(ResolvedIndices::iter) {
            covered[position] = true;
        }
        let uncovered = covered.iter().filter(|&&is_covered| !is_covered).count();
        if uncovered > 0 && !declarations.iter().any(|d| d.section().is_global()) {
            tracing::debug!(
                fixture,
                uncovered,
                "adding implicit catch-all declaration"
            );
            declarations.insert(0, Declaration::implicit_global());
            resolved.insert(0, ResolvedIndices::all(capacity));
        }

        let mut plan: Vec<Option<usize>> = vec![None; capacity];
        for (index, (declaration, indices)) in declarations.iter().zip(&resolved).enumerate() {
            if declaration.constructor().is_some() {
                for position in indices.iter() {
                    plan[position] = Some(index);
                }
            }
        }
        if factory.requires_constructor_args() && plan.iter().any(Option::is_none) {
            return Err(ForgeError::ConstructionNotSupported { type_name: fixture });
        }

        let mut objects = Vec::with_capacity(capacity);
        for slot in &plan {
            let constructor = slot.and_then(|index| declarations.get(index)?.constructor());
            let object = match constructor {
                Some(constructor) => constructor(),
                None => factory.create_instance()?,
            };
            objects.push(object);
        }

        let observer = violation_observer.as_ref();
        if let Some(namer) = settings.property_namer_observed::<T>(observer) {
            let mut targets: Vec<&mut dyn Properties> = objects
                .iter_mut()
                .map(|object| object as &mut dyn Properties)
                .collect();
            namer.set_values_of_all_in_observed(&mut targets, observer);
        }

        for (declaration, indices) in declarations.iter_mut().zip(&resolved) {
            tracing::trace!(
                section = %declaration.section(),
                objects = indices.len(),
                "applying declaration"
            );
            declaration.apply(&mut objects, indices, observer);
        }

        tracing::debug!(
            fixture,
            capacity,
            declarations = declarations.len(),
            "list built"
        );
        Ok(objects)
    }

    fn open(self, section: Section) -> DeclarationBuilder<T> {
        DeclarationBuilder {
            list: self,
            declaration: Declaration::new(section),
        }
    }

    fn push_declaration(&mut self, declaration: Declaration<T>) {
        if !declaration.is_implicit() && !declaration.has_effect() {
            let violation = BuildViolation::new(
                ViolationSeverity::Warning,
                ViolationKind::Declaration,
                format!(
                    "declaration over {} has no actions or constructor",
                    declaration.section()
                ),
                concat!(file!(), ":", line!()),
            )
            .with_context("section", declaration.section().to_string());
            report_to_observer(self.violation_observer.as_ref(), &violation);
        }
        self.declarations.push(declaration);
    }

    fn check_range(&self, start: usize, end: usize) -> ForgeResult<()> {
        if start > end || end > self.capacity {
            return Err(InvalidRangeKind::SectionOutOfBounds {
                start,
                end,
                capacity: self.capacity,
            }
            .into());
        }
        Ok(())
    }

    fn previous_range(&self, opener: &'static str) -> ForgeResult<(usize, usize)> {
        self.declarations
            .iter()
            .rev()
            .find_map(|declaration| declaration.section().as_range())
            .ok_or_else(|| InvalidRangeKind::NoPreviousRange { opener }.into())
    }
}

/// Resolves `declarations` against a list of `capacity` objects.
///
/// Resets `generator` once, then resolves in registration order, so random
/// sections drawn here never overlap.
pub fn resolve_declarations<T>(
    declarations: &[Declaration<T>],
    capacity: usize,
    generator: &mut dyn UniqueRandomGenerator,
) -> ForgeResult<Vec<ResolvedIndices>> {
    generator.reset();
    let resolved = declarations
        .iter()
        .map(|declaration| declaration.resolve(capacity, generator))
        .collect::<ForgeResult<Vec<_>>>()?;
    tracing::debug!(
        declarations = resolved.len(),
        positions = resolved.iter().map(ResolvedIndices::len).sum::<usize>(),
        "declarations resolved"
    );
    Ok(resolved)
}

/// An open declaration on a [`ListBuilder`].
///
/// Attach actions with [`with`](Self::with) and [`and_do`](Self::and_do), then
/// open the next section or [`build`](Self::build). The declaration is
/// registered when the next section opens or the list is built.
#[must_use = "DeclarationBuilder produces nothing until build() is called"]
pub struct DeclarationBuilder<T> {
    list: ListBuilder<T>,
    declaration: Declaration<T>,
}

impl<T> std::fmt::Debug for DeclarationBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeclarationBuilder")
            .field("list", &self.list)
            .field("declaration", &self.declaration)
            .finish()
    }
}

impl<T: Properties + 'static> DeclarationBuilder<T> {
    /// Adds an action setting values on each selected object.
    pub fn with(mut self, mut action: impl FnMut(&mut T) + 'static) -> Self {
        self.declaration
            .push_mutate(Box::new(move |object: &mut T, _: usize| action(object)));
        self
    }

    /// Like [`with`](Self::with), but the action also receives the object's
    /// list position.
    pub fn with_indexed(mut self, action: impl FnMut(&mut T, usize) + 'static) -> Self {
        self.declaration.push_mutate(Box::new(action));
        self
    }

    /// Adds a side-effect action, run after every mutate action of this
    /// declaration.
    pub fn and_do(mut self, mut action: impl FnMut(&mut T) + 'static) -> Self {
        self.declaration
            .push_side_effect(Box::new(move |object: &mut T, _: usize| action(object)));
        self
    }

    /// Like [`and_do`](Self::and_do), but the action also receives the
    /// object's list position.
    pub fn and_do_indexed(mut self, action: impl FnMut(&mut T, usize) + 'static) -> Self {
        self.declaration.push_side_effect(Box::new(action));
        self
    }

    /// Creates the selected objects with `constructor` instead of the list's
    /// factory.
    pub fn with_constructor(mut self, constructor: impl Fn() -> T + 'static) -> Self {
        self.declaration.set_constructor(Box::new(constructor));
        self
    }

    /// Registers the declaration and returns the list builder.
    pub fn done(self) -> ListBuilder<T> {
        let Self {
            mut list,
            declaration,
        } = self;
        list.push_declaration(declaration);
        list
    }

    /// See [`ListBuilder::all`].
    pub fn all(self) -> DeclarationBuilder<T> {
        self.done().all()
    }

    /// See [`ListBuilder::the_first`].
    pub fn the_first(self, count: usize) -> ForgeResult<DeclarationBuilder<T>> {
        self.done().the_first(count)
    }

    /// See [`ListBuilder::the_last`].
    pub fn the_last(self, count: usize) -> ForgeResult<DeclarationBuilder<T>> {
        self.done().the_last(count)
    }

    /// See [`ListBuilder::the_next`].
    pub fn the_next(self, count: usize) -> ForgeResult<DeclarationBuilder<T>> {
        self.done().the_next(count)
    }

    /// See [`ListBuilder::the_previous`].
    pub fn the_previous(self, count: usize) -> ForgeResult<DeclarationBuilder<T>> {
        self.done().the_previous(count)
    }

    /// See [`ListBuilder::section`].
    pub fn section(self, start: usize, count: usize) -> ForgeResult<DeclarationBuilder<T>> {
        self.done().section(start, count)
    }

    /// See [`ListBuilder::random`].
    pub fn random(self, count: usize) -> DeclarationBuilder<T> {
        self.done().random(count)
    }

    /// See [`ListBuilder::random_between`].
    pub fn random_between(self, min: usize, max: usize) -> ForgeResult<DeclarationBuilder<T>> {
        self.done().random_between(min, max)
    }

    /// Registers the declaration and builds the list; see [`ListBuilder::build`].
    pub fn build(self) -> ForgeResult<Vec<T>> {
        self.done().build()
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
    use crate::telemetry::CollectingObserver;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Slot {
        label: String,
        value: i32,
        marked: bool,
    }
    crate::impl_properties!(Slot { label, value });

    #[test]
    fn new_list_is_named_sequentially() {
        let slots = ListBuilder::<Slot>::new(3).build().unwrap();
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].label, "label1");
        assert_eq!(slots[2].value, 3);
    }

    #[test]
    fn empty_list_builds() {
        let slots = ListBuilder::<Slot>::new(0).build().unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn later_declarations_override_earlier_ones() {
        let slots = ListBuilder::<Slot>::new(4)
            .all()
            .with(|slot| slot.value = 1)
            .the_first(2)
            .unwrap()
            .with(|slot| slot.value = 2)
            .build()
            .unwrap();
        let values: Vec<i32> = slots.iter().map(|slot| slot.value).collect();
        assert_eq!(values, vec![2, 2, 1, 1]);
    }

    #[test]
    fn the_next_and_the_previous_follow_the_last_range() {
        let slots = ListBuilder::<Slot>::new(10)
            .section(3, 2)
            .unwrap()
            .with(|slot| slot.value = 1)
            .the_next(3)
            .unwrap()
            .with(|slot| slot.value = 2)
            .the_previous(2)
            .unwrap()
            .with(|slot| slot.value = 3)
            .build()
            .unwrap();
        let values: Vec<i32> = slots.iter().map(|slot| slot.value).collect();
        assert_eq!(values, vec![1, 2, 3, 3, 3, 2, 2, 2, 9, 10]);
    }

    #[test]
    fn the_next_skips_random_and_global_sections() {
        let builder = ListBuilder::<Slot>::new(6)
            .the_first(1)
            .unwrap()
            .with(|slot| slot.marked = true)
            .random(2)
            .with(|slot| slot.value = 0)
            .all()
            .with(|slot| slot.label.clear())
            .the_next(2)
            .unwrap()
            .done();
        assert_eq!(
            builder.declarations().last().unwrap().section(),
            &Section::Range { start: 1, end: 3 }
        );
    }

    #[test]
    fn openers_reject_sections_outside_the_list() {
        let out_of_bounds = |result: ForgeResult<DeclarationBuilder<Slot>>| {
            matches!(
                result.unwrap_err(),
                ForgeError::InvalidRange(InvalidRangeKind::SectionOutOfBounds { .. })
            )
        };
        assert!(out_of_bounds(ListBuilder::<Slot>::new(3).the_first(4)));
        assert!(out_of_bounds(ListBuilder::<Slot>::new(3).the_last(4)));
        assert!(out_of_bounds(ListBuilder::<Slot>::new(3).section(2, 2)));
        assert!(out_of_bounds(ListBuilder::<Slot>::new(3).section(usize::MAX, 2)));
        assert!(out_of_bounds(
            ListBuilder::<Slot>::new(3).the_first(2).unwrap().the_next(2)
        ));
    }

    #[test]
    fn the_previous_cannot_start_before_the_list() {
        let err = ListBuilder::<Slot>::new(3)
            .the_last(2)
            .unwrap()
            .the_previous(2)
            .unwrap_err();
        assert_eq!(
            err,
            ForgeError::InvalidRange(InvalidRangeKind::BeforeFirstPosition { count: 2, end: 1 })
        );
        // exactly reaching the first object is fine
        assert!(ListBuilder::<Slot>::new(3)
            .the_last(2)
            .unwrap()
            .the_previous(1)
            .is_ok());
    }

    #[test]
    fn relative_openers_need_a_previous_range() {
        let err = ListBuilder::<Slot>::new(3).the_next(1).unwrap_err();
        assert_eq!(
            err,
            ForgeError::InvalidRange(InvalidRangeKind::NoPreviousRange { opener: "the_next" })
        );
        let err = ListBuilder::<Slot>::new(3)
            .random(1)
            .the_previous(1)
            .unwrap_err();
        assert_eq!(
            err,
            ForgeError::InvalidRange(InvalidRangeKind::NoPreviousRange {
                opener: "the_previous"
            })
        );
    }

    #[test]
    fn random_between_rejects_inverted_window() {
        let err = ListBuilder::<Slot>::new(3).random_between(3, 1).unwrap_err();
        assert_eq!(
            err,
            ForgeError::InvalidRange(InvalidRangeKind::MinGreaterThanMax { min: 3, max: 1 })
        );
    }

    #[test]
    fn random_sections_are_disjoint() {
        let slots = ListBuilder::<Slot>::new(10)
            .with_settings(Arc::new(BuilderSettings::deterministic(17)))
            .random(5)
            .with(|slot| slot.value = -1)
            .random(5)
            .with(|slot| slot.marked = true)
            .build()
            .unwrap();
        assert!(slots.iter().all(|slot| (slot.value == -1) != slot.marked));
    }

    #[test]
    fn random_asking_for_too_many_fails_the_build() {
        let err = ListBuilder::<Slot>::new(3)
            .random(4)
            .with(|slot| slot.marked = true)
            .build()
            .unwrap_err();
        assert_eq!(err, ForgeError::ExhaustedSequence { lower: 0, upper: 3 });
    }

    #[test]
    fn requires_arguments_fails_before_construction() {
        let created = Rc::new(Cell::new(0));
        let counter = Rc::clone(&created);
        let err = ListBuilder::<Slot>::with_factory(4, RequiresArguments::new())
            .the_first(2)
            .unwrap()
            .with_constructor(move || {
                counter.set(counter.get() + 1);
                Slot::default()
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, ForgeError::ConstructionNotSupported { .. }));
        assert_eq!(created.get(), 0);
    }

    #[test]
    fn declaration_constructor_covers_requires_arguments() {
        let slots = ListBuilder::<Slot>::with_factory(3, RequiresArguments::new())
            .all()
            .with_constructor(|| Slot {
                marked: true,
                ..Slot::default()
            })
            .build()
            .unwrap();
        assert!(slots.iter().all(|slot| slot.marked));
        assert_eq!(slots[1].label, "label2");
    }

    #[test]
    fn list_constructor_replaces_the_factory() {
        let slots = ListBuilder::<Slot>::with_factory(2, RequiresArguments::new())
            .with_constructor(|| Slot {
                marked: true,
                ..Slot::default()
            })
            .build()
            .unwrap();
        assert!(slots.iter().all(|slot| slot.marked));
    }

    #[test]
    fn side_effects_accumulate() {
        let slots = ListBuilder::<Slot>::new(2)
            .all()
            .and_do(|slot| slot.value += 100)
            .the_first(1)
            .unwrap()
            .and_do_indexed(|slot, position| slot.value += 1000 + position as i32)
            .build()
            .unwrap();
        assert_eq!(slots[0].value, 1 + 100 + 1000);
        assert_eq!(slots[1].value, 2 + 100);
    }

    #[test]
    fn with_indexed_sees_positions() {
        let slots = ListBuilder::<Slot>::new(3)
            .all()
            .with_indexed(|slot, position| slot.value = position as i32 * 2)
            .build()
            .unwrap();
        let values: Vec<i32> = slots.iter().map(|slot| slot.value).collect();
        assert_eq!(values, vec![0, 2, 4]);
    }

    #[test]
    fn empty_declaration_is_reported() {
        let observer = Arc::new(CollectingObserver::new());
        let slots = ListBuilder::<Slot>::new(2)
            .with_violation_observer(observer.clone())
            .the_first(1)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(slots.len(), 2);
        let violations = observer.violations_of_kind(ViolationKind::Declaration);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("[0, 1)"));
    }

    #[test]
    fn implicit_catch_all_is_added_only_when_needed() {
        let mut generator = UniqueSession::seeded(1);
        let declarations = vec![Declaration::<Slot>::new(Section::Range { start: 0, end: 2 })];
        let resolved = resolve_declarations(&declarations, 4, &mut generator).unwrap();
        assert_eq!(resolved[0].as_slice(), &[0, 1]);

        let builder = ListBuilder::<Slot>::new(4)
            .the_first(2)
            .unwrap()
            .with(|slot| slot.marked = true)
            .done();
        assert_eq!(builder.declarations().len(), 1);
        let slots = builder.build().unwrap();
        assert_eq!(slots[3].label, "label4");
    }

    #[test]
    fn debug_output_summarizes_the_builder() {
        let builder = ListBuilder::<Slot>::new(5).random(2).with(|_| {}).done();
        let debug = format!("{builder:?}");
        assert!(debug.contains("capacity: 5"));
        assert!(debug.contains("has_custom_generator: false"));
    }
}
