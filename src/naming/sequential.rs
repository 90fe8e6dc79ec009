use std::collections::BTreeSet;
use std::sync::Arc;

use crate::naming::{Properties, PropertyNamer, PropertyVisitor, SequentialValue};
use crate::telemetry::{
    report_to_observer, BuildViolation, ViolationKind, ViolationObserver, ViolationSeverity,
};

/// The default namer: every property gets the value for the object's 1-based
/// position in its list.
///
/// Properties named in the exclusion set keep whatever value construction gave
/// them. An excluded name that no visited object exposes is reported as a
/// [`ViolationKind::Naming`] warning, since it usually means a typo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequentialPropertyNamer {
    excluded: BTreeSet<&'static str>,
}

impl SequentialPropertyNamer {
    /// A namer that names every property.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A namer that leaves the given properties untouched.
    #[must_use]
    pub fn excluding(properties: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            excluded: properties.into_iter().collect(),
        }
    }

    /// Properties this namer leaves untouched.
    #[must_use]
    pub fn excluded(&self) -> &BTreeSet<&'static str> {
        &self.excluded
    }

    fn name_all(
        &self,
        objects: &mut [&mut dyn Properties],
        observer: Option<&Arc<dyn ViolationObserver>>,
    ) {
        let mut visitor = NamingVisitor {
            excluded: &self.excluded,
            matched: BTreeSet::new(),
            sequence: 0,
        };
        for (position, object) in objects.iter_mut().enumerate() {
            visitor.sequence = position as u64 + 1;
            object.visit_properties(&mut visitor);
        }
        tracing::debug!(objects = objects.len(), "sequential naming pass");

        if objects.is_empty() {
            return;
        }
        for &unknown in self.excluded.difference(&visitor.matched) {
            let violation = BuildViolation::new(
                ViolationSeverity::Warning,
                ViolationKind::Naming,
                format!("excluded property `{}` was never visited", unknown),
                concat!(file!(), ":", line!()),
            )
            .with_context("property", unknown);
            report_to_observer(observer, &violation);
        }
    }
}

impl PropertyNamer for SequentialPropertyNamer {
    fn set_values_of_all_in(&self, objects: &mut [&mut dyn Properties]) {
        self.name_all(objects, None);
    }

    fn set_values_of(&self, object: &mut dyn Properties) {
        self.name_all(&mut [object], None);
    }

    fn set_values_of_all_in_observed(
        &self,
        objects: &mut [&mut dyn Properties],
        observer: Option<&Arc<dyn ViolationObserver>>,
    ) {
        self.name_all(objects, observer);
    }
}

struct NamingVisitor<'a> {
    excluded: &'a BTreeSet<&'static str>,
    matched: BTreeSet<&'static str>,
    sequence: u64,
}

impl PropertyVisitor for NamingVisitor<'_> {
    fn visit(&mut self, property: &'static str, value: &mut dyn SequentialValue) {
        if self.excluded.contains(property) {
            self.matched.insert(property);
            return;
        }
        value.assign_sequential(property, self.sequence);
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

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Row {
        label: String,
        rank: u32,
        active: bool,
    }
    crate::impl_properties!(Row { label, rank, active });

    #[test]
    fn single_object_is_first_in_sequence() {
        let mut row = Row::default();
        SequentialPropertyNamer::new().set_values_of(&mut row);
        assert_eq!(
            row,
            Row {
                label: "label1".to_owned(),
                rank: 1,
                active: false,
            }
        );
    }

    #[test]
    fn list_positions_drive_sequence_numbers() {
        let mut rows = vec![Row::default(); 10];
        let mut targets: Vec<&mut dyn Properties> =
            rows.iter_mut().map(|row| row as &mut dyn Properties).collect();
        SequentialPropertyNamer::new().set_values_of_all_in(&mut targets);

        assert_eq!(rows[0].label, "label1");
        assert_eq!(rows[9].label, "label10");
        assert_eq!(rows[9].rank, 10);
        assert!(rows[1].active);
    }

    #[test]
    fn excluded_properties_keep_their_value() {
        let mut row = Row {
            label: "kept".to_owned(),
            ..Row::default()
        };
        SequentialPropertyNamer::excluding(["label"]).set_values_of(&mut row);
        assert_eq!(row.label, "kept");
        assert_eq!(row.rank, 1);
    }

    #[test]
    fn excluding_collects_names() {
        let namer = SequentialPropertyNamer::excluding(["a", "b", "a"]);
        assert_eq!(namer.excluded().len(), 2);
    }

    #[test]
    fn unknown_exclusion_is_reported_to_the_observer() {
        let collector = Arc::new(crate::telemetry::CollectingObserver::new());
        let observer: Arc<dyn ViolationObserver> = collector.clone();
        let mut rows = vec![Row::default(); 2];
        let mut targets: Vec<&mut dyn Properties> =
            rows.iter_mut().map(|row| row as &mut dyn Properties).collect();

        SequentialPropertyNamer::excluding(["lable", "rank"])
            .set_values_of_all_in_observed(&mut targets, Some(&observer));

        let naming = collector.violations_of_kind(ViolationKind::Naming);
        assert_eq!(naming.len(), 1);
        assert_eq!(naming[0].context.get("property").map(String::as_str), Some("lable"));
        assert_eq!(rows[1].label, "label2");
        assert_eq!(rows[1].rank, 0);
    }

    #[test]
    fn empty_list_is_a_no_op() {
        let mut targets: Vec<&mut dyn Properties> = Vec::new();
        SequentialPropertyNamer::excluding(["missing"]).set_values_of_all_in(&mut targets);
    }
}
