//! Property namers that record their calls.

#![allow(dead_code)]

use fixture_forge::{Properties, PropertyNamer, PropertyVisitor, SequentialValue};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Writes a fixed sequence number into every property and counts calls.
#[derive(Debug, Default)]
pub struct RecordingNamer {
    pub fixed_sequence: u64,
    list_calls: AtomicUsize,
    single_calls: AtomicUsize,
    objects_seen: AtomicUsize,
}

impl RecordingNamer {
    pub fn with_sequence(fixed_sequence: u64) -> Self {
        Self {
            fixed_sequence,
            ..Self::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    pub fn objects_seen(&self) -> usize {
        self.objects_seen.load(Ordering::SeqCst)
    }
}

struct FixedVisitor(u64);

impl PropertyVisitor for FixedVisitor {
    fn visit(&mut self, property: &'static str, value: &mut dyn SequentialValue) {
        value.assign_sequential(property, self.0);
    }
}

impl PropertyNamer for RecordingNamer {
    fn set_values_of_all_in(&self, objects: &mut [&mut dyn Properties]) {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.objects_seen.fetch_add(objects.len(), Ordering::SeqCst);
        for object in objects.iter_mut() {
            object.visit_properties(&mut FixedVisitor(self.fixed_sequence));
        }
    }

    fn set_values_of(&self, object: &mut dyn Properties) {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.objects_seen.fetch_add(1, Ordering::SeqCst);
        object.visit_properties(&mut FixedVisitor(self.fixed_sequence));
    }
}
