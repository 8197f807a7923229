use crate::errors::GraphError;
use crate::event::StructuralEvent;

/// Stateful consumer of a structural event stream.
///
/// A collector is valid for exactly one top-level traversal; feeding it a
/// second, unrelated stream gives unspecified output.
pub trait Collector {
    /// Folds one event into the collector's state.
    fn append(&mut self, event: &StructuralEvent) -> Result<(), GraphError>;
}

impl<C: Collector + ?Sized> Collector for &mut C {
    fn append(&mut self, event: &StructuralEvent) -> Result<(), GraphError> {
        (**self).append(event)
    }
}

/// Feeds both collectors, left first, so one traversal serves two outputs.
impl<A: Collector, B: Collector> Collector for (A, B) {
    fn append(&mut self, event: &StructuralEvent) -> Result<(), GraphError> {
        self.0.append(event)?;
        self.1.append(event)
    }
}

/// Records events verbatim; handy for inspecting a traversal.
impl Collector for Vec<StructuralEvent> {
    fn append(&mut self, event: &StructuralEvent) -> Result<(), GraphError> {
        self.push(event.clone());
        Ok(())
    }
}
