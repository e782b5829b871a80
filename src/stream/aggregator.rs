//! In-order reassembly of batch results.

use std::collections::BTreeMap;

use crate::error::{PorterError, PorterResult};
use crate::schema::Schema;
use crate::stream::worker::BatchResult;

/// Merges fragments into one schema in source order, whatever order they
/// arrive in.
#[derive(Debug, Default)]
pub struct Aggregator {
    schema: Schema,
    next: u64,
    pending: BTreeMap<u64, Schema>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept one result. The first failed result is returned as the error
    /// of the whole call.
    pub fn accept(&mut self, result: BatchResult) -> PorterResult<()> {
        let fragment = result.outcome?;
        if result.index < self.next || self.pending.contains_key(&result.index) {
            return Err(PorterError::Internal(format!(
                "batch {} reported twice",
                result.index
            )));
        }
        self.pending.insert(result.index, fragment);

        while let Some(fragment) = self.pending.remove(&self.next) {
            self.schema.append(fragment);
            self.next += 1;
        }
        Ok(())
    }

    /// Number of fragments merged so far.
    pub fn merged(&self) -> u64 {
        self.next
    }

    /// Return the schema once all `expected` batches have been merged.
    pub fn finish(self, expected: u64) -> PorterResult<Schema> {
        if self.next != expected || !self.pending.is_empty() {
            return Err(PorterError::Internal(format!(
                "merged {} of {} batches ({} out of order)",
                self.next,
                expected,
                self.pending.len()
            )));
        }
        Ok(self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Sequence, Table};
    use pretty_assertions::assert_eq;

    fn fragment(index: u64, table: &str) -> BatchResult {
        let mut schema = Schema::default();
        schema.tables.push(Table::new(table));
        BatchResult {
            index,
            outcome: Ok(schema),
        }
    }

    #[test]
    fn test_out_of_order_arrival() {
        let mut agg = Aggregator::new();
        agg.accept(fragment(2, "c")).unwrap();
        agg.accept(fragment(0, "a")).unwrap();
        assert_eq!(agg.merged(), 1);
        agg.accept(fragment(1, "b")).unwrap();
        assert_eq!(agg.merged(), 3);

        let schema = agg.finish(3).unwrap();
        let names: Vec<_> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_first_error_wins() {
        let mut agg = Aggregator::new();
        agg.accept(fragment(0, "a")).unwrap();
        let err = agg
            .accept(BatchResult {
                index: 1,
                outcome: Err(PorterError::syntax(4, "bad")),
            })
            .unwrap_err();
        assert!(matches!(err, PorterError::Syntax { offset: 4, .. }));
    }

    #[test]
    fn test_missing_batch_is_reported() {
        let mut agg = Aggregator::new();
        agg.accept(fragment(1, "b")).unwrap();
        assert!(matches!(agg.finish(2), Err(PorterError::Internal(_))));
    }

    #[test]
    fn test_mixed_entities_keep_order() {
        let mut agg = Aggregator::new();
        let mut second = Schema::default();
        second.sequences.push(Sequence::new("s2"));
        let mut first = Schema::default();
        first.sequences.push(Sequence::new("s1"));
        agg.accept(BatchResult { index: 1, outcome: Ok(second) }).unwrap();
        agg.accept(BatchResult { index: 0, outcome: Ok(first) }).unwrap();
        let schema = agg.finish(2).unwrap();
        assert_eq!(schema.sequences[0].name, "s1");
        assert_eq!(schema.sequences[1].name, "s2");
        assert!(Aggregator::new().finish(0).unwrap().is_empty());
    }
}
