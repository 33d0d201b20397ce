//! Fixed-size batching of campaign names

use crate::error::ExtractorError;

/// Splits an ordered sequence into contiguous batches of at most `batch_size`
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    batch_size: usize,
}

impl Chunker {
    /// Create a chunker; a zero batch size is a configuration error
    pub fn new(batch_size: usize) -> Result<Self, ExtractorError> {
        if batch_size == 0 {
            return Err(ExtractorError::Config(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        Ok(Self { batch_size })
    }

    /// Split `items` into batches; only the last may be short
    pub fn chunk<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        items.chunks(self.batch_size).collect()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// N items in batches of B: ceil(N/B) batches, each <= B, concatenating to the input
        #[test]
        fn test_chunking_partitions_input(n in 0usize..600, b in 1usize..150) {
            let items: Vec<usize> = (0..n).collect();
            let chunker = Chunker::new(b).unwrap();
            let batches = chunker.chunk(&items);

            prop_assert_eq!(batches.len(), n.div_ceil(b));
            prop_assert!(batches.iter().all(|batch| !batch.is_empty() && batch.len() <= b));

            let rejoined: Vec<usize> = batches.concat();
            prop_assert_eq!(rejoined, items);
        }
    }
}
