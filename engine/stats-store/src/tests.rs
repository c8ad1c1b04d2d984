//! End-to-end scenarios across the store, limits and stats engine

use crate::{
    ErrorKind, StatsEngine, StoreConfig, StoreError, SymbolStore, DEFAULT_MAX_BATCH_SIZE,
    DEFAULT_MAX_SYMBOLS, DEFAULT_MAX_SYMBOL_LENGTH,
};

fn create_test_store(max_symbols: usize) -> SymbolStore {
    SymbolStore::new(StoreConfig { max_symbols, ..Default::default() }).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9 * b.abs().max(1.0)
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_single_symbol_lifecycle() {
        let store = create_test_store(DEFAULT_MAX_SYMBOLS);
        let engine = StatsEngine::new(&store);

        store.add_batch("AAA", &[1.0, 2.0, 3.0]).unwrap();
        let stats = engine.compute_stats("AAA").unwrap();
        assert_eq!(stats.size, 3);
        assert!(close(stats.avg, 2.0));
        assert!((stats.variance - 0.6667).abs() < 1e-4);

        store.add_batch("AAA", &[4.0]).unwrap();
        let stats = engine.compute_stats("AAA").unwrap();
        assert_eq!(stats.size, 4);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.last, 4.0);
        assert!(close(stats.avg, 2.5));
        assert!(close(stats.variance, 1.25));

        store.delete_symbol("AAA").unwrap();
        assert_eq!(
            engine.compute_stats("AAA").unwrap_err(),
            StoreError::SymbolNotFound { symbol: "AAA".into() }
        );
        assert!(store.get_symbols().is_empty());
    }

    #[test]
    fn test_symbols_are_independent() {
        let store = create_test_store(DEFAULT_MAX_SYMBOLS);
        let engine = StatsEngine::new(&store);

        store.add_batch("AAA", &[10.0, 20.0]).unwrap();
        store.add_batch("BBB", &[0.5]).unwrap();
        store.add_batch("AAA", &[30.0]).unwrap();

        let a = engine.compute_stats("AAA").unwrap();
        let b = engine.compute_stats("BBB").unwrap();
        assert_eq!(a.size, 3);
        assert!(close(a.avg, 20.0));
        assert_eq!(b.size, 1);
        assert_eq!(b.variance, 0.0);
        assert_eq!(b.last, 0.5);
    }

    #[test]
    fn test_empty_symbol_is_a_valid_key() {
        let store = create_test_store(DEFAULT_MAX_SYMBOLS);
        store.add_batch("", &[7.0]).unwrap();
        assert_eq!(store.get_symbols(), vec![""]);
        assert_eq!(StatsEngine::new(&store).compute_stats("").unwrap().last, 7.0);
    }
}

#[cfg(test)]
mod rejection_tests {
    use super::*;

    #[test]
    fn test_rejected_batches_leave_state_unchanged() {
        let store = create_test_store(2);
        store.add_batch("AAA", &[1.0, 2.0]).unwrap();
        let before = store.get_aggregator("AAA").unwrap().snapshot();

        let bad: [&[f64]; 5] = [
            &[],
            &[3.0, 0.0],
            &[3.0, -1.0],
            &[f64::NAN],
            &[3.0, f64::INFINITY, 4.0],
        ];
        for batch in bad {
            // same input, same rejection, no effect
            let first = store.add_batch("AAA", batch).unwrap_err();
            let second = store.add_batch("AAA", batch).unwrap_err();
            assert_eq!(first.kind(), second.kind());
        }

        let too_big = vec![1.0; DEFAULT_MAX_BATCH_SIZE + 1];
        assert_eq!(
            store.add_batch("AAA", &too_big).unwrap_err(),
            StoreError::InvalidBatchSize { len: DEFAULT_MAX_BATCH_SIZE + 1, max: DEFAULT_MAX_BATCH_SIZE }
        );

        assert_eq!(store.get_aggregator("AAA").unwrap().snapshot(), before);
        assert_eq!(store.get_symbols(), vec!["AAA"]);
    }

    #[test]
    fn test_rejected_new_symbol_is_not_created() {
        let store = create_test_store(DEFAULT_MAX_SYMBOLS);
        assert_eq!(store.add_batch("NEW", &[1.0, -5.0]).unwrap_err().kind(), ErrorKind::InvalidValue);
        assert!(!store.contains("NEW"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_first_invalid_value_is_reported() {
        let store = create_test_store(DEFAULT_MAX_SYMBOLS);
        let err = store.add_batch("AAA", &[1.0, 2.0, -3.0, f64::NAN]).unwrap_err();
        match err {
            StoreError::InvalidValue { index, value } => {
                assert_eq!(index, 2);
                assert_eq!(value, -3.0);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_symbol_length_counts_chars() {
        let store = create_test_store(DEFAULT_MAX_SYMBOLS);
        let four_chars = "ÄÖÜß";
        assert_eq!(four_chars.chars().count(), DEFAULT_MAX_SYMBOL_LENGTH);
        store.add_batch(four_chars, &[1.0]).unwrap();

        let err = store.add_batch("ABCDE", &[1.0]).unwrap_err();
        assert_eq!(err, StoreError::SymbolTooLong { symbol: "ABCDE".into(), len: 5, max: 4 });
    }
}

#[cfg(test)]
mod capacity_tests {
    use super::*;

    #[test]
    fn test_capacity_enforced_for_new_symbols_only() {
        let store = create_test_store(3);
        for s in ["A", "B", "C"] {
            store.add_batch(s, &[1.0]).unwrap();
        }

        assert_eq!(
            store.add_batch("D", &[1.0]).unwrap_err(),
            StoreError::SymbolLimitReached { max: 3 }
        );
        // existing symbols still accept data at capacity
        store.add_batch("B", &[2.0]).unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_delete_frees_exactly_one_slot() {
        let store = create_test_store(3);
        for s in ["A", "B", "C"] {
            store.add_batch(s, &[1.0]).unwrap();
        }

        store.delete_symbol("B").unwrap();
        store.add_batch("D", &[1.0]).unwrap();
        assert_eq!(store.add_batch("E", &[1.0]).unwrap_err().kind(), ErrorKind::SymbolLimitReached);
        assert_eq!(store.get_symbols(), vec!["A", "C", "D"]);
    }

    #[test]
    fn test_delete_never_added_symbol() {
        let store = create_test_store(3);
        store.add_batch("A", &[1.0]).unwrap();

        assert_eq!(store.delete_symbol("ZZZ").unwrap_err().kind(), ErrorKind::SymbolNotFound);
        assert_eq!(store.get_symbols(), vec!["A"]);

        store.delete_symbol("A").unwrap();
        assert_eq!(store.delete_symbol("A").unwrap_err().kind(), ErrorKind::SymbolNotFound);
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = StoreConfig::default();
        assert_eq!(config.max_batch_size, DEFAULT_MAX_BATCH_SIZE);
        assert_eq!(config.max_symbols, DEFAULT_MAX_SYMBOLS);
        assert_eq!(config.max_symbol_length, DEFAULT_MAX_SYMBOL_LENGTH);
    }

    #[test]
    fn test_custom_limits_flow_into_policy() {
        let config = StoreConfig { max_batch_size: 3, max_symbols: 1, max_symbol_length: 8 };
        let store = SymbolStore::new(config).unwrap();
        assert_eq!(store.limits().max_batch_size(), 3);

        store.add_batch("LONGNAME", &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(
            store.add_batch("LONGNAME", &[1.0; 4]).unwrap_err().kind(),
            ErrorKind::InvalidBatchSize
        );
    }
}
