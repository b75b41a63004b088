//! Integration tests for the progress engine

#[cfg(test)]
mod tests {
    use pace_progress::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn manual_engine(expected: u64, config: ProgressConfig) -> (ProgressEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (ProgressEngine::with_config(expected, config, clock.clone()), clock)
    }

    #[test]
    fn test_first_sample_with_defaults_is_not_shown() {
        let mut engine = ProgressEngine::new(0);
        assert!(engine.add_sample().is_none());
        assert_eq!(engine.processed_count(), 1);
    }

    #[test]
    fn test_halfway_estimate_from_window() {
        let config = ProgressConfig::default().with_display_threshold(Duration::ZERO);
        let (mut engine, clock) = manual_engine(100, config);

        let mut info = None;
        for _ in 0..51 {
            info = engine.add_sample();
            clock.advance(Duration::from_secs(1));
        }

        assert_eq!(engine.processed_count(), 51);
        let info = info.expect("the 51st item is shown");
        assert_eq!(info.item_index, 50);
        assert_eq!(info.remaining_item_count, 50);
        assert_eq!(info.percent_complete, Some(0.5));
        assert_eq!(info.estimated_time_remaining, Some(Duration::from_secs(50)));
    }

    #[test]
    fn test_first_sampled_item_skips_refresh_interval() {
        let config = ProgressConfig::default()
            .with_display_threshold(Duration::ZERO)
            .with_refresh_interval(Duration::from_secs(2));
        let (mut engine, clock) = manual_engine(10, config);

        assert!(engine.check_time().is_some());
        clock.advance(Duration::from_secs(1));
        assert!(engine.add_sample().is_some());

        // The next item is throttled again
        clock.advance(Duration::from_millis(500));
        assert!(engine.add_sample().is_none());
    }

    #[test]
    fn test_display_threshold_withholds_early_updates() {
        let config = ProgressConfig::default().with_display_threshold(Duration::from_secs(1));
        let (mut engine, clock) = manual_engine(10, config);

        assert!(engine.check_time().is_none());
        clock.advance(Duration::from_millis(100));
        assert!(engine.check_time().is_none());

        clock.advance(Duration::from_millis(900));
        assert!(engine.check_time().is_some());
    }

    #[test]
    fn test_zero_thresholds_show_every_check() {
        let config = ProgressConfig::default()
            .with_display_threshold(Duration::ZERO)
            .with_refresh_interval(Duration::ZERO);
        let (mut engine, _clock) = manual_engine(0, config);

        assert!(engine.check_time().is_some());
        assert!(engine.check_time().is_some());
    }

    #[test]
    fn test_check_time_alone_never_samples() {
        let (mut engine, clock) = manual_engine(10, ProgressConfig::unthrottled());

        for _ in 0..25 {
            let info = engine.check_time().expect("unthrottled");
            assert_eq!(info.item_index, 0);
            clock.advance(Duration::from_millis(300));
        }

        assert_eq!(engine.processed_count(), 0);
        assert!(engine.window().is_empty());
        assert!(!engine.is_sampling());
    }

    #[test]
    fn test_estimate_follows_speed_change() {
        let config = ProgressConfig::unthrottled().with_window_capacity(5);
        let (mut engine, clock) = manual_engine(1000, config);

        for _ in 0..20 {
            engine.add_sample();
            clock.advance(Duration::from_secs(2));
        }
        for _ in 0..10 {
            engine.add_sample();
            clock.advance(Duration::from_millis(500));
        }

        let info = engine.add_sample().expect("unthrottled");
        assert_eq!(info.item_index, 30);
        assert_eq!(engine.window().average_interval(), Some(Duration::from_millis(500)));
        assert_eq!(info.estimated_time_remaining, Some(Duration::from_secs(485)));
    }

    #[test]
    fn test_throttled_samples_are_spread_over_index() {
        let config = ProgressConfig::unthrottled().with_refresh_interval(Duration::from_secs(1));
        let (mut engine, clock) = manual_engine(400, config);

        // Four items per second: only every fourth one is shown
        let mut shown = 0;
        for _ in 0..200 {
            if engine.add_sample().is_some() {
                shown += 1;
            }
            clock.advance(Duration::from_millis(250));
        }

        assert_eq!(shown, 50);
        assert_eq!(engine.window().average_interval(), Some(Duration::from_millis(250)));
        assert_eq!(engine.estimated_time_remaining(), Some(Duration::from_secs(50)));
    }

    proptest! {
        #[test]
        fn prop_processed_count_tracks_add_sample_calls(
            steps in proptest::collection::vec((any::<bool>(), 0u64..2_000), 0..200),
            expected in 0u64..500,
        ) {
            let (mut engine, clock) = manual_engine(expected, ProgressConfig::default());
            let mut added = 0u64;

            for (sample, millis) in steps {
                if sample {
                    engine.add_sample();
                    added += 1;
                } else {
                    engine.check_time();
                }
                clock.advance(Duration::from_millis(millis));
                prop_assert_eq!(engine.processed_count(), added);
            }
        }

        #[test]
        fn prop_percent_stays_in_unit_range(
            calls in 1usize..300,
            expected in 0u64..200,
        ) {
            let (mut engine, clock) = manual_engine(expected, ProgressConfig::unthrottled());
            for _ in 0..calls {
                if let Some(info) = engine.add_sample() {
                    if let Some(percent) = info.percent_complete {
                        prop_assert!((0.0..=1.0).contains(&percent));
                    }
                }
                clock.advance(Duration::from_millis(10));
            }
        }
    }
}
