//! Engine configuration feeding the concurrent and sampling operators.

use seqflow::exec::{collect, Buffered, ConcurrentMap};
use seqflow::operators::ReservoirSample;
use seqflow::prelude::*;
use seqflow::sources::from_iter;

#[test]
fn test_json_config_with_defaults() {
    let cfg = EngineConfig::from_json(r#"{ "workers": 2, "seed": 11 }"#).unwrap();
    assert_eq!(cfg.workers, 2);
    assert_eq!(cfg.buffer_capacity, EngineConfig::default().buffer_capacity);
    assert_eq!(cfg.seed, Some(11));
}

#[test]
fn test_invalid_json_config_is_rejected() {
    assert!(matches!(EngineConfig::from_json(r#"{ "workers": 0 }"#), Err(Error::Config(_))));
    assert!(matches!(EngineConfig::from_json("not json"), Err(Error::Config(_))));
}

#[test]
fn test_env_config() {
    std::env::set_var("SEQFLOW_WORKERS", "3");
    std::env::set_var("SEQFLOW_SEED", "99");
    let cfg = EngineConfig::from_env();
    std::env::remove_var("SEQFLOW_WORKERS");
    std::env::remove_var("SEQFLOW_SEED");
    assert_eq!(cfg.workers, 3);
    assert_eq!(cfg.seed, Some(99));
}

#[test]
fn test_operators_built_from_config() {
    let ctx = Context::new();
    let cfg = EngineConfig {
        workers: 2,
        buffer_capacity: 3,
        seed: Some(5),
    };

    let mapped = ConcurrentMap::with_config(from_iter(|| 0..50), &cfg, |x: i32| Ok(x));
    assert_eq!(collect(mapped, &ctx).unwrap().len(), 50);

    let buffered = Buffered::with_config(from_iter(|| 0..50), &cfg);
    assert_eq!(collect(buffered, &ctx).unwrap(), (0..50).collect::<Vec<_>>());

    let a = collect(ReservoirSample::with_config(from_iter(|| 0..500), 8, &cfg), &ctx).unwrap();
    let b = collect(ReservoirSample::with_config(from_iter(|| 0..500), 8, &cfg), &ctx).unwrap();
    assert_eq!(a, b);
}
