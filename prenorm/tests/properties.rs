use prenorm::{
    Connection, ConnectionStore, ConnectionTable, IzhikevichPrenorm, KernelContext, NodeId,
    ParameterUpdate, Resolution, StateUpdate,
};
use proptest::prelude::*;

fn ctx(h: f64, min_delay: i64) -> KernelContext {
    KernelContext::from_steps(Resolution::new(h).unwrap(), min_delay, min_delay + 10).unwrap()
}

/// Forward Euler step written out by hand.
fn euler(v: f64, u: f64, h: f64, a: f64, b: f64) -> (f64, f64) {
    (
        v + h * (0.04 * v * v + 5.0 * v + 140.0 - u),
        u + h * a * (b * v - u),
    )
}

proptest! {
    #[test]
    fn crossing_resets_to_c_and_adds_d(
        v0 in -80.0f64..60.0,
        u0 in -20.0f64..20.0,
        c in -70.0f64..-40.0,
        d in 0.0f64..10.0,
    ) {
        let ctx = ctx(0.1, 1);
        let mut conns = ConnectionStore::new();
        let mut unit = IzhikevichPrenorm::new(NodeId(0), &ctx);
        unit.set_params(&ParameterUpdate { c: Some(c), d: Some(d), ..Default::default() }, &ctx).unwrap();
        unit.set_state(&StateUpdate { v_m: Some(v0), u_m: Some(u0) }).unwrap();
        unit.calibrate(&conns, &ctx).unwrap();

        let (v1, u1) = euler(v0, u0, 0.1, 0.02, 0.2);
        let mut out = Vec::new();
        unit.update(7, 0, 1, &ctx, &mut conns, &mut out).unwrap();

        if v1 >= 30.0 {
            prop_assert_eq!(unit.state().v, c);
            prop_assert_eq!(unit.state().u, u1 + d);
            prop_assert_eq!(out.len(), 1);
            prop_assert_eq!(out[0].stamp, 8);
        } else {
            prop_assert_eq!(unit.state().v, v1);
            prop_assert_eq!(unit.state().u, u1);
            prop_assert!(out.is_empty());
        }
    }

    #[test]
    fn clamp_holds_v_at_v_min(
        v0 in -100.0f64..-66.0,
        v_min in -90.0f64..-60.0,
    ) {
        let ctx = ctx(1.0, 1);
        let mut conns = ConnectionStore::new();
        let mut unit = IzhikevichPrenorm::new(NodeId(0), &ctx);
        unit.set_params(&ParameterUpdate { v_min: Some(v_min), ..Default::default() }, &ctx).unwrap();
        unit.set_state(&StateUpdate { v_m: Some(v0), u_m: Some(0.0) }).unwrap();
        unit.calibrate(&conns, &ctx).unwrap();

        let (v1, _) = euler(v0, 0.0, 1.0, 0.02, 0.2);
        let mut out = Vec::new();
        unit.update(1, 0, 1, &ctx, &mut conns, &mut out).unwrap();

        prop_assert!(out.is_empty());
        if v1 < v_min {
            prop_assert_eq!(unit.state().v, v_min);
        } else {
            prop_assert_eq!(unit.state().v, v1);
        }
    }

    #[test]
    fn normalization_hits_target_and_is_idempotent(
        weights in prop::collection::vec(0.01f64..100.0, 1..20),
        target in 0.1f64..1000.0,
    ) {
        let ctx = ctx(1.0, 1);
        let mut conns = ConnectionStore::new();
        let mut unit = IzhikevichPrenorm::new(NodeId(0), &ctx);
        unit.set_params(&ParameterUpdate { norm_value: Some(target), ..Default::default() }, &ctx).unwrap();
        let mut ids = Vec::new();
        for (k, &w) in weights.iter().enumerate() {
            let id = conns.add(Connection {
                source: NodeId(k as u32 + 1),
                target: NodeId(0),
                weight: w,
                delay_steps: 1,
                receptor: 0,
            }).unwrap();
            unit.register_incoming(id);
            ids.push(id);
        }

        unit.normalize_incoming(&mut conns, 0).unwrap();
        let sum = unit.inc_weight_sum(&conns);
        prop_assert!((sum - target).abs() <= 1e-9 * target.max(1.0));

        let first: Vec<f64> = ids.iter().map(|&id| conns.weight(id).unwrap()).collect();
        unit.normalize_incoming(&mut conns, 0).unwrap();
        for (k, &id) in ids.iter().enumerate() {
            let w = conns.weight(id).unwrap();
            prop_assert!((w - first[k]).abs() <= 1e-9 * first[k].max(1.0));
        }
    }

    #[test]
    fn short_norm_period_never_commits(
        min_delay in 2i64..40,
        frac in 0.0f64..1.0,
        a in 0.001f64..0.5,
    ) {
        let ctx = ctx(1.0, min_delay);
        let mut unit = IzhikevichPrenorm::new(NodeId(0), &ctx);
        // whole steps in [1, min_delay)
        let period = 1.0 + ((min_delay - 1) as f64 * frac).floor();
        let before = unit.params().clone();
        let result = unit.set_params(
            &ParameterUpdate { a: Some(a), norm_period: Some(period), ..Default::default() },
            &ctx,
        );
        prop_assert!(result.is_err());
        prop_assert_eq!(unit.params(), &before);
    }
}
