use loam_geom::Position;
use proptest::prelude::*;

fn small_i32() -> impl Strategy<Value = i32> {
    -1_000_000i32..=1_000_000
}

fn arb_position() -> impl Strategy<Value = Position> {
    (small_i32(), small_i32(), small_i32()).prop_map(|(x, y, z)| Position::new(x, y, z))
}

proptest! {
    // a + b == b + a and (a + b) - b == a, component-wise
    #[test]
    fn add_commutes_and_sub_inverts(a in arb_position(), b in arb_position()) {
        prop_assert_eq!(a + b, b + a);
        prop_assert_eq!((a + b) - b, a);

        let mut acc = a;
        acc += b;
        prop_assert_eq!(acc, a + b);
        acc -= b;
        prop_assert_eq!(acc, a);
    }

    // Negation is its own inverse and a + (-a) == 0
    #[test]
    fn neg_involution(a in arb_position()) {
        prop_assert_eq!(-(-a), a);
        prop_assert_eq!(a + (-a), Position::ZERO);
    }

    // Ordering is lexicographic over (x, y, z)
    #[test]
    fn ordering_is_lexicographic(a in arb_position(), b in arb_position()) {
        let expect = (a.x, a.y, a.z).cmp(&(b.x, b.y, b.z));
        prop_assert_eq!(a.cmp(&b), expect);
    }

    // div_euclid/rem_euclid recompose the argument, and the remainder is
    // always in [0, d) even for negative components
    #[test]
    fn euclid_recomposes(a in arb_position(), d in 1i32..=64) {
        let q = a.div_euclid(d);
        let r = a.rem_euclid(d);
        prop_assert_eq!(q * d + r, a);
        prop_assert!(r.x >= 0 && r.x < d);
        prop_assert!(r.y >= 0 && r.y < d);
        prop_assert!(r.z >= 0 && r.z < d);
    }

    // Scalar multiply then truncating divide round-trips for nonzero scalars
    #[test]
    fn mul_div_roundtrip(a in arb_position(), s in 1i32..=512) {
        prop_assert_eq!((a * s) / s, a);
    }
}

#[test]
fn rem_euclid_wraps_negative_components() {
    let p = Position::new(-1, -1, -1);
    assert_eq!(p.rem_euclid(8), Position::splat(7));
    assert_eq!(p.div_euclid(8), Position::splat(-1));
}

#[test]
fn chebyshev_is_max_axis_delta() {
    let a = Position::new(3, -2, 10);
    let b = Position::new(-1, 5, 12);
    assert_eq!(a.chebyshev(b), 7);
    assert_eq!(a.chebyshev(a), 0);
}
