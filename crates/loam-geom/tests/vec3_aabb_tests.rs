use loam_geom::{Aabb, Position, Vec3};

#[test]
fn vec3_ops_are_componentwise() {
    let a = Vec3::new(1.0, -2.0, 3.0);
    let b = Vec3::new(0.5, 4.0, -1.0);
    assert_eq!(a + b, Vec3::new(1.5, 2.0, 2.0));
    assert_eq!(a - b, Vec3::new(0.5, -6.0, 4.0));
    assert_eq!(a * 2.0, Vec3::new(2.0, -4.0, 6.0));
    assert_eq!(Vec3::ZERO + a, a);
}

#[test]
fn vec3_from_position_casts_each_axis() {
    let v = Vec3::from(Position::new(-256, 0, 255));
    assert_eq!(v, Vec3::new(-256.0, 0.0, 255.0));
}

#[test]
fn aabb_keeps_its_corners() {
    let bb = Aabb::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(bb.min.x, -1.0);
    assert_eq!(bb.max.z, 3.0);
}
