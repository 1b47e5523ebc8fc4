//! Geometric value types
//!
//! Fixed-layout vector and basis records, converted one-to-one from the
//! SDK's native `Vector` and `Matrix`.

use crate::sdk;

/// 3 single-precision components
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<sdk::Vector> for Vector3 {
    #[inline]
    fn from(v: sdk::Vector) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Oriented coordinate frame: three axes and an origin
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Basis {
    pub x_basis: Vector3,
    pub y_basis: Vector3,
    pub z_basis: Vector3,
    pub origin: Vector3,
}

impl Basis {
    pub fn identity() -> Self {
        Self::from(sdk::Matrix::identity())
    }
}

impl From<sdk::Matrix> for Basis {
    #[inline]
    fn from(m: sdk::Matrix) -> Self {
        Self {
            x_basis: m.x_basis.into(),
            y_basis: m.y_basis.into(),
            z_basis: m.z_basis.into(),
            origin: m.origin.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_conversion_keeps_components() {
        let native = sdk::Vector::new(1.5, -0.000_001, f32::MAX);
        let v = Vector3::from(native);

        assert_eq!(v.x.to_bits(), native.x.to_bits());
        assert_eq!(v.y.to_bits(), native.y.to_bits());
        assert_eq!(v.z.to_bits(), native.z.to_bits());
    }

    #[test]
    fn test_matrix_conversion_is_positional() {
        let m = sdk::Matrix {
            x_basis: sdk::Vector::new(1.0, 2.0, 3.0),
            y_basis: sdk::Vector::new(4.0, 5.0, 6.0),
            z_basis: sdk::Vector::new(7.0, 8.0, 9.0),
            origin: sdk::Vector::new(10.0, 11.0, 12.0),
        };
        let b = Basis::from(m);

        assert_eq!(b.x_basis.to_array(), [1.0, 2.0, 3.0]);
        assert_eq!(b.y_basis.to_array(), [4.0, 5.0, 6.0]);
        assert_eq!(b.z_basis.to_array(), [7.0, 8.0, 9.0]);
        assert_eq!(b.origin.to_array(), [10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_identity_basis() {
        let b = Basis::identity();
        assert_eq!(b.x_basis, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(b.y_basis, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(b.z_basis, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(b.origin, Vector3::ZERO);
    }

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<Vector3>(), 12);
        assert_eq!(std::mem::size_of::<Basis>(), 48);
    }
}
