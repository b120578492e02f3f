//! Vector polynomials and scalar iterators used by the range proof.

use {crate::secp256k1::Scalar, k256::elliptic_curve::Field};

/// Represents a degree-1 vector polynomial `a + b*x`.
pub struct VecPoly1(pub Vec<Scalar>, pub Vec<Scalar>);

impl VecPoly1 {
    pub fn zero(n: usize) -> Self {
        VecPoly1(vec![Scalar::ZERO; n], vec![Scalar::ZERO; n])
    }

    pub fn inner_product(&self, rhs: &VecPoly1) -> Poly2 {
        let l = self;
        let r = rhs;

        let t0 = inner_product(&l.0, &r.0);
        let t2 = inner_product(&l.1, &r.1);

        let l0_plus_l1 = add_vec(&l.0, &l.1);
        let r0_plus_r1 = add_vec(&r.0, &r.1);

        let t1 = inner_product(&l0_plus_l1, &r0_plus_r1) - t0 - t2;

        Poly2(t0, t1, t2)
    }

    pub fn eval(&self, x: Scalar) -> Vec<Scalar> {
        self.0
            .iter()
            .zip(self.1.iter())
            .map(|(a, b)| a + &(b * &x))
            .collect()
    }
}

/// Represents a degree-2 scalar polynomial `a + b*x + c*x^2`.
pub struct Poly2(pub Scalar, pub Scalar, pub Scalar);

impl Poly2 {
    pub fn eval(&self, x: Scalar) -> Scalar {
        self.0 + x * (self.1 + x * self.2)
    }
}

pub fn inner_product(a: &[Scalar], b: &[Scalar]) -> Scalar {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(a, b)| a * b).sum()
}

pub fn add_vec(a: &[Scalar], b: &[Scalar]) -> Vec<Scalar> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(a, b)| a + b).collect()
}

/// Provides an iterator over the powers of a scalar.
pub struct ScalarExp {
    x: Scalar,
    next_exp_x: Scalar,
}

impl Iterator for ScalarExp {
    type Item = Scalar;

    fn next(&mut self) -> Option<Scalar> {
        let exp_x = self.next_exp_x;
        self.next_exp_x *= self.x;
        Some(exp_x)
    }
}

/// Returns an iterator of the powers of `x`, starting with `x^0 = 1`.
pub fn exp_iter(x: Scalar) -> ScalarExp {
    ScalarExp {
        x,
        next_exp_x: Scalar::ONE,
    }
}

/// Computes `1 + x + x^2 + ... + x^(n-1)`.
pub fn sum_of_powers(x: &Scalar, n: usize) -> Scalar {
    exp_iter(*x).take(n).sum()
}

pub fn read32(data: &[u8]) -> [u8; 32] {
    let mut buf = [0u8; 32];
    buf.copy_from_slice(&data[..32]);
    buf
}

pub fn read33(data: &[u8]) -> [u8; 33] {
    let mut buf = [0u8; 33];
    buf.copy_from_slice(&data[..33]);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_product() {
        let a: Vec<Scalar> = (1u64..=4).map(Scalar::from).collect();
        let b: Vec<Scalar> = (5u64..=8).map(Scalar::from).collect();
        // 1*5 + 2*6 + 3*7 + 4*8 = 70
        assert_eq!(inner_product(&a, &b), Scalar::from(70u64));
    }

    #[test]
    fn test_exp_iter() {
        let powers: Vec<Scalar> = exp_iter(Scalar::from(2u64)).take(5).collect();
        assert_eq!(
            powers,
            vec![
                Scalar::from(1u64),
                Scalar::from(2u64),
                Scalar::from(4u64),
                Scalar::from(8u64),
                Scalar::from(16u64)
            ]
        );
    }

    #[test]
    fn test_sum_of_powers() {
        assert_eq!(
            sum_of_powers(&Scalar::from(2u64), 6),
            Scalar::from(63u64)
        );
    }

    #[test]
    fn test_poly_inner_product_eval() {
        let l = VecPoly1(
            vec![Scalar::from(1u64), Scalar::from(2u64)],
            vec![Scalar::from(3u64), Scalar::from(4u64)],
        );
        let r = VecPoly1(
            vec![Scalar::from(5u64), Scalar::from(6u64)],
            vec![Scalar::from(7u64), Scalar::from(8u64)],
        );

        let t = l.inner_product(&r);
        let x = Scalar::from(10u64);

        let expected = inner_product(&l.eval(x), &r.eval(x));
        assert_eq!(t.eval(x), expected);
    }
}
