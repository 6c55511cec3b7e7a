use dd_tensor::Element;

/// Blend scalars for `C <- fact_ab * (A * B^T) + fact_c * C`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blend {
    /// Weight of the new product. Defaults to `1`.
    pub fact_ab: f64,
    /// Weight of the previous contents of `C`. Defaults to `0`.
    pub fact_c: f64,
}

impl Default for Blend {
    fn default() -> Self {
        Blend {
            fact_ab: 1.0,
            fact_c: 0.0,
        }
    }
}

impl Blend {
    pub fn new(fact_ab: f64, fact_c: f64) -> Self {
        Blend { fact_ab, fact_c }
    }

    /// `C <- A * B^T` on the pattern.
    pub fn overwrite() -> Self {
        Self::default()
    }

    /// `C <- A * B^T + C` on the pattern.
    pub fn accumulate() -> Self {
        Blend::new(1.0, 1.0)
    }

    /// True if applying this blend leaves `C` unchanged.
    pub fn is_identity(&self) -> bool {
        self.fact_ab == 0.0 && self.fact_c == 1.0
    }
}

/// A [`Blend`] converted to an element's accumulator type.
///
/// A zero factor is stored as `None`: its term is skipped entirely, so a
/// zero `fact_c` never reads the old value and a zero `fact_ab` never
/// computes the inner product.
pub(crate) struct TypedBlend<T: Element> {
    fact_ab: Option<T::Acc>,
    fact_c: Option<T::Acc>,
}

impl<T: Element> TypedBlend<T> {
    pub(crate) fn new(blend: Blend) -> Self {
        TypedBlend {
            fact_ab: (blend.fact_ab != 0.0).then(|| T::acc_from_f64(blend.fact_ab)),
            fact_c: (blend.fact_c != 0.0).then(|| T::acc_from_f64(blend.fact_c)),
        }
    }

    #[inline]
    pub(crate) fn apply(&self, old: T, dot: impl FnOnce() -> T::Acc) -> T {
        match (self.fact_ab, self.fact_c) {
            (None, None) => T::zero(),
            (None, Some(fc)) => T::from_acc(fc * old.to_acc()),
            (Some(fab), None) => T::from_acc(fab * dot()),
            (Some(fab), Some(fc)) => T::from_acc(fab * dot() + fc * old.to_acc()),
        }
    }
}
