use glam::Vec3;
use lumen_params::FieldParams;

/// A pure map from a point to its local derivative.
///
/// Implementations must not keep mutable state: the simulator calls
/// `derivative` once per particle per frame and relies on identical inputs
/// producing identical outputs.
pub trait VectorField {
    fn derivative(&self, p: Vec3) -> Vec3;
}

impl VectorField for FieldParams {
    fn derivative(&self, p: Vec3) -> Vec3 {
        let (x, y, z) = (p.x, p.y, p.z);
        match *self {
            FieldParams::Lorenz { sigma, rho, beta } => Vec3::new(
                sigma * (y - x),
                x * (rho - z) - y,
                x * y - beta * z,
            ),
            FieldParams::Aizawa { a, b, c, d, e, f } => Vec3::new(
                (z - b) * x - d * y,
                d * x + (z - b) * y,
                c + a * z - (z * z * z) / 3.0 - (x * x + y * y) * (1.0 + e * z) + f * z * x * x * x,
            ),
            FieldParams::Thomas { b } => Vec3::new(
                y.sin() - b * x,
                z.sin() - b * y,
                x.sin() - b * z,
            ),
            FieldParams::Dadras { a, b, c, d, e } => Vec3::new(
                y - a * x + b * y * z,
                c * y - x * z + z,
                d * x * y - e * z,
            ),
            FieldParams::Chen { a, b, c } => Vec3::new(
                a * (y - x),
                (c - a) * x - x * z + c * y,
                x * y - b * z,
            ),
        }
    }
}

/// Adapter that lets any closure act as a vector field
#[derive(Clone, Copy)]
pub struct FieldFn<F>(pub F);

impl<F> VectorField for FieldFn<F>
where
    F: Fn(Vec3) -> Vec3,
{
    fn derivative(&self, p: Vec3) -> Vec3 {
        (self.0)(p)
    }
}

impl<T: VectorField + ?Sized> VectorField for &T {
    fn derivative(&self, p: Vec3) -> Vec3 {
        (**self).derivative(p)
    }
}

impl<T: VectorField + ?Sized> VectorField for Box<T> {
    fn derivative(&self, p: Vec3) -> Vec3 {
        (**self).derivative(p)
    }
}
