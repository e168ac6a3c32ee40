//! The fourteen tracked recovery quantities.

use std::fmt;

/// Number of quantities tracked per element.
pub const N_QUANTITIES: usize = 14;

/// One tracked quantity: vorticity, its derivatives, or a velocity gradient.
///
/// The discriminant is the column position in the error vector and in the
/// convergence table (after the two leading columns).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VorticityQuantity {
    Vorticity = 0,
    DVortDx,
    DVortDy,
    D2VortDx2,
    D2VortDxDy,
    D2VortDy2,
    D3VortDx3,
    D3VortDx2Dy,
    D3VortDxDy2,
    D3VortDy3,
    DuDx,
    DuDy,
    DvDx,
    DvDy,
}

impl VorticityQuantity {
    /// All quantities in column order.
    pub const ALL: [VorticityQuantity; N_QUANTITIES] = [
        Self::Vorticity,
        Self::DVortDx,
        Self::DVortDy,
        Self::D2VortDx2,
        Self::D2VortDxDy,
        Self::D2VortDy2,
        Self::D3VortDx3,
        Self::D3VortDx2Dy,
        Self::D3VortDxDy2,
        Self::D3VortDy3,
        Self::DuDx,
        Self::DuDy,
        Self::DvDx,
        Self::DvDy,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Quantity for column `i`, if in range.
    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    /// Short symbolic name, as used in table headers.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Vorticity => "vort",
            Self::DVortDx => "dvort/dx",
            Self::DVortDy => "dvort/dy",
            Self::D2VortDx2 => "d^2vort/dx^2",
            Self::D2VortDxDy => "d^2vort/dxdy",
            Self::D2VortDy2 => "d^2vort/dy^2",
            Self::D3VortDx3 => "d^3vort/dx^3",
            Self::D3VortDx2Dy => "d^3vort/dx^2dy",
            Self::D3VortDxDy2 => "d^3vort/dxdy^2",
            Self::D3VortDy3 => "d^3vort/dy^3",
            Self::DuDx => "du/dx",
            Self::DuDy => "du/dy",
            Self::DvDx => "dv/dx",
            Self::DvDy => "dv/dy",
        }
    }
}

impl fmt::Display for VorticityQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Vorticity `ω = ∂v/∂x - ∂u/∂y`, its spatial derivatives up to third order
/// and the velocity-gradient tensor at one point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VorticityDerivatives {
    pub vorticity: f64,
    /// `[∂ω/∂x, ∂ω/∂y]`
    pub first: [f64; 2],
    /// `[∂²ω/∂x², ∂²ω/∂x∂y, ∂²ω/∂y²]`
    pub second: [f64; 3],
    /// `[∂³ω/∂x³, ∂³ω/∂x²∂y, ∂³ω/∂x∂y², ∂³ω/∂y³]`
    pub third: [f64; 4],
    /// `[∂u/∂x, ∂u/∂y, ∂v/∂x, ∂v/∂y]`
    pub velocity_gradient: [f64; 4],
}

impl VorticityDerivatives {
    /// Value of a single quantity.
    pub fn get(&self, quantity: VorticityQuantity) -> f64 {
        self.to_array()[quantity.index()]
    }

    /// All quantities in column order.
    pub fn to_array(&self) -> [f64; N_QUANTITIES] {
        let [wx, wy] = self.first;
        let [wxx, wxy, wyy] = self.second;
        let [wxxx, wxxy, wxyy, wyyy] = self.third;
        let [ux, uy, vx, vy] = self.velocity_gradient;
        [
            self.vorticity,
            wx,
            wy,
            wxx,
            wxy,
            wyy,
            wxxx,
            wxxy,
            wxyy,
            wyyy,
            ux,
            uy,
            vx,
            vy,
        ]
    }

    /// Inverse of [`to_array`](Self::to_array).
    pub fn from_array(q: [f64; N_QUANTITIES]) -> Self {
        Self {
            vorticity: q[0],
            first: [q[1], q[2]],
            second: [q[3], q[4], q[5]],
            third: [q[6], q[7], q[8], q[9]],
            velocity_gradient: [q[10], q[11], q[12], q[13]],
        }
    }
}
